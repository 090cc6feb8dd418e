// src/engine_lib/pick.rs
//
// Pointer picking: screen point -> world ray -> nearest registered image plane.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::engine_lib::scene_types::{PickTarget, SlotIndex};

const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize() }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub slot_index: SlotIndex,
    pub distance: f32,
    pub point: Vec3,
    /// Centre of the picked image plane.
    pub target_center: Vec3,
}

/// Pointer position in physical pixels (origin top-left) to a world-space ray.
pub fn screen_to_ray(pointer: Vec2, viewport: Vec2, view_proj: Mat4) -> Ray {
    let ndc_x = (pointer.x / viewport.x) * 2.0 - 1.0;
    let ndc_y = 1.0 - (pointer.y / viewport.y) * 2.0;

    let inv_view_proj = view_proj.inverse();
    let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let near = near.truncate() / near.w;
    let far = far.truncate() / far.w;

    Ray::new(near, far - near)
}

/// Double-sided ray/rectangle test. Returns the ray parameter of the hit.
pub fn intersect_target(ray: &Ray, target: &PickTarget) -> Option<f32> {
    let normal = target.right.cross(target.up);
    let denom = normal.dot(ray.direction);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = normal.dot(target.center - ray.origin) / denom;
    if t <= 0.0 {
        return None;
    }
    let offset = ray.at(t) - target.center;
    let inside = offset.dot(target.right).abs() <= target.half_width
        && offset.dot(target.up).abs() <= target.half_height;
    inside.then_some(t)
}

pub fn pick_nearest(ray: &Ray, targets: &[PickTarget]) -> Option<PickHit> {
    targets
        .iter()
        .filter_map(|target| intersect_target(ray, target).map(|t| (t, target)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(t, target)| PickHit {
            slot_index: target.slot_index,
            distance: t,
            point: ray.at(t),
            target_center: target.center,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_lib::camera::{Camera, CameraPose};
    use crate::engine_lib::config::GalleryConfig;
    use crate::engine_lib::layout::build_gallery;

    fn facing_target(slot_index: SlotIndex, z: f32) -> PickTarget {
        PickTarget {
            slot_index,
            center: Vec3::new(0.0, 0.0, z),
            right: Vec3::X,
            up: Vec3::Y,
            half_width: 1.0,
            half_height: 1.0,
        }
    }

    #[test]
    fn nearest_of_two_planes_wins() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let targets = [facing_target(7, -10.0), facing_target(3, -4.0)];
        let hit = pick_nearest(&ray, &targets).unwrap();
        assert_eq!(hit.slot_index, 3);
        assert!((hit.distance - 4.0).abs() < 1e-6);
        assert!(hit.point.distance(Vec3::new(0.0, 0.0, -4.0)) < 1e-6);
    }

    #[test]
    fn planes_behind_the_ray_are_ignored() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(pick_nearest(&ray, &[facing_target(1, 5.0)]).is_none());
    }

    #[test]
    fn miss_outside_extents() {
        let ray = Ray::new(Vec3::new(1.5, 0.0, 0.0), Vec3::NEG_Z);
        assert!(pick_nearest(&ray, &[facing_target(1, -3.0)]).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(intersect_target(&ray, &facing_target(1, -3.0)).is_none());
    }

    #[test]
    fn empty_target_list_is_a_no_op() {
        assert!(pick_nearest(&Ray::new(Vec3::ZERO, Vec3::X), &[]).is_none());
    }

    #[test]
    fn centre_of_screen_ray_matches_camera_forward() {
        let mut camera = Camera::new(93.7, 0.1, 1000.0);
        camera.set_viewport(1024, 768);
        let pose = CameraPose::new(Vec3::new(0.0, 2.79, 0.0), 0.4);
        let ray = screen_to_ray(Vec2::new(512.0, 384.0), Vec2::new(1024.0, 768.0), camera.view_projection(&pose));
        assert!(ray.direction.distance(pose.forward()) < 1e-3);
        assert!(ray.origin.distance(pose.position) < 0.2);
    }

    #[test]
    fn clicking_straight_at_an_artwork_picks_it() {
        let config = GalleryConfig::default();
        let layout = build_gallery(&config);
        let slot = &layout.slots[5];

        // Stand at the axis at artwork height and face the slot.
        let to_slot = Vec3::new(slot.center.x, 0.0, slot.center.z).normalize();
        let yaw = (-to_slot.x).atan2(-to_slot.z);
        let pose = CameraPose::new(Vec3::new(0.0, slot.center.y, 0.0), yaw);
        let mut camera = Camera::from_config(&config.camera);
        camera.set_viewport(800, 600);

        let ray = screen_to_ray(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0), camera.view_projection(&pose));
        let hit = pick_nearest(&ray, &layout.pick_targets).unwrap();
        assert_eq!(hit.slot_index, slot.index);
        assert!((hit.distance - (config.radius - 0.1)).abs() < 0.2);
    }
}
