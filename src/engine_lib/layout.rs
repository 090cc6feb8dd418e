// src/engine_lib/layout.rs

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

use crate::engine_lib::config::GalleryConfig;
use crate::engine_lib::scene_types::{
    ArtworkSlot, ElementKind, Material, MeshData, PickTarget, SlotElement, SlotIndex,
};

// Local depth offsets; the image sits nearest the axis so its frame never covers it.
const WALL_OFFSET: Vec3 = Vec3::new(0.0, -2.8, 0.15);
const FRAME_OFFSET: Vec3 = Vec3::ZERO;
const IMAGE_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -0.1);
const FRAME_DEPTH: f32 = 0.1;
const WALL_MARGIN: f32 = 10.0;

pub fn slot_angle(index: SlotIndex, count: usize) -> f32 {
    TAU * index as f32 / count as f32
}

/// Rotation about +Y that turns a slot's local -Z towards the cylinder axis.
pub fn facing_rotation(angle: f32) -> f32 {
    -angle + FRAC_PI_2
}

pub fn slot_center(angle: f32, radius: f32, height: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), height, radius * angle.sin())
}

pub struct LayoutOutput {
    pub slots: Vec<ArtworkSlot>,
    pub pick_targets: Vec<PickTarget>,
}

pub fn build_gallery(config: &GalleryConfig) -> LayoutOutput {
    let count = config.artwork_count;
    let overrides = config.style_override_map();
    let height = config.artwork_center_height();

    for index in config.orphan_style_overrides() {
        log::warn!("style override for slot {} ignored; gallery has slots 1..={}", index, count);
    }
    if let Some(len) = config.image_list_mismatch() {
        log::warn!("{} images listed for {} slots; unmatched slots stay blank or unused", len, count);
    }

    let mut slots = Vec::with_capacity(count);
    let mut pick_targets = Vec::with_capacity(count);

    for index in 1..=count {
        let angle = slot_angle(index, count);
        let frame_style = overrides.get(&index).unwrap_or(&config.frame_style);

        let mut slot = ArtworkSlot {
            index,
            angle,
            center: slot_center(angle, config.radius, height),
            facing_rotation: facing_rotation(angle),
            elements: Vec::with_capacity(3),
            image: config.image_for(index),
        };
        let to_world = slot.local_to_world();

        let w = config.artwork_width;
        let h = config.artwork_height;
        let t = config.frame_thickness;

        let wall = MeshData::quad(WALL_OFFSET, Vec3::X, Vec3::Y, w + t + WALL_MARGIN, h + t + WALL_MARGIN);
        let frame = MeshData::cuboid(FRAME_OFFSET, Vec3::new(w + t, h + t, FRAME_DEPTH));
        // Right axis is local -X so the picture reads un-mirrored from inside.
        let image = MeshData::quad(IMAGE_OFFSET, -Vec3::X, Vec3::Y, w, h);

        slot.elements.push(SlotElement {
            kind: ElementKind::Wall,
            local_offset: WALL_OFFSET,
            material: Material::flat(config.wall_color),
            mesh: wall.transformed(&to_world),
        });
        slot.elements.push(SlotElement {
            kind: ElementKind::Frame,
            local_offset: FRAME_OFFSET,
            material: Material::from_frame_style(frame_style),
            mesh: frame.transformed(&to_world),
        });
        slot.elements.push(SlotElement {
            kind: ElementKind::Image,
            local_offset: IMAGE_OFFSET,
            material: Material::artwork(index),
            mesh: image.transformed(&to_world),
        });

        pick_targets.push(PickTarget {
            slot_index: index,
            center: to_world.transform_point3(IMAGE_OFFSET),
            right: to_world.transform_vector3(-Vec3::X),
            up: Vec3::Y,
            half_width: w / 2.0,
            half_height: h / 2.0,
        });
        slots.push(slot);
    }

    log::info!(
        "laid out {} artwork slots on radius {} ({} style overrides)",
        slots.len(),
        config.radius,
        overrides.len()
    );

    LayoutOutput { slots, pick_targets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_lib::config::{FrameStyle, StyleOverride};
    use crate::engine_lib::scene_types::srgb_to_linear;

    fn config_with(count: usize) -> GalleryConfig {
        GalleryConfig { artwork_count: count, ..GalleryConfig::default() }
    }

    #[test]
    fn angles_follow_index_over_count() {
        for n in [1usize, 2, 7, 24] {
            let layout = build_gallery(&config_with(n));
            assert_eq!(layout.slots.len(), n);
            for slot in &layout.slots {
                let expected = TAU * slot.index as f32 / n as f32;
                assert!((slot.angle - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn first_of_twenty_four_sits_at_fifteen_degrees() {
        let layout = build_gallery(&config_with(24));
        assert!((layout.slots[0].angle.to_degrees() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn centers_are_on_the_circle_and_distinct() {
        let config = config_with(24);
        let layout = build_gallery(&config);
        for slot in &layout.slots {
            let planar = Vec3::new(slot.center.x, 0.0, slot.center.z).length();
            assert!((planar - config.radius).abs() < 1e-4);
            assert_eq!(slot.center.y, config.artwork_center_height());
        }
        for (i, a) in layout.slots.iter().enumerate() {
            for b in &layout.slots[i + 1..] {
                assert!(a.center.distance(b.center) > 1.0);
            }
        }
    }

    #[test]
    fn empty_gallery_has_no_slots() {
        let layout = build_gallery(&config_with(0));
        assert!(layout.slots.is_empty());
        assert!(layout.pick_targets.is_empty());
    }

    #[test]
    fn single_slot_is_at_full_turn() {
        let layout = build_gallery(&config_with(1));
        assert_eq!(layout.slots.len(), 1);
        let slot = &layout.slots[0];
        assert!((slot.angle - TAU).abs() < 1e-6);
        assert!((slot.center.x - 25.0).abs() < 1e-3);
        assert!(slot.center.z.abs() < 1e-3);
    }

    #[test]
    fn image_is_nearer_the_axis_than_frame_and_wall() {
        let layout = build_gallery(&config_with(12));
        for slot in &layout.slots {
            let radial = |kind| {
                let element = slot.element(kind).unwrap();
                let world = slot.local_to_world().transform_point3(element.local_offset);
                Vec3::new(world.x, 0.0, world.z).length()
            };
            assert!(radial(ElementKind::Image) < radial(ElementKind::Frame));
            assert!(radial(ElementKind::Frame) < radial(ElementKind::Wall));
        }
    }

    #[test]
    fn image_planes_face_the_axis() {
        let layout = build_gallery(&config_with(10));
        for slot in &layout.slots {
            let image = slot.element(ElementKind::Image).unwrap();
            let normal = Vec3::from_array(image.mesh.normals[0]);
            let to_axis = -Vec3::new(slot.center.x, 0.0, slot.center.z).normalize();
            assert!(normal.dot(to_axis) > 0.999, "slot {} normal {:?}", slot.index, normal);
        }
    }

    #[test]
    fn pick_targets_match_image_planes() {
        let layout = build_gallery(&config_with(6));
        assert_eq!(layout.pick_targets.len(), 6);
        for (slot, target) in layout.slots.iter().zip(&layout.pick_targets) {
            assert_eq!(target.slot_index, slot.index);
            assert!((target.half_width - 2.5).abs() < 1e-6);
            assert!((target.half_height - 3.0).abs() < 1e-6);
            let image = slot.element(ElementKind::Image).unwrap();
            let centroid = image
                .mesh
                .positions
                .iter()
                .fold(Vec3::ZERO, |acc, p| acc + Vec3::from_array(*p))
                / 4.0;
            assert!(centroid.distance(target.center) < 1e-4);
        }
    }

    #[test]
    fn only_overridden_slots_get_the_highlight() {
        let config = config_with(24);
        let layout = build_gallery(&config);
        let gold = srgb_to_linear(FrameStyle::highlight().color);
        for slot in &layout.slots {
            let frame = slot.element(ElementKind::Frame).unwrap();
            assert_eq!(frame.material.base_color == gold, slot.index == 1);
        }
    }

    #[test]
    fn overrides_are_data_driven() {
        let config = GalleryConfig {
            artwork_count: 5,
            style_overrides: vec![
                StyleOverride { index: 2, style: FrameStyle::highlight() },
                StyleOverride { index: 4, style: FrameStyle::highlight() },
            ],
            ..GalleryConfig::default()
        };
        let layout = build_gallery(&config);
        let lit: Vec<_> = layout
            .slots
            .iter()
            .filter(|s| s.element(ElementKind::Frame).unwrap().material.emissive_intensity > 0.0)
            .map(|s| s.index)
            .collect();
        assert_eq!(lit, vec![2, 4]);
    }

    #[test]
    fn image_material_references_its_slot() {
        let layout = build_gallery(&config_with(3));
        for slot in &layout.slots {
            let image = slot.element(ElementKind::Image).unwrap();
            assert_eq!(image.material.texture_slot, Some(slot.index));
            assert_eq!(slot.image.as_deref(), Some(format!("images/artwork{}.jpg", slot.index).as_str()));
        }
    }
}
