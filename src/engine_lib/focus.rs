// src/engine_lib/focus.rs

use glam::Vec3;

use crate::engine_lib::easing::Easing;
use crate::engine_lib::pick::PickHit;

/// Where the camera should glide to look at the artwork centred at `artwork_center`:
/// same angle around the axis, `standoff` inside the navigation boundary,
/// at the artwork's height.
pub fn focus_position(artwork_center: Vec3, boundary: f32, standoff: f32) -> Vec3 {
    let angle = artwork_center.z.atan2(artwork_center.x);
    let radial = (boundary - standoff).max(0.0);
    Vec3::new(radial * angle.cos(), artwork_center.y, radial * angle.sin())
}

pub fn focus_position_for_hit(hit: &PickHit, boundary: f32, standoff: f32) -> Vec3 {
    focus_position(hit.target_center, boundary, standoff)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    pub start: Vec3,
    pub target: Vec3,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Interpolation {
    pub fn new(start: Vec3, target: Vec3, duration: f32, easing: Easing) -> Self {
        Self { start, target, duration, elapsed: 0.0, easing }
    }

    pub fn is_finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }

    pub fn value(&self) -> Vec3 {
        if self.is_finished() {
            return self.target;
        }
        let t = self.easing.evaluate(self.elapsed / self.duration);
        self.start.lerp(self.target, t)
    }

    /// Advances by `dt` seconds and returns the new position. The final step
    /// lands exactly on `target`.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.elapsed += dt.max(0.0);
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_sits_one_unit_inside_boundary_at_artwork_angle() {
        let angle = 15f32.to_radians();
        let center = Vec3::new(25.0 * angle.cos(), 4.0, 25.0 * angle.sin());
        let target = focus_position(center, 23.0, 1.0);
        let planar = Vec3::new(target.x, 0.0, target.z);
        assert!((planar.length() - 22.0).abs() < 1e-4);
        assert!((target.z.atan2(target.x) - angle).abs() < 1e-5);
        assert_eq!(target.y, 4.0);
    }

    #[test]
    fn standoff_larger_than_boundary_collapses_to_axis() {
        let target = focus_position(Vec3::new(5.0, 1.0, 0.0), 0.5, 1.0);
        assert_eq!(target, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn completes_exactly_on_target() {
        let target = Vec3::new(21.25, 4.0, 5.69);
        let mut interp = Interpolation::new(Vec3::new(0.0, 2.79, 0.0), target, 1.0, Easing::QuadraticOut);
        let mut last = Vec3::ZERO;
        for _ in 0..70 {
            last = interp.advance(1.0 / 60.0);
        }
        assert!(interp.is_finished());
        assert_eq!(last, target);
    }

    #[test]
    fn quadratic_out_covers_three_quarters_at_half_time() {
        let mut interp = Interpolation::new(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0), 1.0, Easing::QuadraticOut);
        let p = interp.advance(0.5);
        assert!((p.x - 6.0).abs() < 1e-5);
        assert!(!interp.is_finished());
    }

    #[test]
    fn zero_duration_jumps_immediately() {
        let mut interp = Interpolation::new(Vec3::ZERO, Vec3::ONE, 0.0, Easing::Linear);
        assert!(interp.is_finished());
        assert_eq!(interp.advance(0.0), Vec3::ONE);
    }

    #[test]
    fn negative_dt_does_not_rewind() {
        let mut interp = Interpolation::new(Vec3::ZERO, Vec3::X, 1.0, Easing::Linear);
        interp.advance(0.4);
        let p = interp.advance(-1.0);
        assert!((p.x - 0.4).abs() < 1e-6);
    }
}
