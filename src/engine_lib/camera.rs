// src/engine_lib/camera.rs

use glam::{Mat4, Vec3};

use crate::engine_lib::config::CameraConfig;

/// Position plus heading. Yaw 0 looks down -Z; positive yaw turns left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
}

impl CameraPose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    pub fn forward(&self) -> Vec3 {
        Mat4::from_rotation_y(self.yaw).transform_vector3(Vec3::NEG_Z)
    }

    pub fn world_from_camera(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_rotation_y(self.yaw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub fov_y_rad: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(fov_y_deg: f32, znear: f32, zfar: f32) -> Self {
        Self {
            fov_y_rad: fov_y_deg.to_radians(),
            aspect: 1.0,
            znear,
            zfar,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.fov_y_deg, config.znear, config.zfar)
    }

    // Zero-sized viewports (minimised windows) keep the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self, pose: &CameraPose) -> Mat4 {
        pose.world_from_camera().inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_rad, self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self, pose: &CameraPose) -> Mat4 {
        self.projection_matrix() * self.view_matrix(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn yaw_zero_looks_down_negative_z() {
        let pose = CameraPose::new(Vec3::ZERO, 0.0);
        assert!(pose.forward().distance(Vec3::NEG_Z) < 1e-6);
    }

    #[test]
    fn positive_yaw_turns_left() {
        let pose = CameraPose::new(Vec3::ZERO, FRAC_PI_2);
        assert!(pose.forward().distance(Vec3::NEG_X) < 1e-6);
    }

    #[test]
    fn resize_updates_aspect_and_ignores_zero() {
        let mut camera = Camera::new(93.7, 0.1, 1000.0);
        camera.set_viewport(1600, 800);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(0, 800);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(1600, 800);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn point_ahead_projects_to_screen_centre() {
        let camera = Camera::new(90.0, 0.1, 100.0);
        let pose = CameraPose::new(Vec3::new(1.0, 2.0, 3.0), 0.0);
        let clip = camera.view_projection(&pose) * (pose.position + pose.forward() * 10.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
