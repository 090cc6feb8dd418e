// src/engine_lib/scene_logic.rs
use glam::Vec3;

use crate::engine_lib::camera::CameraPose;
use crate::engine_lib::config::GalleryConfig;
use crate::engine_lib::controller::{InputState, NavigationController};
use crate::engine_lib::easing::Easing;
use crate::engine_lib::focus::{focus_position_for_hit, Interpolation};
use crate::engine_lib::pick::PickHit;

/// Who owns the camera position this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraMode {
    FreeNavigation,
    Animating(Interpolation),
}

#[derive(Debug, Clone)]
pub struct CameraRig {
    pub pose: CameraPose,
    pub mode: CameraMode,
    pub navigation: NavigationController,
    pub focus_duration: f32,
    pub focus_standoff: f32,
    pub easing: Easing,
}

impl CameraRig {
    pub fn new(pose: CameraPose, navigation: NavigationController) -> Self {
        Self {
            pose,
            mode: CameraMode::FreeNavigation,
            navigation,
            focus_duration: 1.0,
            focus_standoff: 1.0,
            easing: Easing::QuadraticOut,
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        let pose = CameraPose::new(Vec3::new(0.0, config.camera.eye_height, 0.0), 0.0);
        Self {
            focus_duration: config.focus_duration_secs(),
            focus_standoff: config.focus_standoff,
            easing: config.easing,
            ..Self::new(pose, NavigationController::from_config(config))
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.mode, CameraMode::Animating(_))
    }

    /// One frame: input integration first, then the active glide. While a
    /// glide runs it is the only writer of position; turning still applies.
    pub fn tick(&mut self, input: &InputState, dt: f32) {
        match &mut self.mode {
            CameraMode::FreeNavigation => {
                self.pose = self.navigation.step(&self.pose, input);
            }
            CameraMode::Animating(interp) => {
                self.pose.yaw = self.navigation.turn(self.pose.yaw, input);
                self.pose.position = interp.advance(dt);
                if interp.is_finished() {
                    log::debug!("focus glide finished at {:?}", self.pose.position);
                    self.mode = CameraMode::FreeNavigation;
                }
            }
        }
    }

    /// Starts a glide to `target` from the live position, replacing any glide
    /// already in flight.
    pub fn focus_on(&mut self, target: Vec3) {
        let interp = Interpolation::new(self.pose.position, target, self.focus_duration, self.easing);
        self.mode = CameraMode::Animating(interp);
    }

    pub fn focus_on_hit(&mut self, hit: &PickHit) {
        let target = focus_position_for_hit(hit, self.navigation.boundary, self.focus_standoff);
        log::debug!("focusing slot {} -> {:?}", hit.slot_index, target);
        self.focus_on(target);
    }
}
