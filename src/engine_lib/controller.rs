// src/engine_lib/controller.rs

use glam::{Mat3, Vec3};
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::engine_lib::camera::CameraPose;
use crate::engine_lib::config::GalleryConfig;

/// Currently held navigation keys. No queuing: only the held state matters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl InputState {
    /// Returns true if `key` is one of the navigation bindings.
    pub fn handle_key(&mut self, key: PhysicalKey, pressed: bool) -> bool {
        let flag = match key {
            PhysicalKey::Code(KeyCode::KeyW) => &mut self.move_forward,
            PhysicalKey::Code(KeyCode::KeyS) => &mut self.move_backward,
            PhysicalKey::Code(KeyCode::KeyA) => &mut self.move_left,
            PhysicalKey::Code(KeyCode::KeyD) => &mut self.move_right,
            PhysicalKey::Code(KeyCode::ArrowLeft) => &mut self.turn_left,
            PhysicalKey::Code(KeyCode::ArrowRight) => &mut self.turn_right,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.repeat {
                    return false;
                }
                self.handle_key(key_event.physical_key, key_event.state == ElementState::Pressed)
            }
            // Key-up events are lost while unfocused.
            WindowEvent::Focused(false) => {
                self.release_all();
                false
            }
            _ => false,
        }
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationController {
    pub move_speed: f32,
    pub turn_speed: f32,
    pub boundary: f32,
}

impl NavigationController {
    pub fn new(move_speed: f32, turn_speed: f32, boundary: f32) -> Self {
        Self { move_speed, turn_speed, boundary }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.move_speed, config.turn_speed, config.boundary())
    }

    /// Both turn keys held cancel out.
    pub fn turn(&self, yaw: f32, input: &InputState) -> f32 {
        let mut yaw = yaw;
        if input.turn_left {
            yaw += self.turn_speed;
        }
        if input.turn_right {
            yaw -= self.turn_speed;
        }
        yaw
    }

    /// Camera-local displacement for one tick. Diagonals are the plain sum of
    /// both axes and therefore about 1.41x faster than straight movement.
    pub fn local_delta(&self, input: &InputState) -> Vec3 {
        let mut delta = Vec3::ZERO;
        if input.move_forward {
            delta.z -= self.move_speed;
        }
        if input.move_backward {
            delta.z += self.move_speed;
        }
        if input.move_left {
            delta.x -= self.move_speed;
        }
        if input.move_right {
            delta.x += self.move_speed;
        }
        delta
    }

    pub fn translate(&self, position: Vec3, yaw: f32, input: &InputState) -> Vec3 {
        let world_delta = Mat3::from_rotation_y(yaw) * self.local_delta(input);
        clamp_to_boundary(position + world_delta, self.boundary)
    }

    pub fn step(&self, pose: &CameraPose, input: &InputState) -> CameraPose {
        let yaw = self.turn(pose.yaw, input);
        CameraPose {
            position: self.translate(pose.position, yaw, input),
            yaw,
        }
    }
}

/// Projects `position` back onto the boundary circle if it strayed outside,
/// keeping its angle around the axis and its height.
pub fn clamp_to_boundary(position: Vec3, boundary: f32) -> Vec3 {
    let distance = (position.x * position.x + position.z * position.z).sqrt();
    if distance <= boundary {
        return position;
    }
    let angle = position.z.atan2(position.x);
    Vec3::new(boundary * angle.cos(), position.y, boundary * angle.sin())
}
