// src/engine_lib/mod.rs
pub mod camera;
pub mod config;
pub mod controller;
pub mod easing;
pub mod focus;
pub mod layout;
pub mod pick;
pub mod scene_logic;
pub mod scene_types;

pub use camera::{Camera, CameraPose};
pub use config::{ConfigError, GalleryConfig};
pub use controller::{InputState, NavigationController};
pub use scene_logic::{CameraMode, CameraRig};
pub use scene_types::GalleryScene;
