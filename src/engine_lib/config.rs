// src/engine_lib/config.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine_lib::easing::Easing;

pub type Rgb = [u8; 3];

/// Upper bound on `artwork_count`; each slot costs three draw items.
pub const MAX_ARTWORKS: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            color: [135, 86, 59],
            emissive: [0, 0, 0],
            emissive_intensity: 0.0,
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

impl FrameStyle {
    /// Glowing gold frame.
    pub fn highlight() -> Self {
        Self {
            color: [255, 191, 0],
            emissive: [178, 145, 70],
            emissive_intensity: 1.94,
            metalness: 1.0,
            roughness: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StyleOverride {
    pub index: usize,
    pub style: FrameStyle,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f32,
    pub znear: f32,
    pub zfar: f32,
    pub eye_height: f32,
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fov = self.fov_y_deg;
        if !(fov.is_finite() && fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::Invalid {
                field: "camera.fov_y_deg",
                reason: format!("must lie in (0, 180), got {fov}"),
            });
        }
        if !(self.znear.is_finite() && self.znear > 0.0) {
            return Err(ConfigError::Invalid {
                field: "camera.znear",
                reason: format!("must be > 0, got {}", self.znear),
            });
        }
        if !(self.zfar.is_finite() && self.zfar > self.znear) {
            return Err(ConfigError::Invalid {
                field: "camera.zfar",
                reason: format!("must be finite and beyond znear {}, got {}", self.znear, self.zfar),
            });
        }
        if !self.eye_height.is_finite() {
            return Err(ConfigError::Invalid {
                field: "camera.eye_height",
                reason: format!("must be finite, got {}", self.eye_height),
            });
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 93.7,
            znear: 0.1,
            zfar: 1000.0,
            eye_height: 2.79,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub artwork_count: usize,
    pub radius: f32,
    pub artwork_width: f32,
    pub artwork_height: f32,
    pub frame_thickness: f32,
    /// Gap between the floor and the bottom edge of an artwork.
    pub artwork_elevation: f32,

    pub move_speed: f32,
    pub turn_speed: f32,
    pub boundary_inset: f32,
    /// How far inside the boundary the focus glide stops.
    pub focus_standoff: f32,
    pub focus_duration_ms: u64,
    pub easing: Easing,

    pub frame_style: FrameStyle,
    pub style_overrides: Vec<StyleOverride>,

    /// Explicit ordered image list; entry `i - 1` belongs to slot `i`.
    pub images: Vec<String>,
    /// Used when `images` is empty. `{index}` is replaced by the slot index.
    pub image_pattern: String,

    pub background_color: Rgb,
    pub wall_color: Rgb,
    pub floor_color: Rgb,
    pub floor_size: f32,
    pub ambient_color: Rgb,
    pub show_reference_cube: bool,

    pub camera: CameraConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            artwork_count: 24,
            radius: 25.0,
            artwork_width: 5.0,
            artwork_height: 6.0,
            frame_thickness: 0.3,
            artwork_elevation: 1.0,
            move_speed: 0.129,
            turn_speed: 0.02,
            boundary_inset: 2.0,
            focus_standoff: 1.0,
            focus_duration_ms: 1000,
            easing: Easing::QuadraticOut,
            frame_style: FrameStyle::default(),
            style_overrides: vec![StyleOverride { index: 1, style: FrameStyle::highlight() }],
            images: Vec::new(),
            image_pattern: "images/artwork{index}.jpg".to_string(),
            background_color: [72, 61, 139],
            wall_color: [105, 105, 105],
            floor_color: [18, 35, 35],
            floor_size: 70.0,
            ambient_color: [169, 169, 169],
            show_reference_cube: true,
            camera: CameraConfig::default(),
        }
    }
}

impl GalleryConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GalleryConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("radius", self.radius),
            ("artwork_width", self.artwork_width),
            ("artwork_height", self.artwork_height),
            ("floor_size", self.floor_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid { field, reason: format!("must be > 0, got {value}") });
            }
        }
        let non_negative = [
            ("frame_thickness", self.frame_thickness),
            ("move_speed", self.move_speed),
            ("turn_speed", self.turn_speed),
            ("boundary_inset", self.boundary_inset),
            ("focus_standoff", self.focus_standoff),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid { field, reason: format!("must be >= 0, got {value}") });
            }
        }
        if self.artwork_count > MAX_ARTWORKS {
            return Err(ConfigError::Invalid {
                field: "artwork_count",
                reason: format!("{} exceeds the limit of {}", self.artwork_count, MAX_ARTWORKS),
            });
        }
        if !(self.artwork_elevation.is_finite() && self.artwork_elevation >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "artwork_elevation",
                reason: format!("must be >= 0, got {}", self.artwork_elevation),
            });
        }
        self.camera.validate()?;
        if self.boundary_inset >= self.radius {
            return Err(ConfigError::Invalid {
                field: "boundary_inset",
                reason: format!("{} leaves no walkable area inside radius {}", self.boundary_inset, self.radius),
            });
        }
        Ok(())
    }

    /// Maximum planar distance of the camera from the central axis.
    pub fn boundary(&self) -> f32 {
        self.radius - self.boundary_inset
    }

    /// Height of every slot's centre above the floor.
    pub fn artwork_center_height(&self) -> f32 {
        self.artwork_height / 2.0 + self.artwork_elevation
    }

    pub fn focus_duration_secs(&self) -> f32 {
        self.focus_duration_ms as f32 / 1000.0
    }

    pub fn style_override_map(&self) -> HashMap<usize, FrameStyle> {
        self.style_overrides
            .iter()
            .map(|o| (o.index, o.style.clone()))
            .collect()
    }

    /// Override indices that name no slot in `1..=artwork_count`.
    pub fn orphan_style_overrides(&self) -> Vec<usize> {
        self.style_overrides
            .iter()
            .map(|o| o.index)
            .filter(|&index| index == 0 || index > self.artwork_count)
            .collect()
    }

    /// `Some(len)` when an explicit image list does not cover exactly one image per slot.
    pub fn image_list_mismatch(&self) -> Option<usize> {
        let len = self.images.len();
        (len != 0 && len != self.artwork_count).then_some(len)
    }

    pub fn image_for(&self, index: usize) -> Option<String> {
        if !self.images.is_empty() {
            return index.checked_sub(1).and_then(|i| self.images.get(i)).cloned();
        }
        if self.image_pattern.is_empty() {
            return None;
        }
        Some(self.image_pattern.replace("{index}", &index.to_string()))
    }
}
