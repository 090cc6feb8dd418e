// src/engine_lib/scene_types.rs
use glam::{Affine3A, Vec3};

use crate::engine_lib::config::{FrameStyle, Rgb};

pub type SlotIndex = usize;

pub fn srgb_to_linear(rgb: Rgb) -> [f32; 3] {
    rgb.map(|c| {
        let c = c as f32 / 255.0;
        if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub base_color: [f32; 3],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    /// Slot whose artwork texture this material samples once it resolves.
    pub texture_slot: Option<SlotIndex>,
}

impl Material {
    pub fn flat(color: Rgb) -> Self {
        Self {
            base_color: srgb_to_linear(color),
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            metalness: 0.0,
            roughness: 1.0,
            texture_slot: None,
        }
    }

    pub fn from_frame_style(style: &FrameStyle) -> Self {
        Self {
            base_color: srgb_to_linear(style.color),
            emissive: srgb_to_linear(style.emissive),
            emissive_intensity: style.emissive_intensity,
            metalness: style.metalness.clamp(0.0, 1.0),
            roughness: style.roughness.clamp(0.0, 1.0),
            texture_slot: None,
        }
    }

    pub fn artwork(slot: SlotIndex) -> Self {
        Self {
            texture_slot: Some(slot),
            ..Self::flat([255, 255, 255])
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Rectangle spanned by `right` and `up`, facing `right × up`.
    /// UV (0,0) sits at the top-left as seen from the facing side.
    pub fn quad(center: Vec3, right: Vec3, up: Vec3, width: f32, height: f32) -> Self {
        let mut mesh = MeshData::default();
        mesh.push_face(center, right * (width / 2.0), up * (height / 2.0));
        mesh
    }

    /// Axis-aligned box in its own frame, sized `size` (x, y, z).
    pub fn cuboid(center: Vec3, size: Vec3) -> Self {
        let h = size / 2.0;
        let mut mesh = MeshData::default();
        // +Z, -Z, +X, -X, +Y, -Y
        mesh.push_face(center + Vec3::Z * h.z, Vec3::X * h.x, Vec3::Y * h.y);
        mesh.push_face(center - Vec3::Z * h.z, -Vec3::X * h.x, Vec3::Y * h.y);
        mesh.push_face(center + Vec3::X * h.x, -Vec3::Z * h.z, Vec3::Y * h.y);
        mesh.push_face(center - Vec3::X * h.x, Vec3::Z * h.z, Vec3::Y * h.y);
        mesh.push_face(center + Vec3::Y * h.y, Vec3::X * h.x, -Vec3::Z * h.z);
        mesh.push_face(center - Vec3::Y * h.y, Vec3::X * h.x, Vec3::Z * h.z);
        mesh
    }

    fn push_face(&mut self, center: Vec3, half_right: Vec3, half_up: Vec3) {
        let base = self.positions.len() as u32;
        let normal = half_right.cross(half_up).normalize_or_zero();
        let corners = [
            (center - half_right + half_up, [0.0, 0.0]),
            (center - half_right - half_up, [0.0, 1.0]),
            (center + half_right - half_up, [1.0, 1.0]),
            (center + half_right + half_up, [1.0, 0.0]),
        ];
        for (p, uv) in corners {
            self.positions.push(p.to_array());
            self.normals.push(normal.to_array());
            self.uvs.push(uv);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn transformed(mut self, transform: &Affine3A) -> Self {
        for p in &mut self.positions {
            *p = transform.transform_point3(Vec3::from_array(*p)).to_array();
        }
        for n in &mut self.normals {
            *n = transform.transform_vector3(Vec3::from_array(*n)).normalize_or_zero().to_array();
        }
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Wall,
    Frame,
    Image,
}

#[derive(Clone, Debug)]
pub struct SlotElement {
    pub kind: ElementKind,
    /// Offset from the slot origin in slot-local space (local -Z faces the axis).
    pub local_offset: Vec3,
    pub material: Material,
    /// World-space geometry.
    pub mesh: MeshData,
}

#[derive(Clone, Debug)]
pub struct ArtworkSlot {
    pub index: SlotIndex,
    pub angle: f32,
    pub center: Vec3,
    pub facing_rotation: f32,
    pub elements: Vec<SlotElement>,
    pub image: Option<String>,
}

impl ArtworkSlot {
    pub fn local_to_world(&self) -> Affine3A {
        Affine3A::from_rotation_translation(glam::Quat::from_rotation_y(self.facing_rotation), self.center)
    }

    pub fn element(&self, kind: ElementKind) -> Option<&SlotElement> {
        self.elements.iter().find(|e| e.kind == kind)
    }
}

/// A rectangle that pointer rays are tested against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickTarget {
    pub slot_index: SlotIndex,
    pub center: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub half_width: f32,
    pub half_height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector pointing from the scene towards the light.
    pub direction: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: [f32; 3],
    pub directional: Vec<DirectionalLight>,
}

#[derive(Clone, Debug)]
pub struct StaticMesh {
    pub name: &'static str,
    pub mesh: MeshData,
    pub material: Material,
}

#[derive(Clone, Debug)]
pub struct GalleryScene {
    pub background: [f32; 3],
    pub lighting: Lighting,
    pub statics: Vec<StaticMesh>,
    pub slots: Vec<ArtworkSlot>,
    pub pick_targets: Vec<PickTarget>,
}

impl GalleryScene {
    pub fn slot(&self, index: SlotIndex) -> Option<&ArtworkSlot> {
        self.slots.iter().find(|s| s.index == index)
    }
}
