// src/gallery_scene.rs

use glam::Vec3;

use crate::engine_lib::config::GalleryConfig;
use crate::engine_lib::layout::build_gallery;
use crate::engine_lib::scene_types::{
    srgb_to_linear, DirectionalLight, GalleryScene, Lighting, Material, MeshData, StaticMesh,
};

const REFERENCE_CUBE_CENTER: Vec3 = Vec3::new(0.0, 1.6, 0.0);
const REFERENCE_CUBE_COLOR: [u8; 3] = [0, 255, 0];
const LIGHT_INTENSITY: f32 = 0.6;

fn default_lighting(config: &GalleryConfig) -> Lighting {
    let white = [1.0, 1.0, 1.0];
    Lighting {
        ambient: srgb_to_linear(config.ambient_color),
        directional: vec![
            DirectionalLight {
                direction: Vec3::new(1.0, 2.0, -1.0).normalize(),
                color: white,
                intensity: LIGHT_INTENSITY,
            },
            DirectionalLight {
                direction: Vec3::new(-1.0, 1.5, 1.0).normalize(),
                color: white,
                intensity: LIGHT_INTENSITY,
            },
        ],
    }
}

pub fn create_gallery_scene(config: &GalleryConfig) -> GalleryScene {
    let mut statics = vec![StaticMesh {
        name: "floor",
        // right × up = +Y, so the floor faces the sky.
        mesh: MeshData::quad(Vec3::ZERO, Vec3::X, Vec3::NEG_Z, config.floor_size, config.floor_size),
        material: Material::flat(config.floor_color),
    }];
    if config.show_reference_cube {
        statics.push(StaticMesh {
            name: "reference_cube",
            mesh: MeshData::cuboid(REFERENCE_CUBE_CENTER, Vec3::ONE),
            material: Material::flat(REFERENCE_CUBE_COLOR),
        });
    }

    let layout = build_gallery(config);

    GalleryScene {
        background: srgb_to_linear(config.background_color),
        lighting: default_lighting(config),
        statics,
        slots: layout.slots,
        pick_targets: layout.pick_targets,
    }
}
