// src/ui.rs
use egui;

use crate::engine_lib::scene_logic::CameraMode;

pub struct UiStatus<'a> {
    pub mode: &'a CameraMode,
    pub position: glam::Vec3,
    pub yaw: f32,
    pub slot_count: usize,
    pub textures_loaded: usize,
    pub textures_failed: usize,
    pub focused_slot: Option<usize>,
    pub fps: f32,
}

pub fn build_ui(ctx: &egui::Context, status: &UiStatus) {
    egui::Window::new("Gallery")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.label(format!("{} artworks", status.slot_count));
                ui.label(format!(
                    "Images: {} loaded, {} failed",
                    status.textures_loaded, status.textures_failed
                ));
                ui.separator();

                let mode = match status.mode {
                    CameraMode::FreeNavigation => "walking".to_string(),
                    CameraMode::Animating(interp) => {
                        let pct = if interp.duration > 0.0 {
                            (interp.elapsed / interp.duration * 100.0).min(100.0)
                        } else {
                            100.0
                        };
                        format!("gliding ({pct:.0}%)")
                    }
                };
                ui.label(format!("Camera: {mode}"));
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})  yaw {:.1}°",
                    status.position.x,
                    status.position.y,
                    status.position.z,
                    status.yaw.to_degrees()
                ));
                if let Some(slot) = status.focused_slot {
                    ui.label(format!("Last selected: #{slot}"));
                }
                ui.label(format!("{:.0} fps", status.fps));
                ui.separator();

                ui.label("🎮 Keyboard Controls:");
                ui.label("   W/A/S/D: Walk");
                ui.label("   Arrow Left/Right: Turn");
                ui.label("   Click an artwork: Walk up to it");
            });
        });
}
