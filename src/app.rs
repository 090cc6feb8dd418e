// src/app.rs

use std::sync::Arc;

use glam::Vec2;
use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    window::Window,
};

use crate::engine_lib::camera::Camera;
use crate::engine_lib::config::GalleryConfig;
use crate::engine_lib::controller::InputState;
use crate::engine_lib::pick::{pick_nearest, screen_to_ray, PickHit};
use crate::engine_lib::scene_logic::CameraRig;
use crate::engine_lib::scene_types::{GalleryScene, SlotIndex};
use crate::gallery_scene;
use crate::rendering_lib::renderer::Renderer;
use crate::rendering_lib::shader::WGSL_SHADER_SOURCE;
use crate::rendering_lib::texture_loader::{TextureHandle, TextureLoader, TextureStatus};
use crate::ui::{build_ui, UiStatus};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[cfg(not(target_arch = "wasm32"))]
    #[error("texture loading needs a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

pub struct GalleryApp {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    renderer: Renderer,
    scene: GalleryScene,
    camera: Camera,
    rig: CameraRig,
    input: InputState,
    textures: Vec<(SlotIndex, TextureHandle)>,
    cursor_position: Option<Vec2>,
    focused_slot: Option<SlotIndex>,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    is_focused: bool,
    fps: f32,
}

impl GalleryApp {
    pub async fn new(window: Arc<Window>, gallery_config: GalleryConfig) -> Result<Self, AppError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(AppError::NoAdapter)?;

        let required_limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
        } else {
            wgpu::Limits::default()
        };
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(AppError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene = gallery_scene::create_gallery_scene(&gallery_config);
        let renderer = Renderer::new(
            &device, &queue, config.format, WGSL_SHADER_SOURCE,
            config.width, config.height, &scene,
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(), egui::ViewportId::ROOT, &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        let mut camera = Camera::from_config(&gallery_config.camera);
        camera.set_viewport(config.width, config.height);
        let rig = CameraRig::from_config(&gallery_config);

        cfg_if::cfg_if! {
            if #[cfg(target_arch = "wasm32")] {
                let loader = TextureLoader::new();
            } else {
                let loader = TextureLoader::new(tokio::runtime::Handle::try_current()?);
            }
        }
        // Layout is already complete; images fill in as they arrive.
        let textures = scene
            .slots
            .iter()
            .filter_map(|slot| slot.image.as_deref().map(|path| (slot.index, loader.load(path))))
            .collect::<Vec<_>>();
        log::info!("requested {} artwork images", textures.len());

        Ok(Self {
            surface, device, queue, config, size,
            renderer, scene, camera, rig,
            input: InputState::default(),
            textures,
            cursor_position: None,
            focused_slot: None,
            egui_ctx, egui_state, egui_renderer,
            is_focused: window.has_focus(),
            fps: 0.0,
        })
    }

    pub fn get_size(&self) -> winit::dpi::PhysicalSize<u32> { self.size }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera.set_viewport(new_size.width, new_size.height);
            self.renderer.resize(&self.device, new_size.width, new_size.height);
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
        if !focused {
            self.input.release_all();
        }
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    fn poll_textures(&mut self) {
        for (slot, handle) in &mut self.textures {
            match handle.poll() {
                Some(Ok(image)) => {
                    log::debug!("artwork {} ready ({}x{})", slot, image.width, image.height);
                    self.renderer.set_slot_texture(&self.device, &self.queue, *slot, &image);
                }
                Some(Err(err)) => {
                    log::warn!("artwork {} stays blank: {}", slot, err);
                }
                None => {}
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.poll_textures();
        let input = if self.is_focused { self.input } else { InputState::default() };
        self.rig.tick(&input, dt);
    }

    /// Resolves a pointer position to the nearest artwork and glides to it.
    pub fn select_at(&mut self, pointer: Vec2) -> Option<PickHit> {
        let viewport = Vec2::new(self.config.width as f32, self.config.height as f32);
        let ray = screen_to_ray(pointer, viewport, self.camera.view_projection(&self.rig.pose));
        let hit = pick_nearest(&ray, &self.scene.pick_targets)?;
        log::debug!("picked artwork {} at distance {:.2}", hit.slot_index, hit.distance);
        self.focused_slot = Some(hit.slot_index);
        self.rig.focus_on_hit(&hit);
        Some(hit)
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Main Command Encoder"),
        });

        self.renderer.render_scene(
            &self.queue, &mut encoder, &view,
            &self.camera, &self.rig.pose, &self.scene.lighting,
        );

        let status = UiStatus {
            mode: &self.rig.mode,
            position: self.rig.pose.position,
            yaw: self.rig.pose.yaw,
            slot_count: self.scene.slots.len(),
            textures_loaded: self.textures.iter().filter(|(_, h)| h.status() == TextureStatus::Loaded).count(),
            textures_failed: self.textures.iter().filter(|(_, h)| h.status() == TextureStatus::Failed).count(),
            focused_slot: self.focused_slot,
            fps: self.fps,
        };
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| { build_ui(ctx, &status); });
        self.egui_state.handle_platform_output(window, full_output.platform_output);
        let tris = self.egui_ctx.tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.egui_renderer.update_buffers(&self.device, &self.queue, &mut encoder, &tris, &screen_descriptor);
        {
            let mut gui_render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view, resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None, occlusion_query_set: None, timestamp_writes: None,
            });
            self.egui_renderer.render(&mut gui_render_pass, &tris, &screen_descriptor);
        }
        for tex_id in &full_output.textures_delta.free { self.egui_renderer.free_texture(tex_id); }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();
        Ok(())
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        if self.egui_state.on_window_event(window, event).consumed { return true; }
        if self.input.handle_window_event(event) { return true; }
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Some(Vec2::new(position.x as f32, position.y as f32));
                false
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_position = None;
                false
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                if let Some(pointer) = self.cursor_position {
                    self.select_at(pointer);
                }
                true
            }
            _ => false,
        }
    }
}
