// src/lib.rs

pub mod app;
pub mod engine_lib;
pub mod gallery_scene;
pub mod rendering_lib;
pub mod timing;
pub mod ui;

use std::sync::Arc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::WindowBuilder,
};

use app::GalleryApp;
use engine_lib::config::GalleryConfig;
use timing::FrameClock;

pub const CONFIG_ENV_VAR: &str = "GALLERY_CONFIG";

/// Finds the config file named on the command line or in `GALLERY_CONFIG`.
#[cfg(not(target_arch = "wasm32"))]
fn config_path() -> Option<std::path::PathBuf> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
        .map(std::path::PathBuf::from)
}

pub fn load_config() -> GalleryConfig {
    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = config_path() {
        return match GalleryConfig::load(&path) {
            Ok(config) => {
                log::info!("loaded gallery config from {}", path.display());
                config
            }
            Err(err) => {
                log::error!("{}; falling back to defaults", err);
                GalleryConfig::default()
            }
        };
    }
    GalleryConfig::default()
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if let Err(err) = console_log::init_with_level(log::Level::Warn) {
                web_sys::console::error_1(&format!("logger init failed: {err}").into());
            }
        } else {
            env_logger::init();
        }
    }

    let gallery_config = load_config();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("could not create event loop: {}", err);
            return;
        }
    };
    let window = match WindowBuilder::new()
        .with_title("Cylinder Gallery")
        .with_inner_size(winit::dpi::LogicalSize::new(1024, 768))
        .build(&event_loop)
    {
        Ok(window) => Arc::new(window),
        Err(err) => {
            log::error!("could not open window: {}", err);
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        let attached = web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("wasm-viewport")?;
                let canvas = web_sys::Element::from(window.canvas()?);
                dst.append_child(&canvas).ok()?;
                Some(())
            });
        if attached.is_none() {
            log::error!("couldn't append canvas to #wasm-viewport");
            return;
        }
    }

    let mut app_state = match GalleryApp::new(window.clone(), gallery_config).await {
        Ok(app) => app,
        Err(err) => {
            log::error!("failed to start gallery: {}", err);
            return;
        }
    };
    let mut clock = FrameClock::new();

    let result = event_loop.run(move |event, target: &EventLoopWindowTarget<()>| {
        target.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, window_id } if window_id == window.id() => {
                if !app_state.handle_window_event(event, &window) {
                    match event {
                        WindowEvent::CloseRequested => target.exit(),
                        WindowEvent::Resized(physical_size) => app_state.resize(*physical_size),
                        WindowEvent::RedrawRequested => { /* In AboutToWait */ }
                        WindowEvent::Focused(is_focused) => app_state.set_focused(*is_focused),
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                let dt = clock.tick();
                app_state.set_fps(clock.fps);
                app_state.update(dt);
                match app_state.render(&window) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        app_state.resize(app_state.get_size());
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory, exiting");
                        target.exit();
                    }
                    Err(e) => log::warn!("surface error: {:?}", e),
                }

                if !target.exiting() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    });
    if let Err(err) = result {
        log::error!("event loop terminated: {}", err);
    }
}
