// src/timing.rs

// Longest step fed to the glide; keeps a stalled tab from skipping it entirely.
const MAX_FRAME_DT: f32 = 0.25;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        fn now_secs() -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now() / 1000.0)
                .unwrap_or(0.0)
        }
    } else {
        fn now_secs() -> f64 {
            use std::sync::OnceLock;
            static START: OnceLock<std::time::Instant> = OnceLock::new();
            START.get_or_init(std::time::Instant::now).elapsed().as_secs_f64()
        }
    }
}

pub struct FrameClock {
    last: Option<f64>,
    frame_count: u32,
    fps_window_start: f64,
    pub fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            frame_count: 0,
            fps_window_start: now_secs(),
            fps: 0.0,
        }
    }

    /// Seconds since the previous call.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(now_secs())
    }

    fn tick_at(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((now - last) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 1.0 / 60.0,
        };
        self.last = Some(now);

        self.frame_count = self.frame_count.saturating_add(1);
        let window = now - self.fps_window_start;
        if window >= 0.5 {
            self.fps = (self.frame_count as f64 / window) as f32;
            self.frame_count = 0;
            self.fps_window_start = now;
        }
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
