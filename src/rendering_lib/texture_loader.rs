// src/rendering_lib/texture_loader.rs
//
// Artwork images load off the frame loop. Each slot gets a TextureHandle that
// the app polls once per tick; until it resolves the slot keeps its placeholder.

use tokio::sync::oneshot::{self, error::TryRecvError};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read image {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to fetch image {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("loader for {path} went away before finishing")]
    Cancelled { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn decode_image(bytes: &[u8], path: &str) -> Result<DecodedImage, TextureError> {
    let img = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
        path: path.to_string(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage { width, height, rgba: rgba.into_raw() })
}

type LoadResult = Result<DecodedImage, TextureError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStatus {
    Pending,
    Loaded,
    Failed,
}

/// Promise-like handle for one artwork image. Resolves at most once.
#[derive(Debug)]
pub struct TextureHandle {
    path: String,
    receiver: Option<oneshot::Receiver<LoadResult>>,
    status: TextureStatus,
}

impl TextureHandle {
    pub fn channel(path: &str) -> (oneshot::Sender<LoadResult>, Self) {
        let (tx, rx) = oneshot::channel();
        let handle = Self {
            path: path.to_string(),
            receiver: Some(rx),
            status: TextureStatus::Pending,
        };
        (tx, handle)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status(&self) -> TextureStatus {
        self.status
    }

    /// Yields the load result the first time it is available, `None` otherwise.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let receiver = self.receiver.as_mut()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(TextureError::Cancelled { path: self.path.clone() }),
        };
        self.receiver = None;
        self.status = if result.is_ok() { TextureStatus::Loaded } else { TextureStatus::Failed };
        Some(result)
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        pub struct TextureLoader;

        impl TextureLoader {
            pub fn new() -> Self {
                Self
            }

            pub fn load(&self, path: &str) -> TextureHandle {
                let (tx, handle) = TextureHandle::channel(path);
                let path = path.to_string();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = fetch_bytes(&path).await.and_then(|bytes| decode_image(&bytes, &path));
                    let _ = tx.send(result);
                });
                handle
            }
        }

        impl Default for TextureLoader {
            fn default() -> Self {
                Self::new()
            }
        }

        fn fetch_error(path: &str, reason: impl std::fmt::Debug) -> TextureError {
            TextureError::Fetch { path: path.to_string(), reason: format!("{reason:?}") }
        }

        async fn fetch_bytes(path: &str) -> Result<Vec<u8>, TextureError> {
            let window = web_sys::window().ok_or_else(|| fetch_error(path, "no window"))?;
            let response = JsFuture::from(window.fetch_with_str(path))
                .await
                .map_err(|e| fetch_error(path, e))?;
            let response: web_sys::Response = response.dyn_into().map_err(|e| fetch_error(path, e))?;
            if !response.ok() {
                return Err(fetch_error(path, format!("HTTP {}", response.status())));
            }
            let buffer = JsFuture::from(response.array_buffer().map_err(|e| fetch_error(path, e))?)
                .await
                .map_err(|e| fetch_error(path, e))?;
            Ok(js_sys::Uint8Array::new(&buffer).to_vec())
        }
    } else {
        pub struct TextureLoader {
            runtime: tokio::runtime::Handle,
        }

        impl TextureLoader {
            pub fn new(runtime: tokio::runtime::Handle) -> Self {
                Self { runtime }
            }

            pub fn load(&self, path: &str) -> TextureHandle {
                let (tx, handle) = TextureHandle::channel(path);
                let path = path.to_string();
                self.runtime.spawn_blocking(move || {
                    let result = std::fs::read(&path)
                        .map_err(|source| TextureError::Io { path: path.clone(), source })
                        .and_then(|bytes| decode_image(&bytes, &path));
                    // The app may have shut down; nobody to tell.
                    let _ = tx.send(result);
                });
                handle
            }
        }
    }
}
