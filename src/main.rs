// src/main.rs

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        // The browser entry point is `run`, started by wasm-bindgen.
        fn main() {}
    } else {
        #[tokio::main]
        async fn main() {
            cylinder_gallery::run().await;
        }
    }
}
