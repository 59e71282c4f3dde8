pub mod app;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;
