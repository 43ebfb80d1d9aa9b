//! A turntable viewer for a single glTF model: fit and frame the model,
//! spin it slowly, orbit with the pointer, and show it fullscreen either
//! through the platform API or on a fixed-resolution panel.

pub mod bounds;
pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod fit;
pub mod framing;
pub mod fullscreen;
pub mod input;
pub mod loader;
pub mod render;
pub mod render_loop;
pub mod scene;
pub mod stats;
pub mod surface;
pub mod viewer;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
pub mod ui;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

pub use config::ViewerConfig;
pub use error::ViewerError;
pub use viewer::Viewer;
