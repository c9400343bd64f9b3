//! Simulation setup: executable-image loading.

/// ELF32 image loader.
pub mod loader;

pub use loader::{load_image, load_image_bytes};
