//! Visage Engine: procedural facial animation for a stylized talking avatar.
//!
//! The engine owns an expressive state (talking flag, mouth amplitude,
//! emotion tag, gaze offset), advances a blink timer once per frame, and
//! redraws a CPU raster every tick for as long as the loop runs. Callers
//! drive it through clamped setters; drawing is a pure function of the
//! state snapshot plus a monotonic frame counter.

pub mod avatar;
pub mod config;
pub mod error;
pub mod render;

pub use avatar::engine::AvatarEngine;
pub use config::EngineConfig;
pub use error::Error;
pub use render::surface::{Surface, SurfaceHandle, SurfaceRegistry};
