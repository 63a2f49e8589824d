//! Library error types.
//!
//! The animation core itself never fails: a missing surface disables the
//! engine, out-of-range inputs are clamped, unknown emotion tags fall back
//! to neutral. Errors exist only at the edges that touch the filesystem or
//! validate surface geometry.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Surfaces must have non-zero pixel dimensions.
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    /// A surface name can only be registered once per registry.
    #[error("surface '{0}' is already registered")]
    DuplicateSurface(String),

    #[error("failed to encode frame to {path}")]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to serialize config")]
    ConfigSerialize(#[source] serde_json::Error),

    #[error("failed to write config to {path}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
