//! Drawing surfaces and the name-to-surface registry.
//!
//! A surface is a fixed-size RGBA pixmap. The host registers surfaces by
//! name; engines resolve their surface through the registry at
//! construction, and a miss silently disables the engine instead of
//! erroring. Pixel reads go through `to_rgba`, which converts the
//! pixmap's premultiplied data back to straight alpha.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tiny_skia::{Color, Pixmap};
use tracing::debug;

use crate::error::Error;

/// Fixed-size RGBA raster backed by a tiny-skia pixmap.
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        let pixmap = Pixmap::new(width, height).ok_or(Error::InvalidSurface { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Copy of the pixels with premultiplied alpha undone, row-major RGBA.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.data().chunks_exact(4) {
            let a = px[3];
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let alpha = f32::from(a) / 255.0;
            out.push((f32::from(px[0]) / alpha).min(255.0) as u8);
            out.push((f32::from(px[1]) / alpha).min(255.0) as u8);
            out.push((f32::from(px[2]) / alpha).min(255.0) as u8);
            out.push(a);
        }
        out
    }

    /// Encode the current frame as a PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<(), Error> {
        let rgba = self.to_rgba();
        image::save_buffer(
            path,
            &rgba,
            self.width(),
            self.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|source| Error::Export {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Shared handle to a registered surface.
#[derive(Clone)]
pub struct SurfaceHandle {
    inner: Arc<Mutex<Surface>>,
}

impl SurfaceHandle {
    pub fn with<R>(&self, f: impl FnOnce(&mut Surface) -> R) -> R {
        f(&mut self.inner.lock().unwrap())
    }

    pub fn width(&self) -> u32 {
        self.inner.lock().unwrap().width()
    }

    pub fn height(&self) -> u32 {
        self.inner.lock().unwrap().height()
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        self.inner.lock().unwrap().to_rgba()
    }

    pub fn save_png(&self, path: &Path) -> Result<(), Error> {
        self.inner.lock().unwrap().save_png(path)
    }
}

/// Maps surface names to shared surfaces, the way the host page exposes
/// named canvases.
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: Mutex<HashMap<String, SurfaceHandle>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a surface. Dimensions are validated here;
    /// duplicate names are rejected so two engines cannot fight over one
    /// raster by accident.
    pub fn register(&self, name: &str, width: u32, height: u32) -> Result<SurfaceHandle, Error> {
        let surface = Surface::new(width, height)?;
        let handle = SurfaceHandle {
            inner: Arc::new(Mutex::new(surface)),
        };
        let mut map = self.surfaces.lock().unwrap();
        if map.contains_key(name) {
            return Err(Error::DuplicateSurface(name.to_string()));
        }
        debug!(name, width, height, "registered surface");
        map.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    pub fn get(&self, name: &str) -> Option<SurfaceHandle> {
        self.surfaces.lock().unwrap().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Surface::new(0, 64),
            Err(Error::InvalidSurface { width: 0, height: 64 })
        ));
        assert!(Surface::new(64, 0).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let registry = SurfaceRegistry::new();
        registry.register("avatar-canvas", 32, 32).unwrap();
        assert!(matches!(
            registry.register("avatar-canvas", 32, 32),
            Err(Error::DuplicateSurface(_))
        ));
    }

    #[test]
    fn lookup_misses_return_none() {
        let registry = SurfaceRegistry::new();
        assert!(registry.get("avatar-canvas").is_none());
    }

    #[test]
    fn rgba_export_has_full_coverage() {
        let surface = Surface::new(3, 2).unwrap();
        let rgba = surface.to_rgba();
        assert_eq!(rgba.len(), 3 * 2 * 4);
        assert!(rgba.iter().all(|&b| b == 0), "fresh surface is transparent");
    }

    #[test]
    fn unpremultiply_restores_straight_alpha() {
        let mut surface = Surface::new(1, 1).unwrap();
        // Half-transparent red: premultiplied storage halves the channel.
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(255, 0, 0, 128);
        if let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, 1.0, 1.0) {
            surface.pixmap_mut().fill_rect(
                rect,
                &paint,
                tiny_skia::Transform::identity(),
                None,
            );
        }
        let rgba = surface.to_rgba();
        assert_eq!(rgba[3], 128);
        assert!(rgba[0] > 250, "red channel should be restored, got {}", rgba[0]);
    }

    #[test]
    fn png_round_trip_preserves_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let surface = Surface::new(24, 32).unwrap();
        surface.save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 24);
        assert_eq!(decoded.height(), 32);
    }
}
