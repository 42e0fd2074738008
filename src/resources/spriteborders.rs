//! 9-slice border metadata and its side-car file format.
//!
//! A sprite's borders divide its texture into a 3x3 grid: the four corner
//! cells render at fixed pixel size, the edge cells stretch along one axis
//! and the center stretches along both. Borders live in a small JSON
//! side-car file next to the image, sharing its stem with a `.sprite`
//! extension:
//!
//! ```json
//! {
//!   "version": 2,
//!   "left": 0.1,
//!   "top": 0.2,
//!   "right": 0.9,
//!   "bottom": 0.8
//! }
//! ```
//!
//! Side-car files are optional; a sprite without one gets the default
//! no-border value. A file written by a different schema version is ignored
//! (with a warning) rather than reinterpreted.

use std::fs;
use std::io;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

/// Schema version written to and expected from side-car files.
pub const SPRITE_FILE_VERSION: u32 = 2;

/// Extension of side-car metadata files (and of sprite cache keys).
pub const SPRITE_EXTENSION: &str = "sprite";

/// Fractional 9-slice insets in texture space.
///
/// `left` and `top` are distances from the left/top edge; `right` and
/// `bottom` are positions measured from the same origin, so the default
/// `(0, 0, 1, 1)` means zero-width borders on all sides. `left < right` and
/// `top < bottom` is expected but not enforced here; the renderer clamps.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Borders {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Borders {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether these are the default zero-width borders. A sliced image with
    /// zero-width borders renders identically to a stretched one.
    pub fn is_zero_width(&self) -> bool {
        *self == Self::default()
    }

    /// Right border width as a fraction of texture width.
    pub fn right_inset(&self) -> f32 {
        1.0 - self.right
    }

    /// Bottom border height as a fraction of texture height.
    pub fn bottom_inset(&self) -> f32 {
        1.0 - self.bottom
    }
}

impl Default for Borders {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// On-disk form of the side-car document.
#[derive(Serialize, Deserialize)]
struct SpriteFile {
    version: u32,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

/// Read border metadata from the side-car file at `path`.
///
/// Returns `None` (caller keeps defaults) when the file is absent, when it
/// cannot be parsed, or when its version differs from
/// [`SPRITE_FILE_VERSION`]. Only the absent case is silent; the others log a
/// warning. None of these block sprite creation.
pub fn load_sidecar(path: &Path) -> Option<Borders> {
    if !path.exists() {
        return None;
    }
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("failed to read sprite file {}: {}", path.display(), e);
            return None;
        }
    };
    let file: SpriteFile = match serde_json::from_str(&text) {
        Ok(file) => file,
        Err(e) => {
            warn!("failed to parse sprite file {}: {}", path.display(), e);
            return None;
        }
    };
    if file.version != SPRITE_FILE_VERSION {
        warn!(
            "sprite file {} has version {} (expected {}), using default borders",
            path.display(),
            file.version,
            SPRITE_FILE_VERSION
        );
        return None;
    }
    Some(Borders::new(file.left, file.top, file.right, file.bottom))
}

/// Write border metadata to the side-car file at `path`, creating or
/// replacing it. Used by editing tools.
pub fn save_sidecar(path: &Path, borders: &Borders) -> io::Result<()> {
    let file = SpriteFile {
        version: SPRITE_FILE_VERSION,
        left: borders.left,
        top: borders.top,
        right: borders.right,
        bottom: borders.bottom,
    };
    let text = serde_json::to_string_pretty(&file).map_err(io::Error::other)?;
    fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_width() {
        assert!(Borders::default().is_zero_width());
        assert!(!Borders::new(0.1, 0.0, 1.0, 1.0).is_zero_width());
    }

    #[test]
    fn test_insets() {
        let b = Borders::new(0.1, 0.2, 0.9, 0.8);
        assert!((b.right_inset() - 0.1).abs() < 1e-6);
        assert!((b.bottom_inset() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn sidecar_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("button.sprite");
        let borders = Borders::new(0.1, 0.2, 0.9, 0.8);

        save_sidecar(&path, &borders).unwrap();
        assert_eq!(load_sidecar(&path), Some(borders));
    }

    #[test]
    fn sidecar_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_sidecar(&dir.path().join("missing.sprite")), None);
    }

    #[test]
    fn sidecar_version_mismatch_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.sprite");
        std::fs::write(
            &path,
            r#"{"version": 1, "left": 0.1, "top": 0.1, "right": 0.9, "bottom": 0.9}"#,
        )
        .unwrap();
        assert_eq!(load_sidecar(&path), None);
    }

    #[test]
    fn sidecar_garbage_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.sprite");
        std::fs::write(&path, "not json at all").unwrap();
        assert_eq!(load_sidecar(&path), None);
    }
}
