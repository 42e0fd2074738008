//! Texture collaborator interface and the file-backed store.
//!
//! The sprite cache does not own texture decoding or GPU upload; it only
//! needs the small surface captured by [`TextureSystem`]: load by path,
//! loaded check, dimensions, render-target lookup by name, and destroy.
//! [`ImageTextureStore`] is the file-backed implementation used by the
//! `uislice` binary; it probes dimensions from image headers and never keeps
//! pixel data around.

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;

/// Opaque handle to a 2D texture held by a [`TextureSystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// The interface the texture resource system presents to the sprite cache.
///
/// Destruction of a texture that may still be referenced by in-flight draw
/// commands must go through
/// [`DeferredTextureReleaser`](crate::resources::deferredrelease::DeferredTextureReleaser),
/// never straight to [`TextureSystem::destroy`].
pub trait TextureSystem: Send + Sync + 'static {
    /// Load the texture at `path`. Returns `None` if the file cannot be
    /// read or decoded.
    fn load(&mut self, path: &Path) -> Option<TextureId>;

    /// Whether `id` currently refers to a live texture.
    fn is_loaded(&self, id: TextureId) -> bool;

    /// Dimensions in pixels, if the texture is live.
    fn size(&self, id: TextureId) -> Option<(u32, u32)>;

    /// Look up a render target by name. Render targets come and go as the
    /// frame graph runs, so callers re-resolve on every access.
    fn find_render_target(&self, name: &str) -> Option<TextureId>;

    /// Destroy a texture immediately.
    fn destroy(&mut self, id: TextureId);
}

struct TextureEntry {
    path: PathBuf,
    width: u32,
    height: u32,
}

/// File-backed [`TextureSystem`] keyed by incrementing ids.
///
/// Dimensions are read from the image header via the `image` crate; the
/// pixel payload is left on disk for whatever backend consumes the draw
/// list.
#[derive(Resource, Default)]
pub struct ImageTextureStore {
    textures: FxHashMap<TextureId, TextureEntry>,
    render_targets: FxHashMap<String, TextureId>,
    next_id: u32,
}

impl ImageTextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id(&mut self) -> TextureId {
        self.next_id += 1;
        TextureId(self.next_id)
    }

    /// Register a named render target of the given size and return its id.
    pub fn create_render_target(&mut self, name: &str, width: u32, height: u32) -> TextureId {
        let id = self.mint_id();
        self.textures.insert(
            id,
            TextureEntry {
                path: PathBuf::new(),
                width,
                height,
            },
        );
        self.render_targets.insert(name.to_string(), id);
        id
    }

    /// Source path of a loaded texture, empty for render targets.
    pub fn path(&self, id: TextureId) -> Option<&Path> {
        self.textures.get(&id).map(|e| e.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureSystem for ImageTextureStore {
    fn load(&mut self, path: &Path) -> Option<TextureId> {
        let (width, height) = match image::image_dimensions(path) {
            Ok(dims) => dims,
            Err(e) => {
                warn!("failed to read image dimensions for {}: {}", path.display(), e);
                return None;
            }
        };
        let id = self.mint_id();
        self.textures.insert(
            id,
            TextureEntry {
                path: path.to_path_buf(),
                width,
                height,
            },
        );
        Some(id)
    }

    fn is_loaded(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id)
    }

    fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&id).map(|e| (e.width, e.height))
    }

    fn find_render_target(&self, name: &str) -> Option<TextureId> {
        self.render_targets.get(name).copied()
    }

    fn destroy(&mut self, id: TextureId) {
        self.textures.remove(&id);
        self.render_targets.retain(|_, rt| *rt != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_fails() {
        let mut store = ImageTextureStore::new();
        assert!(store.load(Path::new("does/not/exist.png")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_render_target_roundtrip() {
        let mut store = ImageTextureStore::new();
        let id = store.create_render_target("minimap", 128, 128);
        assert_eq!(store.find_render_target("minimap"), Some(id));
        assert_eq!(store.size(id), Some((128, 128)));
        assert!(store.is_loaded(id));
    }

    #[test]
    fn test_destroy_unregisters_render_target() {
        let mut store = ImageTextureStore::new();
        let id = store.create_render_target("minimap", 64, 64);
        store.destroy(id);
        assert!(!store.is_loaded(id));
        assert_eq!(store.find_render_target("minimap"), None);
    }
}
