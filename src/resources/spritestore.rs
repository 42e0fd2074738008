//! Sprite resource cache.
//!
//! A sprite is a texture reference plus 9-slice border metadata, identified
//! by a canonicalized key. The [`SpriteStore`] is the single source of truth
//! for "is this sprite already loaded": acquiring a key that is live returns
//! the same instance, and a sprite stays alive exactly as long as someone
//! holds a [`SpriteHandle`] to it (clone = add-ref, drop = release).
//!
//! Asset-backed sprites own their texture; when the last handle drops, the
//! texture is scheduled on the
//! [`DeferredTextureReleaser`](crate::resources::deferredrelease::DeferredTextureReleaser)
//! rather than destroyed in place, because previously recorded draw commands
//! may still reference it. Render-target-backed sprites never own a texture;
//! they re-resolve it by name on every access.
//!
//! The store is built for single-threaded acquire/release/render use.
//! Handles are `Send + Sync` so they can sit in ECS components, but the
//! store itself is not meant for concurrent mutation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use bevy_ecs::prelude::Resource;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::resources::deferredrelease::DeferredTextureReleaser;
use crate::resources::spriteborders::{self, Borders, SPRITE_EXTENSION};
use crate::resources::texturestore::{TextureId, TextureSystem};

/// Source image extensions tried, in priority order, when resolving a
/// side-car path to its image. First existing file wins.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["tif", "jpg", "jpeg", "tga", "bmp", "png", "gif"];

/// Reasons an acquire can fail. Both are soft failures: they are logged as
/// warnings and surface to the caller as "no sprite", never as a panic.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// No image file could be resolved for the requested path.
    #[error("no image file found for \"{0}\"")]
    ResourceNotFound(String),
    /// The image file exists but the texture system rejected it.
    #[error("texture failed to load from \"{0}\"")]
    TextureLoadFailed(PathBuf),
}

/// Canonicalize a path or render-target name into a cache key: path
/// separators normalized to `/`, leading `./` stripped, and lower-cased on
/// platforms with case-insensitive file systems.
pub fn canonical_key(path: &str) -> String {
    let mut key = path.trim().replace('\\', "/");
    while let Some(rest) = key.strip_prefix("./") {
        key = rest.to_string();
    }
    if cfg!(windows) {
        key.make_ascii_lowercase();
    }
    key
}

enum Backing {
    /// Asset-backed: the sprite owns this texture and schedules its
    /// destruction on release.
    Owned(TextureId),
    /// Render-target-backed: resolved by name on every access, may be absent.
    RenderTarget(String),
}

struct ReleaseMsg {
    key: Arc<str>,
    texture: Option<TextureId>,
}

/// The shared sprite entity. Lives behind an `Arc`; the registry keeps a
/// `Weak` back-reference so it never extends the lifetime.
pub struct SpriteData {
    key: Arc<str>,
    borders: Mutex<Borders>,
    backing: Backing,
    release_tx: Sender<ReleaseMsg>,
}

impl Drop for SpriteData {
    fn drop(&mut self) {
        let texture = match self.backing {
            Backing::Owned(id) => Some(id),
            Backing::RenderTarget(_) => None,
        };
        // store may already be gone during shutdown, then nobody sweeps
        let _ = self.release_tx.send(ReleaseMsg {
            key: self.key.clone(),
            texture,
        });
    }
}

/// Shared-ownership handle to a cached sprite.
///
/// Cloning increments the reference count, dropping decrements it; when the
/// last handle drops the sprite is released (registry entry swept, owned
/// texture queued for deferred destruction).
#[derive(Clone)]
pub struct SpriteHandle {
    data: Arc<SpriteData>,
}

impl SpriteHandle {
    /// Canonical cache key of this sprite.
    pub fn key(&self) -> &str {
        &self.data.key
    }

    pub fn is_render_target(&self) -> bool {
        matches!(self.data.backing, Backing::RenderTarget(_))
    }

    /// Current border metadata.
    pub fn borders(&self) -> Borders {
        *self.data.borders.lock().expect("borders lock poisoned")
    }

    /// Replace the border metadata in place. Editing tools use this; it does
    /// not affect the sprite's identity or registry membership.
    pub fn set_borders(&self, borders: Borders) {
        *self.data.borders.lock().expect("borders lock poisoned") = borders;
    }

    /// Resolve the backing texture, if any. Asset-backed sprites return
    /// their owned texture; render-target-backed sprites look the target up
    /// by name, which may fail if it has not been created this session.
    pub fn texture(&self, textures: &dyn TextureSystem) -> Option<TextureId> {
        match &self.data.backing {
            Backing::Owned(id) => Some(*id),
            Backing::RenderTarget(name) => textures.find_render_target(name),
        }
    }

    /// Texture dimensions in pixels, `(0, 0)` when no texture resolves.
    pub fn size(&self, textures: &dyn TextureSystem) -> (u32, u32) {
        self.texture(textures)
            .and_then(|id| textures.size(id))
            .unwrap_or((0, 0))
    }

    /// Whether two handles refer to the same cached instance.
    pub fn same_instance(&self, other: &SpriteHandle) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl std::fmt::Debug for SpriteHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteHandle")
            .field("key", &self.data.key)
            .field("render_target", &self.is_render_target())
            .finish()
    }
}

/// Process-wide map from canonical key to the live sprite with that key.
///
/// Lifecycle: [`SpriteStore::new`] on startup, [`SpriteStore::shutdown`]
/// after all holders have released their sprites. [`SpriteStore::sweep`]
/// must run once per frame (before the releaser drain) to retire released
/// entries.
#[derive(Resource)]
pub struct SpriteStore {
    registry: FxHashMap<Arc<str>, Weak<SpriteData>>,
    release_tx: Sender<ReleaseMsg>,
    release_rx: Receiver<ReleaseMsg>,
}

impl SpriteStore {
    pub fn new() -> Self {
        let (release_tx, release_rx) = unbounded();
        Self {
            registry: FxHashMap::default(),
            release_tx,
            release_rx,
        }
    }

    /// Look up a live sprite by path or name without loading anything.
    pub fn find(&self, path_or_name: &str) -> Option<SpriteHandle> {
        self.find_key(&canonical_key(path_or_name))
    }

    fn find_key(&self, key: &str) -> Option<SpriteHandle> {
        let data = self.registry.get(key)?.upgrade()?;
        Some(SpriteHandle { data })
    }

    /// Acquire a sprite for a content path (an image path, a `.sprite`
    /// side-car path, or a bare stem).
    ///
    /// On a cache hit this returns the existing instance. On a miss the
    /// texture is loaded, border metadata is read from the side-car file if
    /// one exists, and the new sprite is registered under the canonicalized
    /// side-car key. Failures are logged and produce `None`; the caller is
    /// responsible for a visual fallback.
    pub fn acquire(
        &mut self,
        textures: &mut dyn TextureSystem,
        path: &str,
    ) -> Option<SpriteHandle> {
        match self.try_acquire(textures, path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("sprite acquire failed: {}", e);
                None
            }
        }
    }

    fn try_acquire(
        &mut self,
        textures: &mut dyn TextureSystem,
        path: &str,
    ) -> Result<SpriteHandle, AcquireError> {
        let (key, image_path) = resolve_source(path)?;

        if let Some(handle) = self.find_key(&key) {
            debug!("sprite cache hit: {}", key);
            return Ok(handle);
        }

        let texture = textures
            .load(&image_path)
            .filter(|&id| textures.is_loaded(id))
            .ok_or_else(|| AcquireError::TextureLoadFailed(image_path.clone()))?;

        let borders = spriteborders::load_sidecar(Path::new(&key)).unwrap_or_default();

        debug!(
            "sprite loaded: {} (image {}, texture {:?})",
            key,
            image_path.display(),
            texture
        );
        Ok(self.register(key, Backing::Owned(texture), borders))
    }

    /// Acquire a sprite backed by a named render target. Never fails; the
    /// texture is resolved lazily by name on every render or query, and the
    /// renderer degrades to a white quad while the target does not exist.
    pub fn acquire_render_target(&mut self, name: &str) -> SpriteHandle {
        let key = canonical_key(name);
        if let Some(handle) = self.find_key(&key) {
            return handle;
        }
        self.register(key, Backing::RenderTarget(name.to_string()), Borders::default())
    }

    fn register(&mut self, key: String, backing: Backing, borders: Borders) -> SpriteHandle {
        let key: Arc<str> = key.into();
        let data = Arc::new(SpriteData {
            key: key.clone(),
            borders: Mutex::new(borders),
            backing,
            release_tx: self.release_tx.clone(),
        });
        let previous = self.registry.insert(key, Arc::downgrade(&data));
        // replacing a dead entry is normal; replacing a live one means the
        // caller skipped the find() that the acquire path always performs
        debug_assert!(
            previous.is_none_or(|weak| weak.upgrade().is_none()),
            "sprite registered twice for a live key"
        );
        SpriteHandle { data }
    }

    /// Retire released sprites: remove dead registry entries and forward
    /// owned textures to the deferred releaser. Runs once per frame.
    pub fn sweep(&mut self, releaser: &DeferredTextureReleaser) -> usize {
        let mut removed = 0;
        while let Ok(msg) = self.release_rx.try_recv() {
            if let Some(id) = msg.texture {
                releaser.schedule(id);
            }
            // the key may have been re-acquired since the release was queued,
            // in which case the registry now holds a live entry we must keep
            if let Some(weak) = self.registry.get(&msg.key)
                && weak.upgrade().is_none()
            {
                self.registry.remove(&msg.key);
                removed += 1;
            }
        }
        removed
    }

    /// Number of registered sprites (live or awaiting sweep).
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Whether a live sprite exists for this path or name.
    pub fn contains(&self, path_or_name: &str) -> bool {
        self.find(path_or_name).is_some()
    }

    /// Teardown: sweep pending releases, then warn about sprites that are
    /// still referenced. Leaked references are a caller bug but never a
    /// crash.
    pub fn shutdown(&mut self, releaser: &DeferredTextureReleaser) {
        self.sweep(releaser);
        for (key, weak) in &self.registry {
            if weak.upgrade().is_some() {
                warn!("sprite \"{}\" still referenced at shutdown", key);
            }
        }
        self.registry.clear();
    }
}

impl Default for SpriteStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a requested path into the cache key (canonicalized side-car path)
/// and the image file to load.
///
/// A path with a known image extension is used directly; anything else is
/// treated as a side-car-style reference and the image is searched among
/// sibling files over [`IMAGE_EXTENSIONS`] in priority order.
fn resolve_source(path: &str) -> Result<(String, PathBuf), AcquireError> {
    let canonical = canonical_key(path);
    let ext = Path::new(&canonical)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let stem = if ext.is_empty() {
        canonical.as_str()
    } else {
        &canonical[..canonical.len() - ext.len() - 1]
    };
    let key = format!("{}.{}", stem, SPRITE_EXTENSION);

    let image_path = if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        let image = PathBuf::from(&canonical);
        if !image.exists() {
            return Err(AcquireError::ResourceNotFound(canonical));
        }
        image
    } else {
        IMAGE_EXTENSIONS
            .iter()
            .map(|e| PathBuf::from(format!("{}.{}", stem, e)))
            .find(|candidate| candidate.exists())
            .ok_or(AcquireError::ResourceNotFound(canonical))?
    };

    Ok((key, image_path))
}
