//! Integration tests for the sprite cache: identity, reference counting,
//! side-car resolution, and deferred texture release.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;

use uislice::components::uiimage::UiImage;
use uislice::components::uitransform::UiTransform;
use uislice::resources::deferredrelease::DeferredTextureReleaser;
use uislice::resources::drawlist::DrawList;
use uislice::resources::spriteborders::Borders;
use uislice::resources::spritestore::SpriteStore;
use uislice::resources::texturestore::{TextureId, TextureSystem};
use uislice::systems::resourcerelease::{drain_deferred_textures, sweep_sprite_releases};

#[derive(Default)]
struct StubState {
    sizes: HashMap<PathBuf, (u32, u32)>,
    loaded: HashMap<TextureId, (u32, u32)>,
    render_targets: HashMap<String, TextureId>,
    loads: Vec<PathBuf>,
    destroyed: Vec<TextureId>,
    next_id: u32,
}

/// Texture collaborator double: only paths registered up front load, and
/// every destroy is recorded for inspection.
#[derive(Resource, Default, Clone)]
struct StubTextures {
    state: Arc<Mutex<StubState>>,
}

impl StubTextures {
    fn register_image(&self, path: impl Into<PathBuf>, width: u32, height: u32) {
        self.state
            .lock()
            .unwrap()
            .sizes
            .insert(path.into(), (width, height));
    }

    fn create_render_target(&self, name: &str, width: u32, height: u32) -> TextureId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = TextureId(state.next_id);
        state.loaded.insert(id, (width, height));
        state.render_targets.insert(name.to_string(), id);
        id
    }

    fn destroyed(&self) -> Vec<TextureId> {
        self.state.lock().unwrap().destroyed.clone()
    }

    fn loads(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().loads.clone()
    }
}

impl TextureSystem for StubTextures {
    fn load(&mut self, path: &Path) -> Option<TextureId> {
        let mut state = self.state.lock().unwrap();
        state.loads.push(path.to_path_buf());
        let &size = state.sizes.get(path)?;
        state.next_id += 1;
        let id = TextureId(state.next_id);
        state.loaded.insert(id, size);
        Some(id)
    }

    fn is_loaded(&self, id: TextureId) -> bool {
        self.state.lock().unwrap().loaded.contains_key(&id)
    }

    fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.state.lock().unwrap().loaded.get(&id).copied()
    }

    fn find_render_target(&self, name: &str) -> Option<TextureId> {
        self.state.lock().unwrap().render_targets.get(name).copied()
    }

    fn destroy(&mut self, id: TextureId) {
        let mut state = self.state.lock().unwrap();
        state.loaded.remove(&id);
        state.destroyed.push(id);
    }
}

/// Create an empty image file and register its size with the stub.
fn make_image(dir: &Path, stub: &StubTextures, name: &str, width: u32, height: u32) -> String {
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    stub.register_image(&path, width, height);
    path.display().to_string()
}

#[test]
fn acquiring_same_path_twice_returns_same_instance() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let path = make_image(dir.path(), &stub, "button.tif", 256, 64);

    let mut store = SpriteStore::new();
    let a = store.acquire(&mut textures, &path).unwrap();
    let b = store.acquire(&mut textures, &path).unwrap();

    assert!(a.same_instance(&b));
    assert_eq!(store.len(), 1);
    assert!(a.key().ends_with("button.sprite"));
    assert_eq!(a.size(&textures), (256, 64));
    // the image was loaded once, not per acquire
    assert_eq!(stub.loads().len(), 1);
}

#[test]
fn n_acquires_then_n_drops_schedule_texture_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let path = make_image(dir.path(), &stub, "icon.png", 32, 32);

    let mut store = SpriteStore::new();
    let releaser = DeferredTextureReleaser::new();

    let a = store.acquire(&mut textures, &path).unwrap();
    let b = a.clone();
    let c = store.acquire(&mut textures, &path).unwrap();
    let id = a.texture(&textures).unwrap();

    drop(a);
    drop(b);
    assert_eq!(store.sweep(&releaser), 0, "sprite still referenced");
    assert_eq!(releaser.pending(), 0);

    drop(c);
    assert_eq!(store.sweep(&releaser), 1);
    assert!(store.is_empty());
    assert_eq!(releaser.pending(), 1);
    assert!(stub.destroyed().is_empty(), "destruction must be deferred");

    let mut releaser = releaser;
    assert_eq!(releaser.drain(&mut textures), 1);
    assert_eq!(stub.destroyed(), vec![id]);
}

#[test]
fn sidecar_path_resolves_to_sibling_tif() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    make_image(dir.path(), &stub, "foo.tif", 48, 48);
    // no foo.jpg on disk

    let mut store = SpriteStore::new();
    let request = dir.path().join("foo.sprite").display().to_string();
    let sprite = store.acquire(&mut textures, &request).unwrap();

    assert_eq!(sprite.size(&textures), (48, 48));
    assert_eq!(stub.loads(), vec![dir.path().join("foo.tif")]);
}

#[test]
fn acquire_fails_when_no_image_exists() {
    let dir = tempfile::tempdir().unwrap();
    let mut textures = StubTextures::default();
    let mut store = SpriteStore::new();

    let request = dir.path().join("ghost.sprite").display().to_string();
    assert!(store.acquire(&mut textures, &request).is_none());
    assert!(store.is_empty());
}

#[test]
fn acquire_fails_when_texture_backend_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let mut textures = StubTextures::default();
    let path = dir.path().join("broken.png");
    fs::write(&path, b"").unwrap();
    // file exists on disk but was never registered with the stub

    let mut store = SpriteStore::new();
    assert!(
        store
            .acquire(&mut textures, &path.display().to_string())
            .is_none()
    );
    assert!(store.is_empty());
}

#[test]
fn sidecar_borders_are_loaded_with_matching_version() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let path = make_image(dir.path(), &stub, "panel.png", 64, 64);
    fs::write(
        dir.path().join("panel.sprite"),
        r#"{"version": 2, "left": 0.1, "top": 0.2, "right": 0.9, "bottom": 0.8}"#,
    )
    .unwrap();

    let mut store = SpriteStore::new();
    let sprite = store.acquire(&mut textures, &path).unwrap();
    assert_eq!(sprite.borders(), Borders::new(0.1, 0.2, 0.9, 0.8));
}

#[test]
fn sidecar_version_mismatch_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let path = make_image(dir.path(), &stub, "panel.png", 64, 64);
    fs::write(
        dir.path().join("panel.sprite"),
        r#"{"version": 1, "left": 0.1, "top": 0.2, "right": 0.9, "bottom": 0.8}"#,
    )
    .unwrap();

    let mut store = SpriteStore::new();
    let sprite = store.acquire(&mut textures, &path).unwrap();
    assert_eq!(sprite.borders(), Borders::default());
}

#[test]
fn borders_edited_through_one_handle_are_visible_through_another() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let path = make_image(dir.path(), &stub, "frame.png", 16, 16);

    let mut store = SpriteStore::new();
    let a = store.acquire(&mut textures, &path).unwrap();
    let b = store.acquire(&mut textures, &path).unwrap();

    a.set_borders(Borders::new(0.25, 0.25, 0.75, 0.75));
    assert_eq!(b.borders(), Borders::new(0.25, 0.25, 0.75, 0.75));
    assert_eq!(store.len(), 1, "editing borders never re-registers");
}

#[test]
fn render_target_sprites_resolve_lazily_by_name() {
    let stub = StubTextures::default();
    let textures = stub.clone();
    let mut store = SpriteStore::new();

    let sprite = store.acquire_render_target("hud_minimap");
    assert!(sprite.is_render_target());
    assert_eq!(sprite.texture(&textures), None);
    assert_eq!(sprite.size(&textures), (0, 0));

    // target comes into existence later; the same handle now resolves
    let id = stub.create_render_target("hud_minimap", 128, 128);
    assert_eq!(sprite.texture(&textures), Some(id));
    assert_eq!(sprite.size(&textures), (128, 128));

    let again = store.acquire_render_target("hud_minimap");
    assert!(sprite.same_instance(&again));
}

#[test]
fn render_target_release_schedules_no_texture() {
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let mut store = SpriteStore::new();
    let mut releaser = DeferredTextureReleaser::new();

    stub.create_render_target("scope", 8, 8);
    let sprite = store.acquire_render_target("scope");
    drop(sprite);

    assert_eq!(store.sweep(&releaser), 1);
    assert_eq!(releaser.pending(), 0, "render targets are not owned");
    assert_eq!(releaser.drain(&mut textures), 0);
    assert!(stub.destroyed().is_empty());
}

#[test]
fn reacquire_before_sweep_creates_a_fresh_instance() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let path = make_image(dir.path(), &stub, "coin.png", 8, 8);

    let mut store = SpriteStore::new();
    let releaser = DeferredTextureReleaser::new();

    let first = store.acquire(&mut textures, &path).unwrap();
    let first_texture = first.texture(&textures).unwrap();
    drop(first);

    // release not swept yet; the next acquire must still work and must not
    // resurrect the dead entry
    let second = store.acquire(&mut textures, &path).unwrap();
    assert_ne!(second.texture(&textures), Some(first_texture));

    // sweeping now must keep the live re-registered entry
    assert_eq!(store.sweep(&releaser), 0);
    assert_eq!(store.len(), 1);
    assert!(store.contains(second.key()));
    assert_eq!(releaser.pending(), 1, "old texture still gets released");
}

#[test]
fn shutdown_with_leaked_handle_clears_registry_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let path = make_image(dir.path(), &stub, "leak.png", 8, 8);

    let mut store = SpriteStore::new();
    let releaser = DeferredTextureReleaser::new();
    let leaked = store.acquire(&mut textures, &path).unwrap();

    store.shutdown(&releaser);
    assert!(store.is_empty());
    drop(leaked);
}

#[test]
fn release_systems_retire_sprites_dropped_with_their_entity() {
    let dir = tempfile::tempdir().unwrap();
    let stub = StubTextures::default();
    let mut textures = stub.clone();
    let path = make_image(dir.path(), &stub, "portrait.png", 100, 50);

    let mut store = SpriteStore::new();
    let sprite = store.acquire(&mut textures, &path).unwrap();
    let id = sprite.texture(&textures).unwrap();

    let mut world = World::new();
    world.insert_resource(textures);
    world.insert_resource(store);
    world.insert_resource(DeferredTextureReleaser::new());
    world.insert_resource(DrawList::new());

    let entity = world
        .spawn((UiImage::new(sprite), UiTransform::from_rect(0.0, 0.0, 10.0, 10.0)))
        .id();

    let mut frame_end = Schedule::default();
    frame_end.add_systems(
        (
            sweep_sprite_releases,
            drain_deferred_textures::<StubTextures>,
        )
            .chain(),
    );

    frame_end.run(&mut world);
    assert!(stub.destroyed().is_empty());
    assert_eq!(world.resource::<SpriteStore>().len(), 1);

    world.despawn(entity);
    frame_end.run(&mut world);
    assert_eq!(stub.destroyed(), vec![id]);
    assert!(world.resource::<SpriteStore>().is_empty());
}
