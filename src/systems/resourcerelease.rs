//! Frame-boundary resource release systems.
//!
//! Two steps run at the end of every frame, in order:
//! 1. [`sweep_sprite_releases`] retires sprites whose last handle was
//!    dropped during the frame and forwards their owned textures to the
//!    deferred releaser.
//! 2. [`drain_deferred_textures`] destroys the queued textures, once the
//!    render consumer is guaranteed done with the previous frame's
//!    commands.

use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::deferredrelease::DeferredTextureReleaser;
use crate::resources::spritestore::SpriteStore;
use crate::resources::texturestore::TextureSystem;

/// Retire released sprites from the registry and schedule their textures.
pub fn sweep_sprite_releases(
    mut store: ResMut<SpriteStore>,
    releaser: Res<DeferredTextureReleaser>,
) {
    let removed = store.sweep(&releaser);
    if removed > 0 {
        debug!("swept {} released sprite(s)", removed);
    }
}

/// Destroy textures whose deferred release point has been reached.
///
/// Generic over the concrete texture resource, like the render system.
pub fn drain_deferred_textures<T: TextureSystem + Resource>(
    mut releaser: ResMut<DeferredTextureReleaser>,
    mut textures: ResMut<T>,
) {
    releaser.drain(textures.as_mut());
}
