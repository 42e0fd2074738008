//! Deferred texture destruction queue.
//!
//! A sprite can be released on the game thread while a previously recorded
//! draw list still references its texture. Destroying the texture inside the
//! release would be a use-after-free from the consumer's point of view, so
//! releases are queued here and only executed by [`drain`] once per frame,
//! after the point where the consumer has finished with the prior frame's
//! commands.
//!
//! [`drain`]: DeferredTextureReleaser::drain

use bevy_ecs::prelude::Resource;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;

use crate::resources::texturestore::{TextureId, TextureSystem};

/// Queue of textures waiting for a safe destruction point.
#[derive(Resource)]
pub struct DeferredTextureReleaser {
    tx: Sender<TextureId>,
    rx: Receiver<TextureId>,
}

impl DeferredTextureReleaser {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Queue `id` for destruction at the next frame boundary.
    pub fn schedule(&self, id: TextureId) {
        // receiver lives as long as self, the send cannot fail
        let _ = self.tx.send(id);
    }

    /// Number of textures currently waiting.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Destroy every queued texture. Must only be called at the frame
    /// boundary, after the render consumer is done with the previous frame.
    pub fn drain(&mut self, textures: &mut dyn TextureSystem) -> usize {
        let mut released = 0;
        while let Ok(id) = self.rx.try_recv() {
            textures.destroy(id);
            released += 1;
        }
        if released > 0 {
            debug!("released {} deferred texture(s)", released);
        }
        released
    }
}

impl Default for DeferredTextureReleaser {
    fn default() -> Self {
        Self::new()
    }
}
