//! UI image component.
//!
//! Entities with a [`UiImage`] and a
//! [`UiTransform`](super::uitransform::UiTransform) are drawn by
//! [`render_ui_images`](crate::systems::uiimage_render::render_ui_images).
//! The component carries the sprite handle plus the per-element render
//! parameters; it owns a reference to the sprite for as long as it exists.

use bevy_ecs::prelude::Component;

use crate::resources::drawlist::{BlendMode, Color};
use crate::resources::spritestore::SpriteHandle;

/// How the sprite's texture is projected onto the element's rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageType {
    /// Map the full texture onto the rect.
    #[default]
    Stretched,
    /// 9-slice: corners fixed, edges and center stretched.
    Sliced,
    /// Rect resized to the texture's pixel size around the pivot.
    Fixed,
    /// One texel per canvas pixel, texture repeats.
    Tiled,
    /// Uniformly scaled to fit inside the rect.
    StretchedToFit,
    /// Uniformly scaled to fill the rect.
    StretchedToFill,
}

/// A 2D image attached to a UI element.
#[derive(Component, Clone, Debug)]
pub struct UiImage {
    /// The cached sprite to draw, `None` renders a plain white quad.
    pub sprite: Option<SpriteHandle>,
    pub image_type: ImageType,
    pub color: Color,
    pub alpha: f32,
    pub blend_mode: BlendMode,
    /// Round vertex positions to whole pixels.
    pub pixel_align: bool,
    /// Draw the center cell of a sliced image. Disable for frame-only
    /// images so the fully covered center is not rasterized at all.
    pub fill_center: bool,
}

impl UiImage {
    pub fn new(sprite: SpriteHandle) -> Self {
        Self {
            sprite: Some(sprite),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }

    pub fn with_color(mut self, color: Color, alpha: f32) -> Self {
        self.color = color;
        self.alpha = alpha;
        self
    }
}

impl Default for UiImage {
    fn default() -> Self {
        Self {
            sprite: None,
            image_type: ImageType::default(),
            color: Color::WHITE,
            alpha: 1.0,
            blend_mode: BlendMode::default(),
            pixel_align: false,
            fill_center: true,
        }
    }
}
