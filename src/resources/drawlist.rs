//! Recorded draw submissions for the UI pass.
//!
//! The renderer in this crate does not talk to a GPU. Instead, every visible
//! image produces one [`DrawCommand`] appended to the [`DrawList`] resource:
//! either a single textured quad or an indexed triangle strip (for 9-sliced
//! images). A backend drains the list once per frame and translates the
//! commands into whatever submission API it sits on.

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use smallvec::SmallVec;

use crate::resources::texturestore::TextureId;

/// RGBA color with 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Multiply two colors component-wise. Used for tint modulation.
    pub fn multiply(self, other: Color) -> Color {
        Color::new(
            ((self.r as u16 * other.r as u16) / 255) as u8,
            ((self.g as u16 * other.g as u16) / 255) as u8,
            ((self.b as u16 * other.b as u16) / 255) as u8,
            ((self.a as u16 * other.a as u16) / 255) as u8,
        )
    }

    /// Pack into the `0xAARRGGBB` form the vertex stream carries. The alpha
    /// channel is scaled by `alpha_scale` (element alpha times canvas fade).
    pub fn packed(self, alpha_scale: f32) -> u32 {
        let a = (self.a as f32 * alpha_scale.clamp(0.0, 1.0)).round() as u32;
        (a << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Blend equation requested for a submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Screen,
    Darken,
    Lighten,
}

/// Sampler addressing requested for a submission. Tiled images rely on
/// `Repeat`; every other mode clamps so border texels do not bleed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureWrap {
    #[default]
    Clamp,
    Repeat,
}

/// Position rounding policy handed to the backend along with a quad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    #[default]
    None,
    /// Round positions to the nearest pixel for crisp UI edges.
    Nearest,
}

/// One vertex of an indexed submission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub pos: Vec2,
    pub uv: Vec2,
    /// Packed `0xAARRGGBB` color.
    pub color: u32,
}

/// A single recorded draw submission.
///
/// `texture: None` means the builtin 1x1 opaque white texture; it is used
/// when an image has no resolvable texture and degrades to a solid quad.
#[derive(Clone, Debug)]
pub enum DrawCommand {
    Quad {
        texture: Option<TextureId>,
        /// Corner positions, clockwise from top-left.
        positions: [Vec2; 4],
        uvs: [Vec2; 4],
        color: u32,
        blend: BlendMode,
        wrap: TextureWrap,
        rounding: Rounding,
    },
    TriangleStrip {
        texture: Option<TextureId>,
        vertices: SmallVec<[Vertex; 16]>,
        /// Strip indices, degenerate entries included.
        indices: SmallVec<[u16; 28]>,
        blend: BlendMode,
        wrap: TextureWrap,
    },
}

/// Per-frame list of UI draw submissions.
///
/// `alpha_fade` is the canvas-level fade applied on top of per-element alpha;
/// whoever owns the UI pass sets it before running the render systems.
#[derive(Resource)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    pub alpha_fade: f32,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            alpha_fade: 1.0,
        }
    }

    /// Drop all recorded commands. Called at the start of each frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_white_is_all_ones() {
        assert_eq!(Color::WHITE.packed(1.0), 0xFFFF_FFFF);
    }

    #[test]
    fn test_packed_layout() {
        let c = Color::new(0x12, 0x34, 0x56, 0xFF);
        assert_eq!(c.packed(1.0), 0xFF12_3456);
    }

    #[test]
    fn test_packed_scales_alpha_only() {
        let c = Color::new(10, 20, 30, 200);
        let packed = c.packed(0.5);
        assert_eq!(packed >> 24, 100);
        assert_eq!(packed & 0x00FF_FFFF, (10 << 16) | (20 << 8) | 30);
    }

    #[test]
    fn test_packed_clamps_scale() {
        assert_eq!(Color::WHITE.packed(2.0) >> 24, 255);
        assert_eq!(Color::WHITE.packed(-1.0) >> 24, 0);
    }

    #[test]
    fn test_multiply_with_white_is_identity() {
        let c = Color::new(100, 150, 200, 255);
        assert_eq!(c.multiply(Color::WHITE), c);
    }
}
