//! Color tint component for rendering UI images.
//!
//! The [`Tint`] component applies color modulation to entities during
//! rendering: when attached next to a [`UiImage`](super::uiimage::UiImage),
//! the tint color is multiplied with the image's own color before the quad
//! is submitted.

use bevy_ecs::prelude::Component;

use crate::resources::drawlist::Color;

/// Color tint component for rendering modulation.
#[derive(Component, Clone, Debug, Copy)]
pub struct Tint {
    pub color: Color,
}

impl Tint {
    /// Create a new Tint with the specified RGBA values.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            color: Color::new(r, g, b, a),
        }
    }

    /// Multiply this tint with another color (component-wise).
    pub fn multiply(&self, other: Color) -> Color {
        self.color.multiply(other)
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_white() {
        assert_eq!(Tint::default().color, Color::WHITE);
    }

    #[test]
    fn test_multiply_halves_channels() {
        let t = Tint::new(127, 127, 127, 255);
        let out = t.multiply(Color::new(200, 100, 0, 255));
        assert_eq!(out.r, 99);
        assert_eq!(out.g, 49);
        assert_eq!(out.b, 0);
        assert_eq!(out.a, 255);
    }
}
