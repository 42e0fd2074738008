//! 2D transform of a UI element.
//!
//! [`UiTransform`] is the interface the renderer needs from the transform
//! system: the untransformed canvas rectangle of the element, its pivot, and
//! helpers to rotate/scale a set of points about that pivot. Rotation and
//! scale are always applied as a separate step so modes like Fixed can
//! resize the rect first and transform afterwards.

use bevy_ecs::prelude::Component;
use glam::{Mat2, Vec2};

/// The four corner points of an element's rectangle, clockwise from
/// top-left: `[top-left, top-right, bottom-right, bottom-left]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectPoints {
    pub pt: [Vec2; 4],
}

impl RectPoints {
    /// Axis-aligned rect from its top-left and bottom-right corners.
    pub fn from_corners(top_left: Vec2, bottom_right: Vec2) -> Self {
        Self {
            pt: [
                top_left,
                Vec2::new(bottom_right.x, top_left.y),
                bottom_right,
                Vec2::new(top_left.x, bottom_right.y),
            ],
        }
    }

    pub fn top_left(&self) -> Vec2 {
        self.pt[0]
    }

    pub fn top_right(&self) -> Vec2 {
        self.pt[1]
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.pt[2]
    }

    pub fn bottom_left(&self) -> Vec2 {
        self.pt[3]
    }

    /// Size of the rect assuming it is still axis-aligned (call before
    /// rotation/scale is applied).
    pub fn axis_aligned_size(&self) -> Vec2 {
        self.bottom_right() - self.top_left()
    }
}

/// Canvas-space transform of a UI element.
///
/// `position` is the canvas position of the pivot point; `pivot` is
/// normalized over the rect (`(0, 0)` top-left, `(1, 1)` bottom-right).
/// Rotation follows the engine convention of degrees.
#[derive(Component, Clone, Copy, Debug)]
pub struct UiTransform {
    /// Canvas position of the pivot point.
    pub position: Vec2,
    /// Element size in canvas units.
    pub size: Vec2,
    /// Normalized pivot within the rect.
    pub pivot: Vec2,
    /// Rotation about the pivot, in degrees.
    pub rotation_degrees: f32,
    /// Scale about the pivot.
    pub scale: Vec2,
}

impl Default for UiTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            pivot: Vec2::splat(0.5),
            rotation_degrees: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl UiTransform {
    /// Transform for an axis-aligned rect given by its top-left corner and
    /// size, with a centered pivot.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        let size = Vec2::new(width, height);
        Self {
            position: Vec2::new(x, y) + 0.5 * size,
            size,
            ..Self::default()
        }
    }

    /// The element's rectangle before rotation and scale are applied.
    pub fn rect_points_no_scale_rotate(&self) -> RectPoints {
        let top_left = self.position - self.pivot * self.size;
        RectPoints::from_corners(top_left, top_left + self.size)
    }

    fn scale_rotate_matrix(&self) -> Mat2 {
        Mat2::from_angle(self.rotation_degrees.to_radians()) * Mat2::from_diagonal(self.scale)
    }

    /// Apply this element's rotation and scale to a single canvas point.
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.position + self.scale_rotate_matrix() * (point - self.position)
    }

    /// Apply this element's rotation and scale to a set of rect points.
    pub fn rotate_and_scale_points(&self, points: &mut RectPoints) {
        for p in &mut points.pt {
            *p = self.transform_point(*p);
        }
    }

    /// The fully transformed on-screen quadrilateral of the element.
    pub fn viewport_points(&self) -> RectPoints {
        let mut points = self.rect_points_no_scale_rotate();
        self.rotate_and_scale_points(&mut points);
        points
    }
}
