//! UI image rendering: mode dispatch and geometry.
//!
//! [`render_ui_images`] walks every entity with a
//! [`UiImage`] + [`UiTransform`] pair and appends one draw submission per
//! image to the [`DrawList`]. The stateless [`render_image`] entry point
//! does the actual work and is what the tests and the inspection binary
//! call directly.
//!
//! Mode contracts
//! - `Stretched` maps the full texture onto the element's quad.
//! - `Fixed` resizes the rect to the texture's pixel size around the pivot,
//!   then applies rotation/scale.
//! - `Tiled` scales UVs so one texel covers one canvas pixel and relies on
//!   repeat addressing.
//! - `StretchedToFit`/`StretchedToFill` resize around the pivot using the
//!   min/max of the per-axis scale factors.
//! - `Sliced` builds a 4x4 vertex grid (9 quads) with fixed-size corners;
//!   see [`render_sliced`] for the border-overlap policy.
//!
//! An image whose texture cannot be resolved (missing render target, no
//! sprite at all) always degrades to a stretched plain-white quad; render is
//! total and never fails.

use bevy_ecs::prelude::*;
use glam::Vec2;
use smallvec::SmallVec;

use crate::components::tint::Tint;
use crate::components::uiimage::{ImageType, UiImage};
use crate::components::uitransform::{RectPoints, UiTransform};
use crate::resources::drawlist::{
    BlendMode, Color, DrawCommand, DrawList, Rounding, TextureWrap, Vertex,
};
use crate::resources::spritestore::SpriteHandle;
use crate::resources::texturestore::{TextureId, TextureSystem};

/// Vertices in a sliced submission: a 4x4 grid forming 9 quads.
pub const SLICED_VERTEX_COUNT: usize = 16;

/// Full-texture UV corners, clockwise from top-left.
const FULL_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

// The sliced vertex grid is emitted row-major:
//  0  1  2  3
//  4  5  6  7
//  8  9 10 11
// 12 13 14 15
// and drawn as one triangle strip that zig-zags through all three quad
// rows, with two degenerate indices per row transition.
const FILLED_STRIP_INDICES: [u16; 26] = [
    4, 0, 5, 1, 6, 2, 7, 3, 3, //
    7, 11, 6, 10, 5, 9, 4, 8, 8, //
    12, 8, 13, 9, 14, 10, 15, 11,
];

// Same strip with two extra degenerates in the middle row so the center
// quad is skipped entirely.
const UNFILLED_STRIP_INDICES: [u16; 28] = [
    4, 0, 5, 1, 6, 2, 7, 3, 3, //
    7, 11, 6, 10, 10, 5, 5, 9, 4, 8, 8, //
    12, 8, 13, 9, 14, 10, 15, 11,
];

/// Render every visible UI image into the draw list.
///
/// Generic over the concrete texture resource so tests can drive it with a
/// stub implementation.
pub fn render_ui_images<T: TextureSystem + Resource>(
    mut draw: ResMut<DrawList>,
    textures: Res<T>,
    query: Query<(&UiImage, &UiTransform, Option<&Tint>)>,
) {
    let fade = draw.alpha_fade;
    for (image, transform, tint) in query.iter() {
        let color = match tint {
            Some(tint) => tint.multiply(image.color),
            None => image.color,
        };
        render_image(
            &mut draw,
            textures.as_ref(),
            image.sprite.as_ref(),
            image.image_type,
            transform,
            color,
            image.alpha,
            fade,
            image.blend_mode,
            image.pixel_align,
            image.fill_center,
        );
    }
}

/// Render one image into the draw list.
///
/// `fade` is the canvas-level alpha fade multiplied into the element alpha.
/// Never fails and never mutates the sprite.
#[allow(clippy::too_many_arguments)]
pub fn render_image(
    draw: &mut DrawList,
    textures: &dyn TextureSystem,
    sprite: Option<&SpriteHandle>,
    mode: ImageType,
    transform: &UiTransform,
    color: Color,
    alpha: f32,
    fade: f32,
    blend: BlendMode,
    pixel_align: bool,
    fill_center: bool,
) {
    let packed = color.packed(alpha * fade);
    let rounding = if pixel_align {
        Rounding::Nearest
    } else {
        Rounding::None
    };

    let resolved = sprite.and_then(|s| s.texture(textures).map(|id| (s, id)));
    let Some((sprite, texture)) = resolved else {
        // no sprite, or a render target that does not exist yet: draw a
        // stretched white quad so a render attempt never crashes
        render_stretched(draw, None, transform, packed, blend, rounding);
        return;
    };

    let (width, height) = sprite.size(textures);
    let texture_size = Vec2::new(width as f32, height as f32);

    let mut mode = mode;
    if mode == ImageType::Sliced && sprite.borders().is_zero_width() {
        // zero-width borders make sliced identical to stretched, and
        // stretched is a single quad
        mode = ImageType::Stretched;
    }
    if texture_size.x <= 0.0 || texture_size.y <= 0.0 {
        mode = ImageType::Stretched;
    }

    match mode {
        ImageType::Stretched => {
            render_stretched(draw, Some(texture), transform, packed, blend, rounding)
        }
        ImageType::Sliced => render_sliced(
            draw,
            sprite,
            texture,
            texture_size,
            transform,
            packed,
            blend,
            rounding,
            fill_center,
        ),
        ImageType::Fixed => render_fixed(
            draw,
            texture,
            texture_size,
            transform,
            packed,
            blend,
            rounding,
        ),
        ImageType::Tiled => render_tiled(
            draw,
            texture,
            texture_size,
            transform,
            packed,
            blend,
            rounding,
        ),
        ImageType::StretchedToFit => render_stretched_to_fit_or_fill(
            draw,
            texture,
            texture_size,
            transform,
            packed,
            blend,
            rounding,
            true,
        ),
        ImageType::StretchedToFill => render_stretched_to_fit_or_fill(
            draw,
            texture,
            texture_size,
            transform,
            packed,
            blend,
            rounding,
            false,
        ),
    }
}

fn push_quad(
    draw: &mut DrawList,
    texture: Option<TextureId>,
    points: &RectPoints,
    uvs: [Vec2; 4],
    color: u32,
    blend: BlendMode,
    wrap: TextureWrap,
    rounding: Rounding,
) {
    draw.commands.push(DrawCommand::Quad {
        texture,
        positions: points.pt,
        uvs,
        color,
        blend,
        wrap,
        rounding,
    });
}

fn render_stretched(
    draw: &mut DrawList,
    texture: Option<TextureId>,
    transform: &UiTransform,
    color: u32,
    blend: BlendMode,
    rounding: Rounding,
) {
    let points = transform.viewport_points();
    push_quad(
        draw,
        texture,
        &points,
        FULL_UVS,
        color,
        blend,
        TextureWrap::Clamp,
        rounding,
    );
}

/// Grow or shrink an axis-aligned rect to `target_size`, anchored at the
/// normalized pivot: the pivot-side corner moves by `delta * pivot`, the
/// opposite corner by `delta * (1 - pivot)`.
fn resize_about_pivot(points: &mut RectPoints, pivot: Vec2, target_size: Vec2) {
    let size_diff = target_size - points.axis_aligned_size();
    let top_left = points.top_left() - size_diff * pivot;
    let bottom_right = points.bottom_right() + size_diff * (Vec2::ONE - pivot);
    *points = RectPoints::from_corners(top_left, bottom_right);
}

fn render_fixed(
    draw: &mut DrawList,
    texture: TextureId,
    texture_size: Vec2,
    transform: &UiTransform,
    color: u32,
    blend: BlendMode,
    rounding: Rounding,
) {
    let mut points = transform.rect_points_no_scale_rotate();
    resize_about_pivot(&mut points, transform.pivot, texture_size);
    // rotation/scale always comes after the fixed-size correction
    transform.rotate_and_scale_points(&mut points);
    push_quad(
        draw,
        Some(texture),
        &points,
        FULL_UVS,
        color,
        blend,
        TextureWrap::Clamp,
        rounding,
    );
}

fn render_tiled(
    draw: &mut DrawList,
    texture: TextureId,
    texture_size: Vec2,
    transform: &UiTransform,
    color: u32,
    blend: BlendMode,
    rounding: Rounding,
) {
    let mut points = transform.rect_points_no_scale_rotate();
    // scale UVs so one texel covers one canvas pixel
    let uv_scale = points.axis_aligned_size() / texture_size;
    transform.rotate_and_scale_points(&mut points);
    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(uv_scale.x, 0.0),
        Vec2::new(uv_scale.x, uv_scale.y),
        Vec2::new(0.0, uv_scale.y),
    ];
    push_quad(
        draw,
        Some(texture),
        &points,
        uvs,
        color,
        blend,
        TextureWrap::Repeat,
        rounding,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_stretched_to_fit_or_fill(
    draw: &mut DrawList,
    texture: TextureId,
    texture_size: Vec2,
    transform: &UiTransform,
    color: u32,
    blend: BlendMode,
    rounding: Rounding,
    to_fit: bool,
) {
    let mut points = transform.rect_points_no_scale_rotate();
    let rect_size = points.axis_aligned_size();
    let scale_x = rect_size.x / texture_size.x;
    let scale_y = rect_size.y / texture_size.y;
    let scale_factor = if to_fit {
        scale_x.min(scale_y)
    } else {
        scale_x.max(scale_y)
    };
    resize_about_pivot(&mut points, transform.pivot, texture_size * scale_factor);
    transform.rotate_and_scale_points(&mut points);
    push_quad(
        draw,
        Some(texture),
        &points,
        FULL_UVS,
        color,
        blend,
        TextureWrap::Clamp,
        rounding,
    );
}

/// Scale a pair of opposing border widths down proportionally so their sum
/// never exceeds the available extent. Returns the pair unchanged when it
/// already fits.
fn correct_border_pair(a: f32, b: f32, extent: f32) -> (f32, f32) {
    let combined = a + b;
    if combined > extent && combined > 0.0 {
        let correction = extent / combined;
        (a * correction, b * correction)
    } else {
        (a, b)
    }
}

#[allow(clippy::too_many_arguments)]
fn render_sliced(
    draw: &mut DrawList,
    sprite: &SpriteHandle,
    texture: TextureId,
    texture_size: Vec2,
    transform: &UiTransform,
    color: u32,
    blend: BlendMode,
    rounding: Rounding,
    fill_center: bool,
) {
    let points = transform.rect_points_no_scale_rotate();
    let rect_size = points.axis_aligned_size();
    let borders = sprite.borders();

    // border widths in canvas pixels, scaled down proportionally when the
    // rect is too small for the two opposing borders to coexist
    let (left_px, right_px) = correct_border_pair(
        borders.left.max(0.0) * texture_size.x,
        borders.right_inset().max(0.0) * texture_size.x,
        rect_size.x,
    );
    let (top_px, bottom_px) = correct_border_pair(
        borders.top.max(0.0) * texture_size.y,
        borders.bottom_inset().max(0.0) * texture_size.y,
        rect_size.y,
    );

    let xs = [
        points.top_left().x,
        points.top_left().x + left_px,
        points.bottom_right().x - right_px,
        points.bottom_right().x,
    ];
    let ys = [
        points.top_left().y,
        points.top_left().y + top_px,
        points.bottom_right().y - bottom_px,
        points.bottom_right().y,
    ];

    // texture coordinates keep the uncorrected border fractions: under
    // extreme correction the border texels compress visually instead of the
    // grid folding over
    let ss = [0.0, borders.left, borders.right, 1.0];
    let ts = [0.0, borders.top, borders.bottom, 1.0];

    let mut vertices: SmallVec<[Vertex; 16]> = SmallVec::new();
    for y in 0..4 {
        for x in 0..4 {
            // each grid point goes through the element transform on its own
            let mut pos = transform.transform_point(Vec2::new(xs[x], ys[y]));
            if rounding == Rounding::Nearest {
                pos = pos.round();
            }
            vertices.push(Vertex {
                pos,
                uv: Vec2::new(ss[x], ts[y]),
                color,
            });
        }
    }

    let indices: SmallVec<[u16; 28]> = if fill_center {
        SmallVec::from_slice(&FILLED_STRIP_INDICES)
    } else {
        SmallVec::from_slice(&UNFILLED_STRIP_INDICES)
    };

    draw.commands.push(DrawCommand::TriangleStrip {
        texture: Some(texture),
        vertices,
        indices,
        blend,
        wrap: TextureWrap::Clamp,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_border_pair_untouched_when_fitting() {
        assert_eq!(correct_border_pair(10.0, 10.0, 100.0), (10.0, 10.0));
    }

    #[test]
    fn test_correct_border_pair_scales_proportionally() {
        let (a, b) = correct_border_pair(30.0, 10.0, 20.0);
        assert!((a + b - 20.0).abs() < 1e-4);
        assert!((a - 15.0).abs() < 1e-4);
        assert!((b - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_correct_border_pair_zero_extent() {
        let (a, b) = correct_border_pair(5.0, 5.0, 0.0);
        assert_eq!((a, b), (0.0, 0.0));
    }

    #[test]
    fn test_strip_indices_cover_all_vertices() {
        for set in [&FILLED_STRIP_INDICES[..], &UNFILLED_STRIP_INDICES[..]] {
            for ix in 0..SLICED_VERTEX_COUNT as u16 {
                assert!(set.contains(&ix), "vertex {} missing from strip", ix);
            }
        }
    }
}
