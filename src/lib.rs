//! uislice: sprite resource cache and multi-mode slice renderer for 2D UI.
//!
//! The crate has two halves. The cache half hands out de-duplicated,
//! reference-counted [`SpriteHandle`]s for image assets (with optional
//! 9-slice border metadata from a `.sprite` side-car file) and for named
//! render targets, and defers texture destruction until a safe frame
//! boundary. The render half turns a sprite, a projection mode, and an
//! element transform into draw submissions recorded in a [`DrawList`].
//!
//! [`SpriteHandle`]: resources::spritestore::SpriteHandle
//! [`DrawList`]: resources::drawlist::DrawList

pub mod components;
pub mod resources;
pub mod systems;
