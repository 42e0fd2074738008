//! Engine systems.
//!
//! Submodules overview
//! - [`resourcerelease`] – frame-boundary sprite sweep and deferred texture
//!   destruction
//! - [`uiimage_render`] – draw every `UiImage` into the frame's `DrawList`
pub mod resourcerelease;
pub mod uiimage_render;
