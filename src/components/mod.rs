//! ECS components attached to UI entities.
//!
//! Overview
//! - `tint` – color modulation applied on top of an image's own color
//! - `uiimage` – sprite reference plus per-element render parameters
//! - `uitransform` – canvas rect, pivot, and rotate/scale helpers
pub mod tint;
pub mod uiimage;
pub mod uitransform;
