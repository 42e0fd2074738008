//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `deferredrelease` – queue of textures awaiting a safe destruction point
//! - `drawlist` – recorded draw submissions for the UI pass
//! - `spriteborders` – 9-slice border metadata and its side-car file format
//! - `spriteconfig` – INI-backed settings (asset root, pixel alignment)
//! - `spritestore` – de-duplicating, reference-counted sprite cache
//! - `texturestore` – texture collaborator interface and file-backed store
pub mod deferredrelease;
pub mod drawlist;
pub mod spriteborders;
pub mod spriteconfig;
pub mod spritestore;
pub mod texturestore;
