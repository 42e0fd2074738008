//! Sprite subsystem configuration resource.
//!
//! Settings loaded from an INI configuration file, with safe defaults when
//! the file or individual values are missing.
//!
//! # Configuration File Format
//!
//! ```ini
//! [sprites]
//! asset_root = ./assets
//! pixel_align = false
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_ASSET_ROOT: &str = "./assets";
const DEFAULT_PIXEL_ALIGN: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./uislice.ini";

/// Sprite subsystem configuration.
///
/// `asset_root` is the directory sprite paths are resolved against when a
/// caller passes a relative path that does not exist as given. `pixel_align`
/// is the default pixel-snapping policy for new UI images.
#[derive(Resource, Debug, Clone)]
pub struct SpriteConfig {
    /// Directory that relative sprite paths are resolved against.
    pub asset_root: PathBuf,
    /// Default pixel-alignment policy for UI images.
    pub pixel_align: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            pixel_align: DEFAULT_PIXEL_ALIGN,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Returns an
    /// error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        if let Some(root) = config.get("sprites", "asset_root") {
            self.asset_root = PathBuf::from(root);
        }
        if let Some(pixel_align) = config.getbool("sprites", "pixel_align").ok().flatten() {
            self.pixel_align = pixel_align;
        }

        info!(
            "Loaded sprite config: asset_root={:?}, pixel_align={}",
            self.asset_root, self.pixel_align
        );

        Ok(())
    }

    /// Save configuration to the INI file. Creates the file if it doesn't
    /// exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set(
            "sprites",
            "asset_root",
            Some(self.asset_root.display().to_string()),
        );
        config.set("sprites", "pixel_align", Some(self.pixel_align.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved sprite config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpriteConfig::new();
        assert_eq!(config.asset_root, PathBuf::from(DEFAULT_ASSET_ROOT));
        assert!(!config.pixel_align);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uislice.ini");

        let mut config = SpriteConfig::with_path(&path);
        config.asset_root = PathBuf::from("art/ui");
        config.pixel_align = true;
        config.save_to_file().unwrap();

        let mut loaded = SpriteConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.asset_root, PathBuf::from("art/ui"));
        assert!(loaded.pixel_align);
    }

    #[test]
    fn missing_file_is_an_error_but_defaults_survive() {
        let mut config = SpriteConfig::with_path("./definitely-missing.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.asset_root, PathBuf::from(DEFAULT_ASSET_ROOT));
    }
}
