//! Writing the design out as files.

use std::path::{Path, PathBuf};

use crate::config::TshirtConfig;
use crate::error::{Result, StudioError};
use crate::texture::Texture;

pub const TEXTURE_FILE_NAME: &str = "custom-tshirt.png";
pub const CONFIG_FILE_NAME: &str = "tshirt-config.json";

/// Writes the texture as `custom-tshirt.png` inside `dir`.
///
/// Without a texture this is a silent no-op returning `Ok(None)`.
pub fn export_texture(texture: Option<&Texture>, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let Some(texture) = texture else {
        tracing::debug!("No composited texture yet; nothing to export");
        return Ok(None);
    };

    let path = dir.as_ref().join(TEXTURE_FILE_NAME);
    let png = texture.encode_png()?;
    std::fs::write(&path, png).map_err(|e| StudioError::io(&path, e))?;
    tracing::info!("Exported texture to {}", path.display());
    Ok(Some(path))
}

/// Writes the config as pretty-printed JSON to `tshirt-config.json` inside `dir`.
pub fn export_config(config: &TshirtConfig, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(CONFIG_FILE_NAME);
    let json = config.to_json_pretty()?;
    std::fs::write(&path, json).map_err(|e| StudioError::io(&path, e))?;
    tracing::info!("Exported config to {}", path.display());
    Ok(path)
}

/// Reads a config document previously written by [`export_config`].
pub fn import_config(path: impl AsRef<Path>) -> Result<TshirtConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| StudioError::io(path, e))?;
    Ok(TshirtConfig::from_json(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configurable;
    use crate::session::SessionState;
    use image::{Rgba, RgbaImage};

    #[test]
    fn texture_export_without_texture_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_texture(None, dir.path()).unwrap().is_none());
        assert!(!dir.path().join(TEXTURE_FILE_NAME).exists());
    }

    #[test]
    fn texture_export_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let texture = Texture::new(RgbaImage::from_pixel(1024, 1024, Rgba([255; 4])), 1);

        let path = export_texture(Some(&texture), dir.path()).unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), TEXTURE_FILE_NAME);

        let written = image::open(&path).unwrap().to_rgba8();
        assert_eq!(written, texture.data);
    }

    #[test]
    fn config_export_and_import() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionState::new();
        session.set_custom_text("line one\nline two");

        let path = export_config(&session.export_config(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"height\": 180,"));
        assert_eq!(import_config(&path).unwrap(), session.export_config());
    }

    #[test]
    fn export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = export_config(&TshirtConfig::default(), &missing).unwrap_err();
        assert!(matches!(err, StudioError::Io { .. }));
    }
}
