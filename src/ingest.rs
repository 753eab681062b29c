//! Image ingestion: turns a selected file into a data URL.
//!
//! The bytes are not validated here. Any payload is accepted and carried as
//! `data:<mime>;base64,<payload>`; whether it decodes is only discovered when
//! the compositor asks for pixels.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};
use crate::task::OneShot;

const FALLBACK_MIME: &str = "application/octet-stream";

/// An uploaded image held as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadedImage {
    data_url: String,
}

impl UploadedImage {
    /// Wraps raw file bytes, sniffing the MIME type from their signature.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mime = image::guess_format(bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or(FALLBACK_MIME);
        Self {
            data_url: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
        }
    }

    /// Accepts an existing data URL as-is.
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
        }
    }

    /// Reads a file from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| StudioError::io(path, e))?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::from_bytes(&bytes))
    }

    /// Reads a file on a worker thread.
    pub fn read_in_background(path: impl AsRef<Path>) -> OneShot<Result<Self>> {
        let path = path.as_ref().to_path_buf();
        OneShot::spawn(move || Self::read(path))
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// The MIME type declared in the data URL header.
    pub fn mime_type(&self) -> Option<&str> {
        let header = self.data_url.strip_prefix("data:")?.split_once(',')?.0;
        Some(header.split(';').next().unwrap_or(header))
    }

    /// Extracts the raw bytes behind the data URL.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        let (header, payload) = self
            .data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or(StudioError::MalformedDataUrl)?;
        if !header.ends_with(";base64") {
            return Err(StudioError::MalformedDataUrl);
        }
        Ok(STANDARD.decode(payload)?)
    }

    /// Decodes the image into RGBA pixels.
    pub fn decode(&self) -> Result<RgbaImage> {
        let bytes = self.bytes()?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    pub(crate) fn png_upload(width: u32, height: u32, color: [u8; 4]) -> UploadedImage {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        UploadedImage::from_bytes(&buf)
    }

    #[test]
    fn png_gets_image_mime() {
        let upload = png_upload(4, 2, [10, 20, 30, 255]);
        assert!(upload.data_url().starts_with("data:image/png;base64,"));
        assert_eq!(upload.mime_type(), Some("image/png"));
    }

    #[test]
    fn decode_restores_pixels() {
        let upload = png_upload(4, 2, [10, 20, 30, 255]);
        let img = upload.decode().unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(3, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn unknown_bytes_are_accepted_but_do_not_decode() {
        let upload = UploadedImage::from_bytes(b"definitely not an image");
        assert_eq!(upload.mime_type(), Some(FALLBACK_MIME));
        assert_eq!(upload.bytes().unwrap(), b"definitely not an image");
        assert!(upload.decode().is_err());
    }

    #[test]
    fn malformed_data_url() {
        let upload = UploadedImage::from_data_url("http://example.invalid/logo.png");
        assert!(matches!(upload.bytes(), Err(StudioError::MalformedDataUrl)));
    }

    #[test]
    fn read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let upload = UploadedImage::read(&path).unwrap();
        assert_eq!(upload.bytes().unwrap(), vec![1, 2, 3]);

        let missing = UploadedImage::read(dir.path().join("missing.png"));
        assert!(matches!(missing, Err(StudioError::Io { .. })));
    }
}
