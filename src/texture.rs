//! The composited garment texture.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::Result;

/// A composited raster together with the design revision it was built from.
///
/// Textures are shared between the export path and any preview materials,
/// so they are handed out behind an `Arc` and never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// The RGBA pixels.
    pub data: RgbaImage,

    /// Design revision of the session when this texture was composited.
    pub revision: u64,
}

impl Texture {
    pub fn new(data: RgbaImage, revision: u64) -> Self {
        Self { data, revision }
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Encodes the pixels as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.data.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_encoding_preserves_pixels() {
        let mut data = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        data.put_pixel(3, 4, Rgba([1, 2, 3, 255]));
        let texture = Texture::new(data.clone(), 5);

        let png = texture.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, data);
    }
}
