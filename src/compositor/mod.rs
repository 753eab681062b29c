//! Texture compositing.
//!
//! [`Compositor`] is the pure part: it bakes a logo and up to three text
//! lines into a white 1024×1024 raster. [`TextureCompositor`] wraps it with
//! a cache keyed by the session's design revision and keeps the last raster
//! around for export.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use tshirt_studio::{Compositor, FontStyle, HexColor};
//!
//! let compositor = Compositor::without_fonts();
//! let logo = RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255]));
//! let raster = compositor
//!     .composite(&logo, &["Hello"], FontStyle::Arial, HexColor::BLACK)
//!     .unwrap();
//! assert_eq!(raster.dimensions(), (1024, 1024));
//! ```

pub mod layout;
pub mod raster;

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use resvg::usvg::fontdb;

use crate::color::HexColor;
use crate::options::FontStyle;
use crate::session::{MAX_TEXT_LINES, SessionState};
use crate::texture::Texture;

pub use layout::{CANVAS_SIZE, Layout, LogoFit, RectF, TextLine, fit_logo};

// ============================================================================
// Compositor
// ============================================================================

/// Bakes a logo and text into the garment texture.
#[derive(Clone)]
pub struct Compositor {
    width: u32,
    height: u32,
    fonts: Arc<fontdb::Database>,
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("font_faces", &self.fonts.len())
            .finish()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// Creates a compositor using the fonts installed on this machine.
    pub fn new() -> Self {
        Self::with_fonts(raster::system_fonts())
    }

    /// Creates a compositor with an explicit font database.
    pub fn with_fonts(fonts: Arc<fontdb::Database>) -> Self {
        Self {
            width: CANVAS_SIZE,
            height: CANVAS_SIZE,
            fonts,
        }
    }

    /// Creates a compositor with no fonts; text lines are laid out but not drawn.
    pub fn without_fonts() -> Self {
        Self::with_fonts(Arc::new(fontdb::Database::new()))
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Computes where the logo and text go, without drawing anything.
    pub fn layout(&self, logo_width: u32, logo_height: u32, lines: &[&str]) -> Layout {
        let lines = &lines[..lines.len().min(MAX_TEXT_LINES)];
        Layout::compute(self.width, self.height, logo_width, logo_height, lines)
    }

    /// Composites `logo` and `lines` onto a fresh white canvas.
    ///
    /// Only the first three lines are drawn. Returns `None` if the logo has
    /// no pixels.
    pub fn composite(
        &self,
        logo: &RgbaImage,
        lines: &[&str],
        font: FontStyle,
        text_color: HexColor,
    ) -> Option<RgbaImage> {
        let logo_pixmap = raster::rgba_image_to_pixmap(logo)?;
        let layout = self.layout(logo.width(), logo.height(), lines);

        let mut canvas = raster::white_canvas(self.width, self.height)?;
        raster::draw_image(&mut canvas, &logo_pixmap, layout.logo);
        raster::draw_text(&mut canvas, &layout.lines, font, text_color, &self.fonts);

        Some(raster::pixmap_to_rgba_image(&canvas))
    }
}

// ============================================================================
// TextureCompositor
// ============================================================================

/// Keeps the last composited texture and recomputes it on design changes.
#[derive(Debug, Clone)]
pub struct TextureCompositor {
    compositor: Compositor,
    last: Option<Arc<Texture>>,
    attempted_revision: Option<u64>,
}

impl TextureCompositor {
    pub fn new(compositor: Compositor) -> Self {
        Self {
            compositor,
            last: None,
            attempted_revision: None,
        }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// The last texture produced, if any.
    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.last.as_ref()
    }

    /// Brings the texture up to date with the session.
    ///
    /// Does nothing until an image has been uploaded. If the image cannot be
    /// decoded, the previous texture is kept. Returns the current texture.
    pub fn refresh(&mut self, session: &SessionState) -> Option<Arc<Texture>> {
        let revision = session.design_revision();
        if self.attempted_revision == Some(revision) {
            return self.last.clone();
        }

        let Some(upload) = session.uploaded_image() else {
            tracing::debug!("No uploaded image; skipping composite");
            return self.last.clone();
        };
        self.attempted_revision = Some(revision);

        let logo = match upload.decode() {
            Ok(logo) => logo,
            Err(e) => {
                tracing::warn!("Uploaded image could not be decoded: {}", e);
                return self.last.clone();
            }
        };

        let lines = session.text_lines();
        match self
            .compositor
            .composite(&logo, &lines, session.font_style(), session.text_color())
        {
            Some(data) => {
                tracing::debug!("Composited texture for design revision {}", revision);
                self.last = Some(Arc::new(Texture::new(data, revision)));
            }
            None => tracing::warn!("Uploaded image has no pixels; keeping previous texture"),
        }
        self.last.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
