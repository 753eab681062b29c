//! Placement arithmetic for the logo and the text lines.
//!
//! The offsets are deliberately off-center: the logo sits at a quarter of
//! the free width and the free height divided by 1.7, and the text is
//! centered on `width / 3.5`. Together they land the design on the upper
//! left chest area of the garment UV layout.

/// Side length of the square texture canvas.
pub const CANVAS_SIZE: u32 = 1024;

/// The logo must fit in this fraction of the canvas on each axis.
pub const LOGO_MAX_FRACTION: f32 = 0.2;

pub const FONT_SIZE_PX: f32 = 48.0;

/// Gap between the bottom of the logo and the first text line.
pub const TEXT_GAP_PX: f32 = 30.0;

/// Vertical distance between consecutive text lines.
pub const LINE_ADVANCE_PX: f32 = 50.0;

const LOGO_X_DIVISOR: f32 = 4.0;
const LOGO_Y_DIVISOR: f32 = 1.7;
const TEXT_X_DIVISOR: f32 = 3.5;

/// A rectangle in canvas coordinates, with fractional position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// The logo size after fitting, and the scale that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoFit {
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Fits a `width x height` image inside `max_width x max_height`.
///
/// Width is corrected first; the height is then re-checked and corrected
/// again if it still overflows. An image that already fits is left at
/// scale 1.0, and so is an axis of zero length.
pub fn fit_logo(width: u32, height: u32, max_width: f32, max_height: f32) -> LogoFit {
    let mut w = width as f32;
    let mut h = height as f32;

    if w > max_width {
        let ratio = max_width / w;
        w = max_width;
        h *= ratio;
    }

    if h > max_height {
        let ratio = max_height / h;
        h = max_height;
        w *= ratio;
    }

    let scale = |fitted: f32, original: u32| {
        if original == 0 { 1.0 } else { fitted / original as f32 }
    };
    LogoFit {
        width: w,
        height: h,
        scale_x: scale(w, width),
        scale_y: scale(h, height),
    }
}

/// Anchor of one text line: horizontally centered on `x`, top edge at `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Where everything goes on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub logo: RectF,
    pub fit: LogoFit,
    pub lines: Vec<TextLine>,
}

impl Layout {
    /// Computes the layout for a logo of the given pixel size and the given
    /// text lines. Callers pass at most three lines; empty lines still
    /// reserve their slot.
    pub fn compute(
        canvas_width: u32,
        canvas_height: u32,
        logo_width: u32,
        logo_height: u32,
        lines: &[&str],
    ) -> Self {
        let cw = canvas_width as f32;
        let ch = canvas_height as f32;
        let fit = fit_logo(
            logo_width,
            logo_height,
            cw * LOGO_MAX_FRACTION,
            ch * LOGO_MAX_FRACTION,
        );

        let logo = RectF {
            x: (cw - fit.width) / LOGO_X_DIVISOR,
            y: (ch - fit.height) / LOGO_Y_DIVISOR,
            width: fit.width,
            height: fit.height,
        };

        let text_x = cw / TEXT_X_DIVISOR;
        let first_line_y = logo.bottom() + TEXT_GAP_PX;
        let lines = lines
            .iter()
            .enumerate()
            .map(|(i, text)| TextLine {
                text: (*text).to_string(),
                x: text_x,
                y: first_line_y + i as f32 * LINE_ADVANCE_PX,
            })
            .collect();

        Self {
            canvas_width,
            canvas_height,
            logo,
            fit,
            lines,
        }
    }
}
