//! Drawing primitives on top of resvg's tiny-skia and usvg.
//!
//! Bitmaps are drawn with tiny-skia so fractional placement and scaling
//! behave like a 2D canvas. Text is laid out by building a small SVG
//! document and rendering it with resvg against a shared font database.

use std::fmt::Write as _;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    Color, FilterQuality, IntSize, Pixmap, PixmapPaint, PremultipliedColorU8, Transform,
};
use resvg::usvg::{Options, Tree, fontdb};

use super::layout::{FONT_SIZE_PX, RectF, TextLine};
use crate::color::HexColor;
use crate::options::FontStyle;

// ============================================================================
// Pixmap conversion
// ============================================================================

/// Creates a canvas filled with opaque white.
pub fn white_canvas(width: u32, height: u32) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)?;
    pixmap.fill(Color::WHITE);
    Some(pixmap)
}

/// Converts straight-alpha RGBA pixels into a premultiplied pixmap.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let mut data = Vec::with_capacity(img.as_raw().len());
    for pixel in img.pixels() {
        let [r, g, b, a] = pixel.0;
        data.extend_from_slice(&[premultiply(r, a), premultiply(g, a), premultiply(b, a), a]);
    }
    Pixmap::from_vec(data, size)
}

/// Converts a tiny-skia pixmap back into straight-alpha RGBA pixels.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        *dst = unpremultiply(*src);
    }
    img
}

fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u16 * a as u16 + 127) / 255) as u8
}

fn unpremultiply(pixel: PremultipliedColorU8) -> Rgba<u8> {
    let a = pixel.alpha();
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let a_f = a as f32 / 255.0;
    let channel = |c: u8| (c as f32 / a_f).round().min(255.0) as u8;
    Rgba([channel(pixel.red()), channel(pixel.green()), channel(pixel.blue()), a])
}

// ============================================================================
// Bitmap drawing
// ============================================================================

/// Draws `src` scaled into `rect`, which may have fractional position and size.
pub fn draw_image(canvas: &mut Pixmap, src: &Pixmap, rect: RectF) {
    let sx = rect.width / src.width() as f32;
    let sy = rect.height / src.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_row(sx, 0.0, 0.0, sy, rect.x, rect.y);
    canvas.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
}

// ============================================================================
// Text
// ============================================================================

const SANS_SERIF_FAMILIES: &[&str] = &[
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
    "Helvetica",
];
const SERIF_FAMILIES: &[&str] = &[
    "Times New Roman",
    "Liberation Serif",
    "DejaVu Serif",
    "Noto Serif",
    "FreeSerif",
    "Times",
];
const MONOSPACE_FAMILIES: &[&str] = &[
    "Courier New",
    "Liberation Mono",
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "FreeMono",
    "Courier",
];

/// Loads the fonts installed on this machine.
pub fn system_fonts() -> Arc<fontdb::Database> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    assign_generic_families(&mut db);
    tracing::debug!("Loaded {} font faces", db.len());
    Arc::new(db)
}

/// Points the generic families at faces that are actually installed.
///
/// fontdb maps `sans-serif`, `serif` and `monospace` to the Microsoft core
/// fonts, which most Linux machines lack. Each generic gets the first
/// installed candidate, or any installed family as a last resort.
pub(crate) fn assign_generic_families(db: &mut fontdb::Database) {
    let Some(any) = db.faces().find_map(|f| f.families.first()).map(|(name, _)| name.clone())
    else {
        return;
    };
    let pick = |candidates: &[&str]| {
        installed_family(db, candidates).unwrap_or_else(|| any.clone())
    };
    let sans = pick(SANS_SERIF_FAMILIES);
    let serif = pick(SERIF_FAMILIES);
    let mono = pick(MONOSPACE_FAMILIES);
    tracing::debug!("Generic fonts: sans-serif={sans}, serif={serif}, monospace={mono}");

    db.set_sans_serif_family(sans);
    db.set_serif_family(serif);
    db.set_monospace_family(mono);
}

fn installed_family(db: &fontdb::Database, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|name| {
            db.faces()
                .any(|f| f.families.iter().any(|(family, _)| family.eq_ignore_ascii_case(name)))
        })
        .map(|name| (*name).to_string())
}

/// Builds an SVG document that draws `lines` in bold text.
///
/// Each line is centered on its anchor `x` with its top edge at `y`.
pub fn text_svg(
    width: u32,
    height: u32,
    lines: &[TextLine],
    font: FontStyle,
    color: HexColor,
) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for line in lines.iter().filter(|l| !l.text.is_empty()) {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="'{}', {}" font-weight="bold" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="text-before-edge" xml:space="preserve">{}</text>"#,
            line.x,
            line.y,
            font.family(),
            font.generic_family(),
            FONT_SIZE_PX,
            color,
            escape_xml(&line.text),
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Renders the text lines onto the canvas.
///
/// Lines whose fonts cannot be resolved are skipped by usvg; nothing here
/// fails loudly.
pub fn draw_text(
    canvas: &mut Pixmap,
    lines: &[TextLine],
    font: FontStyle,
    color: HexColor,
    fonts: &Arc<fontdb::Database>,
) {
    if lines.iter().all(|l| l.text.is_empty()) {
        return;
    }

    let svg = text_svg(canvas.width(), canvas.height(), lines, font, color);
    let opts = Options {
        fontdb: Arc::clone(fonts),
        ..Options::default()
    };
    let tree = match Tree::from_str(&svg, &opts) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!("Failed to lay out overlay text: {}", e);
            return;
        }
    };
    resvg::render(&tree, Transform::identity(), &mut canvas.as_mut());
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
