//! Session state: the user's current selections.
//!
//! [`SessionState`] is the only place selections live. Every change goes
//! through a setter, and each setter keeps the invariants of its field.
//!
//! Changes to the compositor inputs bump the [`design revision`](SessionState::design_revision),
//! which downstream caches compare against to decide whether to rebuild.

use crate::color::HexColor;
use crate::ingest::UploadedImage;
use crate::options::{Build, FontStyle, Theme};

pub const HEIGHT_RANGE_CM: (u32, u32) = (100, 250);
pub const WEIGHT_RANGE_KG: (u32, u32) = (30, 200);
pub const MAX_TEXT_LINES: usize = 3;

const REFERENCE_HEIGHT_CM: f64 = 180.0;

/// Preview scale for a height and build.
pub fn avatar_scale(height_cm: u32, build: Build) -> f64 {
    (height_cm as f64 / REFERENCE_HEIGHT_CM) * build.scale_factor()
}

/// Everything the user has selected in this session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    height_cm: u32,
    weight_kg: u32,
    build: Build,
    shirt_color: HexColor,
    theme: Theme,
    font_style: FontStyle,
    text_color: HexColor,
    custom_text: String,
    uploaded_image: Option<UploadedImage>,
    show_preview: bool,
    avatar_scale: f64,
    design_revision: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        let height_cm = 180;
        let build = Build::default();
        Self {
            height_cm,
            weight_kg: 80,
            build,
            shirt_color: HexColor::WHITE,
            theme: Theme::default(),
            font_style: FontStyle::default(),
            text_color: HexColor::BLACK,
            custom_text: String::new(),
            uploaded_image: None,
            show_preview: false,
            avatar_scale: avatar_scale(height_cm, build),
            design_revision: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Body profile ----

    pub fn height_cm(&self) -> u32 {
        self.height_cm
    }

    /// Sets the height, clamped to the slider range.
    pub fn set_height(&mut self, height_cm: u32) {
        self.height_cm = height_cm.clamp(HEIGHT_RANGE_CM.0, HEIGHT_RANGE_CM.1);
        self.recompute_scale();
    }

    pub fn weight_kg(&self) -> u32 {
        self.weight_kg
    }

    /// Sets the weight, clamped to the slider range. Does not affect the scale.
    pub fn set_weight(&mut self, weight_kg: u32) {
        self.weight_kg = weight_kg.clamp(WEIGHT_RANGE_KG.0, WEIGHT_RANGE_KG.1);
    }

    pub fn build(&self) -> Build {
        self.build
    }

    pub fn set_build(&mut self, build: Build) {
        self.build = build;
        self.recompute_scale();
    }

    pub fn avatar_scale(&self) -> f64 {
        self.avatar_scale
    }

    fn recompute_scale(&mut self) {
        self.avatar_scale = avatar_scale(self.height_cm, self.build);
    }

    // ---- Garment appearance ----

    pub fn shirt_color(&self) -> HexColor {
        self.shirt_color
    }

    pub fn set_shirt_color(&mut self, color: HexColor) {
        self.shirt_color = color;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    // ---- Design overlay ----

    pub fn font_style(&self) -> FontStyle {
        self.font_style
    }

    pub fn set_font_style(&mut self, font: FontStyle) {
        if self.font_style != font {
            self.font_style = font;
            self.bump_design();
        }
    }

    pub fn text_color(&self) -> HexColor {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: HexColor) {
        if self.text_color != color {
            self.text_color = color;
            self.bump_design();
        }
    }

    pub fn custom_text(&self) -> &str {
        &self.custom_text
    }

    /// Replaces the overlay text.
    ///
    /// An edit with more than [`MAX_TEXT_LINES`] lines is rejected and the
    /// previous text is kept. Returns whether the edit was accepted.
    pub fn set_custom_text(&mut self, text: &str) -> bool {
        if text.split('\n').count() > MAX_TEXT_LINES {
            tracing::debug!("Rejected text edit with more than {MAX_TEXT_LINES} lines");
            return false;
        }
        if self.custom_text != text {
            self.custom_text = text.to_string();
            self.bump_design();
        }
        true
    }

    /// The overlay text split into the lines the compositor draws.
    pub fn text_lines(&self) -> Vec<&str> {
        if self.custom_text.is_empty() {
            return Vec::new();
        }
        self.custom_text.split('\n').take(MAX_TEXT_LINES).collect()
    }

    pub fn uploaded_image(&self) -> Option<&UploadedImage> {
        self.uploaded_image.as_ref()
    }

    /// Publishes a newly ingested image. The latest upload always wins.
    pub fn set_uploaded_image(&mut self, image: UploadedImage) {
        self.uploaded_image = Some(image);
        self.bump_design();
    }

    /// Revision of the compositor inputs (image, text, font, text color).
    pub fn design_revision(&self) -> u64 {
        self.design_revision
    }

    fn bump_design(&mut self) {
        self.design_revision = self.design_revision.wrapping_add(1);
    }

    // ---- Preview visibility ----

    pub fn show_preview(&self) -> bool {
        self.show_preview
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.show_preview = !self.show_preview;
        tracing::debug!("Preview visibility is now {}", self.show_preview);
        self.show_preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = SessionState::new();
        assert_eq!(state.height_cm(), 180);
        assert_eq!(state.weight_kg(), 80);
        assert_eq!(state.build(), Build::Athletic);
        assert_eq!(state.shirt_color(), HexColor::WHITE);
        assert_eq!(state.font_style(), FontStyle::Arial);
        assert_eq!(state.text_color(), HexColor::BLACK);
        assert_eq!(state.custom_text(), "");
        assert!(state.uploaded_image().is_none());
        assert!(!state.show_preview());
        assert_eq!(state.avatar_scale(), 1.0);
    }

    #[test]
    fn scale_formula_holds_over_full_range() {
        for height in HEIGHT_RANGE_CM.0..=HEIGHT_RANGE_CM.1 {
            for build in Build::OPTIONS {
                let expected = (height as f64 / 180.0) * build.scale_factor();
                assert!((avatar_scale(height, build) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn scale_scenarios() {
        let mut state = SessionState::new();
        state.set_height(180);
        state.set_build(Build::Athletic);
        assert!((state.avatar_scale() - 1.0).abs() < 1e-9);

        state.set_height(200);
        state.set_build(Build::Big);
        assert!((state.avatar_scale() - 200.0 / 180.0 * 1.1).abs() < 1e-9);
        assert!((state.avatar_scale() - 1.2222).abs() < 1e-3);
    }

    #[test]
    fn weight_does_not_change_scale() {
        let mut state = SessionState::new();
        state.set_weight(150);
        assert_eq!(state.avatar_scale(), 1.0);
    }

    #[test]
    fn measurements_are_clamped() {
        let mut state = SessionState::new();
        state.set_height(20);
        assert_eq!(state.height_cm(), 100);
        state.set_height(400);
        assert_eq!(state.height_cm(), 250);
        state.set_weight(5);
        assert_eq!(state.weight_kg(), 30);
        state.set_weight(999);
        assert_eq!(state.weight_kg(), 200);
    }

    #[test]
    fn four_line_edit_is_rejected() {
        let mut state = SessionState::new();
        assert!(state.set_custom_text("one\ntwo"));
        let revision = state.design_revision();

        assert!(!state.set_custom_text("a\nb\nc\nd"));
        assert_eq!(state.custom_text(), "one\ntwo");
        assert_eq!(state.design_revision(), revision);

        assert!(state.set_custom_text("a\nb\nc"));
        assert_eq!(state.text_lines(), ["a", "b", "c"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        let state = SessionState::new();
        assert!(state.text_lines().is_empty());
    }

    #[test]
    fn only_design_inputs_bump_revision() {
        let mut state = SessionState::new();
        let start = state.design_revision();

        state.set_height(190);
        state.set_shirt_color(HexColor::rgb(1, 2, 3));
        state.set_theme(Theme::Funky);
        state.toggle_preview();
        assert_eq!(state.design_revision(), start);

        state.set_font_style(FontStyle::Georgia);
        state.set_text_color(HexColor::rgb(200, 0, 0));
        state.set_custom_text("hi");
        state.set_uploaded_image(UploadedImage::from_bytes(&[0u8; 4]));
        assert_eq!(state.design_revision(), start + 4);

        // Unchanged values leave the revision alone.
        state.set_font_style(FontStyle::Georgia);
        state.set_custom_text("hi");
        assert_eq!(state.design_revision(), start + 4);
    }

    #[test]
    fn toggle_flips() {
        let mut state = SessionState::new();
        assert!(state.toggle_preview());
        assert!(!state.toggle_preview());
    }
}
