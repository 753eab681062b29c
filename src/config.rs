//! Serializable session configuration.
//!
//! A [`TshirtConfig`] captures the session fields that make up a design in
//! the JSON document written by the config export.
//!
//! # Example
//!
//! ```
//! use tshirt_studio::{Configurable, SessionState, TshirtConfig};
//!
//! let session = SessionState::new();
//! let json = session.export_config().to_json_pretty().unwrap();
//!
//! let mut restored = SessionState::new();
//! restored.apply_config(&TshirtConfig::from_json(&json).unwrap());
//! assert_eq!(restored.height_cm(), 180);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::ingest::UploadedImage;
use crate::options::{Build, FontStyle};
use crate::session::SessionState;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Types that can be configured from, and exported to, a [`TshirtConfig`].
pub trait Configurable {
    /// Applies a config's settings to this instance.
    fn apply_config(&mut self, config: &TshirtConfig);

    /// Exports the current settings as a config.
    fn export_config(&self) -> TshirtConfig;
}

// ============================================================================
// TshirtConfig
// ============================================================================

/// The exported design document.
///
/// # JSON Format
///
/// ```json
/// {
///   "height": 180,
///   "weight": 80,
///   "build": "athletic",
///   "shirtColor": "#ffffff",
///   "fontStyle": "Arial",
///   "textColor": "#000000",
///   "customText": "",
///   "uploadedImage": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TshirtConfig {
    /// Height in centimeters.
    pub height: u32,
    /// Weight in kilograms.
    pub weight: u32,
    pub build: Build,
    pub shirt_color: HexColor,
    pub font_style: FontStyle,
    pub text_color: HexColor,
    pub custom_text: String,
    /// Data URL of the uploaded image, `null` when nothing was uploaded.
    #[serde(default)]
    pub uploaded_image: Option<UploadedImage>,
}

impl Default for TshirtConfig {
    fn default() -> Self {
        SessionState::default().export_config()
    }
}

impl TshirtConfig {
    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Configurable for SessionState {
    /// Applies every field through the session setters, so clamps and the
    /// line limit still hold for hand-edited documents.
    fn apply_config(&mut self, config: &TshirtConfig) {
        self.set_height(config.height);
        self.set_weight(config.weight);
        self.set_build(config.build);
        self.set_shirt_color(config.shirt_color);
        self.set_font_style(config.font_style);
        self.set_text_color(config.text_color);
        self.set_custom_text(&config.custom_text);
        if let Some(image) = &config.uploaded_image {
            self.set_uploaded_image(image.clone());
        }
    }

    fn export_config(&self) -> TshirtConfig {
        TshirtConfig {
            height: self.height_cm(),
            weight: self.weight_kg(),
            build: self.build(),
            shirt_color: self.shirt_color(),
            font_style: self.font_style(),
            text_color: self.text_color(),
            custom_text: self.custom_text().to_string(),
            uploaded_image: self.uploaded_image().cloned(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
