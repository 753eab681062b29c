//! Closed option sets offered by the configurator form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::HexColor;

// ============================================================================
// Build
// ============================================================================

/// Coarse body type, used only to adjust the preview scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Build {
    Lean,
    Regular,
    #[default]
    Athletic,
    Big,
}

impl Build {
    /// Builds offered by the form, in display order.
    pub const OPTIONS: [Build; 4] = [Build::Lean, Build::Regular, Build::Athletic, Build::Big];

    /// Multiplicative factor applied to the height-derived scale.
    pub fn scale_factor(self) -> f64 {
        match self {
            Build::Lean => 0.9,
            Build::Big => 1.1,
            Build::Regular | Build::Athletic => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Build::Lean => "lean",
            Build::Regular => "regular",
            Build::Athletic => "athletic",
            Build::Big => "big",
        }
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Build {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown build {s:?}"))
    }
}

// ============================================================================
// FontStyle
// ============================================================================

/// Font used for the overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Arial,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    #[serde(rename = "Courier New")]
    CourierNew,
    Verdana,
    Georgia,
}

impl FontStyle {
    pub const OPTIONS: [FontStyle; 5] = [
        FontStyle::Arial,
        FontStyle::TimesNewRoman,
        FontStyle::CourierNew,
        FontStyle::Verdana,
        FontStyle::Georgia,
    ];

    /// The family name as the user sees it.
    pub fn family(self) -> &'static str {
        match self {
            FontStyle::Arial => "Arial",
            FontStyle::TimesNewRoman => "Times New Roman",
            FontStyle::CourierNew => "Courier New",
            FontStyle::Verdana => "Verdana",
            FontStyle::Georgia => "Georgia",
        }
    }

    /// Generic family used when the named font is not installed.
    pub fn generic_family(self) -> &'static str {
        match self {
            FontStyle::Arial | FontStyle::Verdana => "sans-serif",
            FontStyle::TimesNewRoman | FontStyle::Georgia => "serif",
            FontStyle::CourierNew => "monospace",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family())
    }
}

impl FromStr for FontStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .into_iter()
            .find(|f| f.family().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown font {s:?}"))
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Named style preset for the form. Never affects the garment design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Modern,
    Funky,
}

/// Typography and color of the form under a [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub font_family: &'static str,
    pub text_size: TextSize,
    pub text_color: HexColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Base,
    Medium,
    Large,
}

impl Theme {
    pub const OPTIONS: [Theme; 3] = [Theme::Classic, Theme::Modern, Theme::Funky];

    pub fn preset(self) -> ThemePreset {
        match self {
            Theme::Classic => ThemePreset {
                font_family: "serif",
                text_size: TextSize::Base,
                text_color: HexColor::rgb(0x11, 0x18, 0x27),
            },
            Theme::Modern => ThemePreset {
                font_family: "sans-serif",
                text_size: TextSize::Large,
                text_color: HexColor::rgb(0x1f, 0x29, 0x37),
            },
            Theme::Funky => ThemePreset {
                font_family: "monospace",
                text_size: TextSize::Medium,
                text_color: HexColor::rgb(0x7e, 0x22, 0xce),
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Modern => "modern",
            Theme::Funky => "funky",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown theme {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_factors() {
        assert_eq!(Build::Lean.scale_factor(), 0.9);
        assert_eq!(Build::Regular.scale_factor(), 1.0);
        assert_eq!(Build::Athletic.scale_factor(), 1.0);
        assert_eq!(Build::Big.scale_factor(), 1.1);
    }

    #[test]
    fn build_options_include_default() {
        assert!(Build::OPTIONS.contains(&Build::default()));
    }

    #[test]
    fn font_names_serialize_as_display_names() {
        let json = serde_json::to_string(&FontStyle::TimesNewRoman).unwrap();
        assert_eq!(json, "\"Times New Roman\"");
        let parsed: FontStyle = serde_json::from_str("\"Courier New\"").unwrap();
        assert_eq!(parsed, FontStyle::CourierNew);
    }

    #[test]
    fn parse_from_cli_strings() {
        assert_eq!("BIG".parse::<Build>().unwrap(), Build::Big);
        assert_eq!("georgia".parse::<FontStyle>().unwrap(), FontStyle::Georgia);
        assert_eq!("funky".parse::<Theme>().unwrap(), Theme::Funky);
        assert!("huge".parse::<Build>().is_err());
    }

    #[test]
    fn theme_presets_are_distinct() {
        let fonts: Vec<_> = Theme::OPTIONS.iter().map(|t| t.preset().font_family).collect();
        assert_eq!(fonts, ["serif", "sans-serif", "monospace"]);
    }
}
