//! Widget view model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::document::PLACEHOLDER_DISPLAY_TEXT;

/// ARGB colour as the widget host understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    #[must_use]
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// Host caches use 0 for "no colour chosen".
    #[must_use]
    pub const fn from_raw_setting(argb: u32) -> Option<Self> {
        if argb == 0 {
            None
        } else {
            Some(Self(argb))
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#RRGGBB` (opaque) and `#AARRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let value = u32::from_str_radix(hex, 16)
            .map_err(|_| format!("invalid colour '{s}': expected #RRGGBB or #AARRGGBB"))?;
        match hex.len() {
            6 => Ok(Self(0xFF00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(format!(
                "invalid colour '{s}': expected #RRGGBB or #AARRGGBB"
            )),
        }
    }
}

/// Host-chosen colours applied to every rendered view model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetTheme {
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
}

/// Everything a surface instance needs to repaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetViewModel {
    pub text: String,
    /// Normalized `file://` URI; `None` hides the image view
    pub image_uri: Option<String>,
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
}

impl WidgetViewModel {
    /// Built-in content shown before anything has ever been rendered.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            text: PLACEHOLDER_DISPLAY_TEXT.to_string(),
            image_uri: None,
            background_color: None,
            text_color: None,
        }
    }

    #[must_use]
    pub const fn is_image_visible(&self) -> bool {
        self.image_uri.is_some()
    }

    /// Replace the colours with the host theme.
    #[must_use]
    pub fn with_theme(mut self, theme: WidgetTheme) -> Self {
        self.background_color = theme.background_color;
        self.text_color = theme.text_color;
        self
    }
}
