//! Color themes for the rubric grid
//!
//! Built-in presets plus hex parsing for per-color overrides from config.

use ratatui::style::Color;
use thiserror::Error;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main background color
    pub background: Color,
    /// Primary text color
    pub foreground: Color,
    /// Background of the selected level in each row
    pub selection_bg: Color,
    /// Text color of the selected level
    pub selection_fg: Color,
    /// Borders, cursor cell, title
    pub accent: Color,
    /// Guideline text, hints
    pub dimmed: Color,
    /// Grid lines, placeholders
    pub dimmed_alt: Color,
    /// Download succeeded
    pub status_ok: Color,
    /// Download failed
    pub status_error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::darkwall()
    }
}

impl Theme {
    pub fn darkwall() -> Self {
        Self {
            background: Color::Rgb(13, 17, 22),      // #0d1116
            foreground: Color::Rgb(229, 234, 241),   // #e5eaf1
            selection_bg: Color::Rgb(120, 53, 15),   // #78350f
            selection_fg: Color::Rgb(254, 243, 199), // #fef3c7
            accent: Color::Rgb(217, 119, 6),         // #d97706
            dimmed: Color::Rgb(156, 163, 175),       // #9ca3af
            dimmed_alt: Color::Rgb(75, 85, 99),      // #4b5563
            status_ok: Color::Rgb(34, 197, 94),      // #22c55e
            status_error: Color::Rgb(239, 68, 68),   // #ef4444
        }
    }

    /// Catppuccin Mocha
    pub fn catppuccin() -> Self {
        Self {
            background: Color::Rgb(30, 30, 46),      // base
            foreground: Color::Rgb(205, 214, 244),   // text
            selection_bg: Color::Rgb(69, 71, 90),    // surface1
            selection_fg: Color::Rgb(249, 226, 175), // yellow
            accent: Color::Rgb(137, 180, 250),       // blue
            dimmed: Color::Rgb(166, 173, 200),       // subtext0
            dimmed_alt: Color::Rgb(88, 91, 112),     // surface2
            status_ok: Color::Rgb(166, 227, 161),    // green
            status_error: Color::Rgb(243, 139, 168), // red
        }
    }

    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),      // nord0
            foreground: Color::Rgb(236, 239, 244),   // nord6
            selection_bg: Color::Rgb(94, 129, 172),  // nord10
            selection_fg: Color::Rgb(236, 239, 244), // nord6
            accent: Color::Rgb(136, 192, 208),       // nord8
            dimmed: Color::Rgb(216, 222, 233),       // nord4
            dimmed_alt: Color::Rgb(76, 86, 106),     // nord3
            status_ok: Color::Rgb(163, 190, 140),    // nord14
            status_error: Color::Rgb(191, 97, 106),  // nord11
        }
    }

    /// Gruvbox dark
    pub fn gruvbox() -> Self {
        Self {
            background: Color::Rgb(40, 40, 40),      // bg
            foreground: Color::Rgb(235, 219, 178),   // fg
            selection_bg: Color::Rgb(102, 92, 84),   // bg3
            selection_fg: Color::Rgb(250, 189, 47),  // bright yellow
            accent: Color::Rgb(215, 153, 33),        // yellow
            dimmed: Color::Rgb(168, 153, 132),       // gray
            dimmed_alt: Color::Rgb(80, 73, 69),      // bg2
            status_ok: Color::Rgb(152, 151, 26),     // green
            status_error: Color::Rgb(204, 36, 29),   // red
        }
    }

    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "darkwall" | "default" => Some(Self::darkwall()),
            "catppuccin" | "catppuccin-mocha" | "catppuccin_mocha" => Some(Self::catppuccin()),
            "nord" => Some(Self::nord()),
            "gruvbox" | "gruvbox-dark" | "gruvbox_dark" => Some(Self::gruvbox()),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("invalid color length (expected 3, 6, or 8 hex chars)")]
    InvalidLength,
    #[error("invalid hex character")]
    InvalidHex,
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (alpha ignored), `#` optional
pub fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ColorError::InvalidHex);
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ColorError::InvalidHex)
    };

    match s.len() {
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        6 | 8 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => Err(ColorError::InvalidLength),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_color("#ff0000"), Ok(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("0d1116"), Ok(Color::Rgb(13, 17, 22)));
        assert_eq!(parse_hex_color("#f00"), Ok(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#00ff0080"), Ok(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert_eq!(parse_hex_color("#gg0000"), Err(ColorError::InvalidHex));
        assert_eq!(parse_hex_color("#ff00"), Err(ColorError::InvalidLength));
        assert_eq!(parse_hex_color("#é00"), Err(ColorError::InvalidHex));
    }

    #[test]
    fn test_presets() {
        for name in ["darkwall", "catppuccin", "Nord", "gruvbox-dark"] {
            assert!(Theme::from_preset(name).is_some(), "{}", name);
        }
        assert!(Theme::from_preset("nonexistent").is_none());
    }
}
