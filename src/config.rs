use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ui::theme::{parse_hex_color, Theme};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub appearance: AppearanceConfig,
    pub export: ExportConfig,
    /// Label overrides, keyed like the rubric content's `l10n` object
    pub l10n: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset: "darkwall", "catppuccin", "nord", "gruvbox"
    pub theme: String,
    /// Per-color hex overrides on top of the preset
    pub colors: ColorOverrides,
    /// Marker drawn in front of the selected level of a row
    pub selected_marker: String,
    /// Height of one criterion band in lines
    pub row_height: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub selection_bg: Option<String>,
    pub selection_fg: Option<String>,
    pub accent: Option<String>,
    pub dimmed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that downloaded responses are written to
    pub directory: PathBuf,
    /// Terminate CSV records with CRLF (RFC 4180) instead of LF
    pub crlf: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "darkwall".to_string(),
            colors: ColorOverrides::default(),
            selected_marker: "● ".to_string(),
            row_height: 4,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            crlf: true,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Preset theme with valid color overrides applied
    pub fn resolve_theme(&self) -> Theme {
        let appearance = &self.appearance;
        let mut theme = Theme::from_preset(&appearance.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme {:?}, using default", appearance.theme);
            Theme::default()
        });

        let colors = &appearance.colors;
        let overrides = [
            ("background", &colors.background, &mut theme.background),
            ("foreground", &colors.foreground, &mut theme.foreground),
            ("selection_bg", &colors.selection_bg, &mut theme.selection_bg),
            ("selection_fg", &colors.selection_fg, &mut theme.selection_fg),
            ("accent", &colors.accent, &mut theme.accent),
            ("dimmed", &colors.dimmed, &mut theme.dimmed),
        ];

        for (name, value, slot) in overrides {
            let Some(hex) = value else { continue };
            match parse_hex_color(hex) {
                Ok(color) => *slot = color,
                Err(e) => tracing::warn!("Ignoring color override {}={:?}: {}", name, hex, e),
            }
        }

        theme
    }
}
