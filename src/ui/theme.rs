use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::session::status::Severity;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "terminal-default";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub key_bg: String,
    pub key_fg: String,
    pub key_focused_bg: String,
    pub key_focused_fg: String,
    /// Control buttons whose mode or language is currently active.
    pub key_active: String,
    pub caps_pending: String,
    pub text_cursor_bg: String,
    pub text_cursor_fg: String,
    pub text_selection_bg: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// User themes in `<config_dir>/harfboard/themes/` shadow bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir.join("harfboard").join("themes").join(&filename);
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => tracing::warn!(
                        path = %user_theme_path.display(),
                        "ignoring malformed theme: {err}"
                    ),
                }
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }

    /// Falls back to the default theme, then to built-in colors.
    pub fn load_or_default(name: &str) -> Self {
        Self::load(name).unwrap_or_else(|| {
            tracing::warn!(theme = name, "unknown theme, using default");
            Self::default()
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1c1c1c".to_string(),
            fg: "#d0d0d0".to_string(),
            key_bg: "#303030".to_string(),
            key_fg: "#e4e4e4".to_string(),
            key_focused_bg: "#ffd75f".to_string(),
            key_focused_fg: "#1c1c1c".to_string(),
            key_active: "#5f87d7".to_string(),
            caps_pending: "#d7875f".to_string(),
            text_cursor_bg: "#e4e4e4".to_string(),
            text_cursor_fg: "#1c1c1c".to_string(),
            text_selection_bg: "#445566".to_string(),
            accent: "#5f87d7".to_string(),
            border: "#4e4e4e".to_string(),
            border_focused: "#5f87d7".to_string(),
            header_bg: "#262626".to_string(),
            header_fg: "#d0d0d0".to_string(),
            error: "#d75f5f".to_string(),
            warning: "#d7af5f".to_string(),
            success: "#87af5f".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn key_bg(&self) -> Color { Self::parse_color(&self.key_bg) }
    pub fn key_fg(&self) -> Color { Self::parse_color(&self.key_fg) }
    pub fn key_focused_bg(&self) -> Color { Self::parse_color(&self.key_focused_bg) }
    pub fn key_focused_fg(&self) -> Color { Self::parse_color(&self.key_focused_fg) }
    pub fn key_active(&self) -> Color { Self::parse_color(&self.key_active) }
    pub fn caps_pending(&self) -> Color { Self::parse_color(&self.caps_pending) }
    pub fn text_cursor_bg(&self) -> Color { Self::parse_color(&self.text_cursor_bg) }
    pub fn text_cursor_fg(&self) -> Color { Self::parse_color(&self.text_cursor_fg) }
    pub fn text_selection_bg(&self) -> Color { Self::parse_color(&self.text_selection_bg) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.accent(),
            Severity::Success => self.success(),
            Severity::Warning => self.warning(),
            Severity::Error => self.error(),
        }
    }
}
