//! Skin theme: the console's colour scheme, loaded from `theme` TOML.

use serde::Deserialize;

use crate::color::{Color, parse_hex_color};

/// Colour scheme as hex strings, straight from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SkinTheme {
    /// Screen background.
    #[serde(default = "default_background")]
    pub background: String,
    /// Bars and card faces.
    #[serde(default = "default_panel")]
    pub panel: String,
    /// Card borders and separators.
    #[serde(default = "default_border")]
    pub border: String,
    /// Main phosphor colour: highlights, boot text, terminal text.
    #[serde(default = "default_primary")]
    pub primary: String,
    /// Call-to-action text ("PRESS ENTER").
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_dim_text")]
    pub dim_text: String,
    #[serde(default = "default_error")]
    pub error: String,
    /// Scanline overlay, usually translucent.
    #[serde(default = "default_scanline")]
    pub scanline: String,
}

fn default_background() -> String {
    "#09090B".to_string()
}
fn default_panel() -> String {
    "#18181B".to_string()
}
fn default_border() -> String {
    "#27272A".to_string()
}
fn default_primary() -> String {
    "#4ADE80".to_string()
}
fn default_accent() -> String {
    "#FDE047".to_string()
}
fn default_text() -> String {
    "#FFFFFF".to_string()
}
fn default_dim_text() -> String {
    "#71717A".to_string()
}
fn default_error() -> String {
    "#EF4444".to_string()
}
fn default_scanline() -> String {
    "#00000040".to_string()
}

impl Default for SkinTheme {
    fn default() -> Self {
        Self {
            background: default_background(),
            panel: default_panel(),
            border: default_border(),
            primary: default_primary(),
            accent: default_accent(),
            text: default_text(),
            dim_text: default_dim_text(),
            error: default_error(),
            scanline: default_scanline(),
        }
    }
}

/// Resolved colours, ready for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub panel: Color,
    pub border: Color,
    pub primary: Color,
    pub accent: Color,
    pub text: Color,
    pub dim_text: Color,
    pub error: Color,
    pub scanline: Color,
}

/// Parse `value`, falling back to `default` when it is malformed.
fn resolve(value: &str, default: &str) -> Color {
    parse_hex_color(value)
        .or_else(|| {
            log::warn!("Bad theme colour {value:?}, using {default}");
            parse_hex_color(default)
        })
        .unwrap_or(Color::WHITE)
}

impl SkinTheme {
    pub fn palette(&self) -> Palette {
        Palette {
            background: resolve(&self.background, &default_background()),
            panel: resolve(&self.panel, &default_panel()),
            border: resolve(&self.border, &default_border()),
            primary: resolve(&self.primary, &default_primary()),
            accent: resolve(&self.accent, &default_accent()),
            text: resolve(&self.text, &default_text()),
            dim_text: resolve(&self.dim_text, &default_dim_text()),
            error: resolve(&self.error, &default_error()),
            scanline: resolve(&self.scanline, &default_scanline()),
        }
    }
}
