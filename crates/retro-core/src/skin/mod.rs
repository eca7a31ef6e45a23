//! Skins: colour theme plus user-visible strings, from TOML.

pub mod builtin;
mod strings;
mod theme;

use serde::Deserialize;

use crate::error::{Result, RetroError};

pub use builtin::{builtin_names, load_builtin};
pub use strings::SkinStrings;
pub use theme::{Palette, SkinTheme};

/// Skin identity (`manifest` TOML).
#[derive(Debug, Clone, Deserialize)]
pub struct SkinManifest {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// A fully loaded skin.
#[derive(Debug, Clone)]
pub struct Skin {
    pub manifest: SkinManifest,
    pub theme: SkinTheme,
    pub strings: SkinStrings,
}

impl Skin {
    /// Parse a skin. Empty theme or strings TOML means all defaults.
    pub fn from_toml(manifest_toml: &str, theme_toml: &str, strings_toml: &str) -> Result<Self> {
        let manifest: SkinManifest = toml::from_str(manifest_toml)
            .map_err(|e| RetroError::Config(format!("skin manifest: {e}")))?;

        let theme: SkinTheme = if theme_toml.is_empty() {
            SkinTheme::default()
        } else {
            toml::from_str(theme_toml).map_err(|e| RetroError::Config(format!("theme: {e}")))?
        };

        let strings: SkinStrings = if strings_toml.is_empty() {
            SkinStrings::default()
        } else {
            toml::from_str(strings_toml)
                .map_err(|e| RetroError::Config(format!("strings: {e}")))?
        };

        Ok(Self {
            manifest,
            theme,
            strings,
        })
    }

    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }
}
