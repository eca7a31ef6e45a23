//! Runtime configuration.
//!
//! There are no configuration files: every value has a compiled-in default
//! and a handful (API key, model names) can be overridden from the
//! environment when the process starts.

use std::time::Duration;

/// Top-level RETRO_OS configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetroConfig {
    pub window_title: String,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Cards per menu row; also the vertical navigation stride.
    pub grid_columns: usize,
    /// Delay between two revealed boot lines.
    pub boot_line_interval: Duration,
    /// Pause after the last boot line before the menu appears.
    pub boot_settle: Duration,
    /// Number of unavailable bootleg entries appended to the catalog.
    pub placeholder_count: usize,
    /// Initial volume, 0-100.
    pub default_volume: u8,
    /// Host of the generative model REST API.
    pub api_host: String,
    /// API key; `None` makes every remote call fail with a config error.
    pub api_key: Option<String>,
    pub chat_model: String,
    pub script_model: String,
    pub image_model: String,
    /// Built-in skin name.
    pub skin: String,
}

impl Default for RetroConfig {
    fn default() -> Self {
        Self {
            window_title: "RETRO-OS".to_string(),
            screen_width: 800,
            screen_height: 600,
            grid_columns: 4,
            boot_line_interval: Duration::from_millis(200),
            boot_settle: Duration::from_millis(1000),
            placeholder_count: 64,
            default_volume: 80,
            api_host: "generativelanguage.googleapis.com".to_string(),
            api_key: None,
            chat_model: "gemini-3-pro-preview".to_string(),
            script_model: "gemini-3-pro-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            skin: "retro".to_string(),
        }
    }
}

impl RetroConfig {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` to resolve variable names.
    ///
    /// `GEMINI_API_KEY` wins over `API_KEY`. Empty values are ignored.
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GEMINI_API_KEY").or_else(|| get("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = get("RETRO_CHAT_MODEL") {
            self.chat_model = model;
        }
        if let Some(model) = get("RETRO_SCRIPT_MODEL") {
            self.script_model = model;
        }
        if let Some(model) = get("RETRO_IMAGE_MODEL") {
            self.image_model = model;
        }
        if let Some(skin) = get("RETRO_SKIN") {
            self.skin = skin.trim().to_ascii_lowercase();
        }
        if self.api_key.is_none() {
            log::warn!("No API key in GEMINI_API_KEY or API_KEY; AI terminal will be offline");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_console_layout() {
        let c = RetroConfig::default();
        assert_eq!(c.grid_columns, 4);
        assert_eq!(c.boot_line_interval, Duration::from_millis(200));
        assert_eq!(c.boot_settle, Duration::from_millis(1000));
        assert_eq!(c.placeholder_count, 64);
        assert_eq!(c.default_volume, 80);
        assert!(c.api_key.is_none());
    }

    #[test]
    fn gemini_key_preferred_over_generic() {
        let c = RetroConfig::default()
            .with_env_lookup(lookup(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "gemini")]));
        assert_eq!(c.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn generic_key_used_as_fallback() {
        let c = RetroConfig::default().with_env_lookup(lookup(&[("API_KEY", "generic")]));
        assert_eq!(c.api_key.as_deref(), Some("generic"));
    }

    #[test]
    fn blank_values_ignored() {
        let c = RetroConfig::default()
            .with_env_lookup(lookup(&[("GEMINI_API_KEY", "  "), ("RETRO_CHAT_MODEL", "")]));
        assert!(c.api_key.is_none());
        assert_eq!(c.chat_model, "gemini-3-pro-preview");
    }

    #[test]
    fn model_overrides() {
        let c = RetroConfig::default().with_env_lookup(lookup(&[
            ("RETRO_CHAT_MODEL", "chat-x"),
            ("RETRO_SCRIPT_MODEL", "script-x"),
            ("RETRO_IMAGE_MODEL", "image-x"),
        ]));
        assert_eq!(c.chat_model, "chat-x");
        assert_eq!(c.script_model, "script-x");
        assert_eq!(c.image_model, "image-x");
    }

    #[test]
    fn skin_override_normalised() {
        assert_eq!(RetroConfig::default().skin, "retro");
        let c = RetroConfig::default().with_env_lookup(lookup(&[("RETRO_SKIN", " Amber ")]));
        assert_eq!(c.skin, "amber");
    }
}
