//! User-visible text, loaded from `strings` TOML.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SkinStrings {
    /// Lines revealed one by one after power-on.
    #[serde(default)]
    pub boot_text: Vec<String>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_press_start")]
    pub press_start: String,
    /// Fixed clock shown in the menu bar.
    #[serde(default = "default_clock")]
    pub clock: String,
    #[serde(default = "default_chat_title")]
    pub chat_title: String,
    /// Shown while the conversation is empty.
    #[serde(default)]
    pub chat_welcome: Vec<String>,
    #[serde(default = "default_chat_placeholder")]
    pub chat_placeholder: String,
    #[serde(default = "default_processing")]
    pub processing: String,
    #[serde(default = "default_radio_title")]
    pub radio_title: String,
    #[serde(default = "default_radio_track")]
    pub radio_track: String,
}

fn default_title() -> String {
    "RETRO-OS".to_string()
}
fn default_press_start() -> String {
    "PRESS START".to_string()
}
fn default_clock() -> String {
    "12:00 PM".to_string()
}
fn default_chat_title() -> String {
    "A.I. TERMINAL V3.0".to_string()
}
fn default_chat_placeholder() -> String {
    "ENTER COMMAND...".to_string()
}
fn default_processing() -> String {
    "PROCESSING...".to_string()
}
fn default_radio_title() -> String {
    "8-BIT RADIO".to_string()
}
fn default_radio_track() -> String {
    "TRACK 01: CHIPTUNE DREAMS".to_string()
}

impl Default for SkinStrings {
    fn default() -> Self {
        Self {
            boot_text: Vec::new(),
            title: default_title(),
            press_start: default_press_start(),
            clock: default_clock(),
            chat_title: default_chat_title(),
            chat_welcome: Vec::new(),
            chat_placeholder: default_chat_placeholder(),
            processing: default_processing(),
            radio_title: default_radio_title(),
            radio_track: default_radio_track(),
        }
    }
}
