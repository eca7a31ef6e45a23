//! Built-in skins, embedded as TOML.

use crate::error::{Result, RetroError};

use super::Skin;

// ---------------------------------------------------------------------------
// Retro skin: green phosphor on black, the console's stock look.
// ---------------------------------------------------------------------------

const RETRO_MANIFEST: &str = r#"
name = "retro"
version = "1.0"
author = "RETRO_OS"
description = "Green phosphor console with CRT scanlines"
"#;

const RETRO_THEME: &str = r##"
background = "#09090B"
panel = "#18181B"
border = "#27272A"
primary = "#4ADE80"
accent = "#FDE047"
text = "#FFFFFF"
dim_text = "#71717A"
error = "#EF4444"
scanline = "#00000040"
"##;

const RETRO_STRINGS: &str = r#"
boot_text = [
    "SYSTEM BIOS v1.02 (C) 1991",
    "CHECKING MEMORY... 640K OK",
    "DETECTING PERIPHERALS...",
    "  > KEYBOARD... OK",
    "  > MOUSE... DETECTED",
    "  > SOUND BLASTER... A220 I5 D1",
    "LOADING OS...",
    "MOUNTING DRIVE A: ... DONE",
    "INITIALIZING GRAPHICS... VGA MODE 13H",
    "WELCOME TO RETRO-OS",
]
title = "RETRO-OS"
press_start = "PRESS START"
clock = "12:00 PM"
chat_title = "A.I. TERMINAL V3.0"
chat_welcome = ["INITIALIZING NEURAL NET...", "READY FOR INPUT."]
chat_placeholder = "ENTER COMMAND..."
processing = "PROCESSING..."
radio_title = "8-BIT RADIO"
radio_track = "TRACK 01: CHIPTUNE DREAMS"
"#;

// ---------------------------------------------------------------------------
// Amber skin: monochrome amber terminal.
// ---------------------------------------------------------------------------

const AMBER_MANIFEST: &str = r#"
name = "amber"
version = "1.0"
author = "RETRO_OS"
description = "Monochrome amber terminal"
"#;

const AMBER_THEME: &str = r##"
background = "#0A0600"
panel = "#1A1000"
border = "#3D2600"
primary = "#FFB000"
accent = "#FFD866"
text = "#FFE0A0"
dim_text = "#8A6420"
error = "#FF5030"
scanline = "#00000050"
"##;

const AMBER_STRINGS: &str = r#"
boot_text = [
    "AMBER BIOS v2.10 (C) 1989",
    "MEMORY TEST... 1024K OK",
    "PROBING BUS...",
    "  > KEYBOARD... OK",
    "  > SERIAL MOUSE... COM1",
    "  > ADLIB FM... 388H",
    "LOADING OS...",
    "WELCOME TO RETRO-OS",
]
title = "RETRO-OS"
chat_title = "A.I. TERMINAL V3.0"
chat_welcome = ["INITIALIZING NEURAL NET...", "READY FOR INPUT."]
radio_track = "TRACK 02: AMBER WAVES"
"#;

/// Load the Retro skin.
pub fn retro_skin() -> Result<Skin> {
    Skin::from_toml(RETRO_MANIFEST, RETRO_THEME, RETRO_STRINGS)
}

/// Load the Amber skin.
pub fn amber_skin() -> Result<Skin> {
    Skin::from_toml(AMBER_MANIFEST, AMBER_THEME, AMBER_STRINGS)
}

/// Load a built-in skin by name.
pub fn load_builtin(name: &str) -> Result<Skin> {
    match name {
        "retro" => retro_skin(),
        "amber" => amber_skin(),
        _ => Err(RetroError::Config(format!("unknown built-in skin: {name}"))),
    }
}

/// List available built-in skin names.
pub fn builtin_names() -> &'static [&'static str] {
    &["retro", "amber"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retro_skin_loads() {
        let skin = retro_skin().unwrap();
        assert_eq!(skin.manifest.name, "retro");
        assert_eq!(skin.strings.boot_text.len(), 10);
        assert_eq!(skin.strings.boot_text[0], "SYSTEM BIOS v1.02 (C) 1991");
        assert_eq!(skin.strings.boot_text[9], "WELCOME TO RETRO-OS");
        assert_eq!(skin.strings.chat_welcome.len(), 2);
    }

    #[test]
    fn amber_skin_falls_back_on_missing_strings() {
        let skin = amber_skin().unwrap();
        assert_eq!(skin.strings.processing, "PROCESSING...");
        assert_eq!(skin.strings.radio_track, "TRACK 02: AMBER WAVES");
    }

    #[test]
    fn load_builtin_all_names() {
        for name in builtin_names() {
            let skin = load_builtin(name).unwrap();
            assert_eq!(skin.manifest.name, *name);
        }
    }

    #[test]
    fn load_builtin_unknown_fails() {
        assert!(matches!(load_builtin("vaporwave"), Err(RetroError::Config(_))));
    }

    #[test]
    fn all_skins_have_boot_text() {
        for name in builtin_names() {
            let skin = load_builtin(name).unwrap();
            assert!(!skin.strings.boot_text.is_empty(), "{name} has no boot text");
        }
    }

    #[test]
    fn all_skin_colours_parse() {
        for name in builtin_names() {
            let theme = load_builtin(name).unwrap().theme;
            for value in [&theme.background, &theme.primary, &theme.scanline] {
                assert!(crate::color::parse_hex_color(value).is_some(), "{name}: {value}");
            }
        }
    }
}
