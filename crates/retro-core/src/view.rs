//! View state machine: which screen is showing and the menu cursor.
//!
//! Every operation is total. Calling one from a screen where it does not
//! apply leaves the state untouched.

use crate::catalog::{Catalog, CatalogItem, LaunchTarget};

/// The screen currently on display. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    PowerOff,
    Booting,
    Menu,
    PlayingGame,
    PlayingMusic,
    Chatting,
}

/// Fixed boot lines, consumed front to back exactly once.
#[derive(Debug, Clone)]
pub struct BootScript {
    lines: std::vec::IntoIter<String>,
}

impl BootScript {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines: lines.into_iter(),
        }
    }

    pub fn next_line(&mut self) -> Option<String> {
        self.lines.next()
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

/// Result of one [`ViewState::advance_boot`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStep {
    /// A line was appended to `boot_lines`.
    Revealed,
    /// The script has no more lines; nothing changed.
    Exhausted,
    /// Not booting; nothing changed.
    Inactive,
}

/// Single source of truth for what the console shows.
#[derive(Debug, Clone)]
pub struct ViewState {
    screen: Screen,
    selected_index: usize,
    active_item_id: Option<String>,
    volume: u8,
    music_playing: bool,
    boot_lines: Vec<String>,
    boot_complete: bool,
    boot_text: Vec<String>,
    script: Option<BootScript>,
    catalog_len: usize,
}

impl ViewState {
    pub const MAX_VOLUME: u8 = 100;

    /// A powered-off console over a catalog of `catalog_len` items.
    pub fn new(catalog_len: usize, volume: u8, boot_text: Vec<String>) -> Self {
        Self {
            screen: Screen::PowerOff,
            selected_index: 0,
            active_item_id: None,
            volume: volume.min(Self::MAX_VOLUME),
            music_playing: false,
            boot_lines: Vec::new(),
            boot_complete: false,
            boot_text,
            script: None,
            catalog_len,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn active_item_id(&self) -> Option<&str> {
        self.active_item_id.as_deref()
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn boot_lines(&self) -> &[String] {
        &self.boot_lines
    }

    pub fn boot_complete(&self) -> bool {
        self.boot_complete
    }

    /// Whether the current boot run has revealed every line.
    pub fn boot_script_exhausted(&self) -> bool {
        self.script.as_ref().is_none_or(BootScript::is_exhausted)
    }

    fn set_screen(&mut self, next: Screen) {
        if self.screen != next {
            log::debug!("View: {:?} -> {next:?}", self.screen);
            self.screen = next;
        }
    }

    /// Start a boot run. Only from `PowerOff`.
    pub fn power_on(&mut self) -> bool {
        if self.screen != Screen::PowerOff {
            return false;
        }
        self.boot_lines.clear();
        self.script = Some(BootScript::new(self.boot_text.clone()));
        self.set_screen(Screen::Booting);
        true
    }

    /// Reveal the next boot line.
    pub fn advance_boot(&mut self) -> BootStep {
        if self.screen != Screen::Booting {
            return BootStep::Inactive;
        }
        match self.script.as_mut().and_then(BootScript::next_line) {
            Some(line) => {
                self.boot_lines.push(line);
                BootStep::Revealed
            },
            None => BootStep::Exhausted,
        }
    }

    /// Finish booting. Only once the script is exhausted.
    pub fn complete_boot(&mut self) -> bool {
        if self.screen != Screen::Booting || !self.boot_script_exhausted() {
            return false;
        }
        self.script = None;
        self.boot_complete = true;
        self.music_playing = true;
        self.set_screen(Screen::Menu);
        log::info!("Boot complete");
        true
    }

    /// Move the menu cursor by `delta`, clamped to the catalog.
    pub fn move_selection(&mut self, delta: isize) -> bool {
        if self.screen != Screen::Menu || self.catalog_len == 0 {
            return false;
        }
        let last = self.catalog_len - 1;
        let next = self.selected_index.saturating_add_signed(delta).min(last);
        let moved = next != self.selected_index;
        self.selected_index = next;
        moved
    }

    /// Activate `catalog[index]`. Returns the item when the screen changed.
    pub fn launch<'c>(&mut self, catalog: &'c Catalog, index: usize) -> Option<&'c CatalogItem> {
        if self.screen != Screen::Menu {
            return None;
        }
        let item = catalog.get(index)?;
        let next = match &item.launch_target {
            LaunchTarget::Chat => {
                self.music_playing = true;
                Screen::Chatting
            },
            LaunchTarget::Music => {
                self.music_playing = true;
                Screen::PlayingMusic
            },
            LaunchTarget::Embed(_) => {
                self.active_item_id = Some(item.id.clone());
                self.music_playing = false;
                Screen::PlayingGame
            },
            LaunchTarget::Unavailable => {
                log::debug!("{} is not launchable", item.id);
                return None;
            },
        };
        self.selected_index = index;
        self.set_screen(next);
        log::info!("Launched {} ({})", item.title, item.launch_target);
        Some(item)
    }

    /// Back to the menu from a game or the music studio.
    pub fn exit_to_menu(&mut self) -> bool {
        if !matches!(self.screen, Screen::PlayingGame | Screen::PlayingMusic) {
            return false;
        }
        self.active_item_id = None;
        self.music_playing = true;
        self.set_screen(Screen::Menu);
        true
    }

    /// The chat panel's back action. Leaves the music flag alone.
    pub fn leave_chat(&mut self) -> bool {
        if self.screen != Screen::Chatting {
            return false;
        }
        self.set_screen(Screen::Menu);
        true
    }

    /// Background music on/off from the menu.
    pub fn toggle_music(&mut self) -> bool {
        if self.screen != Screen::Menu {
            return false;
        }
        self.music_playing = !self.music_playing;
        log::debug!("Music {}", if self.music_playing { "on" } else { "off" });
        true
    }

    /// Play/pause inside the music studio.
    pub fn toggle_playback(&mut self) -> bool {
        if self.screen != Screen::PlayingMusic {
            return false;
        }
        self.music_playing = !self.music_playing;
        true
    }

    /// Nudge the volume, clamped to `0..=100`.
    pub fn adjust_volume(&mut self, delta: i32) -> bool {
        if !matches!(self.screen, Screen::Menu | Screen::PlayingMusic) {
            return false;
        }
        let next = (i32::from(self.volume) + delta).clamp(0, i32::from(Self::MAX_VOLUME)) as u8;
        let changed = next != self.volume;
        self.volume = next;
        changed
    }
}
