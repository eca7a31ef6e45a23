//! Screen-scoped input routing.
//!
//! Maps input events onto [`ViewState`] operations according to the screen
//! on display, and reports what happened so the shell can drive the embed
//! surface and worker threads.

use crate::catalog::{Catalog, LaunchTarget};
use crate::chat::{ChatPanel, PanelAction, PanelCommand};
use crate::input::{Button, InputEvent};
use crate::view::{Screen, ViewState};

/// Volume change per key press.
pub const VOLUME_STEP: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Ignored,
    PoweredOn,
    Moved,
    Launched { id: String, title: String, target: LaunchTarget },
    ExitedToMenu,
    LeftChat,
    MusicToggled,
    VolumeChanged,
    ChatEdited,
    ChatSubmitted(PanelCommand),
    Quit,
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    row_width: usize,
}

impl NavigationController {
    pub fn new(row_width: usize) -> Self {
        Self {
            row_width: row_width.max(1),
        }
    }

    pub fn row_width(&self) -> usize {
        self.row_width
    }

    pub fn handle(
        &self,
        event: &InputEvent,
        view: &mut ViewState,
        catalog: &Catalog,
        panel: &mut ChatPanel,
    ) -> NavOutcome {
        if *event == InputEvent::Quit {
            return NavOutcome::Quit;
        }
        match view.screen() {
            Screen::PowerOff | Screen::Booting => match event {
                InputEvent::ButtonPress(Button::Power) if view.power_on() => NavOutcome::PoweredOn,
                _ => NavOutcome::Ignored,
            },
            Screen::Menu => self.handle_menu(event, view, catalog),
            Screen::PlayingGame => match event {
                InputEvent::ButtonPress(Button::Cancel) if view.exit_to_menu() => {
                    NavOutcome::ExitedToMenu
                },
                _ => NavOutcome::Ignored,
            },
            Screen::PlayingMusic => {
                let InputEvent::ButtonPress(button) = event else {
                    return NavOutcome::Ignored;
                };
                let changed = match button {
                    Button::Cancel => {
                        return if view.exit_to_menu() {
                            NavOutcome::ExitedToMenu
                        } else {
                            NavOutcome::Ignored
                        };
                    },
                    Button::Confirm | Button::Music => {
                        return bool_outcome(view.toggle_playback(), NavOutcome::MusicToggled);
                    },
                    Button::VolumeUp => view.adjust_volume(VOLUME_STEP),
                    Button::VolumeDown => view.adjust_volume(-VOLUME_STEP),
                    _ => false,
                };
                bool_outcome(changed, NavOutcome::VolumeChanged)
            },
            Screen::Chatting => match panel.handle(event) {
                PanelAction::None => NavOutcome::Ignored,
                PanelAction::Edited => NavOutcome::ChatEdited,
                PanelAction::Submit(cmd) => NavOutcome::ChatSubmitted(cmd),
                PanelAction::Back => bool_outcome(view.leave_chat(), NavOutcome::LeftChat),
            },
        }
    }

    fn handle_menu(&self, event: &InputEvent, view: &mut ViewState, catalog: &Catalog) -> NavOutcome {
        let InputEvent::ButtonPress(button) = event else {
            return NavOutcome::Ignored;
        };
        let row = self.row_width as isize;
        match button {
            Button::Left => bool_outcome(view.move_selection(-1), NavOutcome::Moved),
            Button::Right => bool_outcome(view.move_selection(1), NavOutcome::Moved),
            Button::Up => bool_outcome(view.move_selection(-row), NavOutcome::Moved),
            Button::Down => bool_outcome(view.move_selection(row), NavOutcome::Moved),
            Button::Confirm => {
                let index = view.selected_index();
                launch_outcome(view, catalog, index)
            },
            Button::Music => bool_outcome(view.toggle_music(), NavOutcome::MusicToggled),
            Button::VolumeUp => {
                bool_outcome(view.adjust_volume(VOLUME_STEP), NavOutcome::VolumeChanged)
            },
            Button::VolumeDown => {
                bool_outcome(view.adjust_volume(-VOLUME_STEP), NavOutcome::VolumeChanged)
            },
            Button::Cancel | Button::Power => NavOutcome::Ignored,
        }
    }
}

/// Launch `catalog[index]` from the menu and describe the result.
pub fn launch_outcome(view: &mut ViewState, catalog: &Catalog, index: usize) -> NavOutcome {
    match view.launch(catalog, index) {
        Some(item) => NavOutcome::Launched {
            id: item.id.clone(),
            title: item.title.clone(),
            target: item.launch_target.clone(),
        },
        None => NavOutcome::Ignored,
    }
}

fn bool_outcome(changed: bool, outcome: NavOutcome) -> NavOutcome {
    if changed { outcome } else { NavOutcome::Ignored }
}
