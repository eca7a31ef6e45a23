use retro_core::console::InputResult as ConsoleResult;
use retro_core::input::{Button, InputEvent};
use retro_core::nav::NavOutcome;
use retro_core::view::Screen;

use crate::app_state::AppState;
use crate::launch;

/// Result of handling a single input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}

/// What a pointer click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerTarget {
    /// An on-screen stand-in for a console button.
    Button(Button),
    /// A menu card, by catalog index.
    Card(usize),
}

/// Route one event through the console and act on what it did.
pub fn handle_input(event: &InputEvent, state: &mut AppState) -> InputResult {
    let result = match event {
        InputEvent::PointerClick { x, y } => match pointer_target(state, *x, *y) {
            Some(PointerTarget::Button(button)) => {
                state.console.handle_input(&InputEvent::ButtonPress(button))
            },
            Some(PointerTarget::Card(index)) => state.console.activate(index),
            None => return InputResult::Continue,
        },
        other => state.console.handle_input(other),
    };
    apply(result, state)
}

fn pointer_target(state: &AppState, x: i32, y: i32) -> Option<PointerTarget> {
    let layout = &state.layout;
    let view = state.console.view();
    match view.screen() {
        Screen::PowerOff => layout
            .hits_power(x, y)
            .then_some(PointerTarget::Button(Button::Power)),
        Screen::Booting => None,
        Screen::Menu => layout
            .card_at(x, y, view.selected_index(), state.console.catalog().len())
            .map(PointerTarget::Card),
        Screen::PlayingGame => layout
            .game_exit()
            .contains(x, y)
            .then_some(PointerTarget::Button(Button::Cancel)),
        Screen::PlayingMusic => {
            let (back, toggle) = layout.radio_buttons();
            if back.contains(x, y) {
                Some(PointerTarget::Button(Button::Cancel))
            } else if toggle.contains(x, y) {
                Some(PointerTarget::Button(Button::Confirm))
            } else {
                None
            }
        },
        Screen::Chatting => layout
            .chat_exit()
            .contains(x, y)
            .then_some(PointerTarget::Button(Button::Cancel)),
    }
}

fn apply(result: ConsoleResult, state: &mut AppState) -> InputResult {
    if let Err(e) = launch::apply_outcome(&result.outcome, &mut state.embed) {
        log::error!("Embed failed: {e}");
    }
    if let Some(request) = result.request {
        state.workers.dispatch(request);
    }
    match result.outcome {
        NavOutcome::Quit => InputResult::Quit,
        NavOutcome::Ignored => InputResult::Continue,
        outcome => {
            log::debug!("{outcome:?}");
            InputResult::Continue
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use retro_core::config::RetroConfig;
    use retro_core::console::Console;
    use retro_core::error::Result;
    use retro_core::net::{GenerativeModel, HistoryTurn, SceneOutline};
    use retro_core::skin;

    use crate::workers::Workers;

    use super::*;

    struct Canned;

    impl GenerativeModel for Canned {
        fn send_chat(&self, _h: &[HistoryTurn], _m: &str) -> Result<String> {
            Ok("AFFIRMATIVE.".into())
        }
        fn analyze_script(&self, _s: &str) -> Result<Vec<SceneOutline>> {
            Ok(Vec::new())
        }
        fn generate_image(&self, _p: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    fn state() -> AppState {
        let config = RetroConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let console = Console::new(&config, skin::load_builtin("retro").unwrap(), &mut rng);
        AppState::new(&config, console, Workers::new(Arc::new(Canned)), true)
    }

    fn booted() -> AppState {
        let mut s = state();
        let (cx, cy) = s.layout.power_center();
        handle_input(&InputEvent::PointerClick { x: cx, y: cy }, &mut s);
        s.console.tick(Duration::from_secs(5));
        assert_eq!(s.console.view().screen(), Screen::Menu);
        s
    }

    fn click(state: &mut AppState, x: i32, y: i32) -> InputResult {
        handle_input(&InputEvent::PointerClick { x, y }, state)
    }

    #[test]
    fn clicking_power_button_boots() {
        let mut s = state();
        let (cx, cy) = s.layout.power_center();
        click(&mut s, cx + 10, cy + 10);
        assert_eq!(s.console.view().screen(), Screen::Booting);
    }

    #[test]
    fn clicking_outside_power_button_does_nothing() {
        let mut s = state();
        click(&mut s, 2, 2);
        assert_eq!(s.console.view().screen(), Screen::PowerOff);
    }

    #[test]
    fn clicking_card_launches_it() {
        let mut s = booted();
        let r = s.layout.card_rect(1, 0).unwrap();
        click(&mut s, r.x + 5, r.y + 5);
        assert_eq!(s.console.view().screen(), Screen::PlayingMusic);
        assert_eq!(s.console.view().selected_index(), 1);
    }

    #[test]
    fn clicking_placeholder_stays_in_menu() {
        let mut s = booted();
        let last = s.console.catalog().len() - 1;
        for _ in 0..30 {
            handle_input(&InputEvent::ButtonPress(Button::Down), &mut s);
        }
        assert_eq!(s.console.view().selected_index(), last);
        let r = s.layout.card_rect(last, last).unwrap();
        click(&mut s, r.x + 5, r.y + 5);
        assert_eq!(s.console.view().screen(), Screen::Menu);
    }

    #[test]
    fn radio_buttons_toggle_and_exit() {
        let mut s = booted();
        handle_input(&InputEvent::ButtonPress(Button::Right), &mut s);
        handle_input(&InputEvent::ButtonPress(Button::Confirm), &mut s);
        let (back, toggle) = s.layout.radio_buttons();
        click(&mut s, toggle.x + 1, toggle.y + 1);
        assert!(!s.console.view().music_playing());
        click(&mut s, back.x + 1, back.y + 1);
        assert_eq!(s.console.view().screen(), Screen::Menu);
        assert!(s.console.view().music_playing());
    }

    #[test]
    fn escape_after_leaving_game_stays_in_menu() {
        let mut s = booted();
        handle_input(&InputEvent::ButtonPress(Button::Right), &mut s);
        handle_input(&InputEvent::ButtonPress(Button::Confirm), &mut s);
        assert_eq!(s.console.view().screen(), Screen::PlayingMusic);
        for _ in 0..2 {
            assert_eq!(
                handle_input(&InputEvent::ButtonPress(Button::Cancel), &mut s),
                InputResult::Continue
            );
        }
        assert_eq!(s.console.view().screen(), Screen::Menu);
    }

    #[test]
    fn window_close_quits_anywhere() {
        let mut s = state();
        assert_eq!(handle_input(&InputEvent::Quit, &mut s), InputResult::Quit);
    }

    #[test]
    fn chat_submit_dispatches_worker() {
        let mut s = booted();
        handle_input(&InputEvent::ButtonPress(Button::Confirm), &mut s);
        assert!(s.console.is_chatting());
        for ch in "hello".chars() {
            handle_input(&InputEvent::TextInput(ch), &mut s);
        }
        handle_input(&InputEvent::ButtonPress(Button::Confirm), &mut s);
        assert_eq!(s.workers.in_flight(), 1);
        assert!(s.console.session().is_busy());

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while s.console.session().is_busy() && std::time::Instant::now() < deadline {
            for done in s.workers.drain() {
                s.console.complete(done);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        let last = s.console.session().messages().last().unwrap();
        assert_eq!(last.text, "AFFIRMATIVE.");
    }

    #[test]
    fn chat_exit_label_leaves_chat() {
        let mut s = booted();
        handle_input(&InputEvent::ButtonPress(Button::Confirm), &mut s);
        let exit = s.layout.chat_exit();
        click(&mut s, exit.x + 1, exit.y + 1);
        assert_eq!(s.console.view().screen(), Screen::Menu);
    }
}
