use std::time::Duration;

use rand::Rng;

use retro_core::config::RetroConfig;
use retro_core::console::Console;

use crate::launch::BrowserEmbed;
use crate::layout::Layout;
use crate::workers::Workers;

/// Bars in the radio visualiser.
pub const VISUALISER_BARS: usize = 20;

/// Visualiser refresh period.
const VISUALISER_STEP: Duration = Duration::from_millis(75);

/// Cursor / "PRESS START" blink half-period.
const BLINK: Duration = Duration::from_millis(500);

/// All mutable application state except the backend, which stays a
/// separate local in main() for borrow-splitting.
pub struct AppState {
    pub console: Console,
    pub layout: Layout,
    pub workers: Workers,
    pub embed: BrowserEmbed,
    /// Whether an API key was configured.
    pub online: bool,
    /// Bar heights in percent of the visualiser area.
    pub visualiser: [u8; VISUALISER_BARS],
    visualiser_clock: Duration,
    elapsed: Duration,
}

impl AppState {
    pub fn new(config: &RetroConfig, console: Console, workers: Workers, online: bool) -> Self {
        let layout = Layout::new(config, console.grid_columns());
        Self {
            console,
            layout,
            workers,
            embed: BrowserEmbed::default(),
            online,
            visualiser: [10; VISUALISER_BARS],
            visualiser_clock: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance animation clocks. Bars jump to random heights while music
    /// plays and sit at the floor otherwise.
    pub fn animate(&mut self, dt: Duration, rng: &mut impl Rng) {
        self.elapsed += dt;
        self.visualiser_clock += dt;
        if self.visualiser_clock < VISUALISER_STEP {
            return;
        }
        self.visualiser_clock = Duration::ZERO;
        let playing = self.console.view().music_playing();
        for bar in &mut self.visualiser {
            *bar = if playing { rng.gen_range(10..90) } else { 10 };
        }
    }

    /// On-phase of the shared blink.
    pub fn blink_on(&self) -> bool {
        (self.elapsed.as_millis() / BLINK.as_millis()).is_multiple_of(2)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use retro_core::error::Result;
    use retro_core::input::{Button, InputEvent};
    use retro_core::net::{GenerativeModel, HistoryTurn, SceneOutline};
    use retro_core::skin;

    use super::*;

    struct Offline;

    impl GenerativeModel for Offline {
        fn send_chat(&self, _h: &[HistoryTurn], _m: &str) -> Result<String> {
            Ok(String::new())
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
        let mut rng = StdRng::seed_from_u64(7);
        let console = Console::new(&config, skin::load_builtin("retro").unwrap(), &mut rng);
        AppState::new(&config, console, Workers::new(Arc::new(Offline)), false)
    }

    #[test]
    fn visualiser_idle_at_floor() {
        let mut s = state();
        let mut rng = StdRng::seed_from_u64(1);
        s.animate(Duration::from_millis(100), &mut rng);
        assert!(s.visualiser.iter().all(|b| *b == 10));
    }

    #[test]
    fn visualiser_moves_while_music_plays() {
        let mut s = state();
        let mut rng = StdRng::seed_from_u64(1);
        s.console.handle_input(&InputEvent::ButtonPress(Button::Power));
        s.console.tick(Duration::from_secs(5));
        assert!(s.console.view().music_playing());
        s.animate(Duration::from_millis(100), &mut rng);
        assert!(s.visualiser.iter().all(|b| (10..90).contains(b)));
        assert!(s.visualiser.iter().any(|b| *b != 10));
    }

    #[test]
    fn visualiser_waits_for_step() {
        let mut s = state();
        let mut rng = StdRng::seed_from_u64(1);
        s.visualiser = [50; VISUALISER_BARS];
        s.animate(Duration::from_millis(10), &mut rng);
        assert_eq!(s.visualiser, [50; VISUALISER_BARS]);
    }

    #[test]
    fn blink_alternates() {
        let mut s = state();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(s.blink_on());
        s.animate(Duration::from_millis(600), &mut rng);
        assert!(!s.blink_on());
        s.animate(Duration::from_millis(500), &mut rng);
        assert!(s.blink_on());
    }

    #[test]
    fn layout_uses_console_grid() {
        let s = state();
        assert_eq!(s.layout.columns, 4);
    }
}
