//! Boot sequencer: the timed line-by-line reveal after power-on.
//!
//! Driven by frame deltas. One line every `line_interval`; once the script
//! runs dry, a further `settle` delay, then the menu. Before every step the
//! run checks that the console is still booting and cancels itself if not.

use std::time::Duration;

use crate::view::{BootStep, Screen, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Revealing,
    Settling,
}

/// Handle for one in-flight boot run.
#[derive(Debug, Clone)]
struct BootRun {
    elapsed: Duration,
    phase: Phase,
}

/// What one [`BootSequencer::tick`] did to the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootProgress {
    pub lines_revealed: usize,
    pub completed: bool,
    pub cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct BootSequencer {
    line_interval: Duration,
    settle: Duration,
    run: Option<BootRun>,
}

impl BootSequencer {
    pub fn new(line_interval: Duration, settle: Duration) -> Self {
        Self {
            line_interval,
            settle,
            run: None,
        }
    }

    /// Begin a run, replacing any previous one.
    pub fn start(&mut self) {
        if self.run.is_some() {
            log::debug!("Boot run replaced");
        }
        self.run = Some(BootRun {
            elapsed: Duration::ZERO,
            phase: Phase::Revealing,
        });
    }

    /// Drop the current run. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if self.run.take().is_some() {
            log::debug!("Boot run cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Advance the run by `dt`, applying every step that fell due.
    pub fn tick(&mut self, view: &mut ViewState, dt: Duration) -> BootProgress {
        let mut progress = BootProgress::default();
        let Some(run) = self.run.as_mut() else {
            return progress;
        };
        run.elapsed += dt;

        let mut finished = false;
        while !finished {
            if view.screen() != Screen::Booting {
                progress.cancelled = true;
                finished = true;
                continue;
            }
            match run.phase {
                Phase::Revealing => {
                    if run.elapsed < self.line_interval {
                        break;
                    }
                    run.elapsed -= self.line_interval;
                    match view.advance_boot() {
                        BootStep::Revealed => progress.lines_revealed += 1,
                        BootStep::Exhausted => run.phase = Phase::Settling,
                        BootStep::Inactive => {
                            progress.cancelled = true;
                            finished = true;
                        },
                    }
                },
                Phase::Settling => {
                    if run.elapsed < self.settle {
                        break;
                    }
                    progress.completed = view.complete_boot();
                    finished = true;
                },
            }
        }

        if finished {
            if progress.cancelled {
                log::debug!("Boot run cancelled: console left the boot screen");
            }
            self.run = None;
        }
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: Duration = Duration::from_millis(200);
    const SETTLE: Duration = Duration::from_millis(1000);

    fn booting(lines: usize) -> (ViewState, BootSequencer) {
        let text = (0..lines).map(|i| format!("L{i}")).collect();
        let mut view = ViewState::new(10, 80, text);
        view.power_on();
        let mut seq = BootSequencer::new(LINE, SETTLE);
        seq.start();
        (view, seq)
    }

    #[test]
    fn reveals_one_line_per_interval() {
        let (mut view, mut seq) = booting(10);
        assert_eq!(seq.tick(&mut view, Duration::from_millis(199)).lines_revealed, 0);
        assert_eq!(seq.tick(&mut view, Duration::from_millis(1)).lines_revealed, 1);
        assert_eq!(view.boot_lines(), ["L0"]);
        assert_eq!(seq.tick(&mut view, LINE).lines_revealed, 1);
        assert_eq!(view.boot_lines().len(), 2);
    }

    #[test]
    fn settles_into_menu_after_delay() {
        let (mut view, mut seq) = booting(10);
        for _ in 0..10 {
            seq.tick(&mut view, LINE);
        }
        // Tick that discovers the end of the script.
        seq.tick(&mut view, LINE);
        assert_eq!(view.screen(), Screen::Booting);
        let p = seq.tick(&mut view, Duration::from_millis(999));
        assert!(!p.completed);
        let p = seq.tick(&mut view, Duration::from_millis(1));
        assert!(p.completed);
        assert_eq!(view.screen(), Screen::Menu);
        assert!(view.music_playing());
        assert!(!seq.is_running());
    }

    #[test]
    fn large_delta_finishes_in_order_once() {
        let (mut view, mut seq) = booting(10);
        let p = seq.tick(&mut view, Duration::from_secs(5));
        assert_eq!(p.lines_revealed, 10);
        assert!(p.completed);
        let expected: Vec<String> = (0..10).map(|i| format!("L{i}")).collect();
        assert_eq!(view.boot_lines(), expected.as_slice());
        let again = seq.tick(&mut view, Duration::from_secs(5));
        assert_eq!(again, BootProgress::default());
    }

    #[test]
    fn exact_total_duration() {
        let (mut view, mut seq) = booting(10);
        // 10 reveals + 1 exhaustion tick + settle.
        let p = seq.tick(&mut view, LINE * 11 + SETTLE - Duration::from_millis(1));
        assert!(!p.completed);
        assert!(seq.tick(&mut view, Duration::from_millis(1)).completed);
    }

    #[test]
    fn cancel_stops_emissions() {
        let (mut view, mut seq) = booting(10);
        seq.tick(&mut view, LINE * 3);
        seq.cancel();
        seq.cancel();
        let p = seq.tick(&mut view, Duration::from_secs(10));
        assert_eq!(p, BootProgress::default());
        assert_eq!(view.boot_lines().len(), 3);
        assert_eq!(view.screen(), Screen::Booting);
    }

    #[test]
    fn run_cancels_itself_when_not_booting() {
        let mut view = ViewState::new(10, 80, vec!["A".into()]);
        let mut seq = BootSequencer::new(LINE, SETTLE);
        seq.start();
        let p = seq.tick(&mut view, Duration::from_secs(2));
        assert!(p.cancelled);
        assert_eq!(p.lines_revealed, 0);
        assert!(!seq.is_running());
        assert!(view.boot_lines().is_empty());
    }

    #[test]
    fn restart_replaces_previous_run() {
        let (mut view, mut seq) = booting(10);
        seq.tick(&mut view, Duration::from_millis(150));
        seq.start();
        assert_eq!(seq.tick(&mut view, Duration::from_millis(100)).lines_revealed, 0);
        assert_eq!(seq.tick(&mut view, Duration::from_millis(100)).lines_revealed, 1);
    }

    #[test]
    fn idle_sequencer_does_nothing() {
        let mut view = ViewState::new(10, 80, vec!["A".into()]);
        view.power_on();
        let mut seq = BootSequencer::new(LINE, SETTLE);
        assert_eq!(seq.tick(&mut view, Duration::from_secs(60)), BootProgress::default());
        assert!(view.boot_lines().is_empty());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_frame_split_completes_exactly_once(
                lines in 0usize..16,
                frames in proptest::collection::vec(0u64..700, 1..200),
            ) {
                let (mut view, mut seq) = booting(lines);
                let mut revealed = 0;
                let mut completions = 0;
                for ms in frames {
                    let p = seq.tick(&mut view, Duration::from_millis(ms));
                    revealed += p.lines_revealed;
                    completions += usize::from(p.completed);
                }
                let p = seq.tick(&mut view, Duration::from_secs(60));
                revealed += p.lines_revealed;
                completions += usize::from(p.completed);
                prop_assert_eq!(revealed, lines);
                prop_assert_eq!(completions, 1);
                prop_assert_eq!(view.screen(), Screen::Menu);
            }
        }
    }
}
