use retro_core::catalog::LaunchTarget;
use retro_core::embed::{EmbedSurface, SandboxPolicy};
use retro_core::error::{Result, RetroError};
use retro_core::nav::NavOutcome;

/// Desktop embed surface: hands game locators to the system web browser.
///
/// The console keeps showing its RUNNING screen while the game is open;
/// dismissing only forgets the locator since the browser tab is not ours.
#[derive(Debug, Default)]
pub struct BrowserEmbed {
    current: Option<String>,
}

impl EmbedSurface for BrowserEmbed {
    fn present(&mut self, title: &str, locator: &str, policy: &SandboxPolicy) -> Result<()> {
        log::info!(
            "Opening {title} at {locator} (sandbox: {}; allow: {})",
            policy.tokens().join(" "),
            policy.allow_list()
        );
        self.current = Some(locator.to_string());
        open::that(locator).map_err(|e| RetroError::Backend(format!("open {locator}: {e}")))
    }

    fn dismiss(&mut self) {
        if let Some(locator) = self.current.take() {
            log::debug!("Dismissed {locator}");
        }
    }

    fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Drive the embed surface from what the navigation controller did.
pub fn apply_outcome(outcome: &NavOutcome, embed: &mut dyn EmbedSurface) -> Result<()> {
    match outcome {
        NavOutcome::Launched {
            title,
            target: LaunchTarget::Embed(locator),
            ..
        } => embed.present(title, locator, &SandboxPolicy::GAME),
        NavOutcome::ExitedToMenu => {
            embed.dismiss();
            Ok(())
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        shown: Option<String>,
        presented: usize,
    }

    impl EmbedSurface for Recorder {
        fn present(&mut self, _title: &str, locator: &str, policy: &SandboxPolicy) -> Result<()> {
            assert!(policy.allow_scripts);
            self.shown = Some(locator.to_string());
            self.presented += 1;
            Ok(())
        }
        fn dismiss(&mut self) {
            self.shown = None;
        }
        fn current(&self) -> Option<&str> {
            self.shown.as_deref()
        }
    }

    fn launched(target: LaunchTarget) -> NavOutcome {
        NavOutcome::Launched {
            id: "contra".into(),
            title: "CONTRA".into(),
            target,
        }
    }

    #[test]
    fn game_launch_presents_locator() {
        let mut rec = Recorder::default();
        apply_outcome(
            &launched(LaunchTarget::Embed("https://example.org/contra".into())),
            &mut rec,
        )
        .unwrap();
        assert_eq!(rec.current(), Some("https://example.org/contra"));
    }

    #[test]
    fn app_launch_does_not_embed() {
        let mut rec = Recorder::default();
        apply_outcome(&launched(LaunchTarget::Chat), &mut rec).unwrap();
        apply_outcome(&launched(LaunchTarget::Music), &mut rec).unwrap();
        assert_eq!(rec.presented, 0);
    }

    #[test]
    fn exit_dismisses() {
        let mut rec = Recorder::default();
        apply_outcome(&launched(LaunchTarget::Embed("x".into())), &mut rec).unwrap();
        apply_outcome(&NavOutcome::ExitedToMenu, &mut rec).unwrap();
        assert_eq!(rec.current(), None);
    }

    #[test]
    fn browser_embed_dismiss_without_present() {
        let mut embed = BrowserEmbed::default();
        embed.dismiss();
        assert_eq!(embed.current(), None);
    }
}
