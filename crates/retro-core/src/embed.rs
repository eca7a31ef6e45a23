//! Embed surface: where a launched game's locator goes.

use crate::error::Result;

/// Capabilities granted to embedded game content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandboxPolicy {
    pub allow_scripts: bool,
    pub allow_forms: bool,
    pub allow_popups: bool,
    pub allow_same_origin: bool,
    pub allow_autoplay: bool,
    pub allow_gamepad: bool,
}

impl SandboxPolicy {
    /// What the emulator hosts need to run.
    pub const GAME: Self = Self {
        allow_scripts: true,
        allow_forms: true,
        allow_popups: true,
        allow_same_origin: true,
        allow_autoplay: true,
        allow_gamepad: true,
    };

    /// Sandbox tokens in iframe `sandbox` attribute form.
    pub fn tokens(&self) -> Vec<&'static str> {
        [
            (self.allow_same_origin, "allow-same-origin"),
            (self.allow_scripts, "allow-scripts"),
            (self.allow_popups, "allow-popups"),
            (self.allow_forms, "allow-forms"),
        ]
        .into_iter()
        .filter_map(|(on, token)| on.then_some(token))
        .collect()
    }

    /// Feature permissions in iframe `allow` attribute form.
    pub fn allow_list(&self) -> String {
        [
            (self.allow_autoplay, "autoplay"),
            (self.allow_gamepad, "gamepad"),
        ]
        .into_iter()
        .filter_map(|(on, feature)| on.then_some(feature))
        .collect::<Vec<_>>()
        .join("; ")
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::GAME
    }
}

/// Host for third-party game content.
pub trait EmbedSurface {
    /// Show `locator` (titled `title`) under `policy`.
    fn present(&mut self, title: &str, locator: &str, policy: &SandboxPolicy) -> Result<()>;

    /// Tear down whatever `present` showed.
    fn dismiss(&mut self);

    /// Locator currently presented, if any.
    fn current(&self) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        shown: Option<String>,
    }

    impl EmbedSurface for Recorder {
        fn present(&mut self, _title: &str, locator: &str, _p: &SandboxPolicy) -> Result<()> {
            self.shown = Some(locator.to_string());
            Ok(())
        }
        fn dismiss(&mut self) {
            self.shown = None;
        }
        fn current(&self) -> Option<&str> {
            self.shown.as_deref()
        }
    }

    #[test]
    fn game_policy_tokens() {
        assert_eq!(
            SandboxPolicy::GAME.tokens(),
            ["allow-same-origin", "allow-scripts", "allow-popups", "allow-forms"]
        );
    }

    #[test]
    fn restricted_policy_drops_tokens() {
        let p = SandboxPolicy {
            allow_popups: false,
            allow_forms: false,
            ..SandboxPolicy::GAME
        };
        assert_eq!(p.tokens(), ["allow-same-origin", "allow-scripts"]);
    }

    #[test]
    fn allow_list_follows_flags() {
        assert_eq!(SandboxPolicy::GAME.allow_list(), "autoplay; gamepad");
        let muted = SandboxPolicy {
            allow_autoplay: false,
            ..SandboxPolicy::GAME
        };
        assert_eq!(muted.allow_list(), "gamepad");
        let none = SandboxPolicy {
            allow_gamepad: false,
            ..muted
        };
        assert_eq!(none.allow_list(), "");
    }

    #[test]
    fn surface_is_object_safe() {
        let mut r = Recorder::default();
        let surface: &mut dyn EmbedSurface = &mut r;
        surface.present("Tetris", "https://t", &SandboxPolicy::default()).unwrap();
        assert_eq!(surface.current(), Some("https://t"));
        surface.dismiss();
        assert_eq!(surface.current(), None);
    }
}
