//! AI terminal input panel: line editing and command parsing.

use crate::input::{Button, InputEvent};

/// A submitted line, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    /// Plain text for the model.
    Chat(String),
    /// `/storyboard <script>`
    Storyboard(String),
    /// `/render <n>`
    Render(u32),
    /// `/clear`
    Clear,
    /// `/help`
    Help,
    /// Malformed command; carries the message to show.
    Invalid(String),
}

/// What the panel did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Edited,
    Submit(PanelCommand),
    Back,
}

pub const HELP_TEXT: &str = "COMMANDS:\n\
/STORYBOARD <SCRIPT> - BREAK A SCRIPT INTO SCENES\n\
/RENDER <N> - GENERATE THE IMAGE FOR SCENE N\n\
/CLEAR - RESET THE SESSION\n\
[ESC] - RETURN TO MENU";

/// Parse one submitted line. `None` for blank input.
pub fn parse_command(line: &str) -> Option<PanelCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(PanelCommand::Chat(line.to_string()));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let cmd = match name.to_ascii_lowercase().as_str() {
        "storyboard" if arg.is_empty() => {
            PanelCommand::Invalid("USAGE: /STORYBOARD <SCRIPT>".to_string())
        },
        "storyboard" => PanelCommand::Storyboard(arg.to_string()),
        "render" => match arg.parse() {
            Ok(n) => PanelCommand::Render(n),
            Err(_) => PanelCommand::Invalid("USAGE: /RENDER <SCENE NUMBER>".to_string()),
        },
        "clear" => PanelCommand::Clear,
        "help" => PanelCommand::Help,
        other => PanelCommand::Invalid(format!("UNKNOWN COMMAND: /{}", other.to_uppercase())),
    };
    Some(cmd)
}

#[derive(Debug, Default)]
pub struct ChatPanel {
    input: String,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn handle(&mut self, event: &InputEvent) -> PanelAction {
        match event {
            InputEvent::TextInput(ch) if !ch.is_control() => {
                self.input.push(*ch);
                PanelAction::Edited
            },
            InputEvent::Backspace => {
                if self.input.pop().is_some() {
                    PanelAction::Edited
                } else {
                    PanelAction::None
                }
            },
            InputEvent::ButtonPress(Button::Confirm) => match parse_command(&self.input) {
                Some(cmd) => {
                    self.input.clear();
                    PanelAction::Submit(cmd)
                },
                None => PanelAction::None,
            },
            InputEvent::ButtonPress(Button::Cancel) => PanelAction::Back,
            _ => PanelAction::None,
        }
    }
}
