//! The console: every piece of front-end state, owned in one place.
//!
//! The frame loop feeds it input events and frame deltas, dispatches the
//! remote requests it hands back, and returns their completions. Nothing in
//! here blocks.

use std::time::Duration;

use rand::Rng;

use crate::audio::AudioDirector;
use crate::backend::AudioBackend;
use crate::boot::{BootProgress, BootSequencer};
use crate::catalog::Catalog;
use crate::chat::{ChatPanel, ChatSession, HELP_TEXT, PanelCommand, Ticket};
use crate::config::RetroConfig;
use crate::error::Result;
use crate::input::InputEvent;
use crate::nav::{self, NavOutcome, NavigationController};
use crate::net::{HistoryTurn, SceneOutline};
use crate::skin::{Palette, Skin};
use crate::storyboard::{self, Storyboard};
use crate::view::{Screen, ViewState};

/// Longest user-message echo of a submitted script.
const SCRIPT_ECHO_CHARS: usize = 40;

/// Work for the remote model, produced by the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    Chat {
        ticket: Ticket,
        history: Vec<HistoryTurn>,
        message: String,
    },
    AnalyzeScript {
        ticket: Ticket,
        script: String,
    },
    RenderScene {
        ticket: Ticket,
        /// Storyboard revision the prompt was taken from.
        revision: u64,
        scene_number: u32,
        prompt: String,
    },
}

impl RemoteRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Chat { ticket, .. }
            | Self::AnalyzeScript { ticket, .. }
            | Self::RenderScene { ticket, .. } => *ticket,
        }
    }
}

/// Outcome of a remote call.
#[derive(Debug)]
pub enum RemoteReply {
    Chat(Result<String>),
    Scenes(Result<Vec<SceneOutline>>),
    Image {
        revision: u64,
        scene_number: u32,
        result: Result<String>,
    },
}

/// A finished remote call, returned to [`Console::complete`].
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub reply: RemoteReply,
}

/// What one input event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputResult {
    pub outcome: NavOutcome,
    pub request: Option<RemoteRequest>,
}

pub struct Console {
    skin: Skin,
    catalog: Catalog,
    view: ViewState,
    boot: BootSequencer,
    nav: NavigationController,
    audio: AudioDirector,
    session: ChatSession,
    panel: ChatPanel,
    storyboard: Storyboard,
}

impl Console {
    pub fn new(config: &RetroConfig, skin: Skin, rng: &mut impl Rng) -> Self {
        let catalog = Catalog::with_placeholders(config.placeholder_count, rng);
        let view = ViewState::new(
            catalog.len(),
            config.default_volume,
            skin.strings.boot_text.clone(),
        );
        log::info!(
            "Console ready: skin {}, {} catalog items",
            skin.manifest.name,
            catalog.len()
        );
        Self {
            skin,
            catalog,
            view,
            boot: BootSequencer::new(config.boot_line_interval, config.boot_settle),
            nav: NavigationController::new(config.grid_columns),
            audio: AudioDirector::new(),
            session: ChatSession::new(),
            panel: ChatPanel::new(),
            storyboard: Storyboard::default(),
        }
    }

    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    pub fn palette(&self) -> Palette {
        self.skin.palette()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn panel(&self) -> &ChatPanel {
        &self.panel
    }

    pub fn storyboard(&self) -> &Storyboard {
        &self.storyboard
    }

    pub fn grid_columns(&self) -> usize {
        self.nav.row_width()
    }

    /// Route one input event.
    pub fn handle_input(&mut self, event: &InputEvent) -> InputResult {
        let outcome = self
            .nav
            .handle(event, &mut self.view, &self.catalog, &mut self.panel);
        self.after_nav(outcome)
    }

    /// Launch a menu card directly (pointer activation).
    pub fn activate(&mut self, index: usize) -> InputResult {
        let outcome = nav::launch_outcome(&mut self.view, &self.catalog, index);
        self.after_nav(outcome)
    }

    fn after_nav(&mut self, outcome: NavOutcome) -> InputResult {
        let request = match &outcome {
            NavOutcome::PoweredOn => {
                self.audio.arm();
                self.boot.start();
                None
            },
            NavOutcome::ChatSubmitted(cmd) => self.run_command(cmd.clone()),
            _ => None,
        };
        InputResult { outcome, request }
    }

    /// Advance the boot timer.
    pub fn tick(&mut self, dt: Duration) -> BootProgress {
        self.boot.tick(&mut self.view, dt)
    }

    /// Mirror the music flag and volume into `audio`.
    pub fn sync_audio(&mut self, audio: &mut dyn AudioBackend) -> Result<()> {
        self.audio
            .sync(audio, self.view.music_playing(), self.view.volume())
    }

    fn run_command(&mut self, cmd: PanelCommand) -> Option<RemoteRequest> {
        match cmd {
            PanelCommand::Chat(message) => {
                let history = self.session.history_turns();
                self.session.push_user(message.clone());
                let ticket = self.session.begin();
                Some(RemoteRequest::Chat {
                    ticket,
                    history,
                    message,
                })
            },
            PanelCommand::Storyboard(script) => {
                self.session.push_user(script_echo(&script));
                let ticket = self.session.begin();
                Some(RemoteRequest::AnalyzeScript { ticket, script })
            },
            PanelCommand::Render(scene_number) => {
                self.session.push_user(format!("/RENDER {scene_number}"));
                match self.storyboard.begin_render(scene_number) {
                    Some(prompt) => {
                        let ticket = self.session.begin();
                        Some(RemoteRequest::RenderScene {
                            ticket,
                            revision: self.storyboard.revision(),
                            scene_number,
                            prompt,
                        })
                    },
                    None => {
                        self.session
                            .push_error_text(format!("ERROR: NO SCENE {scene_number} IN STORYBOARD."));
                        None
                    },
                }
            },
            PanelCommand::Clear => {
                self.session.reset();
                self.storyboard.clear();
                log::info!("Chat session cleared");
                None
            },
            PanelCommand::Help => {
                self.session.push_user("/HELP");
                self.session.push_model(HELP_TEXT);
                None
            },
            PanelCommand::Invalid(message) => {
                self.session.push_error_text(message);
                None
            },
        }
    }

    /// Apply a finished remote call. Results for a cleared session are
    /// dropped; results arriving after the user left the terminal are kept.
    pub fn complete(&mut self, completion: Completion) {
        if !self.session.finish(completion.ticket) {
            return;
        }
        match completion.reply {
            RemoteReply::Chat(Ok(text)) => {
                self.session.push_model(text);
            },
            RemoteReply::Chat(Err(e)) => {
                log::warn!("Chat request failed: {e}");
                self.session.push_error(&e.to_string());
            },
            RemoteReply::Scenes(Ok(outlines)) if outlines.is_empty() => {
                self.session.push_error_text("ERROR: NO SCENES FOUND IN SCRIPT.");
            },
            RemoteReply::Scenes(Ok(outlines)) => {
                self.storyboard.replace(outlines);
                self.session.push_model(scene_listing(&self.storyboard));
            },
            RemoteReply::Scenes(Err(e)) => {
                log::warn!("Script analysis failed: {e}");
                self.session.push_error(&e.to_string());
            },
            RemoteReply::Image {
                revision,
                scene_number,
                result: Ok(uri),
            } => {
                let summary = match storyboard::describe_data_uri(&uri) {
                    Some((mime, size)) => format!(
                        "SCENE {scene_number} RENDERED: {} ({size} BYTES BASE64).",
                        mime.to_uppercase()
                    ),
                    None => format!("SCENE {scene_number} RENDERED."),
                };
                if self.storyboard.finish_render(revision, scene_number, uri) {
                    self.session.push_model(summary);
                } else {
                    log::info!("Dropping render of scene {scene_number} from storyboard revision {revision}");
                    self.session.push_error_text(format!(
                        "SCENE {scene_number} FRAME DISCARDED: STORYBOARD CHANGED."
                    ));
                }
            },
            RemoteReply::Image {
                revision,
                scene_number,
                result: Err(e),
            } => {
                log::warn!("Render of scene {scene_number} failed: {e}");
                self.storyboard.fail_render(revision, scene_number);
                self.session.push_error(&e.to_string());
            },
        }
    }

    /// Whether the chat screen is showing.
    pub fn is_chatting(&self) -> bool {
        self.view.screen() == Screen::Chatting
    }
}

fn script_echo(script: &str) -> String {
    let count = script.chars().count();
    let head: String = script
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(SCRIPT_ECHO_CHARS)
        .collect();
    format!("/STORYBOARD {head}... [{count} CHARS]")
}

fn scene_listing(board: &Storyboard) -> String {
    let mut out = format!("STORYBOARD READY: {} SCENES.", board.scenes().len());
    for scene in board.scenes() {
        out.push_str(&format!("\n#{} {}", scene.scene_number, scene.description));
    }
    out.push_str("\nUSE /RENDER <N> TO GENERATE A FRAME.");
    out
}
