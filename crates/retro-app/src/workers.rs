//! Background worker threads for remote model calls.
//!
//! Each request runs on its own short-lived thread and sends its
//! completion back over a channel that the frame loop drains once per
//! frame. The console never waits on the network.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use retro_core::console::{Completion, RemoteReply, RemoteRequest};
use retro_core::error::RetroError;
use retro_core::net::GenerativeModel;

type Job = Box<dyn FnOnce() + Send>;

pub struct Workers {
    model: Arc<dyn GenerativeModel>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl Workers {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        let (tx, rx) = channel();
        Self {
            model,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Run `request` on a new thread.
    pub fn dispatch(&mut self, request: RemoteRequest) {
        self.dispatch_with(request, |name, job| {
            thread::Builder::new()
                .name(name.to_string())
                .spawn(job)
                .map(drop)
        });
    }

    /// Hand `request` to `spawn`. A request that cannot be started still
    /// completes, with an error, so the console stops waiting on it.
    fn dispatch_with<S>(&mut self, request: RemoteRequest, spawn: S)
    where
        S: FnOnce(&str, Job) -> io::Result<()>,
    {
        let model = Arc::clone(&self.model);
        let tx = self.tx.clone();
        let name = match &request {
            RemoteRequest::Chat { .. } => "retro-chat",
            RemoteRequest::AnalyzeScript { .. } => "retro-script",
            RemoteRequest::RenderScene { .. } => "retro-render",
        };
        let ticket = request.ticket();
        let shape = ReplyShape::of(&request);

        let job: Job = Box::new(move || {
            let completion = run(model.as_ref(), request);
            // Receiver gone means the app is shutting down.
            let _ = tx.send(completion);
        });
        if let Err(e) = spawn(name, job) {
            log::error!("Failed to spawn {name} worker: {e}");
            let error = RetroError::Backend(format!("could not start {name} worker: {e}"));
            let _ = self.tx.send(Completion {
                ticket,
                reply: shape.failed(error),
            });
        }
        self.in_flight += 1;
    }

    /// Completions that have arrived since the last call.
    pub fn drain(&mut self) -> Vec<Completion> {
        let done: Vec<Completion> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Which reply a request expects, kept after the request itself has moved.
#[derive(Debug, Clone, Copy)]
enum ReplyShape {
    Chat,
    Scenes,
    Image { revision: u64, scene_number: u32 },
}

impl ReplyShape {
    fn of(request: &RemoteRequest) -> Self {
        match request {
            RemoteRequest::Chat { .. } => Self::Chat,
            RemoteRequest::AnalyzeScript { .. } => Self::Scenes,
            RemoteRequest::RenderScene {
                revision,
                scene_number,
                ..
            } => Self::Image {
                revision: *revision,
                scene_number: *scene_number,
            },
        }
    }

    fn failed(self, error: RetroError) -> RemoteReply {
        match self {
            Self::Chat => RemoteReply::Chat(Err(error)),
            Self::Scenes => RemoteReply::Scenes(Err(error)),
            Self::Image {
                revision,
                scene_number,
            } => RemoteReply::Image {
                revision,
                scene_number,
                result: Err(error),
            },
        }
    }
}

/// Perform one request against `model`. Blocking.
fn run(model: &dyn GenerativeModel, request: RemoteRequest) -> Completion {
    let ticket = request.ticket();
    let reply = match request {
        RemoteRequest::Chat {
            history, message, ..
        } => RemoteReply::Chat(model.send_chat(&history, &message)),
        RemoteRequest::AnalyzeScript { script, .. } => {
            RemoteReply::Scenes(model.analyze_script(&script))
        },
        RemoteRequest::RenderScene {
            revision,
            scene_number,
            prompt,
            ..
        } => RemoteReply::Image {
            revision,
            scene_number,
            result: model.generate_image(&prompt),
        },
    };
    Completion { ticket, reply }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use retro_core::chat::ChatSession;
    use retro_core::error::{Result, RetroError};
    use retro_core::net::{HistoryTurn, SceneOutline};

    use super::*;

    struct EchoModel;

    impl GenerativeModel for EchoModel {
        fn send_chat(&self, history: &[HistoryTurn], message: &str) -> Result<String> {
            Ok(format!("{}:{message}", history.len()))
        }
        fn analyze_script(&self, _script: &str) -> Result<Vec<SceneOutline>> {
            Err(RetroError::Api("quota".into()))
        }
        fn generate_image(&self, prompt: &str) -> Result<String> {
            Ok(format!("data:image/png;base64,{prompt}"))
        }
    }

    fn wait_for(workers: &mut Workers, count: usize) -> Vec<Completion> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut out = Vec::new();
        while out.len() < count && Instant::now() < deadline {
            out.extend(workers.drain());
            thread::sleep(Duration::from_millis(5));
        }
        out
    }

    #[test]
    fn chat_round_trip() {
        let mut session = ChatSession::new();
        let ticket = session.begin();
        let mut workers = Workers::new(Arc::new(EchoModel));
        workers.dispatch(RemoteRequest::Chat {
            ticket,
            history: vec![HistoryTurn {
                role: retro_core::net::TurnRole::User,
                text: "hi".into(),
            }],
            message: "again".into(),
        });
        let done = wait_for(&mut workers, 1);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, ticket);
        assert!(matches!(&done[0].reply, RemoteReply::Chat(Ok(t)) if t == "1:again"));
        assert_eq!(workers.in_flight(), 0);
    }

    #[test]
    fn failures_are_delivered_not_dropped() {
        let mut session = ChatSession::new();
        let mut workers = Workers::new(Arc::new(EchoModel));
        workers.dispatch(RemoteRequest::AnalyzeScript {
            ticket: session.begin(),
            script: "INT. LAB - NIGHT".into(),
        });
        let done = wait_for(&mut workers, 1);
        assert!(matches!(&done[0].reply, RemoteReply::Scenes(Err(RetroError::Api(_)))));
    }

    #[test]
    fn image_reply_keeps_scene_number() {
        let mut session = ChatSession::new();
        let mut workers = Workers::new(Arc::new(EchoModel));
        workers.dispatch(RemoteRequest::RenderScene {
            ticket: session.begin(),
            revision: 1,
            scene_number: 3,
            prompt: "QUFB".into(),
        });
        workers.dispatch(RemoteRequest::RenderScene {
            ticket: session.begin(),
            revision: 1,
            scene_number: 4,
            prompt: "QkJC".into(),
        });
        assert_eq!(workers.in_flight(), 2);
        let mut numbers: Vec<u32> = wait_for(&mut workers, 2)
            .into_iter()
            .map(|c| match c.reply {
                RemoteReply::Image { scene_number, .. } => scene_number,
                other => panic!("unexpected reply {other:?}"),
            })
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![3, 4]);
    }

    fn refuse(_name: &str, _job: Job) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::OutOfMemory, "no threads left"))
    }

    #[test]
    fn spawn_failure_completes_with_error() {
        let mut session = ChatSession::new();
        let ticket = session.begin();
        let mut workers = Workers::new(Arc::new(EchoModel));
        workers.dispatch_with(
            RemoteRequest::RenderScene {
                ticket,
                revision: 2,
                scene_number: 5,
                prompt: "x".into(),
            },
            refuse,
        );
        assert_eq!(workers.in_flight(), 1);
        let done = workers.drain();
        assert_eq!(workers.in_flight(), 0);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, ticket);
        assert!(matches!(
            &done[0].reply,
            RemoteReply::Image {
                revision: 2,
                scene_number: 5,
                result: Err(RetroError::Backend(_)),
            }
        ));
    }

    #[test]
    fn spawn_failure_unblocks_chat() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;
        use retro_core::config::RetroConfig;
        use retro_core::console::Console;
        use retro_core::input::{Button, InputEvent};
        use retro_core::skin;

        let config = RetroConfig::default();
        let retro = skin::load_builtin("retro").unwrap();
        let mut console = Console::new(&config, retro, &mut StdRng::seed_from_u64(3));
        console.handle_input(&InputEvent::ButtonPress(Button::Power));
        console.tick(Duration::from_secs(10));
        console.handle_input(&InputEvent::ButtonPress(Button::Confirm));
        for ch in "hi".chars() {
            console.handle_input(&InputEvent::TextInput(ch));
        }
        let request = console
            .handle_input(&InputEvent::ButtonPress(Button::Confirm))
            .request
            .unwrap();
        assert!(console.session().is_busy());

        let mut workers = Workers::new(Arc::new(EchoModel));
        workers.dispatch_with(request, refuse);
        for done in workers.drain() {
            console.complete(done);
        }
        assert!(!console.session().is_busy());
        assert!(console.session().messages().last().unwrap().is_error);
    }

    #[test]
    fn drain_is_empty_without_work() {
        let mut workers = Workers::new(Arc::new(EchoModel));
        assert!(workers.drain().is_empty());
    }
}
