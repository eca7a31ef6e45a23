//! RETRO_OS core.
//!
//! Platform-agnostic console front-end: the launch catalog, the view state
//! machine, the boot sequencer, screen-scoped navigation, the AI terminal
//! chat session, the storyboard, and the audio/embed collaborator seams.
//! Rendering, audio output and the remote model live behind traits.

// Re-exports from retro-types (foundation types and traits).
pub use retro_types::backend;
pub use retro_types::bitmap_font;
pub use retro_types::color;
pub use retro_types::config;
pub use retro_types::error;
pub use retro_types::input;

pub use retro_net as net;

pub mod audio;
pub mod boot;
pub mod catalog;
pub mod chat;
pub mod console;
pub mod embed;
pub mod nav;
pub mod skin;
pub mod storyboard;
pub mod view;
