//! Networking: TLS provider abstraction, a minimal HTTPS/1.1 client, and
//! the generative model client behind the AI terminal and storyboard.

pub mod genai;
pub mod http;
pub mod tls;
#[cfg(feature = "tls-rustls")]
pub mod tls_rustls;

pub use genai::{GenAiClient, GenerativeModel, HistoryTurn, SceneOutline, TurnRole};
pub use tls::{NetStream, TlsProvider};
#[cfg(feature = "tls-rustls")]
pub use tls_rustls::RustlsTlsProvider;
