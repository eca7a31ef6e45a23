//! TLS provider abstraction.
//!
//! Backends supply a [`TlsProvider`] that wraps a plain TCP stream in a TLS
//! session. The HTTP client uses this trait so it never depends on a
//! concrete TLS library.

use std::io::{Read, Write};
use std::net::TcpStream;

use retro_types::error::Result;

/// A bidirectional byte stream, plain or encrypted.
pub trait NetStream: Read + Write + Send {}

impl<T: Read + Write + Send> NetStream for T {}

/// Provides TLS client connections.
pub trait TlsProvider: Send + Sync {
    /// Wrap `stream` in a TLS client session.
    ///
    /// `server_name` is used for SNI and certificate verification.
    fn connect_tls(&self, stream: TcpStream, server_name: &str) -> Result<Box<dyn NetStream>>;
}
