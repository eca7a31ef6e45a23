//! Minimal HTTPS/1.1 POST client.
//!
//! One request per connection (`Connection: close`) over
//! `std::net::TcpStream`, upgraded through a [`TlsProvider`]. Enough for
//! JSON request/response APIs; no redirects, no keep-alive.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use retro_types::error::{Result, RetroError};

use crate::tls::TlsProvider;

/// Maximum response body size (32 MB -- generated images arrive as base64).
const MAX_BODY_SIZE: usize = 32 * 1024 * 1024;

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// TCP read timeout. Model responses can take a while to start.
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// A raw parsed HTTP response.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code (e.g. 200, 404).
    pub status_code: u16,
    /// Response headers as (lowercased name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// POST `body` as JSON to `https://{host}{path}`.
pub fn post_json(
    host: &str,
    path: &str,
    extra_headers: &[(&str, &str)],
    body: &[u8],
    tls: &dyn TlsProvider,
) -> Result<HttpResponse> {
    let stream = tcp_connect(host, 443)?;
    let mut stream = tls.connect_tls(stream, host)?;

    let head = build_request_head(host, path, extra_headers, body.len());
    stream
        .write_all(head.as_bytes())
        .and_then(|_| stream.write_all(body))
        .and_then(|_| stream.flush())
        .map_err(|e| RetroError::Network(format!("send request: {e}")))?;

    let raw = read_response(&mut stream)?;
    parse_response(&raw)
}

/// Open a TCP connection with connect and read timeouts.
fn tcp_connect(host: &str, port: u16) -> Result<TcpStream> {
    let addr = format!("{host}:{port}")
        .to_socket_addrs()
        .map_err(|e| RetroError::Network(format!("DNS resolution failed: {e}")))?
        .next()
        .ok_or_else(|| RetroError::Network(format!("no addresses for {host}:{port}")))?;

    let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
        .map_err(|e| RetroError::Network(format!("TCP connect failed: {e}")))?;

    stream
        .set_read_timeout(Some(READ_TIMEOUT))
        .map_err(|e| RetroError::Network(format!("set read timeout: {e}")))?;

    Ok(stream)
}

/// Request line and headers for a JSON POST.
fn build_request_head(
    host: &str,
    path: &str,
    extra_headers: &[(&str, &str)],
    content_length: usize,
) -> String {
    let mut head = format!(
        "POST {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         User-Agent: RETRO-OS/1.0\r\n\
         Accept: application/json\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {content_length}\r\n\
         Connection: close\r\n"
    );
    for (name, value) in extra_headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    head
}

/// Read the entire response until EOF.
fn read_response(stream: &mut impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() + n > MAX_BODY_SIZE + 4096 {
                    return Err(RetroError::Network("response too large".to_string()));
                }
                buf.extend_from_slice(&chunk[..n]);
            },
            // Peers that drop the socket without a TLS close_notify.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !buf.is_empty() => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                if buf.is_empty() {
                    return Err(RetroError::Network("timed out waiting for response".into()));
                }
                break;
            },
            Err(e) => {
                return Err(RetroError::Network(format!("read response: {e}")));
            },
        }
    }
    Ok(buf)
}

/// Parse raw bytes into status code, headers, and body.
pub fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = find_subsequence(data, b"\r\n\r\n").ok_or_else(|| {
        RetroError::Network("malformed HTTP response: no header terminator".to_string())
    })?;

    let header_str = std::str::from_utf8(&data[..header_end])
        .map_err(|_| RetroError::Network("non-UTF-8 headers".to_string()))?;

    let mut lines = header_str.split("\r\n");

    let status_line = lines
        .next()
        .ok_or_else(|| RetroError::Network("empty response".to_string()))?;
    let status_code = parse_status_line(status_line)?;

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    let raw_body = &data[header_end + 4..];
    let body = if find_header(&headers, "transfer-encoding").is_some_and(|v| v.contains("chunked"))
    {
        decode_chunked(raw_body)?
    } else if let Some(cl) = find_header(&headers, "content-length") {
        let len: usize = cl
            .parse()
            .map_err(|_| RetroError::Network("bad Content-Length".to_string()))?;
        if len > MAX_BODY_SIZE {
            return Err(RetroError::Network("response body exceeds limit".to_string()));
        }
        raw_body[..raw_body.len().min(len)].to_vec()
    } else {
        raw_body.to_vec()
    };

    if body.len() > MAX_BODY_SIZE {
        return Err(RetroError::Network("response body exceeds limit".to_string()));
    }

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

/// Parse the HTTP status code from the status line.
fn parse_status_line(line: &str) -> Result<u16> {
    // Expected: "HTTP/1.x NNN ..."
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(RetroError::Network(format!("bad status line: {line}")));
    }
    parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| RetroError::Network(format!("bad status code in: {line}")))
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    let name_lower = name.to_lowercase();
    headers
        .iter()
        .find(|(k, _)| k == &name_lower)
        .map(|(_, v)| v.as_str())
}

/// Decode a chunked transfer-encoded body.
fn decode_chunked(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut pos = 0;

    while let Some(i) = find_subsequence(&data[pos..], b"\r\n") {
        let line_end = pos + i;

        let size_str = std::str::from_utf8(&data[pos..line_end])
            .map_err(|_| RetroError::Network("bad chunk size".to_string()))?
            .trim();

        // Strip optional chunk extensions (after `;`).
        let size_str = size_str.split(';').next().unwrap_or("").trim();

        let chunk_size = usize::from_str_radix(size_str, 16)
            .map_err(|_| RetroError::Network("bad chunk size".to_string()))?;

        if chunk_size == 0 {
            break;
        }

        if chunk_size > MAX_BODY_SIZE {
            return Err(RetroError::Network("bad chunk size".to_string()));
        }

        let chunk_start = line_end + 2;
        let chunk_end = chunk_start
            .checked_add(chunk_size)
            .ok_or_else(|| RetroError::Network("bad chunk size".to_string()))?;

        if chunk_end > data.len() {
            // Partial chunk -- take what we have.
            result.extend_from_slice(&data[chunk_start..]);
            break;
        }

        if result.len() + chunk_size > MAX_BODY_SIZE {
            return Err(RetroError::Network("chunked body exceeds limit".to_string()));
        }

        result.extend_from_slice(&data[chunk_start..chunk_end]);
        pos = (chunk_end + 2).min(data.len());
    }

    Ok(result)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
