//! Minimal HTTP/1.1 POST client.
//!
//! A single blocking round trip over a fresh TCP connection per request
//! (`Connection: close`); enough for a fixed-shape telemetry POST without
//! pulling in a client stack.

use anyhow::{anyhow, bail, Context, Result};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A parsed `http://` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "http://{}:{}{}", self.host, self.port, self.path)
    }
}

/// Parses an `http://host[:port][/path]` URL.
pub fn parse_url(url: &str) -> Result<Endpoint> {
    let rest = match url.strip_prefix("http://") {
        Some(rest) => rest,
        None => bail!("unsupported URL (only http:// is understood): {url}"),
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };
    if authority.is_empty() {
        bail!("missing host in URL: {url}");
    }

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => {
            let port: u16 = port
                .parse()
                .with_context(|| format!("invalid port in URL: {url}"))?;
            (host, port)
        }
        None => (authority, 80),
    };
    if host.is_empty() {
        bail!("missing host in URL: {url}");
    }

    Ok(Endpoint {
        host: host.to_string(),
        port,
        path: path.to_string(),
    })
}

/// An HTTP response, status line plus body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// POSTs a JSON body and returns the response status and body.
///
/// The whole round trip (connect, write, read) is bounded by `timeout`: a
/// server that accepts the connection but never responds fails the request
/// instead of stalling the caller past its next period.
pub async fn post_json(endpoint: &Endpoint, body: &str, timeout: Duration) -> Result<HttpResponse> {
    match tokio::time::timeout(timeout, round_trip(endpoint, body)).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!("request to {endpoint} timed out after {timeout:?}")),
    }
}

async fn round_trip(endpoint: &Endpoint, body: &str) -> Result<HttpResponse> {
    let mut stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
        .await
        .with_context(|| format!("connecting to {endpoint}"))?;

    let request = format!(
        "POST {} HTTP/1.1\r\n\
         Host: {}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        endpoint.path,
        endpoint.host,
        body.len(),
        body
    );
    stream
        .write_all(request.as_bytes())
        .await
        .with_context(|| format!("sending request to {endpoint}"))?;
    stream.flush().await?;

    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .await
        .with_context(|| format!("reading response from {endpoint}"))?;

    parse_response(&raw)
}

/// Splits a raw HTTP/1.1 response into status code and body.
fn parse_response(raw: &[u8]) -> Result<HttpResponse> {
    let text = String::from_utf8_lossy(raw);
    let mut parts = text.splitn(2, "\r\n\r\n");
    let head = parts.next().unwrap_or_default();
    let body = parts.next().unwrap_or_default().to_string();

    let status_line = head.lines().next().context("empty HTTP response")?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .context("malformed HTTP status line")?
        .parse::<u16>()
        .context("malformed HTTP status code")?;

    Ok(HttpResponse { status, body })
}
