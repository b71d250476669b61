//! HTTP accessor for the temperature cache.
//!
//! Serves one read-only route, `GET /temperature`, returning the current
//! snapshot as JSON:
//!
//! ```json
//! { "tempC": 23.4, "readTime": "2026-08-07T12:00:00Z", "error": "..." }
//! ```
//!
//! Status mapping: 200 when the last update succeeded, 500 when it failed
//! (the last good reading is still included when there is one), 503
//! before the first tick lands.
//!
//! The responder is assembled directly over a `TcpListener`: it covers
//! exactly the single route the accessor needs, with one task per
//! connection and `Connection: close` semantics.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::SecondsFormat;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{Snapshot, TemperatureCache};

/// JSON body served at `/temperature`. Absent fields are omitted.
#[derive(Debug, Serialize)]
pub struct TemperatureBody {
    /// Temperature in degrees Celsius from the last good reading.
    #[serde(rename = "tempC", skip_serializing_if = "Option::is_none")]
    pub temp_c: Option<f64>,

    /// RFC 3339 UTC instant the last good reading was acquired at.
    #[serde(rename = "readTime", skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,

    /// Message of the most recent acquisition failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Maps a snapshot to a status code and response body.
pub fn render(snapshot: &Snapshot) -> (u16, TemperatureBody) {
    let temp_c = snapshot.reading.map(|r| r.degs_c);
    let read_time = snapshot
        .reading
        .map(|r| r.read_time.to_rfc3339_opts(SecondsFormat::Secs, true));

    match (&snapshot.error, snapshot.is_populated()) {
        (Some(error), _) => (
            500,
            TemperatureBody {
                temp_c,
                read_time,
                error: Some(error.clone()),
            },
        ),
        (None, true) => (
            200,
            TemperatureBody {
                temp_c,
                read_time,
                error: None,
            },
        ),
        (None, false) => (503, error_body("no reading available yet")),
    }
}

/// Serves `GET /temperature` until the token is cancelled.
///
/// The listener should already be bound so the caller can report bind
/// failures with its own context.
pub async fn serve(
    listener: TcpListener,
    cache: Arc<TemperatureCache>,
    shutdown: CancellationToken,
) -> io::Result<()> {
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "temperature endpoint listening");

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("temperature endpoint stopping");
                break;
            }

            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let cache = Arc::clone(&cache);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &cache).await {
                            debug!(peer = %peer, error = %e, "connection closed with error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }

    Ok(())
}

/// Answers one request and closes the connection.
async fn handle_connection(stream: TcpStream, cache: &TemperatureCache) -> io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    // Drain headers; no request body is expected on a read-only route.
    let mut header = String::new();
    loop {
        header.clear();
        let n = reader.read_line(&mut header).await?;
        if n == 0 || header == "\r\n" || header == "\n" {
            break;
        }
    }

    let (status, body) = route(&request_line, &cache.current());
    let payload = serde_json::to_string(&body).map_err(io::Error::other)?;
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text(status),
        payload.len(),
        payload
    );

    write_half.write_all(response.as_bytes()).await?;
    write_half.shutdown().await
}

/// Resolves a request line against the one route we serve.
fn route(request_line: &str, snapshot: &Snapshot) -> (u16, TemperatureBody) {
    let mut parts = request_line.split_whitespace();
    let (method, path) = match (parts.next(), parts.next()) {
        (Some(method), Some(path)) => (method, path),
        _ => return (400, error_body("malformed request")),
    };

    if path != "/temperature" && !path.starts_with("/temperature?") {
        return (404, error_body("not found"));
    }
    if method != "GET" {
        return (405, error_body("method not allowed"));
    }

    render(snapshot)
}

fn error_body(message: &str) -> TemperatureBody {
    TemperatureBody {
        temp_c: None,
        read_time: None,
        error: Some(message.to_string()),
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    }
}
