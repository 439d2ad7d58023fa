//! Telemetry publisher.
//!
//! Copies the shared record, serializes it outside the lock, and POSTs it to
//! the configured endpoint. Failures are logged and dropped; the next period
//! is the implicit retry.

use crate::http::{self, Endpoint};
use crate::state::{SensorSnapshot, SharedSensorState};
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The wire payload. Field order is the serialized key order.
#[derive(Debug, Serialize)]
struct TelemetryPayload {
    temperature: f64,
    humidity: f64,
    motion: &'static str,
}

/// Serializes a snapshot into the fixed-shape JSON object.
pub fn payload_json(snapshot: &SensorSnapshot) -> String {
    let payload = TelemetryPayload {
        temperature: snapshot.temperature,
        humidity: snapshot.humidity,
        motion: if snapshot.motion {
            "detected"
        } else {
            "not detected"
        },
    };
    // A struct of two finite floats and a static str cannot fail to serialize
    serde_json::to_string(&payload).unwrap()
}

/// Takes one snapshot and POSTs it, bounding the request by `timeout`.
pub async fn publish_once(
    state: &SharedSensorState,
    endpoint: &Endpoint,
    timeout: Duration,
) -> Result<()> {
    let snapshot = state.snapshot();
    let body = payload_json(&snapshot);
    debug!(%body, "publishing telemetry");

    let response = http::post_json(endpoint, &body, timeout).await?;
    if response.is_success() {
        info!(status = response.status, "telemetry delivered");
    } else {
        warn!(status = response.status, "telemetry rejected");
    }
    debug!(body = %response.body, "endpoint response");
    Ok(())
}

/// Periodic publisher task.
///
/// The request timeout equals the period, so a hung request can never push an
/// attempt past the next cycle.
pub async fn publisher_loop(state: Arc<SharedSensorState>, endpoint: Endpoint, period: Duration) {
    loop {
        tokio::time::sleep(period).await;
        if let Err(e) = publish_once(&state, &endpoint, period).await {
            warn!("Publish error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_url;
    use roomsense_hw::ClimateReading;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_payload_exact_shape() {
        let snapshot = SensorSnapshot {
            temperature: 30.5,
            humidity: 78.0,
            motion: true,
        };
        assert_eq!(
            payload_json(&snapshot),
            r#"{"temperature":30.5,"humidity":78.0,"motion":"detected"}"#
        );

        let snapshot = SensorSnapshot {
            temperature: -3.25,
            humidity: 40.125,
            motion: false,
        };
        assert_eq!(
            payload_json(&snapshot),
            r#"{"temperature":-3.25,"humidity":40.125,"motion":"not detected"}"#
        );
    }

    #[test]
    fn test_zeroed_payload_before_first_sample() {
        assert_eq!(
            payload_json(&SensorSnapshot::default()),
            r#"{"temperature":0.0,"humidity":0.0,"motion":"not detected"}"#
        );
    }

    #[tokio::test]
    async fn test_publish_once_sends_snapshot() {
        let state = SharedSensorState::new();
        state.update(
            Some(ClimateReading {
                temperature: 30.5,
                humidity: 78.0,
            }),
            true,
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let n = socket.read(&mut request).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
            String::from_utf8_lossy(&request[..n]).to_string()
        });

        let endpoint = parse_url(&format!("http://127.0.0.1:{}/api/sensors", addr.port())).unwrap();
        publish_once(&state, &endpoint, Duration::from_secs(5))
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.ends_with(r#"{"temperature":30.5,"humidity":78.0,"motion":"detected"}"#));
    }

    #[tokio::test]
    async fn test_failed_publish_leaves_record_unchanged() {
        let state = SharedSensorState::new();
        state.update(
            Some(ClimateReading {
                temperature: 21.0,
                humidity: 55.0,
            }),
            true,
        );
        let before = state.snapshot();

        // Nothing listening here
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = parse_url(&format!("http://127.0.0.1:{}/x", addr.port())).unwrap();
        assert!(publish_once(&state, &endpoint, Duration::from_secs(5))
            .await
            .is_err());
        assert_eq!(state.snapshot(), before);
    }

    #[tokio::test]
    async fn test_silent_server_fails_the_attempt_instead_of_stalling() {
        let state = SharedSensorState::new();
        state.update(
            Some(ClimateReading {
                temperature: 21.0,
                humidity: 55.0,
            }),
            false,
        );
        let before = state.snapshot();

        // Accepts the connection, reads the request, never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;
            std::future::pending::<()>().await;
        });

        let endpoint = parse_url(&format!("http://127.0.0.1:{}/x", addr.port())).unwrap();
        assert!(publish_once(&state, &endpoint, Duration::from_millis(200))
            .await
            .is_err());
        assert_eq!(state.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publisher_loop_retries_next_period() {
        // Endpoint that never accepts: every cycle errors, the loop must keep
        // going and attempt once per period.
        let state = Arc::new(SharedSensorState::new());
        let endpoint = Endpoint {
            host: "127.0.0.1".to_string(),
            port: 1, // connect refused
            path: "/".to_string(),
        };

        let handle = tokio::spawn(publisher_loop(
            state.clone(),
            endpoint,
            Duration::from_secs(5),
        ));

        // Three periods pass without the task panicking or exiting
        tokio::time::sleep(Duration::from_secs(16)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
