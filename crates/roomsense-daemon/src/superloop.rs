//! Single-loop scheduler.
//!
//! The degenerate one-thread form of the sampler/publisher pattern: one
//! sequential loop with elapsed-time checks. The PIR is read on every pass and
//! mirrored straight to the LED; the climate sensor, shared record and LCD are
//! refreshed once per sampler period; a snapshot is published inline once per
//! publisher period, blocking the whole loop for the duration of the POST.

use crate::http::Endpoint;
use crate::publisher::publish_once;
use crate::sampler::{read_climate, render_display};
use crate::state::SharedSensorState;
use roomsense_hw::{ClimateSensor, MotionSensor, StatusLed, TextDisplay};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Poll interval between passes.
const TICK: Duration = Duration::from_millis(50);

/// Periods of the superloop's two timed activities.
pub struct SuperloopPeriods {
    pub sample: Duration,
    pub publish: Duration,
}

/// Runs the sequential loop forever.
pub async fn superloop<M, C, L, D>(
    state: Arc<SharedSensorState>,
    mut pir: M,
    mut climate: C,
    mut led: L,
    mut display: D,
    endpoint: Endpoint,
    periods: SuperloopPeriods,
) where
    M: MotionSensor,
    C: ClimateSensor,
    L: StatusLed,
    D: TextDisplay,
{
    let mut last_sample: Option<Instant> = None;
    let mut last_publish = Instant::now();
    let mut motion = false;

    loop {
        // Motion is checked on every pass and drives the LED directly
        match pir.motion() {
            Ok(level) => {
                motion = level;
                if let Err(e) = led.set(level) {
                    warn!("LED error: {}", e);
                }
            }
            Err(e) => warn!("Motion sensor error: {}", e),
        }

        if last_sample.map_or(true, |t| t.elapsed() >= periods.sample) {
            last_sample = Some(Instant::now());
            let reading = read_climate(&mut climate);
            state.update(reading, motion);
            render_display(&mut display, motion, reading.as_ref());
            info!(motion, climate_ok = reading.is_some(), "sampled");
        }

        if last_publish.elapsed() >= periods.publish {
            last_publish = Instant::now();
            // Blocks the loop for the round trip, bounded by the publish
            // period; failures wait for the next period
            if let Err(e) = publish_once(&state, &endpoint, periods.publish).await {
                warn!("Publish error: {}", e);
            }
        }

        tokio::time::sleep(TICK).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_url;
    use crate::testutil::{MockClimate, MockDisplay, MockLed, MockMotion};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test(start_paused = true)]
    async fn test_led_mirrors_motion_every_pass() {
        let state = Arc::new(SharedSensorState::new());
        let led = MockLed::new();
        let display = MockDisplay::new();

        // Unreachable endpoint; publishing failures must not stop the loop
        let endpoint = Endpoint {
            host: "127.0.0.1".to_string(),
            port: 1,
            path: "/".to_string(),
        };

        let handle = tokio::spawn(superloop(
            state.clone(),
            MockMotion::new(&[true, true, false, false]),
            MockClimate::new().ok(30.5, 78.0),
            led.clone(),
            display.clone(),
            endpoint,
            SuperloopPeriods {
                sample: Duration::from_millis(100),
                publish: Duration::from_secs(3600), // effectively never
            },
        ));

        tokio::time::sleep(Duration::from_millis(240)).await;
        handle.abort();

        let states = led.recorded();
        assert!(states.len() >= 4);
        assert_eq!(&states[..4], &[true, true, false, false]);

        // First pass sampled immediately
        let snap = state.snapshot();
        assert_eq!(snap.temperature, 30.5);
        assert!(display.last_frame().is_some());
    }

    #[tokio::test]
    async fn test_superloop_publishes_inline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let n = socket.read(&mut request).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
            String::from_utf8_lossy(&request[..n]).to_string()
        });

        let state = Arc::new(SharedSensorState::new());
        let endpoint = parse_url(&format!("http://127.0.0.1:{}/api/sensors", addr.port())).unwrap();

        let handle = tokio::spawn(superloop(
            state.clone(),
            MockMotion::new(&[true]),
            MockClimate::new().ok(30.5, 78.0),
            MockLed::new(),
            MockDisplay::new(),
            endpoint,
            SuperloopPeriods {
                sample: Duration::from_millis(20),
                publish: Duration::from_millis(200),
            },
        ));

        let request = server.await.unwrap();
        handle.abort();
        assert!(request.ends_with(r#"{"temperature":30.5,"humidity":78.0,"motion":"detected"}"#));
    }
}
