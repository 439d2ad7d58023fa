//! Status LED blinker. Independent of the sensor record.

use roomsense_hw::StatusLed;
use std::time::Duration;
use tracing::warn;

/// Periodic blink task: one period high, one period low, forever.
pub async fn blink_loop<L: StatusLed>(mut led: L, period: Duration) {
    let mut on = false;
    loop {
        on = !on;
        if let Err(e) = led.set(on) {
            warn!("LED error: {}", e);
        }
        tokio::time::sleep(period).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockLed;

    #[tokio::test(start_paused = true)]
    async fn test_led_toggles_every_period() {
        let led = MockLed::new();
        let handle = tokio::spawn(blink_loop(led.clone(), Duration::from_secs(1)));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        handle.abort();

        let states = led.recorded();
        // Toggles at t=0s, 1s, 2s, 3s
        assert_eq!(states, vec![true, false, true, false]);
    }
}
