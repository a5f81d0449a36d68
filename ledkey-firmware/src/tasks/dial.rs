//! Pulse dial task
//!
//! Turns key presses into a servo pulse width, shows it on the display and
//! hands it to the servo task.

use defmt::*;
use embassy_time::{Duration, Ticker};
use ledkey_core::{KeyTracker, PulseDial};

use super::servo::PULSE_SIGNAL;
use crate::PANEL;

#[embassy_executor::task]
pub async fn dial_task(poll_interval_ms: u32) {
    info!("Dial task started");

    let mut tracker = KeyTracker::new();
    let mut dial = PulseDial::new();
    let mut ticker = Ticker::every(Duration::from_millis(poll_interval_ms as u64));

    dial.render(PANEL.framebuffer());
    PULSE_SIGNAL.signal(dial.pulse());

    loop {
        ticker.next().await;

        let pressed = tracker.update(PANEL.get_keys());
        if pressed == 0 {
            continue;
        }

        trace!("Keys pressed: {:08x}", pressed);
        if dial.apply(pressed) {
            info!("Pulse {} us", dial.pulse());
            dial.render(PANEL.framebuffer());
            PULSE_SIGNAL.signal(dial.pulse());
        }
    }
}
