//! Servo output task
//!
//! Applies the latest pulse width published by the dial task.

use defmt::*;
use embassy_rp::pwm::PwmOutput;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use ledkey_drivers::servo::ServoOutput;

/// Latest pulse width in us
pub static PULSE_SIGNAL: Signal<CriticalSectionRawMutex, u16> = Signal::new();

#[embassy_executor::task]
pub async fn servo_task(mut servo: ServoOutput<PwmOutput<'static>>) {
    info!("Servo task started");

    loop {
        let pulse_us = PULSE_SIGNAL.wait().await;
        if servo.set_pulse(pulse_us).is_err() {
            warn!("Failed to set servo pulse {} us", pulse_us);
        } else {
            debug!("Servo pulse {} us", pulse_us);
        }
    }
}
