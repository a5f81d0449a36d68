//! PWM slice setup for a servo frame
//!
//! The slice counts at 1 MHz so one count is one microsecond, and wraps
//! every 20 000 counts (50 Hz).

use embassy_rp::pwm;
use fixed::types::U12F4;
use ledkey_core::dial::PWM_COUNTS;

/// Counter rate of the servo slice
pub const SERVO_TICK_HZ: u32 = 1_000_000;

/// Clock divider that brings `sys_clk_hz` down to [`SERVO_TICK_HZ`]
pub fn servo_divider(sys_clk_hz: u32) -> U12F4 {
    // Divider register holds 8.4 bits; clamp to its range
    let ratio = (sys_clk_hz / SERVO_TICK_HZ).clamp(1, 255);
    U12F4::from_num(ratio)
}

/// Slice configuration with the output held low until the first pulse
pub fn servo_config(sys_clk_hz: u32) -> pwm::Config {
    let mut config = pwm::Config::default();
    config.top = PWM_COUNTS - 1;
    config.divider = servo_divider(sys_clk_hz);
    config.compare_a = 0;
    config
}
