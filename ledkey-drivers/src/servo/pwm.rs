//! Hobby servo on an `embedded-hal` PWM channel
//!
//! The channel is expected to run a 20 ms frame. The pulse width is
//! applied as a fraction of that frame, so the PWM's own resolution does
//! not matter.

use embedded_hal::pwm::SetDutyCycle;
use ledkey_core::dial::{pulse_counts, PWM_COUNTS};

/// Servo pulse output
pub struct ServoOutput<P> {
    pwm: P,
    pulse_us: u16,
}

impl<P: SetDutyCycle> ServoOutput<P> {
    /// Wrap a PWM channel; the output stays off until the first pulse
    pub fn new(pwm: P) -> Self {
        Self { pwm, pulse_us: 0 }
    }

    /// Set the pulse width; clamped to the servo range
    pub fn set_pulse(&mut self, pulse_us: u16) -> Result<(), P::Error> {
        self.pwm
            .set_duty_cycle_fraction(pulse_counts(pulse_us), PWM_COUNTS)?;
        self.pulse_us = pulse_us;
        Ok(())
    }

    /// Last pulse width applied, in us (0 before the first)
    pub fn pulse(&self) -> u16 {
        self.pulse_us
    }

    /// Stop driving pulses
    pub fn disable(&mut self) -> Result<(), P::Error> {
        self.pwm.set_duty_cycle_fully_off()?;
        self.pulse_us = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    struct FakePwm {
        max: u16,
        duty: u16,
    }

    impl ErrorType for FakePwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for FakePwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }
        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn test_pulse_counts_at_1mhz() {
        let mut servo = ServoOutput::new(FakePwm {
            max: 20_000,
            duty: 0,
        });

        servo.set_pulse(500).unwrap();
        assert_eq!(servo.pwm.duty, 1000);
        servo.set_pulse(2500).unwrap();
        assert_eq!(servo.pwm.duty, 5000);
        servo.set_pulse(1500).unwrap();
        assert_eq!(servo.pwm.duty, 3000);
        assert_eq!(servo.pulse(), 1500);
    }

    #[test]
    fn test_scales_to_channel_resolution() {
        let mut servo = ServoOutput::new(FakePwm {
            max: 2_000,
            duty: 0,
        });

        servo.set_pulse(2500).unwrap();
        assert_eq!(servo.pwm.duty, 500);

        servo.disable().unwrap();
        assert_eq!(servo.pwm.duty, 0);
        assert_eq!(servo.pulse(), 0);
    }
}
