//! Servo outputs

pub mod pwm;

pub use pwm::ServoOutput;
