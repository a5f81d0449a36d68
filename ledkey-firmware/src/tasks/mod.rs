//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod dial;
pub mod refresh;
pub mod servo;

pub use dial::dial_task;
pub use refresh::EmbassyRefresh;
pub use servo::servo_task;
