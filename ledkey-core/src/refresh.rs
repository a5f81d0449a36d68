//! Periodic refresh requests
//!
//! Two periodic triggers keep the panel alive: a key rescan and a display
//! repaint. Each firing only calls `Panel::request` for its command; the
//! arbiter does the rest.
//!
//! The first repaint lands half a rescan interval after the first rescan
//! so the two commands rarely collide on the bus:
//!
//! ```text
//! rescan 10 ms, repaint 20 ms
//!
//! t (ms)   0    5    10   15   20   25   30   35
//! rescan             R         R         R
//! repaint                 W                   W
//! ```

use crate::command::CommandKind;

/// One of the two periodic panel jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshTask {
    /// Read the key matrix
    Rescan,
    /// Stream the framebuffer
    Repaint,
}

impl RefreshTask {
    /// Command requested when this task fires
    pub const fn command(self) -> CommandKind {
        match self {
            RefreshTask::Rescan => CommandKind::ReadKeys,
            RefreshTask::Repaint => CommandKind::WriteSegments,
        }
    }
}

/// Deadline scheduler able to run refresh tasks periodically
///
/// Implementations must re-arm each task at `previous deadline + interval`
/// so the cadence does not drift with handler latency.
pub trait RefreshScheduler {
    /// Registration error
    type Error;

    /// Run `task` after `first_delay_ms`, then every `interval_ms`
    fn register_periodic(
        &mut self,
        task: RefreshTask,
        first_delay_ms: u32,
        interval_ms: u32,
    ) -> Result<(), Self::Error>;
}

/// First firing of each task, in ms after init
///
/// `None` means the task is disabled (interval 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshPlan {
    pub rescan: Option<u32>,
    pub repaint: Option<u32>,
}

impl RefreshPlan {
    /// Work out first delays for the given intervals
    pub const fn new(rescan_ms: u32, repaint_ms: u32) -> Self {
        let rescan = if rescan_ms > 0 { Some(rescan_ms) } else { None };
        let repaint = if repaint_ms == 0 {
            None
        } else if rescan_ms > 0 {
            Some(rescan_ms.saturating_add(rescan_ms / 2))
        } else {
            Some(repaint_ms)
        };
        Self { rescan, repaint }
    }
}

/// Register both refresh tasks with `scheduler`
pub fn register<S: RefreshScheduler>(
    scheduler: &mut S,
    rescan_ms: u32,
    repaint_ms: u32,
) -> Result<(), S::Error> {
    let plan = RefreshPlan::new(rescan_ms, repaint_ms);

    if let Some(first) = plan.rescan {
        scheduler.register_periodic(RefreshTask::Rescan, first, rescan_ms)?;
    }
    if let Some(first) = plan.repaint {
        scheduler.register_periodic(RefreshTask::Repaint, first, repaint_ms)?;
    }
    Ok(())
}
