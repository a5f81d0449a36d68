//! Periodic panel refresh
//!
//! One task per refresh job. Deadlines advance by the interval from the
//! previous deadline, not from when the task woke, so the cadence does not
//! drift.

use defmt::*;
use embassy_executor::{SpawnError, Spawner};
use embassy_time::{Duration, Instant, Timer};
use ledkey_core::{RefreshScheduler, RefreshTask};

use crate::PANEL;

/// Spawns a [`refresh_task`] per registered job
pub struct EmbassyRefresh {
    spawner: Spawner,
}

impl EmbassyRefresh {
    pub fn new(spawner: Spawner) -> Self {
        Self { spawner }
    }
}

impl RefreshScheduler for EmbassyRefresh {
    type Error = SpawnError;

    fn register_periodic(
        &mut self,
        task: RefreshTask,
        first_delay_ms: u32,
        interval_ms: u32,
    ) -> Result<(), SpawnError> {
        let first = Instant::now() + Duration::from_millis(first_delay_ms as u64);
        self.spawner.spawn(refresh_task(task, first, interval_ms))
    }
}

/// Fire `task` at `first`, then every `interval_ms`
#[embassy_executor::task(pool_size = 2)]
pub async fn refresh_task(task: RefreshTask, first: Instant, interval_ms: u32) {
    info!("Refresh task {} started, every {} ms", task, interval_ms);

    let interval = Duration::from_millis(interval_ms as u64);
    let mut deadline = first;

    loop {
        Timer::at(deadline).await;
        PANEL.fire(task);
        deadline += interval;
    }
}
