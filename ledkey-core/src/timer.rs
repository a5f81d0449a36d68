//! Deadline timer queue
//!
//! Fixed-capacity set of timer events keyed by millisecond ticks. Ticks are
//! `u32` and wrap after ~49 days; every comparison uses the signed
//! difference so a deadline just past the wrap still sorts after one just
//! before it.
//!
//! The queue never looks at a clock itself. The owner passes the current
//! tick to [`TimerQueue::poll`] and gets back at most one due event per
//! call.

use heapless::Vec;

use crate::refresh::{RefreshScheduler, RefreshTask};

/// Timer queue errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// No free slot left
    Full,
    /// Id does not name a scheduled event
    UnknownTimer,
}

/// Handle to a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(u8);

impl TimerId {
    /// Slot index in the queue
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether an event is waiting to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerState {
    /// Not scheduled
    Idle,
    /// Fires once `now` reaches `deadline`
    Armed { deadline: u32 },
}

#[derive(Debug, Clone)]
struct TimerEvent<T> {
    task: T,
    state: TimerState,
    /// Re-arm interval (0 = one-shot)
    period: u32,
}

/// Check if `deadline` has been reached at `now`
pub fn is_due(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Fixed-capacity deadline queue
#[derive(Debug)]
pub struct TimerQueue<T, const N: usize> {
    events: Vec<TimerEvent<T>, N>,
    /// Tick of the last poll
    now: u32,
}

impl<T, const N: usize> Default for TimerQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> TimerQueue<T, N> {
    /// Empty queue at tick 0
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            now: 0,
        }
    }

    /// Tick of the last poll
    pub fn now(&self) -> u32 {
        self.now
    }

    /// Number of events ever scheduled (armed or idle)
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no event was ever scheduled
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Schedule `task` at an absolute `deadline`
    ///
    /// A non-zero `period` re-arms the event at `deadline + period` each
    /// time it fires.
    pub fn schedule(&mut self, task: T, deadline: u32, period: u32) -> Result<TimerId, TimerError> {
        let index = self.events.len();
        self.events
            .push(TimerEvent {
                task,
                state: TimerState::Armed { deadline },
                period,
            })
            .map_err(|_| TimerError::Full)?;
        Ok(TimerId(index as u8))
    }

    /// Schedule `task` `delay` ticks after the last poll
    pub fn schedule_in(&mut self, task: T, delay: u32, period: u32) -> Result<TimerId, TimerError> {
        self.schedule(task, self.now.wrapping_add(delay), period)
    }

    /// Re-arm an existing event
    pub fn rearm(&mut self, id: TimerId, deadline: u32) -> Result<(), TimerError> {
        let event = self
            .events
            .get_mut(id.index())
            .ok_or(TimerError::UnknownTimer)?;
        event.state = TimerState::Armed { deadline };
        Ok(())
    }

    /// Disarm an event; it keeps its slot
    pub fn cancel(&mut self, id: TimerId) -> Result<(), TimerError> {
        let event = self
            .events
            .get_mut(id.index())
            .ok_or(TimerError::UnknownTimer)?;
        event.state = TimerState::Idle;
        Ok(())
    }

    /// State of an event
    pub fn state(&self, id: TimerId) -> Option<TimerState> {
        self.events.get(id.index()).map(|event| event.state)
    }

    /// Check if an event is waiting to fire
    pub fn is_armed(&self, id: TimerId) -> bool {
        matches!(self.state(id), Some(TimerState::Armed { .. }))
    }

    /// Earliest armed deadline, relative to the last poll
    pub fn next_deadline(&self) -> Option<u32> {
        self.earliest(self.now).map(|(_, deadline)| deadline)
    }

    /// Fire the earliest due event
    ///
    /// Returns `None` when nothing is due. Call repeatedly until it does to
    /// drain every event due at `now`.
    pub fn poll(&mut self, now: u32) -> Option<T>
    where
        T: Clone,
    {
        self.now = now;

        let (index, deadline) = self.earliest(now)?;
        if !is_due(now, deadline) {
            return None;
        }

        let event = &mut self.events[index];
        event.state = if event.period > 0 {
            TimerState::Armed {
                deadline: deadline.wrapping_add(event.period),
            }
        } else {
            TimerState::Idle
        };
        Some(event.task.clone())
    }

    /// Index and deadline of the armed event that comes first after `now`
    ///
    /// Overdue events sort before future ones, oldest first.
    fn earliest(&self, now: u32) -> Option<(usize, u32)> {
        self.events
            .iter()
            .enumerate()
            .filter_map(|(index, event)| match event.state {
                TimerState::Armed { deadline } => Some((index, deadline)),
                TimerState::Idle => None,
            })
            .min_by_key(|&(_, deadline)| deadline.wrapping_sub(now) as i32)
    }
}

impl<const N: usize> RefreshScheduler for TimerQueue<RefreshTask, N> {
    type Error = TimerError;

    fn register_periodic(
        &mut self,
        task: RefreshTask,
        first_delay_ms: u32,
        interval_ms: u32,
    ) -> Result<(), TimerError> {
        self.schedule_in(task, first_delay_ms, interval_ms)
            .map(|_| ())
    }
}
