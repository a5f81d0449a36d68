//! Recording transport shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ledkey_core::{BusMode, Panel, RefreshScheduler, RefreshTask, Transport};

/// One call made on the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Select,
    Deselect,
    Send(u8),
    Mode(BusMode),
    Listen(bool),
}

/// Wire-level view of the bus, shared between the test and the panel
#[derive(Debug)]
pub struct BusState {
    pub events: Vec<BusEvent>,
    pub selected: bool,
    pub mode: BusMode,
    pub listening: bool,
    /// A byte is shifting and its completion event has not been handled
    pub in_flight: bool,
    /// Bytes the chip drives onto DIO during receive-mode sends
    pub scan: VecDeque<u8>,
    clocked_in: u8,
}

impl Default for BusState {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            selected: false,
            mode: BusMode::Transmit,
            listening: false,
            in_flight: false,
            scan: VecDeque::new(),
            clocked_in: 0,
        }
    }
}

impl BusState {
    /// Bytes sent since the last clear
    pub fn sent(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BusEvent::Send(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }

    /// Bytes sent, grouped by strobe frame
    pub fn frames(&self) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        let mut current: Option<Vec<u8>> = None;
        for event in &self.events {
            match event {
                BusEvent::Select => current = Some(Vec::new()),
                BusEvent::Deselect => frames.extend(current.take()),
                BusEvent::Send(byte) => {
                    if let Some(frame) = current.as_mut() {
                        frame.push(*byte);
                    }
                }
                _ => {}
            }
        }
        frames
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Transport that records every call and checks wire discipline
#[derive(Clone, Default)]
pub struct RecordingBus {
    pub state: Rc<RefCell<BusState>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> bool {
        self.state.borrow().in_flight
    }

    /// Queue a 4-byte key scan for the next read
    pub fn load_scan(&self, scan: [u8; 4]) {
        self.state.borrow_mut().scan.extend(scan);
    }
}

impl Transport for RecordingBus {
    fn select(&mut self) {
        let mut state = self.state.borrow_mut();
        assert!(!state.selected, "strobe asserted twice");
        state.selected = true;
        state.events.push(BusEvent::Select);
    }

    fn deselect(&mut self) {
        let mut state = self.state.borrow_mut();
        assert!(state.selected, "strobe released while not asserted");
        assert!(!state.in_flight, "strobe released mid-byte");
        state.selected = false;
        state.events.push(BusEvent::Deselect);
    }

    fn send(&mut self, byte: u8) {
        let mut state = self.state.borrow_mut();
        assert!(state.selected, "byte sent outside a strobe frame");
        assert!(!state.in_flight, "byte sent before the previous one finished");
        state.in_flight = true;
        state.clocked_in = if state.mode == BusMode::Receive {
            state.scan.pop_front().unwrap_or(0)
        } else {
            0
        };
        state.events.push(BusEvent::Send(byte));
    }

    fn acknowledge(&mut self) -> u8 {
        let mut state = self.state.borrow_mut();
        assert!(state.in_flight, "acknowledged with no byte in flight");
        state.in_flight = false;
        state.clocked_in
    }

    fn set_mode(&mut self, mode: BusMode) {
        let mut state = self.state.borrow_mut();
        state.mode = mode;
        state.events.push(BusEvent::Mode(mode));
    }

    fn listen(&mut self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.listening = enabled;
        state.events.push(BusEvent::Listen(enabled));
    }
}

/// Scheduler that only records registrations
#[derive(Debug, Default)]
pub struct NullScheduler {
    pub registered: Vec<(RefreshTask, u32, u32)>,
}

impl RefreshScheduler for NullScheduler {
    type Error = ();

    fn register_periodic(
        &mut self,
        task: RefreshTask,
        first_delay_ms: u32,
        interval_ms: u32,
    ) -> Result<(), ()> {
        self.registered.push((task, first_delay_ms, interval_ms));
        Ok(())
    }
}

/// Deliver one completion event, as the interrupt would
pub fn step(panel: &Panel<RecordingBus>, bus: &RecordingBus) -> bool {
    if !bus.in_flight() {
        return false;
    }
    panel.on_transfer_complete();
    true
}

/// Deliver completion events until the bus goes quiet; returns the count
pub fn run_to_idle(panel: &Panel<RecordingBus>, bus: &RecordingBus) -> usize {
    let mut events = 0;
    while step(panel, bus) {
        events += 1;
        assert!(events < 1000, "bus never went idle");
    }
    events
}

/// Panel with a recording bus attached and the startup commands drained
pub fn attached_panel() -> (Panel<RecordingBus>, RecordingBus) {
    let panel = Panel::new();
    let bus = RecordingBus::new();
    let mut scheduler = NullScheduler::default();
    panel
        .init(bus.clone(), &mut scheduler, 0, 0)
        .expect("null scheduler never fails");
    run_to_idle(&panel, &bus);
    bus.state.borrow_mut().clear();
    (panel, bus)
}
