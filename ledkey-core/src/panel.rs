//! LED&KEY panel driver
//!
//! [`Panel`] is the application-facing handle. It is meant to live in a
//! `static`, shared by the background tasks and the transport's completion
//! interrupt:
//!
//! ```ignore
//! static PANEL: Panel<MyBus> = Panel::new();
//!
//! // startup
//! PANEL.init(bus, &mut scheduler, 10, 20)?;
//!
//! // completion interrupt
//! PANEL.on_transfer_complete();
//!
//! // background
//! PANEL.write_digit(0, 7);
//! let keys = PANEL.get_keys();
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use crate::arbiter::Arbiter;
use crate::command::{CommandKind, RequestSet};
use crate::config::{DisplayControl, PanelConfig};
use crate::framebuffer::SegmentFramebuffer;
use crate::keys::KeySnapshot;
use crate::refresh::{self, RefreshScheduler, RefreshTask};
use crate::traits::Transport;
use crate::transfer::Resources;

/// One TM1638 panel on one bus
pub struct Panel<T> {
    arbiter: Mutex<RefCell<Arbiter<T>>>,
    framebuffer: SegmentFramebuffer,
    display: DisplayControl,
    keys: KeySnapshot,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Panel<T> {
    /// Panel with no transport attached, display on at half brightness
    pub const fn new() -> Self {
        Self {
            arbiter: Mutex::new(RefCell::new(Arbiter::new())),
            framebuffer: SegmentFramebuffer::new(),
            display: DisplayControl::new(),
            keys: KeySnapshot::new(),
        }
    }

    /// Display framebuffer
    pub fn framebuffer(&self) -> &SegmentFramebuffer {
        &self.framebuffer
    }

    /// Live display control state
    pub fn display(&self) -> &DisplayControl {
        &self.display
    }

    /// Current key snapshot
    pub fn get_keys(&self) -> u32 {
        self.keys.get()
    }

    /// Render a hex digit; see [`SegmentFramebuffer::write_digit`]
    ///
    /// Takes effect on the next segment write.
    pub fn write_digit(&self, position: u8, value: i8) {
        self.framebuffer.write_digit(position, value);
    }

    /// Write a raw segment pattern; see [`SegmentFramebuffer::write_pattern`]
    pub fn write_pattern(&self, position: u8, pattern: u8) {
        self.framebuffer.write_pattern(position, pattern);
    }

    /// Command currently on the bus
    pub fn active(&self) -> Option<CommandKind> {
        critical_section::with(|cs| self.arbiter.borrow_ref(cs).active())
    }

    /// Commands waiting for the bus
    pub fn pending(&self) -> RequestSet {
        critical_section::with(|cs| self.arbiter.borrow_ref(cs).pending())
    }

    fn resources(&self) -> Resources<'_> {
        Resources {
            framebuffer: &self.framebuffer,
            display: &self.display,
            keys: &self.keys,
        }
    }
}

impl<T: Transport> Panel<T> {
    /// Attach the transport, push initial state and register refresh tasks
    ///
    /// Clears the framebuffer and resets the display to on at half
    /// brightness, then queues a config write and a segment write. A `0`
    /// interval leaves that refresh task unregistered.
    pub fn init<S: RefreshScheduler>(
        &self,
        bus: T,
        scheduler: &mut S,
        rescan_ms: u32,
        repaint_ms: u32,
    ) -> Result<(), S::Error> {
        self.bring_up(bus, scheduler, rescan_ms, repaint_ms, |_| {})
    }

    /// [`Panel::init`] from a [`PanelConfig`]
    ///
    /// The configured on/off state and brightness replace the reset values
    /// before the first config write.
    pub fn start<S: RefreshScheduler>(
        &self,
        bus: T,
        scheduler: &mut S,
        config: &PanelConfig,
    ) -> Result<(), S::Error> {
        self.bring_up(
            bus,
            scheduler,
            config.rescan_interval_ms,
            config.repaint_interval_ms,
            |display| {
                display.set_enabled(config.enabled);
                display.set_brightness(config.brightness);
            },
        )
    }

    fn bring_up<S: RefreshScheduler>(
        &self,
        bus: T,
        scheduler: &mut S,
        rescan_ms: u32,
        repaint_ms: u32,
        configure: impl FnOnce(&DisplayControl),
    ) -> Result<(), S::Error> {
        self.framebuffer.clear();
        self.display.reset();
        configure(&self.display);

        let res = self.resources();
        critical_section::with(|cs| {
            let mut arbiter = self.arbiter.borrow_ref_mut(cs);
            arbiter.attach(bus, &res);
            arbiter.request(CommandKind::WriteConfig, &res);
            arbiter.request(CommandKind::WriteSegments, &res);
        });

        refresh::register(scheduler, rescan_ms, repaint_ms)
    }

    /// Request a command; starts it at once if the bus is free
    pub fn request(&self, kind: CommandKind) {
        let res = self.resources();
        critical_section::with(|cs| self.arbiter.borrow_ref_mut(cs).request(kind, &res));
    }

    /// Completion event from the transport
    ///
    /// Call only from the transport's completion interrupt.
    pub fn on_transfer_complete(&self) {
        let res = self.resources();
        critical_section::with(|cs| self.arbiter.borrow_ref_mut(cs).complete(&res));
    }

    /// Refresh task callback from the scheduler
    pub fn fire(&self, task: RefreshTask) {
        self.request(task.command());
    }

    /// Switch the display on or off
    pub fn set_enabled(&self, enabled: bool) {
        self.display.set_enabled(enabled);
        self.request(CommandKind::WriteConfig);
    }

    /// Set brightness (0-7; higher values are masked)
    pub fn set_brightness(&self, brightness: u8) {
        self.display.set_brightness(brightness);
        self.request(CommandKind::WriteConfig);
    }

    /// Start a key scan; [`Panel::get_keys`] reflects it once finished
    pub fn request_read_keys(&self) {
        self.request(CommandKind::ReadKeys);
    }

    /// Push the framebuffer to the display
    pub fn request_write_segments(&self) {
        self.request(CommandKind::WriteSegments);
    }
}
