//! Per-command transfer state machine
//!
//! A [`Transfer`] drives one command byte by byte. The opening byte goes
//! out in [`Transfer::begin`]; every completion event then calls
//! [`Transfer::advance`] exactly once.
//!
//! | Kind          | Opening byte    | Events | Event `n` does                                  |
//! |---------------|-----------------|--------|-------------------------------------------------|
//! | WriteConfig   | display control | 1      | 0: done                                         |
//! | ReadKeys      | `0x42`          | 5      | 0: rx mode, clock; 1-3: store, clock; 4: store, tx mode, publish |
//! | WriteSegments | `0x40`          | 18     | 0: re-strobe, `0xC0`; 1-16: register `n-1`; 17: done |

use crate::command::CommandKind;
use crate::config::DisplayControl;
use crate::framebuffer::SegmentFramebuffer;
use crate::keys::KeySnapshot;
use crate::protocol::{
    address_command, read_keys_command, write_segments_command, RX_FILLER, SCAN_BYTES,
};
use crate::traits::{BusMode, Transport};

/// State shared between the background context and the completion handler
///
/// The handler only reads the framebuffer and display state, and only
/// writes the key snapshot.
#[derive(Clone, Copy)]
pub struct Resources<'a> {
    /// Display registers streamed by segment writes
    pub framebuffer: &'a SegmentFramebuffer,
    /// Display control byte sent by config writes
    pub display: &'a DisplayControl,
    /// Destination of key reads
    pub keys: &'a KeySnapshot,
}

/// Result of one transfer step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// More completion events are expected
    Continue,
    /// The command's last byte is done; the bus may be released
    Finished,
}

/// One in-flight command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transfer {
    kind: CommandKind,
    /// Completion events handled so far
    step: u8,
    /// Next payload byte (framebuffer register or scan byte)
    cursor: u8,
    /// Scan bytes received so far; published only when complete
    scan: [u8; SCAN_BYTES],
}

impl Transfer {
    /// Select the chip and send the opening byte of `kind`
    pub fn begin<T: Transport>(kind: CommandKind, bus: &mut T, res: &Resources<'_>) -> Self {
        let opening = match kind {
            CommandKind::WriteConfig => res.display.command(),
            CommandKind::ReadKeys => read_keys_command(),
            CommandKind::WriteSegments => write_segments_command(),
        };

        bus.select();
        bus.send(opening);
        bus.listen(true);

        Self {
            kind,
            step: 0,
            cursor: 0,
            scan: [0; SCAN_BYTES],
        }
    }

    /// Command being transferred
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Completion events handled so far
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Handle one completion event
    pub fn advance<T: Transport>(&mut self, bus: &mut T, res: &Resources<'_>) -> Progress {
        let received = bus.acknowledge();
        let step = self.step;

        debug_assert!(
            step < self.kind.events(),
            "transfer stepped past its final event"
        );

        self.step = step.saturating_add(1);

        match self.kind {
            CommandKind::WriteConfig => Progress::Finished,
            CommandKind::ReadKeys => self.advance_read(step, received, bus, res),
            CommandKind::WriteSegments => self.advance_write(step, bus, res),
        }
    }

    fn advance_read<T: Transport>(
        &mut self,
        step: u8,
        received: u8,
        bus: &mut T,
        res: &Resources<'_>,
    ) -> Progress {
        match step {
            0 => {
                // Opening byte is out; release DIO and clock the first scan byte
                bus.set_mode(BusMode::Receive);
                bus.send(RX_FILLER);
                Progress::Continue
            }
            1..=3 => {
                self.store_scan_byte(received);
                bus.send(RX_FILLER);
                Progress::Continue
            }
            _ => {
                self.store_scan_byte(received);
                bus.set_mode(BusMode::Transmit);
                res.keys.publish(self.scan);
                Progress::Finished
            }
        }
    }

    fn advance_write<T: Transport>(
        &mut self,
        step: u8,
        bus: &mut T,
        res: &Resources<'_>,
    ) -> Progress {
        match step {
            0 => {
                // Data command and address command need separate frames
                bus.deselect();
                bus.select();
                bus.send(address_command(0));
                Progress::Continue
            }
            1..=16 => {
                bus.send(res.framebuffer.byte(self.cursor as usize));
                self.cursor += 1;
                Progress::Continue
            }
            _ => Progress::Finished,
        }
    }

    fn store_scan_byte(&mut self, byte: u8) {
        if let Some(slot) = self.scan.get_mut(self.cursor as usize) {
            *slot = byte;
            self.cursor += 1;
        }
    }
}
