//! Panel command kinds and the pending request set

/// One of the three operations the panel bus carries
///
/// Each kind occupies its own bit. The lowest bit has the highest
/// priority when several kinds are pending at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandKind {
    /// Send the display control byte (on/off, brightness)
    WriteConfig = 1 << 0,
    /// Read the 4 key scan bytes
    ReadKeys = 1 << 1,
    /// Stream the 16 display register bytes
    WriteSegments = 1 << 2,
}

impl CommandKind {
    /// All kinds, highest priority first
    pub const ALL: [CommandKind; 3] = [
        CommandKind::WriteConfig,
        CommandKind::ReadKeys,
        CommandKind::WriteSegments,
    ];

    /// Bit of this kind in a [`RequestSet`]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Convert a single bit back to a kind
    pub const fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0x01 => Some(CommandKind::WriteConfig),
            0x02 => Some(CommandKind::ReadKeys),
            0x04 => Some(CommandKind::WriteSegments),
            _ => None,
        }
    }

    /// Completion events needed to finish this command
    ///
    /// The opening byte is sent when the command starts; every later
    /// byte, and the final release, is driven by one event.
    pub const fn events(self) -> u8 {
        match self {
            CommandKind::WriteConfig => 1,
            CommandKind::ReadKeys => 5,
            CommandKind::WriteSegments => 18,
        }
    }
}

/// Set of requested, not yet started commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RequestSet(u8);

impl RequestSet {
    /// Empty set
    pub const fn new() -> Self {
        Self(0)
    }

    /// Raw bitmask
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if nothing is pending
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if `kind` is pending
    pub const fn contains(self, kind: CommandKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Add `kind`; adding twice coalesces
    pub fn insert(&mut self, kind: CommandKind) {
        self.0 |= kind.bit();
    }

    /// Remove `kind`
    pub fn remove(&mut self, kind: CommandKind) {
        self.0 &= !kind.bit();
    }

    /// Highest-priority pending kind, without removing it
    pub fn peek(self) -> Option<CommandKind> {
        // Isolate the lowest set bit
        CommandKind::from_bit(self.0 & self.0.wrapping_neg())
    }

    /// Remove and return the highest-priority pending kind
    pub fn take_next(&mut self) -> Option<CommandKind> {
        let next = self.peek()?;
        self.remove(next);
        Some(next)
    }

    /// Number of pending kinds
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }
}

impl FromIterator<CommandKind> for RequestSet {
    fn from_iter<I: IntoIterator<Item = CommandKind>>(iter: I) -> Self {
        let mut set = RequestSet::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_disjoint_bits() {
        let mut seen = 0u8;
        for kind in CommandKind::ALL {
            assert_eq!(kind.bit().count_ones(), 1);
            assert_eq!(seen & kind.bit(), 0);
            seen |= kind.bit();
            assert_eq!(CommandKind::from_bit(kind.bit()), Some(kind));
        }
        assert_eq!(CommandKind::from_bit(0x08), None);
        assert_eq!(CommandKind::from_bit(0x03), None);
    }

    #[test]
    fn test_priority_is_lowest_bit() {
        let mut set: RequestSet = [CommandKind::WriteSegments, CommandKind::ReadKeys]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.take_next(), Some(CommandKind::ReadKeys));

        set.insert(CommandKind::WriteConfig);
        assert_eq!(set.take_next(), Some(CommandKind::WriteConfig));
        assert_eq!(set.take_next(), Some(CommandKind::WriteSegments));
        assert_eq!(set.take_next(), None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert_coalesces() {
        let mut set = RequestSet::new();
        set.insert(CommandKind::WriteSegments);
        set.insert(CommandKind::WriteSegments);
        assert_eq!(set.len(), 1);
        assert!(set.contains(CommandKind::WriteSegments));

        set.remove(CommandKind::WriteSegments);
        assert!(!set.contains(CommandKind::WriteSegments));
    }
}
