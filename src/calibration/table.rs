//! Record table: one fixed slot per channel in the shared region

use crate::mapper::Polarity;
use crate::params::storage::{RECORD_SIZE, REGION_SIZE, SLOT_STRIDE};

/// Operator input channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    Throttle,
    Brake,
    Steering,
}

impl ChannelId {
    /// Every channel, in control-cycle order
    pub const ALL: [ChannelId; 3] = [ChannelId::Throttle, ChannelId::Brake, ChannelId::Steering];

    /// Slot index in the record table
    pub const fn index(self) -> usize {
        match self {
            ChannelId::Throttle => 0,
            ChannelId::Brake => 1,
            ChannelId::Steering => 2,
        }
    }

    /// Byte offset of this channel's record in the region
    pub const fn offset(self) -> u32 {
        self.index() as u32 * SLOT_STRIDE
    }

    /// Output polarity of the channel
    pub const fn polarity(self) -> Polarity {
        match self {
            ChannelId::Throttle | ChannelId::Brake => Polarity::Unipolar,
            ChannelId::Steering => Polarity::Bipolar,
        }
    }

    /// Name used on the command line
    pub const fn name(self) -> &'static str {
        match self {
            ChannelId::Throttle => "THROTTLE",
            ChannelId::Brake => "BRAKE",
            ChannelId::Steering => "STEERING",
        }
    }

    /// Parse a command-line channel name (exact, upper case)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

// Slots must fit the record, must not overlap and must fit the region
const _: () = {
    assert!(
        SLOT_STRIDE as usize >= RECORD_SIZE,
        "calibration slots overlap"
    );

    let mut i = 0;
    while i < ChannelId::ALL.len() {
        let start = ChannelId::ALL[i].offset() as usize;
        assert!(
            start + RECORD_SIZE <= REGION_SIZE,
            "calibration slot exceeds region"
        );

        let mut j = i + 1;
        while j < ChannelId::ALL.len() {
            let other = ChannelId::ALL[j].offset() as usize;
            assert!(
                start + RECORD_SIZE <= other || other + RECORD_SIZE <= start,
                "calibration slots overlap"
            );
            j += 1;
        }
        i += 1;
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(ChannelId::Throttle.offset(), 0);
        assert_eq!(ChannelId::Brake.offset(), 32);
        assert_eq!(ChannelId::Steering.offset(), 64);
    }

    #[test]
    fn test_polarity() {
        assert_eq!(ChannelId::Throttle.polarity(), Polarity::Unipolar);
        assert_eq!(ChannelId::Brake.polarity(), Polarity::Unipolar);
        assert_eq!(ChannelId::Steering.polarity(), Polarity::Bipolar);
    }

    #[test]
    fn test_names() {
        for id in ChannelId::ALL {
            assert_eq!(ChannelId::from_name(id.name()), Some(id));
        }
        assert_eq!(ChannelId::from_name("steering"), None);
        assert_eq!(ChannelId::from_name(""), None);
        assert_eq!(ChannelId::from_name("CLUTCH"), None);
    }
}
