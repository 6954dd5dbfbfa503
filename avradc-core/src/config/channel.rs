//! Input channel, differential pair and gain selection

/// Input selection for the next conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelSelection {
    /// One input measured against ground (channel index, 0-based)
    SingleEnded(u8),
    /// Voltage difference between two inputs
    Differential(DifferentialPair),
}

impl Default for ChannelSelection {
    fn default() -> Self {
        ChannelSelection::SingleEnded(0)
    }
}

impl ChannelSelection {
    /// Check if this is a differential selection
    pub fn is_differential(&self) -> bool {
        matches!(self, ChannelSelection::Differential(_))
    }
}

/// Positive/negative input pair for differential conversions
///
/// Which pairs exist is chip specific; anything outside the chip's mux
/// table is rejected when selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DifferentialPair {
    /// Positive input channel index
    pub positive: u8,
    /// Negative input channel index
    pub negative: u8,
}

impl DifferentialPair {
    /// Create a new pair
    pub const fn new(positive: u8, negative: u8) -> Self {
        Self { positive, negative }
    }
}

/// Differential amplifier gain
///
/// Only used by differential selections. In single-ended mode the gain is
/// remembered but has no effect on the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    #[default]
    X1,
    X20,
}
