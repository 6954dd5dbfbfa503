//! Configuration types
//!
//! Value types for every converter setting plus [`AdcConfig`], which
//! bundles them so a converter can be set up in one call.

pub mod channel;
pub mod prescaler;
pub mod reference;
pub mod scale;

pub use channel::{ChannelSelection, DifferentialPair, Gain};
pub use prescaler::Prescaler;
pub use reference::Reference;
pub use scale::Scale;

/// Number of distinct full-scale sample values
pub const ADC_RANGE: u16 = 1024;

/// Default wait after switching reference, in milliseconds
pub const SETTLE_PERIOD_DEFAULT_MS: u32 = 15;

/// Complete converter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    /// Voltage reference
    pub reference: Reference,
    /// Input selection
    pub selection: ChannelSelection,
    /// Differential gain (ignored for single-ended inputs)
    pub gain: Gain,
    /// ADC clock divider
    pub prescaler: Prescaler,
    /// Result representation
    pub scale: Scale,
    /// Wait after a reference change before trusting samples (ms), applied
    /// by [`Converter::configure_and_settle`](crate::Converter::configure_and_settle)
    pub settle_period_ms: u32,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self::FULL_SCALE_AVCC
    }
}

impl AdcConfig {
    /// 10-bit readings of channel 0 against AVcc at the slowest ADC clock
    pub const FULL_SCALE_AVCC: Self = Self {
        reference: Reference::InternalAVcc,
        selection: ChannelSelection::SingleEnded(0),
        gain: Gain::X1,
        prescaler: Prescaler::Div128,
        scale: Scale::FullScale,
        settle_period_ms: SETTLE_PERIOD_DEFAULT_MS,
    };

    /// 8-bit readings of channel 0 against AVcc
    pub const HALF_SCALE_AVCC: Self = Self {
        scale: Scale::HalfScale,
        ..Self::FULL_SCALE_AVCC
    };

    /// Default configuration with the prescaler chosen for a CPU clock
    pub const fn for_cpu_frequency(f_cpu_hz: u32) -> Self {
        Self {
            prescaler: Prescaler::for_cpu_frequency(f_cpu_hz),
            ..Self::FULL_SCALE_AVCC
        }
    }

    /// Replace the input selection
    pub const fn with_selection(mut self, selection: ChannelSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Replace the reference
    pub const fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = reference;
        self
    }
}
