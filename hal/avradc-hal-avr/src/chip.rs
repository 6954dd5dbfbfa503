//! Sleep register layout and pin mapping shared by the supported chips

use avradc_core::AdcDevice;

/// Port pin, e.g. `PC0` is `PortPin { port: 'C', pin: 0 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortPin {
    /// Port letter ('B', 'C', ...)
    pub port: char,
    /// Pin number within the port (0-7)
    pub pin: u8,
}

impl PortPin {
    /// Create a port pin
    pub const fn new(port: char, pin: u8) -> Self {
        Self { port, pin }
    }
}

/// Chip-level details beyond the ADC register layout
///
/// Register addresses come from the `avr-device` peripheral types; this
/// trait only carries the bit layout of the sleep control register, which
/// differs between families (SMCR on the ATmega, MCUCR on the ATtiny).
pub trait AvrChip: AdcDevice {
    /// Sleep enable bit mask
    const SLEEP_ENABLE: u8;
    /// Sleep mode field mask
    const SLEEP_MODE_MASK: u8;
    /// Sleep mode field value for ADC noise reduction
    const SLEEP_MODE_ADC: u8;

    /// Port pin wired to a single-ended analog input
    ///
    /// Returns `None` for channels without a port pin (dedicated analog
    /// pins) and for out-of-range channels.
    fn pin(channel: u8) -> Option<PortPin>;

    /// Analog input channel on a port pin
    fn channel_for_pin(pin: PortPin) -> Option<u8> {
        (0..Self::CHANNEL_COUNT).find(|&ch| Self::pin(ch) == Some(pin))
    }

    /// Sleep control register value with ADC noise reduction armed
    ///
    /// Other bits of the register are kept.
    fn arm_sleep_bits(current: u8) -> u8 {
        (current & !Self::SLEEP_MODE_MASK) | Self::SLEEP_MODE_ADC | Self::SLEEP_ENABLE
    }

    /// Sleep control register value with sleep disabled
    fn disarm_sleep_bits(current: u8) -> u8 {
        current & !Self::SLEEP_ENABLE
    }
}
