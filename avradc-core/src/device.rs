//! Chip register layout
//!
//! Every classic AVR ADC uses the same ADCSRA layout and nearly the same
//! ADMUX layout. What differs between families is the reference table, the
//! number of single-ended inputs and whether differential inputs exist.
//! [`AdcDevice`] captures those differences as associated constants and
//! lookup functions, so [`Converter`](crate::Converter) is specialised per
//! chip at compile time.

use crate::config::{DifferentialPair, Gain, Reference};

/// Mask with bit `n` set
pub const fn bit(n: u8) -> u8 {
    1 << n
}

/// ADC register layout and capabilities of a chip
///
/// The defaults describe the classic ATmega layout. Chip crates override
/// what differs.
pub trait AdcDevice {
    /// Chip name, for logs
    const NAME: &'static str;

    /// Number of single-ended input channels (valid indices are `0..CHANNEL_COUNT`)
    const CHANNEL_COUNT: u8;

    /// Whether the mux has differential input pairs
    const SUPPORTS_DIFFERENTIAL: bool = false;

    // ADCSRA bit positions

    /// ADC enable
    const ADEN: u8 = 7;
    /// Start conversion; hardware clears it when the conversion is done
    const ADSC: u8 = 6;
    /// Conversion complete flag, cleared by writing one
    const ADIF: u8 = 4;
    /// Conversion complete interrupt enable
    const ADIE: u8 = 3;
    /// Prescaler field ADPS2:0
    const ADPS_MASK: u8 = 0b0000_0111;

    // ADMUX bit positions

    /// Reference select field
    const REFS_MASK: u8 = 0b1100_0000;
    /// Left adjust result
    const ADLAR: u8 = 5;
    /// Channel / pair select field
    const MUX_MASK: u8 = 0b0000_1111;

    /// Reference select bits, already shifted into ADMUX position
    ///
    /// Returns `None` when the chip has no such reference. The default
    /// table is REFS1:REFS0 = `00` external, `01` AVcc, `10` 2.56 V,
    /// `11` 1.1 V.
    fn reference_bits(reference: Reference) -> Option<u8> {
        Some(match reference {
            Reference::External => 0,
            Reference::InternalAVcc => bit(6),
            Reference::Internal2560mV => bit(7),
            Reference::Internal1100mV => bit(7) | bit(6),
        })
    }

    /// Mux bits for a single-ended channel
    fn single_ended_bits(channel: u8) -> Option<u8> {
        if channel < Self::CHANNEL_COUNT {
            Some(channel & Self::MUX_MASK)
        } else {
            None
        }
    }

    /// Mux bits for a differential pair at the given gain
    ///
    /// Returns `None` when the pair is not in the chip's mux table.
    fn differential_bits(pair: DifferentialPair, gain: Gain) -> Option<u8> {
        let _ = (pair, gain);
        None
    }
}
