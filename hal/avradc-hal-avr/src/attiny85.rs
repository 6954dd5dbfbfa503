//! ATtiny85 ADC
//!
//! Four single-ended inputs:
//! - ADC0: PB5 (shared with RESET)
//! - ADC1: PB2
//! - ADC2: PB4
//! - ADC3: PB3
//!
//! Differential pairs live in the upper half of the mux table, with the
//! gain in MUX0:
//!
//! | MUX3:0 | positive | negative | gain |
//! |--------|----------|----------|------|
//! | 0100   | ADC2     | ADC2     | 1x   |
//! | 0101   | ADC2     | ADC2     | 20x  |
//! | 0110   | ADC2     | ADC3     | 1x   |
//! | 0111   | ADC2     | ADC3     | 20x  |
//! | 1000   | ADC0     | ADC0     | 1x   |
//! | 1001   | ADC0     | ADC0     | 20x  |
//! | 1010   | ADC0     | ADC1     | 1x   |
//! | 1011   | ADC0     | ADC1     | 20x  |
//!
//! The reference select field is REFS2:0, with REFS2 in ADMUX bit 4.

use avradc_core::device::bit;
use avradc_core::{AdcDevice, DifferentialPair, Gain, Reference};

use crate::chip::{AvrChip, PortPin};

/// ATtiny85 (and ATtiny25/45) ADC layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attiny85;

const REFS0: u8 = bit(6);
const REFS1: u8 = bit(7);
const REFS2: u8 = bit(4);

impl AdcDevice for Attiny85 {
    const NAME: &'static str = "ATtiny85";
    const CHANNEL_COUNT: u8 = 4;
    const SUPPORTS_DIFFERENTIAL: bool = true;

    const REFS_MASK: u8 = REFS1 | REFS0 | REFS2;

    fn reference_bits(reference: Reference) -> Option<u8> {
        Some(match reference {
            // Vcc, AREF disconnected from PB0
            Reference::InternalAVcc => 0,
            Reference::External => REFS0,
            Reference::Internal1100mV => REFS1,
            // 2.56 V without external bypass capacitor
            Reference::Internal2560mV => REFS2 | REFS1,
        })
    }

    fn differential_bits(pair: DifferentialPair, gain: Gain) -> Option<u8> {
        let base = match (pair.positive, pair.negative) {
            (2, 2) => 0b0100,
            (2, 3) => 0b0110,
            (0, 0) => 0b1000,
            (0, 1) => 0b1010,
            _ => return None,
        };
        Some(match gain {
            Gain::X1 => base,
            Gain::X20 => base | bit(0),
        })
    }
}

impl AvrChip for Attiny85 {
    // MCUCR: SE in bit 5, SM1:0 in bits 4:3
    const SLEEP_ENABLE: u8 = bit(5);
    const SLEEP_MODE_MASK: u8 = 0b0001_1000;
    const SLEEP_MODE_ADC: u8 = 0b0000_1000;

    fn pin(channel: u8) -> Option<PortPin> {
        let pin = match channel {
            0 => 5,
            1 => 2,
            2 => 4,
            3 => 3,
            _ => return None,
        };
        Some(PortPin::new('B', pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avradc_core::sim::{SimulatedAdc, SimulatedSleep};
    use avradc_core::{ChannelSelection, Converter, Error, Scale};
    use proptest::prelude::*;

    const MUX_MASK: u8 = 0x0F;

    #[test]
    fn test_reference_table() {
        let adc = SimulatedAdc::<Attiny85>::new();
        let mut conv = Converter::<Attiny85, _>::new(&adc);
        conv.set_channel(3).unwrap();

        let table = [
            (Reference::InternalAVcc, 0b0000_0000),
            (Reference::External, 0b0100_0000),
            (Reference::Internal1100mV, 0b1000_0000),
            (Reference::Internal2560mV, 0b1001_0000),
        ];
        for (reference, bits) in table {
            conv.set_reference(reference).unwrap();
            assert_eq!(adc.admux() & Attiny85::REFS_MASK, bits, "{:?}", reference);
            assert_eq!(adc.admux() & MUX_MASK, 3);
        }
    }

    #[test]
    fn test_supported_pairs() {
        let adc = SimulatedAdc::<Attiny85>::new();
        let mut conv = Converter::<Attiny85, _>::new(&adc);

        let pairs = [
            ((0, 1), 0b1010),
            ((2, 3), 0b0110),
            ((0, 0), 0b1000),
            ((2, 2), 0b0100),
        ];
        for ((p, n), bits) in pairs {
            conv.set_gain(Gain::X1);
            conv.set_differential(DifferentialPair::new(p, n)).unwrap();
            assert_eq!(adc.admux() & MUX_MASK, bits);

            conv.set_gain(Gain::X20);
            assert_eq!(adc.admux() & MUX_MASK, bits | 1);
        }
    }

    #[test]
    fn test_unsupported_pairs_rejected() {
        let adc = SimulatedAdc::<Attiny85>::new();
        let mut conv = Converter::<Attiny85, _>::new(&adc);
        conv.set_differential(DifferentialPair::new(0, 1)).unwrap();

        for (p, n) in [(0, 2), (0, 3), (2, 0), (2, 1), (1, 0), (3, 2)] {
            assert_eq!(
                conv.set_differential(DifferentialPair::new(p, n)),
                Err(Error::UnsupportedPair),
                "ADC{}/ADC{}",
                p,
                n
            );
        }
        assert_eq!(adc.admux() & MUX_MASK, 0b1010);
        assert_eq!(
            conv.selection(),
            Some(ChannelSelection::Differential(DifferentialPair::new(0, 1)))
        );
    }

    #[test]
    fn test_differential_conversion_with_sleep() {
        let adc = SimulatedAdc::<Attiny85>::new();
        // ADC0-ADC1 at 20x gain
        adc.set_input(0b1011, 0x155);
        let mut conv = Converter::<Attiny85, _>::new(&adc);
        conv.set_reference(Reference::Internal1100mV).unwrap();
        conv.set_gain(Gain::X20);
        conv.set_differential(DifferentialPair::new(0, 1)).unwrap();
        conv.set_scale(Scale::HalfScale);
        conv.enable();

        let mut sleep = SimulatedSleep::new(&adc);
        let sample = conv.read_with_sleep(&mut sleep);
        assert_eq!(sample.value(), 0x155 >> 2);
        assert_eq!(adc.interrupts_serviced(), 1);
    }

    #[test]
    fn test_pin_mapping() {
        assert_eq!(Attiny85::pin(0), Some(PortPin::new('B', 5)));
        assert_eq!(Attiny85::pin(1), Some(PortPin::new('B', 2)));
        assert_eq!(Attiny85::pin(4), None);
        assert_eq!(Attiny85::channel_for_pin(PortPin::new('B', 4)), Some(2));
        assert_eq!(Attiny85::channel_for_pin(PortPin::new('B', 0)), None);
    }

    #[test]
    fn test_sleep_register_layout() {
        assert_eq!(Attiny85::SLEEP_MODE_ADC & !Attiny85::SLEEP_MODE_MASK, 0);
        assert_eq!(Attiny85::SLEEP_ENABLE & Attiny85::SLEEP_MODE_MASK, 0);

        // MCUCR also holds the external interrupt sense bits (ISC01:00)
        assert_eq!(Attiny85::arm_sleep_bits(0b0001_0011), 0b0010_1011);
        assert_eq!(Attiny85::disarm_sleep_bits(0b0010_1011), 0b0000_1011);
    }

    static PAIRS: [(u8, u8); 4] = [(0, 1), (2, 3), (0, 0), (2, 2)];

    fn arb_selection() -> impl Strategy<Value = ChannelSelection> {
        prop_oneof![
            (0u8..4).prop_map(ChannelSelection::SingleEnded),
            prop::sample::select(&PAIRS[..]).prop_map(|(p, n)| {
                ChannelSelection::Differential(DifferentialPair::new(p, n))
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_selection_leaves_no_residue(
            first in arb_selection(),
            second in arb_selection(),
            x20 in any::<bool>(),
        ) {
            let gain = if x20 { Gain::X20 } else { Gain::X1 };

            let adc = SimulatedAdc::<Attiny85>::new();
            let mut conv = Converter::<Attiny85, _>::new(&adc);
            conv.set_gain(gain);
            conv.set_selection(first).unwrap();
            conv.set_selection(second).unwrap();

            let fresh = SimulatedAdc::<Attiny85>::new();
            let mut only = Converter::<Attiny85, _>::new(&fresh);
            only.set_gain(gain);
            only.set_selection(second).unwrap();

            prop_assert_eq!(adc.admux(), fresh.admux());
        }
    }
}
