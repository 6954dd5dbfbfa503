//! ATmega328P ADC
//!
//! Eight single-ended inputs:
//! - ADC0-ADC5: PC0-PC5
//! - ADC6, ADC7: dedicated analog pins (TQFP/QFN packages only)
//!
//! No differential inputs. REFS1:0 = `10` is reserved, so there is no
//! 2.56 V reference.

use avradc_core::device::bit;
use avradc_core::{AdcDevice, Reference};

use crate::chip::{AvrChip, PortPin};

/// ATmega328P (and ATmega48/88/168 family) ADC layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Atmega328p;

impl AdcDevice for Atmega328p {
    const NAME: &'static str = "ATmega328P";
    const CHANNEL_COUNT: u8 = 8;

    fn reference_bits(reference: Reference) -> Option<u8> {
        match reference {
            Reference::External => Some(0),
            Reference::InternalAVcc => Some(bit(6)),
            Reference::Internal1100mV => Some(bit(7) | bit(6)),
            Reference::Internal2560mV => None,
        }
    }
}

impl AvrChip for Atmega328p {
    // SMCR: SM2:0 in bits 3:1, SE in bit 0
    const SLEEP_ENABLE: u8 = bit(0);
    const SLEEP_MODE_MASK: u8 = 0b0000_1110;
    const SLEEP_MODE_ADC: u8 = 0b0000_0010;

    fn pin(channel: u8) -> Option<PortPin> {
        match channel {
            0..=5 => Some(PortPin::new('C', channel)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avradc_core::sim::SimulatedAdc;
    use avradc_core::{AdcConfig, Converter, Error, Prescaler, Scale};

    #[test]
    fn test_reference_table() {
        let adc = SimulatedAdc::<Atmega328p>::new();
        let mut conv = Converter::<Atmega328p, _>::new(&adc);

        conv.set_reference(Reference::External).unwrap();
        assert_eq!(adc.admux() & 0xC0, 0x00);
        conv.set_reference(Reference::InternalAVcc).unwrap();
        assert_eq!(adc.admux() & 0xC0, 0x40);
        conv.set_reference(Reference::Internal1100mV).unwrap();
        assert_eq!(adc.admux() & 0xC0, 0xC0);

        // Reserved setting is never written
        assert_eq!(
            conv.set_reference(Reference::Internal2560mV),
            Err(Error::UnsupportedReference)
        );
        assert_eq!(adc.admux() & 0xC0, 0xC0);
    }

    #[test]
    fn test_channels() {
        let adc = SimulatedAdc::<Atmega328p>::new();
        let mut conv = Converter::<Atmega328p, _>::new(&adc);

        for ch in 0..8 {
            conv.set_channel(ch).unwrap();
            assert_eq!(adc.admux() & 0x0F, ch);
        }
        assert_eq!(conv.set_channel(8), Err(Error::InvalidChannel));
    }

    #[test]
    fn test_pin_mapping() {
        assert_eq!(Atmega328p::pin(0), Some(PortPin::new('C', 0)));
        assert_eq!(Atmega328p::pin(5), Some(PortPin::new('C', 5)));
        assert_eq!(Atmega328p::pin(6), None);
        assert_eq!(Atmega328p::channel_for_pin(PortPin::new('C', 3)), Some(3));
        assert_eq!(Atmega328p::channel_for_pin(PortPin::new('B', 3)), None);
    }

    #[test]
    fn test_sleep_bits() {
        // Power-down (SM = 010) with SE clear becomes ADC noise reduction
        assert_eq!(Atmega328p::arm_sleep_bits(0b0000_0100), 0b0000_0011);
        assert_eq!(Atmega328p::disarm_sleep_bits(0b0000_0011), 0b0000_0010);
        // Reserved upper bits are left alone
        assert_eq!(Atmega328p::arm_sleep_bits(0b1000_0000), 0b1000_0011);
    }

    #[test]
    fn test_arduino_style_read() {
        // 16 MHz Uno reading A0 against AVcc
        let adc = SimulatedAdc::<Atmega328p>::new();
        adc.set_input(0, 612);
        let mut conv = Converter::<Atmega328p, _>::new(&adc);
        conv.configure(&AdcConfig::for_cpu_frequency(16_000_000))
            .unwrap();
        conv.enable();

        assert_eq!(conv.prescaler(), Prescaler::Div16);
        let sample = conv.read_blocking();
        assert_eq!(sample.scale(), Scale::FullScale);
        assert_eq!(sample.value(), 612);
        assert_eq!(sample.to_millivolts(5000), 2988);
    }
}
