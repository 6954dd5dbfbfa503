//! ADC clock prescaler
//!
//! The ADC clock is the CPU clock divided by the prescaler. A normal
//! conversion takes 13 ADC clocks (25 for the first one after enabling).
//! Slower clocks give more accurate results; the datasheet asks for
//! 50-200 kHz for full 10-bit resolution.

/// ADC clock divider
///
/// Divide-by-1 does not exist on these parts: ADPS `000` divides by two
/// just like `001`, so the seven dividers below cover the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

/// ADC clocks per normal conversion
pub const CYCLES_PER_CONVERSION: u32 = 13;

impl Prescaler {
    /// All dividers, slowest last
    pub const ALL: [Prescaler; 7] = [
        Prescaler::Div2,
        Prescaler::Div4,
        Prescaler::Div8,
        Prescaler::Div16,
        Prescaler::Div32,
        Prescaler::Div64,
        Prescaler::Div128,
    ];

    /// ADPS2:0 field value
    pub const fn bits(self) -> u8 {
        match self {
            Prescaler::Div2 => 0b001,
            Prescaler::Div4 => 0b010,
            Prescaler::Div8 => 0b011,
            Prescaler::Div16 => 0b100,
            Prescaler::Div32 => 0b101,
            Prescaler::Div64 => 0b110,
            Prescaler::Div128 => 0b111,
        }
    }

    /// Decode an ADPS2:0 field value (`000` reads back as ÷2)
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 | 0b001 => Prescaler::Div2,
            0b010 => Prescaler::Div4,
            0b011 => Prescaler::Div8,
            0b100 => Prescaler::Div16,
            0b101 => Prescaler::Div32,
            0b110 => Prescaler::Div64,
            _ => Prescaler::Div128,
        }
    }

    /// Division factor
    pub const fn divider(self) -> u32 {
        1 << self.bits()
    }

    /// Default divider for a CPU clock
    ///
    /// Favours speed over the last bit of accuracy: 16 MHz parts get a
    /// 1 MHz ADC clock, which still gives stable 8-bit readings.
    pub const fn for_cpu_frequency(f_cpu_hz: u32) -> Self {
        if f_cpu_hz > 8_000_000 {
            Prescaler::Div16
        } else if f_cpu_hz > 1_000_000 {
            Prescaler::Div8
        } else {
            Prescaler::Div2
        }
    }

    /// Resulting ADC clock in Hz
    pub const fn adc_clock_hz(self, f_cpu_hz: u32) -> u32 {
        f_cpu_hz / self.divider()
    }

    /// Duration of a normal conversion in microseconds, rounded up
    ///
    /// Returns `None` for a zero CPU clock.
    pub const fn conversion_time_us(self, f_cpu_hz: u32) -> Option<u32> {
        if f_cpu_hz == 0 {
            return None;
        }
        let cycles = CYCLES_PER_CONVERSION as u64 * self.divider() as u64 * 1_000_000;
        Some(cycles.div_ceil(f_cpu_hz as u64) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_distinct() {
        for (i, a) in Prescaler::ALL.iter().enumerate() {
            for b in &Prescaler::ALL[i + 1..] {
                assert_ne!(a.bits(), b.bits(), "{:?} vs {:?}", a, b);
            }
            assert_eq!(a.bits() & !0b111, 0);
        }
    }

    #[test]
    fn test_dividers() {
        let dividers: [u32; 7] = [2, 4, 8, 16, 32, 64, 128];
        for (p, d) in Prescaler::ALL.iter().zip(dividers) {
            assert_eq!(p.divider(), d);
            assert_eq!(Prescaler::from_bits(p.bits()), *p);
        }
        assert_eq!(Prescaler::from_bits(0), Prescaler::Div2);
    }

    #[test]
    fn test_default_for_cpu_frequency() {
        assert_eq!(Prescaler::for_cpu_frequency(16_000_000), Prescaler::Div16);
        assert_eq!(Prescaler::for_cpu_frequency(8_000_000), Prescaler::Div8);
        assert_eq!(Prescaler::for_cpu_frequency(1_000_000), Prescaler::Div2);
        assert_eq!(Prescaler::for_cpu_frequency(128_000), Prescaler::Div2);
    }

    #[test]
    fn test_timing() {
        // 16 MHz / 128 = 125 kHz, 13 cycles = 104 us
        assert_eq!(Prescaler::Div128.adc_clock_hz(16_000_000), 125_000);
        assert_eq!(Prescaler::Div128.conversion_time_us(16_000_000), Some(104));

        // 16 MHz / 16 = 1 MHz, 13 cycles = 13 us
        assert_eq!(Prescaler::Div16.conversion_time_us(16_000_000), Some(13));

        // Rounds up: 8 MHz / 2 = 4 MHz, 13 cycles = 3.25 us
        assert_eq!(Prescaler::Div2.conversion_time_us(8_000_000), Some(4));
    }

    #[test]
    fn test_timing_without_clock() {
        assert_eq!(Prescaler::Div128.adc_clock_hz(0), 0);
        for p in Prescaler::ALL {
            assert_eq!(p.conversion_time_us(0), None);
        }
    }
}
