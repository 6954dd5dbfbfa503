//! Result scale (ADLAR)

/// Result representation
///
/// Must be chosen before a conversion starts. Changing it while a
/// conversion is in flight changes how the result registers are laid out
/// under the reader's feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scale {
    /// Left-adjusted result, only the top 8 bits are read (ADCH)
    HalfScale,
    /// Right-adjusted 10-bit result (ADCL + ADCH)
    #[default]
    FullScale,
}

impl Scale {
    /// Largest value a sample can take
    pub const fn max(self) -> u16 {
        match self {
            Scale::HalfScale => u8::MAX as u16,
            Scale::FullScale => 0x3FF,
        }
    }

    /// Number of distinct sample values
    pub const fn range(self) -> u16 {
        self.max() + 1
    }
}
