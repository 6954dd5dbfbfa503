//! Conversion results

use crate::config::Scale;

/// A conversion result together with the scale it was read under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    raw: u16,
    scale: Scale,
}

impl Sample {
    /// Create a sample, clamping `raw` to the scale's range
    pub const fn new(raw: u16, scale: Scale) -> Self {
        let raw = if raw > scale.max() { scale.max() } else { raw };
        Self { raw, scale }
    }

    /// Raw reading (0-255 half scale, 0-1023 full scale)
    pub const fn value(&self) -> u16 {
        self.raw
    }

    /// Scale the sample was read under
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Largest possible reading at this scale
    pub const fn max(&self) -> u16 {
        self.scale.max()
    }

    /// Convert to millivolts for a given reference voltage
    ///
    /// Uses `V = raw * Vref / range`, the datasheet transfer function.
    pub const fn to_millivolts(&self, vref_mv: u16) -> u16 {
        (self.raw as u32 * vref_mv as u32 / self.scale.range() as u32) as u16
    }
}

impl From<Sample> for u16 {
    fn from(sample: Sample) -> u16 {
        sample.raw
    }
}
