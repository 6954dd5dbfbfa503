//! Voltage reference selection

/// Voltage reference feeding the converter
///
/// The register encoding is chip specific, see
/// [`AdcDevice::reference_bits`](crate::AdcDevice::reference_bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reference {
    /// External voltage on the AREF pin
    External,
    /// Internal 1.1 V bandgap
    Internal1100mV,
    /// Analog supply (AVcc, or Vcc on parts without a separate AVcc)
    #[default]
    InternalAVcc,
    /// Internal 2.56 V reference
    Internal2560mV,
}

impl Reference {
    /// All reference sources
    pub const ALL: [Reference; 4] = [
        Reference::External,
        Reference::Internal1100mV,
        Reference::InternalAVcc,
        Reference::Internal2560mV,
    ];
}
