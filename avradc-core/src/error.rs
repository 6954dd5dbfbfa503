//! Converter errors
//!
//! Only configuration requests the selected chip cannot express are
//! reported at runtime. Timing preconditions (reconfiguring or reading
//! mid-conversion) are debug assertions, not errors.

use core::fmt;

/// Errors reported by [`crate::Converter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Single-ended channel index beyond the chip's channel count
    InvalidChannel,
    /// Differential pair not present in the chip's mux table
    UnsupportedPair,
    /// Chip has no differential inputs at all
    DifferentialUnsupported,
    /// Reference source not available on this chip
    UnsupportedReference,
    /// Caller-supplied deadline passed before the conversion completed
    Timeout,
    /// Result requested with no conversion started since the last read
    NoConversion,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidChannel => write!(f, "channel index out of range"),
            Error::UnsupportedPair => write!(f, "differential pair not supported"),
            Error::DifferentialUnsupported => write!(f, "no differential inputs on this device"),
            Error::UnsupportedReference => write!(f, "reference not available on this device"),
            Error::Timeout => write!(f, "conversion did not complete before the deadline"),
            Error::NoConversion => write!(f, "no conversion pending"),
        }
    }
}
