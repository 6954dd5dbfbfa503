//! Conversion state machine
//!
//! A single conversion moves Idle → InProgress → Complete → Idle. Only the
//! converter drives these transitions; the hardware event is observed by
//! polling the start-conversion bit.

/// Where the converter is in its conversion cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionStatus {
    /// No conversion pending; configuration may change
    #[default]
    Idle,
    /// Conversion started, hardware still sampling
    InProgress,
    /// Result registers hold a fresh, unread sample
    Complete,
}

/// Events driving [`ConversionStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionEvent {
    /// Start-conversion bit written
    Trigger,
    /// Start-conversion bit observed clear
    HardwareDone,
    /// Result registers read
    SampleRead,
    /// ADC switched off (aborts a running conversion)
    PowerOff,
}

impl ConversionStatus {
    /// Check if a conversion is running
    pub fn is_busy(&self) -> bool {
        matches!(self, ConversionStatus::InProgress)
    }

    /// Process an event and return the next status
    pub fn transition(self, event: ConversionEvent) -> Self {
        use ConversionEvent::*;
        use ConversionStatus::*;

        match (self, event) {
            // A new trigger discards an unread result
            (Idle, Trigger) | (Complete, Trigger) => InProgress,

            (InProgress, HardwareDone) => Complete,

            (Complete, SampleRead) => Idle,

            (_, PowerOff) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
