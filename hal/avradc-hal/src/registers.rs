//! ADC register file abstraction
//!
//! The converter is driven entirely through four byte-wide registers.
//! Implementations map each [`Register`] to the chip's I/O address (or to
//! a simulated cell) and perform the actual access.

/// ADC registers addressed by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Multiplexer selection: reference, left-adjust, channel bits
    Admux = 0,
    /// Control and status: enable, start, interrupt, prescaler
    Adcsra = 1,
    /// Result high byte
    Adch = 2,
    /// Result low byte
    Adcl = 3,
}

impl Register {
    /// All registers, in index order
    pub const ALL: [Register; 4] = [
        Register::Admux,
        Register::Adcsra,
        Register::Adch,
        Register::Adcl,
    ];

    /// Get the register as an index (0..4)
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Byte-wide access to the ADC register file
///
/// Reads take `&mut self` because reading the result registers has
/// side effects on real hardware (ADCL locks the pair until ADCH is read).
pub trait AdcRegisters {
    /// Read a register
    fn read(&mut self, reg: Register) -> u8;

    /// Write a register
    fn write(&mut self, reg: Register, value: u8);

    /// Read-modify-write a register
    fn modify<F>(&mut self, reg: Register, f: F)
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Set the bits in `mask`, leaving the rest untouched
    fn set_bits(&mut self, reg: Register, mask: u8) {
        self.modify(reg, |v| v | mask);
    }

    /// Clear the bits in `mask`, leaving the rest untouched
    fn clear_bits(&mut self, reg: Register, mask: u8) {
        self.modify(reg, |v| v & !mask);
    }

    /// Replace the field selected by `mask` with `bits`
    ///
    /// The field is cleared before the new value is ORed in, so no bit
    /// of a previous value survives.
    fn write_field(&mut self, reg: Register, mask: u8, bits: u8) {
        self.modify(reg, |v| (v & !mask) | (bits & mask));
    }

    /// Check whether any bit in `mask` is set
    fn is_set(&mut self, reg: Register, mask: u8) -> bool {
        self.read(reg) & mask != 0
    }
}

impl<T: AdcRegisters> AdcRegisters for &mut T {
    fn read(&mut self, reg: Register) -> u8 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: Register, value: u8) {
        (**self).write(reg, value)
    }
}
