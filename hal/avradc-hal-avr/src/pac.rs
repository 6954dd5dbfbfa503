//! Register access and sleep control through the `avr-device` peripherals
//!
//! [`PacAdc`] wraps the chip's `ADC` peripheral and [`PacSleep`] its `CPU`
//! peripheral. Both take the peripheral by value, so ownership is checked
//! by `avr_device::<chip>::Peripherals::take()` instead of by the caller.

use avradc_hal::{AdcRegisters, Register, SleepControl};

use crate::chip::AvrChip;

/// ADC register file backed by an `avr-device` ADC peripheral
///
/// The PAC exposes the result as one 16-bit data register. Reading
/// [`Register::Adcl`] reads it and latches the high byte for the following
/// [`Register::Adch`] read, so both halves come from the same conversion.
/// Reading `Adch` on its own reads the data register again.
pub struct PacAdc<P> {
    adc: P,
    latched_high: Option<u8>,
}

impl<P> PacAdc<P> {
    /// Take ownership of the ADC peripheral
    pub fn new(adc: P) -> Self {
        Self {
            adc,
            latched_high: None,
        }
    }

    /// Release the ADC peripheral
    pub fn free(self) -> P {
        self.adc
    }
}

/// Interrupt and sleep control backed by an `avr-device` CPU peripheral
pub struct PacSleep<P> {
    cpu: P,
}

impl<P> PacSleep<P> {
    /// Take ownership of the CPU peripheral (sleep control register)
    pub fn new(cpu: P) -> Self {
        Self { cpu }
    }

    /// Release the CPU peripheral
    pub fn free(self) -> P {
        self.cpu
    }
}

macro_rules! impl_pac {
    ($chip:ty, $pac:ident, $sleep_reg:ident) => {
        impl AdcRegisters for PacAdc<avr_device::$pac::ADC> {
            fn read(&mut self, reg: Register) -> u8 {
                match reg {
                    Register::Admux => self.adc.admux.read().bits(),
                    Register::Adcsra => self.adc.adcsra.read().bits(),
                    Register::Adcl => {
                        let data = self.adc.adc.read().bits();
                        self.latched_high = Some((data >> 8) as u8);
                        data as u8
                    }
                    Register::Adch => match self.latched_high.take() {
                        Some(high) => high,
                        None => (self.adc.adc.read().bits() >> 8) as u8,
                    },
                }
            }

            fn write(&mut self, reg: Register, value: u8) {
                self.latched_high = None;
                match reg {
                    // SAFETY: the driver only writes field values from the
                    // chip's own descriptor tables
                    Register::Admux => self.adc.admux.write(|w| unsafe { w.bits(value) }),
                    Register::Adcsra => self.adc.adcsra.write(|w| unsafe { w.bits(value) }),
                    // Result registers are read-only
                    Register::Adch | Register::Adcl => {}
                }
            }
        }

        impl SleepControl for PacSleep<avr_device::$pac::CPU> {
            fn disable_interrupts(&mut self) {
                avr_device::interrupt::disable();
            }

            fn enable_interrupts(&mut self) {
                // SAFETY: the converter never calls this inside a critical section
                unsafe { avr_device::interrupt::enable() }
            }

            fn arm_adc_noise_reduction(&mut self) {
                self.cpu.$sleep_reg.modify(|r, w| {
                    // SAFETY: only the sleep mode and sleep enable bits change
                    unsafe { w.bits(<$chip as AvrChip>::arm_sleep_bits(r.bits())) }
                });
            }

            fn sleep(&mut self) {
                avr_device::asm::sleep();
            }

            fn enable_interrupts_and_sleep(&mut self) {
                // SAFETY: the instruction after `sei` runs before any pending
                // interrupt, so the completion interrupt can only be taken
                // once the core is asleep
                unsafe { core::arch::asm!("sei", "sleep") }
            }

            fn disarm(&mut self) {
                self.cpu.$sleep_reg.modify(|r, w| {
                    // SAFETY: only the sleep enable bit changes
                    unsafe { w.bits(<$chip as AvrChip>::disarm_sleep_bits(r.bits())) }
                });
            }
        }
    };
}

#[cfg(feature = "atmega328p")]
impl_pac!(crate::Atmega328p, atmega328p, smcr);

#[cfg(feature = "attiny85")]
impl_pac!(crate::Attiny85, attiny85, mcucr);
