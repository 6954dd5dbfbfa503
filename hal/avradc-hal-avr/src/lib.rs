//! AVR-specific HAL for the avradc converter driver
//!
//! This crate provides chip-specific implementations:
//! - ADC layout descriptors ([`Atmega328p`], [`Attiny85`])
//! - Sleep register layout ([`AvrChip`])
//! - Analog input to port pin mapping
//! - Register access and sleep control over the `avr-device` peripherals
//!   (AVR targets only)
//!
//! # Features
//!
//! - `atmega328p` - Select the ATmega328P in `avr-device`
//! - `attiny85` - Select the ATtiny85 in `avr-device`
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! ```ignore
//! use avradc_core::{AdcConfig, Converter};
//! use avradc_hal_avr::{Atmega328p, PacAdc, PacSleep};
//!
//! let dp = avr_device::atmega328p::Peripherals::take().unwrap();
//! let mut adc = Converter::<Atmega328p, _>::new(PacAdc::new(dp.ADC));
//! adc.configure(&AdcConfig::for_cpu_frequency(16_000_000))?;
//! adc.enable();
//!
//! let mut sleep = PacSleep::new(dp.CPU);
//! let sample = adc.read_with_sleep(&mut sleep);
//! ```

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

pub mod atmega328p;
pub mod attiny85;
pub mod chip;

#[cfg(target_arch = "avr")]
pub mod pac;

pub use atmega328p::Atmega328p;
pub use attiny85::Attiny85;
pub use chip::{AvrChip, PortPin};

#[cfg(target_arch = "avr")]
pub use pac::{PacAdc, PacSleep};
