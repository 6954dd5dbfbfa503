//! Board-agnostic ADC driver for classic AVR microcontrollers
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - The [`AdcDevice`] trait describing a chip's ADC register layout
//! - Configuration value types (reference, channel, gain, prescaler, scale)
//! - The conversion state machine
//! - [`Converter`], which encodes configuration into register bits and
//!   drives a single conversion (busy-wait or sleep-during-conversion)
//! - A simulated register file for host tests (`sim` feature)
//!
//! Register access goes through [`avradc_hal::AdcRegisters`], so the same
//! driver runs against real memory-mapped registers or the simulator.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod converter;
pub mod device;
pub mod error;
pub mod sample;
pub mod state;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use config::{
    AdcConfig, ChannelSelection, DifferentialPair, Gain, Prescaler, Reference, Scale,
};
pub use converter::Converter;
pub use device::AdcDevice;
pub use error::Error;
pub use sample::Sample;
pub use state::{ConversionEvent, ConversionStatus};
