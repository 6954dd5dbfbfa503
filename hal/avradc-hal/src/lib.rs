//! avradc Hardware Abstraction Layer
//!
//! This crate defines the two hardware seams the converter driver needs:
//! access to the ADC register file and control over interrupts and sleep.
//! Chip crates implement them against real memory-mapped registers; the
//! core crate ships a simulated register file for host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application                            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  avradc-core (Converter, AdcDevice)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  avradc-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ avradc-hal-   │       │ SimulatedAdc  │
//! │     avr       │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`registers::AdcRegisters`] - Byte-wide ADC register access
//! - [`sleep::SleepControl`] - Interrupt masking and ADC noise reduction sleep

#![no_std]
#![deny(unsafe_code)]

pub mod registers;
pub mod sleep;

// Re-export key traits at crate root for convenience
pub use registers::{AdcRegisters, Register};
pub use sleep::SleepControl;
