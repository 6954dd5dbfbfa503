//! Simulated ADC for host-side testing
//!
//! [`SimulatedAdc`] models the register-level behaviour the driver relies
//! on: ADIF is write-one-to-clear, ADSC cannot be cleared by software and
//! only starts a conversion while ADEN is set, clearing ADEN aborts a
//! running conversion, and ADLAR changes the result layout immediately.
//! A conversion finishes after a configurable number of ADCSRA reads.
//!
//! [`SimulatedSleep`] records the interrupt/sleep call sequence and plays
//! the part of the completion interrupt when the core sleeps.

use core::cell::Cell;
use core::marker::PhantomData;

use avradc_hal::{AdcRegisters, Register, SleepControl};
use heapless::Vec;

use crate::device::{bit, AdcDevice};

/// Simulated ADC register file
///
/// Uses interior mutability so a shared reference can serve as the
/// register handle while a [`SimulatedSleep`] holds another one.
pub struct SimulatedAdc<D> {
    admux: Cell<u8>,
    adcsra: Cell<u8>,
    /// Latched 10-bit result of the last conversion
    result: Cell<u16>,
    /// Analog value presented for each mux setting
    inputs: [Cell<u16>; 16],
    latency: Cell<u8>,
    remaining: Cell<u8>,
    conversions: Cell<u32>,
    interrupts_serviced: Cell<u32>,
    _device: PhantomData<D>,
}

impl<D: AdcDevice> Default for SimulatedAdc<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: AdcDevice> SimulatedAdc<D> {
    /// Create a simulated ADC with all registers at their reset value (0)
    pub fn new() -> Self {
        Self {
            admux: Cell::new(0),
            adcsra: Cell::new(0),
            result: Cell::new(0),
            inputs: Default::default(),
            latency: Cell::new(1),
            remaining: Cell::new(0),
            conversions: Cell::new(0),
            interrupts_serviced: Cell::new(0),
            _device: PhantomData,
        }
    }

    /// Set the 10-bit value converted when the mux field equals `mux`
    ///
    /// For single-ended inputs `mux` is the channel index.
    pub fn set_input(&self, mux: u8, raw: u16) {
        self.inputs[(mux & 0x0F) as usize].set(raw & 0x3FF);
    }

    /// Number of ADCSRA reads that still see ADSC set after a start
    pub fn set_latency(&self, reads: u8) {
        self.latency.set(reads);
    }

    /// Current ADMUX value, without side effects
    pub fn admux(&self) -> u8 {
        self.admux.get()
    }

    /// Current ADCSRA value, without advancing a running conversion
    pub fn adcsra(&self) -> u8 {
        self.adcsra.get()
    }

    /// Check if a conversion is running
    pub fn is_converting(&self) -> bool {
        self.adcsra.get() & bit(D::ADSC) != 0
    }

    /// Number of conversions started so far
    pub fn conversions(&self) -> u32 {
        self.conversions.get()
    }

    /// Number of completion interrupts delivered through [`SimulatedSleep`]
    pub fn interrupts_serviced(&self) -> u32 {
        self.interrupts_serviced.get()
    }

    /// Finish the running conversion now
    ///
    /// Latches the input selected by the current mux field, clears ADSC
    /// and sets ADIF.
    pub fn finish_conversion(&self) {
        if !self.is_converting() {
            return;
        }
        let mux = self.admux.get() & D::MUX_MASK;
        self.result.set(self.inputs[(mux & 0x0F) as usize].get());
        let csr = self.adcsra.get();
        self.adcsra.set((csr & !bit(D::ADSC)) | bit(D::ADIF));
    }

    /// Deliver the completion interrupt, as the core would on wake-up
    ///
    /// Returns false if nothing could have woken the core.
    fn wake_on_completion(&self) -> bool {
        let csr = self.adcsra.get();
        if !self.is_converting() || csr & bit(D::ADIE) == 0 {
            return false;
        }
        self.finish_conversion();
        // Executing the vector clears ADIF in hardware
        self.adcsra.set(self.adcsra.get() & !bit(D::ADIF));
        self.interrupts_serviced.set(self.interrupts_serviced.get() + 1);
        true
    }

    fn advance(&self) {
        if !self.is_converting() {
            return;
        }
        match self.remaining.get() {
            0 => self.finish_conversion(),
            n => self.remaining.set(n - 1),
        }
    }

    fn result_high(&self) -> u8 {
        let raw = self.result.get();
        if self.admux.get() & bit(D::ADLAR) != 0 {
            (raw >> 2) as u8
        } else {
            (raw >> 8) as u8
        }
    }

    fn result_low(&self) -> u8 {
        let raw = self.result.get();
        if self.admux.get() & bit(D::ADLAR) != 0 {
            ((raw & 0b11) << 6) as u8
        } else {
            raw as u8
        }
    }

    fn read_register(&self, reg: Register) -> u8 {
        match reg {
            Register::Admux => self.admux.get(),
            Register::Adcsra => {
                self.advance();
                self.adcsra.get()
            }
            Register::Adch => self.result_high(),
            Register::Adcl => self.result_low(),
        }
    }

    fn write_register(&self, reg: Register, value: u8) {
        match reg {
            Register::Admux => self.admux.set(value),
            Register::Adcsra => self.write_control(value),
            // Result registers are read-only
            Register::Adch | Register::Adcl => {}
        }
    }

    fn write_control(&self, value: u8) {
        let old = self.adcsra.get();
        let adif = bit(D::ADIF);
        let adsc = bit(D::ADSC);
        let aden = bit(D::ADEN);

        // ADIF: writing one clears, writing zero keeps
        let mut new = value & !adif;
        if value & adif == 0 {
            new |= old & adif;
        }

        if new & aden == 0 {
            // Switching off aborts any conversion
            new &= !adsc;
        } else if old & adsc != 0 {
            // Software cannot stop a running conversion
            new |= adsc;
        } else if value & adsc != 0 {
            self.remaining.set(self.latency.get());
            self.conversions.set(self.conversions.get() + 1);
        }

        self.adcsra.set(new);
    }
}

impl<D: AdcDevice> AdcRegisters for SimulatedAdc<D> {
    fn read(&mut self, reg: Register) -> u8 {
        self.read_register(reg)
    }

    fn write(&mut self, reg: Register, value: u8) {
        self.write_register(reg, value)
    }
}

impl<D: AdcDevice> AdcRegisters for &SimulatedAdc<D> {
    fn read(&mut self, reg: Register) -> u8 {
        self.read_register(reg)
    }

    fn write(&mut self, reg: Register, value: u8) {
        self.write_register(reg, value)
    }
}

/// Calls recorded by [`SimulatedSleep`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepEvent {
    DisableInterrupts,
    EnableInterrupts,
    Arm,
    Sleep,
    /// Interrupts unmasked and sleep entered as one step
    EnableInterruptsAndSleep,
    Disarm,
}

/// Maximum number of recorded sleep events
pub const MAX_SLEEP_EVENTS: usize = 32;

/// Simulated interrupt and sleep controller
pub struct SimulatedSleep<'a, D> {
    adc: &'a SimulatedAdc<D>,
    interrupts_enabled: bool,
    armed: bool,
    spurious_wakes: u8,
    events: Vec<SleepEvent, MAX_SLEEP_EVENTS>,
}

impl<'a, D: AdcDevice> SimulatedSleep<'a, D> {
    /// Create a sleep controller that wakes through `adc`'s completion interrupt
    pub fn new(adc: &'a SimulatedAdc<D>) -> Self {
        Self {
            adc,
            interrupts_enabled: true,
            armed: false,
            spurious_wakes: 0,
            events: Vec::new(),
        }
    }

    /// Make the next `count` sleeps return early, as if another interrupt fired
    pub fn with_spurious_wakes(mut self, count: u8) -> Self {
        self.spurious_wakes = count;
        self
    }

    /// Recorded call sequence
    pub fn events(&self) -> &[SleepEvent] {
        &self.events
    }

    /// Check if global interrupts are currently enabled
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    /// Check if the sleep enable bit is set
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    fn record(&mut self, event: SleepEvent) {
        // Overflow only loses history, never behaviour
        let _ = self.events.push(event);
    }

    fn enter_sleep(&mut self) {
        if !self.armed {
            // SLEEP with SE clear is a no-op
            return;
        }
        assert!(
            self.interrupts_enabled,
            "sleeping with interrupts masked never wakes"
        );
        if self.spurious_wakes > 0 {
            self.spurious_wakes -= 1;
            return;
        }
        assert!(
            self.adc.wake_on_completion(),
            "sleeping without a pending wake source"
        );
    }
}

impl<D: AdcDevice> SleepControl for SimulatedSleep<'_, D> {
    fn disable_interrupts(&mut self) {
        self.record(SleepEvent::DisableInterrupts);
        self.interrupts_enabled = false;
    }

    fn enable_interrupts(&mut self) {
        self.record(SleepEvent::EnableInterrupts);
        self.interrupts_enabled = true;
    }

    fn arm_adc_noise_reduction(&mut self) {
        self.record(SleepEvent::Arm);
        self.armed = true;
    }

    fn sleep(&mut self) {
        self.record(SleepEvent::Sleep);
        self.enter_sleep();
    }

    fn enable_interrupts_and_sleep(&mut self) {
        self.record(SleepEvent::EnableInterruptsAndSleep);
        self.interrupts_enabled = true;
        self.enter_sleep();
    }

    fn disarm(&mut self) {
        self.record(SleepEvent::Disarm);
        self.armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestChip;

    impl AdcDevice for TestChip {
        const NAME: &'static str = "test";
        const CHANNEL_COUNT: u8 = 8;
    }

    const ADEN: u8 = 1 << 7;
    const ADSC: u8 = 1 << 6;
    const ADIF: u8 = 1 << 4;

    #[test]
    fn test_adif_write_one_to_clear() {
        let mut adc = SimulatedAdc::<TestChip>::new();
        adc.set_latency(0);
        adc.write(Register::Adcsra, ADEN | ADSC);
        assert_eq!(adc.read(Register::Adcsra) & ADIF, ADIF);

        // Writing zero keeps the flag
        adc.write(Register::Adcsra, ADEN);
        assert_eq!(adc.adcsra() & ADIF, ADIF);

        // Writing one clears it
        adc.write(Register::Adcsra, ADEN | ADIF);
        assert_eq!(adc.adcsra() & ADIF, 0);
    }

    #[test]
    fn test_start_requires_enable() {
        let mut adc = SimulatedAdc::<TestChip>::new();
        adc.write(Register::Adcsra, ADSC);
        assert!(!adc.is_converting());
        assert_eq!(adc.conversions(), 0);
    }

    #[test]
    fn test_latency_counts_reads() {
        let mut adc = SimulatedAdc::<TestChip>::new();
        adc.set_latency(2);
        adc.write(Register::Adcsra, ADEN | ADSC);

        assert!(adc.read(Register::Adcsra) & ADSC != 0);
        assert!(adc.read(Register::Adcsra) & ADSC != 0);
        assert!(adc.read(Register::Adcsra) & ADSC == 0);
    }

    #[test]
    fn test_disable_aborts_conversion() {
        let mut adc = SimulatedAdc::<TestChip>::new();
        adc.write(Register::Adcsra, ADEN | ADSC);
        assert!(adc.is_converting());

        adc.write(Register::Adcsra, 0);
        assert!(!adc.is_converting());
    }

    #[test]
    fn test_result_alignment_follows_adlar() {
        let mut adc = SimulatedAdc::<TestChip>::new();
        adc.set_latency(0);
        adc.set_input(3, 0x2B7);
        adc.write(Register::Admux, 3);
        adc.write(Register::Adcsra, ADEN | ADSC);
        adc.finish_conversion();

        assert_eq!(adc.read(Register::Adcl), 0xB7);
        assert_eq!(adc.read(Register::Adch), 0x02);

        // Left adjust: top eight bits in ADCH
        adc.write(Register::Admux, 3 | (1 << 5));
        assert_eq!(adc.read(Register::Adch), (0x2B7u16 >> 2) as u8);
        assert_eq!(adc.read(Register::Adcl), 0b1100_0000);
    }

    #[test]
    fn test_sleep_records_and_wakes() {
        let mut regs = SimulatedAdc::<TestChip>::new();
        regs.write(Register::Adcsra, ADEN | ADSC | (1 << 3));

        let adc = &regs;
        let mut sleep = SimulatedSleep::new(adc);
        sleep.arm_adc_noise_reduction();
        sleep.sleep();
        sleep.disarm();

        assert!(!adc.is_converting());
        assert_eq!(adc.interrupts_serviced(), 1);
        assert_eq!(
            sleep.events(),
            &[SleepEvent::Arm, SleepEvent::Sleep, SleepEvent::Disarm]
        );
    }

    #[test]
    fn test_enable_and_sleep_unmasks() {
        let mut regs = SimulatedAdc::<TestChip>::new();
        regs.write(Register::Adcsra, ADEN | ADSC | (1 << 3));

        let adc = &regs;
        let mut sleep = SimulatedSleep::new(adc);
        sleep.disable_interrupts();
        sleep.arm_adc_noise_reduction();
        sleep.enable_interrupts_and_sleep();

        assert!(sleep.interrupts_enabled());
        assert_eq!(adc.interrupts_serviced(), 1);
        assert_eq!(
            sleep.events(),
            &[
                SleepEvent::DisableInterrupts,
                SleepEvent::Arm,
                SleepEvent::EnableInterruptsAndSleep,
            ]
        );
    }

    #[test]
    #[should_panic(expected = "interrupts masked")]
    fn test_sleep_with_interrupts_masked_panics() {
        let adc = SimulatedAdc::<TestChip>::new();
        let mut sleep = SimulatedSleep::new(&adc);
        sleep.disable_interrupts();
        sleep.arm_adc_noise_reduction();
        sleep.sleep();
    }
}
