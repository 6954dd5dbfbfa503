//! Conversion controller
//!
//! [`Converter`] owns the ADC register handle and is the only place that
//! touches it. Setters translate configuration values into register bits
//! with read-modify-write; the conversion methods drive
//! [`ConversionStatus`] through one conversion cycle.
//!
//! # Preconditions
//!
//! Configuration must not change while a conversion is in progress, and
//! the result must not be read before the conversion completes. The
//! hardware does not guard either case; both are checked with
//! `debug_assert!` only.
//!
//! [`Converter::trigger_blocking`] spins until the hardware clears the
//! start bit and has no timeout. A converter that never completes hangs
//! the caller. Use [`Converter::start`] with [`Converter::is_complete`] or
//! [`Converter::read_with_timeout`] when a bounded wait is needed.

use core::marker::PhantomData;

use avradc_hal::{AdcRegisters, Register, SleepControl};
use embedded_hal::delay::DelayNs;

use crate::config::{AdcConfig, ChannelSelection, DifferentialPair, Gain, Prescaler, Reference, Scale};
use crate::device::{bit, AdcDevice};
use crate::error::Error;
use crate::sample::Sample;
use crate::state::{ConversionEvent, ConversionStatus};

/// Polling step for [`Converter::read_with_timeout`], in microseconds
const POLL_INTERVAL_US: u32 = 1;

/// ADC driver for chip `D` over register handle `R`
pub struct Converter<D, R> {
    regs: R,
    /// Last successful input selection, needed to re-encode gain changes
    selection: Option<ChannelSelection>,
    gain: Gain,
    status: ConversionStatus,
    _device: PhantomData<D>,
}

impl<D: AdcDevice, R: AdcRegisters> Converter<D, R> {
    /// Take ownership of the ADC registers
    ///
    /// Registers are left as found; call [`configure`](Self::configure)
    /// and [`enable`](Self::enable) before converting.
    pub fn new(regs: R) -> Self {
        Self {
            regs,
            selection: None,
            gain: Gain::X1,
            status: ConversionStatus::Idle,
            _device: PhantomData,
        }
    }

    /// Release the register handle
    pub fn free(self) -> R {
        self.regs
    }

    /// Current conversion status, as of the last poll
    pub fn status(&self) -> ConversionStatus {
        self.status
    }

    /// Input selected by the last successful selection call
    pub fn selection(&self) -> Option<ChannelSelection> {
        self.selection
    }

    /// Stored differential gain
    pub fn gain(&self) -> Gain {
        self.gain
    }

    // ---- Reference / power ----

    /// Power up the converter
    ///
    /// Also clears a stale conversion-complete flag (ADIF is cleared by
    /// writing one) so it cannot be mistaken for a fresh completion.
    pub fn enable(&mut self) {
        self.regs
            .set_bits(Register::Adcsra, bit(D::ADEN) | bit(D::ADIF));
        #[cfg(feature = "defmt")]
        defmt::debug!("{}: adc enabled", D::NAME);
    }

    /// Power down the converter
    ///
    /// A running conversion is aborted by the hardware.
    pub fn disable(&mut self) {
        self.regs.clear_bits(Register::Adcsra, bit(D::ADEN));
        self.status = self.status.transition(ConversionEvent::PowerOff);
        #[cfg(feature = "defmt")]
        defmt::debug!("{}: adc disabled", D::NAME);
    }

    /// Check if the converter is powered
    pub fn is_enabled(&mut self) -> bool {
        self.regs.is_set(Register::Adcsra, bit(D::ADEN))
    }

    /// Select the voltage reference
    pub fn set_reference(&mut self, reference: Reference) -> Result<(), Error> {
        self.debug_assert_idle();
        let bits = D::reference_bits(reference).ok_or(Error::UnsupportedReference)?;
        self.regs.write_field(Register::Admux, D::REFS_MASK, bits);
        #[cfg(feature = "defmt")]
        defmt::trace!("{}: reference {}", D::NAME, reference);
        Ok(())
    }

    // ---- Channel / gain ----

    /// Select a single-ended input channel
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Error> {
        self.set_selection(ChannelSelection::SingleEnded(channel))
    }

    /// Select a differential input pair
    pub fn set_differential(&mut self, pair: DifferentialPair) -> Result<(), Error> {
        self.set_selection(ChannelSelection::Differential(pair))
    }

    /// Select the input for the next conversion
    ///
    /// The mux field is cleared before the new pattern is written, so no
    /// bit of the previous selection survives. On error the registers are
    /// left untouched.
    pub fn set_selection(&mut self, selection: ChannelSelection) -> Result<(), Error> {
        self.debug_assert_idle();
        let bits = Self::mux_bits(selection, self.gain)?;
        self.regs.write_field(Register::Admux, D::MUX_MASK, bits);
        self.selection = Some(selection);
        #[cfg(feature = "defmt")]
        defmt::trace!("{}: selection {} (mux {=u8:#b})", D::NAME, selection, bits);
        Ok(())
    }

    /// Set the differential gain
    ///
    /// Applied immediately when a differential pair is selected. With a
    /// single-ended input the gain is stored for later differential
    /// selections and otherwise ignored.
    pub fn set_gain(&mut self, gain: Gain) {
        self.debug_assert_idle();
        self.gain = gain;
        if let Some(selection @ ChannelSelection::Differential(_)) = self.selection {
            // The pair was accepted before, so it encodes at any gain
            if let Ok(bits) = Self::mux_bits(selection, gain) {
                self.regs.write_field(Register::Admux, D::MUX_MASK, bits);
            }
        }
    }

    fn mux_bits(selection: ChannelSelection, gain: Gain) -> Result<u8, Error> {
        match selection {
            ChannelSelection::SingleEnded(channel) => {
                D::single_ended_bits(channel).ok_or(Error::InvalidChannel)
            }
            ChannelSelection::Differential(_) if !D::SUPPORTS_DIFFERENTIAL => {
                Err(Error::DifferentialUnsupported)
            }
            ChannelSelection::Differential(pair) => {
                D::differential_bits(pair, gain).ok_or(Error::UnsupportedPair)
            }
        }
    }

    // ---- Prescaler ----

    /// Set the ADC clock divider
    pub fn set_prescaler(&mut self, prescaler: Prescaler) {
        self.debug_assert_idle();
        self.regs
            .write_field(Register::Adcsra, D::ADPS_MASK, prescaler.bits());
        #[cfg(feature = "defmt")]
        defmt::trace!("{}: prescaler {}", D::NAME, prescaler);
    }

    /// Currently configured divider
    pub fn prescaler(&mut self) -> Prescaler {
        Prescaler::from_bits(self.regs.read(Register::Adcsra) & D::ADPS_MASK)
    }

    // ---- Scale ----

    /// Choose 8-bit left-adjusted or 10-bit right-adjusted results
    pub fn set_scale(&mut self, scale: Scale) {
        self.debug_assert_idle();
        match scale {
            Scale::HalfScale => self.regs.set_bits(Register::Admux, bit(D::ADLAR)),
            Scale::FullScale => self.regs.clear_bits(Register::Admux, bit(D::ADLAR)),
        }
        #[cfg(feature = "defmt")]
        defmt::trace!("{}: scale {}", D::NAME, scale);
    }

    /// Currently configured scale
    pub fn scale(&mut self) -> Scale {
        if self.regs.is_set(Register::Admux, bit(D::ADLAR)) {
            Scale::HalfScale
        } else {
            Scale::FullScale
        }
    }

    /// Apply a complete configuration
    ///
    /// Gain is stored before the selection is written so a differential
    /// pair is encoded at the requested gain. Stops at the first rejected
    /// setting.
    pub fn configure(&mut self, config: &AdcConfig) -> Result<(), Error> {
        self.set_reference(config.reference)?;
        self.set_gain(config.gain);
        self.set_selection(config.selection)?;
        self.set_prescaler(config.prescaler);
        self.set_scale(config.scale);
        Ok(())
    }

    // ---- Conversion ----

    /// Start a conversion and return immediately
    pub fn start(&mut self) {
        self.regs.set_bits(Register::Adcsra, bit(D::ADSC));
        self.status = self.status.transition(ConversionEvent::Trigger);
        #[cfg(feature = "defmt")]
        defmt::trace!("{}: conversion started", D::NAME);
    }

    /// Start a conversion and spin until the hardware finishes it
    ///
    /// Never returns if the converter never completes.
    pub fn trigger_blocking(&mut self) {
        self.start();
        while self.regs.is_set(Register::Adcsra, bit(D::ADSC)) {
            core::hint::spin_loop();
        }
        self.status = self.status.transition(ConversionEvent::HardwareDone);
    }

    /// Start a conversion and sleep until its completion interrupt
    ///
    /// Interrupts are masked while sleep is armed and the conversion is
    /// started, and unmasked in the same step that enters sleep, so the
    /// completion interrupt cannot fire between arming and sleeping. An
    /// early wake from another interrupt checks the start bit with
    /// interrupts masked and goes back to sleep the same way. The
    /// application must provide an ADC interrupt vector.
    pub fn trigger_with_sleep<S: SleepControl>(&mut self, sleep: &mut S) {
        sleep.disable_interrupts();
        sleep.arm_adc_noise_reduction();
        self.regs
            .set_bits(Register::Adcsra, bit(D::ADSC) | bit(D::ADIE));
        self.status = self.status.transition(ConversionEvent::Trigger);

        loop {
            sleep.enable_interrupts_and_sleep();
            sleep.disable_interrupts();
            if !self.regs.is_set(Register::Adcsra, bit(D::ADSC)) {
                break;
            }
        }
        sleep.enable_interrupts();

        sleep.disarm();
        self.regs.clear_bits(Register::Adcsra, bit(D::ADIE));
        self.status = self.status.transition(ConversionEvent::HardwareDone);
        #[cfg(feature = "defmt")]
        defmt::trace!("{}: woke with conversion complete", D::NAME);
    }

    /// Non-blocking completion poll
    ///
    /// Returns false while a conversion is running and true once it has
    /// finished and the sample has not been read yet. Returns false when
    /// no conversion was started.
    pub fn is_complete(&mut self) -> bool {
        self.poll() == ConversionStatus::Complete
    }

    fn poll(&mut self) -> ConversionStatus {
        if self.status.is_busy() && !self.regs.is_set(Register::Adcsra, bit(D::ADSC)) {
            self.status = self.status.transition(ConversionEvent::HardwareDone);
        }
        self.status
    }

    /// Read the result of the last conversion
    ///
    /// Must only be called once a triggered conversion is complete. Earlier
    /// reads return a meaningless, partially updated value, and reads with
    /// no conversion pending return the previous result again. Full scale
    /// reads ADCL before ADCH, since reading ADCL locks the pair until ADCH
    /// is read.
    pub fn sample(&mut self) -> Sample {
        let status = self.poll();
        debug_assert!(
            status != ConversionStatus::InProgress,
            "sample read while a conversion is in progress"
        );
        debug_assert!(
            status != ConversionStatus::Idle,
            "sample read with no conversion pending"
        );

        let scale = self.scale();
        let raw = match scale {
            Scale::HalfScale => self.regs.read(Register::Adch) as u16,
            Scale::FullScale => {
                let low = self.regs.read(Register::Adcl) as u16;
                let high = self.regs.read(Register::Adch) as u16;
                ((high & 0b11) << 8) | low
            }
        };
        self.status = self.status.transition(ConversionEvent::SampleRead);
        Sample::new(raw, scale)
    }

    /// Read the result if the conversion has finished
    ///
    /// Fails with [`Error::NoConversion`] when nothing was started since
    /// the last read.
    pub fn try_sample(&mut self) -> nb::Result<Sample, Error> {
        match self.poll() {
            ConversionStatus::InProgress => Err(nb::Error::WouldBlock),
            ConversionStatus::Idle => Err(nb::Error::Other(Error::NoConversion)),
            ConversionStatus::Complete => Ok(self.sample()),
        }
    }

    /// Convert and read, busy-waiting for the result
    pub fn read_blocking(&mut self) -> Sample {
        self.trigger_blocking();
        self.sample()
    }

    /// Convert and read, sleeping through the conversion
    pub fn read_with_sleep<S: SleepControl>(&mut self, sleep: &mut S) -> Sample {
        self.trigger_with_sleep(sleep);
        self.sample()
    }

    /// Convert and read, giving up after `timeout_us`
    ///
    /// The conversion cannot be cancelled. After a timeout it keeps
    /// running and can still be observed with [`is_complete`](Self::is_complete).
    pub fn read_with_timeout<T: DelayNs>(
        &mut self,
        delay: &mut T,
        timeout_us: u32,
    ) -> Result<Sample, Error> {
        self.start();
        let mut waited_us = 0;
        loop {
            if self.is_complete() {
                return Ok(self.sample());
            }
            if waited_us >= timeout_us {
                #[cfg(feature = "defmt")]
                defmt::warn!("{}: conversion timed out after {} us", D::NAME, waited_us);
                return Err(Error::Timeout);
            }
            delay.delay_us(POLL_INTERVAL_US);
            waited_us += POLL_INTERVAL_US;
        }
    }

    /// Let a newly selected reference settle
    ///
    /// Waits `period_ms`, then runs one conversion and discards it: the
    /// first result after a reference switch is unreliable.
    pub fn settle<T: DelayNs>(&mut self, delay: &mut T, period_ms: u32) {
        delay.delay_ms(period_ms);
        let _ = self.read_blocking();
    }

    /// Apply a configuration, then settle for its `settle_period_ms`
    ///
    /// The converter must already be enabled.
    pub fn configure_and_settle<T: DelayNs>(
        &mut self,
        config: &AdcConfig,
        delay: &mut T,
    ) -> Result<(), Error> {
        self.configure(config)?;
        self.settle(delay, config.settle_period_ms);
        Ok(())
    }

    fn debug_assert_idle(&mut self) {
        debug_assert!(
            !self.regs.is_set(Register::Adcsra, bit(D::ADSC)),
            "converter reconfigured while a conversion is in progress"
        );
    }
}
