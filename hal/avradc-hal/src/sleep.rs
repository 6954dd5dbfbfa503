//! Interrupt masking and sleep control
//!
//! Sleeping through a conversion lowers digital noise on the supply while
//! the sample-and-hold is converting. The completion interrupt wakes the
//! core again.

/// Interrupt and sleep control used by the sleep-during-conversion path
///
/// The driver calls these in a fixed order: `disable_interrupts`,
/// `arm_adc_noise_reduction`, start the conversion,
/// `enable_interrupts_and_sleep`, then `disarm`.
pub trait SleepControl {
    /// Globally mask interrupts
    fn disable_interrupts(&mut self);

    /// Globally unmask interrupts
    fn enable_interrupts(&mut self);

    /// Select the ADC noise reduction sleep mode and set the sleep enable bit
    fn arm_adc_noise_reduction(&mut self);

    /// Enter sleep until an interrupt wakes the core
    fn sleep(&mut self);

    /// Unmask interrupts and enter sleep with nothing in between
    ///
    /// An interrupt that is already pending must not be serviced before the
    /// core sleeps, or the wake-up is lost. On AVR this is `sei` directly
    /// followed by `sleep`: the instruction after `sei` always executes
    /// before a pending interrupt. The default calls the two methods in
    /// turn and is only race free if the implementation guarantees that
    /// nothing runs between them.
    fn enable_interrupts_and_sleep(&mut self) {
        self.enable_interrupts();
        self.sleep();
    }

    /// Clear the sleep enable bit
    fn disarm(&mut self);
}

impl<T: SleepControl + ?Sized> SleepControl for &mut T {
    fn disable_interrupts(&mut self) {
        (**self).disable_interrupts()
    }

    fn enable_interrupts(&mut self) {
        (**self).enable_interrupts()
    }

    fn arm_adc_noise_reduction(&mut self) {
        (**self).arm_adc_noise_reduction()
    }

    fn sleep(&mut self) {
        (**self).sleep()
    }

    fn enable_interrupts_and_sleep(&mut self) {
        (**self).enable_interrupts_and_sleep()
    }

    fn disarm(&mut self) {
        (**self).disarm()
    }
}
