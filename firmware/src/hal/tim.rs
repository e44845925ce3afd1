use crate::panic::OptionalExt;
use core::marker::PhantomData;
use stm32f1xx_hal::afio::MAPR;
use stm32f1xx_hal::device::{RCC, TIM2};
use stm32f1xx_hal::rcc::Clocks;
use stm32f1xx_hal::timer::pwm::Pins;
use stm32f1xx_hal::timer::{Instance, Ocm, Remap};

pub struct SweepTimer<TIM: Instance, const FREQ: u32> {
    tim: TIM,
}

// modified from
// https://github.com/stm32-rs/stm32f1xx-hal/blob/f9b24f4d9bac7fc3c93764bd295125800944f53b/src/timer.rs#L713-L735
impl<TIM: Instance, const FREQ: u32> SweepTimer<TIM, FREQ> {
    pub fn new(tim: TIM, clocks: &Clocks) -> Self {
        unsafe {
            //NOTE(unsafe) this reference will only be used for atomic writes with no side effects
            let rcc = &(*RCC::ptr());
            // Enable and reset the timer peripheral
            TIM::enable(rcc);
            TIM::reset(rcc);
        }

        let mut t = Self { tim };
        t.configure(clocks);
        t
    }

    /// Calculate prescaler depending on `Clocks` state
    fn configure(&mut self, clocks: &Clocks) {
        let clk = TIM::timer_clock(clocks);
        assert!(clk.raw() % FREQ == 0);
        let psc = clk.raw() / FREQ;
        self.tim.set_prescaler(u16::try_from(psc - 1).unwrap());
    }
}

/// Swept square-wave excitation output on TIM2 channel 2.
///
/// The frequency sweep reprograms the period once per step. Each reprogram
/// halts the counter, rewrites ARR/CCR, zeroes the phase and restarts --
/// the halt is a handful of register writes, so the next ADC reading
/// observes the new frequency from a defined phase.
pub struct SweepOscillator<TIM, REMAP, P, PINS, const FREQ: u32>
where
    TIM: Instance,
    REMAP: Remap<Periph = TIM>,
    PINS: Pins<REMAP, P>,
{
    timer: SweepTimer<TIM, FREQ>,
    base_period: u16,
    _pins: PhantomData<(REMAP, P, PINS)>,
}

impl<const FREQ: u32> SweepTimer<TIM2, FREQ> {
    /// Configure channel 2 as a PWM output and hand back the oscillator.
    /// `base_period` is the period (in timer ticks) at sweep step 0; step
    /// `d` runs at `base_period + d` ticks.
    pub fn sweep_oscillator<REMAP, P, PINS>(
        self,
        _pins: PINS,
        mapr: &mut MAPR,
        base_period: u16,
    ) -> SweepOscillator<TIM2, REMAP, P, PINS, FREQ>
    where
        REMAP: Remap<Periph = TIM2>,
        PINS: Pins<REMAP, P>,
    {
        assert!(PINS::C2, "excitation output is wired to TIM2 channel 2");

        REMAP::remap(mapr);

        // 1 -> 0 at CCR: high while CNT < CCR
        let mode = Ocm::PwmMode1;

        self.tim.ccmr1_output().modify(|_, w| {
            w
                // enable preload on CCR
                .oc2pe()
                .set_bit()
                // set output control mode
                .oc2m()
                .bits(mode as _)
        });
        // Enable the capture/compare channel
        self.tim.ccer.modify(|_, w| w.cc2e().set_bit());

        // Enable preload for ARR
        self.tim.cr1.modify(|_, w| w.arpe().set_bit());

        let mut osc = SweepOscillator {
            timer: self,
            base_period,
            _pins: PhantomData,
        };
        // park the oscillator at step 0 until the first sweep
        osc.reprogram(base_period);
        osc
    }
}

impl<REMAP, P, PINS, const FREQ: u32> SweepOscillator<TIM2, REMAP, P, PINS, FREQ>
where
    REMAP: Remap<Periph = TIM2>,
    PINS: Pins<REMAP, P>,
{
    /// Halt, rewrite period and 50% duty, reset phase, restart.
    fn reprogram(&mut self, period_ticks: u16) {
        let tim = &mut self.timer.tim;

        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.arr.write(|w| w.arr().bits(period_ticks - 1));
        tim.ccr2.write(|w| w.ccr().bits(period_ticks / 2));
        tim.cnt.write(|w| w.cnt().bits(0));

        // Trigger update event to load the preloaded registers now
        // (also sets the URS bit to prevent an interrupt from being triggered by the UG bit)
        tim.cr1.modify(|_, w| w.urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.urs().clear_bit());

        tim.cr1.modify(|_, w| w.cen().set_bit());
    }
}

impl<REMAP, P, PINS, const FREQ: u32> sense::SignalGenerator
    for SweepOscillator<TIM2, REMAP, P, PINS, FREQ>
where
    REMAP: Remap<Periph = TIM2>,
    PINS: Pins<REMAP, P>,
{
    fn set_frequency_step(&mut self, step: usize) {
        let step: u16 = step.try_into().unwrap_infallible();
        self.reprogram(self.base_period + step);
    }
}
