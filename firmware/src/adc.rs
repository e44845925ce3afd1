use crate::config;
use crate::hal::pins;
use crate::panic::OptionalExt;
use embedded_hal::adc::OneShot;
use stm32f1xx_hal::adc::Adc;
use stm32f1xx_hal::device::ADC1;

/// One analog channel, polled synchronously once per frequency step.
pub struct ResponseSampler {
    adc: Adc<ADC1>,
    pin: pins::A0_ADC1C0_SENSE,
    /// Step cursor for the synthetic curve, advanced once per reading
    /// (the sampler is called exactly once per sweep step, in order).
    fake_step: usize,
}

impl ResponseSampler {
    pub fn new(adc: Adc<ADC1>, pin: pins::A0_ADC1C0_SENSE) -> Self {
        Self {
            adc,
            pin,
            fake_step: 0,
        }
    }
}

impl sense::Sampler for ResponseSampler {
    fn sample(&mut self) -> u16 {
        let sample = self.adc.read(&mut self.pin).unwrap_infallible();

        if config::debug::FAKE_INPUT_DATA {
            let step = self.fake_step;
            self.fake_step = (step + 1) % config::sweep::STEPS;
            return fake_response(step);
        }

        sample
    }
}

/// Synthetic response curve: flat baseline with a bump one bin wide in the
/// middle of the sweep. Exercises the signal path and LED output without
/// the sensing circuit attached.
fn fake_response(step: usize) -> u16 {
    let lo = config::sweep::STEPS / 2 - config::sweep::DIV / 2;
    let hi = lo + config::sweep::DIV;
    if (lo..hi).contains(&step) {
        400 + config::debug::FAKE_INPUT_DELTA
    } else {
        400
    }
}
