//! The color-animation consumer, at its interface boundary.
//!
//! Four PWM channels stand in for the strip driver: one more channel lights
//! per classified mode, with a slow triangle-wave breathing on whatever is
//! lit. `tick` is a pure rate gate -- it paints at most one frame per
//! interval and never waits on the hardware.

use crate::config;
use crate::hal::pins;
use crate::panic::OptionalExt;
use crate::time::Instant;
use sense::Mode;
use stm32f1xx_hal::device::TIM3;
use stm32f1xx_hal::timer::{Ch, Channel, PwmHz, Tim3NoRemap};

type StripPwm = PwmHz<
    TIM3,
    Tim3NoRemap,
    (Ch<0>, Ch<1>, Ch<2>, Ch<3>),
    (
        pins::A6_TIM3C1,
        pins::A7_TIM3C2,
        pins::B0_TIM3C3,
        pins::B1_TIM3C4,
    ),
>;

pub struct StripRenderer {
    pwm: StripPwm,
    mode: Mode,
    phase: u8,
    last_frame: Option<Instant>,
}

impl StripRenderer {
    /// Takes the PWM timer with all four channels already enabled at zero
    /// duty.
    pub fn new(pwm: StripPwm) -> Self {
        Self {
            pwm,
            mode: Mode::None,
            phase: 0,
            last_frame: None,
        }
    }
}

impl sense::Renderer<{ config::clk::TICK_HZ }> for StripRenderer {
    fn notify_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn tick(&mut self, now: Instant) {
        let due = match self.last_frame {
            None => true,
            Some(last) => now - last >= config::render::FRAME_INTERVAL,
        };
        if !due {
            return;
        }
        self.last_frame = Some(now);
        self.phase = self.phase.wrapping_add(1);

        // triangle wave over the phase, 0..=254
        let breath: u16 = {
            let p = u16::from(self.phase);
            if p < 128 {
                p * 2
            } else {
                (255 - p) * 2
            }
        };

        let lit: [bool; 4] = match self.mode {
            Mode::None => [true, false, false, false],
            Mode::Touch => [true, true, false, false],
            Mode::Double => [true, true, true, false],
            Mode::Grab => [true, true, true, true],
        };

        let max_duty = self.pwm.get_max_duty();
        let channels = [Channel::C1, Channel::C2, Channel::C3, Channel::C4];
        for (ch, lit) in channels.into_iter().zip(lit) {
            let duty: u16 = if lit {
                (u32::from(max_duty) * u32::from(breath) / 255)
                    .try_into()
                    .unwrap_infallible()
            } else {
                0
            };
            self.pwm.set_duty(ch, duty);
        }
    }
}
