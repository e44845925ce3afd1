pub fn dump_to_log() {
    defmt::info!(
        "\n\
        Debugging flags:\n\
        - FAKE_INPUT_DATA: {}\n\
        - FAKE_INPUT_DELTA: {}\n\
        Clocks:\n\
        - HSE_FREQ: {} Hz\n\
        - SYSCLK:   {} Hz\n\
        - PCLK1:    {} Hz\n\
        - PCLK2:    {} Hz\n\
        - ADCCLK:   {} Hz\n\
        Sweep:\n\
        - STEPS: {}\n\
        - DIV:   {}\n\
        - BINS:  {}\n\
        - PERIOD_TICKS: {} to {} (at {} Hz)\n\
        Tuning:\n\
        - AVG: {}\n\
        - LIM_TOUCH:  {}\n\
        - LIM_DOUBLE: {}\n\
        - DEBOUNCE_MS: {}\n\
        Render:\n\
        - FRAME_INTERVAL_MS: {}\n\
        - PWM_FREQ: {} Hz\n\
        ",
        debug::FAKE_INPUT_DATA,
        debug::FAKE_INPUT_DELTA,
        clk::HSE_FREQ.to_Hz(),
        clk::SYSCLK.to_Hz(),
        clk::PCLK1.to_Hz(),
        clk::PCLK2.to_Hz(),
        clk::ADCCLK.to_Hz(),
        sweep::STEPS,
        sweep::DIV,
        sweep::BINS,
        sweep::BASE_PERIOD_TICKS,
        sweep::MAX_PERIOD_TICKS,
        clk::TIM2CLK_HZ,
        tuning::AVG,
        tuning::LIM_TOUCH,
        tuning::LIM_DOUBLE,
        tuning::DEBOUNCE_MS,
        render::FRAME_INTERVAL_MS,
        render::PWM_FREQ.to_Hz(),
    );
}

/// Debugging flags
pub mod debug {
    /// Substitute a synthetic response curve for the ADC, for bring-up
    /// without the sensing circuit attached. The bump is also present
    /// during calibration, so the classifier stays in None; this checks the
    /// signal path and LED output, not classification.
    pub const FAKE_INPUT_DATA: bool = false;
    pub const FAKE_INPUT_DELTA: u16 = 80;

    pub const LOG_CLASSIFICATION: bool = true;
    pub const LOG_EXTREMA: bool = false;
    pub const LOG_CURVE: bool = false;
    pub const LOG_SWEEP_TIMING: bool = false;
}

/// Clock configuration
pub mod clk {
    use fugit::Rate;

    /// Use external oscillator (required to get max 72MHz sysclk)
    pub const HSE_FREQ: Rate<u32, 1, 1> = Rate::<u32, 1, 1>::MHz(8);

    /// PLLMUL @ x9 (max 72MHz)
    pub const SYSCLK: Rate<u32, 1, 1> = Rate::<u32, 1, 1>::MHz(72);
    pub const SYSCLK_HZ: u32 = SYSCLK.to_Hz();

    /// APB1 prescaler @ /2 (max 36MHz). TIM2 then runs at 2x PCLK1, giving
    /// the excitation oscillator full sysclk resolution.
    pub const PCLK1: Rate<u32, 1, 1> = Rate::<u32, 1, 1>::MHz(36);
    /// APB2 prescaler @ /1 (max 72MHz)
    pub const PCLK2: Rate<u32, 1, 1> = Rate::<u32, 1, 1>::MHz(72);

    /// ADC prescaler @ /6 (max 14MHz, min 600kHz)
    pub const ADCCLK: Rate<u32, 1, 1> = Rate::<u32, 1, 1>::MHz(12);

    /// APB1 timer clock: 2x PCLK1 whenever the APB1 prescaler is not 1.
    pub const TIM2CLK_HZ: u32 = PCLK1.to_Hz() * 2;
    const _: () = assert!(TIM2CLK_HZ == SYSCLK_HZ);

    /// Monotonic tick rate. Millisecond resolution is plenty for the
    /// debounce and render gates, and a u32 instant at 1kHz wraps in
    /// weeks rather than the 59 seconds a sysclk-rate instant would.
    pub const TICK_HZ: u32 = 1_000;
}

/// Frequency sweep geometry
pub mod sweep {
    /// Excitation frequency steps per sweep.
    pub const STEPS: usize = 160;

    /// Consecutive steps folded into one bin.
    pub const DIV: usize = 8;

    pub const BINS: usize = STEPS / DIV;
    const _: () = assert!(STEPS % DIV == 0);

    /// Oscillator period at step 0, in TIM2 ticks. 20 ticks at 72MHz is
    /// 3.6MHz; the sweep descends to 400kHz at the last step.
    pub const BASE_PERIOD_TICKS: u16 = 20;
    pub const MAX_PERIOD_TICKS: u16 = BASE_PERIOD_TICKS + STEPS as u16;
    const _: () = assert!(BASE_PERIOD_TICKS >= 2);
    const _: () = assert!(STEPS <= (u16::MAX - BASE_PERIOD_TICKS) as usize);

    // One step costs a timer reprogram plus one ADC conversion (~2.2us at
    // ADCCLK/T_13), so a full sweep is well under 1ms -- comfortably inside
    // the render cadence. A runtime warning covers the case where this
    // stops being true.
}

/// ADC configuration
pub mod adc {
    use stm32f1xx_hal::adc::SampleTime;

    /// Sample at ADCCLK / (13.5 + 12.5) = ~460k conversions/sec
    pub const SAMPLE: SampleTime = SampleTime::T_13;
}

/// Circuit calibration values handed to the sensing core at startup
pub mod tuning {
    use super::clk;
    use sense::config::Tuning;
    use sense::Duration;

    pub const AVG: u16 = 8;
    pub const LIM_TOUCH: f32 = 60.0;
    pub const LIM_DOUBLE: f32 = 75.0;
    pub const DEBOUNCE_MS: u32 = 5000;

    pub const fn runtime() -> Tuning<{ clk::TICK_HZ }> {
        Tuning {
            lim_touch: LIM_TOUCH,
            lim_double: LIM_DOUBLE,
            avg: AVG,
            debounce: Duration::<{ clk::TICK_HZ }>::millis(DEBOUNCE_MS),
        }
    }
}

/// LED strip output
pub mod render {
    use fugit::Rate;

    /// At most one frame per interval; the tick gate otherwise returns
    /// immediately.
    pub const FRAME_INTERVAL_MS: u32 = 20;
    pub const FRAME_INTERVAL: crate::time::Duration =
        crate::time::Duration::millis(FRAME_INTERVAL_MS);

    pub const PWM_FREQ: Rate<u32, 1, 1> = Rate::<u32, 1, 1>::kHz(1);
}
