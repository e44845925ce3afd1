#![no_main]
#![no_std]
#![allow(clippy::type_complexity)]
#![warn(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::ptr_as_ptr
)]

use defmt_rtt as _; // global logger

use panic_probe as _; // panicking-behavior

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

mod adc;
mod config;
mod hal;
mod panic;
mod render;
mod time;

#[rtic::app(device = stm32f1xx_hal::pac, peripherals = true, dispatchers = [USART1])]
mod app {
    use crate::adc::ResponseSampler;
    use crate::config;
    use crate::hal::pins;
    use crate::hal::tim::{SweepOscillator, SweepTimer};
    use crate::render::StripRenderer;
    use crate::time::Instant;
    use sense::calibrate::capture_zero_curve;
    use sense::engine::Engine;
    use stm32f1xx_hal::adc::Adc;
    use stm32f1xx_hal::device::TIM2;
    use stm32f1xx_hal::gpio::PinState;
    use stm32f1xx_hal::prelude::*;
    use stm32f1xx_hal::timer::{Ch, Channel::*, Tim2NoRemap, Timer};
    use systick_monotonic::Systick;

    type SweepEngine =
        Engine<{ config::sweep::STEPS }, { config::sweep::BINS }, { config::clk::TICK_HZ }>;

    type Oscillator = SweepOscillator<
        TIM2,
        Tim2NoRemap,
        Ch<1>,
        pins::A1_TIM2C2_DRIVE,
        { config::clk::TIM2CLK_HZ },
    >;

    #[monotonic(binds = SysTick, default = true)]
    type Mono = Systick<{ config::clk::TICK_HZ }>;

    /// Adapts the RTIC monotonic to the sensing core's clock trait.
    pub struct MonoClock;

    impl sense::Clock<{ config::clk::TICK_HZ }> for MonoClock {
        fn now(&mut self) -> Instant {
            // The monotonic hands out u64-backed instants; the sensing core
            // tracks time in u32, wrapping after ~49 days at 1kHz. All the
            // core ever does is subtract nearby instants, and fugit orders
            // instants in wrapping fashion, so truncation is sound.
            #[allow(clippy::cast_possible_truncation)]
            Instant::from_ticks(monotonics::now().ticks() as u32)
        }
    }

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        engine: SweepEngine,
        oscillator: Oscillator,
        sampler: ResponseSampler,
        renderer: StripRenderer,
        debug_led: pins::C13_DEBUG_LED,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        defmt::info!("Dumping config...");

        config::dump_to_log();

        defmt::info!("Starting init...");

        let mut afio = cx.device.AFIO.constrain();
        let mut flash = cx.device.FLASH.constrain();
        let mut gpioa = cx.device.GPIOA.split();
        let mut gpiob = cx.device.GPIOB.split();
        let mut gpioc = cx.device.GPIOC.split();
        let rcc = cx.device.RCC.constrain();

        defmt::info!("Configuring clocks...");

        let clocks = rcc
            .cfgr
            .use_hse(config::clk::HSE_FREQ)
            .sysclk(config::clk::SYSCLK)
            .pclk1(config::clk::PCLK1)
            .pclk2(config::clk::PCLK2)
            .adcclk(config::clk::ADCCLK)
            .freeze(&mut flash.acr);

        assert!(config::clk::SYSCLK == clocks.sysclk());
        assert!(config::clk::PCLK1 == clocks.pclk1());
        assert!(config::clk::PCLK2 == clocks.pclk2());
        assert!(config::clk::ADCCLK == clocks.adcclk());

        defmt::info!("Configuring response ADC...");

        let mut adc1 = Adc::adc1(cx.device.ADC1, clocks);
        adc1.set_sample_time(config::adc::SAMPLE);

        let sense_pin: pins::A0_ADC1C0_SENSE = gpioa.pa0.into_analog(&mut gpioa.crl);

        let mut sampler = ResponseSampler::new(adc1, sense_pin);

        defmt::info!("Configuring excitation oscillator...");

        let drive_pin: pins::A1_TIM2C2_DRIVE = gpioa.pa1.into_alternate_push_pull(&mut gpioa.crl);

        let mut oscillator: Oscillator = SweepTimer::new(cx.device.TIM2, &clocks)
            .sweep_oscillator(drive_pin, &mut afio.mapr, config::sweep::BASE_PERIOD_TICKS);

        defmt::info!("Configuring strip PWM timer...");

        let tim3_ch1: pins::A6_TIM3C1 = gpioa.pa6.into_alternate_push_pull(&mut gpioa.crl);
        let tim3_ch2: pins::A7_TIM3C2 = gpioa.pa7.into_alternate_push_pull(&mut gpioa.crl);
        let tim3_ch3: pins::B0_TIM3C3 = gpiob.pb0.into_alternate_push_pull(&mut gpiob.crl);
        let tim3_ch4: pins::B1_TIM3C4 = gpiob.pb1.into_alternate_push_pull(&mut gpiob.crl);

        let mut strip_pwm = Timer::new(cx.device.TIM3, &clocks).pwm_hz(
            (tim3_ch1, tim3_ch2, tim3_ch3, tim3_ch4),
            &mut afio.mapr,
            config::render::PWM_FREQ,
        );
        for ch in [C1, C2, C3, C4] {
            strip_pwm.set_duty(ch, 0);
            strip_pwm.enable(ch);
        }

        let renderer = StripRenderer::new(strip_pwm);

        defmt::info!("Configuring debug indicator LED...");

        let debug_led: pins::C13_DEBUG_LED = gpioc
            .pc13
            .into_push_pull_output_with_state(&mut gpioc.crh, PinState::High);

        defmt::info!("Configuring monotonic timer...");

        let mono = Systick::new(cx.core.SYST, clocks.sysclk().to_Hz());

        defmt::info!("Calibrating zero curve (keep the surface untouched)...");

        let zero = capture_zero_curve::<{ config::sweep::STEPS }, { config::sweep::BINS }, _, _>(
            &mut oscillator,
            &mut sampler,
            config::tuning::AVG,
        );

        if config::debug::LOG_CURVE {
            defmt::println!("Zero curve: {}", zero.bins());
        }

        defmt::info!("Calibration complete.");

        let engine = SweepEngine::new(config::tuning::runtime(), zero, Instant::from_ticks(0));

        sweep::spawn().unwrap();

        defmt::info!("Finished init.");

        (
            Shared {},
            Local {
                engine,
                oscillator,
                sampler,
                renderer,
                debug_led,
            },
            init::Monotonics(mono),
        )
    }

    /// One full excitation sweep per run; reschedules itself forever. The
    /// renderer's frame gate is offered inside the sweep after every step,
    /// so LED output stays smooth although acquisition is synchronous.
    #[task(
        local = [
            engine,
            oscillator,
            sampler,
            renderer,
            debug_led,
            seen_cycles: u32 = 0,
        ],
        priority = 1,
    )]
    fn sweep(cx: sweep::Context) {
        cx.local.debug_led.set_low();

        let start = monotonics::now();

        let changed = cx.local.engine.run_sweep(
            cx.local.oscillator,
            cx.local.sampler,
            &mut MonoClock,
            cx.local.renderer,
        );

        if let Some(mode) = changed {
            if config::debug::LOG_CLASSIFICATION {
                defmt::info!("Mode changed: {}", mode);
            }
        }

        let cycles = cx.local.engine.cycles();
        if cycles != *cx.local.seen_cycles {
            *cx.local.seen_cycles = cycles;
            if config::debug::LOG_EXTREMA {
                if let Some(extrema) = cx.local.engine.last_extrema() {
                    defmt::println!("Extrema: {}", extrema);
                }
            }
        } else if config::debug::LOG_CURVE {
            defmt::println!("Bins: {}", cx.local.engine.bins());
        }

        let duration = monotonics::now() - start;
        if config::debug::LOG_SWEEP_TIMING {
            defmt::println!("Sweep took {} ms", duration.to_millis());
        }
        if duration > config::render::FRAME_INTERVAL {
            defmt::warn!("Sweep overran the render cadence ({} ms)", duration.to_millis());
        }

        cx.local.debug_led.set_high();

        if sweep::spawn().is_err() {
            defmt::warn!("Sweep task overrun");
        }
    }

    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            // Note that using `wfi` here breaks debugging,
            // so if desired we should only do that in release mode.
            continue;
        }
    }
}
