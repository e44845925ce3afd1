//! Swept-frequency capacitive sensing core.
//!
//! Everything algorithmic lives here, behind hardware traits: the firmware
//! (or a test rig) supplies an excitation oscillator, an analog sampler, a
//! monotonic clock and a renderer, and [`engine::Engine`] drives the
//! acquire-bin-calibrate-classify pipeline on top of them.

#![cfg_attr(not(test), no_std)]

pub mod calibrate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod extrema;
pub mod sweep;

pub use classify::Mode;

pub type Instant<const TICK_HZ: u32> = fugit::Instant<u32, 1, TICK_HZ>;
pub type Duration<const TICK_HZ: u32> = fugit::Duration<u32, 1, TICK_HZ>;

/// Excitation oscillator, swept one frequency step at a time.
pub trait SignalGenerator {
    /// Reconfigure the oscillator to step `step`'s frequency, with a defined
    /// phase, so that the very next [`Sampler::sample`] call observes that
    /// frequency's response. The reprogramming halt must be bounded.
    fn set_frequency_step(&mut self, step: usize);
}

/// Analog response input, read synchronously once per frequency step.
pub trait Sampler {
    /// Instantaneous response amplitude at the currently configured
    /// frequency. A single reading; noise is rejected statistically
    /// downstream, not by retrying here.
    fn sample(&mut self) -> u16;
}

/// Monotonic time source.
pub trait Clock<const TICK_HZ: u32> {
    fn now(&mut self) -> Instant<TICK_HZ>;
}

/// The downstream color-animation consumer.
///
/// Consumed at its boundary only: the engine reports accepted mode
/// transitions and offers a rate-limited repaint opportunity at least once
/// per sweep step. `tick` must either paint one frame or return immediately.
pub trait Renderer<const TICK_HZ: u32> {
    fn notify_mode(&mut self, mode: Mode);
    fn tick(&mut self, now: Instant<TICK_HZ>);
}
