//! Zero-baseline capture.
//!
//! Runs once at startup, with the precondition that nothing touches the
//! sensing surface. There is no way to detect a violated precondition at
//! runtime; a touched calibration silently skews every later
//! classification, so the firmware makes the window obvious in its logs.

use crate::sweep::{SweepCurve, ZeroCurve};
use crate::{Sampler, SignalGenerator};

/// Capture the no-touch baseline: `avg` full sweeps through the exact
/// runtime binning path, so the zero curve's units and scaling match the
/// runtime sweep result bin for bin.
pub fn capture_zero_curve<const STEPS: usize, const BINS: usize, G, S>(
    generator: &mut G,
    sampler: &mut S,
    avg: u16,
) -> ZeroCurve<BINS>
where
    G: SignalGenerator,
    S: Sampler,
{
    let div = STEPS / BINS;
    let scale = 1.0 / (f32::from(avg) * div as f32);

    let mut curve = SweepCurve::<BINS>::new();
    for _ in 0..avg {
        for step in 0..STEPS {
            generator.set_frequency_step(step);
            let value = sampler.sample();
            curve.add_sample(step, f32::from(value), div, scale);
        }
    }
    curve.into_zero_curve()
}
