use crate::Duration;

/// Circuit-dependent calibration values, supplied at startup.
///
/// The amplitude limits are in the units of the corrected curve (mean ADC
/// counts over `avg * div` raw samples, baseline subtracted). They depend on
/// the attached sensing circuit, not on physics, so they are data rather
/// than compiled-in literals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning<const TICK_HZ: u32> {
    /// Largest corrected amplitude still read as a single-point touch.
    pub lim_touch: f32,
    /// Corrected amplitude beyond which contact reads as a full grasp.
    pub lim_double: f32,
    /// Sweeps accumulated per classification cycle.
    pub avg: u16,
    /// Minimum dwell time between accepted mode transitions.
    pub debounce: Duration<TICK_HZ>,
}

impl<const TICK_HZ: u32> Tuning<TICK_HZ> {
    /// Values measured against the reference sensing circuit.
    pub const fn reference() -> Self {
        Self {
            lim_touch: 60.0,
            lim_double: 75.0,
            avg: 8,
            debounce: Duration::<TICK_HZ>::millis(5000),
        }
    }
}
