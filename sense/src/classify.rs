//! Hysteresis-gated mode classification.
//!
//! One evaluation per classification cycle, driven by the corrected maxima.
//! A candidate differing from the current mode is committed only after the
//! debounce window has elapsed since the last accepted transition, which
//! rejects noise-driven flapping between adjacent modes.

use crate::config::Tuning;
use crate::extrema::ExtremaSet;
use crate::Instant;

/// Discrete touch classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    None,
    Touch,
    Double,
    Grab,
}

pub struct Classifier<const TICK_HZ: u32> {
    mode: Mode,
    last_change: Instant<TICK_HZ>,
}

impl<const TICK_HZ: u32> Classifier<TICK_HZ> {
    /// Starts in `Mode::None`; `start` seeds the debounce clock, so no
    /// transition is accepted within the first debounce window after boot.
    pub const fn new(start: Instant<TICK_HZ>) -> Self {
        Self {
            mode: Mode::None,
            last_change: start,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Map the corrected maxima to a mode candidate.
    ///
    /// `maxs[2] > 0` requires at least three bins above baseline before a
    /// light touch is believed; beyond that only `maxs[0]` matters.
    pub fn candidate(maxs: &[f32; 3], tuning: &Tuning<TICK_HZ>) -> Mode {
        if maxs[2] > 0.0 && maxs[0] < tuning.lim_touch {
            Mode::Touch
        } else if maxs[0] > tuning.lim_touch && maxs[0] < tuning.lim_double {
            Mode::Double
        } else if maxs[0] > tuning.lim_double {
            Mode::Grab
        } else {
            Mode::None
        }
    }

    /// Evaluate one cycle's extrema. Returns the new mode if a transition
    /// was accepted, i.e. the candidate differs from the current mode and
    /// the debounce window has elapsed.
    pub fn update(
        &mut self,
        extrema: &ExtremaSet,
        tuning: &Tuning<TICK_HZ>,
        now: Instant<TICK_HZ>,
    ) -> Option<Mode> {
        let candidate = Self::candidate(&extrema.maxs, tuning);
        if candidate == self.mode {
            return None;
        }
        if now - self.last_change < tuning.debounce {
            return None;
        }
        self.mode = candidate;
        self.last_change = now;
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HZ: u32 = 1_000;

    fn tuning() -> Tuning<HZ> {
        Tuning::reference()
    }

    fn extrema_with_maxs(maxs: [f32; 3]) -> ExtremaSet {
        ExtremaSet {
            maxs,
            arg_maxs: [0; 3],
            mins: [0.0; 3],
            arg_mins: [0; 3],
        }
    }

    fn at(ms: u32) -> Instant<HZ> {
        Instant::<HZ>::from_ticks(ms)
    }

    #[test]
    fn threshold_candidates() {
        let t = tuning();
        assert_eq!(Classifier::candidate(&[50.0, 20.0, 1.0], &t), Mode::Touch);
        assert_eq!(Classifier::candidate(&[65.0, 20.0, 1.0], &t), Mode::Double);
        assert_eq!(Classifier::candidate(&[80.0, 20.0, 1.0], &t), Mode::Grab);
        assert_eq!(Classifier::candidate(&[10.0, 0.0, -1.0], &t), Mode::None);
    }

    #[test]
    fn single_positive_bin_is_not_a_touch() {
        // fewer than three bins above baseline reads as noise
        let t = tuning();
        assert_eq!(Classifier::candidate(&[40.0, 0.0, 0.0], &t), Mode::None);
    }

    #[test]
    fn debounce_rejects_early_transition() {
        let t = tuning();
        let mut classifier = Classifier::new(at(0));

        let grab = extrema_with_maxs([80.0, 20.0, 1.0]);
        assert_eq!(classifier.update(&grab, &t, at(3_000)), None);
        assert_eq!(classifier.mode(), Mode::None);

        assert_eq!(classifier.update(&grab, &t, at(6_000)), Some(Mode::Grab));
        assert_eq!(classifier.mode(), Mode::Grab);
    }

    #[test]
    fn accepted_transition_rearms_the_debounce() {
        let t = tuning();
        let mut classifier = Classifier::new(at(0));

        let grab = extrema_with_maxs([80.0, 20.0, 1.0]);
        let touch = extrema_with_maxs([50.0, 20.0, 1.0]);

        assert_eq!(classifier.update(&grab, &t, at(6_000)), Some(Mode::Grab));
        // timestamp moved to 6000, so 9000 is still inside the window
        assert_eq!(classifier.update(&touch, &t, at(9_000)), None);
        assert_eq!(classifier.mode(), Mode::Grab);
        assert_eq!(classifier.update(&touch, &t, at(11_000)), Some(Mode::Touch));
    }

    #[test]
    fn unchanged_candidate_never_touches_the_timestamp() {
        let t = tuning();
        let mut classifier = Classifier::new(at(0));

        let none = extrema_with_maxs([10.0, 0.0, -1.0]);
        assert_eq!(classifier.update(&none, &t, at(10_000)), None);

        // the timestamp still dates from boot, so a real transition right
        // after is accepted
        let grab = extrema_with_maxs([80.0, 20.0, 1.0]);
        assert_eq!(classifier.update(&grab, &t, at(10_001)), Some(Mode::Grab));
    }
}
