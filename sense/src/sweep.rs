//! Down-sampling of raw frequency steps into bins, and accumulation of
//! binned samples across sweeps.
//!
//! Each raw sample is folded in pre-scaled by `1 / (avg * div)`, so after
//! one full sweep a bin holds `sum(div raw samples) / (avg * div)`, and
//! after `avg` sweeps it holds the mean response over `avg * div` raw
//! samples. The zero curve is produced by the identical path, which is what
//! makes bin-wise baseline subtraction meaningful.

/// Binned response curve for the group of sweeps currently accumulating.
pub struct SweepCurve<const BINS: usize> {
    bins: [f32; BINS],
}

impl<const BINS: usize> SweepCurve<BINS> {
    pub const fn new() -> Self {
        Self { bins: [0.0; BINS] }
    }

    /// Fold the raw sample for `step` into bin `step / div`.
    ///
    /// `scale` must be `1 / (avg * div)`; the caller precomputes it once
    /// per configuration rather than once per sample.
    pub fn add_sample(&mut self, step: usize, value: f32, div: usize, scale: f32) {
        self.bins[step / div] += value * scale;
    }

    /// Zero every bin for the next accumulation cycle.
    pub fn reset(&mut self) {
        self.bins = [0.0; BINS];
    }

    pub fn bins(&self) -> &[f32; BINS] {
        &self.bins
    }

    /// Bin-wise baseline subtraction against the zero curve.
    pub fn corrected(&self, zero: &ZeroCurve<BINS>) -> [f32; BINS] {
        let mut out = [0.0; BINS];
        for (i, out) in out.iter_mut().enumerate() {
            *out = self.bins[i] - zero.bins[i];
        }
        out
    }

    /// Freeze the accumulated curve as the no-touch baseline.
    pub(crate) fn into_zero_curve(self) -> ZeroCurve<BINS> {
        ZeroCurve { bins: self.bins }
    }
}

/// Per-bin no-touch baseline. Written once at startup, read-only after.
pub struct ZeroCurve<const BINS: usize> {
    bins: [f32; BINS],
}

impl<const BINS: usize> ZeroCurve<BINS> {
    pub fn bins(&self) -> &[f32; BINS] {
        &self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIV: usize = 2;
    const AVG: u16 = 2;
    const SCALE: f32 = 1.0 / (AVG as f32 * DIV as f32);

    #[test]
    fn bins_hold_scaled_sums_after_one_sweep() {
        let mut curve = SweepCurve::<4>::new();
        let raw = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        for (step, &value) in raw.iter().enumerate() {
            curve.add_sample(step, value, DIV, SCALE);
        }
        // bin i == sum(raw[i*DIV..i*DIV+DIV]) / (AVG*DIV)
        assert_eq!(curve.bins(), &[0.75, 1.75, 2.75, 3.75]);
    }

    #[test]
    fn bins_hold_means_after_avg_sweeps() {
        let mut curve = SweepCurve::<2>::new();
        for _ in 0..AVG {
            for step in 0..4 {
                curve.add_sample(step, 10.0, DIV, SCALE);
            }
        }
        // constant input of 10 must average to exactly 10 per bin
        assert_eq!(curve.bins(), &[10.0, 10.0]);
    }

    #[test]
    fn correction_is_bin_wise() {
        let mut curve = SweepCurve::<3>::new();
        for (step, value) in [9.0, 5.0, 7.0].into_iter().enumerate() {
            curve.add_sample(step, value, 1, 1.0);
        }
        let mut zero = SweepCurve::<3>::new();
        for (step, value) in [1.0, 5.0, 10.0].into_iter().enumerate() {
            zero.add_sample(step, value, 1, 1.0);
        }
        let corrected = curve.corrected(&zero.into_zero_curve());
        assert_eq!(corrected, [8.0, 0.0, -3.0]);
    }

    #[test]
    fn reset_zeroes_every_bin() {
        let mut curve = SweepCurve::<4>::new();
        for step in 0..8 {
            curve.add_sample(step, 123.0, DIV, SCALE);
        }
        curve.reset();
        assert_eq!(curve.bins(), &[0.0; 4]);
    }
}
