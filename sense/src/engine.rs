//! The acquisition engine: owns all sensing state and drives the pipeline.
//!
//! Single-task, cooperative. One call to [`Engine::run_sweep`] performs one
//! full frequency sweep; after each bounded unit of work (every frequency
//! step, and between classification phases) the renderer's rate-limited
//! gate is offered, so LED output stays smooth while acquisition is
//! synchronous. A classification cycle's outputs become visible to the
//! renderer only once the cycle completes.

use crate::classify::Classifier;
use crate::config::Tuning;
use crate::extrema::{self, ExtremaSet};
use crate::sweep::{SweepCurve, ZeroCurve};
use crate::{Clock, Mode, Renderer, Sampler, SignalGenerator};

pub struct Engine<const STEPS: usize, const BINS: usize, const TICK_HZ: u32> {
    tuning: Tuning<TICK_HZ>,
    zero: ZeroCurve<BINS>,
    sweep: SweepCurve<BINS>,
    /// Completed sweeps counted toward the current cycle, starting at 1.
    /// The cycle fires exactly when this reaches `tuning.avg`, so each
    /// cycle accumulates exactly `avg` sweeps.
    counter: u16,
    classifier: Classifier<TICK_HZ>,
    scale: f32,
    last_extrema: Option<ExtremaSet>,
    cycles: u32,
}

impl<const STEPS: usize, const BINS: usize, const TICK_HZ: u32> Engine<STEPS, BINS, TICK_HZ> {
    pub const DIV: usize = {
        assert!(BINS > 0 && STEPS % BINS == 0, "steps must divide into bins");
        STEPS / BINS
    };

    /// `zero` comes from [`crate::calibrate::capture_zero_curve`], run once
    /// before this. `start` seeds the debounce clock.
    pub fn new(tuning: Tuning<TICK_HZ>, zero: ZeroCurve<BINS>, start: crate::Instant<TICK_HZ>) -> Self {
        Self {
            scale: 1.0 / (f32::from(tuning.avg) * Self::DIV as f32),
            tuning,
            zero,
            sweep: SweepCurve::new(),
            counter: 1,
            classifier: Classifier::new(start),
            last_extrema: None,
            cycles: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.classifier.mode()
    }

    /// Extrema from the most recent classification cycle.
    pub fn last_extrema(&self) -> Option<&ExtremaSet> {
        self.last_extrema.as_ref()
    }

    /// Completed classification cycles since startup.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Accumulated bins of the in-progress cycle.
    pub fn bins(&self) -> &[f32; BINS] {
        self.sweep.bins()
    }

    /// One full sweep across all `STEPS` excitation frequencies, folding
    /// each sample into its bin. Runs the classification cycle when this
    /// sweep is the `avg`-th since the last one. Returns the new mode if a
    /// transition was accepted.
    pub fn run_sweep<G, S, C, R>(
        &mut self,
        generator: &mut G,
        sampler: &mut S,
        clock: &mut C,
        renderer: &mut R,
    ) -> Option<Mode>
    where
        G: SignalGenerator,
        S: Sampler,
        C: Clock<TICK_HZ>,
        R: Renderer<TICK_HZ>,
    {
        for step in 0..STEPS {
            generator.set_frequency_step(step);
            let value = sampler.sample();
            self.sweep.add_sample(step, f32::from(value), Self::DIV, self.scale);
            renderer.tick(clock.now());
        }
        self.on_sweep_complete(clock, renderer)
    }

    fn on_sweep_complete<C, R>(&mut self, clock: &mut C, renderer: &mut R) -> Option<Mode>
    where
        C: Clock<TICK_HZ>,
        R: Renderer<TICK_HZ>,
    {
        if self.counter < self.tuning.avg {
            self.counter += 1;
            return None;
        }

        // Phase 1: baseline subtraction
        let corrected = self.sweep.corrected(&self.zero);
        renderer.tick(clock.now());

        // Phase 2: extremum extraction
        let extrema = extrema::scan(&corrected);
        renderer.tick(clock.now());

        // Phase 3: debounced classification
        let changed = self.classifier.update(&extrema, &self.tuning, clock.now());
        if let Some(mode) = changed {
            renderer.notify_mode(mode);
        }
        self.last_extrema = Some(extrema);

        // Phase 4: reset for the next cycle
        self.counter = 1;
        self.sweep.reset();
        self.cycles = self.cycles.wrapping_add(1);

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibrate::capture_zero_curve;
    use crate::{Duration, Instant};
    use std::cell::Cell;
    use std::rc::Rc;

    const HZ: u32 = 1_000;
    const STEPS: usize = 16;
    const BINS: usize = 4;

    struct Oscillator {
        step: Rc<Cell<usize>>,
    }

    impl SignalGenerator for Oscillator {
        fn set_frequency_step(&mut self, step: usize) {
            self.step.set(step);
        }
    }

    /// Flat baseline of 100 counts, plus a per-step delta when "touched".
    struct CircuitSampler {
        step: Rc<Cell<usize>>,
        deltas: [u16; STEPS],
    }

    impl Sampler for CircuitSampler {
        fn sample(&mut self) -> u16 {
            100 + self.deltas[self.step.get()]
        }
    }

    /// Advances one millisecond per reading.
    struct TickingClock {
        now: Instant<HZ>,
    }

    impl Clock<HZ> for TickingClock {
        fn now(&mut self) -> Instant<HZ> {
            self.now += Duration::<HZ>::millis(1);
            self.now
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        modes: Vec<Mode>,
        ticks: usize,
    }

    impl Renderer<HZ> for RecordingRenderer {
        fn notify_mode(&mut self, mode: Mode) {
            self.modes.push(mode);
        }

        fn tick(&mut self, _now: Instant<HZ>) {
            self.ticks += 1;
        }
    }

    fn rig(deltas: [u16; STEPS]) -> (Oscillator, CircuitSampler) {
        let step = Rc::new(Cell::new(0));
        (
            Oscillator { step: step.clone() },
            CircuitSampler { step, deltas },
        )
    }

    fn tuning(avg: u16, debounce_ms: u32) -> Tuning<HZ> {
        Tuning {
            avg,
            debounce: Duration::<HZ>::millis(debounce_ms),
            ..Tuning::reference()
        }
    }

    fn engine(tuning: Tuning<HZ>) -> Engine<STEPS, BINS, HZ> {
        let (mut generator, mut sampler) = rig([0; STEPS]);
        let zero =
            capture_zero_curve::<STEPS, BINS, _, _>(&mut generator, &mut sampler, tuning.avg);
        Engine::new(tuning, zero, Instant::<HZ>::from_ticks(0))
    }

    #[test]
    fn cycle_fires_on_the_avg_th_sweep_and_resets() {
        // avg * DIV = 16, a power of two, so every 1/16 scaling step is
        // exact in f32 and the bins below can be compared with ==
        let mut engine = engine(tuning(4, 0));
        // touch-like bump: three bins above baseline
        let (mut generator, mut sampler) = rig([40, 40, 40, 40, 30, 30, 30, 30, 10, 10, 10, 10, 0, 0, 0, 0]);
        let mut clock = TickingClock {
            now: Instant::<HZ>::from_ticks(0),
        };
        let mut renderer = RecordingRenderer::default();

        for _ in 0..3 {
            assert_eq!(
                engine.run_sweep(&mut generator, &mut sampler, &mut clock, &mut renderer),
                None
            );
        }
        // fourth sweep completes the cycle
        let changed = engine.run_sweep(&mut generator, &mut sampler, &mut clock, &mut renderer);
        assert_eq!(changed, Some(Mode::Touch));
        assert_eq!(engine.mode(), Mode::Touch);
        assert_eq!(renderer.modes, vec![Mode::Touch]);

        // post-cycle: buffer zeroed, extrema published
        assert_eq!(engine.bins(), &[0.0; BINS]);
        let extrema = engine.last_extrema().unwrap();
        assert_eq!(extrema.maxs, [40.0, 30.0, 10.0]);
        assert_eq!(extrema.arg_maxs, [0, 1, 2]);
    }

    #[test]
    fn grasp_amplitude_classifies_as_grab() {
        let mut engine = engine(tuning(2, 0));
        let (mut generator, mut sampler) = rig([80; STEPS]);
        let mut clock = TickingClock {
            now: Instant::<HZ>::from_ticks(0),
        };
        let mut renderer = RecordingRenderer::default();

        for _ in 0..2 {
            engine.run_sweep(&mut generator, &mut sampler, &mut clock, &mut renderer);
        }
        assert_eq!(engine.mode(), Mode::Grab);
    }

    #[test]
    fn renderer_gate_is_offered_every_step() {
        let mut engine = engine(tuning(1, 0));
        let (mut generator, mut sampler) = rig([0; STEPS]);
        let mut clock = TickingClock {
            now: Instant::<HZ>::from_ticks(0),
        };
        let mut renderer = RecordingRenderer::default();

        engine.run_sweep(&mut generator, &mut sampler, &mut clock, &mut renderer);
        // one tick per step plus the between-phase ticks of the cycle
        assert!(renderer.ticks >= STEPS);
    }

    #[test]
    fn debounce_holds_the_mode_across_cycles() {
        // avg=1, so every sweep classifies; clock advances ~18ms per sweep
        let mut engine = engine(tuning(1, 5_000));
        let (mut generator, mut sampler) = rig([80; STEPS]);
        let mut clock = TickingClock {
            now: Instant::<HZ>::from_ticks(0),
        };
        let mut renderer = RecordingRenderer::default();

        // well inside the boot debounce window: no transition yet
        engine.run_sweep(&mut generator, &mut sampler, &mut clock, &mut renderer);
        assert_eq!(engine.mode(), Mode::None);

        // sweep until the window elapses; exactly one transition happens
        for _ in 0..400 {
            engine.run_sweep(&mut generator, &mut sampler, &mut clock, &mut renderer);
        }
        assert_eq!(engine.mode(), Mode::Grab);
        assert_eq!(renderer.modes, vec![Mode::Grab]);
    }

    #[test]
    fn untouched_surface_stays_in_mode_none() {
        let mut engine = engine(tuning(2, 0));
        let (mut generator, mut sampler) = rig([0; STEPS]);
        let mut clock = TickingClock {
            now: Instant::<HZ>::from_ticks(0),
        };
        let mut renderer = RecordingRenderer::default();

        for _ in 0..10 {
            engine.run_sweep(&mut generator, &mut sampler, &mut clock, &mut renderer);
        }
        assert_eq!(engine.mode(), Mode::None);
        assert!(renderer.modes.is_empty());
    }
}
