//! Fake "analysis" progress bar.
//!
//! Progress grows by an irregular random step on every tick. The tick after
//! progress reaches 100 is the one that finishes the run, so the bar is seen
//! full (or overshooting) for one period before the result appears.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scheduler::TimerHandle;
use crate::error::ValidationError;

pub const COMPLETE_AT: u32 = 100;

/// Status line shown under the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    ParsingEmotions,
    ComparingModels,
    GeneratingPortrait,
}

impl AnalysisPhase {
    pub fn from_progress(progress: u32) -> Self {
        match progress {
            0..=29 => AnalysisPhase::ParsingEmotions,
            30..=69 => AnalysisPhase::ComparingModels,
            _ => AnalysisPhase::GeneratingPortrait,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AnalysisPhase::ParsingEmotions => "parsing emotional circuits",
            AnalysisPhase::ComparingModels => "comparing interpersonal models",
            AnalysisPhase::GeneratingPortrait => "generating final portrait",
        }
    }
}

/// Inclusive bounds of one random progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementRange {
    pub min: u32,
    pub max: u32,
}

impl IncrementRange {
    /// Steps must be at least 1 so every tick moves the bar, and the range
    /// must not be empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min == 0 {
            return Err(ValidationError::InvalidValue {
                field: "increments.min".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.min > self.max {
            return Err(ValidationError::InvalidValue {
                field: "increments.max".into(),
                message: format!("must not be smaller than min ({})", self.min),
            });
        }
        Ok(())
    }
}

impl Default for IncrementRange {
    fn default() -> Self {
        Self { min: 1, max: 15 }
    }
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Progressed { progress: u32, step: u32 },
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzingSimulator {
    progress: u32,
    increments: IncrementRange,
    timer: Option<TimerHandle>,
}

impl AnalyzingSimulator {
    pub fn new(increments: IncrementRange) -> Self {
        Self {
            progress: 0,
            increments,
            timer: None,
        }
    }

    /// Raw counter; may overshoot 100 by up to one step.
    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// Progress clamped for rendering.
    pub fn display_progress(&self) -> u32 {
        self.progress.min(COMPLETE_AT)
    }

    pub fn phase(&self) -> AnalysisPhase {
        AnalysisPhase::from_progress(self.progress)
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Reset to zero and remember the tick timer that now owns this run.
    pub fn begin(&mut self, timer: TimerHandle) {
        self.progress = 0;
        self.timer = Some(timer);
    }

    /// Drop the timer handle, returning it so the caller can cancel it.
    pub fn stop(&mut self) -> Option<TimerHandle> {
        self.timer.take()
    }

    pub fn reset(&mut self) -> Option<TimerHandle> {
        self.progress = 0;
        self.stop()
    }

    /// Advance by one tick. Once progress has reached 100 the run finishes
    /// and the counter is pinned to 100.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> TickOutcome {
        if self.progress >= COMPLETE_AT {
            self.progress = COMPLETE_AT;
            return TickOutcome::Finished;
        }
        let step = rng.gen_range(self.increments.min..=self.increments.max);
        self.progress = self.progress.saturating_add(step);
        TickOutcome::Progressed {
            progress: self.progress,
            step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    #[test]
    fn phase_thresholds() {
        assert_eq!(AnalysisPhase::from_progress(0), AnalysisPhase::ParsingEmotions);
        assert_eq!(AnalysisPhase::from_progress(29), AnalysisPhase::ParsingEmotions);
        assert_eq!(AnalysisPhase::from_progress(30), AnalysisPhase::ComparingModels);
        assert_eq!(AnalysisPhase::from_progress(69), AnalysisPhase::ComparingModels);
        assert_eq!(AnalysisPhase::from_progress(70), AnalysisPhase::GeneratingPortrait);
        assert_eq!(AnalysisPhase::from_progress(140), AnalysisPhase::GeneratingPortrait);
    }

    #[test]
    fn runs_until_finished() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let mut sim = AnalyzingSimulator::new(IncrementRange::default());
        let mut last = 0;
        let mut ticks = 0;
        loop {
            ticks += 1;
            match sim.tick(&mut rng) {
                TickOutcome::Progressed { progress, step } => {
                    assert!((1..=15).contains(&step));
                    assert!(progress > last);
                    last = progress;
                }
                TickOutcome::Finished => break,
            }
        }
        // 100 / 15 rounds up to 7 steps, plus the finishing tick.
        assert!(ticks >= 8);
        assert_eq!(sim.progress(), 100);
    }

    #[test]
    fn display_is_clamped() {
        let mut sim = AnalyzingSimulator::new(IncrementRange { min: 60, max: 60 });
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        sim.tick(&mut rng);
        sim.tick(&mut rng);
        assert_eq!(sim.progress(), 120);
        assert_eq!(sim.display_progress(), 100);
    }

    #[test]
    fn increment_range_validation() {
        assert!(IncrementRange::default().validate().is_ok());
        assert!(IncrementRange { min: 5, max: 5 }.validate().is_ok());

        let err = IncrementRange { min: 0, max: 3 }.validate().unwrap_err();
        assert!(err.to_string().contains("increments.min"));
        let err = IncrementRange { min: 16, max: 15 }.validate().unwrap_err();
        assert!(err.to_string().contains("increments.max"));
    }

    proptest! {
        #[test]
        fn every_step_is_within_range(seed in any::<u64>(), min in 1u32..10, extra in 0u32..20) {
            let range = IncrementRange { min, max: min + extra };
            let mut rng = Mcg128Xsl64::seed_from_u64(seed);
            let mut sim = AnalyzingSimulator::new(range);
            while let TickOutcome::Progressed { step, .. } = sim.tick(&mut rng) {
                prop_assert!(step >= range.min && step <= range.max);
            }
            prop_assert_eq!(sim.display_progress(), 100);
        }
    }
}
