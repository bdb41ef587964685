//! Cosmetic trait bars on the result screen.
//!
//! Values sit at zero when the result stage opens and are filled after a
//! short settle delay so the bars can animate out of their rest state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scheduler::TimerHandle;

/// Half-open range `[min, max)` a stat is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatRange {
    pub min: u8,
    pub max: u8,
}

impl StatRange {
    pub fn contains(&self, value: u8) -> bool {
        value >= self.min && value < self.max
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> u8 {
        rng.gen_range(self.min..self.max)
    }
}

pub const EMOTION_RANGE: StatRange = StatRange { min: 60, max: 100 };
pub const SOCIAL_RANGE: StatRange = StatRange { min: 20, max: 100 };
pub const PURITY_RANGE: StatRange = StatRange { min: 10, max: 100 };
pub const DEFENSE_RANGE: StatRange = StatRange { min: 30, max: 100 };

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayStats {
    pub emotion: u8,
    pub social: u8,
    pub purity: u8,
    pub defense: u8,
}

impl DisplayStats {
    /// Four independent draws, one per trait.
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self {
            emotion: EMOTION_RANGE.draw(rng),
            social: SOCIAL_RANGE.draw(rng),
            purity: PURITY_RANGE.draw(rng),
            defense: DEFENSE_RANGE.draw(rng),
        }
    }

    pub fn is_at_rest(&self) -> bool {
        *self == Self::default()
    }

    /// Every value inside its documented range.
    pub fn in_range(&self) -> bool {
        EMOTION_RANGE.contains(self.emotion)
            && SOCIAL_RANGE.contains(self.social)
            && PURITY_RANGE.contains(self.purity)
            && DEFENSE_RANGE.contains(self.defense)
    }

    /// `(label, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> {
        [
            ("emotion", self.emotion),
            ("social", self.social),
            ("purity", self.purity),
            ("defense", self.defense),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultStatsSimulator {
    stats: DisplayStats,
    timer: Option<TimerHandle>,
}

impl ResultStatsSimulator {
    pub fn stats(&self) -> DisplayStats {
        self.stats
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Back to rest and waiting on `timer`.
    pub fn begin(&mut self, timer: TimerHandle) {
        self.stats = DisplayStats::default();
        self.timer = Some(timer);
    }

    /// Settle delay elapsed. Consumes the timer so the draw happens once.
    pub fn reveal<R: Rng>(&mut self, rng: &mut R) -> Option<DisplayStats> {
        self.timer.take()?;
        self.stats = DisplayStats::draw(rng);
        Some(self.stats)
    }

    pub fn reset(&mut self) -> Option<TimerHandle> {
        self.stats = DisplayStats::default();
        self.timer.take()
    }
}
