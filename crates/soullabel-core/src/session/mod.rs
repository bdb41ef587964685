mod analyzing;
mod controller;
mod profile;
pub mod scheduler;
mod stage;
mod stats;

pub use analyzing::{AnalysisPhase, AnalyzingSimulator, IncrementRange, TickOutcome, COMPLETE_AT};
pub use controller::{QuizSession, SessionSettings};
pub use profile::{Gender, UserProfile};
pub use scheduler::{Scheduler, TimerHandle, TimerTask};
pub use stage::Stage;
pub use stats::{
    DisplayStats, ResultStatsSimulator, StatRange, DEFENSE_RANGE, EMOTION_RANGE, PURITY_RANGE,
    SOCIAL_RANGE,
};
