//! Session events.
//!
//! Commands and fired timers report what changed as `Event` values. Each one
//! carries a wall-clock timestamp and serializes with a `type` tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{AnalysisPhase, DisplayStats, Gender, Stage};

/// Every state change in a session produces an Event.
/// The presentation layer renders from snapshots and reacts to events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    QuizStarted {
        question_count: usize,
        at: DateTime<Utc>,
    },
    /// An option was picked; the next question follows after the answer delay.
    AnswerAccepted {
        question_index: usize,
        at: DateTime<Utc>,
    },
    QuestionAdvanced {
        question_index: usize,
        at: DateTime<Utc>,
    },
    /// The view should scroll back to the top of the page.
    ScrollToTop {
        at: DateTime<Utc>,
    },
    StageChanged {
        from: Stage,
        to: Stage,
        at: DateTime<Utc>,
    },
    ProfileUpdated {
        nickname: String,
        gender: Option<Gender>,
        complete: bool,
        at: DateTime<Utc>,
    },
    AnalysisProgressed {
        progress: u32,
        display_progress: u32,
        phase: AnalysisPhase,
        at: DateTime<Utc>,
    },
    ResultSelected {
        tag: String,
        at: DateTime<Utc>,
    },
    StatsRevealed {
        stats: DisplayStats,
        at: DateTime<Utc>,
    },
    SessionRestarted {
        from: Stage,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        stage: Stage,
        question_index: usize,
        question_count: usize,
        nickname: String,
        gender: Option<Gender>,
        analyzing_progress: u32,
        analysis_message: Option<String>,
        result_tag: Option<String>,
        stats: DisplayStats,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Snake-case variant name, as written in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::QuizStarted { .. } => "quiz_started",
            Event::AnswerAccepted { .. } => "answer_accepted",
            Event::QuestionAdvanced { .. } => "question_advanced",
            Event::ScrollToTop { .. } => "scroll_to_top",
            Event::StageChanged { .. } => "stage_changed",
            Event::ProfileUpdated { .. } => "profile_updated",
            Event::AnalysisProgressed { .. } => "analysis_progressed",
            Event::ResultSelected { .. } => "result_selected",
            Event::StatsRevealed { .. } => "stats_revealed",
            Event::SessionRestarted { .. } => "session_restarted",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
