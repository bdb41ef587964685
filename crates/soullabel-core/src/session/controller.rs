//! Quiz session controller.
//!
//! The session is a stage machine driven by two kinds of input: commands
//! from the user and elapsed time. It owns no thread. The caller is
//! responsible for calling `advance()` with the time that passed.
//!
//! ## Stage Transitions
//!
//! ```text
//! Welcome -> Quiz -> Profile -> Analyzing -> Result
//!    ^                                          |
//!    +---------------- restart (any) -----------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = QuizSession::new(QuizData::builtin()?, SessionSettings::default(), None)?;
//! session.start();
//! session.answer();
//! // In a loop:
//! let events = session.advance(50);
//! ```
//!
//! Commands return `None` when their preconditions are not met. Nothing is
//! surfaced to the user in that case.

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, trace, warn};

use super::analyzing::{AnalysisPhase, AnalyzingSimulator, IncrementRange, TickOutcome};
use super::profile::{Gender, UserProfile};
use super::scheduler::{Scheduler, TimerHandle, TimerTask};
use super::stage::Stage;
use super::stats::{DisplayStats, ResultStatsSimulator};
use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::quiz::{Question, QuizData};

/// Delays and random bounds a session runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub answer_delay_ms: u64,
    pub analyzing_tick_ms: u64,
    pub stats_settle_ms: u64,
    pub increments: IncrementRange,
}

impl SessionSettings {
    /// The tick period must be non-zero and the increment range usable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.analyzing_tick_ms == 0 {
            return Err(ValidationError::InvalidValue {
                field: "analyzing_tick_ms".into(),
                message: "must be at least 1".into(),
            });
        }
        self.increments.validate()
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            answer_delay_ms: 200,
            analyzing_tick_ms: 300,
            stats_settle_ms: 100,
            increments: IncrementRange::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    data: QuizData,
    settings: SessionSettings,
    rng: Mcg128Xsl64,
    scheduler: Scheduler,
    stage: Stage,
    question_index: usize,
    /// One-shot timer that moves to the next question.
    pending_advance: Option<TimerHandle>,
    profile: UserProfile,
    analyzing: AnalyzingSimulator,
    result_tag: Option<String>,
    stats: ResultStatsSimulator,
}

impl QuizSession {
    /// Create a session on the Welcome stage.
    ///
    /// With `seed` every random draw (progress steps, result tag, stats) is
    /// reproducible; without it the generator is seeded from entropy.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `data` has no questions, an empty
    /// question, or no result tags, or if `settings` has a zero tick period
    /// or an increment range that is empty or allows zero steps.
    pub fn new(data: QuizData, settings: SessionSettings, seed: Option<u64>) -> Result<Self> {
        data.validate()?;
        settings.validate()?;
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Ok(Self {
            data,
            settings,
            rng,
            scheduler: Scheduler::new(),
            stage: Stage::Welcome,
            question_index: 0,
            pending_advance: None,
            profile: UserProfile::default(),
            analyzing: AnalyzingSimulator::new(settings.increments),
            result_tag: None,
            stats: ResultStatsSimulator::default(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn data(&self) -> &QuizData {
        &self.data
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn question_count(&self) -> usize {
        self.data.question_count()
    }

    /// The question on screen; `None` outside the Quiz stage.
    pub fn current_question(&self) -> Option<&Question> {
        if self.stage != Stage::Quiz {
            return None;
        }
        self.data.question(self.question_index)
    }

    pub fn is_advance_pending(&self) -> bool {
        self.pending_advance.is_some()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn analyzing_progress(&self) -> u32 {
        self.analyzing.progress()
    }

    /// 0 ..= 100, for drawing the bar.
    pub fn display_progress(&self) -> u32 {
        self.analyzing.display_progress()
    }

    pub fn analysis_phase(&self) -> AnalysisPhase {
        self.analyzing.phase()
    }

    pub fn result_tag(&self) -> Option<&str> {
        self.result_tag.as_deref()
    }

    pub fn stats(&self) -> DisplayStats {
        self.stats.stats()
    }

    /// Milliseconds of session time that have passed through `advance()`.
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            stage: self.stage,
            question_index: self.question_index,
            question_count: self.question_count(),
            nickname: self.profile.nickname.clone(),
            gender: self.profile.gender,
            analyzing_progress: self.display_progress(),
            analysis_message: (self.stage == Stage::Analyzing)
                .then(|| self.analysis_phase().message().to_string()),
            result_tag: self.result_tag.clone(),
            stats: self.stats(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.stage != Stage::Welcome {
            warn!(stage = %self.stage, "start rejected outside welcome");
            return None;
        }
        self.question_index = 0;
        self.transition(Stage::Quiz);
        Some(Event::QuizStarted {
            question_count: self.question_count(),
            at: Utc::now(),
        })
    }

    /// Register an answer to the current question.
    ///
    /// Before the last question the next one appears after the answer
    /// delay; answers given while that delay runs are ignored. On the last
    /// question the session moves to Profile immediately.
    pub fn answer(&mut self) -> Option<Event> {
        if self.stage != Stage::Quiz {
            warn!(stage = %self.stage, "answer rejected outside quiz");
            return None;
        }
        if self.pending_advance.is_some() {
            debug!(index = self.question_index, "answer ignored, advance pending");
            return None;
        }
        if self.question_index < self.data.last_index() {
            let handle = self
                .scheduler
                .schedule_once(self.settings.answer_delay_ms, TimerTask::AdvanceQuestion);
            self.pending_advance = Some(handle);
            Some(Event::AnswerAccepted {
                question_index: self.question_index,
                at: Utc::now(),
            })
        } else {
            Some(self.transition(Stage::Profile))
        }
    }

    /// Answer with a specific option. The option must exist on the current
    /// question; which one it is has no further effect.
    pub fn answer_with(&mut self, option_id: &str) -> Option<Event> {
        let known = self
            .current_question()
            .is_some_and(|q| q.option(option_id).is_some());
        if !known {
            debug!(option_id, "answer rejected, unknown option");
            return None;
        }
        self.answer()
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) -> Option<Event> {
        if self.stage != Stage::Profile {
            warn!(stage = %self.stage, "nickname rejected outside profile");
            return None;
        }
        self.profile.set_nickname(nickname);
        Some(self.profile_updated())
    }

    pub fn set_gender(&mut self, gender: Gender) -> Option<Event> {
        if self.stage != Stage::Profile {
            warn!(stage = %self.stage, "gender rejected outside profile");
            return None;
        }
        self.profile.set_gender(gender);
        Some(self.profile_updated())
    }

    /// Start the analysis. Rejected unless both profile fields are filled.
    pub fn submit_profile(&mut self) -> Option<Event> {
        if self.stage != Stage::Profile {
            warn!(stage = %self.stage, "submit rejected outside profile");
            return None;
        }
        if !self.profile.is_complete() {
            debug!("submit rejected, profile incomplete");
            return None;
        }
        let event = self.transition(Stage::Analyzing);
        let tick = self
            .scheduler
            .schedule_repeating(self.settings.analyzing_tick_ms, TimerTask::AnalyzingTick);
        self.analyzing.begin(tick);
        Some(event)
    }

    /// Back to Welcome from anywhere. Every timer the session owns is
    /// cancelled before state is cleared, so nothing from the old run fires
    /// later.
    pub fn restart(&mut self) -> Option<Event> {
        let from = self.stage;
        let handles = [
            self.pending_advance.take(),
            self.analyzing.reset(),
            self.stats.reset(),
        ];
        for handle in handles.into_iter().flatten() {
            self.scheduler.cancel(handle);
        }

        self.question_index = 0;
        self.profile = UserProfile::default();
        self.result_tag = None;
        self.stage = Stage::Welcome;
        debug!(from = %from, "session restarted");
        Some(Event::SessionRestarted {
            from,
            at: Utc::now(),
        })
    }

    /// Sharing is shown on the result screen but does nothing yet.
    ///
    /// # Errors
    ///
    /// Always returns [`CoreError::NotImplemented`].
    pub fn share(&self) -> Result<()> {
        Err(CoreError::NotImplemented { action: "share" })
    }

    /// Let `elapsed_ms` of time pass, firing every timer that falls due, in
    /// order. Returns the events they produced.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<Event> {
        let target = self.scheduler.now_ms().saturating_add(elapsed_ms);
        let mut events = Vec::new();
        while let Some((handle, task)) = self.scheduler.pop_due(target) {
            self.fire(handle, task, &mut events);
        }
        self.scheduler.advance_to(target);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn fire(&mut self, handle: TimerHandle, task: TimerTask, events: &mut Vec<Event>) {
        match task {
            TimerTask::AdvanceQuestion => {
                if self.stage != Stage::Quiz || self.pending_advance != Some(handle) {
                    trace!(?handle, "stale question advance dropped");
                    return;
                }
                self.pending_advance = None;
                self.question_index = (self.question_index + 1).min(self.data.last_index());
                events.push(Event::QuestionAdvanced {
                    question_index: self.question_index,
                    at: Utc::now(),
                });
                events.push(Event::ScrollToTop { at: Utc::now() });
            }
            TimerTask::AnalyzingTick => {
                if self.stage != Stage::Analyzing || self.analyzing.timer() != Some(handle) {
                    trace!(?handle, "stale analyzing tick dropped");
                    self.scheduler.cancel(handle);
                    return;
                }
                match self.analyzing.tick(&mut self.rng) {
                    TickOutcome::Progressed { progress, step } => {
                        trace!(progress, step, "analyzing tick");
                        events.push(Event::AnalysisProgressed {
                            progress,
                            display_progress: self.analyzing.display_progress(),
                            phase: self.analyzing.phase(),
                            at: Utc::now(),
                        });
                    }
                    TickOutcome::Finished => {
                        if let Some(tick) = self.analyzing.stop() {
                            self.scheduler.cancel(tick);
                        }
                        let tag = self.draw_tag();
                        events.push(Event::ResultSelected {
                            tag: tag.clone(),
                            at: Utc::now(),
                        });
                        self.result_tag = Some(tag);
                        events.push(self.transition(Stage::Result));
                        let settle = self
                            .scheduler
                            .schedule_once(self.settings.stats_settle_ms, TimerTask::RevealStats);
                        self.stats.begin(settle);
                    }
                }
            }
            TimerTask::RevealStats => {
                if self.stage != Stage::Result || self.stats.timer() != Some(handle) {
                    trace!(?handle, "stale stats reveal dropped");
                    return;
                }
                if let Some(stats) = self.stats.reveal(&mut self.rng) {
                    events.push(Event::StatsRevealed {
                        stats,
                        at: Utc::now(),
                    });
                }
            }
        }
    }

    /// Uniform draw from the tag list; answers play no part.
    fn draw_tag(&mut self) -> String {
        let index = self.rng.gen_range(0..self.data.tags.len());
        self.data.tags[index].clone()
    }

    fn profile_updated(&self) -> Event {
        Event::ProfileUpdated {
            nickname: self.profile.nickname.clone(),
            gender: self.profile.gender,
            complete: self.profile.is_complete(),
            at: Utc::now(),
        }
    }

    fn transition(&mut self, to: Stage) -> Event {
        let from = self.stage;
        self.stage = to;
        debug!(from = %from, to = %to, "stage transition");
        Event::StageChanged {
            from,
            to,
            at: Utc::now(),
        }
    }
}
