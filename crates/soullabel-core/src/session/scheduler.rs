//! Virtual-clock timer queue.
//!
//! The scheduler owns no thread. Time only moves when the caller hands it a
//! target instant, and due timers are popped one at a time so that work done
//! by one timer (cancelling another) takes effect before the next is looked
//! at.
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = Scheduler::new();
//! let handle = scheduler.schedule_repeating(300, TimerTask::AnalyzingTick);
//! let target = scheduler.now_ms() + 1000;
//! while let Some((fired, task)) = scheduler.pop_due(target) {
//!     // dispatch, possibly scheduler.cancel(handle)
//! }
//! scheduler.advance_to(target);
//! ```

use serde::{Deserialize, Serialize};

/// Work a timer performs when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerTask {
    /// Move the quiz to the next question after the answer delay.
    AdvanceQuestion,
    /// One step of the analyzing progress bar.
    AnalyzingTick,
    /// Result stage settle delay elapsed; reveal the stats.
    RevealStats,
}

/// Opaque, never-reused identifier for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry {
    handle: TimerHandle,
    task: TimerTask,
    due_ms: u64,
    period_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Fire `task` once, `delay_ms` from now.
    pub fn schedule_once(&mut self, delay_ms: u64, task: TimerTask) -> TimerHandle {
        self.push(delay_ms, task, None)
    }

    /// Fire `task` every `period_ms` until cancelled. A zero period is
    /// treated as 1 ms so the queue always makes progress.
    pub fn schedule_repeating(&mut self, period_ms: u64, task: TimerTask) -> TimerHandle {
        let period_ms = period_ms.max(1);
        self.push(period_ms, task, Some(period_ms))
    }

    /// Remove a pending timer. Returns `false` if it already fired (one-shot)
    /// or was cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// The clock moves to the timer's due time. Repeating timers are
    /// re-armed one period later; one-shot timers are removed. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerHandle, TimerTask)> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.handle.0))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[pos];
        self.now_ms = self.now_ms.max(entry.due_ms);
        let fired = (entry.handle, entry.task);
        let period_ms = entry.period_ms;
        match period_ms {
            Some(period) => entry.due_ms = entry.due_ms.saturating_add(period),
            None => {
                self.entries.remove(pos);
            }
        }
        Some(fired)
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn push(&mut self, delay_ms: u64, task: TimerTask, period_ms: Option<u64>) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            task,
            due_ms: self.now_ms.saturating_add(delay_ms),
            period_ms,
        });
        handle
    }
}
