//! Non-interactive run on the session clock. Nothing sleeps.

use std::path::Path;

use clap::Args;
use soullabel_core::{Event, Gender, QuizSession, Stage};

use super::{load_config, new_session};

/// Upper bound on analyzing ticks; progress grows by at least one per tick.
const MAX_TICKS: usize = 1_000;

#[derive(Args)]
pub struct SimulateArgs {
    /// Nickname to submit
    #[arg(long)]
    nickname: String,
    /// male, female or other
    #[arg(long)]
    gender: Gender,
    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Print every event as a JSON line instead of the final snapshot
    #[arg(long)]
    json: bool,
}

pub fn run(path: Option<&Path>, args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let mut session = new_session(&config, args.seed)?;
    let events = simulate(&mut session, &args.nickname, args.gender)?;

    if args.json {
        for event in &events {
            println!("{}", serde_json::to_string(event)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    }
    Ok(())
}

/// Drive a session from Welcome to revealed stats, always picking the first
/// option. Returns every event in order.
fn simulate(
    session: &mut QuizSession,
    nickname: &str,
    gender: Gender,
) -> Result<Vec<Event>, Box<dyn std::error::Error>> {
    let settings = *session.settings();
    let mut events = Vec::new();

    events.extend(session.start());
    while session.stage() == Stage::Quiz {
        let first = session
            .current_question()
            .and_then(|q| q.options.first())
            .map(|o| o.id.clone())
            .ok_or("question without options")?;
        events.extend(session.answer_with(&first));
        events.extend(session.advance(settings.answer_delay_ms));
    }

    events.extend(session.set_nickname(nickname));
    events.extend(session.set_gender(gender));
    match session.submit_profile() {
        Some(event) => events.push(event),
        None => return Err("profile incomplete: nickname must not be empty".into()),
    }

    for _ in 0..MAX_TICKS {
        events.extend(session.advance(settings.analyzing_tick_ms));
        if session.stage() != Stage::Analyzing {
            break;
        }
    }
    if session.stage() != Stage::Result {
        return Err("analysis did not finish".into());
    }
    events.extend(session.advance(settings.stats_settle_ms));
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soullabel_core::{QuizData, SessionSettings};

    fn session(seed: u64) -> QuizSession {
        QuizSession::new(QuizData::builtin().unwrap(), SessionSettings::default(), Some(seed))
            .unwrap()
    }

    #[test]
    fn simulate_ends_with_revealed_stats() {
        let mut s = session(10);
        let events = simulate(&mut s, "Mia", Gender::Female).unwrap();
        assert_eq!(s.stage(), Stage::Result);
        assert!(matches!(events.last(), Some(Event::StatsRevealed { .. })));
        assert!(matches!(events.first(), Some(Event::QuizStarted { .. })));
    }

    #[test]
    fn blank_nickname_is_an_error() {
        let mut s = session(10);
        let err = simulate(&mut s, "  ", Gender::Male).unwrap_err();
        assert!(err.to_string().contains("profile incomplete"));
        assert_eq!(s.stage(), Stage::Profile);
    }
}
