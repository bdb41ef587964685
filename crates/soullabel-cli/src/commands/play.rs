//! Interactive terminal run.
//!
//! Reads answers line by line and lets real time pass between prompts so
//! the delays and the progress bar play out as they would on screen.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use clap::Args;
use soullabel_core::{Gender, QuizSession, Stage};

use super::{load_config, new_session};
use crate::render;

/// Slice of time handed to the session per wait step.
const FRAME_MS: u64 = 50;

#[derive(Args)]
pub struct PlayArgs {
    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Skip real-time waiting (time still passes for the session)
    #[arg(long)]
    instant: bool,
}

/// Real or skipped waiting between frames.
struct Pacer {
    instant: bool,
}

impl Pacer {
    fn pause(&self, ms: u64) {
        if !self.instant {
            std::thread::sleep(Duration::from_millis(ms));
        }
    }

    /// Advance the session frame by frame until `done` holds.
    fn until(&self, session: &mut QuizSession, mut done: impl FnMut(&QuizSession) -> bool) {
        while !done(session) {
            self.pause(FRAME_MS);
            session.advance(FRAME_MS);
        }
    }
}

pub fn run(path: Option<&Path>, args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let mut session = new_session(&config, args.seed)?;
    let pacer = Pacer {
        instant: args.instant,
    };
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play(&mut session, &pacer, stdin.lock(), stdout.lock())
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> std::io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn play<R: BufRead, W: Write>(
    session: &mut QuizSession,
    pacer: &Pacer,
    mut input: R,
    mut out: W,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        match session.stage() {
            Stage::Welcome => {
                writeln!(out, "{}", render::welcome(session))?;
                match prompt(&mut input, &mut out, "Press Enter to begin (q to quit) ")? {
                    Some(line) if line != "q" => {
                        session.start();
                    }
                    _ => return Ok(()),
                }
            }
            Stage::Quiz => {
                let Some(question) = session.current_question().cloned() else {
                    return Err("quiz has no current question".into());
                };
                writeln!(out, "\n{}", render::question(session, &question))?;
                let Some(line) = prompt(&mut input, &mut out, "> ")? else {
                    return Ok(());
                };
                // Accept either the option number or its id.
                let option_id = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| question.options.get(i))
                    .map(|o| o.id.clone())
                    .unwrap_or(line);
                if session.answer_with(&option_id).is_none() {
                    writeln!(out, "Pick one of 1-{}.", question.options.len())?;
                    continue;
                }
                pacer.until(session, |s| !s.is_advance_pending());
            }
            Stage::Profile => {
                writeln!(out, "\nLast step: tell us about yourself.")?;
                let Some(nickname) = prompt(&mut input, &mut out, "Nickname: ")? else {
                    return Ok(());
                };
                session.set_nickname(nickname);
                let Some(gender) = prompt(&mut input, &mut out, "Gender (male/female/other): ")?
                else {
                    return Ok(());
                };
                match gender.parse::<Gender>() {
                    Ok(gender) => {
                        session.set_gender(gender);
                    }
                    Err(e) => writeln!(out, "{e}")?,
                }
                if session.submit_profile().is_none() {
                    writeln!(out, "Both a nickname and a gender are needed.")?;
                }
            }
            Stage::Analyzing => {
                writeln!(out, "\nAnalyzing your soul sample...")?;
                while session.stage() == Stage::Analyzing {
                    write!(out, "\r{}", render::analyzing(session))?;
                    out.flush()?;
                    pacer.pause(FRAME_MS);
                    session.advance(FRAME_MS);
                }
                writeln!(out)?;
            }
            Stage::Result => {
                pacer.until(session, |s| !s.stats().is_at_rest());
                writeln!(out, "{}", render::result(session))?;
                loop {
                    match prompt(&mut input, &mut out, "[s]hare  [r]estart  [q]uit ")?.as_deref() {
                        Some("s") => match session.share() {
                            Ok(()) => writeln!(out, "Shared.")?,
                            Err(e) => writeln!(out, "{e}!")?,
                        },
                        Some("r") => {
                            session.restart();
                            break;
                        }
                        Some("q") | None => return Ok(()),
                        Some(_) => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soullabel_core::{QuizData, SessionSettings};

    fn session() -> QuizSession {
        QuizSession::new(QuizData::builtin().unwrap(), SessionSettings::default(), Some(1))
            .unwrap()
    }

    fn script(session: &mut QuizSession, lines: &[&str]) -> String {
        let input = lines.join("\n") + "\n";
        let mut out = Vec::new();
        play(session, &Pacer { instant: true }, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn scripted_run_reaches_result_and_shares() {
        let mut s = session();
        let mut lines = vec![""];
        lines.extend(std::iter::repeat("1").take(s.question_count()));
        lines.extend(["Mia", "female", "s", "q"]);

        let out = script(&mut s, &lines);
        assert_eq!(s.stage(), Stage::Result);
        assert!(out.contains("Mia's true composition"));
        assert!(out.contains("share is not implemented yet!"));
        assert!(s.stats().in_range());
    }

    #[test]
    fn invalid_option_is_reprompted() {
        let mut s = session();
        let out = script(&mut s, &["", "9", "b"]);
        assert!(out.contains("Pick one of 1-4."));
        assert_eq!(s.question_index(), 1);
    }

    #[test]
    fn restart_returns_to_welcome() {
        let mut s = session();
        let mut lines = vec![""];
        lines.extend(std::iter::repeat("2").take(s.question_count()));
        lines.extend(["Mia", "other", "r", "q"]);

        script(&mut s, &lines);
        assert_eq!(s.stage(), Stage::Welcome);
        assert!(s.profile().nickname.is_empty());
    }
}
