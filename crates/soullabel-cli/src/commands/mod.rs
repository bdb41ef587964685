pub mod config;
pub mod play;
pub mod questions;
pub mod simulate;

use std::path::Path;

use soullabel_core::{Config, QuizData, QuizSession};
use tracing::debug;

/// Config from an explicit `--config` path, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) if path.exists() => Config::load_from(path)?,
        Some(path) => {
            debug!(path = %path.display(), "config file missing, using defaults");
            Config::default()
        }
        None => Config::load()?,
    };
    Ok(config)
}

pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    Ok(())
}

/// Build a session from config; `seed` overrides the configured seed.
pub fn new_session(
    config: &Config,
    seed: Option<u64>,
) -> Result<QuizSession, Box<dyn std::error::Error>> {
    let data: QuizData = config.quiz_data()?;
    let seed = seed.or(config.simulation.seed);
    Ok(QuizSession::new(data, config.session_settings(), seed)?)
}
