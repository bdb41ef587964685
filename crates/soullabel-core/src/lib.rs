//! # Soul Label Core Library
//!
//! This library provides the logic behind the Soul Label personality quiz:
//! a fixed run of multiple-choice questions, a two-field profile, a fake
//! "analyzing" progress bar and a randomly drawn result label with cosmetic
//! trait bars. The CLI binary is a thin presentation layer over it.
//!
//! ## Architecture
//!
//! - **Session**: A stage machine (`Welcome -> Quiz -> Profile -> Analyzing
//!   -> Result`) that requires the caller to periodically invoke
//!   `advance()` so its timers can fire
//! - **Scheduler**: Virtual-clock timer queue with explicit cancel handles
//! - **Quiz data**: Bundled TOML questions and result tags, replaceable
//! - **Configuration**: TOML file with timing and randomness settings
//!
//! ## Key Components
//!
//! - [`QuizSession`]: Core session state machine
//! - [`QuizData`]: Questions and candidate result tags
//! - [`Config`]: Application configuration management
//! - [`Event`]: Everything a session reports back

pub mod config;
pub mod error;
pub mod events;
pub mod quiz;
pub mod session;

pub use config::Config;
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use quiz::{Question, QuizData, QuizOption};
pub use session::{
    AnalysisPhase, DisplayStats, Gender, QuizSession, SessionSettings, Stage, UserProfile,
};
