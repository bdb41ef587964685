//! Screens a session moves through.

use serde::{Deserialize, Serialize};

/// The five mutually exclusive screens, in the only order they can be
/// visited. `restart` is the single way back to `Welcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Welcome,
    Quiz,
    Profile,
    Analyzing,
    Result,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Welcome => "welcome",
            Stage::Quiz => "quiz",
            Stage::Profile => "profile",
            Stage::Analyzing => "analyzing",
            Stage::Result => "result",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
