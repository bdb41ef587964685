//! The two profile fields collected before analysis.
//!
//! The store itself accepts any value. Whether the profile is complete
//! enough to continue is decided by the session when it is submitted.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            other => Err(ValidationError::InvalidValue {
                field: "gender".into(),
                message: format!("'{other}' is not one of male, female, other"),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub nickname: String,
    pub gender: Option<Gender>,
}

impl UserProfile {
    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = Some(gender);
    }

    /// Both fields populated. A whitespace-only nickname counts as empty.
    pub fn is_complete(&self) -> bool {
        !self.nickname.trim().is_empty() && self.gender.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_requires_both_fields() {
        let mut profile = UserProfile::default();
        assert!(!profile.is_complete());

        profile.set_nickname("Mia");
        assert!(!profile.is_complete());

        profile.set_gender(Gender::Female);
        assert!(profile.is_complete());

        profile.set_nickname("   ");
        assert!(!profile.is_complete());
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(" m ".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("other".parse::<Gender>().unwrap(), Gender::Other);
        assert!("robot".parse::<Gender>().is_err());
    }
}
