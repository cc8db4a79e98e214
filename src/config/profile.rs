//! Runtime profiles selected by `APP_ENV`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named flag bundle chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Production,
    Testing,
}

/// Flags carried by a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileFlags {
    pub debug: bool,
    pub testing: bool,
}

impl Profile {
    pub fn flags(self) -> ProfileFlags {
        match self {
            Profile::Development => ProfileFlags { debug: true, testing: false },
            Profile::Production => ProfileFlags { debug: false, testing: false },
            Profile::Testing => ProfileFlags { debug: false, testing: true },
        }
    }

    pub fn is_debug(self) -> bool {
        self.flags().debug
    }

    pub fn is_testing(self) -> bool {
        self.flags().testing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
            Profile::Testing => "testing",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when `APP_ENV` names no known profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile '{0}' (expected development, production, testing or default)")]
pub struct UnknownProfile(pub String);

impl FromStr for Profile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "default" => Ok(Profile::Development),
            "production" => Ok(Profile::Production),
            "testing" => Ok(Profile::Testing),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}
