//! Display pattern selection.
//!
//! The core does not render anything. It only remembers which look the
//! user picked so every renderer reading the simulation agrees on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a renderer should draw live cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPattern {
    /// Filled squares.
    #[default]
    Square,
    /// Spaceship glyphs on a starfield.
    Spaceship,
}

impl DisplayPattern {
    /// Every selectable pattern, in menu order.
    pub const ALL: [Self; 2] = [Self::Square, Self::Spaceship];

    /// The lowercase name used in config files and status output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Spaceship => "spaceship",
        }
    }
}

impl fmt::Display for DisplayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`DisplayPattern`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown display pattern: {0:?}")]
pub struct UnknownPatternError(pub String);

impl FromStr for DisplayPattern {
    type Err = UnknownPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPatternError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_square() {
        assert_eq!(DisplayPattern::default(), DisplayPattern::Square);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Spaceship".parse::<DisplayPattern>(), Ok(DisplayPattern::Spaceship));
        assert_eq!(" square ".parse::<DisplayPattern>(), Ok(DisplayPattern::Square));
        assert_eq!(
            "hexagon".parse::<DisplayPattern>(),
            Err(UnknownPatternError(String::from("hexagon")))
        );
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&DisplayPattern::Spaceship).ok();
        assert_eq!(json.as_deref(), Some("\"spaceship\""));
    }
}
