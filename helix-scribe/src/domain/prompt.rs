use serde::{Deserialize, Serialize};
use std::fmt;

/// Which instruction template drives a generation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleMode {
    #[default]
    Baseline,
    Evasion,
}

impl StyleMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Evasion => "evasion",
        }
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StyleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" | "basic" => Ok(Self::Baseline),
            "evasion" | "advanced" => Ok(Self::Evasion),
            _ => Err(format!("Unknown style mode: {s}")),
        }
    }
}

/// Excerpt of a retrieved document used as a style reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exemplar {
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBundle {
    pub system: String,
    pub exemplars: String,
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_mode_parse() {
        assert_eq!("baseline".parse::<StyleMode>(), Ok(StyleMode::Baseline));
        assert_eq!("EVASION".parse::<StyleMode>(), Ok(StyleMode::Evasion));
        assert_eq!("advanced".parse::<StyleMode>(), Ok(StyleMode::Evasion));
        assert!("loud".parse::<StyleMode>().is_err());
    }

    #[test]
    fn test_style_mode_display_round_trips() {
        for mode in [StyleMode::Baseline, StyleMode::Evasion] {
            assert_eq!(mode.to_string().parse::<StyleMode>(), Ok(mode));
        }
    }
}
