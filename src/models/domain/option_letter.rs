use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// Accepts "A", "a)", "(b)", "C.", "3", "OPTION_D", "Option 2" after uppercasing.
static OPTION_LETTER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:OPTION)?[\s_\-]*\(?\s*([A-D1-4])\s*[\)\.:]?$")
        .expect("OPTION_LETTER_REGEX is a valid regex pattern")
});

/// Canonical answer letter of a four-option multiple-choice question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    /// Maps the loose spellings found in spreadsheets and request bodies onto a
    /// letter. Returns `None` for anything that is not recognisably one of A-D;
    /// there is no fallback letter.
    pub fn normalize(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_uppercase();
        let caps = OPTION_LETTER_REGEX.captures(&upper)?;

        match caps.get(1)?.as_str() {
            "A" | "1" => Some(OptionLetter::A),
            "B" | "2" => Some(OptionLetter::B),
            "C" | "3" => Some(OptionLetter::C),
            "D" | "4" => Some(OptionLetter::D),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLetter::A => "A",
            OptionLetter::B => "B",
            OptionLetter::C => "C",
            OptionLetter::D => "D",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            OptionLetter::A => 0,
            OptionLetter::B => 1,
            OptionLetter::C => 2,
            OptionLetter::D => 3,
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionLetter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionLetter::normalize(s).ok_or_else(|| {
            AppError::ValidationError(format!("'{}' is not a valid option (expected A-D)", s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_spellings_of_a() {
        for raw in ["a", "A", "A)", "(a)", "A.", "1", "OPTION_A", "Option A", "option-a", " a "] {
            assert_eq!(OptionLetter::normalize(raw), Some(OptionLetter::A), "input {:?}", raw);
        }
    }

    #[test]
    fn normalizes_numeric_positions() {
        assert_eq!(OptionLetter::normalize("2"), Some(OptionLetter::B));
        assert_eq!(OptionLetter::normalize("3"), Some(OptionLetter::C));
        assert_eq!(OptionLetter::normalize("Option 4"), Some(OptionLetter::D));
    }

    #[test]
    fn invalid_input_normalizes_to_none() {
        for raw in ["", "   ", "E", "5", "0", "AB", "Answer B", "option", "null"] {
            assert_eq!(OptionLetter::normalize(raw), None, "input {:?}", raw);
        }
    }

    #[test]
    fn from_str_reports_validation_error() {
        let parsed = "z".parse::<OptionLetter>();
        assert!(matches!(parsed, Err(AppError::ValidationError(_))));

        let parsed: OptionLetter = "c)".parse().expect("c) should parse");
        assert_eq!(parsed, OptionLetter::C);
    }

    #[test]
    fn serializes_as_bare_letter() {
        let json = serde_json::to_string(&OptionLetter::B).expect("letter should serialize");
        assert_eq!(json, "\"B\"");
    }
}
