//! Docstring parsing: input styles, grammars, and the parser state machine.

mod base;
mod grammar;

pub use base::DocstringParser;
pub use grammar::{guess, GrammarKind};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocshiftError;

/// The input docstring styles that can be requested for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputStyle {
    /// Guess the grammar per docstring from its lines.
    Guess,
    Rest,
    Epytext,
}

impl InputStyle {
    /// Resolves the grammar for one capture, guessing from its lines when
    /// no explicit style is configured.
    pub fn grammar_for(&self, lines: &[String]) -> GrammarKind {
        match self {
            InputStyle::Guess => grammar::guess(lines),
            InputStyle::Rest => GrammarKind::Rest,
            InputStyle::Epytext => GrammarKind::Epytext,
        }
    }
}

impl fmt::Display for InputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputStyle::Guess => "guess",
            InputStyle::Rest => "rest",
            InputStyle::Epytext => "epytext",
        };
        f.write_str(name)
    }
}

impl FromStr for InputStyle {
    type Err = DocshiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guess" => Ok(InputStyle::Guess),
            "rest" => Ok(InputStyle::Rest),
            "epytext" => Ok(InputStyle::Epytext),
            other => Err(DocshiftError::UnsupportedStyle(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_names_round_trip() {
        for style in [InputStyle::Guess, InputStyle::Rest, InputStyle::Epytext] {
            assert_eq!(style.to_string().parse::<InputStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_unknown_style_is_unsupported() {
        let result = "markdown".parse::<InputStyle>();
        assert!(matches!(result, Err(DocshiftError::UnsupportedStyle(_))));
    }

    #[test]
    fn test_explicit_style_skips_guessing() {
        let lines = vec!["@param arg1: d1".to_string()];
        assert_eq!(InputStyle::Rest.grammar_for(&lines), GrammarKind::Rest);
        assert_eq!(InputStyle::Guess.grammar_for(&lines), GrammarKind::Epytext);
    }
}
