//! Docstring writing: output styles and the shared renderer.

mod base;
mod fields;
mod sections;

pub use base::DocstringWriter;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::OutputConfig;
use crate::core::docstring::Docstring;
use crate::error::{DocshiftError, Result};

/// The output docstring styles that can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Rest,
    Epytext,
    Google,
    Numpy,
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputStyle::Rest => "rest",
            OutputStyle::Epytext => "epytext",
            OutputStyle::Google => "google",
            OutputStyle::Numpy => "numpy",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputStyle {
    type Err = DocshiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rest" => Ok(OutputStyle::Rest),
            "epytext" => Ok(OutputStyle::Epytext),
            "google" => Ok(OutputStyle::Google),
            "numpy" => Ok(OutputStyle::Numpy),
            other => Err(DocshiftError::UnsupportedStyle(other.to_string())),
        }
    }
}

/// Renders `doc` in the requested style at the original section indent,
/// returning the replacement lines including the quote delimiters.
pub fn write_docstring(
    doc: &Docstring,
    style: OutputStyle,
    indent: &str,
    config: &OutputConfig,
    vararg: Option<&str>,
    kwarg: Option<&str>,
) -> Result<Vec<String>> {
    DocstringWriter::new(doc, style, indent, config, vararg, kwarg).write()
}
