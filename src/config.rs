use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::parser::InputStyle;
use crate::core::writer::OutputStyle;
use crate::error::{DocshiftError, Result};

/// Option for stripping back ticks from type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackTickRemoval {
    /// Leave all back ticks in place.
    #[serde(rename = "off")]
    Off,

    /// Strip back ticks except those belonging to sphinx directives,
    /// e.g. `` `list` of `str` `` becomes ``list of str`` while
    /// ``:py:class:`Test``` is left alone.
    #[serde(rename = "strip-except-directives")]
    ExceptDirectives,

    /// Strip all back ticks, including directive prefixes:
    /// ``:py:class:`Test``` becomes ``Test``.
    #[serde(rename = "strip-all")]
    All,
}

/// Option for converting epytext inline markup (`I{..}`, `B{..}`, `M{..}`,
/// `C{..}`) into reST markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkupConvert {
    #[serde(rename = "off")]
    Off,

    /// Convert all markup: `I{x}` to `*x*`, `B{x}` to `**x**`, `M{x}` to
    /// ``:math:`x```, `C{x}` to ```` ``x`` ````.
    #[serde(rename = "on")]
    On,

    /// Like `on`, but code markers inside type annotations are removed
    /// entirely instead of converted.
    #[serde(rename = "types-only")]
    TypesOnly,
}

/// Rendering options shared by every output style.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Keep the first content line glued to the opening quotes.
    pub first_line: bool,

    /// Replacement quote token, or empty to keep the source quotes.
    pub replace_quotes: String,

    /// One level of indentation in the output.
    pub standard_indent: String,

    /// Displayed width of a tab character, used for wrap calculations when
    /// the indent unit is a tab.
    pub tab_length: usize,

    /// Re-wrap descriptions up to the first explicitly indented or blank
    /// line instead of preserving source line breaks.
    pub realign: bool,

    /// Maximum output line length before the section indent is subtracted.
    pub max_line_length: usize,

    /// Append "optional" to the types of optional keyword arguments.
    pub use_optional: bool,

    /// Back tick stripping mode for type strings.
    pub remove_type_back_ticks: BackTickRemoval,

    /// Render field types at all.
    pub use_types: bool,

    /// Render optional keyword arguments in a separate keyword section.
    pub separate_keywords: bool,

    /// Epytext inline-markup conversion mode.
    pub convert_markup: MarkupConvert,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            first_line: true,
            replace_quotes: String::new(),
            standard_indent: "    ".to_string(),
            tab_length: 4,
            realign: true,
            // pep8 default max docstring line length
            max_line_length: 72,
            use_optional: false,
            remove_type_back_ticks: BackTickRemoval::ExceptDirectives,
            use_types: true,
            separate_keywords: false,
            convert_markup: MarkupConvert::Off,
        }
    }
}

/// Top-level docshift configuration, loadable from a JSON file. Missing
/// options fall back to their defaults so partial config files layer over
/// the built-in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input docstring style, or guess per docstring.
    pub input_style: InputStyle,

    /// Output docstring style to convert to.
    pub output_style: OutputStyle,

    /// Shebang substrings that mark an extensionless file as a script to
    /// convert.
    pub accepted_shebangs: Vec<String>,

    /// Rendering options.
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_style: InputStyle::Guess,
            output_style: OutputStyle::Google,
            accepted_shebangs: vec!["python".to_string()],
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|err| {
            DocshiftError::Config(format!(
                "unable to open configuration file '{}': {}",
                path.as_ref().display(),
                err
            ))
        })?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| DocshiftError::Config(err.to_string()))?;
        Ok(config)
    }

    /// Load configuration from a file, or fall back to defaults when no
    /// path is given.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
