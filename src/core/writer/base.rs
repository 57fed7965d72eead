//! Shared writer mechanics
//!
//! [`DocstringWriter`] owns line emission, indentation, realignment, quote
//! replacement, back tick stripping, and markup translation. The per-style
//! section renderers in `fields` and `sections` build on these primitives;
//! dispatch between them happens by matching on the closed [`OutputStyle`]
//! set.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::config::{BackTickRemoval, MarkupConvert, OutputConfig};
use crate::core::docstring::{Docstring, Element, Field, SectionKind};
use crate::core::lines;
use crate::error::Result;

use super::OutputStyle;

static QUOTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""""|'''|"|'"#).expect("valid regex"));

// back tick pair not preceded by a colon, so sphinx directives survive
static BACKTICK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^:])`([^\s`]+)`").expect("valid regex"));

// back tick pair including any directive prefix
static BACKTICK_DIRECTIVES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\s`]*`([^\s`]+)`").expect("valid regex"));

static MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([IBMC])\{([^}]*)\}").expect("valid regex"));

/// Renders one [`Docstring`] into output lines for one target style.
pub struct DocstringWriter<'a> {
    pub(super) doc: &'a Docstring,
    pub(super) style: OutputStyle,
    pub(super) config: &'a OutputConfig,
    section_indent: String,
    pub(super) vararg: String,
    pub(super) kwarg: String,
    pub(super) output: Vec<String>,
    elements_written: usize,
    quotes: String,
    current_element: usize,
    using_tabs: bool,
    max_length: usize,
}

impl<'a> DocstringWriter<'a> {
    pub fn new(
        doc: &'a Docstring,
        style: OutputStyle,
        indent: &str,
        config: &'a OutputConfig,
        vararg: Option<&str>,
        kwarg: Option<&str>,
    ) -> Self {
        let using_tabs = config.standard_indent.contains('\t');
        let mut prefix_length = indent.chars().count();
        if using_tabs {
            prefix_length *= config.tab_length;
        }
        Self {
            doc,
            style,
            config,
            section_indent: indent.to_string(),
            vararg: vararg.unwrap_or("").to_string(),
            kwarg: kwarg.unwrap_or("").to_string(),
            output: Vec::new(),
            elements_written: 0,
            quotes: String::new(),
            current_element: 0,
            using_tabs,
            max_length: config.max_line_length.saturating_sub(prefix_length),
        }
    }

    /// Writes all elements of the docstring and returns the output lines,
    /// including the re-rendered quote delimiters.
    pub fn write(mut self) -> Result<Vec<String>> {
        let doc = self.doc;
        for (index, element) in doc.elements.iter().enumerate() {
            self.current_element = index;
            match element {
                Element::StartQuote(quotes) => self.write_quotes(quotes, false),
                Element::EndQuote(quotes) => self.write_quotes(quotes, true),
                Element::Raw(raw_lines) => self.write_raw(raw_lines),
                Element::Section(SectionKind::Args) => self.write_args(),
                Element::Section(SectionKind::Attributes) => self.write_attributes(),
                Element::Section(SectionKind::Raises) => self.write_raises(),
                Element::Section(SectionKind::Return) => self.write_returns()?,
                Element::Directive(kind, body) => self.write_directive(*kind, body),
            }
        }
        Ok(self.output)
    }

    fn write_args(&mut self) {
        match self.style {
            OutputStyle::Rest | OutputStyle::Epytext => self.write_args_fielded(),
            OutputStyle::Google | OutputStyle::Numpy => self.write_args_sectioned(),
        }
    }

    fn write_attributes(&mut self) {
        match self.style {
            OutputStyle::Rest | OutputStyle::Epytext => self.write_attributes_fielded(),
            OutputStyle::Google | OutputStyle::Numpy => self.write_attributes_sectioned(),
        }
    }

    fn write_raises(&mut self) {
        match self.style {
            OutputStyle::Rest | OutputStyle::Epytext => self.write_raises_fielded(),
            OutputStyle::Google | OutputStyle::Numpy => self.write_raises_sectioned(),
        }
    }

    fn write_returns(&mut self) -> Result<()> {
        match self.style {
            OutputStyle::Rest | OutputStyle::Epytext => self.write_returns_fielded(),
            OutputStyle::Google | OutputStyle::Numpy => self.write_returns_sectioned(),
        }
    }

    fn write_directive(&mut self, kind: crate::core::docstring::DirectiveKind, body: &[String]) {
        match self.style {
            OutputStyle::Rest | OutputStyle::Epytext => self.write_directive_fielded(kind, body),
            OutputStyle::Google | OutputStyle::Numpy => self.write_directive_sectioned(kind, body),
        }
    }

    /// Writes a line with the proper indentation. Empty lines directly after
    /// the opening quotes or after another empty line are skipped unless
    /// `force` is set; `append` glues the line onto the previous one.
    pub(super) fn write_line(&mut self, line: &str, indent: usize, append: bool, force: bool) {
        let mut indent_str = format!(
            "{}{}",
            self.section_indent,
            self.config.standard_indent.repeat(indent)
        );
        let mut line = line;
        if line.trim().is_empty() {
            let after_quote = self.elements_written == 1;
            let after_newline = matches!(self.output.last(), Some(last) if last.is_empty());
            if !force && (after_quote || after_newline) {
                return;
            }
            line = "";
            indent_str = String::new();
        }
        let line = line.trim_end();
        if append {
            match self.output.last_mut() {
                Some(last) => {
                    let glued = format!("{}{}", last.trim_end(), line);
                    *last = glued;
                }
                None => self.output.push(format!("{}{}", indent_str, line)),
            }
        } else {
            self.output.push(format!("{}{}", indent_str, line));
        }
        self.elements_written += 1;
    }

    /// Writes raw lines through unchanged, gluing the first content line to
    /// the opening quotes when `first_line` is configured.
    fn write_raw(&mut self, raw_lines: &[String]) {
        if self.style == OutputStyle::Numpy {
            self.write_raw_numpy(raw_lines);
            return;
        }
        for line in raw_lines {
            let append = self.elements_written == 1 && self.config.first_line;
            let line = self.convert_markup(line, false);
            self.write_line(&line, 0, append, false);
        }
    }

    /// NumPy sections are not indented, so two blank lines are required to
    /// separate untitled trailing text from the section before it.
    fn write_raw_numpy(&mut self, raw_lines: &[String]) {
        let has_text = raw_lines.iter().any(|line| !line.trim().is_empty());
        if has_text {
            let after_section = matches!(
                self.previous_meaningful_element(),
                Some(Element::Section(_)) | Some(Element::Directive(..))
            );
            if after_section {
                self.write_line("", 0, false, false);
                self.write_line("", 0, false, true);
            }
        }
        for line in raw_lines {
            let append = self.elements_written == 1 && self.config.first_line;
            let line = line.clone();
            self.write_line(&line, 0, append, false);
        }
    }

    /// The most recently written element that is not a whitespace-only raw
    /// element. Used purely to decide spacing, never to alter field data.
    fn previous_meaningful_element(&self) -> Option<&Element> {
        let mut prev = self.current_element;
        while prev > 0 {
            prev -= 1;
            match &self.doc.elements[prev] {
                Element::Raw(raw_lines) => {
                    if raw_lines.iter().any(|line| !line.trim().is_empty()) {
                        return Some(&self.doc.elements[prev]);
                    }
                }
                element => return Some(element),
            }
        }
        None
    }

    /// Writes a description, reformatting it when `realign` is configured.
    /// A header short enough to fit is joined onto the first description
    /// line; an over-long header goes on its own line with the description
    /// indented below it.
    pub(super) fn write_desc(
        &mut self,
        desc: &[String],
        header: Option<&str>,
        indent: usize,
        hanging: bool,
    ) {
        let mut desc: Vec<String> = desc
            .iter()
            .map(|line| self.convert_markup(line, false))
            .collect();
        let reformatted = match header {
            Some(header) if self.is_longer_than_max(header, indent) => {
                self.write_line(header, indent, false, false);
                let next_indent = if hanging { indent + 1 } else { indent };
                self.reformat_lines(&desc, next_indent, false)
            }
            Some(header) => {
                desc.insert(0, header.to_string());
                self.reformat_lines(&desc, indent, hanging)
            }
            None => self.reformat_lines(&desc, indent, hanging),
        };
        for line in reformatted {
            self.write_line(&line, 0, false, false);
        }
    }

    fn is_longer_than_max(&self, line: &str, indent: usize) -> bool {
        let length = indent * self.config.standard_indent.chars().count() + line.chars().count();
        length > self.max_length
    }

    /// Indents lines, and when realignment is enabled joins lines up to the
    /// first explicitly indented or blank line into one paragraph re-wrapped
    /// at the maximum width with a hanging indent.
    fn reformat_lines(&self, desc: &[String], indent: usize, hanging: bool) -> Vec<String> {
        let mut wrap_length = self.max_length;
        // tabs count as one character in the buffer but render wider
        if self.using_tabs {
            let prefix_tab_length = (indent + hanging as usize) * self.config.tab_length;
            wrap_length = self.max_length.saturating_sub(prefix_tab_length);
        }

        let initial_indent = indent;
        let mut indent = indent;
        let mut replace_to = 0;
        let mut new_lines = Vec::new();
        let mut realigning = self.config.realign;
        for (i, line) in desc.iter().enumerate() {
            if i == 1 && hanging {
                indent += 1;
            }
            if line.is_empty() || lines::is_indented(line, 1, false) {
                realigning = false;
            }
            if !realigning {
                new_lines.push(format!(
                    "{}{}",
                    self.config.standard_indent.repeat(indent),
                    line
                ));
            } else {
                replace_to = i + 1;
            }
        }
        if replace_to > 0 {
            let paragraph = desc[..replace_to].join(" ");
            let subsequent_indent = if hanging { indent } else { initial_indent };
            let mut realigned = lines::wrap(
                &paragraph,
                wrap_length,
                &self.config.standard_indent.repeat(initial_indent),
                &self.config.standard_indent.repeat(subsequent_indent),
            );
            realigned.extend(new_lines);
            new_lines = realigned;
        }
        new_lines
    }

    /// Writes the opening or closing quotes, replacing them when
    /// `replace_quotes` is configured. A one-line docstring's closing quotes
    /// are appended to the single output line.
    fn write_quotes(&mut self, quotes: &str, is_end: bool) {
        let quotes = if self.config.replace_quotes.is_empty() {
            quotes.to_string()
        } else {
            QUOTES_RE
                .replace_all(quotes, NoExpand(self.config.replace_quotes.as_str()))
                .to_string()
        };
        self.quotes = quotes.clone();
        let one_line_doc = is_end && self.output.len() == 1;
        self.write_line(&quotes, 0, one_line_doc, false);
    }

    /// Whether a section header would be the first content after the
    /// opening quotes, in which case no separating blank line is wanted.
    pub(super) fn is_first_section(&self) -> bool {
        self.output.len() == 1
            && self
                .output
                .last()
                .map_or(false, |line| line.ends_with(&self.quotes))
    }

    /// Removes back ticks from a type string per the configured mode.
    pub(super) fn remove_back_ticks(&self, text: &str) -> String {
        match self.config.remove_type_back_ticks {
            BackTickRemoval::Off => text.to_string(),
            BackTickRemoval::ExceptDirectives => {
                BACKTICK_RE.replace_all(text, "${1}${2}").to_string()
            }
            BackTickRemoval::All => BACKTICK_DIRECTIVES_RE.replace_all(text, "${1}").to_string(),
        }
    }

    /// Converts epytext inline markup to reST markup per the configured
    /// mode. In `types-only` mode, code markup inside type strings is
    /// removed instead of converted.
    pub(super) fn convert_markup(&self, text: &str, in_type: bool) -> String {
        if self.config.convert_markup == MarkupConvert::Off {
            return text.to_string();
        }
        let remove_types = self.config.convert_markup == MarkupConvert::TypesOnly;
        MARKUP_RE
            .replace_all(text, |caps: &regex::Captures| {
                let inner = &caps[2];
                match &caps[1] {
                    "I" => format!("*{}*", inner),
                    "B" => format!("**{}**", inner),
                    "M" => format!(":math:`{}`", inner),
                    _ => {
                        if in_type && remove_types {
                            inner.to_string()
                        } else {
                            format!("``{}``", inner)
                        }
                    }
                }
            })
            .to_string()
    }

    /// Normalizes a type string for output: markup translation in type
    /// context followed by back tick stripping.
    pub(super) fn prepare_kind(&self, kind: &str) -> String {
        let converted = self.convert_markup(kind, true);
        self.remove_back_ticks(&converted)
    }

    /// A field's display name, prefixed for variadic parameters.
    pub(super) fn display_name(&self, field: &Field) -> String {
        if !self.vararg.is_empty() && field.name == self.vararg {
            format!("*{}", field.name)
        } else if !self.kwarg.is_empty() && field.name == self.kwarg {
            format!("**{}", field.name)
        } else {
            field.name.clone()
        }
    }

    /// Joins a type and an optional marker into the rendered kind text.
    pub(super) fn field_kind(&self, field: &Field, use_optional: bool) -> String {
        let optional = use_optional && self.config.use_optional && field.optional;
        let kind = if self.config.use_types {
            self.prepare_kind(&field.kind)
        } else {
            String::new()
        };
        match (kind.is_empty(), optional) {
            (false, true) => format!("{}, optional", kind),
            (false, false) => kind,
            (true, true) => "optional".to_string(),
            (true, false) => String::new(),
        }
    }
}
