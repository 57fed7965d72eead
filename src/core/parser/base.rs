//! Docstring parser state machine
//!
//! One [`DocstringParser`] owns one raw capture end to end. The opening and
//! closing quote tokens are stripped up front, then the token loop walks the
//! remaining lines: a line at the token indent is tried against the active
//! grammar and demoted to a raw element when it does not match.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::docstring::{DirectiveKind, Docstring, Element};
use crate::core::lines::{self, LineCursor};
use crate::error::{DocshiftError, Result};

use super::grammar::{self, FieldHandler, GrammarKind, TokenMatch};

// example match: leading indent, optional string-prefix letters, quotes
static START_TOKENS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\s*)([urbURB]*)("""|'''|"|')"#).expect("valid regex"));

/// A line does not match any token grammar at the current parse position.
/// Always recovered locally by demoting the line to a raw element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotParsable;

/// Parses the raw lines of one docstring capture into a [`Docstring`].
pub struct DocstringParser {
    grammar: GrammarKind,
    lines: LineCursor,
    keywords: Vec<String>,
    /// The parsed docstring, complete after [`parse`](Self::parse) runs.
    pub doc: Docstring,
    /// The whitespace before the opening quotes, preserved for the writer.
    pub raw_indent: String,
    indent: usize,
    quotes: String,
    trailing: Vec<String>,
}

impl DocstringParser {
    /// Strips the quote tokens from `lines` and prepares the token cursor.
    ///
    /// `keywords` is the list of keyword-parameter names of the owning
    /// declaration, used to flag fields as optional.
    pub fn new(grammar: GrammarKind, lines: &[String], keywords: Vec<String>) -> Result<Self> {
        if lines.is_empty() {
            return Err(DocshiftError::MalformedDocstring(
                "cannot parse an empty docstring".to_string(),
            ));
        }
        let mut doc = Docstring::new();

        let start_tokens = START_TOKENS_RE.captures(&lines[0]).ok_or_else(|| {
            DocshiftError::MalformedDocstring(
                "docstring has no opening string delimiter".to_string(),
            )
        })?;
        let raw_indent = start_tokens[1].to_string();
        let quotes = start_tokens[3].to_string();
        doc.add_element(Element::StartQuote(format!(
            "{}{}",
            &start_tokens[2], &start_tokens[3]
        )));

        let mut lines = lines.to_vec();
        let token_end = start_tokens.get(0).map_or(0, |m| m.end());
        let after_quotes = lines[0][token_end..].to_string();
        lines[0] = format!("{}{}", raw_indent, after_quotes);

        let indent = raw_indent.chars().count();
        let mut parser = Self {
            grammar,
            lines: LineCursor::new(Vec::new()),
            keywords,
            doc,
            raw_indent,
            indent,
            quotes,
            trailing: Vec::new(),
        };
        let lines = parser.strip_end(lines);
        parser.lines = LineCursor::new(lines);
        Ok(parser)
    }

    /// Finds the closing quote scanning backward from the last line. Text
    /// before the quote stays in the body; text after it, and any later
    /// lines, are replayed as a trailing raw element after the end quote.
    fn strip_end(&mut self, mut lines: Vec<String>) -> Vec<String> {
        let mut idx = lines.len();
        while idx > 0 {
            idx -= 1;
            let line = lines[idx].trim_end().to_string();
            if let Some(found) = line.find(self.quotes.as_str()) {
                let before = line[..found].to_string();
                let after = line[found + self.quotes.len()..].trim_start().to_string();
                lines[idx] = before.clone();
                let mut keep_from = idx + 1;
                if before.trim().is_empty() {
                    lines.remove(idx);
                    keep_from = idx;
                }
                if !after.is_empty() {
                    self.trailing.push(after);
                }
                if keep_from < lines.len() {
                    self.trailing.extend(lines.drain(keep_from..));
                }
                return lines;
            }
        }
        // no closing quote found, everything becomes trailing raw content
        self.trailing.extend(lines.drain(..));
        lines
    }

    /// The current line stripped of the section indent.
    fn current_line(&self) -> String {
        let line = self.lines.peek();
        if !line.is_empty() && line.trim().is_empty() {
            String::new()
        } else if lines::is_indented(line, self.indent, false) {
            lines::dedent(line, self.indent).trim_end().to_string()
        } else {
            line.to_string()
        }
    }

    fn is_token_indent(&self) -> bool {
        lines::is_indented(self.lines.peek(), self.indent, true)
    }

    /// Loops through all lines and parses recognized tokens. Lines that are
    /// not recognized are added to the docstring as raw elements.
    pub fn parse(&mut self) {
        // leading blank lines pass through raw; the first non-blank line
        // fixes the token indent for the rest of the document
        while self.lines.has_next() {
            if !self.current_line().is_empty() {
                self.indent = lines::get_indent(self.lines.peek());
                break;
            }
            let line = self.current_line();
            self.doc.add_element(Element::raw_line(line));
            self.lines.advance(1);
        }

        while self.lines.has_next() {
            let parsed = self.is_token_indent() && self.parse_token().is_ok();
            if !parsed {
                let line = self.current_line();
                self.doc.add_element(Element::raw_line(line));
                self.lines.advance(1);
            }
        }
        self.doc.add_element(Element::EndQuote(self.quotes.clone()));
        if !self.trailing.is_empty() {
            self.doc
                .add_element(Element::Raw(std::mem::take(&mut self.trailing)));
        }
    }

    /// Tries to parse a field or directive token at the current line.
    fn parse_token(&mut self) -> std::result::Result<(), NotParsable> {
        let line = self.current_line();
        match self.grammar {
            GrammarKind::Plain => self.parse_directive_token(&line),
            GrammarKind::Rest => {
                if let Some((handler, token)) = grammar::match_rest_field(&line) {
                    self.dispatch_field(handler, token);
                    return Ok(());
                }
                self.parse_directive_token(&line)
            }
            GrammarKind::Epytext => {
                if let Some((handler, token)) = grammar::match_epytext_field(&line) {
                    self.dispatch_field(handler, token);
                    return Ok(());
                }
                if let Some((kind, end)) = grammar::match_epytext_directive(&line) {
                    self.parse_directive(kind, end);
                    return Ok(());
                }
                Err(NotParsable)
            }
        }
    }

    fn parse_directive_token(&mut self, line: &str) -> std::result::Result<(), NotParsable> {
        if let Some((kind, end)) = grammar::match_directive(line) {
            self.parse_directive(kind, end);
            return Ok(());
        }
        Err(NotParsable)
    }

    fn dispatch_field(&mut self, handler: FieldHandler, token: TokenMatch) {
        match handler {
            FieldHandler::Group => self.parse_group(&token),
            FieldHandler::Type => self.parse_type(&token),
            FieldHandler::Return => self.parse_return(&token),
            FieldHandler::Var => self.parse_var(&token),
            FieldHandler::Raise => self.parse_raise(&token),
            FieldHandler::Arg => self.parse_arg(&token),
        }
    }

    fn is_keyword(&self, name: &str) -> bool {
        let name = name.trim_start_matches('*');
        self.keywords.iter().any(|keyword| keyword == name)
    }

    /// Collects a token's description body: every following line that is
    /// blank or indented at least `indent` columns past the token indent.
    /// Trailing blank lines are rewound, and the body is dedented by its
    /// common minimum indentation.
    fn parse_body(&mut self, indent: usize, startpos: usize) -> Vec<String> {
        let mut empty_lines = 0;
        let mut body: Vec<String> = Vec::new();
        let current = self.current_line();
        let first_line = current
            .get(startpos.min(current.len())..)
            .unwrap_or("")
            .trim_start()
            .to_string();
        self.lines.advance(1);
        while self.lines.has_next() {
            let line = self.current_line();
            if line.is_empty() {
                empty_lines += 1;
            } else if lines::is_indented(&line, indent, false) {
                for _ in 0..empty_lines {
                    body.push(String::new());
                }
                empty_lines = 0;
                body.push(line);
            } else {
                self.lines.rewind(empty_lines);
                break;
            }
            self.lines.advance(1);
        }
        let mut body = lines::dedent_by_minimum(&body);
        if !first_line.is_empty() {
            body.insert(0, first_line);
        }
        body
    }

    fn parse_directive(&mut self, kind: DirectiveKind, end: usize) {
        let body = self.parse_body(1, end);
        self.doc.add_element(Element::Directive(kind, body));
    }

    fn parse_arg(&mut self, token: &TokenMatch) {
        let (kind, arg) = if self.grammar == GrammarKind::Epytext || token.arg2.is_empty() {
            (None, token.arg1.clone())
        } else {
            (Some(token.arg1.clone()), token.arg2.clone())
        };
        let desc = self.parse_body(1, token.end);
        let optional = self.is_keyword(&arg);
        self.doc.add_arg(&arg, kind, Some(desc), optional);
    }

    /// A `vartype` field, or a `type` field naming something only known as
    /// an attribute, targets the attribute table; everything else is assumed
    /// to be an argument type.
    fn parse_type(&mut self, token: &TokenMatch) {
        let arg = token.arg1.trim_start_matches('*').to_string();
        let kind = self.parse_body(1, token.end).join(" ");
        let is_attribute =
            self.doc.attribute_fields.contains(&arg) && !self.doc.arg_fields.contains(&arg);
        if token.field == "vartype" || is_attribute {
            self.doc.add_attribute_type(&arg, kind);
        } else {
            self.doc.add_arg_type(&arg, kind);
        }
    }

    fn parse_return(&mut self, token: &TokenMatch) {
        let body = self.parse_body(1, token.end);
        if token.field == "rtype" || token.field == "returntype" {
            self.doc.add_return_type(body.join(" "));
        } else {
            self.doc.add_return(None, Some(body));
        }
    }

    fn parse_var(&mut self, token: &TokenMatch) {
        let (kind, var) = if self.grammar == GrammarKind::Epytext || token.arg2.is_empty() {
            (None, token.arg1.clone())
        } else {
            (Some(token.arg1.clone()), token.arg2.clone())
        };
        let desc = self.parse_body(1, token.end);
        self.doc.add_attribute(&var, kind, Some(desc));
    }

    fn parse_raise(&mut self, token: &TokenMatch) {
        // a bare ":raises:" token is a consolidated group header
        if token.arg1.is_empty() {
            self.parse_group(token);
            return;
        }
        let kind = token.arg1.clone();
        let desc = self.parse_body(1, token.end);
        self.doc.add_raises(&kind, Some(desc));
    }

    /// Parses an epydoc consolidated field: one header introducing several
    /// one-per-line sub-fields, each splitting on `name[ : type]` and
    /// optionally carrying its own nested body.
    fn parse_group(&mut self, token: &TokenMatch) {
        if token.field == "example" || token.field == "examples" {
            let body = self.parse_body(1, token.end);
            self.doc
                .add_element(Element::Directive(DirectiveKind::Example, body));
            return;
        }
        self.lines.advance(1);
        while self.lines.has_next() && lines::is_indented(&self.current_line(), 1, false) {
            let line = self.current_line();
            let indent = lines::get_indent(&line);
            let (name, kind) = match line.split_once(':') {
                Some((name, kind)) => (name.trim().to_string(), Some(kind.trim().to_string())),
                None => (line.trim().to_string(), None),
            };
            let body = self.parse_body(indent + 1, line.len());
            match token.field.as_str() {
                "attributes" | "variables" | "ivariables" | "cvariables" => {
                    self.doc.add_attribute(&name, kind, Some(body));
                }
                "exceptions" | "raises" => {
                    self.doc.add_raises(&name, Some(body));
                }
                _ => {
                    let optional = self.is_keyword(&name);
                    self.doc.add_arg(&name, kind, Some(body), optional);
                }
            }
        }
    }
}
