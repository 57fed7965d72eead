//! Token grammars for the supported input styles
//!
//! Each grammar is a closed set of field keywords per category plus a match
//! pattern. Dispatch happens by table lookup on the recognized keyword, so
//! adding a style means adding a variant here rather than a subclass.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::docstring::DirectiveKind;

// example match: ":blah blah blah:" or ":blah blah:" or ":blah:"
static REST_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:\s*([^\s:]+)\s*([^\s:]*)\s*([^\s:]*)\s*:").expect("valid regex"));

// example match: "@blah blah:" or "@blah:"
static EPYTEXT_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([^\s:]+)\s*([^\s:]*)\s*:").expect("valid regex"));

// example match: ".. blah::"
static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.\. ([^\s:]+)\s*::").expect("valid regex"));

const ARG_FIELDS: &[&str] = &[
    "param",
    "parameter",
    "arg",
    "argument",
    "key",
    "keyword",
    "kwarg",
    "kwparam",
];
const TYPE_FIELDS: &[&str] = &["type", "vartype"];
const RAISES_FIELDS: &[&str] = &["raise", "raises", "except", "exception"];
const RETURN_FIELDS: &[&str] = &["return", "returns", "rtype", "returntype"];
const VAR_FIELDS: &[&str] = &["var", "variable", "ivar", "ivariable", "cvar", "cvariable"];
const GROUP_FIELDS: &[&str] = &[
    "parameters",
    "keywords",
    "attributes",
    "exceptions",
    "raises",
    "variables",
    "ivariables",
    "cvariables",
    "example",
    "examples",
];

fn in_set(set: &[&str], field: &str) -> bool {
    set.iter().any(|candidate| *candidate == field)
}

fn in_triple_fields(field: &str) -> bool {
    in_set(ARG_FIELDS, field) || in_set(VAR_FIELDS, field)
}

fn in_double_fields(field: &str) -> bool {
    in_set(ARG_FIELDS, field)
        || in_set(TYPE_FIELDS, field)
        || in_set(RAISES_FIELDS, field)
        || in_set(VAR_FIELDS, field)
}

fn in_rest_single_fields(field: &str) -> bool {
    in_set(GROUP_FIELDS, field) || in_set(RETURN_FIELDS, field)
}

/// The input grammars. `Plain` recognizes directives only and treats
/// everything else as raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarKind {
    Plain,
    Rest,
    Epytext,
}

/// Handler category for a recognized field keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldHandler {
    Group,
    Type,
    Return,
    Var,
    Raise,
    Arg,
}

/// A matched field token: the lowercased keyword, up to two token
/// arguments, and the byte offset just past the token prefix.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TokenMatch {
    pub field: String,
    pub arg1: String,
    pub arg2: String,
    pub end: usize,
}

/// Looks up the handler for a field keyword. Keywords shared between
/// categories ("raises" is both a group and a raise field) resolve to the
/// more specific handler.
fn handler_for(field: &str) -> Option<FieldHandler> {
    if in_set(ARG_FIELDS, field) {
        Some(FieldHandler::Arg)
    } else if in_set(RAISES_FIELDS, field) {
        Some(FieldHandler::Raise)
    } else if in_set(VAR_FIELDS, field) {
        Some(FieldHandler::Var)
    } else if in_set(RETURN_FIELDS, field) {
        Some(FieldHandler::Return)
    } else if in_set(TYPE_FIELDS, field) {
        Some(FieldHandler::Type)
    } else if in_set(GROUP_FIELDS, field) {
        Some(FieldHandler::Group)
    } else {
        None
    }
}

/// Matches a reST field token at the start of `line`. The keyword must be
/// valid for the number of token arguments present.
pub(crate) fn match_rest_field(line: &str) -> Option<(FieldHandler, TokenMatch)> {
    let caps = REST_FIELD_RE.captures(line)?;
    let field = caps[1].to_lowercase();
    let arg1 = caps[2].to_string();
    let arg2 = caps[3].to_string();
    let valid = if !arg1.is_empty() && !arg2.is_empty() {
        in_triple_fields(&field)
    } else if !arg1.is_empty() {
        in_double_fields(&field)
    } else {
        in_rest_single_fields(&field)
    };
    if !valid {
        return None;
    }
    let handler = handler_for(&field)?;
    let end = caps.get(0).map_or(0, |m| m.end());
    Some((handler, TokenMatch { field, arg1, arg2, end }))
}

/// Matches an epytext field token at the start of `line`. Epytext has no
/// consolidated groups and its only zero-argument fields are returns.
pub(crate) fn match_epytext_field(line: &str) -> Option<(FieldHandler, TokenMatch)> {
    let caps = EPYTEXT_FIELD_RE.captures(line)?;
    let field = caps[1].to_lowercase();
    let arg1 = caps[2].to_string();
    let valid = if !arg1.is_empty() {
        in_double_fields(&field)
    } else {
        in_set(RETURN_FIELDS, &field)
    };
    if !valid {
        return None;
    }
    let handler = handler_for(&field)?;
    let end = caps.get(0).map_or(0, |m| m.end());
    Some((
        handler,
        TokenMatch {
            field,
            arg1,
            arg2: String::new(),
            end,
        },
    ))
}

/// Matches a reST directive token (`.. note::`).
pub(crate) fn match_directive(line: &str) -> Option<(DirectiveKind, usize)> {
    let caps = DIRECTIVE_RE.captures(line)?;
    let kind = DirectiveKind::from_keyword(&caps[1])?;
    let end = caps.get(0).map_or(0, |m| m.end());
    Some((kind, end))
}

/// Matches an epytext directive token (`@note:`), which rides the same
/// syntax as epytext fields.
pub(crate) fn match_epytext_directive(line: &str) -> Option<(DirectiveKind, usize)> {
    let caps = EPYTEXT_FIELD_RE.captures(line)?;
    let kind = DirectiveKind::from_keyword(&caps[1])?;
    let end = caps.get(0).map_or(0, |m| m.end());
    Some((kind, end))
}

impl GrammarKind {
    /// Style-guessing predicate: whether `line` looks like one of this
    /// grammar's tokens. Used on stripped, lowercased lines.
    pub fn matches(&self, line: &str) -> bool {
        match self {
            GrammarKind::Plain => false,
            GrammarKind::Rest => match_rest_field(line).is_some(),
            GrammarKind::Epytext => {
                if let Some(caps) = EPYTEXT_FIELD_RE.captures(line) {
                    if !caps[2].is_empty() {
                        return in_double_fields(&caps[1]);
                    }
                    return in_set(RETURN_FIELDS, &caps[1])
                        || DirectiveKind::from_keyword(&caps[1]).is_some();
                }
                false
            }
        }
    }
}

/// Guesses the grammar for an unspecified input style. Lines are scanned in
/// order against each grammar's predicate; the first line accepted by any
/// grammar wins, with Rest taking precedence over Epytext on the same line.
/// No match falls back to the plain directive-only grammar.
pub fn guess(lines: &[String]) -> GrammarKind {
    for line in lines {
        let line = line.trim().to_lowercase();
        for grammar in [GrammarKind::Rest, GrammarKind::Epytext] {
            if grammar.matches(&line) {
                return grammar;
            }
        }
    }
    GrammarKind::Plain
}
