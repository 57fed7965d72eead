//! Lexical line-range scanner
//!
//! The locator restarts this scan per declaration instead of reusing one
//! token stream for the whole file, because nested scopes complicate
//! continuous lexing. The scan only understands enough of the grammar to
//! find a header's terminating colon and the first string literal of the
//! following block: bracket depth, string literals, comments, and line
//! continuations.
//!
//! Scanning a mid-file fragment can run out of context (a dedent below the
//! starting line, an unterminated string at the end of the range). Those
//! diagnostics are expected and swallowed as "the stream ends here".

use tracing::debug;

use crate::core::lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanError;

enum LogicalEnd {
    /// A depth-zero colon at this position.
    Colon { row: usize, col: usize },
    /// The logical line ended; scanning may resume at `next_row`.
    LineEnd { next_row: usize },
}

fn indent_bytes(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    match text.strip_prefix(keyword) {
        Some(rest) => rest
            .bytes()
            .next()
            .map_or(true, |b| !b.is_ascii_alphanumeric() && b != b'_'),
        None => false,
    }
}

/// Skips a string literal starting at the quote byte `(row, col)`, returning
/// the position just past the closing delimiter. Triple-quoted strings may
/// span lines; single-quoted strings must close on their own line.
fn skip_string(lines: &[String], mut row: usize, col: usize) -> Result<(usize, usize), ScanError> {
    let bytes = lines[row].as_bytes();
    let quote = bytes[col];
    let triple = bytes.len() >= col + 3 && bytes[col + 1] == quote && bytes[col + 2] == quote;
    let mut pos = col + if triple { 3 } else { 1 };
    loop {
        let bytes = lines[row].as_bytes();
        if pos >= bytes.len() {
            if !triple {
                return Err(ScanError);
            }
            row += 1;
            if row >= lines.len() {
                return Err(ScanError);
            }
            pos = 0;
            continue;
        }
        match bytes[pos] {
            b'\\' => pos += 2,
            b if b == quote => {
                if !triple {
                    return Ok((row, pos + 1));
                }
                if bytes.len() >= pos + 3 && bytes[pos + 1] == quote && bytes[pos + 2] == quote {
                    return Ok((row, pos + 3));
                }
                pos += 1;
            }
            _ => pos += 1,
        }
    }
}

/// Walks one logical line from `(row, col)`, tracking bracket depth and
/// skipping strings and comments. With `stop_at_colon`, returns the first
/// depth-zero colon instead of the line end.
fn scan_logical_line(
    lines: &[String],
    mut row: usize,
    mut col: usize,
    stop_at_colon: bool,
) -> Result<LogicalEnd, ScanError> {
    let mut depth: i64 = 0;
    loop {
        if row >= lines.len() {
            return Err(ScanError);
        }
        let bytes = lines[row].as_bytes();
        if col >= bytes.len() {
            if depth > 0 {
                row += 1;
                col = 0;
                continue;
            }
            if stop_at_colon {
                return Err(ScanError);
            }
            return Ok(LogicalEnd::LineEnd { next_row: row + 1 });
        }
        match bytes[col] {
            b'#' => col = bytes.len(),
            b'(' | b'[' | b'{' => {
                depth += 1;
                col += 1;
            }
            b')' | b']' | b'}' => {
                depth -= 1;
                col += 1;
            }
            b'"' | b'\'' => {
                let (new_row, new_col) = skip_string(lines, row, col)?;
                row = new_row;
                col = new_col;
            }
            b'\\' if col + 1 == bytes.len() => {
                row += 1;
                col = 0;
            }
            b':' if depth == 0 && stop_at_colon => return Ok(LogicalEnd::Colon { row, col }),
            _ => col += 1,
        }
    }
}

/// Checks for a string literal (with optional prefix letters) at the start
/// of `lines[row]` and returns its capture span, `end` exclusive and
/// covering every physical line the literal spans.
fn string_span(lines: &[String], row: usize) -> Result<Option<(usize, usize)>, ScanError> {
    let line = &lines[row];
    let bytes = line.as_bytes();
    let mut pos = indent_bytes(line);
    while pos < bytes.len() && matches!(bytes[pos], b'u' | b'r' | b'b' | b'U' | b'R' | b'B') {
        pos += 1;
    }
    if pos >= bytes.len() || !(bytes[pos] == b'"' || bytes[pos] == b'\'') {
        return Ok(None);
    }
    let (end_row, _) = skip_string(lines, row, pos)?;
    Ok(Some((row, end_row + 1)))
}

fn scan_definition(lines: &[String], start: usize) -> Result<Option<(usize, usize)>, ScanError> {
    // skip decorators, comments, and blank lines before the header
    let mut row = start;
    let header_row = loop {
        if row >= lines.len() {
            return Ok(None);
        }
        let trimmed = lines[row].trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            row += 1;
            continue;
        }
        if trimmed.starts_with('@') {
            match scan_logical_line(lines, row, indent_bytes(&lines[row]), false)? {
                LogicalEnd::LineEnd { next_row } => {
                    row = next_row;
                    continue;
                }
                LogicalEnd::Colon { .. } => return Ok(None),
            }
        }
        break row;
    };

    let header = &lines[header_row];
    let def_indent = lines::get_indent(header);
    let trimmed = header.trim_start();
    let rest = trimmed
        .strip_prefix("async")
        .map(str::trim_start)
        .unwrap_or(trimmed);
    if !starts_with_keyword(rest, "def") && !starts_with_keyword(rest, "class") {
        return Ok(None);
    }

    // find the header's terminating colon at bracket depth zero
    let (colon_row, colon_col) =
        match scan_logical_line(lines, header_row, indent_bytes(header), true)? {
            LogicalEnd::Colon { row, col } => (row, col),
            LogicalEnd::LineEnd { .. } => return Ok(None),
        };

    // source after the colon means a one-line body, which cannot have a
    // docstring
    let after = lines[colon_row][colon_col + 1..].trim();
    if !after.is_empty() && !after.starts_with('#') {
        return Ok(None);
    }

    // skip comments and blank lines down to the block's first statement
    let mut body_row = colon_row + 1;
    while body_row < lines.len() {
        let trimmed = lines[body_row].trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            body_row += 1;
            continue;
        }
        break;
    }
    if body_row >= lines.len() {
        return Ok(None);
    }
    // no indent after the header means no block
    if lines::get_indent(&lines[body_row]) <= def_indent {
        return Ok(None);
    }
    string_span(lines, body_row)
}

/// Finds the module docstring span: the first statement of the file, after
/// any leading comments and blank lines, when it is a bare string literal.
pub(crate) fn module_docstring(lines: &[String]) -> Option<(usize, usize)> {
    let mut row = 0;
    while row < lines.len() {
        let trimmed = lines[row].trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            row += 1;
            continue;
        }
        break;
    }
    if row >= lines.len() || lines::get_indent(&lines[row]) != 0 {
        return None;
    }
    match string_span(lines, row) {
        Ok(span) => span,
        Err(ScanError) => None,
    }
}

/// Finds the docstring span for the definition whose header begins at
/// `start`, or `None` when the definition has none. Scanner diagnostics are
/// swallowed and treated as the end of the token stream.
pub(crate) fn definition_docstring(lines: &[String], start: usize) -> Option<(usize, usize)> {
    match scan_definition(lines, start) {
        Ok(span) => span,
        Err(ScanError) => {
            debug!("lexical scan ended early for definition at line {}", start + 1);
            None
        }
    }
}
