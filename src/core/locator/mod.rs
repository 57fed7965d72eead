//! Docstring location
//!
//! Two independent passes over the same text find docstrings: a tree-sitter
//! syntax parse enumerates module, function, class, and assignment
//! declarations in source order including nested scopes, and the lexical
//! scan in [`scan`] finds the string literal attached to each declaration
//! header within a bounded line range.

mod scan;

use tree_sitter::{Node, Parser};

use crate::error::{DocshiftError, Result};

/// The raw line range and text belonging to one docstring, plus the owning
/// declaration's parameter metadata. `end` is exclusive and covers every
/// physical line the string literal spans.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCapture {
    pub start: usize,
    pub end: usize,
    pub lines: Vec<String>,
    pub args: Vec<String>,
    pub keywords: Vec<String>,
    pub vararg: Option<String>,
    pub kwarg: Option<String>,
}

impl RawCapture {
    /// A capture with no parameter metadata, used for module, class, and
    /// attribute docstrings.
    fn plain(start: usize, end: usize, lines: Vec<String>) -> Self {
        Self {
            start,
            end,
            lines,
            args: Vec::new(),
            keywords: Vec::new(),
            vararg: None,
            kwarg: None,
        }
    }
}

/// Walks one source file and collects every docstring capture in source
/// order.
pub struct ModuleLocator {
    lines: Vec<String>,
    /// The captures found after running [`parse`](Self::parse).
    pub docstrings: Vec<RawCapture>,
}

impl ModuleLocator {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            docstrings: Vec::new(),
        }
    }

    /// Parses the file with tree-sitter and walks the tree depth-first,
    /// collecting module, function, class, and attribute docstrings.
    pub fn parse(&mut self) -> Result<()> {
        let source = self.lines.join("\n");
        let mut parser = Parser::new();
        let python_language = tree_sitter_python::language();
        parser
            .set_language(&python_language)
            .map_err(|e| DocshiftError::Parser(format!("failed to set Python language: {}", e)))?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| DocshiftError::Parser("failed to parse Python source".to_string()))?;

        self.docstrings.clear();
        if let Some((start, end)) = scan::module_docstring(&self.lines) {
            self.docstrings
                .push(RawCapture::plain(start, end, self.capture_lines(start, end)));
        }
        self.visit_block(tree.root_node(), &source, true);
        Ok(())
    }

    fn capture_lines(&self, start: usize, end: usize) -> Vec<String> {
        self.lines[start..end.min(self.lines.len())].to_vec()
    }

    /// Visits the statements of one block. Attribute docstrings only fire
    /// for siblings directly in a module or class body; lambdas and
    /// generator expressions are never traversed.
    fn visit_block(&mut self, node: Node, source: &str, attr_eligible: bool) {
        let mut cursor = node.walk();
        let statements: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect();
        for (index, statement) in statements.iter().enumerate() {
            match statement.kind() {
                "function_definition" => self.visit_function(*statement, source),
                "class_definition" => self.visit_class(*statement, source),
                "decorated_definition" => {
                    if let Some(definition) = statement.child_by_field_name("definition") {
                        match definition.kind() {
                            "function_definition" => self.visit_function(definition, source),
                            "class_definition" => self.visit_class(definition, source),
                            _ => {}
                        }
                    }
                }
                "expression_statement" => {
                    let is_assignment = statement
                        .named_child(0)
                        .map_or(false, |child| child.kind() == "assignment");
                    if attr_eligible && is_assignment {
                        if let Some(capture) = statements
                            .get(index + 1)
                            .and_then(|next| self.attribute_docstring(*next))
                        {
                            self.docstrings.push(capture);
                        }
                    }
                }
                "lambda" | "generator_expression" => {}
                _ => self.visit_block(*statement, source, false),
            }
        }
    }

    fn visit_function(&mut self, node: Node, source: &str) {
        let start = node.start_position().row;
        if let Some((doc_start, doc_end)) = scan::definition_docstring(&self.lines, start) {
            let (args, keywords, vararg, kwarg) = extract_params(node, source);
            self.docstrings.push(RawCapture {
                start: doc_start,
                end: doc_end,
                lines: self.capture_lines(doc_start, doc_end),
                args,
                keywords,
                vararg,
                kwarg,
            });
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit_block(body, source, false);
        }
    }

    fn visit_class(&mut self, node: Node, source: &str) {
        let start = node.start_position().row;
        if let Some((doc_start, doc_end)) = scan::definition_docstring(&self.lines, start) {
            self.docstrings.push(RawCapture::plain(
                doc_start,
                doc_end,
                self.capture_lines(doc_start, doc_end),
            ));
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit_block(body, source, true);
        }
    }

    /// A bare string-literal statement directly following an assignment is
    /// an attribute docstring. The tree gives the literal's exact span.
    fn attribute_docstring(&self, next: Node) -> Option<RawCapture> {
        if next.kind() != "expression_statement" {
            return None;
        }
        let child = next.named_child(0)?;
        if child.kind() != "string" {
            return None;
        }
        let start = child.start_position().row;
        let end = child.end_position().row + 1;
        Some(RawCapture::plain(start, end, self.capture_lines(start, end)))
    }
}

fn node_text(node: Node, source: &str) -> String {
    source[node.byte_range()].to_string()
}

/// Extracts parameter metadata from a function signature: positional names
/// are those without defaults before any variadic marker; names with
/// defaults and keyword-only names are keywords.
fn extract_params(
    node: Node,
    source: &str,
) -> (Vec<String>, Vec<String>, Option<String>, Option<String>) {
    let mut args = Vec::new();
    let mut keywords = Vec::new();
    let mut vararg = None;
    let mut kwarg = None;

    let params = match node.child_by_field_name("parameters") {
        Some(params) => params,
        None => return (args, keywords, vararg, kwarg),
    };
    let mut cursor = params.walk();
    let mut after_star = false;
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "identifier" => {
                let name = node_text(param, source);
                if after_star {
                    keywords.push(name);
                } else {
                    args.push(name);
                }
            }
            "typed_parameter" => {
                if let Some(inner) = param.named_child(0) {
                    match inner.kind() {
                        "identifier" => {
                            let name = node_text(inner, source);
                            if after_star {
                                keywords.push(name);
                            } else {
                                args.push(name);
                            }
                        }
                        "list_splat_pattern" => {
                            after_star = true;
                            vararg = inner.named_child(0).map(|n| node_text(n, source));
                        }
                        "dictionary_splat_pattern" => {
                            kwarg = inner.named_child(0).map(|n| node_text(n, source));
                        }
                        _ => {}
                    }
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name_node) = param.child_by_field_name("name") {
                    keywords.push(node_text(name_node, source));
                }
            }
            "list_splat_pattern" => {
                after_star = true;
                vararg = param.named_child(0).map(|n| node_text(n, source));
            }
            "dictionary_splat_pattern" => {
                kwarg = param.named_child(0).map(|n| node_text(n, source));
            }
            "keyword_separator" => after_star = true,
            _ => {}
        }
    }
    (args, keywords, vararg, kwarg)
}
