//! Titled-section renderers for the Google and NumPy styles
//!
//! Google writes `Header:` section titles with `name (type): desc` field
//! lines; NumPy writes underlined titles with `name : type` field lines and
//! descriptions indented below.

use crate::core::docstring::{DirectiveKind, Field};
use crate::error::{DocshiftError, Result};

use super::base::DocstringWriter;
use super::OutputStyle;

impl<'a> DocstringWriter<'a> {
    fn args_headers(&self) -> (&'static str, &'static str) {
        match self.style {
            OutputStyle::Numpy => ("Parameters", "Keyword Arguments"),
            _ => ("Args", "Keyword Args"),
        }
    }

    fn directive_title(&self, kind: DirectiveKind) -> &'static str {
        match self.style {
            OutputStyle::Numpy => match kind {
                DirectiveKind::Example => "Examples",
                DirectiveKind::Note => "Notes",
                DirectiveKind::SeeAlso => "See Also",
                DirectiveKind::Warning => "Warnings",
                DirectiveKind::Reference => "References",
                DirectiveKind::Todo => "Todo",
            },
            _ => match kind {
                DirectiveKind::Example => "Example",
                DirectiveKind::Note => "Note",
                DirectiveKind::SeeAlso => "See Also",
                DirectiveKind::Warning => "Warning",
                DirectiveKind::Reference => "References",
                DirectiveKind::Todo => "Todo",
            },
        }
    }

    /// Writes a section header, separated from earlier content by one blank
    /// line unless the header directly follows the opening quotes. NumPy
    /// headers are underlined with dashes.
    fn write_section_header(&mut self, header: &str) {
        let needs_blank = !self.is_first_section()
            && self.output.last().map_or(false, |line| !line.is_empty());
        if needs_blank {
            self.write_line("", 0, false, false);
        }
        match self.style {
            OutputStyle::Numpy => {
                self.write_line(header, 0, false, false);
                self.write_line(&"-".repeat(header.chars().count()), 0, false, false);
            }
            _ => self.write_line(&format!("{}:", header), 0, false, false),
        }
    }

    pub(super) fn write_directive_sectioned(&mut self, kind: DirectiveKind, body: &[String]) {
        self.write_section_header(self.directive_title(kind));
        let indent = if self.style == OutputStyle::Numpy { 0 } else { 1 };
        for line in body {
            self.write_line(line, indent, false, false);
        }
    }

    /// Writes a single field definition line, plus its description.
    fn write_var_sectioned(&mut self, var: &Field, use_optional: bool) {
        let name = self.display_name(var);
        let kind = self.field_kind(var, use_optional);
        match self.style {
            OutputStyle::Numpy => {
                let name = if kind.is_empty() {
                    name
                } else {
                    format!("{} : {}", name, kind)
                };
                self.write_line(&name, 0, false, false);
                if !var.desc.is_empty() {
                    self.write_desc(&var.desc, None, 1, false);
                }
            }
            _ => {
                let header = if kind.is_empty() {
                    name
                } else {
                    format!("{} ({})", name, kind)
                };
                if !var.desc.is_empty() {
                    self.write_desc(&var.desc, Some(&format!("{}:", header)), 1, true);
                } else {
                    self.write_line(&header, 1, false, false);
                }
            }
        }
    }

    pub(super) fn write_args_sectioned(&mut self) {
        let doc = self.doc;
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        for arg in doc.arg_fields.iter() {
            if self.config.separate_keywords && arg.optional {
                keywords.push(arg);
            } else {
                args.push(arg);
            }
        }
        let (args_header, keywords_header) = self.args_headers();
        if !args.is_empty() {
            self.write_section_header(args_header);
            for arg in args {
                self.write_var_sectioned(arg, true);
            }
        }
        if !keywords.is_empty() {
            self.write_section_header(keywords_header);
            for keyword in keywords {
                self.write_var_sectioned(keyword, false);
            }
        }
    }

    pub(super) fn write_attributes_sectioned(&mut self) {
        let doc = self.doc;
        self.write_section_header("Attributes");
        for var in doc.attribute_fields.iter() {
            self.write_var_sectioned(var, false);
        }
    }

    pub(super) fn write_raises_sectioned(&mut self) {
        let doc = self.doc;
        self.write_section_header("Raises");
        for var in &doc.raise_fields {
            let kind = self.prepare_kind(&var.kind);
            match self.style {
                OutputStyle::Numpy => {
                    if !kind.is_empty() {
                        self.write_line(&kind, 0, false, false);
                    }
                    if !var.desc.is_empty() {
                        self.write_desc(&var.desc, None, 1, false);
                    }
                }
                _ => {
                    if !var.desc.is_empty() {
                        let header = if kind.is_empty() {
                            None
                        } else {
                            Some(format!("{}:", kind))
                        };
                        self.write_desc(&var.desc, header.as_deref(), 1, true);
                    } else {
                        self.write_line(&kind, 1, false, false);
                    }
                }
            }
        }
    }

    pub(super) fn write_returns_sectioned(&mut self) -> Result<()> {
        let doc = self.doc;
        let ret = doc.return_field.as_ref().ok_or_else(|| {
            DocshiftError::InvalidElement(
                "return section marker without a return field".to_string(),
            )
        })?;
        self.write_section_header("Returns");
        let kind = self.prepare_kind(&ret.kind);
        match self.style {
            OutputStyle::Numpy => {
                // the return type is not optional for numpy docstrings
                let kind = if kind.is_empty() { "unknown".to_string() } else { kind };
                self.write_line(&kind, 0, false, false);
                if !ret.desc.is_empty() {
                    self.write_desc(&ret.desc, None, 1, false);
                }
            }
            _ => {
                if !ret.desc.is_empty() {
                    let header = if kind.is_empty() {
                        None
                    } else {
                        Some(format!("{}:", kind))
                    };
                    self.write_desc(&ret.desc, header.as_deref(), 1, false);
                } else {
                    self.write_line(&kind, 1, false, false);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::OutputConfig;
    use crate::core::docstring::{DirectiveKind, Docstring, Element};
    use crate::core::writer::{write_docstring, OutputStyle};

    fn quoted_doc() -> Docstring {
        let mut doc = Docstring::new();
        doc.add_element(Element::StartQuote("\"\"\"".to_string()));
        doc
    }

    fn described_doc() -> Docstring {
        let mut doc = quoted_doc();
        doc.add_element(Element::Raw(vec!["This is a docstring.".to_string()]));
        doc
    }

    fn close(mut doc: Docstring) -> Docstring {
        doc.add_element(Element::EndQuote("\"\"\"".to_string()));
        doc
    }

    fn long_desc() -> Option<Vec<String>> {
        Some(vec!["Description.".to_string(), "More description.".to_string()])
    }

    #[test]
    fn test_google_attributes() {
        let mut doc = described_doc();
        doc.add_attribute("attr1", Some("str".to_string()), None);
        doc.add_attribute("attr2", None, long_desc());
        let doc = close(doc);
        let config = OutputConfig::default();
        let output =
            write_docstring(&doc, OutputStyle::Google, "    ", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "    \"\"\"This is a docstring.",
                "",
                "    Attributes:",
                "        attr1 (str)",
                "        attr2: Description. More description.",
                "    \"\"\"",
            ]
        );
    }

    #[test]
    fn test_google_attributes_without_types() {
        let mut doc = quoted_doc();
        doc.add_attribute("attr1", Some("str".to_string()), None);
        doc.add_attribute("attr2", Some("int".to_string()), long_desc());
        let doc = close(doc);
        let mut config = OutputConfig::default();
        config.use_types = false;
        let output = write_docstring(&doc, OutputStyle::Google, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Attributes:",
                "    attr1",
                "    attr2: Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_google_args() {
        let mut doc = described_doc();
        doc.add_arg("arg1", Some("str".to_string()), None, false);
        doc.add_arg("arg2", Some("int".to_string()), long_desc(), true);
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Google, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"This is a docstring.",
                "",
                "Args:",
                "    arg1 (str)",
                "    arg2 (int): Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_google_args_with_optional() {
        let mut doc = described_doc();
        doc.add_arg("arg1", None, None, true);
        doc.add_arg("arg2", Some("int".to_string()), long_desc(), true);
        let doc = close(doc);
        let mut config = OutputConfig::default();
        config.use_optional = true;
        let output = write_docstring(&doc, OutputStyle::Google, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"This is a docstring.",
                "",
                "Args:",
                "    arg1 (optional)",
                "    arg2 (int, optional): Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_google_keyword_section() {
        let mut doc = described_doc();
        doc.add_arg("arg1", Some("str".to_string()), None, false);
        doc.add_arg("arg2", Some("int".to_string()), long_desc(), true);
        let doc = close(doc);
        let mut config = OutputConfig::default();
        config.separate_keywords = true;
        let output = write_docstring(&doc, OutputStyle::Google, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"This is a docstring.",
                "",
                "Args:",
                "    arg1 (str)",
                "",
                "Keyword Args:",
                "    arg2 (int): Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_google_variadic_names_are_prefixed() {
        let mut doc = quoted_doc();
        doc.add_arg("args", None, None, false);
        doc.add_arg("kwargs", None, None, true);
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(
            &doc,
            OutputStyle::Google,
            "",
            &config,
            Some("args"),
            Some("kwargs"),
        )
        .unwrap();
        assert_eq!(
            output,
            ["\"\"\"", "Args:", "    *args", "    **kwargs", "\"\"\""]
        );
    }

    #[test]
    fn test_google_raises() {
        let mut doc = quoted_doc();
        doc.add_raises("TypeError", None);
        doc.add_raises("KeyError", long_desc());
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Google, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Raises:",
                "    TypeError",
                "    KeyError: Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_google_returns() {
        let mut doc = quoted_doc();
        doc.add_return(Some("str".to_string()), long_desc());
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Google, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Returns:",
                "    str: Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_google_directives() {
        let mut doc = quoted_doc();
        doc.add_element(Element::Directive(DirectiveKind::Note, vec!["Description.".to_string()]));
        doc.add_element(Element::Directive(
            DirectiveKind::SeeAlso,
            vec!["Description.".to_string()],
        ));
        doc.add_element(Element::Directive(
            DirectiveKind::Reference,
            vec!["Description.".to_string()],
        ));
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Google, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Note:",
                "    Description.",
                "",
                "See Also:",
                "    Description.",
                "",
                "References:",
                "    Description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_attributes() {
        let mut doc = described_doc();
        doc.add_attribute("attr1", Some("str".to_string()), None);
        doc.add_attribute("attr2", None, long_desc());
        let doc = close(doc);
        let config = OutputConfig::default();
        let output =
            write_docstring(&doc, OutputStyle::Numpy, "    ", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "    \"\"\"This is a docstring.",
                "",
                "    Attributes",
                "    ----------",
                "    attr1 : str",
                "    attr2",
                "        Description. More description.",
                "    \"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_args() {
        let mut doc = described_doc();
        doc.add_arg("arg1", Some("str".to_string()), None, false);
        doc.add_arg("arg2", Some("int".to_string()), long_desc(), true);
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Numpy, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"This is a docstring.",
                "",
                "Parameters",
                "----------",
                "arg1 : str",
                "arg2 : int",
                "    Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_args_with_optional() {
        let mut doc = described_doc();
        doc.add_arg("arg1", None, None, true);
        doc.add_arg("arg2", Some("int".to_string()), long_desc(), true);
        let doc = close(doc);
        let mut config = OutputConfig::default();
        config.use_optional = true;
        let output = write_docstring(&doc, OutputStyle::Numpy, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"This is a docstring.",
                "",
                "Parameters",
                "----------",
                "arg1 : optional",
                "arg2 : int, optional",
                "    Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_keyword_section() {
        let mut doc = described_doc();
        doc.add_arg("arg1", Some("str".to_string()), None, false);
        doc.add_arg("arg2", Some("int".to_string()), long_desc(), true);
        let doc = close(doc);
        let mut config = OutputConfig::default();
        config.separate_keywords = true;
        let output = write_docstring(&doc, OutputStyle::Numpy, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"This is a docstring.",
                "",
                "Parameters",
                "----------",
                "arg1 : str",
                "",
                "Keyword Arguments",
                "-----------------",
                "arg2 : int",
                "    Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_raises() {
        let mut doc = quoted_doc();
        doc.add_raises("TypeError", None);
        doc.add_raises("KeyError", long_desc());
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Numpy, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Raises",
                "------",
                "TypeError",
                "KeyError",
                "    Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_returns() {
        let mut doc = quoted_doc();
        doc.add_return(Some("str".to_string()), long_desc());
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Numpy, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Returns",
                "-------",
                "str",
                "    Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_return_type_defaults_to_unknown() {
        let mut doc = quoted_doc();
        doc.add_return(None, long_desc());
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Numpy, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Returns",
                "-------",
                "unknown",
                "    Description. More description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_directives() {
        let mut doc = quoted_doc();
        doc.add_element(Element::Directive(DirectiveKind::Note, vec!["Description.".to_string()]));
        doc.add_element(Element::Directive(
            DirectiveKind::Example,
            vec!["Description.".to_string()],
        ));
        doc.add_element(Element::Directive(
            DirectiveKind::Warning,
            vec!["Description.".to_string()],
        ));
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Numpy, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Notes",
                "-----",
                "Description.",
                "",
                "Examples",
                "--------",
                "Description.",
                "",
                "Warnings",
                "--------",
                "Description.",
                "\"\"\"",
            ]
        );
    }

    #[test]
    fn test_numpy_blank_lines_before_trailing_raw() {
        let mut doc = quoted_doc();
        doc.add_element(Element::Directive(
            DirectiveKind::Note,
            vec!["Description.".to_string(), "More description.".to_string()],
        ));
        doc.add_element(Element::Raw(vec![
            "Some raw text.".to_string(),
            "Some more raw text.".to_string(),
        ]));
        doc.add_element(Element::Directive(DirectiveKind::Todo, vec!["Description.".to_string()]));
        doc.add_element(Element::Raw(vec![String::new(), String::new()]));
        doc.add_element(Element::Directive(
            DirectiveKind::SeeAlso,
            vec!["Description.".to_string()],
        ));
        doc.add_element(Element::Raw(vec![String::new(), String::new()]));
        doc.add_element(Element::Raw(vec![String::new(), String::new()]));
        doc.add_element(Element::Raw(vec![String::new(), "Some raw text.".to_string()]));
        let doc = close(doc);
        let config = OutputConfig::default();
        let output = write_docstring(&doc, OutputStyle::Numpy, "", &config, None, None).unwrap();
        assert_eq!(
            output,
            [
                "\"\"\"",
                "Notes",
                "-----",
                "Description.",
                "More description.",
                "",
                "",
                "Some raw text.",
                "Some more raw text.",
                "",
                "Todo",
                "----",
                "Description.",
                "",
                "See Also",
                "--------",
                "Description.",
                "",
                "",
                "Some raw text.",
                "\"\"\"",
            ]
        );
    }
}
