//! Field-token renderers for the reST and epytext styles
//!
//! Both styles render one field token per line and a separate type token;
//! they differ only in token syntax (`:param x:` versus `@param x:`) and in
//! which keyword names the attribute type token.

use crate::core::docstring::{DirectiveKind, Field};
use crate::error::{DocshiftError, Result};

use super::base::DocstringWriter;
use super::OutputStyle;

impl<'a> DocstringWriter<'a> {
    fn directive_token(&self, name: &str) -> String {
        match self.style {
            OutputStyle::Epytext => format!("@{}:", name),
            _ => format!(".. {}::", name),
        }
    }

    fn var_token(&self, field: &str, name: &str) -> String {
        match self.style {
            OutputStyle::Epytext => format!("@{} {}:", field, name),
            _ => format!(":{} {}:", field, name),
        }
    }

    fn field_token(&self, field: &str) -> String {
        match self.style {
            OutputStyle::Epytext => format!("@{}:", field),
            _ => format!(":{}:", field),
        }
    }

    fn attr_type_field(&self) -> &'static str {
        match self.style {
            OutputStyle::Epytext => "type",
            _ => "vartype",
        }
    }

    pub(super) fn write_directive_fielded(&mut self, kind: DirectiveKind, body: &[String]) {
        let header = self.directive_token(kind.name());
        for (i, line) in body.iter().enumerate() {
            if i == 0 {
                self.write_desc(&[line.clone()], Some(&header), 0, true);
            } else {
                self.write_line(line, 1, false, false);
            }
        }
    }

    /// Writes one field token line plus, when a type or optional marker is
    /// present, a matching type token line.
    fn write_var_fielded(
        &mut self,
        var: &Field,
        field: &str,
        type_field: &str,
        use_optional: bool,
    ) {
        let kind = self.field_kind(var, use_optional);

        let header = self.var_token(field, &var.name);
        self.write_desc(&var.desc, Some(&header), 0, true);

        if !kind.is_empty() {
            let header = self.var_token(type_field, &var.name);
            self.write_desc(&[kind], Some(&header), 0, true);
        }
    }

    pub(super) fn write_args_fielded(&mut self) {
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
        for arg in args {
            self.write_var_fielded(arg, "param", "type", true);
        }
        for keyword in keywords {
            self.write_var_fielded(keyword, "keyword", "type", false);
        }
    }

    pub(super) fn write_attributes_fielded(&mut self) {
        let doc = self.doc;
        let type_field = self.attr_type_field();
        for var in doc.attribute_fields.iter() {
            self.write_var_fielded(var, "var", type_field, false);
        }
    }

    pub(super) fn write_raises_fielded(&mut self) {
        let doc = self.doc;
        for var in &doc.raise_fields {
            let kind = self.prepare_kind(&var.kind);
            let header = self.var_token("raises", &kind);
            self.write_desc(&var.desc, Some(&header), 0, true);
        }
    }

    pub(super) fn write_returns_fielded(&mut self) -> Result<()> {
        let doc = self.doc;
        let ret = doc.return_field.as_ref().ok_or_else(|| {
            DocshiftError::InvalidElement(
                "return section marker without a return field".to_string(),
            )
        })?;
        let kind = self.prepare_kind(&ret.kind);
        if !ret.desc.is_empty() {
            let header = self.field_token("returns");
            self.write_desc(&ret.desc, Some(&header), 0, true);
        }
        if !kind.is_empty() {
            let header = self.field_token("rtype");
            self.write_desc(&[kind], Some(&header), 0, true);
        }
        Ok(())
    }
}
