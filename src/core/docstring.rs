//! Style-independent docstring representation
//!
//! Parsers build a [`Docstring`] incrementally as tokens are recognized, and
//! writers render it back out in a target style. Field data for arguments,
//! attributes, raised errors, and the return value lives in tables keyed by
//! name; the element list only records *where* each section sits in document
//! order.

/// Section placeholder kinds. A marker carries no data; the data lives in
/// the corresponding field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Args,
    Attributes,
    Raises,
    Return,
}

/// Free-form annotated block kinds with no structured sub-fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Note,
    Warning,
    SeeAlso,
    Reference,
    Todo,
    Example,
}

impl DirectiveKind {
    /// Maps a recognized directive keyword (including aliases like `warn`
    /// and `ref`) to its canonical kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "note" => Some(Self::Note),
            "warning" | "warn" => Some(Self::Warning),
            "see" | "seealso" => Some(Self::SeeAlso),
            "reference" | "ref" => Some(Self::Reference),
            "todo" => Some(Self::Todo),
            "example" | "examples" => Some(Self::Example),
            _ => None,
        }
    }

    /// The canonical keyword used when writing the directive back out.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::SeeAlso => "seealso",
            Self::Reference => "reference",
            Self::Todo => "todo",
            Self::Example => "example",
        }
    }
}

/// One entry in a docstring's document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Opening quote token, including any string-prefix letters.
    StartQuote(String),
    /// Closing quote token.
    EndQuote(String),
    /// Unrecognized lines passed through verbatim.
    Raw(Vec<String>),
    /// Placeholder marking where a field section sits in document order.
    Section(SectionKind),
    /// A directive block with its body lines.
    Directive(DirectiveKind, Vec<String>),
}

impl Element {
    pub fn raw_line(line: impl Into<String>) -> Self {
        Element::Raw(vec![line.into()])
    }
}

/// A named, typed, described unit of documentation: an argument, attribute,
/// raised-error kind, or the return value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Field {
    pub name: String,
    pub kind: String,
    pub desc: Vec<String>,
    pub optional: bool,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        kind: Option<String>,
        desc: Option<Vec<String>>,
        optional: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.unwrap_or_default(),
            desc: desc.unwrap_or_default(),
            optional,
        }
    }

    /// Merges incoming data into this field. Absent values are no-ops so a
    /// field touched once for its description and once for its type
    /// converges to one entry regardless of order.
    pub fn update(&mut self, kind: Option<String>, desc: Option<Vec<String>>, optional: Option<bool>) {
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(desc) = desc {
            self.desc = desc;
        }
        if let Some(optional) = optional {
            self.optional = optional;
        }
    }
}

/// Ordered name-to-field map. Insertion order is preserved and is the
/// document order of first mention; duplicate names update the existing
/// field rather than appending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTable {
    fields: Vec<Field>,
}

impl FieldTable {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}

/// The style-agnostic intermediate representation of one docstring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Docstring {
    pub elements: Vec<Element>,
    pub arg_fields: FieldTable,
    pub attribute_fields: FieldTable,
    pub raise_fields: Vec<Field>,
    pub return_field: Option<Field>,
}

impl Docstring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Adds or merges an argument. The section marker is appended only for
    /// the first argument so it records where the section first appeared.
    pub fn add_arg(
        &mut self,
        arg: &str,
        kind: Option<String>,
        desc: Option<Vec<String>>,
        optional: bool,
    ) {
        let name = arg.trim_start_matches('*');
        if self.arg_fields.is_empty() {
            self.elements.push(Element::Section(SectionKind::Args));
        }
        match self.arg_fields.get_mut(name) {
            Some(field) => field.update(kind, desc, Some(optional)),
            None => self.arg_fields.push(Field::new(name, kind, desc, optional)),
        }
    }

    /// Adds or merges an attribute.
    pub fn add_attribute(&mut self, var: &str, kind: Option<String>, desc: Option<Vec<String>>) {
        if self.attribute_fields.is_empty() {
            self.elements.push(Element::Section(SectionKind::Attributes));
        }
        match self.attribute_fields.get_mut(var) {
            Some(field) => field.update(kind, desc, None),
            None => self.attribute_fields.push(Field::new(var, kind, desc, false)),
        }
    }

    /// Adds or merges the return value.
    pub fn add_return(&mut self, kind: Option<String>, desc: Option<Vec<String>>) {
        match self.return_field.as_mut() {
            Some(field) => field.update(kind, desc, None),
            None => {
                self.elements.push(Element::Section(SectionKind::Return));
                self.return_field = Some(Field::new("", kind, desc, false));
            }
        }
    }

    /// Appends a raised-error kind. Raises are a list, not a table: the same
    /// error kind may legitimately be documented twice.
    pub fn add_raises(&mut self, kind: &str, desc: Option<Vec<String>>) {
        if self.raise_fields.is_empty() {
            self.elements.push(Element::Section(SectionKind::Raises));
        }
        self.raise_fields
            .push(Field::new("", Some(kind.to_string()), desc, false));
    }

    /// Records a type for an argument, creating the field if needed.
    pub fn add_arg_type(&mut self, name: &str, kind: String) {
        let name = name.trim_start_matches('*');
        match self.arg_fields.get_mut(name) {
            Some(field) => field.update(Some(kind), None, None),
            None => self.add_arg(name, Some(kind), None, false),
        }
    }

    /// Records a type for an attribute, creating the field if needed.
    pub fn add_attribute_type(&mut self, name: &str, kind: String) {
        match self.attribute_fields.get_mut(name) {
            Some(field) => field.update(Some(kind), None, None),
            None => self.add_attribute(name, Some(kind), None),
        }
    }

    /// Records the return type, creating the return field if needed.
    pub fn add_return_type(&mut self, kind: String) {
        match self.return_field.as_mut() {
            Some(field) => field.update(Some(kind), None, None),
            None => self.add_return(Some(kind), None),
        }
    }
}
