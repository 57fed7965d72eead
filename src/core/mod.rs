mod docstring;
mod engine;
mod lines;
mod locator;

// Docstring grammars and renderers
pub mod parser;
pub mod writer;

pub use docstring::{DirectiveKind, Docstring, Element, Field, FieldTable, SectionKind};
pub use engine::{convert_file, convert_source, Engine};
pub use lines::LineCursor;
pub use locator::{ModuleLocator, RawCapture};
