pub mod parser;
pub mod types;

pub use parser::{TypeError, parse_type};
pub use types::{BoundReference, FieldDecl, ScalarKind, TypeDescriptor};
