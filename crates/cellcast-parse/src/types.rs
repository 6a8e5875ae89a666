use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Leaf kinds a column can declare.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Double,
    String,
    Bool,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ScalarKind::Int),
            "double" => Some(ScalarKind::Double),
            "string" => Some(ScalarKind::String),
            "bool" => Some(ScalarKind::Bool),
            _ => None,
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `type name` member of an object type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: TypeDescriptor,
    pub name: String,
}

/// `kind(Mark.field)` or `kind(Mark.via.field)`: a value that must exist in
/// another exported sheet.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundReference {
    pub kind: ScalarKind,
    pub mark: String,
    pub field: String,
    pub via: Option<String>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    List(Box<TypeDescriptor>),
    Object(Vec<FieldDecl>),
    /// Structural marker; the extractor builds the mapping from sub-rows.
    Map,
    Bound(BoundReference),
}

impl TypeDescriptor {
    /// Name written into schema entries. Bound references report their
    /// base kind.
    pub fn schema_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Scalar(kind) => kind.as_str(),
            TypeDescriptor::Bound(b) => b.kind.as_str(),
            TypeDescriptor::Map => "map",
            TypeDescriptor::List(_) => "list",
            TypeDescriptor::Object(_) => "object",
        }
    }

    /// Leaf kind for scalars and bound references.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            TypeDescriptor::Scalar(kind) => Some(*kind),
            TypeDescriptor::Bound(b) => Some(b.kind),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, TypeDescriptor::Map)
    }

    pub fn as_object(&self) -> Option<&[FieldDecl]> {
        match self {
            TypeDescriptor::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(kind) => write!(f, "{kind}"),
            TypeDescriptor::Map => f.write_str("map"),
            TypeDescriptor::List(elem) => write!(f, "{elem}[]"),
            TypeDescriptor::Object(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(":")?;
                    }
                    write!(f, "{} {}", field.ty, field.name)?;
                }
                f.write_str("}")
            }
            TypeDescriptor::Bound(b) => match &b.via {
                Some(via) => write!(f, "{}({}.{}.{})", b.kind, b.mark, via, b.field),
                None => write!(f, "{}({}.{})", b.kind, b.mark, b.field),
            },
        }
    }
}
