use cellcast_common::Location;
use cellcast_parse::{ScalarKind, TypeError};
use cellcast_workbook::IoError;
use std::path::PathBuf;

/// Failures while turning one raw value into a typed tree node.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("`{0}` is an illegal identifier")]
    IllegalIdentifier(String),

    #[error("`{0}` is an illegal bool value")]
    IllegalBool(String),

    #[error("`{value}` is not a valid {kind}")]
    InvalidNumber { value: String, kind: ScalarKind },

    #[error("`{0}` is a map and must be laid out as key/type/value columns")]
    MapNeedsColumns(String),

    #[error("composite column `{name}` of type `{ty}` must be a list of objects")]
    ListNeedsObject { name: String, ty: String },

    #[error("map key column `{0}` has no scalar value")]
    MissingMapKey(String),

    #[error("map key `{0}` is already used by a non-map value")]
    MapKeyConflict(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{location}: {source}")]
    At {
        location: Location,
        source: BuildError,
    },

    #[error(transparent)]
    Workbook(#[from] IoError),

    #[error("`{root}` in {} is already defined in {}", path.display(), previous.display())]
    DuplicateRoot {
        root: String,
        path: PathBuf,
        previous: PathBuf,
    },

    #[error("{} is already exported", .0.display())]
    DuplicatePath(PathBuf),

    #[error("mark `{mark}` not found; `{name}` declared as `{ty}` at {location}")]
    UnresolvedMark {
        mark: String,
        name: String,
        ty: String,
        location: Location,
    },

    #[error("{mark}.{field} has no entry equal to {value}; `{name}` declared as `{ty}` at {location}")]
    UnresolvedValue {
        mark: String,
        field: String,
        value: String,
        name: String,
        ty: String,
        location: Location,
    },

    #[error("mark `{mark}` has no `{collection}` collection; referenced at {location}")]
    MissingCollection {
        mark: String,
        collection: String,
        location: Location,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML serialization failed: {0}")]
    Xml(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ExportError {
    pub fn at(location: Location, source: BuildError) -> Self {
        ExportError::At { location, source }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Write {
            path: path.into(),
            source,
        }
    }
}
