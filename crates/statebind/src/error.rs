//! Error types for marshalling and validation.
//!
//! Decode/encode failures ([`Error`]) are scoped to the single offending
//! field so a failure is diagnosable without dumping the whole state.
//! Registration-time failures ([`ValidationError`]) stop at the first
//! mismatch.

use thiserror::Error;

/// Errors raised while decoding or encoding a typed model.
#[derive(Debug, Error)]
pub enum Error {
    /// A field carries a malformed annotation
    #[error("invalid annotation on field `{field}` of `{model}`: {source}")]
    Annotation {
        /// Model the field belongs to
        model: &'static str,
        /// Rust field name
        field: &'static str,
        /// What was wrong with the annotation
        source: AnnotationError,
    },

    /// A value in the state does not fit the field's type
    #[error("field `{field}` (path `{path}`): expected {expected}, got {value}")]
    Conversion {
        /// Field location, dotted through nested blocks
        field: String,
        /// State path of the field
        path: String,
        /// Expected kind
        expected: String,
        /// The offending value
        value: String,
    },

    /// A value does not fit a type; not yet attributed to a field
    #[error("expected {expected}, got {value}")]
    Mismatch {
        /// Expected kind
        expected: String,
        /// The offending value
        value: String,
    },

    /// The field's type has no state representation
    #[error("field `{field}` (path `{path}`): unsupported kind {kind}")]
    UnsupportedKind {
        /// Field location, dotted through nested blocks
        field: String,
        /// State path of the field
        path: String,
        /// The field's static kind
        kind: String,
    },

    /// No backing store bound for the requested operation
    #[error("no state accessor is bound for {operation}")]
    NoAccessor {
        /// Operation that needed the accessor
        operation: &'static str,
    },

    /// The backing store rejected a write
    #[error("setting `{path}`: {source}")]
    Store {
        /// Path being written
        path: String,
        /// Store failure
        source: StoreError,
    },

    /// A model was asked for a field it does not declare
    #[error("field `{field}` is not declared on `{model}`")]
    UnknownField {
        /// Model name
        model: &'static str,
        /// Requested field
        field: String,
    },

    /// The remote resource already exists and must be imported first
    #[error(
        "a resource with the ID {id:?} already exists - it needs to be imported into the state to be managed; see the documentation for {resource_type:?}"
    )]
    RequiresImport {
        /// Resource type name
        resource_type: String,
        /// Existing resource ID
        id: String,
    },
}

impl Error {
    /// Build an unattributed mismatch from an expected kind and a value.
    pub fn mismatch(expected: impl ToString, value: &impl std::fmt::Debug) -> Self {
        Self::Mismatch {
            expected: expected.to_string(),
            value: format!("{value:?}"),
        }
    }

    /// Attribute the error to a field, prefixing nested locations.
    #[must_use]
    pub fn at_field(self, field: &str, path: &str) -> Self {
        match self {
            Self::Mismatch { expected, value } => Self::Conversion {
                field: field.to_string(),
                path: path.to_string(),
                expected,
                value,
            },
            Self::Conversion {
                field: inner,
                path: inner_path,
                expected,
                value,
            } => Self::Conversion {
                field: join_field(field, &inner),
                path: format!("{path}.{inner_path}"),
                expected,
                value,
            },
            Self::UnsupportedKind {
                field: inner,
                path: inner_path,
                kind,
            } => Self::UnsupportedKind {
                field: join_field(field, &inner),
                path: format!("{path}.{inner_path}"),
                kind,
            },
            other => other,
        }
    }

    /// Attribute the error to an element of a list.
    #[must_use]
    pub fn at_index(self, index: usize) -> Self {
        match self {
            Self::Mismatch { expected, value } => Self::Mismatch {
                expected,
                value: format!("{value} at index {index}"),
            },
            Self::Conversion {
                field,
                path,
                expected,
                value,
            } => Self::Conversion {
                field: join_field(&format!("[{index}]"), &field),
                path: format!("{index}.{path}"),
                expected,
                value,
            },
            Self::UnsupportedKind { field, path, kind } => Self::UnsupportedKind {
                field: join_field(&format!("[{index}]"), &field),
                path: format!("{index}.{path}"),
                kind,
            },
            other => other,
        }
    }
}

fn join_field(parent: &str, child: &str) -> String {
    if child.starts_with('[') {
        format!("{parent}{child}")
    } else {
        format!("{parent}.{child}")
    }
}

/// Malformed field annotations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// `=> ""`
    #[error("the annotation was defined but empty")]
    Empty,

    /// Target path is blank after trimming
    #[error("the annotation {annotation:?} has an empty target path")]
    EmptyPath {
        /// Raw annotation
        annotation: String,
    },

    /// A trailing keyword is not recognised
    #[error("the keyword {token:?} is not implemented - annotation is {annotation:?}")]
    UnknownKeyword {
        /// Offending token as written
        token: String,
        /// Raw annotation
        annotation: String,
    },

    /// Both version keywords on one field
    #[error(
        "the annotation {annotation:?} sets both addedInNextMajorVersion and removedInNextMajorVersion"
    )]
    ConflictingVersionFlags {
        /// Raw annotation
        annotation: String,
    },

    /// Two fields at one level share a target path
    #[error("the target path {path:?} is used by both `{first}` and `{second}`")]
    DuplicatePath {
        /// Shared path
        path: String,
        /// First field using it
        first: &'static str,
        /// Second field using it
        second: &'static str,
    },
}

/// Failures raised by a backing store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The key is not part of the resource schema
    #[error("`{key}` is not declared in the schema")]
    UnknownKey {
        /// Rejected key
        key: String,
    },
}

/// Model/schema conformance failures, fatal at registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Every field of a registered model needs an annotation
    #[error("field `{field}` of `{model}` is missing an annotation")]
    MissingAnnotation {
        /// Model name
        model: &'static str,
        /// Rust field name
        field: &'static str,
    },

    /// Annotation could not be parsed
    #[error("field `{field}` of `{model}`: {source}")]
    Annotation {
        /// Model name
        model: &'static str,
        /// Rust field name
        field: &'static str,
        /// Parse failure
        source: AnnotationError,
    },

    /// Annotation points to a path the schema does not declare
    #[error("field `{field}` of `{model}` maps to `{path}`, which is not defined in the schema")]
    MissingSchemaField {
        /// Model name
        model: &'static str,
        /// Rust field name
        field: &'static str,
        /// Target path
        path: String,
    },

    /// Field type and schema type disagree
    #[error(
        "field `{field}` of `{model}` (path `{path}`): schema declares {schema_type} but the field is {field_kind}"
    )]
    KindMismatch {
        /// Model name
        model: &'static str,
        /// Rust field name
        field: &'static str,
        /// Target path
        path: String,
        /// Declared schema type
        schema_type: String,
        /// Static field kind
        field_kind: String,
    },

    /// A list/set/map schema without an element
    #[error("field `{field}` of `{model}` (path `{path}`): {schema_type} schema declares no element")]
    MissingElement {
        /// Model name
        model: &'static str,
        /// Rust field name
        field: &'static str,
        /// Target path
        path: String,
        /// Declared schema type
        schema_type: String,
    },

    /// Failure inside a nested block
    #[error("within `{field}` of `{model}`: {source}")]
    Nested {
        /// Outer model name
        model: &'static str,
        /// Outer field holding the block
        field: &'static str,
        /// Nested failure
        source: Box<ValidationError>,
    },

    /// A key appears in both the arguments and the attributes of a resource
    #[error("resource `{resource_type}`: `{key}` is defined in both arguments and attributes")]
    DuplicateSchemaKey {
        /// Resource type name
        resource_type: String,
        /// Conflicting key
        key: String,
    },

    /// Validation of a registered resource failed
    #[error("resource `{resource_type}`: {source}")]
    Resource {
        /// Resource type name
        resource_type: String,
        /// Model failure
        source: Box<ValidationError>,
    },
}

/// Result alias for marshalling operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_attributed_to_field() {
        let err = Error::mismatch("i64", &"x").at_field("number", "number");
        match err {
            Error::Conversion {
                field,
                path,
                expected,
                value,
            } => {
                assert_eq!(field, "number");
                assert_eq!(path, "number");
                assert_eq!(expected, "i64");
                assert_eq!(value, "\"x\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nested_location() {
        let err = Error::mismatch("String", &1)
            .at_field("image", "image")
            .at_index(2)
            .at_field("containers", "containers");
        let msg = err.to_string();
        assert!(msg.contains("`containers[2].image`"), "{msg}");
        assert!(msg.contains("`containers.2.image`"), "{msg}");
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = Error::NoAccessor { operation: "decode" }.at_field("a", "a");
        assert!(matches!(err, Error::NoAccessor { .. }));
    }
}
