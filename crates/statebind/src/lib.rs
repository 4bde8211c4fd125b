//! # statebind
//!
//! Bidirectional marshalling between schema-described resource state and
//! plain typed Rust structs.
//!
//! Handler authors declare a model once with [`typed_model!`], annotating
//! each field with the state path it lives under. At request time a
//! [`ResourceMetaData`] binds the engine to the request's backing store:
//! [`ResourceMetaData::decode`] fills the model, handler logic runs, and
//! [`ResourceMetaData::encode`] writes it back. At registration,
//! [`validate_resource`] checks that every model fits its schema.
//!
//! ## Core Concepts
//!
//! - **Value**: the dynamic state tree (`Null`, scalars, lists, maps)
//! - **Annotation**: `"path[, addedInNextMajorVersion | removedInNextMajorVersion]"`
//! - **Model / Marshal**: the generated field visitor and per-type conversions
//! - **Features**: the version feature flag, passed by value
//!
//! ## Example
//!
//! ```
//! use statebind::{typed_model, Features, ResourceData, ResourceMetaData, StateReader, Value};
//!
//! typed_model! {
//!     #[derive(Debug, Default)]
//!     pub struct Job {
//!         pub name: String => "name",
//!         pub replicas: Option<i64> => "replica_count",
//!         pub args: Vec<String> => "args",
//!     }
//! }
//!
//! let mut data = ResourceData::new();
//! let mut metadata = ResourceMetaData::new(Features::default()).with_resource_data(&mut data);
//!
//! let job = Job { name: "nightly".into(), replicas: Some(2), args: vec![] };
//! metadata.encode(&job).unwrap();
//!
//! let mut decoded = Job::default();
//! metadata.decode(&mut decoded).unwrap();
//! assert_eq!(decoded.replicas, Some(2));
//! drop(metadata);
//!
//! assert_eq!(data.get("args"), Some(Value::List(vec![])));
//! ```
//!
//! ## Provider Traits
//!
//! - [`StateReader`] / [`StateWriter`]: the backing store
//! - [`DebugLogger`]: receives serialization traces
//! - [`TypedResource`]: a registered resource and its schema

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod annotation;
pub mod decode;
pub mod encode;
pub mod error;
pub mod features;
pub mod kind;
pub mod logger;
mod macros;
pub mod metadata;
pub mod resource;
pub mod validate;
pub mod value;

// Re-export main types at crate root
pub use accessor::{ResourceData, ResourceDiff, StateReader, StateWriter};
pub use annotation::{FieldDescriptor, parse_annotation};
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{AnnotationError, Error, Result, StoreError, ValidationError};
pub use features::Features;
pub use kind::{BlockType, FieldSpec, Kind, Marshal, Model};
pub use logger::{DebugLogger, LogLogger, MemoryLogger, NullLogger};
pub use metadata::ResourceMetaData;
pub use resource::{TypedResource, combined_schema, validate_resource};
pub use validate::{validate, validate_model, validate_model_with};
pub use value::Value;
