//! # schemakit
//!
//! Declarative attribute schemas for typed provider resources.
//!
//! A resource declares its arguments and attributes as a map of attribute
//! name to [`Schema`]. Each schema names a [`ValueType`], whether the
//! attribute is required, optional or computed, and for collections the
//! element it holds: either another primitive [`Schema`] or a nested
//! [`Block`] of attributes.
//!
//! ## Example
//!
//! ```
//! use schemakit::{Block, Schema, SchemaMap, ValueType};
//!
//! let mut schema = SchemaMap::new();
//! schema.insert("name".into(), Schema::required(ValueType::String));
//! schema.insert("tags".into(), Schema::map_of(ValueType::String).optional());
//! schema.insert(
//!     "container".into(),
//!     Schema::block_list(
//!         Block::new()
//!             .attribute("image", Schema::required(ValueType::String))
//!             .attribute("cpu", Schema::required(ValueType::Float)),
//!     ),
//! );
//!
//! assert_eq!(schema["container"].value_type, ValueType::List);
//! assert!(schema["container"].nested_block().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod schema;
pub mod types;

pub use schema::{Block, Elem, Schema, SchemaMap};
pub use types::ValueType;
