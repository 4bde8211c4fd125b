//! Static type descriptors and the conversion traits behind them.
//!
//! [`Marshal`] converts one Rust type to and from a [`Value`] and reports
//! its [`Kind`]. [`Model`] is the per-struct field visitor: it lists the
//! struct's fields with their annotations and kinds, and reads or writes a
//! single field by name. Both are normally generated by
//! [`typed_model!`](crate::typed_model).

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Static kind of a model field
#[derive(Debug, Clone)]
pub enum Kind {
    /// `String`
    String,
    /// Signed integer of the given width
    Int {
        /// Bit width
        bits: u32,
    },
    /// Float of the given width
    Float {
        /// Bit width
        bits: u32,
    },
    /// `bool`
    Bool,
    /// `Vec<T>`
    List(Box<Kind>),
    /// `HashMap<String, T>`
    Map(Box<Kind>),
    /// `Option<T>`
    Optional(Box<Kind>),
    /// A nested model
    Block(BlockType),
}

impl Kind {
    /// Whether this is a single primitive
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Int { .. } | Self::Float { .. } | Self::Bool
        )
    }

    /// Whether the kind has a state representation as a model field.
    ///
    /// Supported: scalars, `Option<scalar>`, `Vec<scalar>`,
    /// `HashMap<String, scalar>`, `Vec<Model>`, and an `Option` around any of
    /// the collection shapes.
    pub fn is_supported(&self) -> bool {
        match self {
            Self::Optional(inner) => inner.is_scalar() || inner.is_supported_collection(),
            other => other.is_scalar() || other.is_supported_collection(),
        }
    }

    fn is_supported_collection(&self) -> bool {
        match self {
            Self::List(elem) => elem.is_scalar() || matches!(**elem, Self::Block(_)),
            Self::Map(elem) => elem.is_scalar(),
            _ => false,
        }
    }

    /// Strip any `Option` wrapper
    pub fn unwrap_optional(&self) -> &Kind {
        match self {
            Self::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("String"),
            Self::Int { bits } => write!(f, "i{bits}"),
            Self::Float { bits } => write!(f, "f{bits}"),
            Self::Bool => f.write_str("bool"),
            Self::List(elem) => write!(f, "Vec<{elem}>"),
            Self::Map(elem) => write!(f, "HashMap<String, {elem}>"),
            Self::Optional(inner) => write!(f, "Option<{inner}>"),
            Self::Block(block) => f.write_str(block.name),
        }
    }
}

/// Handle on a nested model's field list.
///
/// Fields are produced lazily so self-referencing models don't recurse
/// while building their kind.
#[derive(Clone, Copy)]
pub struct BlockType {
    /// Model name
    pub name: &'static str,
    /// Field list of the model
    pub fields: fn() -> Vec<FieldSpec>,
}

impl BlockType {
    /// Describe the model `M`
    pub fn of<M: Model>() -> Self {
        Self {
            name: M::model_name(),
            fields: M::fields,
        }
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType").field("name", &self.name).finish()
    }
}

/// One field of a model
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Rust field name
    pub name: &'static str,
    /// Raw annotation, if any
    pub annotation: Option<&'static str>,
    /// Static kind; only recorded for annotated fields
    pub kind: Option<Kind>,
}

impl FieldSpec {
    /// Create a field spec
    pub fn new(name: &'static str, annotation: Option<&'static str>, kind: Option<Kind>) -> Self {
        Self {
            name,
            annotation,
            kind,
        }
    }
}

/// Conversion between a Rust type and a state [`Value`].
pub trait Marshal: Sized {
    /// Static kind of the type
    fn kind() -> Kind;

    /// Build the type from a present, non-null value
    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Self>;

    /// Convert the type into a value
    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value>;
}

/// A typed model: a struct whose annotated fields map onto state paths.
pub trait Model: Default {
    /// Type name used in messages
    fn model_name() -> &'static str;

    /// All fields, in declaration order
    fn fields() -> Vec<FieldSpec>;

    /// Decode `value` into the named field
    fn decode_field(&mut self, field: &str, value: &Value, decoder: &Decoder<'_>) -> Result<()>;

    /// Encode the named field
    fn encode_field(&self, field: &str, encoder: &Encoder<'_>) -> Result<Value>;
}

impl Marshal for String {
    fn kind() -> Kind {
        Kind::String
    }

    fn decode(value: &Value, _decoder: &Decoder<'_>) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::mismatch(Self::kind(), other)),
        }
    }

    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl Marshal for i64 {
    fn kind() -> Kind {
        Kind::Int { bits: 64 }
    }

    fn decode(value: &Value, _decoder: &Decoder<'_>) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            other => Err(Error::mismatch(Self::kind(), other)),
        }
    }

    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value> {
        Ok(Value::Int(*self))
    }
}

impl Marshal for i32 {
    fn kind() -> Kind {
        Kind::Int { bits: 32 }
    }

    fn decode(value: &Value, _decoder: &Decoder<'_>) -> Result<Self> {
        match value {
            Value::Int(i) => Self::try_from(*i).map_err(|_| Error::Mismatch {
                expected: Self::kind().to_string(),
                value: format!("{i} (out of range)"),
            }),
            other => Err(Error::mismatch(Self::kind(), other)),
        }
    }

    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value> {
        Ok(Value::Int(i64::from(*self)))
    }
}

impl Marshal for f64 {
    fn kind() -> Kind {
        Kind::Float { bits: 64 }
    }

    fn decode(value: &Value, _decoder: &Decoder<'_>) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::mismatch(Self::kind(), value))
    }

    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value> {
        Ok(Value::Float(*self))
    }
}

impl Marshal for f32 {
    fn kind() -> Kind {
        Kind::Float { bits: 32 }
    }

    fn decode(value: &Value, _decoder: &Decoder<'_>) -> Result<Self> {
        value
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| Error::mismatch(Self::kind(), value))
    }

    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value> {
        Ok(Value::Float(f64::from(*self)))
    }
}

impl Marshal for bool {
    fn kind() -> Kind {
        Kind::Bool
    }

    fn decode(value: &Value, _decoder: &Decoder<'_>) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::mismatch(Self::kind(), other)),
        }
    }

    fn encode(&self, _encoder: &Encoder<'_>) -> Result<Value> {
        Ok(Value::Bool(*self))
    }
}

impl<T: Marshal> Marshal for Option<T> {
    fn kind() -> Kind {
        Kind::Optional(Box::new(T::kind()))
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::decode(value, decoder).map(Some)
    }

    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value> {
        match self {
            Some(inner) => inner.encode(encoder),
            None => Ok(Value::Null),
        }
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn kind() -> Kind {
        Kind::List(Box::new(T::kind()))
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Self> {
        let Value::List(items) = value else {
            return Err(Error::mismatch(Self::kind(), value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::decode(item, decoder).map_err(|e| e.at_index(i)))
            .collect()
    }

    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value> {
        self.iter()
            .enumerate()
            .map(|(i, item)| item.encode(encoder).map_err(|e| e.at_index(i)))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }
}

impl<T: Marshal> Marshal for HashMap<String, T> {
    fn kind() -> Kind {
        Kind::Map(Box::new(T::kind()))
    }

    fn decode(value: &Value, decoder: &Decoder<'_>) -> Result<Self> {
        let Value::Map(entries) = value else {
            return Err(Error::mismatch(Self::kind(), value));
        };
        entries
            .iter()
            .map(|(k, v)| T::decode(v, decoder).map(|decoded| (k.clone(), decoded)))
            .collect()
    }

    fn encode(&self, encoder: &Encoder<'_>) -> Result<Value> {
        self.iter()
            .map(|(k, v)| v.encode(encoder).map(|encoded| (k.clone(), encoded)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Value::Map)
    }
}
