//! Primitive and collection value types of a schema attribute

use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a schema attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// Boolean
    Bool,
    /// Ordered list of elements
    List,
    /// Unordered set of elements (stored as a list)
    Set,
    /// String-keyed map of primitives
    Map,
}

impl ValueType {
    /// Lowercase name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ValueType::Bool.to_string(), "bool");
        assert_eq!(ValueType::Set.to_string(), "set");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ValueType::Float).unwrap();
        assert_eq!(json, "\"float\"");
        let parsed: ValueType = serde_json::from_str("\"set\"").unwrap();
        assert_eq!(parsed, ValueType::Set);
    }
}
