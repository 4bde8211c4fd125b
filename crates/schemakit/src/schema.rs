//! Attribute schemas and nested blocks

use crate::types::ValueType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute name to schema, for one level of a resource
pub type SchemaMap = BTreeMap<String, Schema>;

/// Schema of a single attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Declared value type
    pub value_type: ValueType,

    /// Must be set in configuration
    #[serde(default)]
    pub required: bool,

    /// May be set in configuration
    #[serde(default)]
    pub optional: bool,

    /// Value is known only after apply
    #[serde(default)]
    pub computed: bool,

    /// Element of a list, set or map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<Elem>,

    /// Upper bound on the number of list/set elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// What a collection attribute holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Elem {
    /// Primitive elements
    Schema(Box<Schema>),
    /// Nested blocks of attributes
    Block(Block),
}

/// A nested block: its own attribute map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Attributes of the block
    pub attributes: SchemaMap,
}

impl Block {
    /// Create an empty block
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute to the block
    pub fn attribute(mut self, name: &str, schema: Schema) -> Self {
        self.attributes.insert(name.to_string(), schema);
        self
    }
}

impl Schema {
    /// Plain attribute of the given type, neither required nor optional
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: false,
            optional: false,
            computed: false,
            elem: None,
            max_items: None,
            description: String::new(),
        }
    }

    /// Required attribute
    pub fn required(value_type: ValueType) -> Self {
        Self {
            required: true,
            ..Self::new(value_type)
        }
    }

    /// Computed-only attribute
    pub fn computed_only(value_type: ValueType) -> Self {
        Self::new(value_type).computed()
    }

    /// List of primitives
    pub fn list_of(element: ValueType) -> Self {
        Self::collection(ValueType::List, Elem::Schema(Box::new(Self::new(element))))
    }

    /// Set of primitives
    pub fn set_of(element: ValueType) -> Self {
        Self::collection(ValueType::Set, Elem::Schema(Box::new(Self::new(element))))
    }

    /// Map of primitives
    pub fn map_of(element: ValueType) -> Self {
        Self::collection(ValueType::Map, Elem::Schema(Box::new(Self::new(element))))
    }

    /// Repeated nested block, stored as a list
    pub fn block_list(block: Block) -> Self {
        Self::collection(ValueType::List, Elem::Block(block))
    }

    /// Repeated nested block, stored as a set
    pub fn block_set(block: Block) -> Self {
        Self::collection(ValueType::Set, Elem::Block(block))
    }

    fn collection(value_type: ValueType, elem: Elem) -> Self {
        Self {
            elem: Some(elem),
            ..Self::new(value_type)
        }
    }

    /// Mark the attribute as optional (clears `required`)
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self.required = false;
        self
    }

    /// Mark the attribute as computed
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Limit the number of elements
    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// The nested block, if this attribute holds blocks
    pub fn nested_block(&self) -> Option<&Block> {
        match &self.elem {
            Some(Elem::Block(block)) => Some(block),
            _ => None,
        }
    }

    /// The element schema, if this attribute holds primitives
    pub fn element_schema(&self) -> Option<&Schema> {
        match &self.elem {
            Some(Elem::Schema(schema)) => Some(schema),
            _ => None,
        }
    }
}
