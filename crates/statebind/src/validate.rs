//! Model/schema conformance checks
//!
//! Run once per resource type at registration. Every field of the model
//! must be annotated, map to a declared attribute, and have a kind the
//! attribute's type can hold. The first mismatch is returned.

use crate::annotation::{PathClaims, parse_annotation};
use crate::error::ValidationError;
use crate::features::Features;
use crate::kind::{BlockType, Kind, Model};
use schemakit::{Elem, Schema, SchemaMap, ValueType};

/// Validate a model against a schema, requiring every field to be declared.
///
/// `None` (a resource without a model) is valid.
pub fn validate_model(model: Option<&BlockType>, schema: &SchemaMap) -> Result<(), ValidationError> {
    Validator { features: None }.validate(model, schema)
}

/// Validate a model against the schema in effect for `features`.
///
/// Fields that are not part of that major version are not looked up.
pub fn validate_model_with(
    model: Option<&BlockType>,
    schema: &SchemaMap,
    features: Features,
) -> Result<(), ValidationError> {
    Validator {
        features: Some(features),
    }
    .validate(model, schema)
}

/// Validate the model type `M` against a schema
pub fn validate<M: Model>(schema: &SchemaMap) -> Result<(), ValidationError> {
    validate_model(Some(&BlockType::of::<M>()), schema)
}

struct Validator {
    features: Option<Features>,
}

impl Validator {
    fn validate(&self, model: Option<&BlockType>, schema: &SchemaMap) -> Result<(), ValidationError> {
        let Some(block) = model else {
            return Ok(());
        };

        let mut claims = PathClaims::default();
        for spec in (block.fields)() {
            let Some(raw) = spec.annotation else {
                return Err(ValidationError::MissingAnnotation {
                    model: block.name,
                    field: spec.name,
                });
            };
            let annotation_error = |source| ValidationError::Annotation {
                model: block.name,
                field: spec.name,
                source,
            };
            let descriptor = parse_annotation(raw).map_err(annotation_error)?;
            claims
                .claim(&descriptor.path, spec.name)
                .map_err(annotation_error)?;

            if let Some(features) = self.features
                && !descriptor.is_active(features)
            {
                continue;
            }

            let Some(attribute) = schema.get(&descriptor.path) else {
                return Err(ValidationError::MissingSchemaField {
                    model: block.name,
                    field: spec.name,
                    path: descriptor.path,
                });
            };

            let field = FieldRef {
                model: block.name,
                field: spec.name,
                path: &descriptor.path,
            };
            match &spec.kind {
                Some(kind) => self.check(&field, attribute, kind)?,
                None => return Err(field.mismatch(attribute, "an untyped field")),
            }
        }

        Ok(())
    }

    fn check(&self, field: &FieldRef<'_>, attribute: &Schema, kind: &Kind) -> Result<(), ValidationError> {
        let kind = kind.unwrap_optional();
        let compatible = match attribute.value_type {
            ValueType::String => matches!(kind, Kind::String),
            ValueType::Int => matches!(kind, Kind::Int { .. }),
            ValueType::Float => matches!(kind, Kind::Float { .. }),
            ValueType::Bool => matches!(kind, Kind::Bool),
            ValueType::Map => matches!(kind, Kind::Map(_)),
            ValueType::List | ValueType::Set => {
                let Kind::List(elem) = kind else {
                    return Err(field.mismatch(attribute, kind));
                };
                return self.check_elements(field, attribute, elem);
            }
        };

        if compatible {
            Ok(())
        } else {
            Err(field.mismatch(attribute, kind))
        }
    }

    fn check_elements(
        &self,
        field: &FieldRef<'_>,
        attribute: &Schema,
        elem: &Kind,
    ) -> Result<(), ValidationError> {
        let list_kind = Kind::List(Box::new(elem.clone()));
        match (&attribute.elem, elem) {
            (None, _) => Err(ValidationError::MissingElement {
                model: field.model,
                field: field.field,
                path: field.path.to_string(),
                schema_type: attribute.value_type.to_string(),
            }),
            (Some(Elem::Block(nested)), Kind::Block(block)) => self
                .validate(Some(block), &nested.attributes)
                .map_err(|source| ValidationError::Nested {
                    model: field.model,
                    field: field.field,
                    source: Box::new(source),
                }),
            (Some(Elem::Schema(element)), elem) if elem.is_scalar() => self
                .check(field, element, elem)
                .map_err(|_| field.mismatch(attribute, &list_kind)),
            _ => Err(field.mismatch(attribute, &list_kind)),
        }
    }
}

struct FieldRef<'a> {
    model: &'static str,
    field: &'static str,
    path: &'a str,
}

impl FieldRef<'_> {
    fn mismatch(&self, attribute: &Schema, field_kind: impl ToString) -> ValidationError {
        ValidationError::KindMismatch {
            model: self.model,
            field: self.field,
            path: self.path.to_string(),
            schema_type: describe(attribute),
            field_kind: field_kind.to_string(),
        }
    }
}

/// "list of block", "map of string", "int", ...
fn describe(attribute: &Schema) -> String {
    match &attribute.elem {
        Some(Elem::Block(_)) => format!("{} of block", attribute.value_type),
        Some(Elem::Schema(element)) => {
            format!("{} of {}", attribute.value_type, element.value_type)
        }
        None => attribute.value_type.to_string(),
    }
}
