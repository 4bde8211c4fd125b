//! Typed resource registration
//!
//! A typed resource declares its user-settable arguments and its read-only
//! attributes as two schema maps plus the model they decode into. Providers
//! run [`validate_resource`] for every resource at startup.

use crate::error::ValidationError;
use crate::features::Features;
use crate::kind::BlockType;
use crate::validate::validate_model_with;
use schemakit::SchemaMap;

/// A resource whose CRUD handlers work on a typed model
pub trait TypedResource: Send + Sync {
    /// Resource type name, e.g. `example_container_app_job`
    fn resource_type(&self) -> &'static str;

    /// User-settable schema attributes
    fn arguments(&self) -> SchemaMap;

    /// Read-only (computed) schema attributes
    fn attributes(&self) -> SchemaMap;

    /// Model the handlers decode into; `None` for untyped resources
    fn model_object(&self) -> Option<BlockType>;
}

/// Arguments and attributes merged into the resource's full schema.
///
/// A key declared in both is an error.
pub fn combined_schema(resource: &dyn TypedResource) -> Result<SchemaMap, ValidationError> {
    let mut schema = resource.arguments();
    for (key, attribute) in resource.attributes() {
        if schema.contains_key(&key) {
            return Err(ValidationError::DuplicateSchemaKey {
                resource_type: resource.resource_type().to_string(),
                key,
            });
        }
        schema.insert(key, attribute);
    }
    Ok(schema)
}

/// Check a resource's model against its combined schema for `features`
pub fn validate_resource(
    resource: &dyn TypedResource,
    features: Features,
) -> Result<(), ValidationError> {
    let schema = combined_schema(resource)?;
    let model = resource.model_object();
    log::debug!(
        "validating {} against {} schema keys",
        resource.resource_type(),
        schema.len()
    );

    validate_model_with(model.as_ref(), &schema, features).map_err(|source| {
        ValidationError::Resource {
            resource_type: resource.resource_type().to_string(),
            source: Box::new(source),
        }
    })
}
