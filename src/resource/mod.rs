//! Resource catalog
//!
//! The typed resources this binary knows about. Each one pairs a schema
//! (arguments plus computed attributes) with the model its handlers decode
//! into. Commands look resources up by type name and work on them through
//! [`CatalogResource`], which erases the model type.

mod container_app;
mod lab;
mod registry_task;

use statebind::{
    DebugLogger, Features, Model, ResourceData, ResourceMetaData, TypedResource, combined_schema,
};
use std::fmt;

pub use container_app::ContainerAppResource;
pub use lab::LabResource;
pub use registry_task::RegistryTaskResource;

/// A typed resource with a concrete model
pub trait ModelResource: TypedResource {
    type Model: Model + fmt::Debug;
}

/// Object-safe operations over a [`ModelResource`]
pub trait CatalogResource: TypedResource {
    /// Name of the model the resource decodes into
    fn model_name(&self) -> &'static str;

    /// Decode `data` and render the model
    fn render(
        &self,
        data: &mut ResourceData,
        features: Features,
        logger: &dyn DebugLogger,
    ) -> statebind::Result<String>;

    /// Decode `source` and encode the model into `target`
    fn roundtrip(
        &self,
        source: &mut ResourceData,
        target: &mut ResourceData,
        features: Features,
        logger: &dyn DebugLogger,
    ) -> statebind::Result<()>;
}

impl<R: ModelResource> CatalogResource for R {
    fn model_name(&self) -> &'static str {
        <R::Model as Model>::model_name()
    }

    fn render(
        &self,
        data: &mut ResourceData,
        features: Features,
        logger: &dyn DebugLogger,
    ) -> statebind::Result<String> {
        let metadata = ResourceMetaData::new(features)
            .with_logger(logger)
            .with_resource_data(data);
        let mut model = R::Model::default();
        metadata.decode(&mut model)?;
        Ok(format!("{model:#?}"))
    }

    fn roundtrip(
        &self,
        source: &mut ResourceData,
        target: &mut ResourceData,
        features: Features,
        logger: &dyn DebugLogger,
    ) -> statebind::Result<()> {
        let mut model = R::Model::default();
        ResourceMetaData::new(features)
            .with_logger(logger)
            .with_resource_data(source)
            .decode(&mut model)?;
        ResourceMetaData::new(features)
            .with_logger(logger)
            .with_resource_data(target)
            .encode(&model)
    }
}

pub type BoxedResource = Box<dyn CatalogResource>;

/// Every registered resource, sorted by type name
pub fn catalog() -> Vec<BoxedResource> {
    let mut resources: Vec<BoxedResource> = vec![
        Box::new(ContainerAppResource),
        Box::new(LabResource),
        Box::new(RegistryTaskResource),
    ];
    resources.sort_by_key(|r| r.resource_type());
    resources
}

/// Look a resource up by type name
pub fn find(resource_type: &str) -> Option<BoxedResource> {
    catalog()
        .into_iter()
        .find(|r| r.resource_type() == resource_type)
}

/// Fresh state for `resource` that rejects keys outside its schema
pub fn empty_state(resource: &dyn CatalogResource) -> Result<ResourceData, statebind::ValidationError> {
    Ok(ResourceData::new().with_schema(combined_schema(resource)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use statebind::validate_resource;

    #[test]
    fn test_catalog_sorted_and_unique() {
        let names: Vec<_> = catalog().iter().map(|r| r.resource_type()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_every_resource_validates() {
        for features in [Features::default(), Features::next_major()] {
            for resource in catalog() {
                let result = validate_resource(resource.as_ref(), features);
                assert_eq!(result, Ok(()), "{}", resource.resource_type());
            }
        }
    }

    #[test]
    fn test_find() {
        assert!(find("example_lab_service_lab").is_some());
        assert!(find("example_unknown").is_none());
    }
}
