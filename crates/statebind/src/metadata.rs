//! Per-request marshalling façade
//!
//! A [`ResourceMetaData`] is built for each request with whatever backing
//! store the host hands over: the resource state (plan/apply/read) or the
//! planned diff (customize-diff). Handlers call [`ResourceMetaData::decode`]
//! to get their typed model and [`ResourceMetaData::encode`] to write it back.

use crate::accessor::{StateReader, StateWriter};
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::features::Features;
use crate::kind::Model;
use crate::logger::{DebugLogger, LogLogger};

/// Binds the engine to one request's backing store
pub struct ResourceMetaData<'a> {
    resource_data: Option<&'a mut dyn StateWriter>,
    resource_diff: Option<&'a dyn StateReader>,
    logger: &'a dyn DebugLogger,
    features: Features,
}

impl<'a> ResourceMetaData<'a> {
    /// Façade with no store bound, tracing through the `log` crate
    pub fn new(features: Features) -> Self {
        Self {
            resource_data: None,
            resource_diff: None,
            logger: &LogLogger,
            features,
        }
    }

    /// Bind the resource state
    pub fn with_resource_data(mut self, data: &'a mut dyn StateWriter) -> Self {
        self.resource_data = Some(data);
        self
    }

    /// Bind the planned diff
    pub fn with_resource_diff(mut self, diff: &'a dyn StateReader) -> Self {
        self.resource_diff = Some(diff);
        self
    }

    /// Send serialization traces to `logger`
    pub fn with_logger(mut self, logger: &'a dyn DebugLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Decode the resource state into `target`
    pub fn decode<M: Model>(&self, target: &mut M) -> Result<()> {
        let data = self
            .resource_data
            .as_deref()
            .ok_or(Error::NoAccessor { operation: "decode" })?;
        Decoder::new(self.logger).decode(target, data)
    }

    /// Decode the planned diff into `target`
    pub fn decode_diff<M: Model>(&self, target: &mut M) -> Result<()> {
        let diff = self.resource_diff.ok_or(Error::NoAccessor {
            operation: "decode_diff",
        })?;
        Decoder::new(self.logger).decode(target, diff)
    }

    /// Encode `source` and write every key to the resource state.
    ///
    /// Nothing is written unless the whole model encodes and the store
    /// accepts every key.
    pub fn encode<M: Model>(&mut self, source: &M) -> Result<()> {
        let encoded = Encoder::new(self.features, self.logger).encode(source)?;
        let data = self
            .resource_data
            .as_deref_mut()
            .ok_or(Error::NoAccessor { operation: "encode" })?;

        if let Some((path, source)) = encoded
            .keys()
            .find_map(|path| data.check(path).err().map(|e| (path.clone(), e)))
        {
            return Err(Error::Store { path, source });
        }
        for (path, value) in encoded {
            data.set(&path, value)
                .map_err(|source| Error::Store { path, source })?;
        }
        Ok(())
    }

    /// Record the resource ID
    pub fn set_id(&mut self, id: &str) -> Result<()> {
        let data = self
            .resource_data
            .as_deref_mut()
            .ok_or(Error::NoAccessor { operation: "set_id" })?;
        data.set_id(Some(id));
        Ok(())
    }

    /// Drop the resource from state: it no longer exists remotely
    pub fn mark_as_gone(&mut self, id: &str) -> Result<()> {
        log::info!("{id} was not found - removing from state");
        let data = self
            .resource_data
            .as_deref_mut()
            .ok_or(Error::NoAccessor {
                operation: "mark_as_gone",
            })?;
        data.set_id(None);
        Ok(())
    }

    /// Error for a create that found the resource already present
    pub fn resource_requires_import(&self, resource_type: &str, id: &str) -> Error {
        Error::RequiresImport {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{ResourceData, ResourceDiff};
    use crate::error::StoreError;
    use crate::logger::MemoryLogger;
    use crate::typed_model;
    use crate::value::Value;
    use schemakit::{Schema, SchemaMap, ValueType};
    use std::collections::BTreeMap;

    typed_model! {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Lab {
            name: String => "name",
            title: Option<String> => "title",
            tags: std::collections::HashMap<String, String> => "tags",
            gpu_drivers: bool => "gpu_drivers_installed,addedInNextMajorVersion",
        }
    }

    fn lab_state() -> BTreeMap<String, Value> {
        match Value::from(serde_json::json!({
            "name": "lab-1",
            "title": "Intro",
            "tags": {"team": "a"},
        })) {
            Value::Map(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_decode_from_resource_data() {
        let mut data = ResourceData::from_values(lab_state());
        let metadata = ResourceMetaData::new(Features::default()).with_resource_data(&mut data);

        let mut lab = Lab::default();
        metadata.decode(&mut lab).unwrap();
        assert_eq!(lab.name, "lab-1");
        assert_eq!(lab.title.as_deref(), Some("Intro"));
        assert_eq!(lab.tags["team"], "a");
    }

    #[test]
    fn test_decode_diff() {
        let mut planned = lab_state();
        planned.insert("name".into(), Value::from("lab-2"));
        let diff = ResourceDiff::new(lab_state(), planned).with_computed("title");
        let metadata = ResourceMetaData::new(Features::default()).with_resource_diff(&diff);

        let mut lab = Lab::default();
        metadata.decode_diff(&mut lab).unwrap();
        assert_eq!(lab.name, "lab-2");
        assert_eq!(lab.title, None);
    }

    #[test]
    fn test_nothing_bound() {
        let metadata = ResourceMetaData::new(Features::default());
        let mut lab = Lab::default();
        assert!(matches!(
            metadata.decode(&mut lab),
            Err(Error::NoAccessor { operation: "decode" })
        ));
        assert!(matches!(
            metadata.decode_diff(&mut lab),
            Err(Error::NoAccessor { .. })
        ));
    }

    #[test]
    fn test_encode_writes_state() {
        let mut data = ResourceData::new();
        let logger = MemoryLogger::new();
        {
            let mut metadata = ResourceMetaData::new(Features::default())
                .with_resource_data(&mut data)
                .with_logger(&logger);
            let lab = Lab {
                name: "lab-1".to_string(),
                ..Lab::default()
            };
            metadata.encode(&lab).unwrap();
            metadata.set_id("/labs/lab-1").unwrap();
        }

        assert_eq!(data.id(), Some("/labs/lab-1"));
        assert_eq!(data.get("name"), Some(Value::from("lab-1")));
        assert_eq!(data.get("title"), Some(Value::Null));
        assert_eq!(data.get("tags"), Some(Value::Map(BTreeMap::new())));
        assert_eq!(data.get("gpu_drivers_installed"), None);
        assert!(!logger.messages().is_empty());
    }

    #[test]
    fn test_encode_store_error_names_path() {
        let mut schema = SchemaMap::new();
        schema.insert("name".into(), Schema::required(ValueType::String));
        let mut data = ResourceData::new().with_schema(schema);
        let mut metadata = ResourceMetaData::new(Features::default()).with_resource_data(&mut data);

        let err = metadata.encode(&Lab::default()).unwrap_err();
        match err {
            Error::Store { path, source } => {
                assert_eq!(path, "tags");
                assert_eq!(
                    source,
                    StoreError::UnknownKey {
                        key: "tags".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejected_encode_leaves_state_untouched() {
        let mut schema = SchemaMap::new();
        schema.insert("name".into(), Schema::required(ValueType::String));
        schema.insert("title".into(), Schema::new(ValueType::String).optional());
        let mut data = ResourceData::new().with_schema(schema);
        let lab = Lab {
            name: "lab-1".to_string(),
            ..Lab::default()
        };

        let result = ResourceMetaData::new(Features::default())
            .with_resource_data(&mut data)
            .encode(&lab);
        assert!(matches!(result, Err(Error::Store { .. })));
        assert_eq!(data.get("name"), None);
        assert_eq!(data.get("title"), None);
        assert!(data.values().is_empty());
    }

    #[test]
    fn test_mark_as_gone_clears_id() {
        let mut data = ResourceData::new();
        {
            let mut metadata =
                ResourceMetaData::new(Features::default()).with_resource_data(&mut data);
            metadata.set_id("/labs/a").unwrap();
            metadata.mark_as_gone("/labs/a").unwrap();
        }
        assert_eq!(data.id(), None);
    }

    #[test]
    fn test_requires_import_message() {
        let metadata = ResourceMetaData::new(Features::default());
        let err = metadata.resource_requires_import("example_lab", "/labs/a");
        let msg = err.to_string();
        assert!(msg.contains("/labs/a") && msg.contains("example_lab"), "{msg}");
    }
}
