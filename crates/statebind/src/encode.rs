//! Encoding typed models into state

use crate::annotation::annotated_fields;
use crate::error::{Error, Result};
use crate::features::Features;
use crate::kind::Model;
use crate::logger::DebugLogger;
use crate::value::Value;
use std::collections::BTreeMap;

/// Serializes typed models into flat state maps.
///
/// Version-gated fields are skipped according to [`Features`]. Unset
/// `Option`s become `Value::Null`; collections, empty or not, become
/// `List`/`Map`.
#[derive(Clone, Copy)]
pub struct Encoder<'a> {
    features: Features,
    logger: &'a dyn DebugLogger,
}

impl<'a> Encoder<'a> {
    /// Create an encoder for the given feature set
    pub fn new(features: Features, logger: &'a dyn DebugLogger) -> Self {
        Self { features, logger }
    }

    /// Encode every annotated, active field of `source` into one map
    pub fn encode<M: Model>(&self, source: &M) -> Result<BTreeMap<String, Value>> {
        let model = M::model_name();
        let fields = annotated_fields(M::fields()).map_err(|(field, source)| Error::Annotation {
            model,
            field,
            source,
        })?;

        let mut out = BTreeMap::new();
        for (spec, descriptor) in fields {
            let path = descriptor.path.as_str();
            if !descriptor.is_active(self.features) {
                self.logger.debug(&format!(
                    "{model}.{}: `{path}` is not part of this major version, skipping",
                    spec.name
                ));
                continue;
            }

            if let Some(kind) = &spec.kind
                && !kind.is_supported()
            {
                return Err(Error::UnsupportedKind {
                    field: spec.name.to_string(),
                    path: path.to_string(),
                    kind: kind.to_string(),
                });
            }

            let value = source
                .encode_field(spec.name, self)
                .map_err(|e| e.at_field(spec.name, path))?;
            self.logger.debug(&format!(
                "{model}.{}: encoded `{path}` as {} {value}",
                spec.name,
                value.kind_name()
            ));
            out.insert(descriptor.path, value);
        }

        Ok(out)
    }

    /// Encode one element of a nested block list
    pub fn encode_block<M: Model>(&self, source: &M) -> Result<Value> {
        self.encode(source).map(Value::Map)
    }
}
