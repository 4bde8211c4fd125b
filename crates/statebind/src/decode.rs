//! Decoding state into typed models

use crate::accessor::StateReader;
use crate::annotation::annotated_fields;
use crate::error::{Error, Result};
use crate::kind::Model;
use crate::logger::DebugLogger;
use crate::value::Value;

/// Populates typed models from a state accessor.
///
/// Fields whose path is absent (or null) in the source keep their default
/// value; a value of the wrong kind is an error naming the field.
#[derive(Clone, Copy)]
pub struct Decoder<'a> {
    logger: &'a dyn DebugLogger,
}

impl<'a> Decoder<'a> {
    /// Create a decoder reporting to `logger`
    pub fn new(logger: &'a dyn DebugLogger) -> Self {
        Self { logger }
    }

    /// Decode every annotated field of `target` from `source`
    pub fn decode<M: Model>(&self, target: &mut M, source: &dyn StateReader) -> Result<()> {
        let model = M::model_name();
        let fields = annotated_fields(M::fields()).map_err(|(field, source)| Error::Annotation {
            model,
            field,
            source,
        })?;

        for (spec, descriptor) in fields {
            let path = descriptor.path.as_str();
            let Some(value) = source.get(path) else {
                self.logger
                    .debug(&format!("{model}.{}: `{path}` not present, leaving default", spec.name));
                continue;
            };
            if value.is_null() {
                self.logger
                    .debug(&format!("{model}.{}: `{path}` is null, leaving default", spec.name));
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

            self.logger.debug(&format!(
                "{model}.{}: decoding {} value {value} into {}",
                spec.name,
                value.kind_name(),
                spec.kind.as_ref().map(ToString::to_string).unwrap_or_default(),
            ));
            target
                .decode_field(spec.name, &value, self)
                .map_err(|e| e.at_field(spec.name, path))?;
        }

        Ok(())
    }

    /// Decode one element of a nested block list
    pub fn decode_block<M: Model>(&self, value: &Value) -> Result<M> {
        let Value::Map(entries) = value else {
            return Err(Error::mismatch(M::model_name(), value));
        };
        let mut block = M::default();
        self.decode(&mut block, entries)?;
        Ok(block)
    }
}
