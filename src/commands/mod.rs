pub mod decode;
pub mod list;
pub mod roundtrip;
pub mod validate;

use anyhow::{Context, Result, bail};
use statebind::{DebugLogger, LogLogger, MemoryLogger, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::resource::{self, BoxedResource};
use crate::ui;

/// Look up a resource type or fail with the known names
pub fn find_resource(resource_type: &str) -> Result<BoxedResource> {
    if let Some(resource) = resource::find(resource_type) {
        return Ok(resource);
    }
    let known: Vec<_> = resource::catalog()
        .iter()
        .map(|r| r.resource_type())
        .collect();
    bail!(
        "Unknown resource type '{resource_type}' (known: {})",
        known.join(", ")
    )
}

/// Read a JSON object from disk as a state map
pub fn load_state(path: &Path) -> Result<BTreeMap<String, Value>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    match Value::from(json) {
        Value::Map(map) => Ok(map),
        other => bail!(
            "{} must hold a JSON object, found {}",
            path.display(),
            other.kind_name()
        ),
    }
}

/// Where serialization traces go for one command
pub enum Trace {
    Log(LogLogger),
    Memory(MemoryLogger),
}

impl Trace {
    pub fn new(capture: bool) -> Self {
        if capture {
            Self::Memory(MemoryLogger::new())
        } else {
            Self::Log(LogLogger)
        }
    }

    pub fn logger(&self) -> &dyn DebugLogger {
        match self {
            Self::Log(logger) => logger,
            Self::Memory(logger) => logger,
        }
    }

    /// Print captured lines, if any
    pub fn print(&self) {
        if let Self::Memory(logger) = self {
            ui::header("Trace");
            for (level, line) in logger.lines() {
                ui::dim(&format!("{level:<5} {line}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_state() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "api", "replicas": 2}}"#).unwrap();
        let state = load_state(file.path()).unwrap();
        assert_eq!(state["name"], Value::from("api"));
        assert_eq!(state["replicas"], Value::Int(2));
    }

    #[test]
    fn test_load_state_rejects_non_object() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        let err = load_state(file.path()).unwrap_err();
        assert!(err.to_string().contains("JSON object"), "{err}");
    }

    #[test]
    fn test_unknown_resource_lists_known() {
        let err = find_resource("example_nope").err().unwrap();
        assert!(err.to_string().contains("example_lab_service_lab"), "{err}");
    }

    #[test]
    fn test_trace_capture() {
        let trace = Trace::new(true);
        trace.logger().debug("hello");
        match &trace {
            Trace::Memory(logger) => assert_eq!(logger.messages(), vec!["hello".to_string()]),
            Trace::Log(_) => panic!("expected memory trace"),
        }
    }
}
