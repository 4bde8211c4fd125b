//! Backing-store accessors
//!
//! The engine reads state through [`StateReader`] and the façade writes
//! through [`StateWriter`]. Paths are top-level attribute names and are
//! matched exactly. Dotted paths into nested values (`container.0.image`)
//! are only resolved by the change helpers and [`ResourceData::get_path`].

use crate::error::StoreError;
use crate::value::Value;
use schemakit::SchemaMap;
use std::collections::{BTreeMap, BTreeSet};

/// Read access to a state tree
pub trait StateReader {
    /// Value at `path`: `None` when absent, `Some(Value::Null)` when present but null
    fn get(&self, path: &str) -> Option<Value>;
}

/// Write access to a state tree
pub trait StateWriter: StateReader {
    /// Store `value` under the top-level key `path`
    fn set(&mut self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Whether [`StateWriter::set`] would accept `path`
    fn check(&self, _path: &str) -> Result<(), StoreError> {
        Ok(())
    }

    /// Set the resource ID; `None` marks the resource as gone
    fn set_id(&mut self, id: Option<&str>);
}

impl StateReader for BTreeMap<String, Value> {
    fn get(&self, path: &str) -> Option<Value> {
        BTreeMap::get(self, path).cloned()
    }
}

/// Walk a dotted path through maps and lists
fn lookup_path<'a>(root: &'a BTreeMap<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Map(map) => map.get(segment)?,
            Value::List(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// In-memory resource state: what a plan or refresh hands to a handler
#[derive(Debug, Clone, Default)]
pub struct ResourceData {
    id: Option<String>,
    prior: BTreeMap<String, Value>,
    values: BTreeMap<String, Value>,
    schema: Option<SchemaMap>,
}

impl ResourceData {
    /// Empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with existing values
    pub fn from_values(values: BTreeMap<String, Value>) -> Self {
        Self {
            prior: values.clone(),
            values,
            ..Self::default()
        }
    }

    /// Reject writes to keys the schema does not declare
    pub fn with_schema(mut self, schema: SchemaMap) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Resource ID, if set
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Current values
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Consume into the current values
    pub fn into_values(self) -> BTreeMap<String, Value> {
        self.values
    }

    /// Current value at a dotted path (`template.0.container.0.cpu`)
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.values, path)
    }

    /// Whether `path` differs from the seeded state
    pub fn has_change(&self, path: &str) -> bool {
        let (old, new) = self.get_change(path);
        old != new
    }

    /// Seeded and current value at `path`
    pub fn get_change(&self, path: &str) -> (Option<&Value>, Option<&Value>) {
        (lookup_path(&self.prior, path), lookup_path(&self.values, path))
    }
}

impl StateReader for ResourceData {
    fn get(&self, path: &str) -> Option<Value> {
        self.values.get(path).cloned()
    }
}

impl StateWriter for ResourceData {
    fn set(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        self.check(path)?;
        self.values.insert(path.to_string(), value);
        Ok(())
    }

    fn check(&self, path: &str) -> Result<(), StoreError> {
        match &self.schema {
            Some(schema) if !schema.contains_key(path) => Err(StoreError::UnknownKey {
                key: path.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn set_id(&mut self, id: Option<&str>) {
        self.id = id.filter(|id| !id.is_empty()).map(str::to_string);
    }
}

/// Planned change to a resource: prior state, planned values and the keys
/// whose value is only known after apply
#[derive(Debug, Clone, Default)]
pub struct ResourceDiff {
    prior: BTreeMap<String, Value>,
    planned: BTreeMap<String, Value>,
    computed: BTreeSet<String>,
}

impl ResourceDiff {
    /// Diff between prior and planned values
    pub fn new(prior: BTreeMap<String, Value>, planned: BTreeMap<String, Value>) -> Self {
        Self {
            prior,
            planned,
            computed: BTreeSet::new(),
        }
    }

    /// Mark a top-level key as known only after apply
    pub fn with_computed(mut self, key: &str) -> Self {
        self.computed.insert(key.to_string());
        self
    }

    /// Whether the top-level key of `path` is unknown until apply
    pub fn is_computed(&self, path: &str) -> bool {
        let key = path.split('.').next().unwrap_or(path);
        self.computed.contains(path) || self.computed.contains(key)
    }

    /// Whether the plan changes `path`
    pub fn has_change(&self, path: &str) -> bool {
        if self.is_computed(path) {
            return true;
        }
        let (old, new) = self.get_change(path);
        old != new
    }

    /// Prior and planned value at `path`
    pub fn get_change(&self, path: &str) -> (Option<&Value>, Option<&Value>) {
        (lookup_path(&self.prior, path), lookup_path(&self.planned, path))
    }
}

impl StateReader for ResourceDiff {
    fn get(&self, path: &str) -> Option<Value> {
        if self.is_computed(path) {
            return None;
        }
        self.planned.get(path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemakit::{Schema, ValueType};

    fn values() -> BTreeMap<String, Value> {
        let json = serde_json::json!({
            "name": "web",
            "empty": null,
            "container": [{"image": "nginx", "ports": [80, 443]}],
            "tags": {"env": "prod"},
        });
        match Value::from(json) {
            Value::Map(map) => map,
            _ => unreachable!(),
        }
    }

    fn sample() -> ResourceData {
        ResourceData::from_values(values())
    }

    #[test]
    fn test_absent_vs_null() {
        let state = sample();
        assert_eq!(state.get("missing"), None);
        assert_eq!(state.get("empty"), Some(Value::Null));

        let raw = values();
        assert_eq!(StateReader::get(&raw, "missing"), None);
        assert_eq!(StateReader::get(&raw, "empty"), Some(Value::Null));
    }

    #[test]
    fn test_reader_matches_exact_keys_only() {
        let state = sample();
        assert_eq!(state.get("tags.env"), None);
        assert_eq!(state.get("container.0.image"), None);
        assert_eq!(StateReader::get(&values(), "tags.env"), None);

        let diff = ResourceDiff::new(values(), values());
        assert_eq!(diff.get("tags.env"), None);
    }

    #[test]
    fn test_dotted_paths() {
        let state = sample();
        assert_eq!(state.get_path("container.0.image"), Some(&Value::from("nginx")));
        assert_eq!(state.get_path("container.0.ports.1"), Some(&Value::Int(443)));
        assert_eq!(state.get_path("tags.env"), Some(&Value::from("prod")));
        assert_eq!(state.get_path("container.1.image"), None);
        assert_eq!(state.get_path("name.0"), None);
    }

    #[test]
    fn test_resource_data_changes() {
        let mut data = sample();
        assert!(!data.has_change("name"));
        assert!(!data.has_change("tags.env"));

        data.set("name", Value::from("api")).unwrap();
        assert!(data.has_change("name"));
        assert_eq!(
            data.get_change("name"),
            (Some(&Value::from("web")), Some(&Value::from("api")))
        );
    }

    #[test]
    fn test_resource_data_schema_rejects_unknown() {
        let mut schema = SchemaMap::new();
        schema.insert("name".into(), Schema::required(ValueType::String));
        let mut data = ResourceData::new().with_schema(schema);

        assert!(data.check("name").is_ok());
        assert!(data.check("nope").is_err());
        assert!(data.set("name", Value::from("x")).is_ok());
        assert_eq!(
            data.set("nope", Value::Null),
            Err(StoreError::UnknownKey {
                key: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_resource_data_id() {
        let mut data = ResourceData::new();
        assert_eq!(data.id(), None);
        data.set_id(Some("/subscriptions/1/resourceGroups/rg"));
        assert_eq!(data.id(), Some("/subscriptions/1/resourceGroups/rg"));
        data.set_id(Some(""));
        assert_eq!(data.id(), None);
    }

    #[test]
    fn test_diff_computed_reads_absent() {
        let mut planned = values();
        planned.insert("fqdn".into(), Value::from("stale"));
        let diff = ResourceDiff::new(values(), planned).with_computed("fqdn");

        assert_eq!(diff.get("fqdn"), None);
        assert!(diff.has_change("fqdn"));
        assert!(!diff.has_change("name"));
        assert_eq!(diff.get("name"), Some(Value::from("web")));
    }
}
