//! `typedstate roundtrip` - decode a state document and encode it back
//!
//! The re-encoded state is what a handler would write after reading the
//! document unchanged. Keys that come out different from the input are
//! reported as normalized (absent optionals become null, missing collections
//! become empty).

use anyhow::{Context as _, Result};
use statebind::{ResourceData, Value};
use std::collections::BTreeMap;

use super::Trace;
use crate::Context;
use crate::cli::StateArgs;
use crate::resource;
use crate::ui;

pub fn run(ctx: &Context, args: &StateArgs) -> Result<()> {
    let resource = super::find_resource(&args.resource)?;
    let state = super::load_state(&args.state)?;
    let trace = Trace::new(args.trace);

    let mut source = ResourceData::from_values(state.clone());
    let mut target = resource::empty_state(resource.as_ref())
        .with_context(|| format!("Invalid schema for {}", resource.resource_type()))?;
    let result = resource.roundtrip(&mut source, &mut target, ctx.features, trace.logger());
    trace.print();
    result.with_context(|| {
        format!(
            "Could not round-trip {} as {}",
            args.state.display(),
            resource.resource_type()
        )
    })?;

    let written = target.into_values();
    if !ctx.quiet {
        let normalized = normalized_keys(&state, &written);
        if normalized.is_empty() {
            ui::success("state round-trips unchanged");
        } else {
            ui::warn(&format!("normalized: {}", normalized.join(", ")));
        }
        ui::header("Encoded State");
    }

    let json = serde_json::Value::from(Value::Map(written));
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Keys whose encoded value differs from the input
fn normalized_keys(input: &BTreeMap<String, Value>, output: &BTreeMap<String, Value>) -> Vec<String> {
    output
        .iter()
        .filter(|(key, value)| input.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(json: serde_json::Value) -> BTreeMap<String, Value> {
        match Value::from(json) {
            Value::Map(map) => map,
            other => panic!("not a map: {other:?}"),
        }
    }

    #[test]
    fn test_normalized_keys() {
        let input = map(serde_json::json!({"name": "a", "tags": {"x": "1"}}));
        let output = map(serde_json::json!({"name": "a", "tags": {"x": "1"}, "title": null}));
        assert_eq!(normalized_keys(&input, &output), vec!["title".to_string()]);
    }

    #[test]
    fn test_roundtrip_demo() {
        let ctx = Context {
            verbose: 0,
            quiet: true,
            features: statebind::Features::next_major(),
        };
        let args = StateArgs {
            resource: "example_lab_service_lab".to_string(),
            state: std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/lab.json"),
            trace: false,
        };
        assert!(run(&ctx, &args).is_ok());
    }
}
