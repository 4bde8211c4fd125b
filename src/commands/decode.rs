//! `typedstate decode` - decode a state document into its typed model

use anyhow::{Context as _, Result};
use statebind::ResourceData;

use super::Trace;
use crate::Context;
use crate::cli::StateArgs;
use crate::ui;

pub fn run(ctx: &Context, args: &StateArgs) -> Result<()> {
    let resource = super::find_resource(&args.resource)?;
    let mut data = ResourceData::from_values(super::load_state(&args.state)?);
    let trace = Trace::new(args.trace);

    let result = resource.render(&mut data, ctx.features, trace.logger());
    trace.print();
    let rendered = result.with_context(|| {
        format!(
            "Could not decode {} as {}",
            args.state.display(),
            resource.resource_type()
        )
    })?;

    if !ctx.quiet {
        ui::header(resource.model_name());
    }
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use statebind::Features;
    use std::io::Write;
    use std::path::PathBuf;

    fn ctx() -> Context {
        Context {
            verbose: 0,
            quiet: true,
            features: Features::default(),
        }
    }

    fn demo(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
    }

    #[test]
    fn test_decode_demo() {
        let args = StateArgs {
            resource: "example_lab_service_lab".to_string(),
            state: demo("lab.json"),
            trace: true,
        };
        assert!(run(&ctx(), &args).is_ok());
    }

    #[test]
    fn test_bad_value_fails_with_context() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "build", "timeout_in_seconds": "1h"}}"#).unwrap();
        let args = StateArgs {
            resource: "example_container_registry_task".to_string(),
            state: file.path().to_path_buf(),
            trace: false,
        };
        let err = run(&ctx(), &args).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Could not decode"), "{msg}");
        assert!(msg.contains("timeout_in_seconds"), "{msg}");
    }
}
