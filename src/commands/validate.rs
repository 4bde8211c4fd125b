//! `typedstate validate` - check every model against its schema

use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use rayon::prelude::*;
use statebind::{ValidationError, validate_resource};

use crate::Context;
use crate::resource::{self, BoxedResource};
use crate::ui;

struct Outcome {
    resource_type: &'static str,
    model: &'static str,
    result: Result<(), ValidationError>,
}

pub fn run(ctx: &Context, only: Option<&str>, jobs: usize) -> Result<()> {
    let resources: Vec<BoxedResource> = match only {
        Some(name) => vec![super::find_resource(name)?],
        None => resource::catalog(),
    };

    let outcomes = check_all(&resources, ctx, jobs)?;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    if !ctx.quiet {
        ui::header("Schema Conformance");
        if ctx.features.next_major_version {
            ui::info("next major version features enabled");
        }
    }
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) if ctx.quiet => {}
            Ok(()) => println!(
                "  {} {} {}",
                "✓".green(),
                outcome.resource_type,
                format!("({})", outcome.model).dimmed()
            ),
            Err(e) => {
                println!("  {} {}", "✗".red(), outcome.resource_type.bold());
                println!("      {}", e.to_string().red());
            }
        }
    }

    println!();
    if failed > 0 {
        bail!(
            "{} of {} failed validation",
            ui::plural(failed, "resource"),
            outcomes.len()
        );
    }
    if !ctx.quiet {
        ui::success(&format!(
            "{} conform to their schema",
            ui::plural(outcomes.len(), "resource")
        ));
    }
    Ok(())
}

fn check_all(resources: &[BoxedResource], ctx: &Context, jobs: usize) -> Result<Vec<Outcome>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("Could not start the validation thread pool")?;

    let features = ctx.features;
    Ok(pool.install(|| {
        resources
            .par_iter()
            .map(|resource| {
                log::debug!("validating {}", resource.resource_type());
                Outcome {
                    resource_type: resource.resource_type(),
                    model: resource.model_name(),
                    result: validate_resource(resource.as_ref(), features),
                }
            })
            .collect()
    }))
}
