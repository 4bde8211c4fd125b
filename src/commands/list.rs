use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::resource;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let resources = resource::catalog();

    if ctx.quiet {
        for r in &resources {
            println!("{}", r.resource_type());
        }
        return Ok(());
    }

    ui::header("Registered Resources");
    for r in &resources {
        println!(
            "  {} {}",
            r.resource_type().bold(),
            format!("({})", r.model_name()).dimmed()
        );
        ui::kv(
            "schema",
            &format!(
                "{}, {}",
                ui::plural(r.arguments().len(), "argument"),
                ui::plural(r.attributes().len(), "attribute")
            ),
        );
    }
    println!();
    ui::info(&ui::plural(resources.len(), "resource"));
    Ok(())
}
