//! Read-only views of aptly state.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::Context as AppContext;
use crate::cli::ShowArgs;
use crate::config::Config;
use crate::ui;

pub fn show(ctx: &AppContext, args: ShowArgs) -> Result<()> {
    let config = Config::load_optional(None)?;
    let reconciler = super::reconciler(ctx, config.as_ref());

    let options = reconciler
        .current_options(&args.name)
        .with_context(|| format!("Failed to read repository '{}'", args.name))?;

    if args.json {
        return super::print_json(&options);
    }

    ui::header(&format!("Repository {}", args.name));
    for (key, value) in options.iter() {
        ui::kv(key, &ui::quoted(value));
    }
    Ok(())
}

pub fn list(ctx: &AppContext) -> Result<()> {
    let config = Config::load_optional(None)?;
    let reconciler = super::reconciler(ctx, config.as_ref());

    let names = reconciler.list().context("Failed to list repositories")?;
    if names.is_empty() {
        if !ctx.quiet {
            ui::info("No local repositories");
        }
        return Ok(());
    }

    for name in names {
        println!("{}", name.bold());
    }
    Ok(())
}
