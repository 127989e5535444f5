//! Converge every repository declared in repos.toml.

use anyhow::{Result, bail};
use colored::Colorize;

use crate::Context as AppContext;
use crate::cli::ApplyArgs;
use crate::config::{self, Config};
use crate::ui;

pub fn run(ctx: &AppContext, args: ApplyArgs) -> Result<()> {
    let config = match Config::load_optional(args.config.as_deref())? {
        Some(config) => config,
        None => bail!(
            "No config file found at {}; pass one with --config",
            config::default_path()?.display()
        ),
    };

    if config.repos.is_empty() {
        if !args.json && !ctx.quiet {
            ui::info("No repositories declared");
        }
        return if args.json {
            super::print_json(&Vec::<super::Report>::new())
        } else {
            Ok(())
        };
    }

    let reconciler = super::reconciler(ctx, Some(&config));

    if !args.json && !ctx.quiet {
        ui::header(if args.check {
            "Checking Repositories"
        } else {
            "Applying Repositories"
        });
    }

    // Stop at the first failure; later repositories are left untouched
    let mut reports = Vec::with_capacity(config.repos.len());
    for repo in &config.repos {
        let report = super::converge(&reconciler, &repo.name, &repo.options, args.check)?;
        if !args.json {
            super::print_report(ctx, &report);
        }
        reports.push(report);
    }

    if args.json {
        return super::print_json(&reports);
    }

    if !ctx.quiet {
        let changed = reports.iter().filter(|r| r.changed).count();
        println!();
        ui::dim(&format!(
            "{} repositories, {} {}",
            reports.len(),
            changed,
            if args.check { "to change" } else { "changed" }
        ));
        if args.check && changed > 0 {
            ui::dim(&format!("Run {} to apply", "aptkeep apply".bold()));
        }
    }

    Ok(())
}
