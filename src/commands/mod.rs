//! Subcommand implementations sharing one convergence path.

pub mod apply;
pub mod ensure;
pub mod inspect;

use anyhow::{Context, Result};
use aptlykit::{Action, OptionChange, Reconciler, RepoOptions};
use colored::Colorize;
use serde::Serialize;

use crate::Context as AppContext;
use crate::config::{self, Config};
use crate::ui;

/// Result of converging (or checking) one repository.
#[derive(Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub changed: bool,
    pub action: Action,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub check_mode: bool,
    pub options: RepoOptions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<OptionChange>,
}

/// Build a reconciler for the aptly binary picked from flags, env and config.
pub fn reconciler(ctx: &AppContext, config: Option<&Config>) -> Reconciler {
    let binary = config::resolve_binary(ctx.aptly_binary.as_deref(), config);
    log::debug!("Using aptly at {}", binary.display());
    Reconciler::new(binary)
}

/// Converge one repository, or only plan it when `check` is set.
pub fn converge(
    reconciler: &Reconciler,
    name: &str,
    requested: &RepoOptions,
    check: bool,
) -> Result<Report> {
    let plan = reconciler
        .plan(name, requested)
        .with_context(|| format!("Failed to inspect repository '{name}'"))?;
    let changes = plan.changes();

    let changed = if check {
        plan.action.is_change()
    } else {
        reconciler
            .apply(&plan)
            .with_context(|| format!("Failed to {} repository '{name}'", plan.action))?
            .changed
    };

    Ok(Report {
        name: plan.name,
        changed,
        action: plan.action,
        check_mode: check,
        options: plan.desired,
        changes,
    })
}

/// Print a report as status lines.
pub fn print_report(ctx: &AppContext, report: &Report) {
    let verb = match (report.action, report.check_mode) {
        (Action::Create, false) => "created",
        (Action::Create, true) => "would be created",
        (Action::Edit, false) => "updated",
        (Action::Edit, true) => "would be updated",
        (Action::Nothing, _) => "unchanged",
    };
    let msg = format!("{} {}", report.name.bold(), verb);

    match report.action {
        Action::Nothing => {
            if !ctx.quiet {
                ui::success(&msg);
            }
        }
        _ if report.check_mode => ui::warn(&msg),
        _ => ui::success(&msg),
    }

    if ctx.quiet {
        return;
    }
    for change in &report.changes {
        ui::change(&change.key, &change.from, &change.to);
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
