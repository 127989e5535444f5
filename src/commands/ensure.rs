//! Converge a single repository named on the command line.

use anyhow::Result;
use aptlykit::RepoOptions;

use crate::Context as AppContext;
use crate::cli::EnsureArgs;
use crate::config::Config;

pub fn run(ctx: &AppContext, args: EnsureArgs) -> Result<()> {
    let config = Config::load_optional(None)?;
    let reconciler = super::reconciler(ctx, config.as_ref());

    let requested: RepoOptions = args.options.into_iter().collect();
    let report = super::converge(&reconciler, &args.name, &requested, args.check)?;

    if args.json {
        super::print_json(&report)
    } else {
        super::print_report(ctx, &report);
        Ok(())
    }
}
