mod cli;
mod commands;
mod config;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub aptly_binary: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        aptly_binary: cli.aptly_binary,
    };

    match run(&ctx, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&ctx, &err);
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Ensure(args) => commands::ensure::run(ctx, args),
        Command::Apply(args) => commands::apply::run(ctx, args),
        Command::Show(args) => commands::inspect::show(ctx, args),
        Command::List => commands::inspect::list(ctx),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "aptkeep", &mut io::stdout());
            Ok(())
        }
    }
}

/// Print an error chain plus advice for aptly errors
fn report_error(ctx: &Context, err: &anyhow::Error) {
    ui::error(&format!("{err:#}"));

    let Some(apt_err) = err.downcast_ref::<aptlykit::Error>() else {
        return;
    };

    if let aptlykit::Error::CommandFailed { stderr, .. } = apt_err
        && !stderr.is_empty()
    {
        for line in stderr.lines() {
            ui::hint(line);
        }
    }

    if !ctx.quiet {
        let category = apt_err.category();
        ui::hint(&format!("{}: {}", category.description(), category.advice()));
    }

    if ctx.verbose > 1 {
        ui::hint(&format!("{apt_err:?}"));
    }
}
