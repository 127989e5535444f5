use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aptkeep")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Keep aptly local repositories in their declared state", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the aptly binary [default: config file, then /usr/bin/aptly]
    #[arg(long, global = true, env = "APTKEEP_APTLY_BINARY", value_name = "PATH")]
    pub aptly_binary: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or update one repository so it has the given options
    Ensure(EnsureArgs),

    /// Converge every repository declared in the config file
    Apply(ApplyArgs),

    /// Show the managed options of an existing repository
    Show(ShowArgs),

    /// List repository names known to aptly
    List,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct EnsureArgs {
    /// Repository name
    pub name: String,

    /// Option override, e.g. -o distribution=bookworm (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,

    /// Report what would change without running create or edit
    #[arg(long)]
    pub check: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Config file declaring repositories [default: ~/.config/aptkeep/repos.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report what would change without running create or edit
    #[arg(long)]
    pub check: bool,

    /// Print the results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Repository name
    pub name: String,

    /// Print the options as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse a `key=value` option override. The value may be empty.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("comment=a=b"),
            Ok(("comment".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_key_value("distribution="),
            Ok(("distribution".to_string(), String::new()))
        );
        assert!(parse_key_value("comment").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_ensure_args() {
        let cli = Cli::try_parse_from([
            "aptkeep",
            "ensure",
            "stable",
            "-o",
            "comment=Stable",
            "--option",
            "distribution=bookworm",
            "--check",
            "--aptly-binary",
            "/opt/aptly",
        ])
        .unwrap();

        assert_eq!(cli.aptly_binary.as_deref(), Some("/opt/aptly"));
        match cli.command {
            Command::Ensure(args) => {
                assert_eq!(args.name, "stable");
                assert!(args.check);
                assert!(!args.json);
                assert_eq!(args.options.len(), 2);
                assert_eq!(args.options[1].0, "distribution");
            }
            _ => panic!("expected ensure"),
        }
    }

    #[test]
    fn test_ensure_requires_name() {
        assert!(Cli::try_parse_from(["aptkeep", "ensure"]).is_err());
    }
}
