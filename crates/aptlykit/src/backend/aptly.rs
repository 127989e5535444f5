//! Real aptly CLI backend using `aptly repo` commands.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::output::render_flags;
use crate::types::RepoOptions;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Standard install location of the aptly binary.
pub const DEFAULT_APTLY_BINARY: &str = "/usr/bin/aptly";

/// Backend that executes real `aptly` commands.
///
/// Commands block until aptly exits. No timeout is applied.
#[derive(Debug, Clone)]
pub struct AptlyBackend {
    /// Path to the aptly executable
    binary: PathBuf,
}

impl AptlyBackend {
    /// Create a backend running the aptly binary at `binary`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path of the aptly binary this backend runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run an aptly command and return its output.
    fn run_aptly(&self, args: &[&str]) -> Result<Output> {
        log::debug!("running {} {}", self.binary.display(), args.join(" "));

        Command::new(&self.binary).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::AptlyNotFound(self.binary.clone())
            } else {
                Error::Io(e)
            }
        })
    }

    /// Run an aptly command and check for success.
    ///
    /// `subcommand` is the number of leading args naming the command, used
    /// in the error message.
    fn run_aptly_checked(&self, args: &[&str], subcommand: usize) -> Result<String> {
        let output = self.run_aptly(args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::debug!("aptly failed with {}: {stderr}", output.status);
            return Err(Error::CommandFailed {
                command: format!("aptly {}", args[..subcommand].join(" ")),
                status: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_with_options(&self, verb: &str, name: &str, options: &RepoOptions) -> Result<()> {
        let flags = render_flags(options);
        let mut args = vec!["repo", verb];
        args.extend(flags.iter().map(String::as_str));
        args.push(name);

        self.run_aptly_checked(&args, 2)?;
        Ok(())
    }
}

impl Default for AptlyBackend {
    fn default() -> Self {
        Self::new(DEFAULT_APTLY_BINARY)
    }
}

impl Backend for AptlyBackend {
    fn list(&self) -> Result<String> {
        self.run_aptly_checked(&["repo", "list"], 2)
    }

    fn create(&self, name: &str, options: &RepoOptions) -> Result<()> {
        self.run_with_options("create", name, options)
    }

    fn edit(&self, name: &str, options: &RepoOptions) -> Result<()> {
        self.run_with_options("edit", name, options)
    }

    fn show(&self, name: &str) -> Result<String> {
        self.run_aptly_checked(&["repo", "show", name], 2)
    }
}
