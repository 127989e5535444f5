//! Error types for aptly repository operations.
//!
//! Every error halts the reconciliation pass. Errors are categorized so the
//! caller can tell bad input apart from a failing or misbehaving aptly.

use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Categories of errors for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied an invalid name or option set
    Validation,
    /// Repository does not exist
    NotFound,
    /// aptly could not be run or exited non-zero
    Command,
    /// aptly did not behave as expected after a successful command
    Internal,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid input",
            Self::NotFound => "Repository not found",
            Self::Command => "aptly command failed",
            Self::Internal => "Unexpected aptly behaviour",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Validation => "Use only the options comment, component and distribution",
            Self::NotFound => "Check the repository name with 'aptly repo list'",
            Self::Command => "Check the aptly output above and the aptly binary path",
            Self::Internal => "Check the aptly configuration and database for problems",
        }
    }
}

/// Errors that can occur while reconciling a repository.
#[derive(Debug, Error)]
pub enum Error {
    /// Option set contains keys outside the schema
    #[error("invalid repository options: {}", join_keys(.keys))]
    InvalidOptions {
        /// Every offending key
        keys: BTreeSet<String>,
    },

    /// Repository name is empty
    #[error("repository name must not be empty")]
    EmptyRepositoryName,

    /// Repository does not exist
    #[error("repository \"{name}\" does not exist")]
    RepositoryNotFound {
        /// Name of the missing repository
        name: String,
    },

    /// aptly binary could not be executed
    #[error("aptly not found at {}", .0.display())]
    AptlyNotFound(PathBuf),

    /// aptly exited with a non-zero status
    #[error("command failed: {command} ({})", describe_status(.status))]
    CommandFailed {
        /// The aptly subcommand that was run, e.g. `aptly repo create`
        command: String,
        /// Exit code, `None` if terminated by a signal
        status: Option<i32>,
        /// Standard error output from the failed command
        stderr: String,
    },

    /// Repository was not listed right after a successful create
    #[error("repository \"{name}\" was created but is not listed by aptly")]
    CreateNotObserved {
        /// Name of the repository that was created
        name: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidOptions { .. } | Error::EmptyRepositoryName => {
                ErrorCategory::Validation
            }
            Error::RepositoryNotFound { .. } => ErrorCategory::NotFound,
            Error::AptlyNotFound(_) | Error::CommandFailed { .. } | Error::Io(_) => {
                ErrorCategory::Command
            }
            Error::CreateNotObserved { .. } => ErrorCategory::Internal,
        }
    }
}

fn join_keys(keys: &BTreeSet<String>) -> String {
    keys.iter().cloned().collect::<Vec<_>>().join(", ")
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Result type for aptly operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_options_message_names_all_keys() {
        let keys: BTreeSet<String> = ["zeta", "alpha"].iter().map(|s| s.to_string()).collect();
        let err = Error::InvalidOptions { keys };
        assert_eq!(err.to_string(), "invalid repository options: alpha, zeta");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_command_failed_message() {
        let err = Error::CommandFailed {
            command: "aptly repo edit".to_string(),
            status: Some(1),
            stderr: "ERROR: local repo with name foo not found".to_string(),
        };
        assert_eq!(err.to_string(), "command failed: aptly repo edit (exit code 1)");
        assert_eq!(err.category(), ErrorCategory::Command);

        let err = Error::CommandFailed {
            command: "aptly repo list".to_string(),
            status: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            Error::RepositoryNotFound {
                name: "x".to_string()
            }
            .category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            Error::CreateNotObserved {
                name: "x".to_string()
            }
            .category(),
            ErrorCategory::Internal
        );
        assert_eq!(
            Error::AptlyNotFound(PathBuf::from("/usr/bin/aptly")).category(),
            ErrorCategory::Command
        );
    }
}
