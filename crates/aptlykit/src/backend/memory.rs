//! In-memory backend that mimics aptly's output formats.
//!
//! Useful for testing code built on [`crate::Reconciler`] without an aptly
//! installation. Every call is recorded and can be inspected with
//! [`MemoryBackend::calls`].

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::output::{render_flags, render_show};
use crate::types::RepoOptions;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A backend command as seen by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `repo list`
    List,
    /// `repo create` with the rendered flags
    Create {
        /// Repository name
        name: String,
        /// Rendered `-key=value` flags
        flags: Vec<String>,
    },
    /// `repo edit` with the rendered flags
    Edit {
        /// Repository name
        name: String,
        /// Rendered `-key=value` flags
        flags: Vec<String>,
    },
    /// `repo show`
    Show {
        /// Repository name
        name: String,
    },
}

impl Call {
    /// Whether this call modifies a repository.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Create { .. } | Self::Edit { .. })
    }
}

#[derive(Debug, Default)]
struct State {
    repos: BTreeMap<String, RepoOptions>,
    calls: Vec<Call>,
}

/// Backend holding repositories in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    /// Accept creates without storing the repository
    drop_creates: bool,
    /// Command verb (`list`, `create`, `edit`, `show`) that exits non-zero
    fail_on: Option<&'static str>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing repository.
    pub fn with_repo(self, name: impl Into<String>, options: RepoOptions) -> Self {
        self.lock().repos.insert(name.into(), options);
        self
    }

    /// Report creates as successful without storing the repository.
    pub fn dropping_creates(mut self) -> Self {
        self.drop_creates = true;
        self
    }

    /// Make the given command verb fail with a non-zero exit.
    pub fn failing_on(mut self, verb: &'static str) -> Self {
        self.fail_on = Some(verb);
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Current options of a stored repository.
    pub fn repo(&self, name: &str) -> Option<RepoOptions> {
        self.lock().repos.get(name).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-call
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_failure(&self, verb: &str) -> Result<()> {
        if self.fail_on == Some(verb) {
            return Err(Error::CommandFailed {
                command: format!("aptly repo {verb}"),
                status: Some(1),
                stderr: format!("ERROR: simulated {verb} failure"),
            });
        }
        Ok(())
    }

    fn not_found(verb: &str, name: &str) -> Error {
        Error::CommandFailed {
            command: format!("aptly repo {verb}"),
            status: Some(1),
            stderr: format!("ERROR: local repo with name {name} not found"),
        }
    }
}

impl Backend for MemoryBackend {
    fn list(&self) -> Result<String> {
        let mut state = self.lock();
        state.calls.push(Call::List);
        self.check_failure("list")?;

        if state.repos.is_empty() {
            return Ok("No local repositories found, create one with `aptly repo create ...`.\n"
                .to_string());
        }

        let mut out = String::from("List of local repos:\n");
        for name in state.repos.keys() {
            out.push_str(&format!(" * [{name}] (packages: 0)\n"));
        }
        out.push_str("\nTo get more information about local repository, run `aptly repo show <name>`.\n");
        Ok(out)
    }

    fn create(&self, name: &str, options: &RepoOptions) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Create {
            name: name.to_string(),
            flags: render_flags(options),
        });
        self.check_failure("create")?;

        if state.repos.contains_key(name) {
            return Err(Error::CommandFailed {
                command: "aptly repo create".to_string(),
                status: Some(1),
                stderr: format!("ERROR: local repo with name {name} already exists"),
            });
        }
        if !self.drop_creates {
            state.repos.insert(name.to_string(), options.clone());
        }
        Ok(())
    }

    fn edit(&self, name: &str, options: &RepoOptions) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Edit {
            name: name.to_string(),
            flags: render_flags(options),
        });
        self.check_failure("edit")?;

        match state.repos.get_mut(name) {
            Some(existing) => {
                existing.merge(options);
                Ok(())
            }
            None => Err(Self::not_found("edit", name)),
        }
    }

    fn show(&self, name: &str) -> Result<String> {
        let mut state = self.lock();
        state.calls.push(Call::Show {
            name: name.to_string(),
        });
        self.check_failure("show")?;

        let options = state
            .repos
            .get(name)
            .ok_or_else(|| Self::not_found("show", name))?;
        Ok(format!(
            "{}\nPackages:\n  hello_2.10-3_amd64\n",
            render_show(name, options)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{listing_contains, parse_show};
    use crate::schema;

    #[test]
    fn test_listing_format() {
        let backend = MemoryBackend::new();
        assert!(!listing_contains(&backend.list().unwrap(), "repoA"));

        let backend = backend.with_repo("repoA", schema::defaults());
        let listing = backend.list().unwrap();
        assert!(listing.contains(" * [repoA] (packages: 0)"));
    }

    #[test]
    fn test_create_then_show() {
        let backend = MemoryBackend::new();
        let options = schema::defaults().with("comment", "hi");
        backend.create("repoA", &options).unwrap();

        assert_eq!(parse_show(&backend.show("repoA").unwrap()), options);
        assert_eq!(backend.repo("repoA"), Some(options));
        assert_eq!(backend.calls().len(), 2);
    }

    #[test]
    fn test_create_existing_fails() {
        let backend = MemoryBackend::new().with_repo("repoA", schema::defaults());
        assert!(backend.create("repoA", &schema::defaults()).is_err());
    }

    #[test]
    fn test_edit_missing_fails() {
        let backend = MemoryBackend::new();
        assert!(matches!(
            backend.edit("repoA", &schema::defaults()),
            Err(Error::CommandFailed { .. })
        ));
    }

    #[test]
    fn test_failing_on() {
        let backend = MemoryBackend::new().failing_on("list");
        assert!(backend.list().is_err());
        assert_eq!(backend.calls(), vec![Call::List]);
    }
}
