//! Convergence of a single aptly repository to a declared option set.
//!
//! A pass validates the requested options, reads the repository state from
//! aptly, and then creates, edits or leaves the repository alone. Nothing is
//! cached: every pass re-reads state from the backend.
//!
//! The existence check and the following create/edit are not atomic. Two
//! processes reconciling the same repository at once can race.

use crate::backend::Backend;
use crate::backend::aptly::AptlyBackend;
use crate::error::{Error, Result};
use crate::output;
use crate::schema;
use crate::types::{Action, Outcome, Plan, RepoOptions};
use std::path::PathBuf;

/// Reconciles aptly local repositories through a [`Backend`].
pub struct Reconciler {
    backend: Box<dyn Backend>,
}

impl Reconciler {
    /// Create a reconciler running the aptly binary at `binary`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self::with_backend(Box::new(AptlyBackend::new(binary)))
    }

    /// Create a reconciler with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Merge `requested` on top of the schema defaults and validate the result.
    ///
    /// Fails with [`Error::InvalidOptions`] naming every unknown key.
    pub fn normalize(requested: &RepoOptions) -> Result<RepoOptions> {
        let mut options = schema::defaults();
        options.merge(requested);
        options.validate()?;
        Ok(options)
    }

    /// Whether aptly lists a repository called `name`.
    ///
    /// Uses substring matching on `[name]`, see [`output::listing_contains`].
    pub fn exists(&self, name: &str) -> Result<bool> {
        let listing = self.backend.list()?;
        Ok(output::listing_contains(&listing, name))
    }

    /// Names of all repositories aptly lists.
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(output::listed_names(&self.backend.list()?))
    }

    /// Read the managed options of an existing repository.
    pub fn current_options(&self, name: &str) -> Result<RepoOptions> {
        self.ensure_exists(name)?;

        let shown = self.backend.show(name)?;
        let options = output::parse_show(&shown);
        // parse_show only yields schema keys, so this can only fail if the
        // label table and the key table disagree
        options.validate()?;
        Ok(options)
    }

    /// Work out what [`Reconciler::ensure`] would do, without changing anything.
    ///
    /// Name and options are validated before aptly is run.
    pub fn plan(&self, name: &str, requested: &RepoOptions) -> Result<Plan> {
        if name.is_empty() {
            return Err(Error::EmptyRepositoryName);
        }
        let desired = Self::normalize(requested)?;

        if !self.exists(name)? {
            return Ok(Plan {
                name: name.to_string(),
                action: Action::Create,
                current: None,
                desired,
            });
        }

        let current = self.current_options(name)?;
        let action = if current == desired {
            Action::Nothing
        } else {
            Action::Edit
        };

        Ok(Plan {
            name: name.to_string(),
            action,
            current: Some(current),
            desired,
        })
    }

    /// Carry out a plan produced by [`Reconciler::plan`].
    pub fn apply(&self, plan: &Plan) -> Result<Outcome> {
        match plan.action {
            Action::Create => {
                log::info!("creating repository {}", plan.name);
                self.backend.create(&plan.name, &plan.desired)?;
                if !self.exists(&plan.name)? {
                    return Err(Error::CreateNotObserved {
                        name: plan.name.clone(),
                    });
                }
            }
            Action::Edit => {
                self.ensure_exists(&plan.name)?;
                log::info!("editing repository {}", plan.name);
                self.backend.edit(&plan.name, &plan.desired)?;
            }
            Action::Nothing => {
                log::debug!("repository {} is up to date", plan.name);
            }
        }

        Ok(Outcome {
            name: plan.name.clone(),
            changed: plan.action.is_change(),
            options: plan.desired.clone(),
        })
    }

    /// Converge repository `name` to `requested` (merged over defaults).
    ///
    /// Running this twice with the same input reports `changed = false` the
    /// second time. The returned options are the declared set and are not
    /// re-read after an edit.
    pub fn ensure(&self, name: &str, requested: &RepoOptions) -> Result<Outcome> {
        let plan = self.plan(name, requested)?;
        self.apply(&plan)
    }

    fn ensure_exists(&self, name: &str) -> Result<()> {
        if self.exists(name)? {
            Ok(())
        } else {
            Err(Error::RepositoryNotFound {
                name: name.to_string(),
            })
        }
    }
}
