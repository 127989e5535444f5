//! Backend abstraction for aptly repository operations.
//!
//! The [`Backend`] trait defines the four commands the reconciler needs,
//! allowing for different implementations (real CLI, in-memory for testing).
//! Backends return aptly's raw text; parsing lives in [`crate::output`] so a
//! replacement backend only has to reproduce the same formats.

pub mod aptly;
pub mod memory;

use crate::error::Result;
use crate::types::RepoOptions;

/// Backend trait for aptly local repository commands.
pub trait Backend: Send + Sync {
    /// Run `repo list` and return its output.
    fn list(&self) -> Result<String>;

    /// Run `repo create` with every option in `options`.
    fn create(&self, name: &str, options: &RepoOptions) -> Result<()>;

    /// Run `repo edit` with every option in `options`.
    fn edit(&self, name: &str, options: &RepoOptions) -> Result<()>;

    /// Run `repo show` and return its output.
    fn show(&self, name: &str) -> Result<String>;
}

impl<B: Backend + ?Sized> Backend for std::sync::Arc<B> {
    fn list(&self) -> Result<String> {
        (**self).list()
    }

    fn create(&self, name: &str, options: &RepoOptions) -> Result<()> {
        (**self).create(name, options)
    }

    fn edit(&self, name: &str, options: &RepoOptions) -> Result<()> {
        (**self).edit(name, options)
    }

    fn show(&self, name: &str) -> Result<String> {
        (**self).show(name)
    }
}
