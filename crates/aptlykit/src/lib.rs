//! # aptlykit
//!
//! Idempotent management of [aptly](https://www.aptly.info) local repositories.
//!
//! aptly only offers imperative `repo create`, `repo edit`, `repo list` and
//! `repo show` commands. This crate turns them into a single `ensure`
//! operation: declare the options a repository should have, and the
//! [`Reconciler`] creates it, edits it, or leaves it alone.
//!
//! ## Example
//!
//! ```no_run
//! use aptlykit::{Reconciler, RepoOptions};
//!
//! let reconciler = Reconciler::new("/usr/bin/aptly");
//! let options = RepoOptions::new()
//!     .with("comment", "Nightly builds")
//!     .with("distribution", "trixie");
//!
//! let outcome = reconciler.ensure("nightly", &options).expect("aptly failed");
//! println!("changed: {}", outcome.changed);
//! ```
//!
//! ## Managed options
//!
//! | key            | default |
//! |----------------|---------|
//! | `comment`      | `""`    |
//! | `component`    | `main`  |
//! | `distribution` | `""`    |
//!
//! Options not given by the caller take their default, so an existing
//! repository is reset to the default for every omitted option.
//!
//! ## Check mode
//!
//! [`Reconciler::plan`] runs only the read-only commands and reports what
//! [`Reconciler::ensure`] would do.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod output;
pub mod reconcile;
pub mod schema;
pub mod types;

pub use backend::Backend;
pub use backend::aptly::{AptlyBackend, DEFAULT_APTLY_BINARY};
pub use error::{Error, ErrorCategory, Result};
pub use reconcile::Reconciler;
pub use types::{Action, OptionChange, Outcome, Plan, RepoOptions};
