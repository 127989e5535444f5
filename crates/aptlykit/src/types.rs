//! Core types for aptly repository reconciliation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::schema;

/// A set of repository options, keyed by internal option key.
///
/// Keys are kept sorted so flag rendering and comparisons are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoOptions(BTreeMap<String, String>);

impl RepoOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style variant of [`RepoOptions::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get the value of an option.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of options in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every entry of `overrides` on top of this set.
    pub fn merge(&mut self, overrides: &RepoOptions) {
        for (key, value) in overrides.iter() {
            self.insert(key, value);
        }
    }

    /// Keys that are not part of the option schema.
    pub fn unknown_keys(&self) -> BTreeSet<String> {
        self.0
            .keys()
            .filter(|k| !schema::is_known(k))
            .cloned()
            .collect()
    }

    /// Fail with [`Error::InvalidOptions`] naming every key outside the schema.
    pub fn validate(&self) -> Result<()> {
        let keys = self.unknown_keys();
        if keys.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidOptions { keys })
        }
    }

    /// Per-key differences going from `self` to `desired`.
    ///
    /// A key missing on one side is reported with an empty value there.
    pub fn changes_to(&self, desired: &RepoOptions) -> Vec<OptionChange> {
        let keys: BTreeSet<&str> = self
            .0
            .keys()
            .chain(desired.0.keys())
            .map(String::as_str)
            .collect();

        keys.into_iter()
            .filter_map(|key| {
                let from = self.get(key);
                let to = desired.get(key);
                (from != to).then(|| OptionChange {
                    key: key.to_string(),
                    from: from.unwrap_or_default().to_string(),
                    to: to.unwrap_or_default().to_string(),
                })
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for RepoOptions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for RepoOptions {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl std::fmt::Display for RepoOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v:?}")).collect();
        write!(f, "{}", pairs.join(", "))
    }
}

/// One option whose current value differs from the desired value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChange {
    /// Internal option key
    pub key: String,
    /// Current value (empty if unset)
    pub from: String,
    /// Desired value (empty if unset)
    pub to: String,
}

/// What a reconciliation pass has to do to reach the desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Repository is absent and will be created
    Create,
    /// Repository exists with different options and will be edited
    Edit,
    /// Repository already matches
    Nothing,
}

impl Action {
    /// Whether carrying out this action changes the repository.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Nothing)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Edit => write!(f, "edit"),
            Self::Nothing => write!(f, "unchanged"),
        }
    }
}

/// Read-only result of comparing desired and current repository state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Repository name
    pub name: String,
    /// Action needed to converge
    pub action: Action,
    /// Options currently set, `None` if the repository does not exist
    pub current: Option<RepoOptions>,
    /// Normalized desired options
    pub desired: RepoOptions,
}

impl Plan {
    /// Options that differ between current and desired state.
    ///
    /// For a repository that does not exist yet every desired option is listed.
    pub fn changes(&self) -> Vec<OptionChange> {
        match &self.current {
            Some(current) => current.changes_to(&self.desired),
            None => RepoOptions::new().changes_to(&self.desired),
        }
    }
}

/// Result of a completed reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Repository name
    pub name: String,
    /// Whether a create or edit command was run
    pub changed: bool,
    /// The declared option set. Not re-read from aptly after a write.
    pub options: RepoOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_lists_every_offender() {
        let options = RepoOptions::new()
            .with("comment", "x")
            .with("not-a-real-option", "x")
            .with("architectures", "amd64");

        let unknown = options.unknown_keys();
        assert_eq!(unknown.len(), 2);
        assert!(unknown.contains("not-a-real-option"));
        assert!(unknown.contains("architectures"));

        match options.validate() {
            Err(Error::InvalidOptions { keys }) => assert_eq!(keys, unknown),
            other => panic!("expected InvalidOptions, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_overrides_defaults() {
        let mut options = schema::defaults();
        options.merge(&RepoOptions::new().with("comment", "test"));
        assert_eq!(options.get("comment"), Some("test"));
        assert_eq!(options.get("component"), Some("main"));
    }

    #[test]
    fn test_changes_to() {
        let current = schema::defaults();
        let desired = schema::defaults().with("distribution", "bookworm");

        let changes = current.changes_to(&desired);
        assert_eq!(
            changes,
            vec![OptionChange {
                key: "distribution".to_string(),
                from: String::new(),
                to: "bookworm".to_string(),
            }]
        );
        assert!(desired.changes_to(&desired).is_empty());
    }

    #[test]
    fn test_plan_changes_for_missing_repo() {
        let plan = Plan {
            name: "repoA".to_string(),
            action: Action::Create,
            current: None,
            desired: schema::defaults(),
        };
        let keys: Vec<_> = plan.changes().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["comment", "component", "distribution"]);
    }

    #[test]
    fn test_options_serialize_as_map() {
        let options = RepoOptions::new().with("comment", "a");
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"comment":"a"}"#);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Create.to_string(), "create");
        assert_eq!(Action::Nothing.to_string(), "unchanged");
        assert!(Action::Edit.is_change());
        assert!(!Action::Nothing.is_change());
    }
}
