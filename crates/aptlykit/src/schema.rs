//! The fixed set of repository options managed by this crate.
//!
//! Each option has an internal key (used for `-key=value` flags), the label
//! aptly prints for it in `aptly repo show`, and a default value applied when
//! the caller does not override it.

use crate::types::RepoOptions;

/// Description of a single managed repository option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Internal key, rendered as `-<key>=<value>` on the aptly command line
    pub key: &'static str,
    /// Label used by `aptly repo show` for this option
    pub label: &'static str,
    /// Value used when the caller does not supply one
    pub default: &'static str,
}

/// All managed options, sorted by key.
pub const REPO_OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        key: "comment",
        label: "Comment",
        default: "",
    },
    OptionSpec {
        key: "component",
        label: "Default Component",
        default: "main",
    },
    OptionSpec {
        key: "distribution",
        label: "Default Distribution",
        default: "",
    },
];

/// Look up an option by its internal key.
pub fn spec(key: &str) -> Option<&'static OptionSpec> {
    REPO_OPTIONS.iter().find(|s| s.key == key)
}

/// Map a `repo show` label back to its internal key.
pub fn key_for_label(label: &str) -> Option<&'static str> {
    REPO_OPTIONS
        .iter()
        .find(|s| s.label == label)
        .map(|s| s.key)
}

/// Whether `key` names a managed option.
pub fn is_known(key: &str) -> bool {
    spec(key).is_some()
}

/// Option set holding every default value.
pub fn defaults() -> RepoOptions {
    REPO_OPTIONS
        .iter()
        .map(|s| (s.key.to_string(), s.default.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_sorted_and_unique() {
        let keys: Vec<_> = REPO_OPTIONS.iter().map(|s| s.key).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(key_for_label("Comment"), Some("comment"));
        assert_eq!(key_for_label("Default Component"), Some("component"));
        assert_eq!(key_for_label("Default Distribution"), Some("distribution"));
        assert_eq!(key_for_label("Number of packages"), None);
    }

    #[test]
    fn test_defaults() {
        let defaults = defaults();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults.get("comment"), Some(""));
        assert_eq!(defaults.get("component"), Some("main"));
        assert_eq!(defaults.get("distribution"), Some(""));
    }

    #[test]
    fn test_is_known() {
        assert!(is_known("component"));
        assert!(!is_known("Component"));
        assert!(!is_known("architectures"));
    }
}
