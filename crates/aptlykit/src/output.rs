//! Parsing and rendering of aptly's textual command-line formats.
//!
//! `aptly repo list` prints one repository per line as ` * [name] (...)`.
//! `aptly repo show` prints `Label: value` lines, followed by a blank line
//! and then the package list, which is never read.

use crate::schema;
use crate::types::RepoOptions;

/// Whether a `repo list` output mentions `name`.
///
/// This is a plain substring check for `[name]`. A bracketed name that occurs
/// inside another listed entry also matches.
pub fn listing_contains(listing: &str, name: &str) -> bool {
    listing.contains(&format!("[{name}]"))
}

/// Names of all repositories in a `repo list` output, in listing order.
pub fn listed_names(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| {
            let start = line.find('[')?;
            let end = line[start + 1..].find(']')? + start + 1;
            Some(line[start + 1..end].to_string())
        })
        .collect()
}

/// Parse the header block of a `repo show` output into managed options.
///
/// Reading stops at the first blank line. Labels outside the option schema
/// and lines without a colon are skipped. Each line is split at its first
/// colon and the value is trimmed.
pub fn parse_show(text: &str) -> RepoOptions {
    let mut options = RepoOptions::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            break;
        }

        let Some((label, value)) = line.split_once(':') else {
            log::trace!("skipping show line without label: {line:?}");
            continue;
        };

        match schema::key_for_label(label) {
            Some(key) => {
                options.insert(key, value.trim());
            }
            None => log::trace!("ignoring unmanaged show field {label:?}"),
        }
    }

    options
}

/// Render the `-key=value` flags passed to `repo create` and `repo edit`.
///
/// Every entry is rendered, in key order.
pub fn render_flags(options: &RepoOptions) -> Vec<String> {
    options
        .iter()
        .map(|(key, value)| format!("-{key}={value}"))
        .collect()
}

/// Render a full `repo show` header block for `name`, as aptly prints it.
pub fn render_show(name: &str, options: &RepoOptions) -> String {
    let mut out = format!("Name: {name}\n");
    for spec in schema::REPO_OPTIONS {
        let value = options.get(spec.key).unwrap_or(spec.default);
        out.push_str(&format!("{}: {}\n", spec.label, value));
    }
    out.push_str("Number of packages: 0\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_OUTPUT: &str = "\
Name: stable
Comment: Stable builds: do not touch
Default Distribution: bookworm
Default Component: main
Number of packages: 2

Packages:
  Comment: not-an-option
  hello_2.10-3_amd64
";

    #[test]
    fn test_listing_contains_bracketed_name() {
        let listing = "List of local repos:\n * [stable] (packages: 2)\n";
        assert!(listing_contains(listing, "stable"));
        assert!(!listing_contains(listing, "stab"));
        assert!(!listing_contains(listing, "unstable"));
    }

    #[test]
    fn test_listing_contains_is_substring_match() {
        // "[repoA]" occurs literally, "[repoAB]" does not shadow it
        assert!(listing_contains("[repoA]\n[repoAB]\n", "repoA"));
        // A bracketed name embedded in another line still matches
        assert!(listing_contains(" * [x[repoA]] (packages: 0)\n", "repoA"));
    }

    #[test]
    fn test_listed_names() {
        let listing = "List of local repos:\n * [stable] (packages: 2)\n * [testing] (packages: 0)\n\nTo get more information about local repository, run `aptly repo show <name>`.\n";
        assert_eq!(listed_names(listing), vec!["stable", "testing"]);
        assert!(listed_names("No local repositories found, create one with `aptly repo create ...`.\n").is_empty());
    }

    #[test]
    fn test_parse_show_stops_at_blank_line() {
        let options = parse_show(SHOW_OUTPUT);
        assert_eq!(options.len(), 3);
        assert_eq!(options.get("comment"), Some("Stable builds: do not touch"));
        assert_eq!(options.get("distribution"), Some("bookworm"));
        assert_eq!(options.get("component"), Some("main"));
    }

    #[test]
    fn test_parse_show_trims_and_skips_unknown() {
        let options = parse_show("Name: x\nComment:    spaced   \nno colon here\nDefault Component: main\n");
        assert_eq!(options.get("comment"), Some("spaced"));
        assert_eq!(options.get("component"), Some("main"));
        assert_eq!(options.get("distribution"), None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_parse_show_empty_value() {
        let options = parse_show("Comment: \nDefault Distribution:\n");
        assert_eq!(options.get("comment"), Some(""));
        assert_eq!(options.get("distribution"), Some(""));
    }

    #[test]
    fn test_render_flags_full_set() {
        let flags = render_flags(&schema::defaults().with("comment", "test"));
        assert_eq!(
            flags,
            vec!["-comment=test", "-component=main", "-distribution="]
        );
    }

    #[test]
    fn test_render_show_parses_back() {
        let options = schema::defaults().with("distribution", "trixie");
        assert_eq!(parse_show(&render_show("repoA", &options)), options);
    }
}
