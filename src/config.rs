use anyhow::{Context, Result, bail};
use aptlykit::{DEFAULT_APTLY_BINARY, RepoOptions};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("aptkeep"))
}

/// Get the default repos.toml path
pub fn default_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("repos.toml"))
}

// ============================================================================
// Repos Config
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// aptly binary used when none is given on the command line
    #[serde(default)]
    pub aptly_binary: Option<String>,
    #[serde(default, rename = "repo")]
    pub repos: Vec<RepoEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoEntry {
    pub name: String,
    #[serde(default)]
    pub options: RepoOptions,
}

impl Config {
    /// Parse a repos.toml document
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid repos.toml format")?;

        let mut seen = HashSet::new();
        for repo in &config.repos {
            if !seen.insert(repo.name.as_str()) {
                bail!("Repository '{}' is declared more than once", repo.name);
            }
        }

        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Could not load {}", path.display()))
    }

    /// Load `explicit` if given, otherwise the default config if it exists
    pub fn load_optional(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }

        let path = default_path()?;
        if path.exists() {
            log::debug!("Using config {}", path.display());
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Pick the aptly binary: command line (or env), then config, then the default
pub fn resolve_binary(cli: Option<&str>, config: Option<&Config>) -> PathBuf {
    let raw = cli
        .or_else(|| config.and_then(|c| c.aptly_binary.as_deref()))
        .unwrap_or(DEFAULT_APTLY_BINARY);
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}
