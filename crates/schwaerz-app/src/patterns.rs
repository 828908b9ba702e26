// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pattern config file loading and discovery.
//
// The config file is TOML:
//
// ```toml
// [grouping]              # optional, overrides the built-in thresholds
// max_gap_px = 30
//
// [[patterns]]
// name = "ssn"
// grammar = 'ssn = { ASCII_DIGIT{9} }'
// ```

use std::path::{Path, PathBuf};

use schwaerz_core::{GroupingConfig, Result, SchwaerzError};
use schwaerz_match::PatternSpec;
use serde::Deserialize;
use tracing::debug;

const CONFIG_ENV_VAR: &str = "SCHWAERZ_CONFIG";
const CONFIG_FILENAME: &str = "patterns.toml";

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    patterns: Vec<PatternEntry>,
    grouping: Option<GroupingConfig>,
}

#[derive(Debug, Deserialize)]
struct PatternEntry {
    name: String,
    grammar: String,
}

/// Candidate config locations after the explicit flag, in search order.
fn search_chain() -> Vec<PathBuf> {
    let mut chain = Vec::new();
    if let Some(env_path) = std::env::var_os(CONFIG_ENV_VAR) {
        chain.push(PathBuf::from(env_path));
    }
    chain.push(PathBuf::from(CONFIG_FILENAME));
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        chain.push(PathBuf::from(xdg).join("schwaerz").join(CONFIG_FILENAME));
    } else if let Ok(home) = std::env::var("HOME") {
        chain.push(
            PathBuf::from(home)
                .join(".config")
                .join("schwaerz")
                .join(CONFIG_FILENAME),
        );
    }
    chain
}

/// Human-readable summary of where configs are looked for, for error
/// messages when nothing is found.
pub fn searched_locations() -> String {
    search_chain()
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Locate the pattern config file.
///
/// An explicitly given path must exist; so must a path taken from
/// `SCHWAERZ_CONFIG`, since a dangling setting is a mistake worth
/// surfacing. Beyond those the chain is `./patterns.toml`, then the XDG
/// config directory. Returns `Ok(None)` when nothing is configured.
pub fn find_config(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(SchwaerzError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = std::env::var_os(CONFIG_ENV_VAR) {
        let path = PathBuf::from(env_path);
        if !path.exists() {
            return Err(SchwaerzError::Config(format!(
                "{CONFIG_ENV_VAR} points at {}, which does not exist",
                path.display()
            )));
        }
        return Ok(Some(path));
    }
    for candidate in search_chain() {
        if candidate.exists() {
            debug!(path = %candidate.display(), "found pattern config");
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Parse a pattern config file into pattern specs and an optional
/// grouping override.
pub fn load_patterns(path: &Path) -> Result<(Vec<PatternSpec>, Option<GroupingConfig>)> {
    let raw = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&raw).map_err(|err| {
        SchwaerzError::Config(format!("cannot parse {}: {}", path.display(), err))
    })?;
    let specs = file
        .patterns
        .into_iter()
        .map(|entry| PatternSpec::Grammar {
            name: entry.name,
            source: entry.grammar,
        })
        .collect();
    Ok((specs, file.grouping))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_patterns_and_grouping() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("patterns.toml");
        let mut f = std::fs::File::create(&path).expect("create");
        writeln!(
            f,
            r#"
[grouping]
max_gap_px = 30

[[patterns]]
name = "ssn"
grammar = 'ssn = {{ ASCII_DIGIT{{9}} }}'

[[patterns]]
name = "phone"
grammar = 'phone = {{ ASCII_DIGIT{{10}} }}'
"#
        )
        .expect("write");

        let (specs, grouping) = load_patterns(&path).expect("load");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name(), "ssn");
        let grouping = grouping.expect("grouping section");
        assert_eq!(grouping.max_gap_px, 30);
        // Unset fields fall back to defaults.
        assert_eq!(grouping.pad_px, GroupingConfig::default().pad_px);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("patterns.toml");
        std::fs::write(&path, "patterns = not toml").expect("write");
        let err = load_patterns(&path);
        assert!(matches!(err, Err(SchwaerzError::Config(_))));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = find_config(Some(Path::new("/nonexistent/patterns.toml")));
        assert!(matches!(err, Err(SchwaerzError::Config(_))));
    }

    #[test]
    fn explicit_existing_config_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mine.toml");
        std::fs::write(&path, "").expect("write");
        let found = find_config(Some(&path)).expect("find");
        assert_eq!(found, Some(path));
    }
}
