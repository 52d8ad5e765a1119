//! # CLI Command Implementations
//!
//! One module per subcommand, each with a clap `Args` struct and an
//! `execute` function that calls into the `pgforge` library.
//!
//! Target handling is shared here: every command takes a list of raw
//! targets, where `^name` excludes an instance, `name:query` attaches an
//! explicit search query, and an empty (or purely negative) list means
//! "every instance known under the root". Instances are always processed
//! in sorted order, one at a time; a failure is reported and the batch
//! moves on.

pub mod completions;
pub mod install;
pub mod path;
pub mod pull;
pub mod purge;
pub mod remove;
pub mod search;
pub mod status;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use console::style;

use pgforge::error::{Error, Result};
use pgforge::name::InstanceName;
use pgforge::output::tail_lines;

/// How many trailing output lines a tool-error report shows.
const ERROR_LOG_TAIL: usize = 8;

/// Instance names known under a directory: its entries, hidden ones
/// excluded.
pub fn known_targets(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Expand raw CLI targets into validated instance names.
pub fn preprocess_targets(raw: &[String], dir: &Path) -> Result<Vec<InstanceName>> {
    let (negative, positive): (Vec<&String>, Vec<&String>) =
        raw.iter().partition(|t| t.starts_with('^'));

    let negative: BTreeSet<&str> = negative.iter().map(|t| &t[1..]).collect();
    let mut positive: BTreeSet<String> = positive.into_iter().cloned().collect();

    // any negation, like no targets at all, starts from everything known
    if positive.is_empty() || !negative.is_empty() {
        positive = known_targets(dir)?.into_iter().collect();
    }

    positive
        .into_iter()
        .filter(|name| !negative.contains(name.as_str()))
        .map(|entry| match entry.split_once(':') {
            Some((name, query)) => InstanceName::parse(name, Some(query)),
            None => InstanceName::parse(&entry, None),
        })
        .collect()
}

/// Report a per-instance failure without aborting the batch.
pub fn report_error(error: &Error) {
    eprintln!("{}", style(error).red());

    if let Some(output) = error.captured_output() {
        if !output.trim().is_empty() {
            eprintln!("LOG:\n\n<... skipped lines ...>");
            eprintln!("{}", tail_lines(output, ERROR_LOG_TAIL));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgforge::name::NameKind;
    use tempfile::TempDir;

    fn raw(targets: &[&str]) -> Vec<String> {
        targets.iter().map(|t| t.to_string()).collect()
    }

    fn make_dirs(root: &Path, names: &[&str]) {
        for name in names {
            fs::create_dir_all(root.join(name)).unwrap();
        }
    }

    #[test]
    fn test_known_targets_skips_hidden_entries() {
        let temp = TempDir::new().unwrap();
        make_dirs(temp.path(), &["10", "9.6", ".pgforge"]);

        assert_eq!(known_targets(temp.path()).unwrap(), vec!["10", "9.6"]);
    }

    #[test]
    fn test_known_targets_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(known_targets(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_preprocess_explicit_targets() {
        let temp = TempDir::new().unwrap();
        let targets = preprocess_targets(&raw(&["10", "9.6"]), temp.path()).unwrap();

        let values: Vec<&str> = targets.iter().map(|t| t.value()).collect();
        assert_eq!(values, vec!["10", "9.6"]);
    }

    #[test]
    fn test_preprocess_empty_means_all_known() {
        let temp = TempDir::new().unwrap();
        make_dirs(temp.path(), &["9.6", "10", ".pgforge"]);

        let targets = preprocess_targets(&raw(&[]), temp.path()).unwrap();
        let values: Vec<&str> = targets.iter().map(|t| t.value()).collect();
        assert_eq!(values, vec!["10", "9.6"]);
    }

    #[test]
    fn test_preprocess_negation_implies_all_known() {
        let temp = TempDir::new().unwrap();
        make_dirs(temp.path(), &["9.6", "10", "master"]);

        let targets = preprocess_targets(&raw(&["^master"]), temp.path()).unwrap();
        let values: Vec<&str> = targets.iter().map(|t| t.value()).collect();
        assert_eq!(values, vec!["10", "9.6"]);
    }

    #[test]
    fn test_preprocess_query_suffix() {
        let temp = TempDir::new().unwrap();
        let targets = preprocess_targets(&raw(&["pgpro:10.1"]), temp.path()).unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].value(), "pgpro");
        assert_eq!(targets[0].query(), "10.1");
        assert_eq!(targets[0].kind(), NameKind::Version);
    }

    #[test]
    fn test_preprocess_rejects_invalid_names() {
        let temp = TempDir::new().unwrap();
        let err = preprocess_targets(&raw(&["bad/name"]), temp.path()).unwrap_err();
        assert!(err.is_user());
    }

    #[test]
    fn test_preprocess_sorted_and_deduplicated() {
        let temp = TempDir::new().unwrap();
        let targets = preprocess_targets(&raw(&["b", "a", "b"]), temp.path()).unwrap();
        let values: Vec<&str> = targets.iter().map(|t| t.value()).collect();
        assert_eq!(values, vec!["a", "b"]);
    }
}
