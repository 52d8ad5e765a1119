//! # Build State
//!
//! Per-instance record of what was last built and what is currently
//! installed, persisted as two small marker files holding raw commit ids:
//! one in the working copy (built commit) and one under the install dir
//! (installed commit). An absent or empty file means "unset".
//!
//! The two markers are written at different moments on purpose: the built
//! commit is recorded before `make install` starts, the installed commit
//! only after it succeeds. A crash in between leaves the instance marked
//! as requiring reinstall (safe retry) instead of falsely installed.
//! Re-build and re-install are distinct questions: a fresh build may sit
//! in the working copy without having been installed yet.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the commit markers, relative to the install dir and the
/// working copy respectively.
pub const MARKER_FILE: &str = ".pgforge_build";

/// What reconciliation has to do, derived purely from commit identities
/// and configure options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    /// The working copy needs a clean + rebuild.
    pub requires_rebuild: bool,
    /// The installed artifact does not reflect the working copy's commit.
    pub requires_reinstall: bool,
    /// The requested configure options differ from the last used ones.
    pub configure_changed: bool,
}

/// Compute staleness from commit identities and configure options.
///
/// Pure function of its inputs; an unset commit on either side of a
/// comparison makes the corresponding step required.
pub fn assess(
    actual: Option<&str>,
    built: Option<&str>,
    installed: Option<&str>,
    last_options: &[String],
    requested_options: Option<&[String]>,
) -> Staleness {
    let unset_or_differs =
        |recorded: Option<&str>| recorded.is_none() || actual.is_none() || recorded != actual;

    Staleness {
        requires_rebuild: unset_or_differs(built),
        requires_reinstall: unset_or_differs(installed),
        configure_changed: requested_options.is_some_and(|opts| opts != last_options),
    }
}

/// Accessors for the two on-disk commit markers of one instance.
#[derive(Debug, Clone)]
pub struct BuildState {
    built_file: PathBuf,
    installed_file: PathBuf,
}

impl BuildState {
    pub fn new(main_dir: &Path, work_dir: &Path) -> Self {
        Self {
            built_file: work_dir.join(MARKER_FILE),
            installed_file: main_dir.join(MARKER_FILE),
        }
    }

    /// Commit fully built into the working copy, if recorded.
    pub fn built_commit(&self) -> Option<String> {
        read_commit_file(&self.built_file)
    }

    /// Commit reflected in the installed artifact, if recorded.
    pub fn installed_commit(&self) -> Option<String> {
        read_commit_file(&self.installed_file)
    }

    /// Record a completed build of `commit`.
    pub fn record_built(&self, commit: &str) -> Result<()> {
        write_commit_file(&self.built_file, commit)
    }

    /// Record a completed install of `commit`.
    pub fn record_installed(&self, commit: &str) -> Result<()> {
        write_commit_file(&self.installed_file, commit)
    }

    /// Forget the built commit (the tree is about to be cleaned).
    pub fn clear_built(&self) -> Result<()> {
        remove_commit_file(&self.built_file)
    }

    /// Forget both markers (the instance is being removed).
    pub fn clear(&self) -> Result<()> {
        remove_commit_file(&self.built_file)?;
        remove_commit_file(&self.installed_file)
    }
}

fn read_commit_file(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let commit = content.trim();
    if commit.is_empty() {
        None
    } else {
        Some(commit.to_string())
    }
}

fn write_commit_file(path: &Path, commit: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, commit)?;
    Ok(())
}

fn remove_commit_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
