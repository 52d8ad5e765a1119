//! # Repository Source Abstraction
//!
//! The reconciler never talks to `git` directly; it goes through the
//! [`RepositorySource`] trait so that the backend can be swapped out:
//! in tests for a scripted in-memory source, and in principle for any
//! source-control system that can list refs, clone one, and answer a few
//! questions about a working copy.
//!
//! Backends implement the per-repository primitives; the multi-repository
//! discovery policy (scan order, first-match-wins, per-repository failure
//! tolerance) lives in the provided [`RepositorySource::discover`] method
//! so every backend shares it.

use std::path::Path;

use crate::error::Result;
use crate::git;
use crate::rank::RemoteRef;

/// Capabilities required of a source-control backend.
pub trait RepositorySource {
    /// List refs (branches and tags) matching any of `patterns` on a
    /// single repository.
    fn list_refs(&self, url: &str, patterns: &[String]) -> Result<Vec<RemoteRef>>;

    /// Shallow-clone `ref_name` into `work_dir`.
    fn clone_ref(&self, url: &str, ref_name: &str, work_dir: &Path, depth: u32) -> Result<()>;

    /// Fast-forward the current branch; no-op on a detached checkout.
    fn pull(&self, work_dir: &Path) -> Result<()>;

    /// Commit id of the working copy's `HEAD`.
    fn current_commit(&self, work_dir: &Path) -> Result<String>;

    /// Checked-out branch name, or `None` when detached.
    fn current_branch(&self, work_dir: &Path) -> Option<String>;

    /// Tag pointing at `HEAD`, if any.
    fn current_tag(&self, work_dir: &Path) -> Option<String>;

    /// Commits between two points, or `None` when unknown locally.
    fn commit_distance(&self, work_dir: &Path, from: &str, to: &str) -> Option<u64>;

    /// Whether a working copy exists at `work_dir`.
    fn has_working_copy(&self, work_dir: &Path) -> bool;

    /// Idempotently add an ignore pattern to the working copy's local
    /// excludes.
    fn append_exclude(&self, work_dir: &Path, pattern: &str) -> Result<()>;

    /// Query repositories in configured order for refs matching any
    /// pattern.
    ///
    /// With `first_match` set, scanning stops at the first repository that
    /// yields at least one match. A repository whose listing fails is
    /// logged and skipped; it never aborts the scan. An empty result is
    /// not an error here; callers decide whether that is terminal.
    fn discover(
        &self,
        urls: &[String],
        patterns: &[String],
        first_match: bool,
    ) -> Result<Vec<RemoteRef>> {
        let mut refs = Vec::new();

        for url in urls {
            match self.list_refs(url, patterns) {
                Ok(found) => refs.extend(found),
                Err(e) => {
                    log::warn!("skipping {}: {}", url, e);
                    continue;
                }
            }

            if !refs.is_empty() && first_match {
                break;
            }
        }

        Ok(refs)
    }
}

/// The default backend: the system `git` command.
pub struct GitSource;

impl RepositorySource for GitSource {
    fn list_refs(&self, url: &str, patterns: &[String]) -> Result<Vec<RemoteRef>> {
        git::list_remote_refs(url, patterns)
    }

    fn clone_ref(&self, url: &str, ref_name: &str, work_dir: &Path, depth: u32) -> Result<()> {
        git::clone_ref(url, ref_name, work_dir, depth)
    }

    fn pull(&self, work_dir: &Path) -> Result<()> {
        git::pull(work_dir)
    }

    fn current_commit(&self, work_dir: &Path) -> Result<String> {
        git::current_commit(work_dir)
    }

    fn current_branch(&self, work_dir: &Path) -> Option<String> {
        git::current_branch(work_dir)
    }

    fn current_tag(&self, work_dir: &Path) -> Option<String> {
        git::current_tag(work_dir)
    }

    fn commit_distance(&self, work_dir: &Path, from: &str, to: &str) -> Option<u64> {
        git::commit_distance(work_dir, from, to)
    }

    fn has_working_copy(&self, work_dir: &Path) -> bool {
        git::has_working_copy(work_dir)
    }

    fn append_exclude(&self, work_dir: &Path, pattern: &str) -> Result<()> {
        git::append_exclude(work_dir, pattern)
    }
}
