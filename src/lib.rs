//! # pgforge Library
//!
//! Core functionality for managing multiple source-built PostgreSQL
//! installations, used by the `pgforge` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use pgforge::name::InstanceName;
//! use pgforge::rank::{sort_refs, RemoteRef};
//!
//! // "10" is a version-style name...
//! let name = InstanceName::parse("10", None).unwrap();
//! assert_eq!(name.to_patterns(), vec!["10", "REL_10*", "REL10*"]);
//!
//! // ...so discovered refs are ranked by version relevance
//! let refs = vec![
//!     RemoteRef { url: "u".into(), name: "REL_10_RC1".into() },
//!     RemoteRef { url: "u".into(), name: "REL_10_STABLE".into() },
//! ];
//! let ranked = sort_refs(refs, &name);
//! assert_eq!(ranked[0].name, "REL_10_STABLE");
//! ```
//!
//! ## Core Concepts
//!
//! - **Instance names (`name`)**: a short identifier (version number or
//!   branch query) validated and classified for matching.
//! - **Discovery and ranking (`repository`, `git`, `rank`)**: turn a name
//!   into search patterns, list matching remote refs, and order them by
//!   relevance.
//! - **Build state (`state`)**: per-instance commit markers recording what
//!   was last built and last installed, plus the pure staleness
//!   assessment.
//! - **Reconciliation (`instance`, `build`)**: the step machine that
//!   converges a working copy and its installed artifact to the desired
//!   source state, doing only the work that is actually due.
//!
//! ## Execution Flow
//!
//! One `install` pass for an instance runs:
//!
//! 1.  **Resolution**: name → patterns → remote discovery → ranking
//!     (only when no working copy exists yet).
//! 2.  **Fetch**: shallow clone of the winning ref, or a fast-forward
//!     pull of the current branch.
//! 3.  **Assessment**: compare the checked-out commit against the
//!     recorded built/installed commits and configure options.
//! 4.  **Convergence**: distclean, configure, compile and install, each
//!     step only when the assessment says it is due, with commit markers
//!     written in an order that keeps interrupted runs retryable.
//!
//! Instances are processed strictly sequentially; a failure is terminal
//! for its instance but never for the batch.

pub mod build;
pub mod config;
pub mod error;
pub mod exec;
pub mod git;
pub mod instance;
pub mod name;
pub mod output;
pub mod rank;
pub mod repository;
pub mod state;

#[cfg(test)]
mod rank_proptest;
