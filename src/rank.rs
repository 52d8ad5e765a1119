//! # Remote Reference Ranking
//!
//! Discovery (see [`crate::repository`]) returns a flat list of branch and
//! tag names; this module orders them by relevance to the instance name so
//! the reconciler can pick index 0.
//!
//! Two pure strategies, selected by [`NameKind`]:
//!
//! - **Version**: a numeric key is extracted from the ref name, with
//!   release-maturity markers folded in as sentinel values so that
//!   `stable > rc > beta > alpha` and, within a marker, a higher numeric
//!   suffix wins (`REL_10_RC2 > REL_10_RC1`). Keys compare
//!   lexicographically.
//! - **Branch**: Jaccard similarity between the 3-character shingle sets of
//!   the query and the candidate name.
//!
//! Both sorts are stable and descending, so equal-ranked refs keep their
//! discovery order: with several configured repositories, the one listed
//! first in the configuration wins ties.

use std::collections::HashSet;

use crate::name::{InstanceName, NameKind};

/// A branch or tag discovered on a remote repository.
///
/// Produced only by discovery and never persisted; after reconciliation
/// only the resulting commit id is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// URL of the repository the ref was discovered on.
    pub url: String,
    /// Short ref name (`REL_10_STABLE`, `master`).
    pub name: String,
}

/// Release-maturity markers and their sentinel values.
///
/// `stable` outranks any numeric component; pre-release markers sink below
/// zero so that plain numbered refs beat them.
const MATURITY_MARKERS: [(&str, i64); 4] = [
    ("stable", i64::MAX),
    ("rc", -1),
    ("beta", -2),
    ("alpha", -3),
];

/// Extract the orderable version key from a ref name.
///
/// Digit groups are collected by keeping digits and `_` and splitting on
/// `_` (`REL_9_6_3` yields `[9, 6, 3]`). A maturity marker appends its
/// sentinel; a numeric suffix right after the marker replaces the trailing
/// digit group it produced (`REL_10_RC1` yields `[10, -1, 1]`, not
/// `[10, 1, -1, 1]`).
pub fn version_sort_key(ref_name: &str) -> Vec<i64> {
    let name = ref_name.to_lowercase();

    let digits: String = name
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '_')
        .collect();

    let mut key: Vec<i64> = digits
        .split('_')
        .filter(|n| !n.is_empty())
        .filter_map(|n| n.parse().ok())
        .collect();

    for (marker, sentinel) in MATURITY_MARKERS {
        if let Some(at) = name.rfind(marker) {
            let suffix = &name[at + marker.len()..];
            if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
                // the suffix already contributed a trailing digit group
                key.pop();
                key.push(sentinel);
                if let Ok(n) = suffix.parse() {
                    key.push(n);
                }
            } else {
                key.push(sentinel);
            }
        }
    }

    key
}

/// The 3-character shingle set of a string, over Unicode scalar values.
///
/// Strings shorter than 3 characters produce an empty set.
pub fn trigrams(text: &str) -> HashSet<(char, char, char)> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(3).map(|w| (w[0], w[1], w[2])).collect()
}

/// Jaccard similarity between two shingle sets, in `[0, 1]`.
///
/// An empty union yields 0 rather than a division by zero, so names
/// shorter than 3 characters simply rank last.
pub fn similarity(a: &HashSet<(char, char, char)>, b: &HashSet<(char, char, char)>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Order discovered refs by relevance to `name`, most relevant first.
///
/// The strategy is picked off the name's kind; ties keep discovery order
/// (stable sort).
pub fn sort_refs(refs: Vec<RemoteRef>, name: &InstanceName) -> Vec<RemoteRef> {
    match name.kind() {
        NameKind::Version => {
            let mut keyed: Vec<(Vec<i64>, RemoteRef)> = refs
                .into_iter()
                .map(|r| (version_sort_key(&r.name), r))
                .collect();
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
            keyed.into_iter().map(|(_, r)| r).collect()
        }
        NameKind::Branch => {
            // query shingles computed once for the whole candidate set
            let query = trigrams(name.query());
            let mut keyed: Vec<(f64, RemoteRef)> = refs
                .into_iter()
                .map(|r| (similarity(&trigrams(&r.name), &query), r))
                .collect();
            keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            keyed.into_iter().map(|(_, r)| r).collect()
        }
    }
}
