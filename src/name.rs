//! # Instance Names
//!
//! An instance is identified by a short name, either a version number
//! (`9.6`, `10`, `9_6_3`) or a branch-like query string (`master`,
//! `my-feature`). The name doubles as the on-disk directory name and as the
//! search query used to discover matching remote refs, unless an explicit
//! query is attached.
//!
//! The kind of the name decides both which search patterns are generated
//! for `git ls-remote` and which ranking strategy orders the discovered
//! refs (see [`crate::rank`]).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static RX_IS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+([._]\d+)*").unwrap());
static RX_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[._]").unwrap());

/// How an instance name should be matched against remote refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A version-looking query (`9.6`, `10`); matched against the
    /// `REL_*`/`REL*` tag and branch naming conventions.
    Version,
    /// Anything else; matched by substring and ranked by textual
    /// similarity.
    Branch,
}

/// A validated instance identifier.
///
/// `value` is the on-disk name, `query` the string used for remote ref
/// matching (defaults to `value`). Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceName {
    value: String,
    query: String,
    kind: NameKind,
}

impl InstanceName {
    /// Parse and validate an instance name with an optional explicit
    /// search query.
    ///
    /// Both strings must be non-blank, contain at least one alphanumeric
    /// character and no path separator; construction fails with
    /// [`Error::InvalidName`] otherwise.
    pub fn parse(name: &str, query: Option<&str>) -> Result<Self> {
        let value = check_str(name)?;
        let query = match query {
            Some(q) => check_str(q)?,
            None => value.clone(),
        };

        let kind = if RX_IS_VERSION.is_match(&query) {
            NameKind::Version
        } else {
            NameKind::Branch
        };

        Ok(Self { value, query, kind })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn kind(&self) -> NameKind {
        self.kind
    }

    /// Derive the `git ls-remote` search patterns for this name.
    ///
    /// Branch names yield an exact pattern plus a wildcard substring
    /// pattern. Version names have their separators normalized into a
    /// `[._]` character class and cover both historical remote naming
    /// conventions for version refs (`REL_9_6*` and `REL9_6*`).
    pub fn to_patterns(&self) -> Vec<String> {
        match self.kind {
            NameKind::Version => {
                let normalized = RX_SEPARATOR.replace_all(&self.query, "[._]");
                vec![
                    normalized.to_string(),
                    format!("REL_{}*", normalized),
                    format!("REL{}*", normalized),
                ]
            }
            NameKind::Branch => {
                vec![self.query.clone(), format!("*{}*", self.query)]
            }
        }
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn check_str(s: &str) -> Result<String> {
    let ok = !s.trim().is_empty()
        && s.chars().any(|c| c.is_alphanumeric())
        && !s.contains(['/', '\\']);

    if !ok {
        return Err(Error::InvalidName {
            name: s.to_string(),
        });
    }

    Ok(s.to_string())
}
