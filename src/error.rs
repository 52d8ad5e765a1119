//! # Error Handling
//!
//! Centralized error type for pgforge, built on `thiserror`.
//!
//! Errors fall into two families:
//!
//! - **User errors**: a bad instance name, no matching remote reference,
//!   invalid configuration. These are reported directly and are never worth
//!   retrying.
//! - **Tool errors**: an external command (git, configure, make) exited
//!   non-zero. These carry the captured combined output for diagnostics and
//!   are fatal for the current instance but not for the batch: processing
//!   continues with the next requested instance.
//!
//! Anything else (I/O, TOML parsing) is wrapped and propagated as-is.

use thiserror::Error;

/// Main error type for pgforge operations
#[derive(Error, Debug)]
pub enum Error {
    /// The instance identifier failed validation.
    #[error("Wrong identifier: {name}")]
    InvalidName { name: String },

    /// No remote branch or tag matched the instance's search patterns.
    #[error("No branch found for {target}")]
    NoMatchingRef { target: String },

    /// The configuration file could not be interpreted.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A remote reference listing failed for a repository URL.
    #[error("Failed to list refs for {url}: {stderr}")]
    Discovery { url: String, stderr: String },

    /// An external tool invocation exited non-zero.
    ///
    /// `output` holds the combined stdout/stderr when the invocation was
    /// run with captured output.
    #[error("Failed to execute {command}")]
    Tool {
        command: String,
        output: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A TOML serialization error, wrapped from `toml::ser::Error`.
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Whether this error is a user error (bad input, nothing to retry)
    /// as opposed to a failed external tool or an environment problem.
    pub fn is_user(&self) -> bool {
        matches!(
            self,
            Error::InvalidName { .. } | Error::NoMatchingRef { .. } | Error::Config { .. }
        )
    }

    /// Captured output attached to the error, if any.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Error::Tool { output, .. } => output.as_deref(),
            Error::Discovery { stderr, .. } => Some(stderr.as_str()),
            _ => None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
