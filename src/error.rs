//! Error types for rule change discovery.
//!
//! Uses thiserror for derive macros. Every variant is fatal to a discovery
//! run and maps to a process exit code.

use crate::exit_codes;
use crate::rules::ParseError;
use thiserror::Error;

/// Main error type for rulediff operations.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The commit range between the base branch and HEAD could not be resolved.
    #[error("failed to get the list of commits to scan: {0}")]
    CommitRange(String),

    /// More commits than the configured ceiling.
    #[error(
        "number of commits to check ({commits}) is higher than max_commits ({max}), exiting"
    )]
    CommitVolumeExceeded { commits: usize, max: usize },

    /// File changes for the commit range could not be listed.
    #[error("failed to list changed files: {0}")]
    ChangeList(String),

    /// A commit message could not be read during the skip marker scan.
    #[error("failed to get commit message for {commit}: {message}")]
    CommitMessage { commit: String, message: String },

    /// A changed file does not parse on the current branch.
    #[error("invalid file syntax: {0}")]
    InvalidSyntax(#[from] ParseError),

    /// Symlinks in the working tree could not be resolved.
    #[error("symlink resolution failed: {0}")]
    Symlink(String),

    /// A git command failed.
    #[error("Git operation failed: {0}")]
    Git(String),

    /// Invalid configuration or arguments.
    #[error("{0}")]
    Config(String),
}

impl DiscoveryError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DiscoveryError::CommitVolumeExceeded { .. } => exit_codes::USER_ERROR,
            DiscoveryError::Symlink(_) => exit_codes::USER_ERROR,
            DiscoveryError::Config(_) => exit_codes::USER_ERROR,
            DiscoveryError::InvalidSyntax(_) => exit_codes::SYNTAX_FAILURE,
            DiscoveryError::CommitRange(_) => exit_codes::GIT_FAILURE,
            DiscoveryError::ChangeList(_) => exit_codes::GIT_FAILURE,
            DiscoveryError::CommitMessage { .. } => exit_codes::GIT_FAILURE,
            DiscoveryError::Git(_) => exit_codes::GIT_FAILURE,
        }
    }
}

/// Result type alias for rulediff operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
