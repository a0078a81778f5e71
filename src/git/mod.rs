//! Git access for rule change discovery.
//!
//! All git operations go through a [`CommandRunner`], so discovery can be
//! driven by the real `git` binary ([`GitCli`]) or by a scripted runner in
//! tests. On top of the runner this module answers three questions:
//! - Which commits are on HEAD but not on the base branch ([`commit_range`])
//! - Which files changed over those commits, with both bodies and the added
//!   line numbers ([`changes`])
//! - What a given commit's message is ([`commit_message`])

mod changes;
mod range;
mod runner;


// Re-export public API
pub use changes::{FileChange, PathInfo, changes, resolve_link_target};
pub use range::{CommitRange, commit_message, commit_range};
pub use runner::{CommandRunner, GitCli, GitOutput, get_repo_root, run_git};
