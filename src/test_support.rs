use crate::error::{DiscoveryError, Result};
use crate::git::{CommandRunner, GitOutput, run_git};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

/// Create a repository on `main` with a single initial commit.
pub(crate) fn create_test_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let path = dir.path();

    git(path, &["init", "--quiet"]);
    // init.defaultBranch varies between machines.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(path, &["config", "user.name", "Rule Author"]);
    git(path, &["config", "user.email", "rules@example.invalid"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    commit_files(path, &[("README.md", "# rules\n")], "Initial commit");
    dir
}

/// Write `files` (path, content) and commit them with `message`.
pub(crate) fn commit_files(repo_dir: &Path, files: &[(&str, &str)], message: &str) {
    for (name, content) in files {
        let path = repo_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    git(repo_dir, &["add", "-A"]);
    git(repo_dir, &["commit", "-m", message]);
}

/// Run git in `repo_dir`, panicking on failure. Returns trimmed stdout.
pub(crate) fn git(repo_dir: &Path, args: &[&str]) -> String {
    run_git(repo_dir, args)
        .unwrap_or_else(|e| panic!("test setup: {}", e))
        .stdout
}

/// Scripted [`CommandRunner`] keyed by the space-joined argument list.
///
/// Unscripted calls fail with a git error naming the arguments.
#[derive(Default)]
pub(crate) struct FakeRunner {
    responses: HashMap<String, std::result::Result<String, String>>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ok(mut self, args: &str, stdout: &str) -> Self {
        self.responses.insert(args.to_string(), Ok(stdout.to_string()));
        self
    }

    pub(crate) fn fail(mut self, args: &str, message: &str) -> Self {
        self.responses
            .insert(args.to_string(), Err(message.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, args: &[&str]) -> Result<GitOutput> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(key.clone());
        match self.responses.get(&key) {
            Some(Ok(stdout)) => Ok(GitOutput::from_stdout(stdout.clone())),
            Some(Err(message)) => Err(DiscoveryError::Git(message.clone())),
            None => Err(DiscoveryError::Git(format!("unexpected git call: {}", key))),
        }
    }
}
