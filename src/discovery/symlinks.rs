//! Symlink aliases for discovered rules.
//!
//! A rule file reachable through a symlink in the working tree is reported
//! under the link's path as well, so changes to the target are checked
//! wherever the file is used.

use super::entry::{ChangeState, Entry};
use crate::diff::normalize_path;
use crate::error::{DiscoveryError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Produces alias entries for rules reachable through symlinks.
pub trait SymlinkResolver {
    fn resolve_aliases(&self, entries: &[Entry]) -> Result<Vec<Entry>>;
}

/// Resolver for trees without symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymlinks;

impl SymlinkResolver for NoSymlinks {
    fn resolve_aliases(&self, _entries: &[Entry]) -> Result<Vec<Entry>> {
        Ok(Vec::new())
    }
}

/// A symlink inside the tree, both paths relative to the tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symlink {
    pub from: String,
    pub to: String,
}

/// Finds symlinks by walking a working tree.
#[derive(Debug, Clone)]
pub struct FsSymlinkResolver {
    root: PathBuf,
}

impl FsSymlinkResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Every symlink under the root pointing inside the root, in path order.
    ///
    /// `.git` is not descended into and links are not followed. A link whose
    /// target cannot be resolved is an error.
    pub fn find_symlinks(&self) -> Result<Vec<Symlink>> {
        let root = self.root.canonicalize().map_err(|e| {
            DiscoveryError::Symlink(format!("{}: {}", self.root.display(), e))
        })?;

        let mut links = Vec::new();
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| DiscoveryError::Symlink(e.to_string()))?;
            if !entry.path_is_symlink() {
                continue;
            }

            let target = entry.path().canonicalize().map_err(|e| {
                DiscoveryError::Symlink(format!(
                    "{}: cannot evaluate symlink: {}",
                    entry.path().display(),
                    e
                ))
            })?;

            let (Some(from), Some(to)) = (relative(&root, entry.path()), relative(&root, &target))
            else {
                tracing::debug!(
                    link = %entry.path().display(),
                    target = %target.display(),
                    "ignoring symlink pointing outside of the tree"
                );
                continue;
            };

            links.push(Symlink { from, to });
        }

        Ok(links)
    }
}

impl SymlinkResolver for FsSymlinkResolver {
    fn resolve_aliases(&self, entries: &[Entry]) -> Result<Vec<Entry>> {
        let links = self.find_symlinks()?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let mut aliases = Vec::new();
        for entry in entries {
            if entry.state == ChangeState::Removed || entry.path_error.is_some() {
                continue;
            }
            for link in links.iter().filter(|l| l.to == entry.source_path) {
                let mut alias = entry.clone();
                alias.reported_path = link.from.clone();
                aliases.push(alias);
            }
        }

        Ok(aliases)
    }
}

/// `path` relative to `root` with forward slashes.
fn relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(normalize_path(&rel.to_string_lossy()))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::rules::{LineRange, Rule, RuleKind};
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn entry(path: &str, state: ChangeState) -> Entry {
        let rule = Rule::new("up", RuleKind::Recording, LineRange::new(1, 2), Default::default());
        let mut e = Entry::new(path, path, rule);
        e.state = state;
        e
    }

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("rules")).unwrap();
        std::fs::create_dir_all(dir.path().join("linked")).unwrap();
        std::fs::write(dir.path().join("rules/real.yml"), "groups: []\n").unwrap();
        symlink("../rules/real.yml", dir.path().join("linked/b.yml")).unwrap();
        symlink("real.yml", dir.path().join("rules/a.yml")).unwrap();
        dir
    }

    #[test]
    fn test_find_symlinks_sorted_and_relative() {
        let dir = tree();
        let links = FsSymlinkResolver::new(dir.path()).find_symlinks().unwrap();

        assert_eq!(
            links,
            vec![
                Symlink {
                    from: "linked/b.yml".to_string(),
                    to: "rules/real.yml".to_string(),
                },
                Symlink {
                    from: "rules/a.yml".to_string(),
                    to: "rules/real.yml".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_aliases_copy_entry_with_link_path() {
        let dir = tree();
        let resolver = FsSymlinkResolver::new(dir.path());
        let original = entry("rules/real.yml", ChangeState::Modified);

        let aliases = resolver.resolve_aliases(&[original.clone()]).unwrap();

        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases[0].reported_path, "linked/b.yml");
        assert_eq!(aliases[1].reported_path, "rules/a.yml");
        for alias in &aliases {
            assert_eq!(alias.source_path, "rules/real.yml");
            assert_eq!(alias.state, ChangeState::Modified);
            assert_eq!(alias.modified_lines, original.modified_lines);
            assert_eq!(alias.rule, original.rule);
        }
    }

    #[test]
    fn test_removed_and_broken_entries_get_no_alias() {
        let dir = tree();
        let resolver = FsSymlinkResolver::new(dir.path());
        let removed = entry("rules/real.yml", ChangeState::Removed);
        let broken = entry("rules/real.yml", ChangeState::Added).with_path_error("gone");
        let other = entry("rules/other.yml", ChangeState::Added);

        let aliases = resolver.resolve_aliases(&[removed, broken, other]).unwrap();
        assert!(aliases.is_empty());
    }

    #[test]
    fn test_dangling_symlink_is_error() {
        let dir = TempDir::new().unwrap();
        symlink("missing.yml", dir.path().join("dangling.yml")).unwrap();

        let err = FsSymlinkResolver::new(dir.path())
            .find_symlinks()
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Symlink(_)));
        assert!(err.to_string().contains("dangling.yml"));
    }

    #[test]
    fn test_git_directory_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        symlink("missing", dir.path().join(".git/dangling")).unwrap();

        let links = FsSymlinkResolver::new(dir.path()).find_symlinks().unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_no_symlinks_resolver() {
        let aliases = NoSymlinks
            .resolve_aliases(&[entry("rules/real.yml", ChangeState::Added)])
            .unwrap();
        assert!(aliases.is_empty());
    }
}
