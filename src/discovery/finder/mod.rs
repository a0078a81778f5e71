//! Rule discovery over the commits of the current branch.
//!
//! [`GitBranchFinder::find`] runs the whole pipeline:
//! 1. Resolve commits between the base branch and HEAD, enforce `max_commits`
//! 2. List changed files with both bodies
//! 3. Stop early when any touching commit carries a skip marker
//! 4. Parse both sides of every allowed file, pair and classify the rules
//! 5. Add symlink aliases for the classified rules

use super::classify::classify;
use super::entry::Entry;
use super::filter::{PathFilter, PatternList};
use super::matcher::pair_entries;
use super::symlinks::SymlinkResolver;
use crate::config::Config;
use crate::error::{DiscoveryError, Result};
use crate::events::{DiscoveryEvent, EventSink};
use crate::git::{self, CommandRunner, FileChange};
use crate::rules::RuleParser;


/// Commit message markers that disable checks for the whole branch.
pub const SKIP_MARKERS: [&str; 2] = ["[skip ci]", "[no ci]"];

/// Finds changed rules between a base branch and HEAD.
pub struct GitBranchFinder<'a> {
    runner: &'a dyn CommandRunner,
    parser: &'a dyn RuleParser,
    resolver: &'a dyn SymlinkResolver,
    sink: &'a dyn EventSink,
    base_branch: String,
    max_commits: usize,
    filter: PathFilter,
    relaxed: PatternList,
}

impl<'a> GitBranchFinder<'a> {
    /// Build a finder from its collaborators and an already validated config.
    ///
    /// Fails with [`DiscoveryError::Config`] when a pattern does not compile.
    pub fn new(
        runner: &'a dyn CommandRunner,
        parser: &'a dyn RuleParser,
        resolver: &'a dyn SymlinkResolver,
        sink: &'a dyn EventSink,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            runner,
            parser,
            resolver,
            sink,
            base_branch: config.base_branch.clone(),
            max_commits: config.max_commits,
            filter: config.path_filter()?,
            relaxed: config.relaxed_patterns()?,
        })
    }

    /// Classify every rule touched on the current branch.
    ///
    /// Returns an empty list when a commit carries a skip marker. Any error
    /// aborts the run without partial results.
    pub fn find(&self) -> Result<Vec<Entry>> {
        self.sink.emit(&DiscoveryEvent::Started {
            base_branch: self.base_branch.clone(),
        });

        let range = git::commit_range(self.runner, &self.base_branch)
            .map_err(|e| DiscoveryError::CommitRange(e.to_string()))?;
        self.sink.emit(&DiscoveryEvent::CommitRangeResolved {
            from: range.from.clone(),
            to: range.to.clone(),
            commits: range.commits.len(),
        });

        if range.commits.len() > self.max_commits {
            return Err(DiscoveryError::CommitVolumeExceeded {
                commits: range.commits.len(),
                max: self.max_commits,
            });
        }

        let changes = git::changes(self.runner, &range).map_err(|e| match e {
            DiscoveryError::ChangeList(_) => e,
            other => DiscoveryError::ChangeList(other.to_string()),
        })?;

        if let Some((commit, marker)) = self.find_skip_marker(&changes)? {
            self.sink
                .emit(&DiscoveryEvent::SkipMarkerFound { commit, marker });
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for change in &changes {
            if !self.filter.is_allowed(&change.after.name) {
                self.sink.emit(&DiscoveryEvent::FileSkipped {
                    path: change.after.name.clone(),
                });
                continue;
            }

            let before = self.parse_before(change);
            let after = self.parser.parse(
                change.after.effective_path(),
                &change.after.name,
                &change.body_after,
                true,
            )?;

            entries.extend(
                pair_entries(before, after)
                    .into_iter()
                    .filter_map(|pair| classify(pair, change, self.sink)),
            );
        }

        let aliases = self.resolver.resolve_aliases(&entries).map_err(|e| match e {
            DiscoveryError::Symlink(_) => e,
            other => DiscoveryError::Symlink(other.to_string()),
        })?;
        for alias in aliases {
            if !self.filter.is_allowed(&alias.reported_path) {
                continue;
            }
            self.sink.emit(&DiscoveryEvent::AliasAdded {
                path: alias.reported_path.clone(),
                target: alias.source_path.clone(),
            });
            entries.push(alias);
        }

        Ok(entries)
    }

    /// First commit, in first-seen order, whose message has a skip marker.
    fn find_skip_marker(&self, changes: &[FileChange]) -> Result<Option<(String, String)>> {
        let mut seen: Vec<&str> = Vec::new();
        for commit in changes.iter().flat_map(|c| c.commits.iter()) {
            if seen.contains(&commit.as_str()) {
                continue;
            }
            seen.push(commit);

            let message = git::commit_message(self.runner, commit).map_err(|e| {
                DiscoveryError::CommitMessage {
                    commit: commit.clone(),
                    message: e.to_string(),
                }
            })?;

            if let Some(marker) = SKIP_MARKERS.iter().find(|m| message.contains(*m)) {
                return Ok(Some((commit.clone(), marker.to_string())));
            }
        }
        Ok(None)
    }

    /// Rules on the base branch side. Parse errors leave no rules.
    fn parse_before(&self, change: &FileChange) -> Vec<Entry> {
        let strict = !self.relaxed.matches_any(&change.before.name);
        match self.parser.parse(
            change.before.effective_path(),
            &change.before.name,
            &change.body_before,
            strict,
        ) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(path = %change.before.name, error = %e, "ignoring unparsable base branch version");
                Vec::new()
            }
        }
    }
}
