//! Pairing of "before" and "after" rule entries of one file change.
//!
//! Pairing runs two passes per "after" entry against a shrinking pool of
//! "before" entries:
//! 1. Identity pass: first pool entry with identical content (named rules only)
//! 2. Name pass: the single pool entry with the same name and kind
//!
//! Ambiguous name matches consume nothing, so every candidate stays in the
//! pool and is reported as removed unless a later entry claims it.

use super::entry::Entry;
use crate::rules::RuleKind;

/// Outcome of pairing for one rule.
///
/// At least one of `before`/`after` is always set by [`pair_entries`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairResult {
    pub before: Option<Entry>,
    pub after: Option<Entry>,
    /// Paired by the identity pass.
    pub is_identical: bool,
    /// Paired by the identity pass across different source paths.
    pub was_moved: bool,
}

impl PairResult {
    pub fn has_before(&self) -> bool {
        self.before.is_some()
    }

    pub fn has_after(&self) -> bool {
        self.after.is_some()
    }
}

/// Split `entries` into `(rest, matched)`.
///
/// An entry matches when its path resolved and its rule has the given name
/// and kind. Relative order is preserved on both sides.
pub fn partition_by_name_kind(
    entries: Vec<Entry>,
    name: &str,
    kind: RuleKind,
) -> (Vec<Entry>, Vec<Entry>) {
    let mut rest = Vec::with_capacity(entries.len());
    let mut matched = Vec::new();

    for entry in entries {
        if entry.path_error.is_none() && entry.rule.kind() == kind && entry.rule.name() == name {
            matched.push(entry);
        } else {
            rest.push(entry);
        }
    }

    (rest, matched)
}

/// Pair rules from before and after a change.
///
/// Results for `after` come first in `after` order, followed by unpaired
/// `before` entries in pool order.
pub fn pair_entries(before: Vec<Entry>, after: Vec<Entry>) -> Vec<PairResult> {
    let mut pool = before;
    let mut results = Vec::with_capacity(after.len() + pool.len());

    for a in after {
        let mut pair = PairResult::default();

        let identical_at = if a.rule.name().is_empty() {
            None
        } else {
            pool.iter().position(|b| a.rule.is_identical(&b.rule))
        };

        if let Some(idx) = identical_at {
            let b = pool.remove(idx);
            pair.is_identical = true;
            pair.was_moved = a.source_path != b.source_path;
            pair.before = Some(b);
        } else {
            let (rest, mut matched) =
                partition_by_name_kind(std::mem::take(&mut pool), a.rule.name(), a.rule.kind());
            pool = rest;

            match matched.len() {
                0 => {}
                1 => pair.before = matched.pop(),
                // Ambiguous, put every candidate back.
                _ => pool.append(&mut matched),
            }
        }

        pair.after = Some(a);
        results.push(pair);
    }

    results.extend(pool.into_iter().map(|b| PairResult {
        before: Some(b),
        ..Default::default()
    }));

    results
}
