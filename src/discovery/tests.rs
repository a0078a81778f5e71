//! Tests for line helpers, entry pairing and classification.

use super::lines::{count_lines, format_lines, intersect};
use super::*;
use crate::events::{DiscoveryEvent, MemorySink};
use crate::git::{FileChange, PathInfo};
use crate::rules::{LineRange, Rule, RuleKind};

fn entry(path: &str, name: &str, kind: RuleKind, lines: (usize, usize), body: &str) -> Entry {
    let body: serde_yaml::Value = serde_yaml::from_str(body).unwrap();
    let rule = Rule::new(name, kind, LineRange::new(lines.0, lines.1), body);
    Entry::new(path, path, rule)
}

fn alert(path: &str, name: &str, lines: (usize, usize), expr: &str) -> Entry {
    entry(
        path,
        name,
        RuleKind::Alerting,
        lines,
        &format!("alert: {name}\nexpr: {expr}\n"),
    )
}

fn change(path: &str, body_after: &str, modified_lines: Vec<usize>) -> FileChange {
    FileChange {
        before: PathInfo::new(path),
        after: PathInfo::new(path),
        body_before: Vec::new(),
        body_after: body_after.as_bytes().to_vec(),
        modified_lines,
        commits: vec!["c1".to_string()],
    }
}

fn names(results: &[PairResult]) -> Vec<(Option<String>, Option<String>)> {
    results
        .iter()
        .map(|r| {
            (
                r.before.as_ref().map(|e| e.rule.body()["expr"].as_str().unwrap_or("").to_string()),
                r.after.as_ref().map(|e| e.rule.body()["expr"].as_str().unwrap_or("").to_string()),
            )
        })
        .collect()
}

// =========================================================================
// Line helpers
// =========================================================================

#[test]
fn test_intersect_keeps_first_order_without_duplicates() {
    assert_eq!(intersect(&[3, 3, 1], &[1, 3]), vec![3, 1]);
    assert_eq!(intersect(&[2], &[2, 2]), vec![2]);
    assert!(intersect(&[1, 2], &[]).is_empty());
    assert!(intersect(&[], &[]).is_empty());
}

#[test]
fn test_count_lines() {
    assert!(count_lines(b"").is_empty());
    assert_eq!(count_lines(b"a"), vec![1]);
    assert_eq!(count_lines(b"a\nb\n"), vec![1, 2]);
    assert_eq!(count_lines(b"a\n\nb"), vec![1, 2, 3]);
}

#[test]
fn test_format_lines() {
    assert_eq!(format_lines(&[7, 1, 2, 3]), "1-3,7");
    assert_eq!(format_lines(&[5]), "5");
    assert_eq!(format_lines(&[2, 2, 4, 5]), "2,4-5");
    assert_eq!(format_lines(&[]), "");
}

// =========================================================================
// Name/kind partition
// =========================================================================

#[test]
fn test_partition_preserves_order() {
    let entries = vec![
        alert("a.yml", "A", (1, 2), "one"),
        alert("a.yml", "B", (3, 4), "two"),
        alert("a.yml", "A", (5, 6), "three"),
    ];

    let (rest, matched) = partition_by_name_kind(entries, "A", RuleKind::Alerting);

    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].rule.name(), "B");
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].rule.lines(), LineRange::new(1, 2));
    assert_eq!(matched[1].rule.lines(), LineRange::new(5, 6));
}

#[test]
fn test_partition_requires_same_kind() {
    let entries = vec![entry(
        "a.yml",
        "A",
        RuleKind::Recording,
        (1, 2),
        "record: A\nexpr: up\n",
    )];

    let (rest, matched) = partition_by_name_kind(entries, "A", RuleKind::Alerting);
    assert_eq!(rest.len(), 1);
    assert!(matched.is_empty());
}

#[test]
fn test_partition_skips_entries_with_path_error() {
    let entries = vec![alert("a.yml", "A", (1, 2), "one").with_path_error("unresolvable")];

    let (rest, matched) = partition_by_name_kind(entries, "A", RuleKind::Alerting);
    assert_eq!(rest.len(), 1);
    assert!(matched.is_empty());
}

// =========================================================================
// Pairing
// =========================================================================

#[test]
fn test_identity_pass_across_files_is_move() {
    let before = vec![alert("old.yml", "A", (1, 2), "up == 0")];
    let after = vec![alert("new.yml", "A", (10, 11), "up == 0")];

    let results = pair_entries(before, after);

    assert_eq!(results.len(), 1);
    assert!(results[0].is_identical);
    assert!(results[0].was_moved);
    assert!(results[0].has_before() && results[0].has_after());
}

#[test]
fn test_identity_pass_same_file_is_not_move() {
    let before = vec![alert("a.yml", "A", (1, 2), "up == 0")];
    let after = vec![alert("a.yml", "A", (5, 6), "up == 0")];

    let results = pair_entries(before, after);

    assert!(results[0].is_identical);
    assert!(!results[0].was_moved);
}

#[test]
fn test_identity_pass_wins_over_name_pass() {
    let before = vec![
        alert("a.yml", "A", (1, 2), "changed"),
        alert("a.yml", "A", (3, 4), "same"),
    ];
    let after = vec![alert("a.yml", "A", (1, 2), "same")];

    let results = pair_entries(before, after);

    assert_eq!(
        names(&results),
        vec![
            (Some("same".to_string()), Some("same".to_string())),
            (Some("changed".to_string()), None),
        ]
    );
    assert!(results[0].is_identical);
}

#[test]
fn test_single_name_match_pairs_as_modified() {
    let before = vec![alert("a.yml", "A", (1, 2), "up == 0")];
    let after = vec![alert("a.yml", "A", (1, 2), "up == 1")];

    let results = pair_entries(before, after);

    assert_eq!(results.len(), 1);
    assert!(!results[0].is_identical);
    assert!(!results[0].was_moved);
    assert!(results[0].has_before());
}

#[test]
fn test_ambiguous_name_match_consumes_nothing() {
    let before = vec![
        alert("a.yml", "A", (1, 2), "first"),
        alert("a.yml", "B", (3, 4), "other"),
        alert("a.yml", "A", (5, 6), "second"),
    ];
    let after = vec![alert("a.yml", "A", (1, 2), "third")];

    let results = pair_entries(before, after);

    // Candidates go back to the end of the pool, after non-matching entries.
    assert_eq!(
        names(&results),
        vec![
            (None, Some("third".to_string())),
            (Some("other".to_string()), None),
            (Some("first".to_string()), None),
            (Some("second".to_string()), None),
        ]
    );
}

#[test]
fn test_ambiguous_candidates_stay_available() {
    let before = vec![
        alert("a.yml", "A", (1, 2), "first"),
        alert("a.yml", "A", (3, 4), "second"),
    ];
    let after = vec![
        alert("a.yml", "A", (1, 2), "third"),
        alert("a.yml", "A", (3, 4), "first"),
    ];

    let results = pair_entries(before, after);

    assert_eq!(
        names(&results),
        vec![
            (None, Some("third".to_string())),
            (Some("first".to_string()), Some("first".to_string())),
            (Some("second".to_string()), None),
        ]
    );
}

#[test]
fn test_anonymous_rules_never_identity_paired() {
    let before = vec![entry("a.yml", "", RuleKind::Invalid, (1, 1), "foo: bar\n")];
    let after = vec![entry("a.yml", "", RuleKind::Invalid, (1, 1), "foo: bar\n")];

    let results = pair_entries(before, after);

    assert_eq!(results.len(), 1);
    assert!(!results[0].is_identical);
    assert!(results[0].has_before());
}

#[test]
fn test_path_error_entries_are_not_name_matched() {
    let before = vec![alert("a.yml", "A", (1, 2), "old").with_path_error("gone")];
    let after = vec![alert("a.yml", "A", (1, 2), "new")];

    let results = pair_entries(before, after);

    assert_eq!(
        names(&results),
        vec![
            (None, Some("new".to_string())),
            (Some("old".to_string()), None),
        ]
    );
}

#[test]
fn test_pairing_is_idempotent() {
    let make = || {
        (
            vec![
                alert("a.yml", "A", (1, 2), "x"),
                alert("a.yml", "A", (3, 4), "y"),
                alert("a.yml", "B", (5, 6), "z"),
            ],
            vec![
                alert("a.yml", "B", (1, 2), "z2"),
                alert("a.yml", "A", (3, 4), "y"),
            ],
        )
    };

    let (b1, a1) = make();
    let (b2, a2) = make();
    assert_eq!(pair_entries(b1, a1), pair_entries(b2, a2));
}

// =========================================================================
// Classification
// =========================================================================

const BODY: &str = "groups:\n- name: g\n  rules:\n  - alert: A\n    expr: up == 0\n";

#[test]
fn test_classify_added_intersects_lines() {
    let sink = MemorySink::new();
    let pair = PairResult {
        after: Some(alert("a.yml", "A", (4, 5), "up == 0")),
        ..Default::default()
    };

    let entry = classify(pair, &change("a.yml", BODY, vec![1, 5, 9]), &sink).unwrap();

    assert_eq!(entry.state, ChangeState::Added);
    assert_eq!(entry.modified_lines, vec![5]);
    assert!(matches!(
        sink.events()[0],
        DiscoveryEvent::EntryClassified {
            state: ChangeState::Added,
            ..
        }
    ));
}

#[test]
fn test_classify_excluded_has_no_lines() {
    let sink = MemorySink::new();
    let pair = PairResult {
        before: Some(alert("a.yml", "A", (4, 5), "up == 0")),
        after: Some(alert("a.yml", "A", (4, 5), "up == 0")),
        is_identical: true,
        was_moved: false,
    };

    let entry = classify(pair, &change("a.yml", BODY, vec![4, 5]), &sink).unwrap();

    assert_eq!(entry.state, ChangeState::Excluded);
    assert!(entry.modified_lines.is_empty());
}

#[test]
fn test_classify_moved_reports_whole_file() {
    let sink = MemorySink::new();
    let pair = PairResult {
        before: Some(alert("old.yml", "A", (4, 5), "up == 0")),
        after: Some(alert("a.yml", "A", (4, 5), "up == 0")),
        is_identical: true,
        was_moved: true,
    };

    let entry = classify(pair, &change("a.yml", BODY, Vec::new()), &sink).unwrap();

    assert_eq!(entry.state, ChangeState::Moved);
    assert_eq!(entry.modified_lines, count_lines(BODY.as_bytes()));
    assert_eq!(entry.modified_lines, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_classify_modified_is_subset_of_rule_and_diff() {
    let sink = MemorySink::new();
    let file_lines = vec![2, 5, 6, 7];
    let pair = PairResult {
        before: Some(alert("a.yml", "A", (4, 6), "up == 0")),
        after: Some(alert("a.yml", "A", (4, 6), "up == 1")),
        ..Default::default()
    };

    let entry = classify(pair, &change("a.yml", BODY, file_lines.clone()), &sink).unwrap();

    assert_eq!(entry.state, ChangeState::Modified);
    assert_eq!(entry.modified_lines, vec![5, 6]);
    let rule_lines = entry.rule.lines();
    assert!(
        entry
            .modified_lines
            .iter()
            .all(|l| rule_lines.contains(*l) && file_lines.contains(l))
    );
}

#[test]
fn test_classify_removed_keeps_lines() {
    let sink = MemorySink::new();
    let pair = PairResult {
        before: Some(alert("a.yml", "A", (4, 5), "up == 0")),
        ..Default::default()
    };

    let entry = classify(pair, &change("a.yml", "", Vec::new()), &sink).unwrap();

    assert_eq!(entry.state, ChangeState::Removed);
    assert_eq!(entry.modified_lines, vec![4, 5]);
}

#[test]
fn test_classify_empty_pair_reports_unknown() {
    let sink = MemorySink::new();

    let entry = classify(PairResult::default(), &change("a.yml", BODY, vec![1]), &sink);

    assert!(entry.is_none());
    assert_eq!(
        sink.events(),
        vec![DiscoveryEvent::UnknownPairing {
            path: "a.yml".to_string(),
        }]
    );
}
