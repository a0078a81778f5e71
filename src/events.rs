//! Discovery event reporting.
//!
//! The discovery pipeline reports what it does through a single [`EventSink`]
//! instead of logging directly, so callers decide where events go:
//! - [`TracingSink`] turns events into `tracing` log records
//! - [`JsonLinesSink`] appends NDJSON records (one JSON object per line)
//! - [`MemorySink`] keeps events in memory
//!
//! # Event Format
//!
//! NDJSON records carry an `event` tag, an RFC3339 `ts` timestamp and the
//! event's own fields:
//!
//! ```text
//! {"event":"entry_classified","name":"InstanceDown","state":"added","path":"rules/a.yml","rule_lines":{"first":4,"last":8},"modified_lines":[5],"ts":"..."}
//! ```

use crate::discovery::{ChangeState, Entry};
use crate::rules::LineRange;
use crate::discovery::lines::format_lines;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::io::Write;

/// Something the discovery pipeline did or decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiscoveryEvent {
    /// Discovery started against the given base branch.
    Started { base_branch: String },
    /// Commits between the base branch and HEAD were resolved.
    CommitRangeResolved {
        from: String,
        to: String,
        commits: usize,
    },
    /// A commit message carries a skip marker, nothing will be checked.
    SkipMarkerFound { commit: String, marker: String },
    /// A changed file was left out by include/exclude patterns.
    FileSkipped { path: String },
    /// A rule received its final state.
    EntryClassified {
        name: String,
        state: ChangeState,
        path: String,
        rule_lines: LineRange,
        modified_lines: Vec<usize>,
    },
    /// A pairing had neither side set and produced no entry.
    UnknownPairing { path: String },
    /// A rule is also reachable through a symlink.
    AliasAdded { path: String, target: String },
}

impl DiscoveryEvent {
    /// Build an [`DiscoveryEvent::EntryClassified`] event for an entry.
    pub fn classified(entry: &Entry) -> Self {
        DiscoveryEvent::EntryClassified {
            name: entry.rule.name().to_string(),
            state: entry.state,
            path: entry.source_path.clone(),
            rule_lines: entry.rule.lines(),
            modified_lines: entry.modified_lines.clone(),
        }
    }

    /// Serialize the event to a single-line JSON string with a timestamp.
    pub fn to_ndjson_line(&self) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.insert("ts".to_string(), Value::String(Utc::now().to_rfc3339()));
        }
        serde_json::to_string(&value)
    }
}

/// Receiver of discovery events.
pub trait EventSink {
    fn emit(&self, event: &DiscoveryEvent);
}

/// Sink that forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &DiscoveryEvent) {
        match event {
            DiscoveryEvent::Started { base_branch } => {
                tracing::info!(base = %base_branch, "Finding all rules to check on current git branch");
            }
            DiscoveryEvent::CommitRangeResolved { from, to, commits } => {
                tracing::debug!(%from, %to, commits, "Got commit range from git");
            }
            DiscoveryEvent::SkipMarkerFound { commit, marker } => {
                tracing::info!(%commit, %marker, "Found a commit with a skip marker, skipping all checks");
            }
            DiscoveryEvent::FileSkipped { path } => {
                tracing::debug!(%path, "Skipping file due to include/exclude rules");
            }
            DiscoveryEvent::EntryClassified {
                name,
                state,
                path,
                rule_lines,
                modified_lines,
            } => {
                tracing::debug!(
                    %name,
                    %state,
                    %path,
                    rule_lines = %rule_lines,
                    modified_lines = %format_lines(modified_lines),
                    "Rule classified"
                );
            }
            DiscoveryEvent::UnknownPairing { path } => {
                tracing::warn!(%path, "Rule pairing has neither a before nor an after entry, ignoring");
            }
            DiscoveryEvent::AliasAdded { path, target } => {
                tracing::debug!(%path, %target, "Rule file is also reachable through a symlink");
            }
        }
    }
}

/// Sink that records events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<DiscoveryEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far.
    pub fn events(&self) -> Vec<DiscoveryEvent> {
        self.events.borrow().clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &DiscoveryEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Sink that appends one JSON object per event to a writer.
///
/// Write failures are logged and otherwise ignored, event output never
/// fails a discovery run.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&self, event: &DiscoveryEvent) {
        let line = match event.to_ndjson_line() {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize discovery event");
                return;
            }
        };
        let mut writer = self.writer.borrow_mut();
        if let Err(e) = writeln!(writer, "{}", line) {
            tracing::warn!(error = %e, "failed to write discovery event");
        }
    }
}

/// Sink that forwards every event to several sinks, in order.
pub struct FanOutSink<'a> {
    sinks: Vec<&'a dyn EventSink>,
}

impl<'a> FanOutSink<'a> {
    pub fn new(sinks: Vec<&'a dyn EventSink>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanOutSink<'_> {
    fn emit(&self, event: &DiscoveryEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
