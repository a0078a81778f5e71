//! Final state and reported lines for paired entries.

use super::entry::{ChangeState, Entry};
use super::lines::{count_lines, intersect};
use super::matcher::PairResult;
use crate::events::{DiscoveryEvent, EventSink};
use crate::git::FileChange;

/// Assign a state to one pairing and narrow its reported lines.
///
/// | before | after | identical | moved | state    | lines                          |
/// |--------|-------|-----------|-------|----------|--------------------------------|
/// | no     | yes   |           |       | Added    | diff lines within the rule     |
/// | yes    | yes   | yes       | no    | Excluded | none                           |
/// | yes    | yes   | yes       | yes   | Moved    | every line of the new file     |
/// | yes    | yes   | no        |       | Modified | diff lines within the rule     |
/// | yes    | no    |           |       | Removed  | unchanged                      |
///
/// A pairing with neither side is reported to `sink` and yields no entry.
pub fn classify(pair: PairResult, change: &FileChange, sink: &dyn EventSink) -> Option<Entry> {
    let PairResult {
        before,
        after,
        is_identical,
        was_moved,
    } = pair;

    let entry = match (before, after) {
        (None, Some(mut after)) => {
            after.state = ChangeState::Added;
            after.modified_lines = intersect(&change.modified_lines, &after.modified_lines);
            after
        }
        (Some(_), Some(mut after)) => {
            if is_identical && !was_moved {
                after.state = ChangeState::Excluded;
                after.modified_lines = Vec::new();
            } else if was_moved {
                after.state = ChangeState::Moved;
                after.modified_lines = count_lines(&change.body_after);
            } else {
                after.state = ChangeState::Modified;
                after.modified_lines = intersect(&change.modified_lines, &after.modified_lines);
            }
            after
        }
        (Some(mut before), None) => {
            before.state = ChangeState::Removed;
            before
        }
        (None, None) => {
            sink.emit(&DiscoveryEvent::UnknownPairing {
                path: change.after.name.clone(),
            });
            return None;
        }
    };

    sink.emit(&DiscoveryEvent::classified(&entry));
    Some(entry)
}
