//! Exit code constants for the rulediff CLI.
//!
//! - 0: Success (including runs suppressed by a skip marker)
//! - 1: User error (bad args, invalid config, commit volume exceeded)
//! - 2: A changed rule file has invalid syntax
//! - 3: Git operation failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or a guard tripped.
pub const USER_ERROR: i32 = 1;

/// A changed file could not be parsed on the current branch.
pub const SYNTAX_FAILURE: i32 = 2;

/// Git operation failure: commit range, change list, or commit message lookup.
pub const GIT_FAILURE: i32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, SYNTAX_FAILURE, GIT_FAILURE];
        let unique: std::collections::BTreeSet<i32> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
