//! Implementation of the `rulediff discover` command.
//!
//! Resolves the repository and configuration, runs discovery and prints a
//! report of every rule touched on the current branch.

use super::working_dir;
use crate::cli::{DiscoverArgs, OutputFormat};
use crate::config::Config;
use crate::discovery::lines::format_lines;
use crate::discovery::{ChangeState, Entry, FsSymlinkResolver, GitBranchFinder};
use crate::error::{DiscoveryError, Result};
use crate::events::{EventSink, FanOutSink, JsonLinesSink, TracingSink};
use crate::git::{GitCli, get_repo_root};
use crate::rules::YamlRuleParser;
use std::fs::OpenOptions;
use std::io::BufWriter;

/// Report order of states in the summary line.
const SUMMARY_ORDER: [ChangeState; 5] = [
    ChangeState::Added,
    ChangeState::Modified,
    ChangeState::Moved,
    ChangeState::Removed,
    ChangeState::Excluded,
];

/// Execute the `rulediff discover` command.
pub fn cmd_discover(args: DiscoverArgs) -> Result<()> {
    let format = args.format;
    let entries = run_discover(&args)?;

    let report = match format {
        OutputFormat::Text => render_text(&entries),
        OutputFormat::Json => render_json(&entries)?,
    };
    print!("{}", report);
    Ok(())
}

/// Run discovery for `args` and return the classified entries.
pub fn run_discover(args: &DiscoverArgs) -> Result<Vec<Entry>> {
    let cwd = working_dir(args.repo.as_deref())?;
    let root = get_repo_root(&cwd)?;

    let mut config = Config::discover(args.config.as_deref(), &root)?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let runner = GitCli::new(&root);
    let resolver = FsSymlinkResolver::new(&root);
    let tracing_sink = TracingSink;

    let Some(events_path) = &args.events else {
        return find(&runner, &resolver, &tracing_sink, &config);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(events_path)
        .map_err(|e| {
            DiscoveryError::Config(format!(
                "failed to open events file '{}': {}",
                events_path.display(),
                e
            ))
        })?;
    let json_sink = JsonLinesSink::new(BufWriter::new(file));
    let sinks: Vec<&dyn EventSink> = vec![&tracing_sink, &json_sink];
    let sink = FanOutSink::new(sinks);
    find(&runner, &resolver, &sink, &config)
}

fn find(
    runner: &GitCli,
    resolver: &FsSymlinkResolver,
    sink: &dyn EventSink,
    config: &Config,
) -> Result<Vec<Entry>> {
    GitBranchFinder::new(runner, &YamlRuleParser, resolver, sink, config)?.find()
}

/// Apply command line flags on top of file configuration.
///
/// Scalar flags replace file values; a repeated list flag replaces the
/// whole list from the file.
pub fn apply_overrides(config: &mut Config, args: &DiscoverArgs) {
    if let Some(base_branch) = &args.base_branch {
        config.base_branch = base_branch.clone();
    }
    if let Some(max_commits) = args.max_commits {
        config.max_commits = max_commits;
    }
    if !args.include.is_empty() {
        config.include = args.include.clone();
    }
    if !args.exclude.is_empty() {
        config.exclude = args.exclude.clone();
    }
    if !args.relaxed.is_empty() {
        config.relaxed = args.relaxed.clone();
    }
}

/// Human readable report, one line per entry plus a summary.
pub fn render_text(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No rules to check.\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let lines = if entry.modified_lines.is_empty() {
            "-".to_string()
        } else {
            format_lines(&entry.modified_lines)
        };
        let name = match entry.rule.name() {
            "" => "<anonymous>",
            name => name,
        };
        out.push_str(&format!(
            "{:<9} {}:{} {} {}\n",
            entry.state.to_string(),
            entry.reported_path,
            lines,
            entry.rule.kind(),
            name
        ));
    }

    let counts: Vec<String> = SUMMARY_ORDER
        .iter()
        .filter_map(|state| {
            let count = entries.iter().filter(|e| e.state == *state).count();
            (count > 0).then(|| format!("{} {}", count, state))
        })
        .collect();
    out.push_str(&format!(
        "\n{} rule(s): {}\n",
        entries.len(),
        counts.join(", ")
    ));

    out
}

/// JSON array of entries.
pub fn render_json(entries: &[Entry]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(entries)
        .map_err(|e| DiscoveryError::Config(format!("failed to serialize report: {}", e)))?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{LineRange, Rule, RuleKind};
    use crate::test_support::{commit_files, create_test_repo, git};
    use std::path::PathBuf;

    fn args() -> DiscoverArgs {
        DiscoverArgs {
            base_branch: None,
            max_commits: None,
            include: Vec::new(),
            exclude: Vec::new(),
            relaxed: Vec::new(),
            config: None,
            format: OutputFormat::Text,
            repo: None,
            events: None,
        }
    }

    fn entry(name: &str, state: ChangeState, lines: Vec<usize>) -> Entry {
        let rule = Rule::new(name, RuleKind::Alerting, LineRange::new(4, 6), Default::default());
        let mut entry = Entry::new("rules/a.yml", "rules/a.yml", rule);
        entry.state = state;
        entry.modified_lines = lines;
        entry
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config {
            include: vec!["from-file".to_string()],
            exclude: vec!["kept".to_string()],
            ..Config::default()
        };
        let args = DiscoverArgs {
            base_branch: Some("develop".to_string()),
            max_commits: Some(3),
            include: vec!["rules/.*".to_string()],
            ..args()
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.base_branch, "develop");
        assert_eq!(config.max_commits, 3);
        assert_eq!(config.include, vec!["rules/.*"]);
        assert_eq!(config.exclude, vec!["kept"]);
    }

    #[test]
    fn test_render_text_empty() {
        assert_eq!(render_text(&[]), "No rules to check.\n");
    }

    #[test]
    fn test_render_text_lines_and_summary() {
        let entries = vec![
            entry("Down", ChangeState::Modified, vec![5, 6]),
            entry("Up", ChangeState::Excluded, Vec::new()),
            entry("", ChangeState::Added, vec![4]),
        ];

        let report = render_text(&entries);

        assert!(report.contains("modified  rules/a.yml:5-6 alerting Down\n"));
        assert!(report.contains("excluded  rules/a.yml:- alerting Up\n"));
        assert!(report.contains("added     rules/a.yml:4 alerting <anonymous>\n"));
        assert!(report.ends_with("3 rule(s): 1 added, 1 modified, 1 excluded\n"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&[entry("Down", ChangeState::Added, vec![5])]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["state"], "added");
        assert_eq!(value[0]["reported_path"], "rules/a.yml");
        assert_eq!(value[0]["rule"]["name"], "Down");
        assert_eq!(value[0]["rule"]["kind"], "alerting");
        assert_eq!(value[0]["modified_lines"], serde_json::json!([5]));
    }

    #[test]
    fn test_run_discover_in_repository() {
        let repo = create_test_repo();
        let path = repo.path();
        git(path, &["checkout", "-b", "feature"]);
        commit_files(
            path,
            &[(
                "rules/a.yml",
                "groups:\n- name: g\n  rules:\n  - alert: Down\n    expr: up == 0\n",
            )],
            "Add rule",
        );
        let events = path.join("events.ndjson");

        let args = DiscoverArgs {
            repo: Some(PathBuf::from(path)),
            events: Some(events.clone()),
            ..args()
        };
        let entries = run_discover(&args).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].state, ChangeState::Added);
        assert_eq!(entries[0].modified_lines, vec![4, 5]);

        let log = std::fs::read_to_string(events).unwrap();
        assert!(log.lines().any(|l| l.contains("\"event\":\"entry_classified\"")));
    }

    #[test]
    fn test_run_discover_flag_validation() {
        let repo = create_test_repo();
        let args = DiscoverArgs {
            repo: Some(PathBuf::from(repo.path())),
            max_commits: Some(0),
            ..args()
        };

        let err = run_discover(&args).unwrap_err();
        assert!(matches!(err, DiscoveryError::Config(_)));
    }
}
