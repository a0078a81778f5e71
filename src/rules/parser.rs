//! Rule file parsing.
//!
//! Rule bodies come from parsing the whole file with serde_yaml, so anchors
//! and block scalars behave as YAML defines them. serde_yaml does not expose
//! positions of nested values, so source line ranges come from an
//! indentation scan of every `rules:` key, matched to the parsed items in
//! order.

use super::rule::{LineRange, Rule, RuleKind};
use crate::discovery::Entry;
use serde::Deserialize;

/// Error returned when a rule file cannot be parsed in strict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Path of the file as shown to the user.
    pub path: String,
    /// 1-based line of the problem, when known.
    pub line: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.path, line, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Turns raw file content into rule entries.
pub trait RuleParser {
    /// Parse `content` read from `effective_path` (shown as `display_path`).
    ///
    /// With `strict == false` recoverable problems are swallowed and whatever
    /// could be parsed is returned. With `strict == true` any problem is an
    /// error.
    fn parse(
        &self,
        effective_path: &str,
        display_path: &str,
        content: &[u8],
        strict: bool,
    ) -> std::result::Result<Vec<Entry>, ParseError>;
}

/// Parser for Prometheus-style YAML rule files.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlRuleParser;

impl RuleParser for YamlRuleParser {
    fn parse(
        &self,
        effective_path: &str,
        display_path: &str,
        content: &[u8],
        strict: bool,
    ) -> std::result::Result<Vec<Entry>, ParseError> {
        let text = match std::str::from_utf8(content) {
            Ok(text) => text,
            Err(e) if strict => {
                return Err(ParseError {
                    path: display_path.to_string(),
                    line: None,
                    message: format!("file is not valid UTF-8: {}", e),
                });
            }
            Err(_) => return Ok(Vec::new()),
        };

        let lines: Vec<&str> = text.lines().collect();
        let scalar = block_scalar_lines(&lines);
        let groups = find_rule_groups(&lines, &scalar);
        let entry = |rule: Rule| Entry::new(effective_path, display_path, rule);

        match load_documents(text, display_path) {
            Ok(documents) => {
                let mut items = Vec::new();
                for document in &documents {
                    collect_rule_items(document, &mut items);
                }
                match locate_rules(&groups, items) {
                    Some(rules) => return Ok(rules.into_iter().map(entry).collect()),
                    None if strict => {
                        return Err(ParseError {
                            path: display_path.to_string(),
                            line: None,
                            message: "rule items could not be matched to source lines"
                                .to_string(),
                        });
                    }
                    None => {}
                }
            }
            Err(err) if strict => return Err(err),
            Err(_) => {}
        }

        // Lenient fallback: salvage whatever items parse on their own.
        let rules = groups
            .iter()
            .flat_map(|group| &group.blocks)
            .filter_map(|block| parse_block(&lines, &scalar, block).ok());
        Ok(rules.map(entry).collect())
    }
}

/// Parse every YAML document in the file.
fn load_documents(
    text: &str,
    display_path: &str,
) -> std::result::Result<Vec<serde_yaml::Value>, ParseError> {
    serde_yaml::Deserializer::from_str(text)
        .map(|document| {
            serde_yaml::Value::deserialize(document).map_err(|e| ParseError {
                path: display_path.to_string(),
                line: e.location().map(|loc| loc.line()),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Append one list per `rules` key, in document order.
///
/// A `rules` value that is not a sequence contributes an empty list and is
/// searched further; rule items themselves are not searched.
fn collect_rule_items(value: &serde_yaml::Value, out: &mut Vec<Vec<serde_yaml::Value>>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                if key.as_str() == Some("rules") {
                    if let serde_yaml::Value::Sequence(items) = value {
                        out.push(items.clone());
                        continue;
                    }
                    out.push(Vec::new());
                }
                collect_rule_items(value, out);
            }
        }
        serde_yaml::Value::Sequence(items) => {
            for item in items {
                collect_rule_items(item, out);
            }
        }
        serde_yaml::Value::Tagged(tagged) => collect_rule_items(&tagged.value, out),
        _ => {}
    }
}

/// Pair parsed rule items with scanned line ranges.
///
/// Items of a `rules:` key written inline (flow style or an alias) all get
/// the key's line. Returns `None` when the two views disagree.
fn locate_rules(groups: &[RuleGroup], items: Vec<Vec<serde_yaml::Value>>) -> Option<Vec<Rule>> {
    if groups.len() != items.len() {
        return None;
    }

    let mut rules = Vec::new();
    for (group, values) in groups.iter().zip(items) {
        if group.blocks.len() == values.len() {
            for (block, body) in group.blocks.iter().zip(values) {
                rules.push(rule_from_body(
                    body,
                    LineRange::new(block.start + 1, block.end + 1),
                ));
            }
        } else if group.blocks.is_empty() {
            let line = group.key_line + 1;
            for body in values {
                rules.push(rule_from_body(body, LineRange::new(line, line)));
            }
        } else {
            return None;
        }
    }
    Some(rules)
}

fn rule_from_body(body: serde_yaml::Value, lines: LineRange) -> Rule {
    let (kind, name) = match &body {
        serde_yaml::Value::Mapping(map) => {
            if let Some(alert) = map.get("alert") {
                (RuleKind::Alerting, alert.as_str().unwrap_or_default())
            } else if let Some(record) = map.get("record") {
                (RuleKind::Recording, record.as_str().unwrap_or_default())
            } else {
                (RuleKind::Invalid, "")
            }
        }
        _ => (RuleKind::Invalid, ""),
    };
    let name = name.to_string();

    Rule::new(name, kind, lines, body)
}

/// Zero-based line span of one rule item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RuleBlock {
    pub start: usize,
    pub end: usize,
    pub item_indent: usize,
}

/// Items found under one `rules:` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RuleGroup {
    /// Zero-based line of the key.
    pub key_line: usize,
    /// Empty when the value is written on the key's line.
    pub blocks: Vec<RuleBlock>,
}

/// Locate list items under `rules:` keys.
///
/// An item starts at a `- ` line and runs until the next line (ignoring
/// blanks and comments) indented at or below the item's dash. Lines marked
/// in `scalar` are block scalar content and always belong to the current
/// item.
pub(super) fn find_rule_groups(lines: &[&str], scalar: &[bool]) -> Vec<RuleGroup> {
    let mut groups = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let key = if scalar[i] { None } else { rules_key(lines[i]) };
        let Some(key) = key else {
            i += 1;
            continue;
        };
        let key_line = i;
        i += 1;

        let RulesKey::Block(key_indent) = key else {
            groups.push(RuleGroup {
                key_line,
                blocks: Vec::new(),
            });
            continue;
        };

        let mut blocks = Vec::new();
        let mut item_indent: Option<usize> = None;
        let mut current: Option<RuleBlock> = None;

        while i < lines.len() {
            let line = lines[i];
            if scalar[i] {
                if let Some(block) = current.as_mut() {
                    block.end = i;
                }
                i += 1;
                continue;
            }
            if is_blank_or_comment(line) {
                i += 1;
                continue;
            }

            let indent = indent_of(line);
            let is_item = is_list_item(&line[indent..]);

            match item_indent {
                None if is_item && indent >= key_indent => {
                    item_indent = Some(indent);
                    current = Some(RuleBlock {
                        start: i,
                        end: i,
                        item_indent: indent,
                    });
                }
                None => break,
                Some(dash) if indent > dash => {
                    if let Some(block) = current.as_mut() {
                        block.end = i;
                    }
                }
                Some(dash) if indent == dash && is_item => {
                    blocks.extend(current.take());
                    current = Some(RuleBlock {
                        start: i,
                        end: i,
                        item_indent: dash,
                    });
                }
                Some(_) => break,
            }
            i += 1;
        }

        blocks.extend(current);
        groups.push(RuleGroup { key_line, blocks });
        // The line that ended the list is looked at again by the outer loop,
        // it may open another `rules:` key.
    }

    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RulesKey {
    /// Items follow on the next lines; holds the lowest allowed item indent.
    Block(usize),
    /// The value sits on the key's line.
    Inline,
}

/// Recognize a `rules:` key, bare or as the first key of a list item.
fn rules_key(line: &str) -> Option<RulesKey> {
    let indent = indent_of(line);
    let mut rest = &line[indent..];
    let mut key_indent = indent;

    if let Some(after_dash) = rest.strip_prefix("- ") {
        let extra = indent_of(after_dash);
        key_indent = indent + 2 + extra;
        rest = &after_dash[extra..];
    }

    let after_key = ["rules:", "\"rules\":", "'rules':"]
        .iter()
        .find_map(|key| rest.strip_prefix(key))?;
    if !after_key.is_empty() && !after_key.starts_with([' ', '\t']) {
        return None;
    }

    let after_key = after_key.trim();
    if after_key.is_empty() || after_key.starts_with('#') {
        Some(RulesKey::Block(key_indent))
    } else {
        Some(RulesKey::Inline)
    }
}

/// Mark the content lines of block scalars (`key: |`, `key: >-`, `- |`).
///
/// Trailing blank lines of a scalar are left unmarked.
pub(super) fn block_scalar_lines(lines: &[&str]) -> Vec<bool> {
    let mut marked = vec![false; lines.len()];
    let mut i = 0;

    while i < lines.len() {
        let Some(parent) = block_scalar_parent(lines[i]) else {
            i += 1;
            continue;
        };

        let mut last = i;
        let mut j = i + 1;
        while j < lines.len() && (lines[j].trim().is_empty() || indent_of(lines[j]) > parent) {
            if !lines[j].trim().is_empty() {
                last = j;
            }
            j += 1;
        }
        for flag in &mut marked[i + 1..=last] {
            *flag = true;
        }
        i = last + 1;
    }

    marked
}

/// Indentation the content of a block scalar opened on `line` must exceed.
fn block_scalar_parent(line: &str) -> Option<usize> {
    let mut column = indent_of(line);
    let mut rest = &line[column..];

    while let Some(after_dash) = rest.strip_prefix("- ") {
        let extra = indent_of(after_dash);
        if is_block_indicator(&after_dash[extra..]) {
            return Some(column);
        }
        column += 2 + extra;
        rest = &after_dash[extra..];
    }

    if rest.starts_with('#') {
        return None;
    }
    let (_, value) = rest.split_once(": ")?;
    is_block_indicator(value).then_some(column)
}

/// `|` or `>` with optional chomping and indentation indicators.
fn is_block_indicator(value: &str) -> bool {
    let value = match value.find(" #") {
        Some(comment) => &value[..comment],
        None => value,
    };
    let mut chars = value.trim().chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| c == '+' || c == '-' || c.is_ascii_digit())
}

fn is_list_item(trimmed: &str) -> bool {
    trimmed == "-" || trimmed.starts_with("- ")
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Parse one rule item on its own.
fn parse_block(
    lines: &[&str],
    scalar: &[bool],
    block: &RuleBlock,
) -> std::result::Result<Rule, serde_yaml::Error> {
    let body = serde_yaml::from_str(&item_text(lines, scalar, block))?;
    Ok(rule_from_body(
        body,
        LineRange::new(block.start + 1, block.end + 1),
    ))
}

/// Render a rule item as a standalone YAML document.
///
/// The leading dash is blanked out so the item becomes a plain mapping,
/// then the common indentation is removed. Comment lines outside block
/// scalars are dropped since their indentation is unconstrained.
fn item_text(lines: &[&str], scalar: &[bool], block: &RuleBlock) -> String {
    let mut owned: Vec<String> = Vec::with_capacity(block.end - block.start + 1);

    for (index, line) in lines.iter().enumerate().take(block.end + 1).skip(block.start) {
        if index == block.start {
            let dash = block.item_indent;
            owned.push(format!("{} {}", " ".repeat(dash), &line[dash + 1..]));
        } else if !scalar[index] && is_blank_or_comment(line) {
            owned.push(String::new());
        } else {
            owned.push(line.to_string());
        }
    }

    let common = owned
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);

    let mut text = String::new();
    for line in owned {
        if line.len() >= common {
            text.push_str(&line[common..]);
        }
        text.push('\n');
    }
    text
}
