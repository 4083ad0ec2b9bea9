//! Restricted indentation-based configuration format.
//!
//! The join configuration is a small YAML-like subset: string keys mapping
//! to scalars, bracketed string lists, or nested maps introduced by deeper
//! indentation. The parser does not validate any schema; callers resolve
//! unknown or missing keys to empty defaults via [`JoinConfig`].

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A parsed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Str(String),
    Bool(bool),
    List(Vec<String>),
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Strip one pair of matching single or double quotes, if present.
fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Parse a scalar or bracketed-list value.
fn parse_value(raw: &str) -> ConfigValue {
    let v = raw.trim();

    if let Some(inner) = v.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let inner = inner.trim();
        if inner.is_empty() {
            return ConfigValue::List(Vec::new());
        }
        let items = inner
            .split(',')
            .map(|part| strip_quotes(part.trim()).trim().to_string())
            .collect();
        return ConfigValue::List(items);
    }

    if v == "true" || v == "false" {
        return ConfigValue::Bool(v == "true");
    }

    ConfigValue::Str(strip_quotes(v).trim().to_string())
}

/// Parse configuration text into a nested map.
///
/// Indentation strictly determines nesting: a key with an empty value opens
/// a nested map expected at `indent + 2`; a line indented less than the
/// current level pops levels until a matching or shallower one is found.
/// Blank lines and `#`-comment lines are skipped, and everything from the
/// first `#` on a line is discarded.
pub fn parse(text: &str) -> ConfigValue {
    // Stack of open maps: (expected indent, key in parent, contents).
    // The root frame is never popped.
    let mut stack: Vec<(usize, Option<String>, BTreeMap<String, ConfigValue>)> =
        vec![(0, None, BTreeMap::new())];

    for raw in text.lines() {
        let stripped = raw.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }
        let line = match raw.find('#') {
            Some(pos) => raw[..pos].trim_end(),
            None => raw.trim_end(),
        };
        if line.trim().is_empty() {
            continue;
        }

        let indent = line.len() - line.trim_start_matches(' ').len();
        let trimmed = line.trim();
        let (key, value) = match trimmed.split_once(':') {
            Some((k, v)) => (k.trim().to_string(), v.trim()),
            None => (trimmed.to_string(), ""),
        };

        while stack.len() > 1 && indent < stack.last().map(|f| f.0).unwrap_or(0) {
            fold_top(&mut stack);
        }

        if value.is_empty() {
            stack.push((indent + 2, Some(key), BTreeMap::new()));
        } else if let Some(top) = stack.last_mut() {
            top.2.insert(key, parse_value(value));
        }
    }

    while stack.len() > 1 {
        fold_top(&mut stack);
    }

    let (_, _, root) = stack.pop().unwrap_or((0, None, BTreeMap::new()));
    ConfigValue::Map(root)
}

/// Pop the top frame and insert it into its parent as a nested map.
fn fold_top(stack: &mut Vec<(usize, Option<String>, BTreeMap<String, ConfigValue>)>) {
    if let Some((_, Some(key), map)) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.2.insert(key, ConfigValue::Map(map));
        }
    }
}

/// Read and parse a configuration file.
pub fn load(path: &Path) -> Result<ConfigValue> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read join config at {}", path.display()))?;
    Ok(parse(&text))
}

/// Whether a target's join requests are gated behind reviewer approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalMode {
    Auto,
    Approval,
}

/// Reviewers authorized to approve requests for a target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reviewers {
    /// Explicit logins, every one of which must approve.
    pub users: Vec<String>,
    /// Team slugs; at least one member outside `users` must approve.
    pub teams: Vec<String>,
}

/// Per-target configuration, selected via the `target:<name>` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamConfig {
    pub mode: ApprovalMode,
    pub team_slug: Option<String>,
    pub reviewers: Reviewers,
}

impl TeamConfig {
    fn from_value(value: &ConfigValue) -> Self {
        let mode = match value.get("mode").and_then(ConfigValue::as_str) {
            Some("approval") => ApprovalMode::Approval,
            _ => ApprovalMode::Auto,
        };

        let team_slug = value
            .get("team_slug")
            .and_then(ConfigValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let reviewers = value
            .get("reviewers")
            .map(|r| Reviewers {
                users: r
                    .get("users")
                    .and_then(ConfigValue::as_list)
                    .unwrap_or_default()
                    .to_vec(),
                teams: r
                    .get("teams")
                    .and_then(ConfigValue::as_list)
                    .unwrap_or_default()
                    .iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
            })
            .unwrap_or_default();

        TeamConfig {
            mode,
            team_slug,
            reviewers,
        }
    }
}

/// The typed view over a parsed join configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinConfig {
    pub org: Option<String>,
    pub teams: BTreeMap<String, TeamConfig>,
}

impl JoinConfig {
    pub fn from_value(value: &ConfigValue) -> Self {
        let org = value
            .get("org")
            .and_then(ConfigValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let teams = value
            .get("teams")
            .and_then(ConfigValue::as_map)
            .map(|map| {
                map.iter()
                    .map(|(name, v)| (name.clone(), TeamConfig::from_value(v)))
                    .collect()
            })
            .unwrap_or_default();

        JoinConfig { org, teams }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_value(&load(path)?))
    }

    pub fn team(&self, target: &str) -> Option<&TeamConfig> {
        self.teams.get(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# join configuration
org: acme

teams:
  infra:
    mode: approval
    team_slug: infra-team
    reviewers:
      users: ["Alice", 'bob']
      teams: [leads]
  docs:
    mode: auto   # no review gate
    team_slug: docs
"#;

    #[test]
    fn test_parse_nested_structure() {
        let root = parse(SAMPLE);
        assert_eq!(root.get("org").and_then(ConfigValue::as_str), Some("acme"));

        let infra = root.get("teams").and_then(|t| t.get("infra")).unwrap();
        assert_eq!(
            infra.get("mode").and_then(ConfigValue::as_str),
            Some("approval")
        );
        assert_eq!(
            infra.get("team_slug").and_then(ConfigValue::as_str),
            Some("infra-team")
        );

        let users = infra
            .get("reviewers")
            .and_then(|r| r.get("users"))
            .and_then(ConfigValue::as_list)
            .unwrap();
        assert_eq!(users, ["Alice", "bob"]);
    }

    #[test]
    fn test_list_strips_matching_quotes() {
        let root = parse("names: [\"a\", 'b c', plain]\n");
        assert_eq!(
            root.get("names").and_then(ConfigValue::as_list),
            Some(&["a".to_string(), "b c".to_string(), "plain".to_string()][..])
        );
    }

    #[test]
    fn test_empty_list() {
        let root = parse("names: []\n");
        assert_eq!(root.get("names").and_then(ConfigValue::as_list), Some(&[][..]));
    }

    #[test]
    fn test_inline_comment_truncated() {
        let root = parse("mode: approval # gate behind review\n");
        assert_eq!(
            root.get("mode").and_then(ConfigValue::as_str),
            Some("approval")
        );
    }

    #[test]
    fn test_booleans() {
        let root = parse("a: true\nb: false\nc: \"true\"\n");
        assert_eq!(root.get("a").and_then(ConfigValue::as_bool), Some(true));
        assert_eq!(root.get("b").and_then(ConfigValue::as_bool), Some(false));
        // A quoted boolean stays a string.
        assert_eq!(root.get("c").and_then(ConfigValue::as_str), Some("true"));
    }

    #[test]
    fn test_dedent_pops_back_to_parent() {
        let text = "outer:\n  inner:\n    leaf: 1\n  sibling: 2\ntop: 3\n";
        let root = parse(text);
        let outer = root.get("outer").unwrap();
        assert_eq!(
            outer
                .get("inner")
                .and_then(|i| i.get("leaf"))
                .and_then(ConfigValue::as_str),
            Some("1")
        );
        assert_eq!(
            outer.get("sibling").and_then(ConfigValue::as_str),
            Some("2")
        );
        assert_eq!(root.get("top").and_then(ConfigValue::as_str), Some("3"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load(Path::new("/nonexistent/join-config.yml")).is_err());
    }

    #[test]
    fn test_typed_view() {
        let cfg = JoinConfig::from_value(&parse(SAMPLE));
        assert_eq!(cfg.org.as_deref(), Some("acme"));

        let infra = cfg.team("infra").unwrap();
        assert_eq!(infra.mode, ApprovalMode::Approval);
        assert_eq!(infra.team_slug.as_deref(), Some("infra-team"));
        assert_eq!(infra.reviewers.users, ["Alice", "bob"]);
        assert_eq!(infra.reviewers.teams, ["leads"]);

        let docs = cfg.team("docs").unwrap();
        assert_eq!(docs.mode, ApprovalMode::Auto);
        assert!(docs.reviewers.users.is_empty());

        assert!(cfg.team("unknown").is_none());
    }

    #[test]
    fn test_typed_view_defaults() {
        // Unknown mode strings and missing keys resolve to quiet defaults.
        let cfg = JoinConfig::from_value(&parse("teams:\n  x:\n    mode: whatever\n"));
        let x = cfg.team("x").unwrap();
        assert_eq!(x.mode, ApprovalMode::Auto);
        assert_eq!(x.team_slug, None);
        assert!(x.reviewers.users.is_empty());
        assert!(x.reviewers.teams.is_empty());

        let empty = JoinConfig::from_value(&parse(""));
        assert_eq!(empty.org, None);
        assert!(empty.teams.is_empty());
    }

    #[test]
    fn test_reviewer_team_slugs_are_trimmed() {
        let cfg = JoinConfig::from_value(&parse("teams:\n  x:\n    reviewers:\n      teams: [\" leads \", \"\"]\n"));
        assert_eq!(cfg.team("x").unwrap().reviewers.teams, ["leads"]);
    }
}
