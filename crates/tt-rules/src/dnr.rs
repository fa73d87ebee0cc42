//! Declarative rule output
//!
//! Rules are written in the JSON shape the browser's declarative request
//! engine loads as a static ruleset.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::parser::{parse_filter_line, FilterAction, ParsedFilter};

/// Priority given to every emitted rule.
pub const DEFAULT_PRIORITY: u32 = 1;

/// Error type for list conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize rules: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Block,
    Allow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub kind: ActionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    pub url_filter: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarativeRule {
    pub id: u32,
    pub priority: u32,
    pub action: RuleAction,
    pub condition: RuleCondition,
}

impl DeclarativeRule {
    pub fn from_filter(id: u32, filter: ParsedFilter) -> Self {
        let kind = match filter.action {
            FilterAction::Block => ActionType::Block,
            FilterAction::Allow => ActionType::Allow,
        };
        Self {
            id,
            priority: DEFAULT_PRIORITY,
            action: RuleAction { kind },
            condition: RuleCondition {
                url_filter: filter.url_filter,
                resource_types: filter.resource_types.names().into_iter().map(String::from).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub lines: usize,
    pub rules: usize,
    pub skipped: usize,
}

pub struct Conversion {
    pub rules: Vec<DeclarativeRule>,
    pub stats: ConvertStats,
}

/// Convert filter list text. Rule ids start at 1 and follow line order.
pub fn convert_filter_list(text: &str) -> Conversion {
    let mut rules = Vec::new();
    let mut stats = ConvertStats::default();

    for line in text.lines() {
        stats.lines += 1;
        match parse_filter_line(line) {
            Some(filter) => {
                let id = rules.len() as u32 + 1;
                rules.push(DeclarativeRule::from_filter(id, filter));
            }
            None => {
                if !line.trim().is_empty() {
                    log::trace!("skipped filter line: {}", line);
                }
                stats.skipped += 1;
            }
        }
    }

    stats.rules = rules.len();
    log::debug!("converted {} lines into {} rules", stats.lines, stats.rules);
    Conversion { rules, stats }
}

pub fn rules_to_json(rules: &[DeclarativeRule]) -> Result<String, ConvertError> {
    Ok(serde_json::to_string_pretty(rules)?)
}

/// Convert a filter list file and write the ruleset to `output`, creating
/// missing parent directories.
pub fn convert_file(input: &Path, output: &Path) -> Result<ConvertStats, ConvertError> {
    let text = fs::read_to_string(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let conversion = convert_filter_list(&text);
    let json = rules_to_json(&conversion.rules)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConvertError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(output, json).map_err(|source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(conversion.stats)
}
