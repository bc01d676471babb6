use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use serde_derive::Deserialize;
use tracing::debug;

use crate::dataset::RESERVED_KEYS;
use crate::error::{Result, SurveyError};

/// Status categories registered as keys whether or not anyone picked them.
pub const STATUS_CATEGORIES: &[&str] = &[
    "academic", "grad", "postdoc", "educator", "industry", "Between",
];

/// Reason codes for not asking a question, as `(code, search phrase)` pairs.
///
/// Order matters: a why_not fragment is tested against each phrase in turn.
pub const REASON_TABLE: &[(&str, &str)] = &[
    ("unimportant", "important"),
    ("nervous", "nervous"),
    ("far seat", "far"),
    ("tweeting", "tweeting"),
    ("no time", "time"),
    ("stupid question", "stupid"),
    ("intimidated", "intimidat"),
    ("knew answer", "answer"),
    ("someone asked", "someone else"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,
    #[serde(default = "default_reasons")]
    pub reasons: Vec<ReasonRule>,
}

/// One reason code and the phrase whose presence in a why_not fragment sets it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReasonRule {
    pub code: String,
    pub phrase: String,
}

impl ReasonRule {
    pub fn new(code: &str, phrase: &str) -> Self {
        ReasonRule {
            code: code.to_string(),
            phrase: phrase.to_string(),
        }
    }
}

fn default_statuses() -> Vec<String> {
    STATUS_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

fn default_reasons() -> Vec<ReasonRule> {
    REASON_TABLE
        .iter()
        .map(|(code, phrase)| ReasonRule::new(code, phrase))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            statuses: default_statuses(),
            reasons: default_reasons(),
        }
    }
}

impl Config {
    /// Reject tables that would make two keys ambiguous or a rule unmatchable.
    pub fn validate(&self) -> Result<()> {
        let mut seen: BTreeSet<&str> = RESERVED_KEYS.iter().copied().collect();

        for status in &self.statuses {
            if status.trim().is_empty() || status.split_whitespace().count() != 1 {
                return Err(SurveyError::InvalidConfig(format!(
                    "status {:?} must be a single non-empty word",
                    status
                )));
            }
            if !seen.insert(status.as_str()) {
                return Err(SurveyError::InvalidConfig(format!(
                    "status {:?} duplicates another key",
                    status
                )));
            }
        }

        for rule in &self.reasons {
            if rule.code.trim().is_empty() || rule.phrase.trim().is_empty() {
                return Err(SurveyError::InvalidConfig(format!(
                    "reason rule {:?} needs both a code and a phrase",
                    rule
                )));
            }
            if !seen.insert(rule.code.as_str()) {
                return Err(SurveyError::InvalidConfig(format!(
                    "reason code {:?} duplicates another key",
                    rule.code
                )));
            }
        }

        Ok(())
    }
}

pub fn read_config<P: AsRef<Path>>(config_path: P) -> Result<Config> {
    let config_path = config_path.as_ref();
    let file_error = |source: io::Error| SurveyError::File {
        path: config_path.to_path_buf(),
        source,
    };

    let f = File::open(config_path).map_err(file_error)?;
    let mut reader = io::BufReader::new(f);

    let mut buf = String::new();
    reader.read_to_string(&mut buf).map_err(file_error)?;

    let config: Config = toml::from_str(&buf).map_err(|source| SurveyError::Config {
        path: config_path.to_path_buf(),
        source,
    })?;
    config.validate()?;

    debug!(
        path = %config_path.display(),
        statuses = config.statuses.len(),
        reasons = config.reasons.len(),
        "loaded survey config"
    );
    Ok(config)
}
