//! The loaded survey: aligned columns plus an index of respondent positions
//! per canonical key.
//!
//! A dataset is built in one pass and never changes afterwards, so it can be
//! shared freely between readers.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, SurveyError};
use crate::normalize::{normalize, Answer, Gender, Response};
use crate::survey_config::Config;
use crate::survey_data::{read_records, Record};

pub const MALE: &str = "M";
pub const FEMALE: &str = "F";
pub const HAVE_ASKED: &str = "have asked";
pub const NEVER_ASKED: &str = "never asked";
pub const HESITATED: &str = "hesitated";
pub const NEVER_HESITATED: &str = "never hesitated";

/// Keys that always exist, independent of any vocabulary table.
pub const RESERVED_KEYS: [&str; 6] = [
    MALE,
    FEMALE,
    HAVE_ASKED,
    NEVER_ASKED,
    HESITATED,
    NEVER_HESITATED,
];

/// Respondent positions, ascending.
pub type Positions = BTreeSet<usize>;

/// Respondent counts per gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenderSplit {
    pub m: usize,
    pub f: usize,
}

/// Derived Y/N column for one reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonColumn {
    pub code: String,
    pub values: Vec<Answer>,
}

/// Per-field columns. Position `i` of every column is the same respondent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    pub timestamp: Vec<String>,
    pub status: Vec<String>,
    pub gender: Vec<Gender>,
    pub have_asked: Vec<Answer>,
    pub hesitated: Vec<Answer>,
    pub why_not: Vec<String>,
    pub why_do: Vec<String>,
    pub recommendations: Vec<String>,
    pub free_response: Vec<String>,
    pub reasons: Vec<ReasonColumn>,
}

impl Columns {
    fn with_reasons(config: &Config) -> Self {
        Columns {
            reasons: config
                .reasons
                .iter()
                .map(|rule| ReasonColumn {
                    code: rule.code.clone(),
                    values: Vec::new(),
                })
                .collect(),
            ..Columns::default()
        }
    }

    fn push(&mut self, response: Response) {
        self.timestamp.push(response.timestamp);
        self.status.push(response.status);
        self.gender.push(response.gender);
        self.have_asked.push(response.have_asked);
        self.hesitated.push(response.hesitated);
        self.why_not.push(response.why_not);
        self.why_do.push(response.why_do);
        self.recommendations.push(response.recommendations);
        self.free_response.push(response.free_response);
        for (column, flag) in self.reasons.iter_mut().zip(response.reasons) {
            column.values.push(flag);
        }
    }

    pub fn len(&self) -> usize {
        self.gender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gender.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SurveyDataset {
    columns: Columns,
    index: BTreeMap<String, Positions>,
}

impl SurveyDataset {
    /// Read, normalize and index the export at `data_path`.
    pub fn load<P: AsRef<Path>>(data_path: P, config: &Config) -> Result<Self> {
        let records = read_records(data_path)?;
        Self::from_records(&records, config)
    }

    pub fn from_records(records: &[Record], config: &Config) -> Result<Self> {
        config.validate()?;

        let mut columns = Columns::with_reasons(config);
        for record in records {
            columns.push(normalize(record, config)?);
        }
        debug!(respondents = columns.len(), "normalized responses");

        let index = build_index(&columns, config);
        info!(
            respondents = columns.len(),
            keys = index.len(),
            "survey dataset ready"
        );
        Ok(SurveyDataset { columns, index })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Every key accepted by `count`, `overlap` and `respondents`.
    pub fn category_keys(&self) -> BTreeSet<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    /// Reason codes in table order.
    pub fn reason_codes(&self) -> impl Iterator<Item = &str> {
        self.columns.reasons.iter().map(|column| column.code.as_str())
    }

    pub fn reason_column(&self, code: &str) -> Result<&[Answer]> {
        self.columns
            .reasons
            .iter()
            .find(|column| column.code == code)
            .map(|column| column.values.as_slice())
            .ok_or_else(|| SurveyError::KeyNotFound(code.to_string()))
    }

    pub fn respondents(&self, key: &str) -> Result<&Positions> {
        self.index
            .get(key)
            .ok_or_else(|| SurveyError::KeyNotFound(key.to_string()))
    }

    pub fn count(&self, key: &str) -> Result<usize> {
        Ok(self.respondents(key)?.len())
    }

    /// Respondents present under both keys.
    pub fn overlap(&self, first: &str, second: &str) -> Result<usize> {
        let first = self.respondents(first)?;
        let second = self.respondents(second)?;
        Ok(first.intersection(second).count())
    }

    pub fn gender_split(&self) -> GenderSplit {
        let size = |key: &str| self.index.get(key).map_or(0, BTreeSet::len);
        GenderSplit {
            m: size(MALE),
            f: size(FEMALE),
        }
    }
}

fn build_index(columns: &Columns, config: &Config) -> BTreeMap<String, Positions> {
    let mut index: BTreeMap<String, Positions> = BTreeMap::new();
    let keys = RESERVED_KEYS
        .iter()
        .copied()
        .chain(config.statuses.iter().map(String::as_str))
        .chain(config.reasons.iter().map(|rule| rule.code.as_str()));
    for key in keys {
        index.insert(key.to_string(), Positions::new());
    }

    let mut insert = |key: &str, position: usize| {
        if let Some(positions) = index.get_mut(key) {
            positions.insert(position);
        }
    };

    for (i, gender) in columns.gender.iter().enumerate() {
        insert(gender.label(), i);
    }
    // Answers other than Y/N stay in their column but join neither key.
    for (i, asked) in columns.have_asked.iter().enumerate() {
        match asked {
            Answer::Yes => insert(HAVE_ASKED, i),
            Answer::No => insert(NEVER_ASKED, i),
            Answer::Other(_) => {}
        }
    }
    for (i, hesitated) in columns.hesitated.iter().enumerate() {
        match hesitated {
            Answer::Yes => insert(HESITATED, i),
            Answer::No => insert(NEVER_HESITATED, i),
            Answer::Other(_) => {}
        }
    }
    for column in &columns.reasons {
        for (i, flag) in column.values.iter().enumerate() {
            if flag.is_yes() {
                insert(column.code.as_str(), i);
            }
        }
    }

    // Statuses outside the vocabulary still get a key, unless the word is
    // already taken by a reserved key or reason code.
    let taken: BTreeSet<&str> = RESERVED_KEYS
        .iter()
        .copied()
        .chain(config.reasons.iter().map(|rule| rule.code.as_str()))
        .collect();
    for (i, status) in columns.status.iter().enumerate() {
        if taken.contains(status.as_str()) {
            warn!(status = %status, respondent = i, "status collides with a reserved key, not indexed");
            continue;
        }
        index.entry(status.clone()).or_default().insert(i);
    }

    index
}
