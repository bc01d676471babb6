//! Reduce raw survey answers to canonical values.
//!
//! Every function here is pure and accepts already-canonical input unchanged,
//! so a normalized export can be fed back through without drift.

use std::fmt;

use crate::error::{Result, SurveyError};
use crate::survey_config::{Config, ReasonRule};
use crate::survey_data::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

/// An answer judged on its first character, also used for derived
/// reason-code flags.
///
/// Anything that does not start with `Y` or `N` is kept as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Answer {
    Yes,
    No,
    Other(char),
}

impl Answer {
    pub fn as_char(self) -> char {
        match self {
            Answer::Yes => 'Y',
            Answer::No => 'N',
            Answer::Other(c) => c,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Answer::Yes
    }
}

impl From<bool> for Answer {
    fn from(yes: bool) -> Self {
        if yes {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// `F` when the answer starts with or contains `f`/`F`, or contains `W`.
pub fn gender(raw: &str) -> Gender {
    let female = raw.starts_with('F')
        || raw.starts_with('f')
        || raw.contains('f')
        || raw.contains('F')
        || raw.contains('W');
    if female {
        Gender::F
    } else {
        Gender::M
    }
}

/// First whitespace-delimited word, e.g. `grad student` -> `grad`.
pub fn status(raw: &str) -> Option<&str> {
    raw.split_whitespace().next()
}

/// First character of the field, so `Yes` and `Y` agree. `None` when empty.
pub fn answer(raw: &str) -> Option<Answer> {
    let answer = match raw.chars().next()? {
        'Y' => Answer::Yes,
        'N' => Answer::No,
        other => Answer::Other(other),
    };
    Some(answer)
}

/// One flag per rule, in rule order.
///
/// `why_not` is split on commas and each fragment is tested for the rule's
/// phrase, case-sensitively. Any matching fragment sets the flag.
pub fn reason_flags(why_not: &str, rules: &[ReasonRule]) -> Vec<Answer> {
    let fragments: Vec<&str> = why_not
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect();

    rules
        .iter()
        .map(|rule| {
            let phrase = rule.phrase.as_str();
            Answer::from(fragments.iter().any(|fragment| fragment.contains(phrase)))
        })
        .collect()
}

/// A respondent after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub timestamp: String,
    pub status: String,
    pub gender: Gender,
    pub have_asked: Answer,
    pub hesitated: Answer,
    pub why_not: String,
    pub why_do: String,
    pub recommendations: String,
    pub free_response: String,
    /// Aligned with `Config::reasons`.
    pub reasons: Vec<Answer>,
}

pub fn normalize(record: &Record, config: &Config) -> Result<Response> {
    let status = status(&record.status)
        .ok_or_else(|| SurveyError::parse(record.line, "status is empty"))?;
    let have_asked = answer(&record.have_asked)
        .ok_or_else(|| SurveyError::parse(record.line, "have_asked is empty"))?;
    let hesitated = answer(&record.hesitated)
        .ok_or_else(|| SurveyError::parse(record.line, "hesitated is empty"))?;

    Ok(Response {
        timestamp: record.timestamp.clone(),
        status: status.to_string(),
        gender: gender(&record.gender),
        have_asked,
        hesitated,
        why_not: record.why_not.clone(),
        why_do: record.why_do.clone(),
        recommendations: record.recommendations.clone(),
        free_response: record.free_response.clone(),
        reasons: reason_flags(&record.why_not, &config.reasons),
    })
}
