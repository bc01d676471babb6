use std::fs::File;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SurveyError};

/// Columns of the export, in file order. The export has no header row.
pub const FIELDS: [&str; 9] = [
    "timestamp",
    "status",
    "gender",
    "have_asked",
    "hesitated",
    "why_not",
    "why_do",
    "recommendations",
    "free_response",
];

/// One respondent's row exactly as it appears in the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Line in the source file, for error messages.
    pub line: u64,
    pub timestamp: String,
    pub status: String,
    pub gender: String,
    pub have_asked: String,
    pub hesitated: String,
    pub why_not: String,
    pub why_do: String,
    pub recommendations: String,
    pub free_response: String,
}

impl Record {
    fn from_row(line: u64, row: &csv::StringRecord) -> Result<Record> {
        if row.len() < FIELDS.len() {
            return Err(SurveyError::parse(
                line,
                format!("expected {} fields, found {}", FIELDS.len(), row.len()),
            ));
        }
        let field = |i: usize| row[i].to_string();
        Ok(Record {
            line,
            timestamp: field(0),
            status: field(1),
            gender: field(2),
            have_asked: field(3),
            hesitated: field(4),
            why_not: field(5),
            why_do: field(6),
            recommendations: field(7),
            free_response: field(8),
        })
    }
}

pub fn read_records<P: AsRef<Path>>(data_path: P) -> Result<Vec<Record>> {
    let data_path = data_path.as_ref();
    let file = File::open(data_path).map_err(|source| SurveyError::File {
        path: data_path.to_path_buf(),
        source,
    })?;
    let records = decode(file, data_path)?;
    debug!(path = %data_path.display(), rows = records.len(), "read survey export");
    Ok(records)
}

/// Decode every row of `input`; `origin` names the source in error messages.
pub(crate) fn decode<R: io::Read>(input: R, origin: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .quote(b'"')
        .flexible(true)
        .from_reader(input);
    let mut records: Vec<Record> = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|err| csv_error(origin, err))?;
        let line = row.position().map_or(0, |pos| pos.line());
        records.push(Record::from_row(line, &row)?);
    }
    Ok(records)
}

fn csv_error(origin: &Path, err: csv::Error) -> SurveyError {
    let line = err.position().map_or(0, |pos| pos.line());
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => SurveyError::File {
            path: origin.to_path_buf(),
            source,
        },
        _ => SurveyError::Parse { line, message },
    }
}
