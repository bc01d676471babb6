// End-to-end tests: write an export to disk, load it, and query it.

use std::io::Write;

use survey_stats::dataset::{FEMALE, HAVE_ASKED, HESITATED, MALE, NEVER_ASKED, NEVER_HESITATED};
use survey_stats::normalize::{Answer, Gender};
use survey_stats::{read_config, Config, GenderSplit, SurveyDataset, SurveyError};
use tempfile::NamedTempFile;

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn row(status: &str, gender: &str, asked: &str, hesitated: &str, why_not: &str) -> String {
    format!(
        "\"2020-01-01 10:00\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"\",\"\",\"\"\n",
        status, gender, asked, hesitated, why_not
    )
}

fn ten_rows() -> Vec<String> {
    vec![
        row("grad student", "male", "Yes", "No", ""),
        row("academic", "Male", "No", "Yes", "nervous"),
        row("postdoc", "M", "Yes", "Yes", "far away"),
        row("industry", "man", "No", "No", ""),
        row("grad", "cis male", "Yes", "No", "tweeting instead"),
        row("educator", "m", "No", "Yes", "no time left"),
        row("grad", "female", "No", "Yes", "nervous, far seat"),
        row("academic", "Female", "Yes", "Yes", "felt stupid"),
        row("Between jobs", "Woman", "No", "No", ""),
        row("postdoc", "F", "Yes", "Yes", "intimidated by speaker"),
    ]
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn single_row_scenario() {
    let file = write_file(
        "\"2020-01-01\",\"grad student\",\"female\",\"Y\",\"N\",\"nervous, far seat\",\"\",\"\",\"\"\n",
    );
    let dataset = SurveyDataset::load(file.path(), &Config::default()).unwrap();
    let columns = dataset.columns();

    assert_eq!(dataset.len(), 1);
    assert_eq!(columns.status[0], "grad");
    assert_eq!(columns.gender[0], Gender::F);
    assert_eq!(columns.have_asked[0], Answer::Yes);
    assert_eq!(columns.hesitated[0], Answer::No);
    for code in dataset.reason_codes() {
        let expected = if code == "nervous" || code == "far seat" {
            Answer::Yes
        } else {
            Answer::No
        };
        assert_eq!(dataset.reason_column(code).unwrap()[0], expected, "{}", code);
    }
}

#[test]
fn ten_row_gender_split() {
    let file = write_file(&ten_rows().concat());
    let dataset = SurveyDataset::load(file.path(), &Config::default()).unwrap();
    assert_eq!(dataset.gender_split(), GenderSplit { m: 6, f: 4 });
}

#[test]
fn unknown_key_errors() {
    let file = write_file(&ten_rows().concat());
    let dataset = SurveyDataset::load(file.path(), &Config::default()).unwrap();
    assert!(matches!(
        dataset.count("nonexistent_key"),
        Err(SurveyError::KeyNotFound(_))
    ));
}

#[test]
fn three_field_row_produces_no_dataset() {
    let mut contents = ten_rows().concat();
    contents.push_str("\"2020-01-01\",\"grad\",\"male\"\n");
    let file = write_file(&contents);
    match SurveyDataset::load(file.path(), &Config::default()) {
        Err(SurveyError::Parse { line, .. }) => assert_eq!(line, 11),
        other => panic!("expected parse error, got {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn odd_answer_keeps_the_dataset() {
    let mut rows = ten_rows();
    rows.push(row("grad", "male", "Maybe", "No", "Nervous"));
    let file = write_file(&rows.concat());
    let dataset = SurveyDataset::load(file.path(), &Config::default()).unwrap();
    let n = dataset.len();

    assert_eq!(n, 11);
    assert_eq!(dataset.columns().have_asked[10], Answer::Other('M'));
    assert_eq!(
        dataset.count(HAVE_ASKED).unwrap() + dataset.count(NEVER_ASKED).unwrap(),
        n - 1
    );
    // capitalized fragment does not match the lowercase phrase
    assert_eq!(dataset.reason_column("nervous").unwrap()[10], Answer::No);
}

#[test]
fn missing_file_is_a_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SurveyDataset::load(dir.path().join("absent.csv"), &Config::default());
    assert!(matches!(result, Err(SurveyError::File { .. })));
}

// ============================================================
// Properties
// ============================================================

#[test]
fn every_respondent_has_one_gender_and_one_answer_each() {
    let file = write_file(&ten_rows().concat());
    let dataset = SurveyDataset::load(file.path(), &Config::default()).unwrap();
    let n = dataset.len();

    assert_eq!(dataset.count(MALE).unwrap() + dataset.count(FEMALE).unwrap(), n);
    assert_eq!(dataset.overlap(MALE, FEMALE).unwrap(), 0);
    assert_eq!(
        dataset.count(HAVE_ASKED).unwrap() + dataset.count(NEVER_ASKED).unwrap(),
        n
    );
    assert_eq!(
        dataset.count(HESITATED).unwrap() + dataset.count(NEVER_HESITATED).unwrap(),
        n
    );
}

#[test]
fn canonical_export_normalizes_to_itself() {
    let file = write_file(&ten_rows().concat());
    let first = SurveyDataset::load(file.path(), &Config::default()).unwrap();
    let columns = first.columns();

    let canonical: String = (0..first.len())
        .map(|i| {
            row(
                &columns.status[i],
                columns.gender[i].label(),
                &columns.have_asked[i].to_string(),
                &columns.hesitated[i].to_string(),
                &columns.why_not[i],
            )
        })
        .collect();
    let canonical_file = write_file(&canonical);
    let second = SurveyDataset::load(canonical_file.path(), &Config::default()).unwrap();

    assert_eq!(second.columns().status, columns.status);
    assert_eq!(second.columns().gender, columns.gender);
    assert_eq!(second.columns().have_asked, columns.have_asked);
    assert_eq!(second.columns().hesitated, columns.hesitated);
    assert_eq!(second.columns().reasons, columns.reasons);
}

#[test]
fn overlap_is_reflexive_and_symmetric() {
    let file = write_file(&ten_rows().concat());
    let dataset = SurveyDataset::load(file.path(), &Config::default()).unwrap();
    let keys = dataset.category_keys();
    for a in &keys {
        assert_eq!(dataset.overlap(a, a).unwrap(), dataset.count(a).unwrap());
        for b in &keys {
            assert_eq!(
                dataset.overlap(a, b).unwrap(),
                dataset.overlap(b, a).unwrap()
            );
        }
    }
}

#[test]
fn reason_totals_ignore_row_order() {
    let rows = ten_rows();
    let reversed: Vec<String> = rows.iter().rev().cloned().collect();
    let forward = write_file(&rows.concat());
    let backward = write_file(&reversed.concat());

    let total = |dataset: &SurveyDataset| -> usize {
        dataset
            .reason_codes()
            .map(|code| dataset.count(code).unwrap())
            .sum()
    };

    let a = SurveyDataset::load(forward.path(), &Config::default()).unwrap();
    let b = SurveyDataset::load(backward.path(), &Config::default()).unwrap();
    assert_eq!(total(&a), total(&b));
    for code in a.reason_codes() {
        assert_eq!(a.count(code).unwrap(), b.count(code).unwrap(), "{}", code);
    }
}

#[test]
fn zero_occurrence_vocabulary_keys_count_zero() {
    let file = write_file(&row("grad", "male", "Y", "N", ""));
    let dataset = SurveyDataset::load(file.path(), &Config::default()).unwrap();
    for key in ["academic", "postdoc", "educator", "industry", "Between", "tweeting"] {
        assert_eq!(dataset.count(key).unwrap(), 0, "{}", key);
    }
}

// ============================================================
// Config file
// ============================================================

#[test]
fn config_file_replaces_vocabularies() {
    let config_file = write_file(
        r#"
statuses = ["student", "staff"]

[[reasons]]
code = "shy"
phrase = "shy"
"#,
    );
    let config = read_config(config_file.path()).unwrap();
    let data = write_file(&row("student", "female", "N", "Y", "too shy, far"));
    let dataset = SurveyDataset::load(data.path(), &config).unwrap();

    assert_eq!(dataset.reason_codes().collect::<Vec<_>>(), vec!["shy"]);
    assert_eq!(dataset.count("shy").unwrap(), 1);
    assert_eq!(dataset.count("staff").unwrap(), 0);
    assert!(dataset.count("far seat").is_err());
    assert!(dataset.count("postdoc").is_err());
}

#[test]
fn malformed_config_is_a_config_error() {
    let config_file = write_file("statuses = [\"grad\"");
    assert!(matches!(
        read_config(config_file.path()),
        Err(SurveyError::Config { .. })
    ));
}

#[test]
fn config_with_clashing_keys_is_rejected() {
    let config_file = write_file("statuses = [\"M\"]\n");
    assert!(matches!(
        read_config(config_file.path()),
        Err(SurveyError::InvalidConfig(_))
    ));
}
