//! Load a gender survey export about asking questions at talks, normalize the
//! answers and count respondents per canonical answer.
//!
//! ```no_run
//! use survey_stats::{Config, SurveyDataset};
//!
//! let dataset = SurveyDataset::load("data/survey_responses.csv", &Config::default())?;
//! println!("{:?}", dataset.gender_split());
//! println!("{}", dataset.overlap("F", "hesitated")?);
//! # Ok::<(), survey_stats::SurveyError>(())
//! ```

pub mod dataset;
pub mod error;
pub mod normalize;
pub mod survey_config;
pub mod survey_data;

pub use dataset::{GenderSplit, SurveyDataset};
pub use error::{Result, SurveyError};
pub use survey_config::{read_config, Config, ReasonRule};
