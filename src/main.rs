use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use survey_stats::dataset::{FEMALE, HAVE_ASKED, HESITATED, MALE, NEVER_ASKED};
use survey_stats::normalize::Answer;
use survey_stats::{read_config, Config, SurveyDataset};

/// Counts and overlaps over a gender survey export.
#[derive(Parser)]
#[command(name = "survey-stats", version, about)]
struct Cli {
    /// Survey export: 9-column CSV without a header row
    #[arg(env = "SURVEY_DATA", default_value = "data/survey_responses.csv")]
    data: PathBuf,

    /// TOML file overriding the status and reason-code tables
    #[arg(long, env = "SURVEY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the gender split, the known keys and a fixed set of counts (default)
    Report,

    /// List every key that can be counted
    Keys,

    /// Number of respondents under one key
    Count {
        /// e.g. "F", "grad", "never asked", "nervous"
        key: String,
    },

    /// Number of respondents under both keys
    Overlap { first: String, second: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("survey_stats=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => read_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    info!(path = %cli.data.display(), "loading survey export");
    let dataset = SurveyDataset::load(&cli.data, &config)
        .with_context(|| format!("failed to load survey {}", cli.data.display()))?;

    match cli.command.unwrap_or(Commands::Report) {
        Commands::Report => report(&dataset)?,
        Commands::Keys => {
            for key in dataset.category_keys() {
                println!("{key}");
            }
        }
        Commands::Count { key } => println!("{}", dataset.count(&key)?),
        Commands::Overlap { first, second } => {
            println!("{}", dataset.overlap(&first, &second)?)
        }
    }

    Ok(())
}

fn report(dataset: &SurveyDataset) -> Result<()> {
    let split = dataset.gender_split();
    println!("respondents: {}", dataset.len());
    println!("gender split: M={} F={}", split.m, split.f);

    let keys: Vec<&str> = dataset.category_keys().into_iter().collect();
    println!("keys: {}", keys.join(", "));

    println!("{NEVER_ASKED}: {}", dataset.count(NEVER_ASKED)?);
    println!("{HAVE_ASKED}: {}", dataset.count(HAVE_ASKED)?);

    let columns = dataset.columns();
    let answer_columns = [
        ("have_asked", &columns.have_asked),
        ("hesitated", &columns.hesitated),
    ];
    for (field, answers) in answer_columns {
        let unexpected: Vec<String> = answers
            .iter()
            .filter(|answer| matches!(answer, Answer::Other(_)))
            .map(|answer| answer.to_string())
            .collect();
        if !unexpected.is_empty() {
            println!("{field} answers outside Y/N: {}", unexpected.join(" "));
        }
    }

    for gender in [MALE, FEMALE] {
        println!(
            "{gender} & {HAVE_ASKED}: {}  {gender} & {HESITATED}: {}",
            dataset.overlap(gender, HAVE_ASKED)?,
            dataset.overlap(gender, HESITATED)?,
        );
    }

    println!("reasons for not asking (M / F):");
    for code in dataset.reason_codes() {
        println!(
            "  {code}: {} / {}",
            dataset.overlap(code, MALE)?,
            dataset.overlap(code, FEMALE)?,
        );
    }

    Ok(())
}
