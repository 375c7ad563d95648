//! SMS Spam Classifier
//!
//! Command-line front end for the classifier. Messages come from the
//! arguments, or from stdin one per line when none are given.
//!
//! ## Usage
//!
//! ```bash
//! # Classify a message with models from ./MODELS
//! sms_classify "WINNER!! Claim your prize now!"
//!
//! # Read messages from stdin and emit JSON lines
//! cat inbox.txt | sms_classify --json
//!
//! # Use a different model directory
//! SMSGUARD_MODEL_DIR=/srv/models sms_classify --show-processed "See you at 12pm?"
//!
//! # Only run the preprocessing pipeline (no models needed)
//! sms_classify normalize "Hey, are we still meeting for lunch?"
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: every message was processed
//! - `1`: invalid arguments or unreadable input
//! - `2`: models could not be loaded

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smsguard_core::model::read_json;
use smsguard_core::{
    normalize, ClassifierConfig, Label, ModelState, Prediction, SmsGuardError, SpamDetector,
};

/// Classify SMS messages as spam or ham.
#[derive(Debug, Parser)]
#[command(version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    classify: ClassifyArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the normalized text without classifying it.
    Normalize {
        /// Text to normalize; read from stdin line by line when omitted.
        text: Vec<String>,
    },
}

#[derive(Debug, clap::Args)]
struct ClassifyArgs {
    /// JSON file with model locations; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the model artifacts.
    #[arg(long, env = "SMSGUARD_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Vectorizer artifact file name inside the model directory.
    #[arg(long)]
    vectorizer: Option<String>,

    /// Classifier artifact file name inside the model directory.
    #[arg(long)]
    model: Option<String>,

    /// Also print the preprocessed text and lengths.
    #[arg(long)]
    show_processed: bool,

    /// Emit one JSON object per message.
    #[arg(long)]
    json: bool,

    /// Messages to classify; read from stdin line by line when omitted.
    messages: Vec<String>,
}

impl ClassifyArgs {
    fn classifier_config(&self) -> Result<ClassifierConfig> {
        let mut config = match &self.config {
            Some(path) => read_json::<ClassifierConfig>(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ClassifierConfig::default(),
        };

        if let Some(dir) = &self.model_dir {
            config.model_dir = dir.clone();
        }
        if let Some(file) = &self.vectorizer {
            config.vectorizer_file = file.clone();
        }
        if let Some(file) = &self.model {
            config.model_file = file.clone();
        }
        Ok(config)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    message: &'a str,
    #[serde(flatten)]
    prediction: &'a Prediction,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smsguard_core=info,sms_classify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Yields the given messages, or stdin lines when there are none.
fn for_each_message<F>(messages: &[String], mut f: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    if !messages.is_empty() {
        return messages.iter().try_for_each(|m| f(m));
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        f(&line)?;
    }
    Ok(())
}

fn run_normalize(text: &[String]) -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    for_each_message(text, |message| {
        writeln!(out, "{}", normalize(message))?;
        Ok(())
    })?;
    Ok(ExitCode::SUCCESS)
}

fn print_prediction(
    out: &mut impl Write,
    prediction: &Prediction,
    show_processed: bool,
) -> Result<()> {
    match prediction.label {
        Label::Spam => {
            writeln!(out, "SPAM (confidence {:.2}%)", prediction.confidence)?;
            writeln!(out, "This message appears to be spam. Be cautious!")?;
        }
        Label::Ham => {
            writeln!(out, "NOT SPAM (HAM) (confidence {:.2}%)", prediction.confidence)?;
            writeln!(out, "This message appears to be legitimate!")?;
        }
    }

    if show_processed {
        writeln!(out, "Preprocessed    : {}", prediction.processed)?;
        writeln!(out, "Original length : {}", prediction.original_len)?;
        writeln!(out, "Processed length: {}", prediction.processed_len)?;
    }
    Ok(())
}

fn classify(detector: &SpamDetector, args: &ClassifyArgs) -> Result<()> {
    let mut out = io::stdout().lock();

    for_each_message(&args.messages, |message| {
        let prediction = match detector.predict(message) {
            Ok(prediction) => prediction,
            Err(SmsGuardError::EmptyMessage) => {
                warn!("Please enter a message to classify!");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        if args.json {
            let report = Report {
                message,
                prediction: &prediction,
            };
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        } else {
            print_prediction(&mut out, &prediction, args.show_processed)?;
        }
        Ok(())
    })
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    if let Some(Command::Normalize { text }) = &cli.command {
        return run_normalize(text);
    }

    let config = cli.classify.classifier_config()?;
    info!("Starting sms_classify v{}", env!("CARGO_PKG_VERSION"));

    let state = ModelState::load(&config);
    let detector = match state.detector() {
        Ok(detector) => detector,
        Err(err) => {
            eprintln!(
                "error: model files not found or unusable; ensure '{}' and '{}' exist ({})",
                config.vectorizer_path().display(),
                config.model_path().display(),
                err
            );
            return Ok(ExitCode::from(2));
        }
    };

    classify(detector, &cli.classify)?;
    Ok(ExitCode::SUCCESS)
}
