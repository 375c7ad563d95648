//! Artifact loading and the process-wide model state.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use smsguard_types::{ClassifierConfig, Prediction};
use tracing::{info, warn};

use super::classifier::NaiveBayes;
use super::vectorizer::TfidfVectorizer;
use crate::error::{Result, SmsGuardError};
use crate::predictor::SpamDetector;

/// Reads and deserializes a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| SmsGuardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| SmsGuardError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl TfidfVectorizer {
    /// Loads a vectorizer artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_artifact(read_json(path.as_ref())?)
    }
}

impl NaiveBayes {
    /// Loads a classifier artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_artifact(read_json(path.as_ref())?)
    }
}

/// Outcome of loading the models once at startup.
///
/// Loading never fails hard: a missing or broken artifact leaves the
/// application running with predictions disabled.
#[derive(Debug, Clone)]
pub enum ModelState {
    /// Both artifacts loaded and agree on the feature space.
    Ready(Arc<SpamDetector>),
    /// Predictions are disabled.
    Unavailable {
        /// Why loading failed.
        reason: String,
    },
}

impl ModelState {
    /// Loads both artifacts named by `config`.
    pub fn load(config: &ClassifierConfig) -> Self {
        match SpamDetector::from_files(config) {
            Ok(detector) => {
                let stats = detector.stats();
                info!(
                    features = stats.num_features,
                    spam_prior = stats.class_prior[1],
                    "Loaded models from {}",
                    config.model_dir.display()
                );
                ModelState::Ready(Arc::new(detector))
            }
            Err(err) => {
                warn!(
                    "Models unavailable ({} and {}): {}",
                    config.vectorizer_path().display(),
                    config.model_path().display(),
                    err
                );
                ModelState::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Returns `true` if predictions can be made.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }

    /// The loaded detector.
    ///
    /// # Errors
    ///
    /// Returns `SmsGuardError::ModelUnavailable` when loading failed.
    pub fn detector(&self) -> Result<&Arc<SpamDetector>> {
        match self {
            ModelState::Ready(detector) => Ok(detector),
            ModelState::Unavailable { reason } => {
                Err(SmsGuardError::ModelUnavailable(reason.clone()))
            }
        }
    }

    /// Classifies `text` with the loaded detector.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        self.detector()?.predict(text)
    }
}
