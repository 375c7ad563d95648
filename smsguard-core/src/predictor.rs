//! Spam detection front end.
//!
//! [`SpamDetector`] chains the three stages every message goes through:
//! normalize the raw text, turn the stems into a TF-IDF vector, and score
//! that vector with the classifier.

use smsguard_types::{ClassifierConfig, Prediction};
use tracing::debug;

use crate::analyzer::{is_space, TextNormalizer};
use crate::error::{Result, SmsGuardError};
use crate::model::{NaiveBayes, TfidfVectorizer};

/// A snapshot of the loaded models.
#[derive(Debug, Clone, Copy)]
pub struct ModelStats {
    /// Number of vocabulary features.
    pub num_features: usize,
    /// Prior probability of each class, indexed by class id.
    pub class_prior: [f64; 2],
}

/// Normalizer, vectorizer and classifier bundled for inference.
///
/// Holds immutable data only; wrap it in an `Arc` to share it between
/// threads.
#[derive(Debug, Clone)]
pub struct SpamDetector {
    normalizer: TextNormalizer,
    vectorizer: TfidfVectorizer,
    classifier: NaiveBayes,
}

impl SpamDetector {
    /// Bundles the three stages.
    ///
    /// # Errors
    ///
    /// Returns `SmsGuardError::InvalidModel` if the vectorizer and classifier
    /// disagree on the number of features.
    pub fn new(
        normalizer: TextNormalizer,
        vectorizer: TfidfVectorizer,
        classifier: NaiveBayes,
    ) -> Result<Self> {
        if vectorizer.num_features() != classifier.num_features() {
            return Err(SmsGuardError::invalid(format!(
                "vectorizer has {} features but classifier expects {}",
                vectorizer.num_features(),
                classifier.num_features()
            )));
        }
        Ok(Self {
            normalizer,
            vectorizer,
            classifier,
        })
    }

    /// Loads both artifacts named by `config` with the default normalizer.
    pub fn from_files(config: &ClassifierConfig) -> Result<Self> {
        let vectorizer = TfidfVectorizer::load(config.vectorizer_path())?;
        let classifier = NaiveBayes::load(config.model_path())?;
        Self::new(TextNormalizer::default(), vectorizer, classifier)
    }

    /// The normalizer applied to incoming text.
    #[inline]
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Returns model statistics.
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            num_features: self.vectorizer.num_features(),
            class_prior: self.classifier.class_log_prior().map(f64::exp),
        }
    }

    /// Classifies one message.
    ///
    /// # Errors
    ///
    /// Returns `SmsGuardError::EmptyMessage` for empty or whitespace-only
    /// input. Whitespace is what the tokenizer splits on, information
    /// separators included.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        if text.chars().all(is_space) {
            return Err(SmsGuardError::EmptyMessage);
        }

        let processed = self.normalizer.normalize(text);
        let features = self.vectorizer.transform(&processed);
        let probabilities = self.classifier.predict_proba(&features);
        let prediction = Prediction::from_probabilities(probabilities, text, processed);

        debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            features = features.len(),
            "Classified message"
        );
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassifierArtifact, VectorizerArtifact};
    use smsguard_types::Label;
    use std::sync::Arc;
    use std::thread;

    fn detector() -> SpamDetector {
        let terms = ["call", "claim", "free", "lunch", "meet", "prize", "tomorrow", "winner"];
        let vocabulary: serde_json::Map<String, serde_json::Value> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i.into()))
            .collect();
        let vectorizer: VectorizerArtifact = serde_json::from_value(serde_json::json!({
            "vocabulary": vocabulary,
            "idf": [1.2, 1.8, 1.5, 2.0, 2.0, 2.2, 1.9, 2.5],
        }))
        .unwrap();

        let ham = [0.12, 0.02, 0.04, 0.25, 0.25, 0.02, 0.28, 0.02];
        let spam = [0.2, 0.15, 0.2, 0.02, 0.02, 0.18, 0.03, 0.2];
        let classifier = ClassifierArtifact {
            classes: vec![0, 1],
            class_log_prior: vec![0.87f64.ln(), 0.13f64.ln()],
            feature_log_prob: vec![
                ham.iter().map(|p: &f64| p.ln()).collect(),
                spam.iter().map(|p: &f64| p.ln()).collect(),
            ],
        };

        SpamDetector::new(
            TextNormalizer::default(),
            TfidfVectorizer::from_artifact(vectorizer).unwrap(),
            NaiveBayes::from_artifact(classifier).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn prize_message_is_spam() {
        let p = detector()
            .predict(
                "WINNER!! As a valued customer, you have been selected to receive a £900 \
                 prize reward! Call now!",
            )
            .unwrap();
        assert_eq!(p.label, Label::Spam);
        assert_eq!(p.processed, "winner valu custom select receiv prize reward call");
        assert!(p.confidence > 50.0 && p.confidence <= 100.0);
    }

    #[test]
    fn lunch_message_is_ham() {
        let p = detector()
            .predict("Hey, are we still meeting for lunch tomorrow at 12pm?")
            .unwrap();
        assert_eq!(p.label, Label::Ham);
        assert_eq!(p.processed, "hey still meet lunch tomorrow 12pm");
        assert_eq!(p.original_len, 53);
        assert_eq!(p.processed_len, 34);
    }

    #[test]
    fn empty_message_is_rejected() {
        assert!(matches!(detector().predict(""), Err(SmsGuardError::EmptyMessage)));
        assert!(matches!(detector().predict(" \n\t "), Err(SmsGuardError::EmptyMessage)));
        assert!(matches!(
            detector().predict("\u{1c}\u{1f} \u{1d}"),
            Err(SmsGuardError::EmptyMessage)
        ));
    }

    #[test]
    fn message_without_known_terms_uses_priors() {
        let p = detector().predict("!!!").unwrap();
        assert_eq!(p.processed, "");
        assert_eq!(p.label, Label::Ham);
        assert!((p.probabilities[1] - 0.13).abs() < 1e-9);
    }

    #[test]
    fn feature_mismatch_is_rejected() {
        let vectorizer = TfidfVectorizer::from_artifact(
            serde_json::from_str(r#"{"vocabulary": {"call": 0}, "idf": [1.0]}"#).unwrap(),
        )
        .unwrap();
        let classifier = NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![0, 1],
            class_log_prior: vec![0.5f64.ln(); 2],
            feature_log_prob: vec![vec![0.5f64.ln(); 2]; 2],
        })
        .unwrap();

        let err = SpamDetector::new(TextNormalizer::default(), vectorizer, classifier).unwrap_err();
        assert!(matches!(err, SmsGuardError::InvalidModel(_)));
    }

    #[test]
    fn stats_report_priors() {
        let stats = detector().stats();
        assert_eq!(stats.num_features, 8);
        assert!((stats.class_prior[1] - 0.13).abs() < 1e-12);
    }

    #[test]
    fn shared_across_threads() {
        let detector = Arc::new(detector());
        let inputs = ["FREE prize, claim now", "lunch tomorrow?", "call the winner line"];
        let expected: Vec<_> = inputs.iter().map(|t| detector.predict(t).unwrap()).collect();

        let handles: Vec<_> = inputs
            .iter()
            .map(|t| {
                let detector = Arc::clone(&detector);
                let text = t.to_string();
                thread::spawn(move || detector.predict(&text).unwrap())
            })
            .collect();

        for (handle, want) in handles.into_iter().zip(expected) {
            assert_eq!(handle.join().unwrap(), want);
        }
    }
}
