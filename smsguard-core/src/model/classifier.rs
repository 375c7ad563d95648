//! Multinomial Naive Bayes classifier.
//!
//! Scores a TF-IDF vector against the two fitted classes:
//!
//! ```text
//! jll[c]   = class_log_prior[c] + Σ x[j] * feature_log_prob[c][j]
//! P(c | x) = exp(jll[c] - logsumexp(jll))
//! ```
//!
//! The parameters come from a JSON artifact. Rows are stored by class id,
//! so row 0 is always ham and row 1 always spam regardless of the order the
//! artifact lists them in.

use serde::{Deserialize, Serialize};
use smsguard_types::Label;

use super::vectorizer::SparseVector;
use crate::error::{Result, SmsGuardError};

/// On-disk layout of a fitted Multinomial Naive Bayes model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Class ids, one per row of the tables below.
    pub classes: Vec<i64>,
    /// Log prior per class.
    pub class_log_prior: Vec<f64>,
    /// Log probability of every feature given the class, one row per class.
    pub feature_log_prob: Vec<Vec<f64>>,
}

/// Fitted binary Multinomial Naive Bayes model.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
}

impl NaiveBayes {
    /// Validates an artifact and orders its rows by class id.
    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self> {
        let ClassifierArtifact {
            classes,
            class_log_prior,
            feature_log_prob,
        } = artifact;

        if classes.len() != 2 {
            return Err(SmsGuardError::invalid(format!(
                "expected 2 classes, found {}",
                classes.len()
            )));
        }
        if class_log_prior.len() != 2 || feature_log_prob.len() != 2 {
            return Err(SmsGuardError::invalid(
                "class_log_prior and feature_log_prob need one entry per class",
            ));
        }

        let mut labels = [Label::Ham; 2];
        for (slot, &class) in labels.iter_mut().zip(&classes) {
            *slot = Label::from_class(class).ok_or_else(|| {
                SmsGuardError::invalid(format!("unknown class {class}, expected 0 or 1"))
            })?;
        }
        if labels[0] == labels[1] {
            return Err(SmsGuardError::invalid("classes must be exactly 0 and 1"));
        }

        let n_features = feature_log_prob[0].len();
        if n_features == 0 || feature_log_prob[1].len() != n_features {
            return Err(SmsGuardError::invalid(
                "feature_log_prob rows must be non-empty and of equal length",
            ));
        }
        let finite = class_log_prior
            .iter()
            .chain(feature_log_prob.iter().flatten())
            .all(|v| v.is_finite());
        if !finite {
            return Err(SmsGuardError::invalid("log probabilities must be finite"));
        }

        let mut prior = [0.0; 2];
        let mut rows: [Vec<f64>; 2] = Default::default();
        for ((label, lp), row) in labels.into_iter().zip(class_log_prior).zip(feature_log_prob) {
            prior[label.class_id()] = lp;
            rows[label.class_id()] = row;
        }

        Ok(Self {
            class_log_prior: prior,
            feature_log_prob: rows,
        })
    }

    /// Number of features each row scores.
    #[inline]
    pub fn num_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    /// Log prior of each class, indexed by class id.
    #[inline]
    pub fn class_log_prior(&self) -> [f64; 2] {
        self.class_log_prior
    }

    /// Unnormalized log posterior of each class.
    pub fn joint_log_likelihood(&self, x: &SparseVector) -> [f64; 2] {
        [0, 1].map(|c| self.class_log_prior[c] + x.dot(&self.feature_log_prob[c]))
    }

    /// Posterior probability of each class, summing to 1.
    pub fn predict_proba(&self, x: &SparseVector) -> [f64; 2] {
        let jll = self.joint_log_likelihood(x);
        let max = jll[0].max(jll[1]);
        let log_norm = max + jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
        jll.map(|v| (v - log_norm).exp())
    }

    /// Most probable label; ham on an exact tie.
    pub fn predict(&self, x: &SparseVector) -> Label {
        let jll = self.joint_log_likelihood(x);
        if jll[Label::Spam.class_id()] > jll[Label::Ham.class_id()] {
            Label::Spam
        } else {
            Label::Ham
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> NaiveBayes {
        NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![0, 1],
            class_log_prior: vec![0.8f64.ln(), 0.2f64.ln()],
            feature_log_prob: vec![
                vec![0.5f64.ln(), 0.4f64.ln(), 0.1f64.ln()],
                vec![0.1f64.ln(), 0.2f64.ln(), 0.7f64.ln()],
            ],
        })
        .unwrap()
    }

    #[test]
    fn empty_vector_returns_priors() {
        let p = model().predict_proba(&SparseVector::default());
        assert!((p[0] - 0.8).abs() < 1e-12);
        assert!((p[1] - 0.2).abs() < 1e-12);
        assert_eq!(model().predict(&SparseVector::default()), Label::Ham);
    }

    #[test]
    fn spammy_feature_flips_label() {
        let x = SparseVector::from_sorted(vec![(2, 1.0)]);
        let m = model();
        let p = m.predict_proba(&x);

        let spam = 0.2 * 0.7;
        let ham = 0.8 * 0.1;
        assert!((p[1] - spam / (spam + ham)).abs() < 1e-12);
        assert_eq!(m.predict(&x), Label::Spam);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let m = model();
        let x = SparseVector::from_sorted(vec![(0, 0.3), (1, 0.5), (2, 0.8)]);
        let p = m.predict_proba(&x);
        assert!((p[0] + p[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn extreme_scores_stay_finite() {
        let m = model();
        let x = SparseVector::from_sorted(vec![(2, 5000.0)]);
        let p = m.predict_proba(&x);
        assert!(p.iter().all(|v| v.is_finite()));
        assert!((p[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rows_are_ordered_by_class_id() {
        let m = NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![1, 0],
            class_log_prior: vec![0.2f64.ln(), 0.8f64.ln()],
            feature_log_prob: vec![vec![0.9f64.ln()], vec![0.1f64.ln()]],
        })
        .unwrap();
        assert!((m.class_log_prior()[0] - 0.8f64.ln()).abs() < 1e-12);
        assert_eq!(m.predict(&SparseVector::from_sorted(vec![(0, 1.0)])), Label::Spam);
    }

    #[test]
    fn tie_goes_to_ham() {
        let m = NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![0, 1],
            class_log_prior: vec![0.5f64.ln(), 0.5f64.ln()],
            feature_log_prob: vec![vec![0.5f64.ln()], vec![0.5f64.ln()]],
        })
        .unwrap();
        let x = SparseVector::from_sorted(vec![(0, 1.0)]);
        assert_eq!(m.predict(&x), Label::Ham);
        let p = m.predict_proba(&x);
        assert_eq!(p[0], p[1]);
        assert!((p[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_unknown_class() {
        let err = NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![0, 2],
            class_log_prior: vec![0.0, 0.0],
            feature_log_prob: vec![vec![0.0], vec![0.0]],
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown class 2"));
    }

    #[test]
    fn rejects_duplicate_class() {
        assert!(NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![1, 1],
            class_log_prior: vec![0.0, 0.0],
            feature_log_prob: vec![vec![0.0], vec![0.0]],
        })
        .is_err());
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!(NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![0, 1],
            class_log_prior: vec![0.0, 0.0],
            feature_log_prob: vec![vec![0.0, 0.0], vec![0.0]],
        })
        .is_err());
    }

    #[test]
    fn rejects_three_classes() {
        assert!(NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![0, 1, 2],
            class_log_prior: vec![0.0; 3],
            feature_log_prob: vec![vec![0.0]; 3],
        })
        .is_err());
    }

    #[test]
    fn rejects_infinite_log_prob() {
        assert!(NaiveBayes::from_artifact(ClassifierArtifact {
            classes: vec![0, 1],
            class_log_prior: vec![0.0, f64::NEG_INFINITY],
            feature_log_prob: vec![vec![0.0], vec![0.0]],
        })
        .is_err());
    }
}
