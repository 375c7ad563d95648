//! Fitted model artifacts.
//!
//! Both models are trained elsewhere and exported as JSON:
//! - **Vectorizer**: TF-IDF weights over a fixed vocabulary
//! - **Classifier**: binary Multinomial Naive Bayes
//! - **Loader**: reads the artifacts once and records whether predictions
//!   are available
//!
//! Everything here is immutable after loading and can be shared across
//! threads.

mod classifier;
mod loader;
mod vectorizer;

pub use classifier::{ClassifierArtifact, NaiveBayes};
pub use loader::{read_json, ModelState};
pub use vectorizer::{Norm, SparseVector, TfidfVectorizer, VectorizerArtifact, DEFAULT_TOKEN_PATTERN};
