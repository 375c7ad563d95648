//! SMS spam classification core.
//!
//! A message goes through three stages:
//!
//! 1. [`analyzer`]: lowercase, tokenize, filter and stem the raw text
//! 2. [`model`]: map the stems to a TF-IDF vector and score it with a
//!    Multinomial Naive Bayes model
//! 3. [`predictor`]: bundle both into a [`SpamDetector`] returning a
//!    [`Prediction`]
//!
//! ```no_run
//! use smsguard_core::{ClassifierConfig, ModelState};
//!
//! let state = ModelState::load(&ClassifierConfig::default());
//! match state.predict("WINNER!! Claim your prize now!") {
//!     Ok(prediction) => println!("{prediction}"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

pub mod analyzer;
pub mod error;
pub mod model;
pub mod predictor;

pub use analyzer::{normalize, TextNormalizer};
pub use error::{Result, SmsGuardError};
pub use model::ModelState;
pub use predictor::{ModelStats, SpamDetector};
pub use smsguard_types::{ClassifierConfig, Label, Prediction};
