use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use serde_json::json;
use smsguard_core::{
    normalize, ClassifierConfig, Label, ModelState, SmsGuardError, SpamDetector, TextNormalizer,
};
use tempfile::TempDir;

const TERMS: [&str; 10] = [
    "call", "claim", "free", "hey", "lunch", "meet", "prize", "tomorrow", "txt", "winner",
];

fn write_models(dir: &Path) {
    let vocabulary: serde_json::Map<String, serde_json::Value> = TERMS
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), i.into()))
        .collect();
    let vectorizer = json!({
        "vocabulary": vocabulary,
        "idf": [1.4, 2.1, 1.7, 2.3, 2.6, 2.4, 2.2, 2.0, 2.5, 2.8],
        "sublinear_tf": false,
        "norm": "l2",
    });

    let ham: Vec<f64> = [0.10, 0.01, 0.03, 0.18, 0.20, 0.20, 0.01, 0.24, 0.02, 0.01]
        .iter()
        .map(|p: &f64| p.ln())
        .collect();
    let spam: Vec<f64> = [0.16, 0.12, 0.18, 0.01, 0.01, 0.01, 0.17, 0.01, 0.15, 0.18]
        .iter()
        .map(|p: &f64| p.ln())
        .collect();
    let model = json!({
        "classes": [0, 1],
        "class_log_prior": [0.866f64.ln(), 0.134f64.ln()],
        "feature_log_prob": [ham, spam],
    });

    fs::write(dir.join("vectorizer.json"), vectorizer.to_string()).unwrap();
    fs::write(dir.join("model.json"), model.to_string()).unwrap();
}

fn ready_state() -> (TempDir, ModelState) {
    let dir = TempDir::new().unwrap();
    write_models(dir.path());
    let state = ModelState::load(&ClassifierConfig::with_model_dir(dir.path()));
    (dir, state)
}

#[test]
fn spam_and_ham_examples() {
    let (_dir, state) = ready_state();
    assert!(state.is_ready());

    let spam = state
        .predict(
            "WINNER!! As a valued customer, you have been selected to receive a £900 prize \
             reward! Call now!",
        )
        .unwrap();
    assert_eq!(spam.label, Label::Spam);
    assert!(spam.confidence > 50.0);
    assert_eq!(spam.processed, "winner valu custom select receiv prize reward call");

    let ham = state
        .predict("Hey, are we still meeting for lunch tomorrow at 12pm?")
        .unwrap();
    assert_eq!(ham.label, Label::Ham);
    assert_eq!(ham.processed, "hey still meet lunch tomorrow 12pm");
    assert!((ham.probabilities[0] + ham.probabilities[1] - 1.0).abs() < 1e-9);
}

#[test]
fn confidence_is_max_probability() {
    let (_dir, state) = ready_state();
    let p = state.predict("FREE entry! txt CLAIM to win").unwrap();
    let max = p.probabilities[0].max(p.probabilities[1]);
    assert!((p.confidence - max * 100.0).abs() < 1e-9);
}

#[test]
fn missing_models_disable_predictions() {
    let dir = TempDir::new().unwrap();
    let state = ModelState::load(&ClassifierConfig::with_model_dir(dir.path()));

    assert!(!state.is_ready());
    assert!(matches!(
        state.predict("hello"),
        Err(SmsGuardError::ModelUnavailable(_))
    ));

    // The normalizer keeps working without models.
    assert_eq!(normalize("Call NOW!"), "call");
}

#[test]
fn corrupt_artifact_is_reported() {
    let dir = TempDir::new().unwrap();
    write_models(dir.path());
    fs::write(dir.path().join("model.json"), "{ not json").unwrap();

    let config = ClassifierConfig::with_model_dir(dir.path());
    match SpamDetector::from_files(&config) {
        Err(SmsGuardError::Json { path, .. }) => assert!(path.ends_with("model.json")),
        other => panic!("expected a parse error, got {other:?}"),
    }
    assert!(!ModelState::load(&config).is_ready());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    write_models(dir.path());
    fs::remove_file(dir.path().join("vectorizer.json")).unwrap();

    let err = SpamDetector::from_files(&ClassifierConfig::with_model_dir(dir.path())).unwrap_err();
    assert!(matches!(err, SmsGuardError::Io { .. }));
    assert!(err.to_string().contains("vectorizer.json"));
}

#[test]
fn mismatched_feature_counts_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_models(dir.path());
    let vectorizer = json!({ "vocabulary": { "call": 0 }, "idf": [1.0] });
    fs::write(dir.path().join("vectorizer.json"), vectorizer.to_string()).unwrap();

    let err = SpamDetector::from_files(&ClassifierConfig::with_model_dir(dir.path())).unwrap_err();
    assert!(matches!(err, SmsGuardError::InvalidModel(_)));
}

#[test]
fn custom_file_names() {
    let dir = TempDir::new().unwrap();
    write_models(dir.path());
    fs::rename(dir.path().join("model.json"), dir.path().join("nb.json")).unwrap();

    let config: ClassifierConfig = serde_json::from_value(json!({
        "model_dir": dir.path(),
        "model_file": "nb.json",
    }))
    .unwrap();
    assert_eq!(config.vectorizer_file, "vectorizer.json");
    assert!(ModelState::load(&config).is_ready());
}

#[test]
fn empty_message_is_rejected() {
    let (_dir, state) = ready_state();
    assert!(matches!(state.predict("   "), Err(SmsGuardError::EmptyMessage)));
}

#[test]
fn concurrent_predictions_match_sequential() {
    let (_dir, state) = ready_state();
    let detector = Arc::clone(state.detector().unwrap());

    let inputs: Vec<String> = (0..12)
        .map(|i| {
            if i % 2 == 0 {
                format!("URGENT {i}: claim your FREE prize, txt WIN now")
            } else {
                format!("hey, lunch tomorrow at {i}? let's meet")
            }
        })
        .collect();
    let expected: Vec<_> = inputs.iter().map(|t| detector.predict(t).unwrap()).collect();

    let handles: Vec<_> = inputs
        .into_iter()
        .map(|text| {
            let detector = Arc::clone(&detector);
            thread::spawn(move || detector.predict(&text).unwrap())
        })
        .collect();

    for (handle, want) in handles.into_iter().zip(expected) {
        assert_eq!(handle.join().unwrap(), want);
    }
}

#[test]
fn shared_and_owned_normalizers_agree() {
    let owned = TextNormalizer::default();
    for text in ["Free msg: Txt STOP to end", "I'll be there in 5 mins.", ""] {
        assert_eq!(owned.normalize(text), normalize(text));
    }
}
