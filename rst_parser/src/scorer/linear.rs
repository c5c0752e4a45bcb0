//! Multinomial logistic regression over sparse feature counts

use super::{ActionScorer, ScorerError};
use crate::config::compile_time::scorer::{MAX_ACTION_LABELS, MAX_MODEL_BYTES};
use crate::features::FeatureCounts;
use crate::grammar::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Linear model loaded from a JSON weight file.
///
/// ```json
/// { "labels": ["S:text", "B:ROOT"],
///   "intercepts": [0.1, -0.3],
///   "weights": { "PREV:S:text": [0.5, -0.5] } }
/// ```
///
/// Scores are `ln softmax(b + Σ count(f) · w_f)`. Features without a
/// weight row contribute nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    labels: Vec<String>,
    intercepts: Vec<f64>,
    #[serde(default)]
    weights: HashMap<String, Vec<f64>>,
}

impl LinearModel {
    pub fn new(
        labels: Vec<String>,
        intercepts: Vec<f64>,
        weights: HashMap<String, Vec<f64>>,
    ) -> Result<Self, ScorerError> {
        let model = Self {
            labels,
            intercepts,
            weights,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ScorerError> {
        let model: LinearModel =
            serde_json::from_str(content).map_err(|e| ScorerError::invalid_model(&e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScorerError> {
        let io_error = |e: std::io::Error| ScorerError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let size = std::fs::metadata(path).map_err(io_error)?.len();
        if size > MAX_MODEL_BYTES {
            return Err(ScorerError::invalid_model(&format!(
                "model file is {} bytes (max: {})",
                size, MAX_MODEL_BYTES
            )));
        }

        let content = std::fs::read_to_string(path).map_err(io_error)?;
        Self::from_json_str(&content)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn feature_count(&self) -> usize {
        self.weights.len()
    }

    fn validate(&self) -> Result<(), ScorerError> {
        if self.labels.is_empty() {
            return Err(ScorerError::NoActionLabels);
        }
        if self.labels.len() > MAX_ACTION_LABELS {
            return Err(ScorerError::invalid_model(&format!(
                "{} action labels (max: {})",
                self.labels.len(),
                MAX_ACTION_LABELS
            )));
        }
        for label in &self.labels {
            label.parse::<Action>()?;
        }

        if self.intercepts.len() != self.labels.len() {
            return Err(ScorerError::invalid_model(&format!(
                "{} intercepts for {} labels",
                self.intercepts.len(),
                self.labels.len()
            )));
        }
        if let Some((feature, row)) = self
            .weights
            .iter()
            .find(|(_, row)| row.len() != self.labels.len())
        {
            return Err(ScorerError::invalid_model(&format!(
                "weight row for {:?} has {} entries, expected {}",
                feature,
                row.len(),
                self.labels.len()
            )));
        }
        Ok(())
    }
}

impl ActionScorer for LinearModel {
    fn action_labels(&self) -> &[String] {
        &self.labels
    }

    fn score(&self, features: &FeatureCounts) -> Result<Vec<f64>, ScorerError> {
        let mut logits = self.intercepts.clone();
        for (feature, count) in features.iter() {
            if let Some(row) = self.weights.get(feature) {
                let count = f64::from(count);
                for (logit, weight) in logits.iter_mut().zip(row) {
                    *logit += count * weight;
                }
            }
        }
        Ok(log_softmax(&logits))
    }
}

fn log_softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let log_sum = logits.iter().map(|z| (z - max).exp()).sum::<f64>().ln() + max;
    logits.iter().map(|z| z - log_sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    const MODEL: &str = r#"{
        "labels": ["S:text", "U:nucleus:span", "B:ROOT"],
        "intercepts": [0.0, 0.0, 0.0],
        "weights": {
            "PREV:S:text": [2.0, 0.0, -1.0],
            "S0nt:text": [0.0, 1.5, 0.0]
        }
    }"#;

    fn counts(features: &[&str]) -> FeatureCounts {
        FeatureCounts::from_features(features.iter().copied())
    }

    #[test]
    fn test_scores_are_log_probabilities() {
        let model = LinearModel::from_json_str(MODEL).unwrap();
        let scores = model.score(&counts(&["PREV:S:text", "unseen"])).unwrap();

        assert_eq!(scores.len(), 3);
        let total: f64 = scores.iter().map(|s| s.exp()).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(scores.iter().all(|s| *s <= 0.0));
        assert!(scores[0] > scores[1] && scores[1] > scores[2]);
    }

    #[test]
    fn test_feature_counts_scale_weights() {
        let model = LinearModel::from_json_str(MODEL).unwrap();
        let once = model.score(&counts(&["S0nt:text"])).unwrap();
        let twice = model.score(&counts(&["S0nt:text", "S0nt:text"])).unwrap();
        assert!(twice[1] > once[1]);
    }

    #[test]
    fn test_empty_features_give_uniform_scores() {
        let model = LinearModel::from_json_str(MODEL).unwrap();
        let scores = model.score(&FeatureCounts::default()).unwrap();
        let expected = -(3.0f64).ln();
        assert!(scores.iter().all(|s| (s - expected).abs() < 1e-9));
    }

    #[test]
    fn test_large_logits_stay_finite() {
        assert!(log_softmax(&[1000.0, 0.0, -1000.0]).iter().all(|s| s.is_finite()));
        assert!(log_softmax(&[1000.0, 999.0])[0].is_finite());
    }

    #[test]
    fn test_invalid_models_rejected() {
        let mismatched = r#"{"labels": ["S:text", "B:ROOT"], "intercepts": [0.0]}"#;
        assert_matches!(
            LinearModel::from_json_str(mismatched),
            Err(ScorerError::InvalidModel { .. })
        );

        let bad_row = r#"{"labels": ["S:text"], "intercepts": [0.0], "weights": {"f": [1.0, 2.0]}}"#;
        assert_matches!(
            LinearModel::from_json_str(bad_row),
            Err(ScorerError::InvalidModel { .. })
        );

        let bad_label = r#"{"labels": ["X:text"], "intercepts": [0.0]}"#;
        assert_matches!(LinearModel::from_json_str(bad_label), Err(ScorerError::Label(_)));

        let empty = r#"{"labels": [], "intercepts": []}"#;
        assert_matches!(LinearModel::from_json_str(empty), Err(ScorerError::NoActionLabels));

        assert_matches!(
            LinearModel::from_json_str("not json"),
            Err(ScorerError::InvalidModel { .. })
        );
    }

    #[test]
    fn test_model_file_loading() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", MODEL).unwrap();

        let model = LinearModel::from_file(file.path()).unwrap();
        assert_eq!(model.label_count(), 3);
        assert_eq!(model.feature_count(), 2);
        assert_eq!(model.action_labels()[1], "U:nucleus:span");

        let missing = LinearModel::from_file(Path::new("/nonexistent/model.json"));
        assert_matches!(missing, Err(ScorerError::Io { .. }));
    }

    #[test]
    fn test_programmatic_construction() {
        let model = LinearModel::new(vec!["S:text".to_string()], vec![0.5], HashMap::new()).unwrap();
        assert_eq!(model.score(&FeatureCounts::default()).unwrap(), vec![0.0]);
    }
}
