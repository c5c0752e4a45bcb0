//! Action scoring interface
//!
//! The parser only needs two things from a statistical model: the full list
//! of action labels it knows, and one score per label for a feature
//! multiset. Higher scores are better; the bundled [`LinearModel`] returns
//! log-probabilities.

mod error;
pub mod linear;

pub use error::ScorerError;
pub use linear::LinearModel;

use crate::features::FeatureCounts;
use crate::grammar::Action;

pub trait ActionScorer: Sync {
    /// Labels of the form `"<S|U|B>:<label>"`, in score order
    fn action_labels(&self) -> &[String];

    /// One score per entry of [`action_labels`](Self::action_labels)
    fn score(&self, features: &FeatureCounts) -> Result<Vec<f64>, ScorerError>;
}

/// Parse the scorer's labels into actions, in label order
pub fn model_actions(scorer: &dyn ActionScorer) -> Result<Vec<Action>, ScorerError> {
    let labels = scorer.action_labels();
    if labels.is_empty() {
        return Err(ScorerError::NoActionLabels);
    }
    labels
        .iter()
        .map(|label| label.parse::<Action>().map_err(ScorerError::from))
        .collect()
}

/// Score every known action, checking the output length
pub fn score_actions(
    scorer: &dyn ActionScorer,
    actions: &[Action],
    features: &FeatureCounts,
) -> Result<Vec<(Action, f64)>, ScorerError> {
    let scores = scorer.score(features)?;
    if scores.len() != actions.len() {
        return Err(ScorerError::ArityMismatch {
            expected: actions.len(),
            actual: scores.len(),
        });
    }
    Ok(actions.iter().cloned().zip(scores).collect())
}
