// Search outputs

use crate::features::FeatureCounts;
use crate::grammar::DiscourseTree;
use serde::Serialize;

/// A completed tree with its cumulative score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTree {
    pub score: f64,
    pub tree: DiscourseTree,
}

/// One `(action, features)` pair from a gold derivation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingExample {
    pub label: String,
    pub features: FeatureCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier
    pub rounds: usize,
    /// Largest frontier seen after truncation
    pub max_frontier: usize,
    pub completions: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Completed trees in completion order, or the flat fallback
    pub trees: Vec<ScoredTree>,
    pub stats: SearchStats,
    pub used_fallback: bool,
}

impl SearchResult {
    pub fn best(&self) -> Option<&ScoredTree> {
        self.trees.first()
    }
}

/// Output of replaying a gold derivation
#[derive(Debug, Clone, Default)]
pub struct TrainingRun {
    pub examples: Vec<TrainingExample>,
    pub trees: Vec<ScoredTree>,
}
