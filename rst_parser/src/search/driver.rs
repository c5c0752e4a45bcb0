//! Beam search over transition sequences
//!
//! Decoding and gold replay share one loop: keep the frontier sorted by
//! score, cut it to the beam width, expand the best state and collect
//! completed trees. They differ only in where candidate actions come from.

use super::error::ParseError;
use super::result::{ScoredTree, SearchResult, SearchStats, TrainingExample, TrainingRun};
use crate::config::ParserConfig;
use crate::document::{initialize_edus, Document, EduBoundary};
use crate::features::FeatureCounts;
use crate::grammar::{Action, DiscourseTree};
use crate::logging::{codes, LogEvent, LogLevel, LoggingService};
use crate::scorer::{model_actions, score_actions, ActionScorer};
use crate::transition::ParserState;

/// Produces the scored actions to expand from a state
trait CandidateSource {
    fn candidates(
        &mut self,
        state: &ParserState,
        boundaries: &[EduBoundary],
    ) -> Result<Vec<(Action, f64)>, ParseError>;
}

/// Model-driven candidates: best `max_acts` legal actions
struct Decoder<'a> {
    scorer: &'a dyn ActionScorer,
    actions: Vec<Action>,
    max_acts: usize,
}

impl CandidateSource for Decoder<'_> {
    fn candidates(
        &mut self,
        state: &ParserState,
        boundaries: &[EduBoundary],
    ) -> Result<Vec<(Action, f64)>, ParseError> {
        let features = FeatureCounts::from_features(state.features(boundaries));
        let mut scored = score_actions(self.scorer, &self.actions, &features)?;

        // stable: ties keep label order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scored
            .into_iter()
            .filter(|(action, _)| state.allows(action))
            .take(self.max_acts)
            .collect())
    }
}

/// Gold-driven candidates: the next action of a fixed derivation
struct GoldReplay<'a> {
    actions: &'a [Action],
    position: usize,
    make_features: bool,
    examples: Vec<TrainingExample>,
}

impl CandidateSource for GoldReplay<'_> {
    fn candidates(
        &mut self,
        state: &ParserState,
        boundaries: &[EduBoundary],
    ) -> Result<Vec<(Action, f64)>, ParseError> {
        let action = self
            .actions
            .get(self.position)
            .cloned()
            .ok_or_else(|| ParseError::GoldActionsExhausted {
                state: state.describe(),
            })?;
        self.position += 1;

        // repeated unary reduces are recorded once
        let repeated_unary = action.is_unary() && action == state.prev_action;
        if self.make_features && !repeated_unary {
            self.examples.push(TrainingExample {
                label: action.to_string(),
                features: FeatureCounts::from_features(state.features(boundaries)),
            });
        }

        Ok(vec![(action, 0.0)])
    }
}

/// Shift-reduce discourse parser
#[derive(Debug, Clone)]
pub struct ShiftReduceParser {
    config: ParserConfig,
}

impl ShiftReduceParser {
    pub fn new(config: ParserConfig) -> Result<Self, ParseError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn greedy() -> Self {
        Self {
            config: ParserConfig::greedy(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Decode up to `n_best` trees for `document` with `scorer`.
    ///
    /// An empty document yields no trees. A search that completes nothing
    /// returns the flat tree over all EDUs with score 0.
    pub fn parse(
        &self,
        document: &Document,
        scorer: &dyn ActionScorer,
        logger: &LoggingService,
    ) -> Result<SearchResult, ParseError> {
        let mut decoder = Decoder {
            scorer,
            actions: model_actions(scorer)?,
            max_acts: self.config.max_acts,
        };
        let result = self.search(document, &mut decoder, self.config.n_best, logger)?;

        log_success!(
            logger,
            codes::success::SEARCH_COMPLETED,
            "Search completed",
            doc = document.id(),
            "trees" => result.trees.len(),
            "rounds" => result.stats.rounds,
            "fallback" => result.used_fallback
        );
        Ok(result)
    }

    /// Replay a gold derivation and collect `(action, features)` pairs.
    ///
    /// With `make_features` off no examples are produced and the run only
    /// carries the tree the derivation builds.
    pub fn extract_training_examples(
        &self,
        document: &Document,
        gold: &[Action],
        make_features: bool,
        logger: &LoggingService,
    ) -> Result<TrainingRun, ParseError> {
        let mut replay = GoldReplay {
            actions: gold,
            position: 0,
            make_features,
            examples: Vec::new(),
        };
        let result = self.search(document, &mut replay, 1, logger)?;

        log_success!(
            logger,
            codes::success::TRAINING_EXAMPLES_EXTRACTED,
            "Training examples extracted",
            doc = document.id(),
            "examples" => replay.examples.len(),
            "gold_actions" => gold.len()
        );
        Ok(TrainingRun {
            examples: replay.examples,
            trees: result.trees,
        })
    }

    fn search(
        &self,
        document: &Document,
        source: &mut dyn CandidateSource,
        limit: usize,
        logger: &LoggingService,
    ) -> Result<SearchResult, ParseError> {
        let mut stats = SearchStats::default();
        if document.is_empty() {
            return Ok(SearchResult {
                trees: Vec::new(),
                stats,
                used_fallback: false,
            });
        }

        let edus = initialize_edus(&document.edu_tokens)?;
        let mut frontier = vec![ParserState::initial(edus)];
        let mut completed: Vec<ScoredTree> = Vec::new();

        while !frontier.is_empty() {
            frontier.sort_by(|a, b| b.score.total_cmp(&a.score));
            frontier.truncate(self.config.max_states);
            stats.max_frontier = stats.max_frontier.max(frontier.len());

            let state = frontier.remove(0);
            stats.rounds += 1;

            log_debug!(
                logger,
                "Search round",
                "prev" => state.prev_action,
                "score" => format!("{:.4}", state.score),
                "steps" => state.steps,
                "frontier" => frontier.len()
            );

            if state.is_terminal() {
                let tree = state.completed_tree()?;
                if logger.should_log(LogLevel::Debug) {
                    logger.log_event(
                        LogEvent::debug_with_code(codes::success::TREE_COMPLETED, "Tree completed")
                            .with_doc_id(document.id())
                            .with_context("score", &format!("{:.4}", state.score))
                            .with_context("tree", &tree.to_string()),
                    );
                }
                completed.push(ScoredTree {
                    score: state.score,
                    tree,
                });
                if completed.len() >= limit {
                    break;
                }
                continue;
            }

            // the ceiling only stops expansion; finished states above are kept
            if let Some(max_steps) = self.config.max_steps {
                if state.steps > max_steps {
                    log_warning!(
                        logger,
                        codes::search::STEP_CEILING_REACHED,
                        "Step ceiling reached; stopping search",
                        doc = document.id(),
                        "max_steps" => max_steps,
                        "completed" => completed.len()
                    );
                    break;
                }
            }

            let mut candidates = source.candidates(&state, &document.edu_start_indices)?;
            if candidates.len() == 1 {
                if let Some((action, score)) = candidates.pop() {
                    frontier.push(state.advance(&action, score)?);
                }
            } else {
                for (action, score) in &candidates {
                    frontier.push(state.successor(action, *score)?);
                }
            }
        }

        stats.completions = completed.len();
        if completed.is_empty() {
            log_warning!(
                logger,
                codes::search::FLAT_TREE_FALLBACK,
                "No tree completed; using flat tree",
                doc = document.id(),
                "edus" => document.edu_count()
            );
            return Ok(SearchResult {
                trees: vec![ScoredTree {
                    score: 0.0,
                    tree: DiscourseTree::flat(document.edu_count()),
                }],
                stats,
                used_fallback: true,
            });
        }

        Ok(SearchResult {
            trees: completed,
            stats,
            used_fallback: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{EduBoundary, Token};
    use crate::logging::create_test_logger;
    use crate::scorer::ScorerError;
    use assert_matches::assert_matches;

    /// Scores every label with a fixed value regardless of features
    struct FixedScorer {
        labels: Vec<String>,
        scores: Vec<f64>,
    }

    impl FixedScorer {
        fn new(labels: &[(&str, f64)]) -> Self {
            Self {
                labels: labels.iter().map(|(l, _)| l.to_string()).collect(),
                scores: labels.iter().map(|(_, s)| *s).collect(),
            }
        }
    }

    impl ActionScorer for FixedScorer {
        fn action_labels(&self) -> &[String] {
            &self.labels
        }

        fn score(&self, _features: &FeatureCounts) -> Result<Vec<f64>, ScorerError> {
            Ok(self.scores.clone())
        }
    }

    fn ranking_scorer() -> FixedScorer {
        FixedScorer::new(&[
            ("S:text", -1.0),
            ("B:ROOT", -2.0),
            ("B:nucleus:span", -3.0),
            ("U:nucleus:span", -4.0),
        ])
    }

    fn document(edus: usize) -> Document {
        let tokens = (0..edus)
            .map(|i| vec![Token::new(&format!("w{}", i), "NN"), Token::new(".", ".")])
            .collect();
        let boundaries = (0..edus).map(|i| EduBoundary::new(0, i * 2)).collect();
        Document::new(tokens, boundaries).with_doc_id("doc")
    }

    fn gold(labels: &[&str]) -> Vec<Action> {
        labels.iter().map(|l| l.parse().unwrap()).collect()
    }

    #[test]
    fn test_greedy_derivation() {
        let (logger, _) = create_test_logger();
        let result = ShiftReduceParser::greedy()
            .parse(&document(3), &ranking_scorer(), &logger)
            .unwrap();

        assert!(!result.used_fallback);
        assert_eq!(result.trees.len(), 1);
        let best = result.best().unwrap();
        assert_eq!(
            best.tree.to_string(),
            "(ROOT (nucleus:span (text 0) (nucleus:span (text 1) (nucleus:span (text 2)))))"
        );
        // S S S U:nucleus:span B:nucleus:span B:nucleus:span B:ROOT
        assert_eq!(best.score, -15.0);
        assert_eq!(result.stats.rounds, 8);
    }

    #[test]
    fn test_greedy_is_deterministic() {
        let (logger, _) = create_test_logger();
        let parser = ShiftReduceParser::greedy();
        let scorer = ranking_scorer();
        let first = parser.parse(&document(4), &scorer, &logger).unwrap();
        let second = parser.parse(&document(4), &scorer, &logger).unwrap();
        assert_eq!(first.trees, second.trees);
    }

    #[test]
    fn test_beam_returns_n_best_ranked_trees() {
        let (logger, _) = create_test_logger();
        let parser = ShiftReduceParser::new(ParserConfig::with_beam(4, 4, 3)).unwrap();
        let result = parser.parse(&document(3), &ranking_scorer(), &logger).unwrap();

        assert!(!result.used_fallback);
        assert_eq!(result.trees.len(), 3);
        assert_eq!(result.stats.completions, 3);
        assert!(result.stats.max_frontier <= 4);

        let scores: Vec<f64> = result.trees.iter().map(|t| t.score).collect();
        assert_eq!(scores, vec![-15.0, -15.0, -19.0]);
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));

        let rendered: Vec<String> = result.trees.iter().map(|t| t.tree.to_string()).collect();
        for (i, tree) in rendered.iter().enumerate() {
            assert!(!rendered[i + 1..].contains(tree), "duplicate tree {}", tree);
        }
        for scored in &result.trees {
            assert_eq!(scored.tree.leaves(), vec![0, 1, 2]);
            assert_eq!(scored.tree.label(), Some("ROOT"));
        }
    }

    #[test]
    fn test_flat_fallback_when_search_dead_ends() {
        let (logger, memory) = create_test_logger();
        let scorer = FixedScorer::new(&[("S:text", -1.0), ("U:satellite:span", -2.0)]);
        let result = ShiftReduceParser::greedy()
            .parse(&document(3), &scorer, &logger)
            .unwrap();

        assert!(result.used_fallback);
        assert_eq!(result.stats.completions, 0);
        assert_eq!(result.trees[0].score, 0.0);
        assert_eq!(result.trees[0].tree.to_string(), "(ROOT (text 0) (text 1) (text 2))");
        assert!(memory.has_warning_with_code(codes::search::FLAT_TREE_FALLBACK));
    }

    #[test]
    fn test_step_ceiling_stops_search() {
        let (logger, memory) = create_test_logger();
        let parser = ShiftReduceParser::new(ParserConfig::greedy().with_max_steps(2)).unwrap();
        let result = parser.parse(&document(3), &ranking_scorer(), &logger).unwrap();

        assert!(result.used_fallback);
        assert_eq!(result.stats.rounds, 4);
        assert!(memory.has_warning_with_code(codes::search::STEP_CEILING_REACHED));
    }

    #[test]
    fn test_step_ceiling_keeps_finished_parse() {
        let (logger, memory) = create_test_logger();
        let parser = ShiftReduceParser::new(ParserConfig::greedy().with_max_steps(1)).unwrap();
        let result = parser.parse(&document(1), &ranking_scorer(), &logger).unwrap();

        // S:text then B:ROOT completes at step 2, past the ceiling
        assert!(!result.used_fallback);
        assert_eq!(result.trees.len(), 1);
        assert_eq!(result.trees[0].tree.to_string(), "(ROOT (text 0))");
        assert_eq!(result.trees[0].score, -3.0);
        assert!(!memory.has_warning_with_code(codes::search::FLAT_TREE_FALLBACK));
    }

    #[test]
    fn test_empty_document_skips_search() {
        let (logger, memory) = create_test_logger();
        let result = ShiftReduceParser::greedy()
            .parse(&document(0), &ranking_scorer(), &logger)
            .unwrap();

        assert!(result.trees.is_empty());
        assert_eq!(result.stats.rounds, 0);
        assert!(!memory.has_warning_with_code(codes::search::FLAT_TREE_FALLBACK));
    }

    #[test]
    fn test_scorer_arity_is_fatal() {
        let (logger, _) = create_test_logger();
        let scorer = FixedScorer {
            labels: vec!["S:text".to_string(), "B:ROOT".to_string()],
            scores: vec![-1.0],
        };
        let result = ShiftReduceParser::greedy().parse(&document(2), &scorer, &logger);
        assert_matches!(
            result,
            Err(ParseError::Scorer(ScorerError::ArityMismatch { expected: 2, actual: 1 }))
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert_matches!(
            ShiftReduceParser::new(ParserConfig::with_beam(1, 0, 1)),
            Err(ParseError::Config(_))
        );
    }

    #[test]
    fn test_gold_replay_builds_tree_and_examples() {
        let (logger, memory) = create_test_logger();
        let actions = gold(&[
            "S:text",
            "U:nucleus:span",
            "S:text",
            "U:satellite:elaboration",
            "B:ROOT*",
            "S:text",
            "U:nucleus:list",
            "B:ROOT*",
            "B:ROOT",
        ]);
        let run = ShiftReduceParser::greedy()
            .extract_training_examples(&document(3), &actions, true, &logger)
            .unwrap();

        assert_eq!(run.examples.len(), 9);
        let labels: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
        let emitted: Vec<String> = run.examples.iter().map(|e| e.label.clone()).collect();
        assert_eq!(emitted, labels);
        assert_eq!(run.examples[0].features.get("PREV:S:text"), 1);
        assert_eq!(run.examples[0].features.get("combo:nw1:w0~PREV:S:text"), 1);

        assert_eq!(run.trees.len(), 1);
        assert_eq!(
            run.trees[0].tree.to_string(),
            "(ROOT (nucleus:span (text 0)) (satellite:elaboration (text 1)) (nucleus:list (text 2)))"
        );
        assert!(memory.has_success_with_code(codes::success::TRAINING_EXAMPLES_EXTRACTED));
    }

    #[test]
    fn test_repeated_unary_recorded_once() {
        let (logger, _) = create_test_logger();
        let actions = gold(&["S:text", "U:nucleus:span", "U:nucleus:span", "B:ROOT"]);
        let run = ShiftReduceParser::greedy()
            .extract_training_examples(&document(1), &actions, true, &logger)
            .unwrap();

        let emitted: Vec<&str> = run.examples.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(emitted, vec!["S:text", "U:nucleus:span", "B:ROOT"]);
    }

    #[test]
    fn test_greedy_derivation_replays_to_same_tree() {
        let (logger, _) = create_test_logger();
        let parser = ShiftReduceParser::greedy();
        let decoded = parser.parse(&document(3), &ranking_scorer(), &logger).unwrap();

        let actions = gold(&[
            "S:text",
            "S:text",
            "S:text",
            "U:nucleus:span",
            "B:nucleus:span",
            "B:nucleus:span",
            "B:ROOT",
        ]);
        let run = parser
            .extract_training_examples(&document(3), &actions, false, &logger)
            .unwrap();

        assert!(run.examples.is_empty());
        assert_eq!(run.trees[0].tree, decoded.trees[0].tree);
    }

    #[test]
    fn test_gold_exhaustion_reports_state() {
        let (logger, _) = create_test_logger();
        let result = ShiftReduceParser::greedy().extract_training_examples(
            &document(1),
            &gold(&["S:text"]),
            true,
            &logger,
        );

        let err = result.unwrap_err();
        assert_eq!(err.error_code(), codes::search::GOLD_ACTIONS_EXHAUSTED);
        assert_matches!(&err, ParseError::GoldActionsExhausted { state } if state.contains("stack=[(text 0) (LEFTWALL)]"));
    }

    #[test]
    fn test_headless_gold_reduce_fails() {
        let (logger, _) = create_test_logger();
        let result = ShiftReduceParser::greedy().extract_training_examples(
            &document(2),
            &gold(&["S:text", "S:text", "B:satellite:list"]),
            true,
            &logger,
        );
        assert_matches!(
            result,
            Err(ParseError::Transition(crate::transition::TransitionError::InvalidReduce { .. }))
        );
    }
}
