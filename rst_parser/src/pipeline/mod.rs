mod error;
pub mod output;

// Re-export public types
pub use error::PipelineError;
pub use output::{training_examples_to_json_lines, ParseOutput};

use crate::document::Document;
use crate::logging::{codes, LoggingService};
use crate::scorer::{ActionScorer, LinearModel};
use crate::search::{parse_gold_actions, ShiftReduceParser, TrainingRun};
use std::path::Path;
use std::time::Instant;

/// Parse one document: blank check -> validation -> search -> output record
pub fn process_document(
    document: &Document,
    parser: &ShiftReduceParser,
    scorer: &dyn ActionScorer,
    logger: &LoggingService,
) -> Result<ParseOutput, PipelineError> {
    let start_time = Instant::now();

    if document.is_blank() {
        log_warning!(
            logger,
            codes::document::BLANK_INPUT,
            "Input contains only whitespace; skipping",
            doc = document.id()
        );
        return Ok(ParseOutput::empty(document));
    }

    let result = document
        .validate()
        .map_err(PipelineError::from)
        .and_then(|_| parser.parse(document, scorer, logger).map_err(PipelineError::from));

    match result {
        Ok(search) => {
            log_success!(
                logger,
                codes::success::DOCUMENT_PARSED,
                "Document parsed",
                doc = document.id(),
                "edus" => document.edu_count(),
                "trees" => search.trees.len(),
                "duration_ms" => format!("{:.2}", start_time.elapsed().as_secs_f64() * 1000.0)
            );
            Ok(ParseOutput::new(document, search.trees))
        }
        Err(error) => Err(report(logger, document, error)),
    }
}

/// Load a document file and parse it
pub fn process_file(
    path: &Path,
    parser: &ShiftReduceParser,
    scorer: &dyn ActionScorer,
    logger: &LoggingService,
) -> Result<ParseOutput, PipelineError> {
    let document = load_document(path, logger)?;
    process_document(&document, parser, scorer, logger)
}

/// Replay a gold derivation over a document
pub fn extract_training_data<S: AsRef<str>>(
    document: &Document,
    gold: &[S],
    make_features: bool,
    parser: &ShiftReduceParser,
    logger: &LoggingService,
) -> Result<TrainingRun, PipelineError> {
    let result = document
        .validate()
        .map_err(PipelineError::from)
        .and_then(|_| parse_gold_actions(gold).map_err(PipelineError::from))
        .and_then(|actions| {
            parser
                .extract_training_examples(document, &actions, make_features, logger)
                .map_err(PipelineError::from)
        });

    result.map_err(|error| report(logger, document, error))
}

pub fn load_document(path: &Path, logger: &LoggingService) -> Result<Document, PipelineError> {
    match Document::from_file(path) {
        Ok(document) => {
            log_success!(
                logger,
                codes::success::DOCUMENT_LOADED,
                "Document loaded",
                doc = document.id(),
                "edus" => document.edu_count()
            );
            Ok(document)
        }
        Err(error) => {
            log_error!(
                logger,
                error.error_code(),
                &error.to_string(),
                "file" => path.display()
            );
            Err(error.into())
        }
    }
}

pub fn load_model(path: &Path, logger: &LoggingService) -> Result<LinearModel, PipelineError> {
    match LinearModel::from_file(path) {
        Ok(model) => {
            log_success!(
                logger,
                codes::success::MODEL_LOADED,
                "Model loaded",
                "file" => path.display(),
                "labels" => model.label_count(),
                "features" => model.feature_count()
            );
            Ok(model)
        }
        Err(error) => {
            log_error!(
                logger,
                error.error_code(),
                &error.to_string(),
                "file" => path.display()
            );
            Err(error.into())
        }
    }
}

fn report(logger: &LoggingService, document: &Document, error: PipelineError) -> PipelineError {
    log_error!(logger, error.error_code(), &error.to_string(), doc = document.id());
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentError, EduBoundary, Token};
    use crate::logging::create_test_logger;
    use crate::search::ParseError;
    use assert_matches::assert_matches;
    use std::io::Write;

    const MODEL: &str = r#"{
        "labels": ["S:text", "B:ROOT", "B:nucleus:span", "U:nucleus:span"],
        "intercepts": [4.0, 3.0, 2.0, 1.0]
    }"#;

    fn model() -> LinearModel {
        LinearModel::from_json_str(MODEL).unwrap()
    }

    fn document(edus: usize) -> Document {
        let tokens = (0..edus).map(|i| vec![Token::new(&format!("w{}", i), "NN")]).collect();
        let boundaries = (0..edus).map(|i| EduBoundary::new(i, 0)).collect();
        Document::new(tokens, boundaries).with_doc_id("doc")
    }

    #[test]
    fn test_process_document_with_linear_model() {
        let (logger, memory) = create_test_logger();
        let output =
            process_document(&document(2), &ShiftReduceParser::greedy(), &model(), &logger).unwrap();

        assert_eq!(output.doc_id, "doc");
        assert_eq!(output.edu_tokens, vec![vec!["w0"], vec!["w1"]]);
        assert_eq!(output.scored_rst_trees.len(), 1);
        assert_eq!(
            output.scored_rst_trees[0].tree.to_string(),
            "(ROOT (nucleus:span (text 0) (nucleus:span (text 1))))"
        );
        assert!(output.scored_rst_trees[0].score < 0.0);
        assert!(memory.has_success_with_code(codes::success::DOCUMENT_PARSED));
    }

    #[test]
    fn test_blank_input_short_circuits() {
        let (logger, memory) = create_test_logger();
        let mut document = document(2);
        document.raw_text = Some("  \n\t ".to_string());

        let output =
            process_document(&document, &ShiftReduceParser::greedy(), &model(), &logger).unwrap();
        assert!(output.scored_rst_trees.is_empty());
        assert!(output.edu_tokens.is_empty());
        assert!(memory.has_warning_with_code(codes::document::BLANK_INPUT));
    }

    #[test]
    fn test_empty_document_yields_no_trees() {
        let (logger, _) = create_test_logger();
        let output =
            process_document(&document(0), &ShiftReduceParser::greedy(), &model(), &logger).unwrap();
        assert!(output.scored_rst_trees.is_empty());
        assert!(output.edu_tokens.is_empty());
    }

    #[test]
    fn test_invalid_document_logged_with_code() {
        let (logger, memory) = create_test_logger();
        let mut document = document(2);
        document.edu_tokens[1].clear();

        let result = process_document(&document, &ShiftReduceParser::greedy(), &model(), &logger);
        assert_matches!(
            result,
            Err(PipelineError::Document(DocumentError::EmptyEdu { index: 1 }))
        );
        assert!(memory.has_error_with_code(codes::document::EMPTY_EDU));
    }

    #[test]
    fn test_process_file_round_trip() {
        let (logger, memory) = create_test_logger();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&document(3)).unwrap()).unwrap();

        let output =
            process_file(file.path(), &ShiftReduceParser::greedy(), &model(), &logger).unwrap();
        assert_eq!(output.edu_tokens.len(), 3);
        assert!(memory.has_success_with_code(codes::success::DOCUMENT_LOADED));
    }

    #[test]
    fn test_missing_files_reported() {
        let (logger, memory) = create_test_logger();
        let missing = Path::new("/nonexistent/input.json");

        let result = process_file(missing, &ShiftReduceParser::greedy(), &model(), &logger);
        assert_matches!(result, Err(PipelineError::Document(DocumentError::Io { .. })));
        assert!(memory.has_error_with_code(codes::document::DOCUMENT_IO_ERROR));

        let result = load_model(Path::new("/nonexistent/model.json"), &logger);
        assert_matches!(result, Err(PipelineError::Scorer(_)));
        assert!(memory.has_error_with_code(codes::scorer::MODEL_IO_ERROR));
    }

    #[test]
    fn test_extract_training_data() {
        let (logger, _) = create_test_logger();
        let gold = ["S:text", "U:nucleus:span", "B:ROOT"];
        let run =
            extract_training_data(&document(1), &gold, true, &ShiftReduceParser::greedy(), &logger)
                .unwrap();

        assert_eq!(run.examples.len(), 3);
        assert_eq!(run.trees[0].tree.to_string(), "(ROOT (nucleus:span (text 0)))");
    }

    #[test]
    fn test_extract_rejects_bad_gold_label() {
        let (logger, memory) = create_test_logger();
        let gold = ["S:text", "Q:nonsense"];
        let result =
            extract_training_data(&document(1), &gold, true, &ShiftReduceParser::greedy(), &logger);

        assert_matches!(
            result,
            Err(PipelineError::Parse(ParseError::InvalidGoldAction { position: 1, .. }))
        );
        assert!(memory.has_error_with_code(codes::search::INVALID_GOLD_ACTION));
    }
}
