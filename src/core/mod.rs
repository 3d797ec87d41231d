// Core exports
pub mod evaluator;
pub mod labels;
pub mod summary;

pub use evaluator::{
    parse_answer_set, render_prompt, score_answers, strip_code_fence, EvaluationError,
    ResponseEvaluator, CONVERSATION_MARKER,
};
pub use labels::{AnswerLabel, LabelScale, MAX_LABEL_SCORE};
pub use summary::{count_words, summary_prompt, Summarizer, SummaryError, MIN_SUMMARY_WORDS};
