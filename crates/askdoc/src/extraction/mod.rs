//! Context assembly and answer extraction

mod answer_extractor;

pub use answer_extractor::AnswerExtractor;
