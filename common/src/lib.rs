//! Review Sentiment Common Library
//!
//! モデルに依存しない型と純粋関数（ラベル解析・カテゴリ対応・切り詰め・集計）

pub mod aggregate;
pub mod category;
pub mod error;
pub mod parser;
pub mod text;
pub mod types;

pub use aggregate::AggregateSummary;
pub use category::SentimentCategory;
pub use error::{Error, Result};
pub use parser::parse_star_label;
pub use text::{truncate_chars, MAX_INPUT_CHARS};
pub use types::{
    ClassificationResult, EnrichedRecord, ReviewRecord, SingleClassification, MAX_STARS,
    MIN_STARS,
};
