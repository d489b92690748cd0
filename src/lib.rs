//! review-sentiment
//!
//! レビュー本文を多言語BERTで 1〜5 星に分類し、
//! サンプルを Negative / Neutral / Positive に集計する。

pub mod ai_provider;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod reviews;
pub mod scorer;
pub mod telemetry;

pub use review_sentiment_common as common;
