//! レビューJSONの読み込み
//!
//! 配列の各要素は文字列、または `comment`（`review_comment_message` も可）を持つオブジェクト。
//! 両方ある場合は空でない `comment` を優先する。
//! コメントが無い・空白のみの要素は除外する。

use crate::error::{Result, SentimentError};
use review_sentiment_common::ReviewRecord;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReview {
    Text(String),
    Object {
        #[serde(default)]
        comment: Option<String>,
        #[serde(default)]
        review_comment_message: Option<String>,
    },
}

impl RawReview {
    fn into_comment(self) -> Option<String> {
        match self {
            RawReview::Text(text) => non_blank(Some(text)),
            RawReview::Object {
                comment,
                review_comment_message,
            } => non_blank(comment).or_else(|| non_blank(review_comment_message)),
        }
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// ファイルからレビューを読み込む
///
/// `index` は元の配列内の位置（除外された要素も数える）。
pub fn load_reviews(path: &Path) -> Result<Vec<ReviewRecord>> {
    if !path.is_file() {
        return Err(SentimentError::ReviewsNotFound(path.display().to_string()));
    }

    let reader = BufReader::new(File::open(path)?);
    let raw: Vec<RawReview> = serde_json::from_reader(reader)?;

    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, review)| {
            review
                .into_comment()
                .map(|comment| ReviewRecord::new(index, comment))
        })
        .collect())
}
