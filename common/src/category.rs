//! 星評価 → 感情カテゴリの対応
//!
//! 単発分類とバッチ分類の両方で同じ規則を使う:
//! - 2以下: Negative
//! - 3: Neutral
//! - 4以上: Positive

use crate::error::{Error, Result};
use crate::types::{MAX_STARS, MIN_STARS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 感情カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentCategory {
    Negative,
    Neutral,
    Positive,
}

impl SentimentCategory {
    /// 集計・表示用の標準順
    pub const ALL: [SentimentCategory; 3] = [
        SentimentCategory::Negative,
        SentimentCategory::Neutral,
        SentimentCategory::Positive,
    ];

    /// 星評価からカテゴリを決定
    ///
    /// 範囲外の値は黙って丸めずに `InvalidRating` を返す。
    pub fn from_star_rating(star_rating: u8) -> Result<Self> {
        match star_rating {
            s if s < MIN_STARS || s > MAX_STARS => Err(Error::InvalidRating(i64::from(s))),
            s if s <= 2 => Ok(SentimentCategory::Negative),
            3 => Ok(SentimentCategory::Neutral),
            _ => Ok(SentimentCategory::Positive),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
            SentimentCategory::Positive => "Positive",
        }
    }

    /// ダッシュボード表示用（ポルトガル語）
    pub fn label_pt(&self) -> &'static str {
        match self {
            SentimentCategory::Negative => "Negativo",
            SentimentCategory::Neutral => "Neutro",
            SentimentCategory::Positive => "Positivo",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
