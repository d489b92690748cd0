//! 分類パイプラインの型定義
//!
//! CLIとライブラリ利用側で共有される型:
//! - ReviewRecord: 入力レビュー（プール内の位置 + コメント本文）
//! - ClassificationResult: Scorerの出力（星評価 + 信頼度）
//! - EnrichedRecord: レビュー + 分類結果 + 感情カテゴリ
//! - SingleClassification: 単発分類の表示用3つ組

use crate::category::SentimentCategory;
use crate::error::{Error, Result};
use crate::parser::parse_star_label;
use serde::{Deserialize, Serialize};

/// 星評価の最小値
pub const MIN_STARS: u8 = 1;
/// 星評価の最大値
pub const MAX_STARS: u8 = 5;

/// 入力レビュー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    /// 元データ内の位置
    pub index: usize,
    pub comment: String,
}

impl ReviewRecord {
    pub fn new(index: usize, comment: impl Into<String>) -> Self {
        Self {
            index,
            comment: comment.into(),
        }
    }
}

/// Scorerの出力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub star_rating: u8,

    /// モデルの信頼度 (0.0-1.0)
    pub confidence: f32,

    /// モデルが出力した生ラベル（例: "4 stars"）
    #[serde(default)]
    pub label: String,
}

impl ClassificationResult {
    /// 範囲チェック付きで生成
    pub fn new(star_rating: u8, confidence: f32) -> Result<Self> {
        if !(MIN_STARS..=MAX_STARS).contains(&star_rating) {
            return Err(Error::InvalidRating(i64::from(star_rating)));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::InvalidConfidence(confidence));
        }

        let suffix = if star_rating == 1 { "star" } else { "stars" };
        Ok(Self {
            star_rating,
            confidence,
            label: format!("{} {}", star_rating, suffix),
        })
    }

    /// モデルのラベル文字列から生成
    pub fn from_label(label: &str, confidence: f32) -> Result<Self> {
        let star_rating = parse_star_label(label)?;
        let mut result = Self::new(star_rating, confidence)?;
        result.label = label.to_string();
        Ok(result)
    }

    pub fn category(&self) -> Result<SentimentCategory> {
        SentimentCategory::from_star_rating(self.star_rating)
    }
}

/// レビュー + 分類結果 + カテゴリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    pub record: ReviewRecord,
    pub classification: ClassificationResult,
    pub category: SentimentCategory,
}

impl EnrichedRecord {
    /// 分類結果からカテゴリを導出して結合
    pub fn new(record: ReviewRecord, classification: ClassificationResult) -> Result<Self> {
        let category = classification.category()?;
        Ok(Self {
            record,
            classification,
            category,
        })
    }
}

/// 単発分類の結果（そのまま表示できる3つ組）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleClassification {
    pub category: SentimentCategory,
    pub star_rating: u8,
    pub confidence: f32,
}

impl SingleClassification {
    pub fn from_result(result: &ClassificationResult) -> Result<Self> {
        Ok(Self {
            category: result.category()?,
            star_rating: result.star_rating,
            confidence: result.confidence,
        })
    }
}
