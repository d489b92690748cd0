//! バッチ分類結果の集計

use crate::category::SentimentCategory;
use crate::types::EnrichedRecord;
use serde::{Deserialize, Serialize};

/// カテゴリ別件数
///
/// バッチが変わるたびに1パスで作り直す（差分更新はしない）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
}

impl AggregateSummary {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        Self::from_categories(records.iter().map(|r| r.category))
    }

    pub fn from_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = SentimentCategory>,
    {
        let mut summary = Self::default();
        for category in categories {
            match category {
                SentimentCategory::Negative => summary.negative += 1,
                SentimentCategory::Neutral => summary.neutral += 1,
                SentimentCategory::Positive => summary.positive += 1,
            }
        }
        summary
    }

    pub fn count(&self, category: SentimentCategory) -> usize {
        match category {
            SentimentCategory::Negative => self.negative,
            SentimentCategory::Neutral => self.neutral,
            SentimentCategory::Positive => self.positive,
        }
    }

    /// 件数合計（= バッチサイズ）
    pub fn total(&self) -> usize {
        self.negative + self.neutral + self.positive
    }

    /// カテゴリの割合 (0.0-1.0)。空バッチは0.0
    pub fn share(&self, category: SentimentCategory) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(category) as f64 / total as f64
    }

    /// 最多カテゴリ。同数なら Negative → Neutral → Positive の順で先勝ち
    pub fn dominant(&self) -> Option<SentimentCategory> {
        let mut best: Option<(SentimentCategory, usize)> = None;
        for category in SentimentCategory::ALL {
            let count = self.count(category);
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((category, count)),
            }
        }
        best.map(|(category, _)| category)
    }
}
