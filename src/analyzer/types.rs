use review_sentiment_common::{AggregateSummary, EnrichedRecord};
use serde::{Deserialize, Serialize};

/// バッチ分類の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            sample_size: 50,
            seed: 42,
        }
    }
}

/// 進捗（1件分類するごとに通知）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// 完了割合 (0.0-1.0)
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// バッチ分類の結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// 抽出順の分類結果
    pub records: Vec<EnrichedRecord>,
    pub summary: AggregateSummary,
    pub sample_size: usize,
    pub seed: u64,
    /// 生成日時 (RFC 3339)
    #[serde(default)]
    pub generated_at: String,
}
