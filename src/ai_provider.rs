use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// スコアリングのバックエンド
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerBackend {
    /// プロセス内BERT推論（candle）
    #[default]
    Bert,
    /// 外部スコアラープロセス（JSON Lines）
    Command,
}

impl ScorerBackend {
    pub fn name(&self) -> &'static str {
        match self {
            ScorerBackend::Bert => "bert",
            ScorerBackend::Command => "command",
        }
    }
}
