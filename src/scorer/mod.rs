//! Scorer: 1件のテキストを 1〜5 の星評価に変換する
//!
//! - 入力は先頭512文字で切り詰めてからバックエンドに渡す
//! - 空テキストはバックエンドを呼ばずに InvalidInput
//! - バックエンドのラベル "<N> star(s)" を解析して ClassificationResult にする
//!
//! バックエンドの初期化（モデル読み込み・プロセス起動）は重いので、
//! [`LazyScorer`] で一度だけ行い、以降は同じインスタンスを使い回す。

#[cfg(feature = "bert")]
pub mod bert;
pub mod command;

use crate::ai_provider::ScorerBackend;
use crate::config::Config;
use crate::error::Result;
use review_sentiment_common::{truncate_chars, ClassificationResult, MAX_INPUT_CHARS};
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info};

/// バックエンドの生出力
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    /// 例: "4 stars"
    pub label: String,
    /// 信頼度 (0.0-1.0)
    pub score: f32,
}

/// 外部のスコアリング機能
///
/// 切り詰め済みの空でないテキストだけが渡される。
pub trait ScoringCapability: Send + Sync {
    fn predict(&self, text: &str) -> Result<RawPrediction>;

    fn name(&self) -> &str;
}

pub struct Scorer {
    capability: Box<dyn ScoringCapability>,
}

impl Scorer {
    pub fn new(capability: Box<dyn ScoringCapability>) -> Self {
        Self { capability }
    }

    pub fn backend_name(&self) -> &str {
        self.capability.name()
    }

    pub fn score(&self, text: &str) -> Result<ClassificationResult> {
        let input = truncate_chars(text, MAX_INPUT_CHARS);
        if input.trim().is_empty() {
            return Err(review_sentiment_common::Error::InvalidInput(
                "テキストが空です".into(),
            )
            .into());
        }

        let raw = self.capability.predict(input)?;
        let result = ClassificationResult::from_label(&raw.label, raw.score)?;

        debug!(
            chars = input.chars().count(),
            label = %raw.label,
            confidence = raw.score,
            "scored"
        );

        Ok(result)
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("backend", &self.capability.name())
            .finish()
    }
}

type ScorerFactory = Box<dyn Fn() -> Result<Scorer> + Send + Sync>;

/// 初回アクセス時に一度だけ Scorer を生成するハンドル
///
/// 最上位（main）が所有し、参照で各処理に渡す。
/// 初期化に失敗した場合は何も保持せず、次の `get` で再試行する。
pub struct LazyScorer {
    factory: ScorerFactory,
    cell: OnceLock<Scorer>,
    init_lock: Mutex<()>,
}

impl LazyScorer {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Scorer> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let config = config.clone();
        Self::new(move || build_scorer(&config))
    }

    pub fn get(&self) -> Result<&Scorer> {
        if let Some(scorer) = self.cell.get() {
            return Ok(scorer);
        }

        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(scorer) = self.cell.get() {
            return Ok(scorer);
        }

        let scorer = (self.factory)()?;
        info!(backend = scorer.backend_name(), "scorer initialized");
        Ok(self.cell.get_or_init(|| scorer))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// 設定からバックエンドを選んで Scorer を組み立てる
pub fn build_scorer(config: &Config) -> Result<Scorer> {
    info!(backend = config.backend.name(), "loading scoring backend");

    let capability: Box<dyn ScoringCapability> = match config.backend {
        ScorerBackend::Bert => load_bert(config)?,
        ScorerBackend::Command => Box::new(command::CommandCapability::spawn(&config.command)?),
    };

    Ok(Scorer::new(capability))
}

#[cfg(feature = "bert")]
fn load_bert(config: &Config) -> Result<Box<dyn ScoringCapability>> {
    Ok(Box::new(bert::BertCapability::load(config)?))
}

#[cfg(not(feature = "bert"))]
fn load_bert(_config: &Config) -> Result<Box<dyn ScoringCapability>> {
    Err(crate::error::SentimentError::Config(
        "bert フィーチャーが無効です。--backend command を使うか bert を有効にしてビルドしてください".into(),
    ))
}
