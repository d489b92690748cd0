//! BERT 系列分類モデルによるプロセス内推論（candle）
//!
//! 既定モデル `nlptown/bert-base-multilingual-uncased-sentiment` は
//! 多言語レビューを "1 star" 〜 "5 stars" の5クラスに分類する。
//!
//! 推論: トークン化 → BERTエンコーダ → [CLS] プーラー (dense + tanh)
//! → 線形分類器 → softmax。ラベルは config.json の id2label から取る。

use super::{RawPrediction, ScoringCapability};
use crate::config::Config;
use crate::error::{Result, SentimentError};
use candle_core::{DType, Device, IndexOp, Module, Tensor, D};
use candle_nn::{Linear, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// モデルの最大トークン長
const MAX_MODEL_TOKENS: usize = 512;

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const SAFETENSORS_FILE: &str = "model.safetensors";
const PYTORCH_FILE: &str = "pytorch_model.bin";

/// 重みファイルの形式
#[derive(Debug, Clone, PartialEq)]
pub enum Weights {
    Safetensors(PathBuf),
    Pytorch(PathBuf),
}

/// 推論に必要なファイル一式
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: Weights,
}

impl ModelFiles {
    /// 環境変数/設定のディレクトリ、なければ Hugging Face Hub から取得
    pub fn resolve(config: &Config) -> Result<Self> {
        match config.resolved_model_dir() {
            Some(dir) => Self::from_dir(&dir),
            None => Self::download(&config.model_id, &config.revision),
        }
    }

    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(SentimentError::ModelLoad(format!(
                "モデルディレクトリが見つかりません: {}",
                dir.display()
            )));
        }

        let required = |name: &str| -> Result<PathBuf> {
            let path = dir.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(SentimentError::ModelLoad(format!(
                    "{} がありません: {}",
                    name,
                    dir.display()
                )))
            }
        };

        let config = required(CONFIG_FILE)?;
        let tokenizer = required(TOKENIZER_FILE)?;

        // safetensors を優先
        let weights = if dir.join(SAFETENSORS_FILE).is_file() {
            Weights::Safetensors(dir.join(SAFETENSORS_FILE))
        } else if dir.join(PYTORCH_FILE).is_file() {
            Weights::Pytorch(dir.join(PYTORCH_FILE))
        } else {
            return Err(SentimentError::ModelLoad(format!(
                "重みファイル ({} / {}) がありません: {}",
                SAFETENSORS_FILE,
                PYTORCH_FILE,
                dir.display()
            )));
        };

        Ok(Self {
            config,
            tokenizer,
            weights,
        })
    }

    pub fn download(model_id: &str, revision: &str) -> Result<Self> {
        use hf_hub::api::sync::Api;
        use hf_hub::{Repo, RepoType};

        info!(model_id, revision, "fetching model from Hugging Face Hub");

        let hub_err = |e: hf_hub::api::sync::ApiError| {
            SentimentError::ModelLoad(format!("モデル取得エラー ({}): {}", model_id, e))
        };

        let api = Api::new().map_err(hub_err)?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let config = repo.get(CONFIG_FILE).map_err(hub_err)?;
        let tokenizer = repo.get(TOKENIZER_FILE).map_err(hub_err)?;
        let weights = match repo.get(SAFETENSORS_FILE) {
            Ok(path) => Weights::Safetensors(path),
            Err(_) => Weights::Pytorch(repo.get(PYTORCH_FILE).map_err(hub_err)?),
        };

        Ok(Self {
            config,
            tokenizer,
            weights,
        })
    }

    fn var_builder(&self, device: &Device) -> Result<VarBuilder<'static>> {
        match &self.weights {
            Weights::Safetensors(path) => {
                let data = std::fs::read(path)?;
                VarBuilder::from_buffered_safetensors(data, DTYPE, device).map_err(model_load_err)
            }
            Weights::Pytorch(path) => VarBuilder::from_pth(path, DTYPE, device).map_err(model_load_err),
        }
    }
}

/// config.json のうち分類ヘッドに必要な部分
#[derive(Debug, Deserialize)]
struct ClassifierHead {
    hidden_size: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

impl ClassifierHead {
    /// クラス番号順のラベル表
    fn labels(&self) -> Result<Vec<String>> {
        if self.id2label.is_empty() {
            return Ok((1..=5)
                .map(|n| format!("{} {}", n, if n == 1 { "star" } else { "stars" }))
                .collect());
        }

        let mut entries = Vec::with_capacity(self.id2label.len());
        for (id, label) in &self.id2label {
            let id: usize = id.parse().map_err(|_| {
                SentimentError::ModelLoad(format!("id2label のキーが不正: {:?}", id))
            })?;
            entries.push((id, label.clone()));
        }
        entries.sort_by_key(|(id, _)| *id);

        if entries.iter().enumerate().any(|(i, (id, _))| i != *id) {
            return Err(SentimentError::ModelLoad("id2label が 0 から連番になっていません".into()));
        }

        Ok(entries.into_iter().map(|(_, label)| label).collect())
    }
}

pub struct BertCapability {
    model: BertModel,
    pooler: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
}

impl BertCapability {
    pub fn load(config: &Config) -> Result<Self> {
        let files = ModelFiles::resolve(config)?;
        Self::from_files(&files)
    }

    pub fn from_files(files: &ModelFiles) -> Result<Self> {
        let device = Device::Cpu;

        let config_json = std::fs::read_to_string(&files.config)?;
        let bert_config: BertConfig = serde_json::from_str(&config_json)?;
        let head: ClassifierHead = serde_json::from_str(&config_json)?;
        let labels = head.labels()?;

        let vb = files.var_builder(&device)?;
        let model = BertModel::load(vb.pp("bert"), &bert_config).map_err(model_load_err)?;
        let pooler = candle_nn::linear(head.hidden_size, head.hidden_size, vb.pp("bert.pooler.dense"))
            .map_err(model_load_err)?;
        let classifier = candle_nn::linear(head.hidden_size, labels.len(), vb.pp("classifier"))
            .map_err(model_load_err)?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| SentimentError::ModelLoad(format!("トークナイザー読み込みエラー: {}", e)))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_MODEL_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| SentimentError::ModelLoad(format!("トークナイザー設定エラー: {}", e)))?;
        tokenizer.with_padding(None);

        info!(labels = labels.len(), "bert model loaded");

        Ok(Self {
            model,
            pooler,
            classifier,
            tokenizer,
            labels,
            device,
        })
    }

    /// 1件分のクラス確率
    fn probabilities(&self, ids: &[u32], type_ids: &[u32], mask: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(type_ids, &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(mask, &self.device)?.unsqueeze(0)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        let logits = self.classifier.forward(&pooled)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;

        probs.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()
    }
}

impl ScoringCapability for BertCapability {
    fn predict(&self, text: &str) -> Result<RawPrediction> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| SentimentError::ScoringFailed(format!("トークン化エラー: {}", e)))?;

        debug!(tokens = encoding.get_ids().len(), "bert forward");

        let probs = self
            .probabilities(
                encoding.get_ids(),
                encoding.get_type_ids(),
                encoding.get_attention_mask(),
            )
            .map_err(|e| SentimentError::ScoringFailed(format!("推論エラー: {}", e)))?;

        let (best, score) = argmax(&probs)
            .ok_or_else(|| SentimentError::ScoringFailed("モデル出力が空です".into()))?;
        let label = self.labels.get(best).cloned().ok_or_else(|| {
            SentimentError::ScoringFailed(format!("クラス {} のラベルがありません", best))
        })?;

        Ok(RawPrediction {
            label,
            score: score.clamp(0.0, 1.0),
        })
    }

    fn name(&self) -> &str {
        "bert"
    }
}

fn model_load_err(e: candle_core::Error) -> SentimentError {
    SentimentError::ModelLoad(format!("モデル読み込みエラー: {}", e))
}

/// 最大値の位置と値。同値なら先のものを採る
fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.6, 0.3]), Some((1, 0.6)));
        assert_eq!(argmax(&[0.5, 0.5]), Some((0, 0.5)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_labels_from_id2label() {
        let head: ClassifierHead = serde_json::from_str(
            r#"{"hidden_size": 768, "id2label": {"1": "2 stars", "0": "1 star", "2": "3 stars"}}"#,
        )
        .unwrap();
        assert_eq!(head.labels().unwrap(), vec!["1 star", "2 stars", "3 stars"]);
    }

    #[test]
    fn test_labels_default_to_five_stars() {
        let head: ClassifierHead = serde_json::from_str(r#"{"hidden_size": 768}"#).unwrap();
        let labels = head.labels().unwrap();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], "1 star");
        assert_eq!(labels[4], "5 stars");
    }

    #[test]
    fn test_labels_reject_gaps() {
        let head: ClassifierHead = serde_json::from_str(
            r#"{"hidden_size": 768, "id2label": {"0": "1 star", "2": "3 stars"}}"#,
        )
        .unwrap();
        assert!(matches!(head.labels(), Err(SentimentError::ModelLoad(_))));
    }

    #[test]
    fn test_model_files_prefers_safetensors() {
        let dir = tempdir().expect("Failed to create temp dir");
        for name in [CONFIG_FILE, TOKENIZER_FILE, SAFETENSORS_FILE, PYTORCH_FILE] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = ModelFiles::from_dir(dir.path()).unwrap();
        assert_eq!(files.weights, Weights::Safetensors(dir.path().join(SAFETENSORS_FILE)));
    }

    #[test]
    fn test_model_files_falls_back_to_pytorch() {
        let dir = tempdir().expect("Failed to create temp dir");
        for name in [CONFIG_FILE, TOKENIZER_FILE, PYTORCH_FILE] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = ModelFiles::from_dir(dir.path()).unwrap();
        assert_eq!(files.weights, Weights::Pytorch(dir.path().join(PYTORCH_FILE)));
    }

    #[test]
    fn test_model_files_missing_tokenizer() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join(CONFIG_FILE), b"{}").unwrap();
        std::fs::write(dir.path().join(SAFETENSORS_FILE), b"x").unwrap();

        let err = ModelFiles::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, SentimentError::ModelLoad(ref msg) if msg.contains(TOKENIZER_FILE)));
    }

    #[test]
    fn test_model_files_missing_dir() {
        let err = ModelFiles::from_dir(Path::new("/nonexistent/model/12345")).unwrap_err();
        assert!(matches!(err, SentimentError::ModelLoad(_)));
    }
}
