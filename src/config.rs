use crate::ai_provider::ScorerBackend;
use crate::error::{Result, SentimentError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// モデルディレクトリを指定する環境変数（設定ファイルより優先）
pub const MODEL_DIR_ENV: &str = "REVIEW_SENTIMENT_MODEL_DIR";

pub const DEFAULT_MODEL_ID: &str = "nlptown/bert-base-multilingual-uncased-sentiment";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: ScorerBackend,
    /// Hugging Face Hub のモデルID
    pub model_id: String,
    pub revision: String,
    /// ローカルのモデルディレクトリ（config.json / tokenizer.json / 重み）
    pub model_dir: Option<PathBuf>,
    /// 外部スコアラーのコマンド（先頭がプログラム、残りが引数）
    pub command: Vec<String>,
    pub default_sample_size: usize,
    pub default_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: ScorerBackend::Bert,
            model_id: DEFAULT_MODEL_ID.into(),
            revision: "main".into(),
            model_dir: None,
            command: Vec::new(),
            default_sample_size: 50,
            default_seed: 42,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SentimentError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("review-sentiment").join("config.json"))
    }

    /// 有効なモデルディレクトリ
    pub fn resolved_model_dir(&self) -> Option<PathBuf> {
        // 環境変数を優先
        if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Some(PathBuf::from(dir));
            }
        }

        self.model_dir.clone()
    }

    pub fn set_model_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.model_dir = Some(dir);
        self.save()
    }

    pub fn set_command(&mut self, command: Vec<String>) -> Result<()> {
        if command.is_empty() {
            return Err(SentimentError::Config("コマンドが空です".into()));
        }
        self.command = command;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_pipeline() {
        let config = Config::default();
        assert_eq!(config.default_sample_size, 50);
        assert_eq!(config.default_seed, 42);
        assert_eq!(config.backend, ScorerBackend::Bert);
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"backend": "command", "command": ["python3", "scorer.py"]}"#).unwrap();
        assert_eq!(config.backend, ScorerBackend::Command);
        assert_eq!(config.command, vec!["python3".to_string(), "scorer.py".to_string()]);
        assert_eq!(config.default_seed, 42);
    }

    /// 入力上限はモデル側の制約なので設定ファイルでは変えられない
    #[test]
    fn test_max_chars_key_is_ignored() {
        let config: Config = serde_json::from_str(r#"{"max_chars": 4096}"#).unwrap();
        assert_eq!(config, Config::default());

        let saved = serde_json::to_value(&config).unwrap();
        assert!(saved.get("max_chars").is_none());
    }
}
