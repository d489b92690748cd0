use clap::{Parser, Subcommand};
use crate::ai_provider::ScorerBackend;
use std::path::PathBuf;

/// 単発分類の既定テキスト
pub const DEFAULT_SAMPLE_TEXT: &str = "O produto chegou quebrado e atrasado!";

#[derive(Parser)]
#[command(name = "review-sentiment")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "レビュー感情分析（BERT 1〜5星分類・サンプル集計）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ログをJSON形式で出力
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// スコアリングのバックエンド (bert/command)。省略時は設定ファイルの値
    #[arg(long, global = true)]
    pub backend: Option<ScorerBackend>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 1件のテキストを分類
    Classify {
        /// 分類するテキスト
        #[arg(default_value = DEFAULT_SAMPLE_TEXT)]
        text: String,
    },

    /// レビューJSONからサンプルを抽出して分類・集計
    Analyze {
        /// レビューJSONファイル（文字列または {"comment": ...} の配列）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力と同じフォルダの sentiment-report.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サンプル数（省略時は設定ファイルの値、既定50）
        #[arg(short = 'n', long)]
        sample_size: Option<usize>,

        /// 乱数シード（省略時は設定ファイルの値、既定42）
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 設定を表示/編集
    Config {
        /// ローカルのモデルディレクトリを設定
        #[arg(long)]
        set_model_dir: Option<PathBuf>,

        /// 外部スコアラーのコマンドを設定（例: --set-command python3 scorer.py）
        #[arg(long, num_args = 1.., allow_hyphen_values = true)]
        set_command: Option<Vec<String>>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_classify_default_text() {
        let cli = Cli::parse_from(["review-sentiment", "classify"]);
        match cli.command {
            Commands::Classify { text } => assert_eq!(text, DEFAULT_SAMPLE_TEXT),
            _ => panic!("classify expected"),
        }
    }

    #[test]
    fn test_analyze_args() {
        let cli = Cli::parse_from([
            "review-sentiment",
            "--backend",
            "command",
            "analyze",
            "reviews.json",
            "-n",
            "10",
            "--seed",
            "7",
        ]);
        assert_eq!(cli.backend, Some(ScorerBackend::Command));
        match cli.command {
            Commands::Analyze { input, sample_size, seed, output } => {
                assert_eq!(input, PathBuf::from("reviews.json"));
                assert_eq!(sample_size, Some(10));
                assert_eq!(seed, Some(7));
                assert!(output.is_none());
            }
            _ => panic!("analyze expected"),
        }
    }
}
