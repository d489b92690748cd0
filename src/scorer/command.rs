//! 外部スコアラープロセス連携
//!
//! 起動したプロセスを使い回し、1行1JSONでやり取りする:
//! - 要求: `{"text": "..."}`
//! - 応答: `{"label": "4 stars", "score": 0.61}` または `{"error": "..."}`
//!
//! プロセスは同時に1リクエストしか扱わないので Mutex で直列化する。

use super::{RawPrediction, ScoringCapability};
use crate::error::{Result, SentimentError};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;
use tracing::debug;

#[derive(Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScoreResponse {
    label: Option<String>,
    score: Option<f32>,
    error: Option<String>,
}

struct ScorerProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ScorerProcess {
    fn send(&mut self, line: &str) -> std::io::Result<()> {
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.flush()
    }
}

impl Drop for ScorerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub struct CommandCapability {
    display_name: String,
    process: Mutex<ScorerProcess>,
}

impl CommandCapability {
    /// `command[0]` をプログラム、残りを引数として起動
    pub fn spawn(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| {
            SentimentError::Config(
                "外部スコアラーのコマンドが未設定です。`review-sentiment config --set-command ...` で設定してください".into(),
            )
        })?;

        // Windowsではcmd /c経由
        #[cfg(windows)]
        let mut cmd = {
            let mut c = Command::new("cmd");
            c.arg("/c").arg(program).args(args);
            c
        };

        #[cfg(not(windows))]
        let mut cmd = {
            let mut c = Command::new(program);
            c.args(args);
            c
        };

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SentimentError::ModelLoad(format!("スコアラー起動エラー ({}): {}", program, e)))?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                return Err(SentimentError::ModelLoad("スコアラーの標準入出力を取得できません".into()));
            }
        };

        debug!(program = %program, pid = child.id(), "scorer process started");

        Ok(Self {
            display_name: format!("command:{}", program),
            process: Mutex::new(ScorerProcess {
                child,
                stdin,
                stdout: BufReader::new(stdout),
            }),
        })
    }
}

impl ScoringCapability for CommandCapability {
    fn predict(&self, text: &str) -> Result<RawPrediction> {
        let mut process = self
            .process
            .lock()
            .map_err(|_| SentimentError::ScoringFailed("スコアラーのロックが壊れています".into()))?;

        let mut request = serde_json::to_string(&ScoreRequest { text })?;
        request.push('\n');
        process
            .send(&request)
            .map_err(|e| SentimentError::ScoringFailed(format!("スコアラーへの送信失敗: {}", e)))?;

        let mut line = String::new();
        let read = process
            .stdout
            .read_line(&mut line)
            .map_err(|e| SentimentError::ScoringFailed(format!("スコアラーからの受信失敗: {}", e)))?;
        if read == 0 {
            return Err(SentimentError::ScoringFailed("スコアラープロセスが終了しました".into()));
        }

        parse_response(&line)
    }

    fn name(&self) -> &str {
        &self.display_name
    }
}

/// 応答1行をパース
fn parse_response(line: &str) -> Result<RawPrediction> {
    let response: ScoreResponse = serde_json::from_str(line.trim())
        .map_err(|e| SentimentError::ScoringFailed(format!("応答JSONが不正: {}", e)))?;

    if let Some(error) = response.error {
        return Err(SentimentError::ScoringFailed(error));
    }

    match (response.label, response.score) {
        (Some(label), Some(score)) => Ok(RawPrediction { label, score }),
        _ => Err(SentimentError::ScoringFailed(format!(
            "応答に label/score がありません: {}",
            line.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_ok() {
        let raw = parse_response("{\"label\": \"4 stars\", \"score\": 0.61}\n").unwrap();
        assert_eq!(raw.label, "4 stars");
        assert!((raw.score - 0.61).abs() < 1e-6);
    }

    #[test]
    fn test_parse_response_error_field() {
        let err = parse_response(r#"{"error": "model not loaded"}"#).unwrap_err();
        assert!(matches!(err, SentimentError::ScoringFailed(ref msg) if msg == "model not loaded"));
    }

    #[test]
    fn test_parse_response_missing_fields() {
        assert!(matches!(
            parse_response(r#"{"label": "4 stars"}"#),
            Err(SentimentError::ScoringFailed(_))
        ));
        assert!(matches!(
            parse_response("not json"),
            Err(SentimentError::ScoringFailed(_))
        ));
    }

    #[test]
    fn test_spawn_without_command() {
        let result = CommandCapability::spawn(&[]);
        assert!(matches!(result, Err(SentimentError::Config(_))));
    }

    #[cfg(unix)]
    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[cfg(unix)]
    #[test]
    fn test_process_reused_across_requests() {
        // 1行読むごとに連番付きの応答を返す
        let capability = CommandCapability::spawn(&sh(
            r#"n=0; while read line; do n=$((n+1)); echo "{\"label\": \"$n stars\", \"score\": 0.5}"; done"#,
        ))
        .unwrap();

        let labels: Vec<String> = (0..3)
            .map(|_| capability.predict("Ótimo produto!").unwrap().label)
            .collect();

        assert_eq!(labels, vec!["1 stars", "2 stars", "3 stars"]);
        assert!(capability.name().starts_with("command:"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exited_process_is_scoring_failure() {
        let capability = CommandCapability::spawn(&sh("exit 0")).unwrap();
        let result = capability.predict("texto");
        assert!(matches!(result, Err(SentimentError::ScoringFailed(_))));
    }
}
