//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// Scorerに空のテキストが渡された
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// ラベルが "<N> star(s)" 形式ではない
    #[error("Parse error: unexpected label {label:?}")]
    Parse { label: String },

    /// 星評価が1〜5の範囲外
    #[error("Invalid rating: {0} (expected 1-5)")]
    InvalidRating(i64),

    /// 信頼度が0〜1の範囲外
    #[error("Invalid confidence: {0} (expected 0.0-1.0)")]
    InvalidConfidence(f32),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse() {
        let error = Error::Parse { label: "great".to_string() };
        assert_eq!(format!("{}", error), "Parse error: unexpected label \"great\"");
    }

    #[test]
    fn test_error_display_invalid_rating() {
        let error = Error::InvalidRating(7);
        assert_eq!(format!("{}", error), "Invalid rating: 7 (expected 1-5)");
    }

    #[test]
    fn test_error_display_invalid_confidence() {
        let error = Error::InvalidConfidence(1.5);
        assert!(format!("{}", error).contains("1.5"));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidInput("空のテキスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidInput"));
        assert!(debug.contains("空のテキスト"));
    }
}
