//! モデル出力ラベルのパーサー
//!
//! 分類モデルは "1 star" 〜 "5 stars" 形式のラベルを返す。
//! 先頭の整数を星評価として取り出す。
//!
//! 文法（大文字小文字は区別しない）:
//! ```text
//! label := WS* INTEGER WS* ("star" | "stars") (境界 任意の文字列)?
//! ```

use crate::error::{Error, Result};
use crate::types::{MAX_STARS, MIN_STARS};
use regex::Regex;

/// ラベル文字列から星評価を取り出す
///
/// # Returns
/// * `Ok(u8)` - 1〜5の星評価
/// * `Err(Error::Parse)` - 形式が一致しない
/// * `Err(Error::InvalidRating)` - 整数が1〜5の範囲外
///
/// # Examples
/// ```
/// use review_sentiment_common::parse_star_label;
///
/// assert_eq!(parse_star_label("4 stars").unwrap(), 4);
/// assert_eq!(parse_star_label("1 star").unwrap(), 1);
/// assert!(parse_star_label("positive").is_err());
/// ```
pub fn parse_star_label(label: &str) -> Result<u8> {
    lazy_static::lazy_static! {
        static ref STAR_RE: Regex = Regex::new(r"(?i)^\s*(\d+)\s*stars?\b").unwrap();
    }

    let caps = STAR_RE.captures(label).ok_or_else(|| Error::Parse {
        label: label.to_string(),
    })?;

    // 桁あふれは範囲外として扱う
    let value: i64 = caps[1].parse().unwrap_or(i64::MAX);
    if value < i64::from(MIN_STARS) || value > i64::from(MAX_STARS) {
        return Err(Error::InvalidRating(value));
    }

    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_model_labels() {
        let labels = ["1 star", "2 stars", "3 stars", "4 stars", "5 stars"];
        for (i, label) in labels.iter().enumerate() {
            assert_eq!(parse_star_label(label).unwrap(), (i + 1) as u8, "label: {}", label);
        }
    }

    #[test]
    fn test_parse_ignores_surrounding_text() {
        assert_eq!(parse_star_label("  3 stars").unwrap(), 3);
        assert_eq!(parse_star_label("5 Stars (very positive)").unwrap(), 5);
        assert_eq!(parse_star_label("2stars").unwrap(), 2);
        assert_eq!(parse_star_label("1 STAR").unwrap(), 1);
    }

    #[test]
    fn test_parse_rejects_malformed_label() {
        for label in ["", "stars", "positive", "LABEL_4", "four stars", "4", "4 starfish", "x 4 stars"] {
            let result = parse_star_label(label);
            assert!(
                matches!(result, Err(Error::Parse { .. })),
                "label {:?} → {:?}",
                label,
                result
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(parse_star_label("0 stars"), Err(Error::InvalidRating(0))));
        assert!(matches!(parse_star_label("6 stars"), Err(Error::InvalidRating(6))));
        assert!(matches!(
            parse_star_label("99999999999999999999999 stars"),
            Err(Error::InvalidRating(_))
        ));
    }
}
