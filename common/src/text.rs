//! 入力テキストの切り詰め

/// 分類モデルへ渡す最大文字数
pub const MAX_INPUT_CHARS: usize = 512;

/// 先頭 `max_chars` 文字で切り詰める
///
/// トークン単位ではなく文字（Unicodeスカラー値）単位のハードカット。
/// `max_chars` 以下のテキストはそのまま返す。
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unmodified() {
        assert_eq!(truncate_chars("Ótimo produto!", MAX_INPUT_CHARS), "Ótimo produto!");
        assert_eq!(truncate_chars("", MAX_INPUT_CHARS), "");
    }

    #[test]
    fn test_exact_length_unmodified() {
        let text = "a".repeat(MAX_INPUT_CHARS);
        assert_eq!(truncate_chars(&text, MAX_INPUT_CHARS), text);
    }

    #[test]
    fn test_long_text_cut_to_prefix() {
        let text = "b".repeat(MAX_INPUT_CHARS + 100);
        let cut = truncate_chars(&text, MAX_INPUT_CHARS);
        assert_eq!(cut.chars().count(), MAX_INPUT_CHARS);
        assert!(text.starts_with(cut));
    }

    #[test]
    fn test_multibyte_counts_chars_not_bytes() {
        // "é" は2バイト
        let text = "é".repeat(600);
        let cut = truncate_chars(&text, MAX_INPUT_CHARS);
        assert_eq!(cut.chars().count(), MAX_INPUT_CHARS);
        assert_eq!(cut.len(), MAX_INPUT_CHARS * 2);
    }
}
