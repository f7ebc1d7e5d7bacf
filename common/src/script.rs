//! 対象文字（漢字）判定
//!
//! 検出テキストとラベル入力の両方で使う単一の文字範囲チェック。
//! 言語モデルによる判定ではなく、CJK統合漢字（基本・拡張A・拡張B）の
//! 連続レンジ照合のみを行う。

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 対象文字のみで構成される非空文字列
    static ref TARGET_TEXT_RE: Regex =
        Regex::new(r"^[\u{4e00}-\u{9fff}\u{3400}-\u{4dbf}\u{20000}-\u{2a6df}]+$").unwrap();
}

/// 文字列全体が対象文字のみで構成されているか
pub fn is_target_text(text: &str) -> bool {
    TARGET_TEXT_RE.is_match(text)
}

/// ラベル入力を検証する
///
/// 受け付けるのは対象文字ちょうど1文字。フォルダ名は1ラベル=1文字の
/// 前提なので、複数文字はここで弾く。
pub fn validate_label(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.chars().count() == 1 && is_target_text(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(Error::InvalidLabel(input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_text_single_glyph() {
        assert!(is_target_text("甲"));
        assert!(is_target_text("乙"));
        assert!(is_target_text("龘"));
    }

    #[test]
    fn test_target_text_multi_glyph() {
        // 複数文字でも全文字が対象範囲なら真（検出テキスト向け）
        assert!(is_target_text("甲乙"));
        assert!(is_target_text("第三章"));
    }

    #[test]
    fn test_target_text_extension_ranges() {
        // 拡張A (U+3400) と拡張B (U+20000)
        assert!(is_target_text("\u{3400}"));
        assert!(is_target_text("\u{20000}"));
    }

    #[test]
    fn test_non_target_text() {
        assert!(!is_target_text("AB"));
        assert!(!is_target_text("abc"));
        assert!(!is_target_text("123"));
        assert!(!is_target_text("カナ"));
        assert!(!is_target_text("甲A"));
        assert!(!is_target_text(""));
    }

    #[test]
    fn test_validate_label_accepts_single_glyph() {
        assert_eq!(validate_label("甲").unwrap(), "甲");
        assert_eq!(validate_label(" 乙 ").unwrap(), "乙");
        // 拡張Bの1文字（1スカラー値）も通る
        assert_eq!(validate_label("\u{20000}").unwrap(), "\u{20000}");
    }

    #[test]
    fn test_validate_label_rejects() {
        assert!(validate_label("AB").is_err());
        assert!(validate_label("甲乙").is_err());
        assert!(validate_label("A").is_err());
        assert!(validate_label("").is_err());
        assert!(validate_label("  ").is_err());
    }
}
