//! OSクリップボードのバッファ実装
//!
//! ファイルドロップ相当のペイロードだけを消費する: テキストとして
//! 貼られたパス一覧を1行1件で読み取り、実在するファイルに絞る。
//! ビットマップなどテキスト以外の内容は「保持なし」と同じ扱い。

use crate::error::{GlyphSortError, Result};
use crate::source::PasteBuffer;
use arboard::Clipboard;
use std::path::PathBuf;

/// システムクリップボードを読むバッファ
///
/// ハンドルは保持せず、ティックごとに開き直す（プラットフォームの
/// ハンドルをタスク間で持ち回らないため）。
#[derive(Debug, Default, Clone, Copy)]
pub struct ClipboardBuffer;

impl ClipboardBuffer {
    pub fn new() -> Self {
        Self
    }
}

impl PasteBuffer for ClipboardBuffer {
    fn current_paths(&mut self) -> Result<Vec<PathBuf>> {
        let mut clipboard =
            Clipboard::new().map_err(|e| GlyphSortError::Clipboard(e.to_string()))?;
        let text = match clipboard.get_text() {
            Ok(text) => text,
            Err(arboard::Error::ContentNotAvailable) => return Ok(Vec::new()),
            Err(e) => return Err(GlyphSortError::Clipboard(e.to_string())),
        };
        Ok(parse_path_list(&text))
    }
}

/// 貼り付けテキストをパス一覧として解釈する
fn parse_path_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.strip_prefix("file://").unwrap_or(line))
        .map(PathBuf::from)
        .filter(|path| path.is_file())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_parse_path_list_keeps_existing_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        File::create(&a).unwrap();

        let text = format!("{}\n{}\n\n", a.display(), dir.path().join("離れ.png").display());
        let paths = parse_path_list(&text);
        assert_eq!(paths, vec![a]);
    }

    #[test]
    fn test_parse_path_list_strips_file_uri() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        File::create(&a).unwrap();

        let text = format!("file://{}", a.display());
        let paths = parse_path_list(&text);
        assert_eq!(paths, vec![a]);
    }

    #[test]
    fn test_parse_path_list_ignores_free_text() {
        assert!(parse_path_list("ただのメモ\n2行目").is_empty());
        assert!(parse_path_list("").is_empty());
    }
}
