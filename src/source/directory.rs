//! フォルダ走査ソース
//!
//! 現在ルートの役割（FolderRole）で3つの走査モードを切り替える。
//! 要求のたびに同期的に動き、バックグラウンドタスクは持たない。

use crate::error::Result;
use crate::source::{list_subfolders, scan_images};
use glyph_sort_common::cursor::{folder_glyph, next_sibling_index};
use glyph_sort_common::{FolderCursor, FolderRole, ImageBatch};

/// 1回の走査結果
#[derive(Debug, Clone)]
pub struct DirectoryBatch {
    pub batch: ImageBatch,
    /// 分類済みツリー走査時のラベル提案（フォルダ名末尾の文字）
    pub proposal: Option<String>,
    /// 分類済みツリー走査時の残り兄弟フォルダ数
    pub remaining: Option<usize>,
}

/// フォルダ走査によるバッチソース
#[derive(Debug, Default)]
pub struct DirectorySource;

impl DirectorySource {
    /// 次のバッチを組み立てる
    ///
    /// 分類済みツリーではカーソルを次の兄弟フォルダへ進める（末尾を
    /// 越えたら先頭へ折り返す）。通常フォルダでは先頭の1枚だけを返す
    /// （単ページ運用）。
    pub fn next_batch(&self, cursor: &mut FolderCursor) -> Result<DirectoryBatch> {
        match cursor.role() {
            FolderRole::ClassifiedRoot => {
                let children = list_subfolders(cursor.root())?;
                let Some(first) = children.first() else {
                    return Ok(DirectoryBatch {
                        batch: ImageBatch::default(),
                        proposal: None,
                        remaining: Some(0),
                    });
                };
                // 最初の子フォルダを起点にする (index 0)
                let remaining = children.len();
                cursor.move_to(first.clone());
                Ok(DirectoryBatch {
                    batch: scan_images(cursor.root())?,
                    proposal: folder_glyph(cursor.root()),
                    remaining: Some(remaining),
                })
            }
            FolderRole::ClassifiedChild => {
                let parent = cursor
                    .root()
                    .parent()
                    .map(std::path::Path::to_path_buf)
                    .unwrap_or_else(|| cursor.root().to_path_buf());
                let siblings = list_subfolders(&parent)?;
                let current = siblings
                    .iter()
                    .position(|s| s == cursor.root())
                    .unwrap_or(0);
                let next = next_sibling_index(current, siblings.len());
                let remaining = siblings.len() - next;
                cursor.move_to(siblings[next].clone());
                Ok(DirectoryBatch {
                    batch: scan_images(cursor.root())?,
                    proposal: folder_glyph(cursor.root()),
                    remaining: Some(remaining),
                })
            }
            FolderRole::UnclassifiedRoot | FolderRole::Plain => {
                // 通常フォルダは先頭の1枚のみ（単ページ運用）
                let all = scan_images(cursor.root())?;
                let batch = ImageBatch::from_paths(all.paths().iter().take(1).cloned());
                Ok(DirectoryBatch {
                    batch,
                    proposal: None,
                    remaining: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_sort_common::CLASSIFIED_DIR;
    use std::fs::File;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    /// classified/chapter_X 形式のツリーを作る
    fn build_classified_tree(base: &Path, glyphs: &[&str]) -> PathBuf {
        let classified = base.join(CLASSIFIED_DIR);
        for glyph in glyphs {
            let chapter = classified.join(format!("chapter_{glyph}"));
            std::fs::create_dir_all(&chapter).unwrap();
            File::create(chapter.join("page1.png")).unwrap();
            File::create(chapter.join("page2.png")).unwrap();
        }
        classified
    }

    #[test]
    fn test_classified_root_enters_first_child() {
        let dir = tempdir().unwrap();
        let classified = build_classified_tree(dir.path(), &["甲", "乙", "丙"]);
        let mut cursor = FolderCursor::new(classified.clone());

        let result = DirectorySource.next_batch(&mut cursor).unwrap();
        // 名前順で最初の子フォルダに入る（丙 U+4E19 が最小）
        assert_eq!(cursor.role(), FolderRole::ClassifiedChild);
        assert!(cursor.root().ends_with("chapter_丙"));
        assert_eq!(result.batch.len(), 2);
        assert_eq!(result.remaining, Some(3));
        assert!(result.proposal.is_some());
    }

    #[test]
    fn test_classified_child_advances_to_next_sibling() {
        let dir = tempdir().unwrap();
        let classified = build_classified_tree(dir.path(), &["甲", "乙", "丙"]);
        let siblings = list_subfolders(&classified).unwrap();

        let mut cursor = FolderCursor::new(siblings[0].clone());
        let result = DirectorySource.next_batch(&mut cursor).unwrap();

        assert_eq!(cursor.root(), siblings[1].as_path());
        assert_eq!(result.remaining, Some(2));
        assert_eq!(result.proposal, folder_glyph(&siblings[1]));
        assert_eq!(result.batch.len(), 2);
    }

    #[test]
    fn test_classified_child_wraps_past_end() {
        let dir = tempdir().unwrap();
        let classified = build_classified_tree(dir.path(), &["甲", "乙", "丙"]);
        let siblings = list_subfolders(&classified).unwrap();

        // 末尾の兄弟からは先頭へ折り返し、残りは全数になる
        let mut cursor = FolderCursor::new(siblings[2].clone());
        let result = DirectorySource.next_batch(&mut cursor).unwrap();

        assert_eq!(cursor.root(), siblings[0].as_path());
        assert_eq!(result.remaining, Some(3));
    }

    #[test]
    fn test_plain_folder_single_image_mode() {
        let dir = tempdir().unwrap();
        let scans = dir.path().join("scans");
        std::fs::create_dir(&scans).unwrap();
        File::create(scans.join("b.png")).unwrap();
        File::create(scans.join("a.png")).unwrap();
        File::create(scans.join("c.png")).unwrap();

        let mut cursor = FolderCursor::new(scans.clone());
        let result = DirectorySource.next_batch(&mut cursor).unwrap();

        // 名前順の先頭1枚のみ。カーソルは動かない
        assert_eq!(result.batch.len(), 1);
        assert!(result.batch.paths()[0].ends_with("a.png"));
        assert_eq!(result.proposal, None);
        assert_eq!(result.remaining, None);
        assert_eq!(cursor.root(), scans.as_path());
    }

    #[test]
    fn test_empty_classified_root() {
        let dir = tempdir().unwrap();
        let classified = dir.path().join(CLASSIFIED_DIR);
        std::fs::create_dir(&classified).unwrap();

        let mut cursor = FolderCursor::new(classified.clone());
        let result = DirectorySource.next_batch(&mut cursor).unwrap();
        assert!(result.batch.is_empty());
        assert_eq!(result.remaining, Some(0));
        // 入る先がないのでカーソルは動かない
        assert_eq!(cursor.root(), classified.as_path());
    }

    #[test]
    fn test_plain_folder_without_images() {
        let dir = tempdir().unwrap();
        let scans = dir.path().join("scans");
        std::fs::create_dir(&scans).unwrap();
        File::create(scans.join("notes.txt")).unwrap();

        let mut cursor = FolderCursor::new(scans);
        let result = DirectorySource.next_batch(&mut cursor).unwrap();
        assert!(result.batch.is_empty());
    }
}
