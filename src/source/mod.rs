//! バッチソース
//!
//! 1サイクル分の画像バッチを組み立てる2つの戦略:
//! - PollSource: 外部バッファ（クリップボード）を1秒間隔でサンプリング
//! - DirectorySource: フォルダ走査（分類済みツリーの巡回／単画像モード）

mod clipboard;
mod directory;
mod poll;

pub use clipboard::ClipboardBuffer;
pub use directory::{DirectoryBatch, DirectorySource};
pub use poll::{PasteBuffer, PollSource, POLL_INTERVAL};

use crate::error::{GlyphSortError, Result};
use glyph_sort_common::ImageBatch;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// フォルダ直下の画像をバッチとして列挙する（名前順、上限まで）
pub fn scan_images(folder: &Path) -> Result<ImageBatch> {
    if !folder.exists() {
        return Err(GlyphSortError::FolderNotFound(folder.display().to_string()));
    }
    if !folder.is_dir() {
        return Err(GlyphSortError::NotADirectory(folder.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();

    Ok(ImageBatch::from_paths(paths))
}

/// フォルダ直下のサブフォルダを名前順に列挙する
pub fn list_subfolders(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut folders: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    folders.sort();
    Ok(folders)
}

/// フォルダ直下の項目数（統計表示・残数報告用）
pub fn entry_count(folder: &Path) -> Result<usize> {
    Ok(std::fs::read_dir(folder)?.filter_map(|e| e.ok()).count())
}
