//! ファイル移動
//!
//! バッチのファイルを行き先フォルダへ移す。1件の失敗はログに残して
//! 読み飛ばし、バッチ全体は止めない。

use crate::error::Result;
use crate::source::entry_count;
use glyph_sort_common::{FolderCursor, ImageBatch, CHAPTER_PREFIX};
use std::path::{Path, PathBuf};

/// 行き先の種類
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// 確定ラベルのサブフォルダ（分類済みルート配下 chapter_<label>）
    Chapter(String),
    /// 未分類バケツ（分類済みルートの隣）
    Unclassifiable,
}

/// 移動要求
#[derive(Debug, Clone)]
pub struct RelocationRequest {
    pub batch: ImageBatch,
    pub destination: Destination,
}

/// 移動の結果
#[derive(Debug, Clone, PartialEq)]
pub struct RelocationOutcome {
    /// 実際の行き先フォルダ
    pub destination: PathBuf,
    /// 移動できた件数
    pub moved: usize,
    /// 移動元ルート直下に残っている項目数
    pub remaining: usize,
}

/// 行き先の実パスを求める
pub fn destination_dir(cursor: &FolderCursor, destination: &Destination) -> PathBuf {
    match destination {
        Destination::Chapter(label) => cursor
            .classified_root()
            .join(format!("{CHAPTER_PREFIX}{label}")),
        Destination::Unclassifiable => cursor.unclassified_root(),
    }
}

/// バッチを行き先へ移動し、移動元ルートの残り項目数を報告する
///
/// 行き先フォルダは無ければ作る。行き先が現在位置と同じファイルは
/// そのまま残す（分類済みツリーを再巡回して同じラベルを確定した場合）。
pub fn relocate(cursor: &FolderCursor, request: &RelocationRequest) -> Result<RelocationOutcome> {
    let dest_dir = destination_dir(cursor, &request.destination);
    std::fs::create_dir_all(&dest_dir)?;

    let mut moved = 0usize;
    for path in request.batch.paths() {
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = dest_dir.join(name);
        if target == *path {
            // 既に行き先にある
            continue;
        }
        match move_file(path, &target) {
            Ok(()) => {
                tracing::info!(to = %target.display(), "移動完了");
                moved += 1;
            }
            Err(e) => {
                tracing::warn!(
                    from = %path.display(),
                    to = %target.display(),
                    error = %e,
                    "移動に失敗したため読み飛ばし"
                );
            }
        }
    }

    let remaining = entry_count(cursor.root())?;
    Ok(RelocationOutcome {
        destination: dest_dir,
        moved,
        remaining,
    })
}

/// renameで移し、デバイス跨ぎはコピー+削除で代替する
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
    }
}
