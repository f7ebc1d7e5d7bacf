//! フォルダカーソルと役割タグ
//!
//! カーソルはワークフローの現在位置。役割（FolderRole）はルート変更時に
//! 一度だけ判定して保持し、使用箇所ごとのパス文字列検査はしない。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 分類済みツリーの最上位フォルダ名
pub const CLASSIFIED_DIR: &str = "classified";
/// 未分類バケツのフォルダ名（分類済みルートの隣に置く）
pub const UNCLASSIFIED_DIR: &str = "unclassified";
/// ラベル別サブフォルダ名の接頭辞
pub const CHAPTER_PREFIX: &str = "chapter_";

/// カーソルが指すフォルダの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FolderRole {
    /// 分類済みツリーの最上位
    ClassifiedRoot,
    /// 分類済みツリー直下のラベル別フォルダ
    ClassifiedChild,
    /// 未分類バケツ
    UnclassifiedRoot,
    /// それ以外の通常フォルダ
    Plain,
}

impl FolderRole {
    /// パス名から役割を判定する（ルート設定時に一度だけ呼ぶ）
    pub fn of(path: &Path) -> Self {
        let name = path.file_name().and_then(|n| n.to_str());
        if name == Some(CLASSIFIED_DIR) {
            return FolderRole::ClassifiedRoot;
        }
        if name == Some(UNCLASSIFIED_DIR) {
            return FolderRole::UnclassifiedRoot;
        }
        let parent_name = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());
        if parent_name == Some(CLASSIFIED_DIR) {
            return FolderRole::ClassifiedChild;
        }
        FolderRole::Plain
    }
}

/// ワークフローの現在位置
///
/// コントローラだけが所有・更新する。バックグラウンドのソースは
/// この状態を読まない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderCursor {
    root: PathBuf,
    role: FolderRole,
}

impl FolderCursor {
    /// ルートを設定し、役割を計算して保持する
    pub fn new(root: PathBuf) -> Self {
        let role = FolderRole::of(&root);
        Self { root, role }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn role(&self) -> FolderRole {
        self.role
    }

    /// ルートを移動する（役割も更新される）
    pub fn move_to(&mut self, root: PathBuf) {
        *self = Self::new(root);
    }

    /// 分類済みルート（chapter_* の親）を導出する
    pub fn classified_root(&self) -> PathBuf {
        match self.role {
            FolderRole::ClassifiedRoot => self.root.clone(),
            FolderRole::ClassifiedChild => self
                .root
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.root.clone()),
            FolderRole::UnclassifiedRoot | FolderRole::Plain => {
                let base = self.root.parent().unwrap_or_else(|| self.root.as_path());
                base.join(CLASSIFIED_DIR)
            }
        }
    }

    /// 未分類バケツ（分類済みルートの隣）を導出する
    pub fn unclassified_root(&self) -> PathBuf {
        if self.role == FolderRole::UnclassifiedRoot {
            return self.root.clone();
        }
        let classified = self.classified_root();
        let base = classified.parent().unwrap_or_else(|| classified.as_path());
        base.join(UNCLASSIFIED_DIR)
    }
}

/// フォルダ名の末尾の文字（分類済みフォルダからのラベル提案に使う）
pub fn folder_glyph(path: &Path) -> Option<String> {
    path.file_name()?
        .to_str()?
        .chars()
        .last()
        .map(|c| c.to_string())
}

/// 兄弟リスト内の次のインデックス（末尾を越えたら0へ折り返す）
pub fn next_sibling_index(current: usize, sibling_count: usize) -> usize {
    if sibling_count == 0 {
        return 0;
    }
    let next = current + 1;
    if next < sibling_count {
        next
    } else {
        0
    }
}
