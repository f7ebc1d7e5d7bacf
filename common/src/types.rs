//! バッチと検出結果の型定義
//!
//! CLIとテストハーネスで共有される型:
//! - Detection: OCRエンジンの検出結果1領域分
//! - ImageBatch: 1サイクルで扱う画像パスの列（上限25枚）
//! - ConfidenceBand: 操作者向けの信頼度バンド（表示専用）

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 1バッチの画像枚数上限
pub const MAX_BATCH_SIZE: usize = 25;

/// 対応する画像拡張子（小文字で比較）
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// OCRエンジンの検出結果1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// 検出テキスト
    pub text: String,
    /// 信頼度 [0,1]
    pub confidence: f32,
}

impl Detection {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// 拡張子が対応画像かどうか
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 1サイクルで扱う画像バッチ
///
/// コンストラクタで拡張子フィルタと上限の切り詰めを必ず通るため、
/// 上限超過や非画像パスを含むバッチは構築できない。
/// 順序はソース側の列挙順のまま保たれる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBatch {
    images: Vec<PathBuf>,
}

impl ImageBatch {
    /// 列挙順を保ったままフィルタして構築する
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let images = paths
            .into_iter()
            .filter(|p| is_image_path(p))
            .take(MAX_BATCH_SIZE)
            .collect();
        Self { images }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// 操作者向けの信頼度バンド
///
/// 自動判定には使わない、表示専用の目安。最終判断は常に操作者が行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
    None,
}

impl ConfidenceBand {
    /// スコアからバンドを求める
    pub fn from_score(score: f32) -> Self {
        if score > 0.8 {
            ConfidenceBand::High
        } else if score > 0.5 {
            ConfidenceBand::Medium
        } else if score > 0.3 {
            ConfidenceBand::Low
        } else {
            ConfidenceBand::None
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceBand::High => write!(f, "high"),
            ConfidenceBand::Medium => write!(f, "medium"),
            ConfidenceBand::Low => write!(f, "low"),
            ConfidenceBand::None => write!(f, "none"),
        }
    }
}
