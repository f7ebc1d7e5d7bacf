//! OCRエンジン境界
//!
//! エンジンはデコード済みのラスタを受け取り (テキスト, 信頼度) の列を
//! 返すブラックボックスとして扱う。検出プロファイルは有効化時に一度
//! だけ固定され、呼び出しごとの再設定はしない。

use crate::error::Result;
use glyph_sort_common::Detection;
use image::RgbImage;

/// 検出プロファイル（操作者による調整は不可）
#[derive(Debug, Clone)]
pub struct DetectionProfile {
    /// 認識言語
    pub languages: String,
    /// ページセグメンテーションモード
    ///
    /// 11 = 疎テキスト: 領域ごとに検出し、段落へのグルーピングは行わない
    pub page_seg_mode: u8,
    /// エンジンモード（1 = LSTM）
    pub engine_mode: u8,
}

impl Default for DetectionProfile {
    fn default() -> Self {
        Self {
            languages: "chi_sim+chi_tra".into(),
            page_seg_mode: 11,
            engine_mode: 1,
        }
    }
}

impl DetectionProfile {
    pub fn with_languages(languages: &str) -> Self {
        Self {
            languages: languages.into(),
            ..Default::default()
        }
    }
}

/// テキスト検出エンジンの境界
///
/// バウンディング情報は扱わない。返す順序は読み取り順。
pub trait TextDetector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>>;
}
