//! OCR認識ラッパ
//!
//! 外部エンジンへ渡す前に画像を8倍へ拡大する。元画像の文字がエンジンの
//! 動作解像度に対して小さく、拡大なしでは精度が出ない。

mod engine;
mod tesseract;

pub use engine::{DetectionProfile, TextDetector};
pub use tesseract::TesseractEngine;

use crate::error::{GlyphSortError, Result};
use glyph_sort_common::{Detection, ImageBatch};
use image::imageops::FilterType;
use image::RgbImage;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 前処理の拡大倍率
const UPSCALE_FACTOR: u32 = 8;

/// OCR認識ラッパ
///
/// 起動時に一度だけ作られ、有効化されていない場合は存在しない
/// （呼び出し側はOption越しに扱い、認識を丸ごと飛ばす）。
pub struct Recognizer {
    engine: Box<dyn TextDetector>,
}

impl Recognizer {
    pub fn new(engine: Box<dyn TextDetector>) -> Self {
        Self { engine }
    }

    /// 1枚の画像を認識する
    pub fn recognize(&self, path: &Path) -> Result<Vec<Detection>> {
        let image = load_upscaled(path)?;
        self.engine.detect(&image)
    }

    /// バッチ全体を認識する（結果の順序はバッチの順序のまま）
    ///
    /// 1枚の失敗はバッチ全体を止めず、警告ログの上で検出なし扱いにする。
    pub fn recognize_batch(&self, batch: &ImageBatch) -> Vec<(PathBuf, Vec<Detection>)> {
        let bar = ProgressBar::new(batch.len() as u64);
        let results: Vec<(PathBuf, Vec<Detection>)> = batch
            .paths()
            .par_iter()
            .map(|path| {
                let detections = match self.recognize(path) {
                    Ok(detections) => detections,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "画像の認識に失敗");
                        Vec::new()
                    }
                };
                bar.inc(1);
                (path.clone(), detections)
            })
            .collect();
        bar.finish_and_clear();
        results
    }
}

/// 画像を読み込んで8倍へ拡大する
///
/// パスをそのままデコーダへ渡さず、バイト列経由で読み込む
/// （非ASCIIパスを含むため）。
pub fn load_upscaled(path: &Path) -> Result<RgbImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| GlyphSortError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let decoded = image::load_from_memory(&bytes)?;
    let upscaled = decoded.resize_exact(
        decoded.width() * UPSCALE_FACTOR,
        decoded.height() * UPSCALE_FACTOR,
        FilterType::CatmullRom,
    );
    Ok(upscaled.to_rgb8())
}
