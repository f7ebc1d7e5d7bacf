//! 外部tesseract CLIによるテキスト検出エンジン
//!
//! エンジン本体はブラックボックス: 前処理済みのラスタを一時PNGに
//! 書き出してCLIへ渡し、TSV出力を (テキスト, 信頼度) に読み替える。

use crate::error::{GlyphSortError, Result};
use crate::recognizer::engine::{DetectionProfile, TextDetector};
use glyph_sort_common::Detection;
use image::RgbImage;
use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

/// 一時ファイル名の連番（バッチ内の並列呼び出しで衝突しないように）
static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// tesseract CLIラッパ
pub struct TesseractEngine {
    command: String,
    profile: DetectionProfile,
    scratch_dir: PathBuf,
}

impl TesseractEngine {
    /// エンジンを初期化する（有効化時に一度だけ呼ぶ）
    ///
    /// `--version` で実行可否を確認する。見つからない・起動できない場合は
    /// EngineUnavailableとなり、呼び出し側は認識なしで運用を続ける。
    pub fn new(command: &str, profile: DetectionProfile) -> Result<Self> {
        let output = Command::new(command).arg("--version").output().map_err(|e| {
            GlyphSortError::EngineUnavailable(format!("{}: {}", command, e))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GlyphSortError::EngineUnavailable(format!(
                "{} --version (code {:?}): {}",
                command,
                output.status.code(),
                stderr
            )));
        }

        let scratch_dir = std::env::temp_dir().join("glyph-sort-ocr");
        std::fs::create_dir_all(&scratch_dir)?;

        Ok(Self {
            command: command.to_string(),
            profile,
            scratch_dir,
        })
    }

    fn scratch_path(&self) -> PathBuf {
        let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
        self.scratch_dir
            .join(format!("scan-{}-{}.png", std::process::id(), seq))
    }
}

impl TextDetector for TesseractEngine {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>> {
        let input = self.scratch_path();
        image.save(&input)?;

        let output = Command::new(&self.command)
            .arg(&input)
            .arg("stdout")
            .args(["-l", &self.profile.languages])
            .args(["--psm", &self.profile.page_seg_mode.to_string()])
            .args(["--oem", &self.profile.engine_mode.to_string()])
            .arg("tsv")
            .output();
        let _ = std::fs::remove_file(&input);

        let output = output
            .map_err(|e| GlyphSortError::EngineFailed(format!("{}: {}", self.command, e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GlyphSortError::EngineFailed(format!(
                "{} (code {:?}): {}",
                self.command,
                output.status.code(),
                stderr
            )));
        }

        Ok(parse_tsv(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// TSV出力を検出列へ読み替える
///
/// 列: level page block par line word left top width height conf text
/// conf < 0 の行（テキストでない階層行）と空テキストは読み飛ばす。
fn parse_tsv(tsv: &str) -> Vec<Detection> {
    let mut detections = Vec::new();
    for line in tsv.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }
        let conf: f32 = match cols[10].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        if conf < 0.0 {
            continue;
        }
        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }
        detections.push(Detection::new(text, conf / 100.0));
    }
    detections
}
