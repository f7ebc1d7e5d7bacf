//! バッチ合意リデューサ
//!
//! バッチ内の画像ごとのOCR結果を、1つの提案ラベルと信頼度に還元する。
//!
//! ## アルゴリズム
//! 1. 画像ごとに先頭の検出のみ採用する（同一画像の2件目以降は捨てる）
//! 2. 対象文字のみで構成されるテキストに絞る
//! 3. 相異なるテキストがちょうど1種類なら合意:
//!    ラベル = そのテキスト、信頼度 = 寄与した検出の最小値
//! 4. それ以外（検出なし・不一致・対象外文字のみ）は合意なし

use crate::script::is_target_text;
use crate::types::{ConfidenceBand, Detection};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// リデューサの結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConsensusResult {
    /// 全画像が同一テキストで合意
    Label { text: String, confidence: f32 },
    /// 合意なし
    NoConsensus,
}

impl ConsensusResult {
    /// 表示用の信頼度（最小値を百分率へ丸める）
    pub fn percent(&self) -> Option<u32> {
        match self {
            ConsensusResult::Label { confidence, .. } => {
                Some((confidence * 100.0).round() as u32)
            }
            ConsensusResult::NoConsensus => None,
        }
    }

    /// 表示用バンド
    pub fn band(&self) -> Option<ConfidenceBand> {
        match self {
            ConsensusResult::Label { confidence, .. } => {
                Some(ConfidenceBand::from_score(*confidence))
            }
            ConsensusResult::NoConsensus => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            ConsensusResult::Label { text, .. } => Some(text),
            ConsensusResult::NoConsensus => None,
        }
    }
}

/// 画像ごとの検出結果列からバッチの合意を求める
///
/// 各画像は先頭の検出のみが有効。検出のない画像は合意判定に関与しない。
pub fn reduce(per_image: &[(PathBuf, Vec<Detection>)]) -> ConsensusResult {
    let contributing: Vec<&Detection> = per_image
        .iter()
        .filter_map(|(_, detections)| detections.first())
        .filter(|d| is_target_text(&d.text))
        .collect();

    let mut texts: Vec<&str> = contributing.iter().map(|d| d.text.as_str()).collect();
    texts.sort_unstable();
    texts.dedup();

    if texts.len() != 1 {
        return ConsensusResult::NoConsensus;
    }

    let confidence = contributing
        .iter()
        .map(|d| d.confidence)
        .fold(f32::INFINITY, f32::min);

    ConsensusResult::Label {
        text: contributing[0].text.clone(),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str, detections: Vec<Detection>) -> (PathBuf, Vec<Detection>) {
        (PathBuf::from(name), detections)
    }

    #[test]
    fn test_unanimous_batch_takes_minimum_confidence() {
        let per_image = vec![
            image("a.png", vec![Detection::new("甲", 0.9)]),
            image("b.png", vec![Detection::new("甲", 0.85)]),
            image("c.png", vec![Detection::new("甲", 0.95)]),
        ];
        let result = reduce(&per_image);
        assert_eq!(result.label(), Some("甲"));
        // 最大でも平均でもなく、最小値の丸め
        assert_eq!(result.percent(), Some(85));
        assert_eq!(result.band(), Some(ConfidenceBand::High));
    }

    #[test]
    fn test_disagreement_is_no_consensus() {
        let per_image = vec![
            image("a.png", vec![Detection::new("甲", 0.99)]),
            image("b.png", vec![Detection::new("乙", 0.99)]),
        ];
        assert_eq!(reduce(&per_image), ConsensusResult::NoConsensus);
    }

    #[test]
    fn test_non_target_text_is_filtered_before_consensus() {
        // 対象外の検出は不一致としてではなく、除外してから数える
        let per_image = vec![
            image("a.png", vec![Detection::new("甲", 0.9)]),
            image("b.png", vec![Detection::new("AB", 0.99)]),
            image("c.png", vec![Detection::new("甲", 0.8)]),
        ];
        let result = reduce(&per_image);
        assert_eq!(result.label(), Some("甲"));
        assert_eq!(result.percent(), Some(80));
    }

    #[test]
    fn test_all_non_target_is_no_consensus() {
        let per_image = vec![
            image("a.png", vec![Detection::new("AB", 0.99)]),
            image("b.png", vec![Detection::new("xy", 0.98)]),
        ];
        assert_eq!(reduce(&per_image), ConsensusResult::NoConsensus);
    }

    #[test]
    fn test_no_detections_is_no_consensus() {
        let per_image = vec![image("a.png", Vec::new()), image("b.png", Vec::new())];
        assert_eq!(reduce(&per_image), ConsensusResult::NoConsensus);
        assert_eq!(reduce(&[]), ConsensusResult::NoConsensus);
    }

    #[test]
    fn test_only_first_detection_per_image_counts() {
        // 2件目以降は同一画像内の別領域でも無視される
        let per_image = vec![
            image("a.png", vec![Detection::new("甲", 0.9), Detection::new("乙", 0.99)]),
            image("b.png", vec![Detection::new("甲", 0.7)]),
        ];
        let result = reduce(&per_image);
        assert_eq!(result.label(), Some("甲"));
        assert_eq!(result.percent(), Some(70));
    }

    #[test]
    fn test_first_detection_non_target_drops_image() {
        // 先頭が対象外なら、2件目が対象文字でもその画像は寄与しない
        let per_image = vec![
            image("a.png", vec![Detection::new("A1", 0.9), Detection::new("甲", 0.99)]),
            image("b.png", vec![Detection::new("甲", 0.6)]),
        ];
        let result = reduce(&per_image);
        assert_eq!(result.label(), Some("甲"));
        assert_eq!(result.percent(), Some(60));
    }

    #[test]
    fn test_images_without_detection_do_not_block_consensus() {
        let per_image = vec![
            image("a.png", vec![Detection::new("甲", 0.45)]),
            image("b.png", Vec::new()),
        ];
        let result = reduce(&per_image);
        assert_eq!(result.label(), Some("甲"));
        assert_eq!(result.band(), Some(ConfidenceBand::Low));
    }

    #[test]
    fn test_band_none_for_very_low_confidence() {
        let per_image = vec![image("a.png", vec![Detection::new("甲", 0.2)])];
        let result = reduce(&per_image);
        assert_eq!(result.band(), Some(ConfidenceBand::None));
        assert_eq!(result.percent(), Some(20));
    }
}
