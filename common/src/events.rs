//! ワークフローの状態・操作・イベント定義
//!
//! コントローラは状態変化を直列化可能なイベントとして発行し、
//! 表示層（CLI・テストハーネス）はそれを購読するだけで描画できる。
//! ウィジェットを直接触る出力経路は持たない。

use crate::consensus::ConsensusResult;
use crate::types::ConfidenceBand;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 画像バッチの取得方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowMode {
    /// フォルダ走査で自動的に次のバッチへ進む
    Auto,
    /// 外部バッファ（クリップボード）のポーリングで待ち受ける
    Manual,
}

impl WorkflowMode {
    /// 切替先のモード
    pub fn toggled(self) -> Self {
        match self {
            WorkflowMode::Auto => WorkflowMode::Manual,
            WorkflowMode::Manual => WorkflowMode::Auto,
        }
    }
}

/// コントローラの状態
///
/// Idle → AwaitingBatch → Recognizing → AwaitingDecision → Committing
/// → AwaitingBatch のループ。終了は明示的な操作のみ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowState {
    Idle,
    AwaitingBatch,
    Recognizing,
    AwaitingDecision,
    Committing,
}

/// 操作者の決定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum OperatorAction {
    /// ラベルを確定してバッチを移動する
    Accept { label: String },
    /// 分類不能として未分類バケツへ送る
    Unclassifiable,
    /// ファイルを移動せず次のバッチへ（Autoのみ）
    Continue,
    /// 現在のフォルダをファイルブラウザで開く
    OpenFolder,
    /// モードを切り替える
    SwitchMode { mode: WorkflowMode },
    /// 終了する
    Quit,
}

/// 状態変化イベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WorkflowEvent {
    /// ルートが確定した（totalはルート直下の項目数）
    RootChanged { root: PathBuf, total: usize },
    /// バッチが届いた
    ///
    /// proposalは分類済みツリー走査時のフォルダ由来のラベル提案、
    /// remainingは残り兄弟フォルダ数（どちらもAutoのみ）。
    BatchReady {
        paths: Vec<PathBuf>,
        proposal: Option<String>,
        remaining: Option<usize>,
    },
    /// 走査先のフォルダに画像がなかった
    EmptyFolder { folder: PathBuf },
    /// 認識は行われない（信頼度表示は空欄のまま）
    RecognitionSkipped,
    /// 合意結果が出た（NoConsensusを含む）
    ConsensusReady {
        result: ConsensusResult,
        band: Option<ConfidenceBand>,
        percent: Option<u32>,
    },
    /// 操作者の決定待ちに入った
    DecisionRequired,
    /// ラベル入力を拒否した（決定待ちのまま）
    LabelRejected { input: String },
    /// バッチの移動が完了した
    RelocationComplete {
        destination: PathBuf,
        moved: usize,
        remaining: usize,
    },
    /// モードが切り替わった
    ModeChanged { mode: WorkflowMode },
    /// 終了した
    Stopped,
}
