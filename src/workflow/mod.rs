//! ワークフローコントローラ
//!
//! バッチ取得→認識→確認→移動のサイクルを回す状態機械。
//!
//! ## 状態遷移
//! Idle → AwaitingBatch → Recognizing → AwaitingDecision → Committing
//! → AwaitingBatch のループ。終了は明示的な操作のみ。
//!
//! カーソルとモードはコントローラが単独で所有する。ポーリングタスクは
//! バッチを作るだけで、この状態には一切触れない。状態変化はイベントと
//! して発行し、表示層はそれを購読する。

use crate::error::{GlyphSortError, Result};
use crate::explorer;
use crate::organizer::{self, Destination, RelocationRequest};
use crate::recognizer::Recognizer;
use crate::source::{entry_count, DirectorySource, PasteBuffer, PollSource};
use glyph_sort_common::{
    consensus, validate_label, ConsensusResult, FolderCursor, ImageBatch, OperatorAction,
    WorkflowEvent, WorkflowMode, WorkflowState,
};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Manualモード開始のたびに新しいバッファを作るファクトリ
pub type BufferFactory = Box<dyn Fn() -> Box<dyn PasteBuffer> + Send>;

/// 決定待ちのバッチ
#[derive(Debug, Clone)]
pub struct PendingBatch {
    pub batch: ImageBatch,
    /// 認識結果（認識無効時はNone）
    pub consensus: Option<ConsensusResult>,
    /// フォルダ由来のラベル提案（分類済みツリー走査時のみ）
    pub proposal: Option<String>,
}

impl PendingBatch {
    /// 空入力で確定するときの提案ラベル
    ///
    /// 合意ラベルを優先し、なければフォルダ由来の提案。
    pub fn proposed_label(&self) -> Option<String> {
        if let Some(ConsensusResult::Label { text, .. }) = &self.consensus {
            return Some(text.clone());
        }
        self.proposal.clone()
    }
}

/// 決定の適用結果
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// 移動（または無移動続行）が確定し、次のバッチ待ちへ
    Committed,
    /// 入力が拒否されるか副作用のみで、決定待ちのまま
    Pending,
    /// モードが切り替わった
    ModeSwitched,
    /// 終了した
    Stopped,
}

/// 稼働中のポーリングソース
struct PollHandle {
    rx: mpsc::Receiver<ImageBatch>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

pub struct WorkflowController {
    mode: WorkflowMode,
    state: WorkflowState,
    cursor: FolderCursor,
    recognizer: Option<Recognizer>,
    pending: Option<PendingBatch>,
    directory: DirectorySource,
    poll: Option<PollHandle>,
    buffer_factory: BufferFactory,
    events: mpsc::UnboundedSender<WorkflowEvent>,
}

impl WorkflowController {
    /// ルートを検証してコントローラを作る
    ///
    /// 存在しないパス・フォルダ以外は見える検証エラーとして返し、
    /// 状態は作られない。
    pub fn new(
        root: PathBuf,
        recognizer: Option<Recognizer>,
        buffer_factory: BufferFactory,
        events: mpsc::UnboundedSender<WorkflowEvent>,
    ) -> Result<Self> {
        if !root.exists() {
            return Err(GlyphSortError::FolderNotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(GlyphSortError::NotADirectory(root.display().to_string()));
        }

        let cursor = FolderCursor::new(root);
        let total = entry_count(cursor.root())?;

        let controller = Self {
            mode: WorkflowMode::Auto,
            state: WorkflowState::Idle,
            cursor,
            recognizer,
            pending: None,
            directory: DirectorySource,
            poll: None,
            buffer_factory,
            events,
        };
        controller.emit(WorkflowEvent::RootChanged {
            root: controller.cursor.root().to_path_buf(),
            total,
        });
        Ok(controller)
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn mode(&self) -> WorkflowMode {
        self.mode
    }

    pub fn cursor(&self) -> &FolderCursor {
        &self.cursor
    }

    pub fn recognition_enabled(&self) -> bool {
        self.recognizer.is_some()
    }

    fn emit(&self, event: WorkflowEvent) {
        // 受け手がいなくてもワークフローは止めない
        let _ = self.events.send(event);
    }

    /// モードを選んでワークフローを開始する (Idle → AwaitingBatch)
    pub fn start(&mut self, mode: WorkflowMode) {
        self.mode = mode;
        if mode == WorkflowMode::Manual {
            self.spawn_poll();
        }
        self.state = WorkflowState::AwaitingBatch;
    }

    fn spawn_poll(&mut self) {
        let cancel = CancellationToken::new();
        let source = PollSource::new((self.buffer_factory)());
        let (rx, task) = source.spawn(cancel.clone());
        self.poll = Some(PollHandle { rx, cancel, task });
    }

    /// 稼働中のポーリングタスクを止め、終了を待つ
    ///
    /// 前のタスクの終了を確認するまで、新しいソースは起動しない。
    async fn stop_poll(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel.cancel();
            let _ = poll.task.await;
        }
    }

    /// 次のバッチを待ち、認識まで進める
    /// (AwaitingBatch → Recognizing → AwaitingDecision)
    ///
    /// Autoはフォルダ走査から同期的に、Manualはポーリングタスクからの
    /// 受信を待つ。Noneはソース停止を意味する。
    pub async fn advance(&mut self) -> Result<Option<&PendingBatch>> {
        self.state = WorkflowState::AwaitingBatch;

        let (batch, proposal, remaining) = match self.mode {
            WorkflowMode::Auto => {
                let dir_batch = self.directory.next_batch(&mut self.cursor)?;
                (dir_batch.batch, dir_batch.proposal, dir_batch.remaining)
            }
            WorkflowMode::Manual => {
                let Some(poll) = self.poll.as_mut() else {
                    return Ok(None);
                };
                match poll.rx.recv().await {
                    Some(batch) => (batch, None, None),
                    None => return Ok(None),
                }
            }
        };

        self.emit(WorkflowEvent::BatchReady {
            paths: batch.paths().to_vec(),
            proposal: proposal.clone(),
            remaining,
        });
        if batch.is_empty() {
            self.emit(WorkflowEvent::EmptyFolder {
                folder: self.cursor.root().to_path_buf(),
            });
        }

        let consensus = match &self.recognizer {
            Some(recognizer) if !batch.is_empty() => {
                self.state = WorkflowState::Recognizing;
                let per_image = recognizer.recognize_batch(&batch);
                let result = consensus::reduce(&per_image);
                self.emit(WorkflowEvent::ConsensusReady {
                    band: result.band(),
                    percent: result.percent(),
                    result: result.clone(),
                });
                Some(result)
            }
            _ => {
                // エンジン不在なら認識を丸ごと飛ばす（エラーではない）
                self.emit(WorkflowEvent::RecognitionSkipped);
                None
            }
        };

        self.pending = Some(PendingBatch {
            batch,
            consensus,
            proposal,
        });
        self.state = WorkflowState::AwaitingDecision;
        self.emit(WorkflowEvent::DecisionRequired);
        Ok(self.pending.as_ref())
    }

    /// 操作者の決定を適用する
    /// (AwaitingDecision → Committing → AwaitingBatch)
    ///
    /// ラベルは対象の文字1文字のみ受け付け、拒否時は決定待ちのまま。
    /// 確定時にバッチを手放すため、同じバッチを二度移動することはない。
    pub async fn decide(&mut self, action: OperatorAction) -> Result<DecisionOutcome> {
        match action {
            OperatorAction::Accept { label } => {
                let label = match validate_label(&label) {
                    Ok(label) => label,
                    Err(_) => {
                        self.emit(WorkflowEvent::LabelRejected { input: label });
                        return Ok(DecisionOutcome::Pending);
                    }
                };
                self.commit(Destination::Chapter(label))
            }
            OperatorAction::Unclassifiable => self.commit(Destination::Unclassifiable),
            OperatorAction::Continue => {
                // 無移動で次へ（Auto走査用）。バッチはここで手放す
                self.pending = None;
                self.state = WorkflowState::AwaitingBatch;
                Ok(DecisionOutcome::Committed)
            }
            OperatorAction::OpenFolder => {
                explorer::open_folder(self.cursor.root());
                Ok(DecisionOutcome::Pending)
            }
            OperatorAction::SwitchMode { mode } => {
                self.switch_mode(mode).await;
                Ok(DecisionOutcome::ModeSwitched)
            }
            OperatorAction::Quit => {
                self.shutdown().await;
                Ok(DecisionOutcome::Stopped)
            }
        }
    }

    fn commit(&mut self, destination: Destination) -> Result<DecisionOutcome> {
        // Committingに入る時点でバッチを手放す（二重移動の防止）
        let Some(pending) = self.pending.take() else {
            return Ok(DecisionOutcome::Pending);
        };
        self.state = WorkflowState::Committing;

        let request = RelocationRequest {
            batch: pending.batch,
            destination,
        };
        let outcome = organizer::relocate(&self.cursor, &request)?;
        self.emit(WorkflowEvent::RelocationComplete {
            destination: outcome.destination,
            moved: outcome.moved,
            remaining: outcome.remaining,
        });

        self.state = WorkflowState::AwaitingBatch;
        Ok(DecisionOutcome::Committed)
    }

    /// モード切替: 稼働中のソースを止めてからIdleへ戻し、再開する
    pub async fn switch_mode(&mut self, mode: WorkflowMode) {
        self.stop_poll().await;
        self.pending = None;
        self.state = WorkflowState::Idle;
        self.start(mode);
        self.emit(WorkflowEvent::ModeChanged { mode });
    }

    /// 終了: ソースを止めてIdleへ戻す
    pub async fn shutdown(&mut self) {
        self.stop_poll().await;
        self.pending = None;
        self.state = WorkflowState::Idle;
        self.emit(WorkflowEvent::Stopped);
    }
}
