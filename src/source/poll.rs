//! 外部バッファのポーリングソース
//!
//! 1秒間隔でバッファを読み、前回サンプルと異なる非空の内容が得られた
//! ときだけ新しいバッチとして送る。コントローラへの受け渡しは容量1の
//! チャネル（単一スロットのメールボックス）で、処理中のバッチを追い
//! 越すことはない。

use crate::error::Result;
use glyph_sort_common::ImageBatch;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// サンプリング間隔
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 外部ペースト/ドロップバッファの境界
///
/// 「現在保持しているファイルパスの一覧」を返すだけの存在として扱う。
/// 生の画像バイト列は対象外。
pub trait PasteBuffer: Send {
    fn current_paths(&mut self) -> Result<Vec<PathBuf>>;
}

impl PasteBuffer for Box<dyn PasteBuffer> {
    fn current_paths(&mut self) -> Result<Vec<PathBuf>> {
        (**self).current_paths()
    }
}

/// バッファを定期サンプリングするバッチソース
pub struct PollSource<B: PasteBuffer> {
    buffer: B,
}

impl<B: PasteBuffer + 'static> PollSource<B> {
    pub fn new(buffer: B) -> Self {
        Self { buffer }
    }

    /// ポーリングタスクを起動する
    ///
    /// 戻り値のチャネルからバッチを受け取る。トークンの取消後は
    /// 1ティック以内にタスクが終了する。
    pub fn spawn(
        mut self,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<ImageBatch>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut last_sample: Vec<PathBuf> = Vec::new();
            loop {
                if cancel.is_cancelled() {
                    break;
                }
                match self.buffer.current_paths() {
                    Ok(sample) => {
                        if !sample.is_empty() && sample != last_sample {
                            last_sample = sample.clone();
                            let batch = ImageBatch::from_paths(sample);
                            if !batch.is_empty() {
                                // コントローラが前のバッチを処理し終わるまで
                                // ここで待つ（後ろに並び、先回りしない）
                                tokio::select! {
                                    _ = cancel.cancelled() => break,
                                    sent = tx.send(batch) => {
                                        if sent.is_err() {
                                            break;
                                        }
                                    }
                                }
                            }
                        }
                    }
                    Err(e) => {
                        // 一時的な読み取りエラーは次のティックで再試行する
                        tracing::warn!(error = %e, "バッファ読み取りに失敗");
                    }
                }
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(POLL_INTERVAL) => {}
                }
            }
            tracing::debug!("ポーリングタスク終了");
        });
        (rx, handle)
    }
}
