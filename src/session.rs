//! 対話セッション
//!
//! コントローラのイベントを描画し、操作者の決定を受け付けるCLI表示層。
//! コントローラの状態には触れず、イベント購読と入力転送のみを行う。

use crate::config::Config;
use crate::error::{GlyphSortError, Result};
use crate::recognizer::{DetectionProfile, Recognizer, TesseractEngine};
use crate::source::ClipboardBuffer;
use crate::workflow::{DecisionOutcome, PendingBatch, WorkflowController};
use dialoguer::Input;
use glyph_sort_common::{
    ConfidenceBand, ConsensusResult, OperatorAction, WorkflowEvent, WorkflowMode,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// 対話ワークフローを開始する
pub async fn run_session(
    root: PathBuf,
    mode: WorkflowMode,
    ocr: bool,
    config: &Config,
) -> Result<()> {
    // OCRエンジンは有効化時に一度だけ初期化する。失敗しても続行し、
    // 認識なし（信頼度空欄）で運用する
    let recognizer = if ocr {
        let profile = DetectionProfile::with_languages(&config.ocr_languages);
        match TesseractEngine::new(&config.resolved_ocr_command(), profile) {
            Ok(engine) => Some(Recognizer::new(Box::new(engine))),
            Err(e) => {
                println!("⚠ OCRを無効化して続行します: {}", e);
                None
            }
        }
    } else {
        None
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut controller = WorkflowController::new(
        root,
        recognizer,
        Box::new(|| Box::new(ClipboardBuffer::new())),
        event_tx,
    )?;

    controller.start(mode);
    render_events(&mut event_rx);
    match mode {
        WorkflowMode::Auto => println!("▶ 自動走査モードで開始します"),
        WorkflowMode::Manual => {
            println!("▶ 貼り付け待ちモードで開始します（クリップボードを1秒間隔で確認）")
        }
    }

    loop {
        if controller.mode() == WorkflowMode::Manual {
            println!("📋 貼り付けを待っています...");
        }
        let pending = match controller.advance().await {
            Ok(Some(pending)) => pending.clone(),
            Ok(None) => break,
            Err(e) => {
                println!("⚠ {}", e);
                break;
            }
        };
        render_events(&mut event_rx);

        // 決定ループ: 拒否や副作用のみの操作では同じバッチに留まる
        loop {
            let action = prompt_action(&pending, controller.mode())?;
            let outcome = controller.decide(action).await;
            render_events(&mut event_rx);
            match outcome {
                Ok(DecisionOutcome::Committed) => break,
                Ok(DecisionOutcome::Pending) => continue,
                Ok(DecisionOutcome::ModeSwitched) => break,
                Ok(DecisionOutcome::Stopped) => return Ok(()),
                Err(e) => {
                    // 移動の失敗はこのバッチを諦めて次へ進む
                    println!("⚠ {}", e);
                    break;
                }
            }
        }
    }

    controller.shutdown().await;
    render_events(&mut event_rx);
    Ok(())
}

/// 決定入力プロンプト
///
/// 対象の文字1字=ラベル確定 / 空Enter=提案を確定 / u=未分類 /
/// n=移動せず次へ(Autoのみ) / o=フォルダを開く / m=モード切替 / q=終了
fn prompt_action(pending: &PendingBatch, mode: WorkflowMode) -> Result<OperatorAction> {
    let proposal = pending.proposed_label();
    let keys = match mode {
        WorkflowMode::Auto => "u:未分類 n:次へ o:開く m:切替 q:終了",
        WorkflowMode::Manual => "u:未分類 o:開く m:切替 q:終了",
    };
    let prompt = match &proposal {
        Some(p) => format!("ラベル [Enter={} {}]", p, keys),
        None => format!("ラベル [{}]", keys),
    };

    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| GlyphSortError::CliExecution(e.to_string()))?;
    let trimmed = input.trim();

    Ok(match trimmed {
        "" => OperatorAction::Accept {
            label: proposal.unwrap_or_default(),
        },
        "u" | "U" => OperatorAction::Unclassifiable,
        "n" | "N" if mode == WorkflowMode::Auto => OperatorAction::Continue,
        "o" | "O" => OperatorAction::OpenFolder,
        "m" | "M" => OperatorAction::SwitchMode {
            mode: mode.toggled(),
        },
        "q" | "Q" => OperatorAction::Quit,
        other => OperatorAction::Accept {
            label: other.to_string(),
        },
    })
}

/// 溜まったイベントを描画する
fn render_events(rx: &mut mpsc::UnboundedReceiver<WorkflowEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            WorkflowEvent::RootChanged { root, total } => {
                println!("📂 ルート: {}（総計: {}件）", root.display(), total)
            }
            WorkflowEvent::BatchReady {
                paths,
                proposal,
                remaining,
            } => {
                println!("🖼 バッチ: {}枚", paths.len());
                for path in paths.iter().take(5) {
                    println!("   - {}", path.display());
                }
                if paths.len() > 5 {
                    println!("   ... 他{}枚", paths.len() - 5);
                }
                if let Some(remaining) = remaining {
                    println!("   残り: {}フォルダ", remaining);
                }
                if let Some(proposal) = proposal {
                    println!("   提案: {}", proposal);
                }
            }
            WorkflowEvent::EmptyFolder { folder } => {
                println!("⚠ 画像がありません: {}", folder.display())
            }
            // 認識無効時は信頼度表示を空欄のままにする
            WorkflowEvent::RecognitionSkipped => {}
            WorkflowEvent::ConsensusReady {
                result,
                band,
                percent,
            } => match result {
                ConsensusResult::Label { text, .. } => println!(
                    "🔍 認識: {}（信頼度 {}% {}）",
                    text,
                    percent.unwrap_or(0),
                    band.map(band_mark).unwrap_or("")
                ),
                ConsensusResult::NoConsensus => println!("🔍 認識: 合意なし"),
            },
            WorkflowEvent::DecisionRequired => {}
            WorkflowEvent::LabelRejected { input } => {
                println!("⚠ 対象の文字1文字のみ入力できます: {:?}", input)
            }
            WorkflowEvent::RelocationComplete {
                destination,
                moved,
                remaining,
            } => println!(
                "✔ {}枚を移動: {}（残り: {}件）",
                moved,
                destination.display(),
                remaining
            ),
            WorkflowEvent::ModeChanged { mode } => match mode {
                WorkflowMode::Auto => println!("🔁 自動走査モードへ切替"),
                WorkflowMode::Manual => println!("🔁 貼り付け待ちモードへ切替"),
            },
            WorkflowEvent::Stopped => println!("⏹ 終了しました"),
        }
    }
}

/// バンドの表示マーク（high=緑 / medium=青 / low=黄 / none=赤）
fn band_mark(band: ConfidenceBand) -> &'static str {
    match band {
        ConfidenceBand::High => "🟢",
        ConfidenceBand::Medium => "🔵",
        ConfidenceBand::Low => "🟡",
        ConfidenceBand::None => "🔴",
    }
}
