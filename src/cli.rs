use clap::{Parser, Subcommand, ValueEnum};
use glyph_sort_common::WorkflowMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glyph-sort")]
#[command(about = "スキャン画像OCR分類・整理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話ワークフローを開始（バッチ取得→認識→確認→移動）
    Run {
        /// 作業ルートフォルダ
        #[arg(required = true)]
        root: PathBuf,

        /// バッチ取得モード (auto/manual)
        #[arg(short, long, default_value = "auto")]
        mode: ModeArg,

        /// OCR認識を有効化
        #[arg(long)]
        ocr: bool,
    },

    /// フォルダを1バッチとして認識し、合意結果を表示する（移動しない）
    Recognize {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// tesseractコマンドを設定
        #[arg(long)]
        set_ocr_command: Option<String>,

        /// 認識言語を設定
        #[arg(long)]
        set_languages: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// バッチ取得モードのCLI表現
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ModeArg {
    /// フォルダ走査で自動的に進む
    #[default]
    Auto,
    /// クリップボード貼り付けを待つ
    Manual,
}

impl From<ModeArg> for WorkflowMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => WorkflowMode::Auto,
            ModeArg::Manual => WorkflowMode::Manual,
        }
    }
}
