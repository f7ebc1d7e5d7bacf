use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlyphSortError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("フォルダではありません: {0}")]
    NotADirectory(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像デコードエラー: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("OCRエンジンを初期化できません: {0}")]
    EngineUnavailable(String),

    #[error("OCRエンジン実行エラー: {0}")]
    EngineFailed(String),

    #[error("クリップボード読み取りエラー: {0}")]
    Clipboard(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] glyph_sort_common::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),
}

pub type Result<T> = std::result::Result<T, GlyphSortError>;
