//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("ラベルが不正です（対象の文字1文字のみ）: {0}")]
    InvalidLabel(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
