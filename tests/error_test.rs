//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use glyph_sort_rust::error::GlyphSortError;
use glyph_sort_rust::source;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = source::scan_images(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, GlyphSortError::FolderNotFound(_)));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = source::scan_images(dir.path());

    // 空フォルダはエラーではなく空のバッチを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// GlyphSortErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        GlyphSortError::Config("テスト設定エラー".to_string()),
        GlyphSortError::FolderNotFound("/path/to/folder".to_string()),
        GlyphSortError::NotADirectory("/path/to/file.png".to_string()),
        GlyphSortError::NoImagesFound("フォルダ".to_string()),
        GlyphSortError::ImageLoad("page.png".to_string()),
        GlyphSortError::EngineUnavailable("tesseract".to_string()),
        GlyphSortError::EngineFailed("code 1".to_string()),
        GlyphSortError::Clipboard("読み取り失敗".to_string()),
        GlyphSortError::CliExecution("入力エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// エンジン不在エラーのメッセージ確認
#[test]
fn test_engine_unavailable_message() {
    let err = GlyphSortError::EngineUnavailable("tesseract: not found".to_string());
    let display = format!("{}", err);

    assert!(display.contains("OCRエンジン"));
    assert!(display.contains("tesseract"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: GlyphSortError = io_err.into();

    assert!(matches!(err, GlyphSortError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: GlyphSortError = json_err.into();

    assert!(matches!(err, GlyphSortError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = glyph_sort_common::Error::InvalidLabel("AB".to_string());
    let err: GlyphSortError = common_err.into();

    assert!(matches!(err, GlyphSortError::Common(_)));
    // 透過的エラーなのでメッセージがそのまま表示される
    let display = format!("{}", err);
    assert!(display.contains("ラベルが不正"));
}
