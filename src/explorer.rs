//! ファイルブラウザ起動
//!
//! 対応していない環境では警告ログを残すだけで何もしない（機能が
//! 使えないだけで、ワークフローは続行する）。

use std::path::Path;
use std::process::Command;

/// 指定フォルダをOSのファイルブラウザで開く
pub fn open_folder(path: &Path) {
    if let Err(e) = spawn_browser(path) {
        tracing::warn!(path = %path.display(), error = %e, "ファイルブラウザを起動できません");
    }
}

#[cfg(target_os = "windows")]
fn spawn_browser(path: &Path) -> std::io::Result<()> {
    Command::new("explorer").arg(path).spawn().map(|_| ())
}

#[cfg(target_os = "macos")]
fn spawn_browser(path: &Path) -> std::io::Result<()> {
    Command::new("open").arg(path).spawn().map(|_| ())
}

#[cfg(target_os = "linux")]
fn spawn_browser(path: &Path) -> std::io::Result<()> {
    Command::new("xdg-open").arg(path).spawn().map(|_| ())
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn spawn_browser(_path: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "unsupported operating system",
    ))
}
