//! 設定管理
//!
//! OCRエンジンの呼び出し方など操作者レベルの設定だけを持つ。
//! 検出プロファイルやバッチ上限は固定値であり、設定の対象外。

use crate::error::{GlyphSortError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// tesseract実行ファイル（PATH上のコマンド名か絶対パス）
    pub ocr_command: String,
    /// 認識言語プロファイル（有効化時に一度だけエンジンへ渡す）
    pub ocr_languages: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr_command: "tesseract".into(),
            ocr_languages: "chi_sim+chi_tra".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GlyphSortError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("glyph-sort").join("config.json"))
    }

    /// OCRコマンドの解決（環境変数を優先）
    pub fn resolved_ocr_command(&self) -> String {
        if let Ok(cmd) = std::env::var("GLYPH_SORT_OCR_CMD") {
            return cmd;
        }
        self.ocr_command.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ocr_command, "tesseract");
        assert_eq!(config.ocr_languages, "chi_sim+chi_tra");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            ocr_command: "/usr/local/bin/tesseract".into(),
            ocr_languages: "chi_sim".into(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ocr_command, config.ocr_command);
        assert_eq!(back.ocr_languages, config.ocr_languages);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // serde(default)のため欠けたフィールドは既定値で埋まる
        let back: Config = serde_json::from_str(r#"{"ocr_command": "tess"}"#).unwrap();
        assert_eq!(back.ocr_command, "tess");
        assert_eq!(back.ocr_languages, "chi_sim+chi_tra");
    }
}
