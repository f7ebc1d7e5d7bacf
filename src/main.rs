use clap::Parser;
use glyph_sort_rust::{cli, config, error, recognizer, session, source};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use glyph_sort_common::consensus;
use recognizer::{DetectionProfile, Recognizer, TesseractEngine};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Run { root, mode, ocr } => {
            println!("🗂 glyph-sort - 画像分類\n");
            session::run_session(root, mode.into(), ocr, &config).await?;
        }

        Commands::Recognize { folder } => {
            println!("🔍 glyph-sort - 一括認識\n");

            // ここでは認識が目的なのでエンジン不在はエラーにする
            let profile = DetectionProfile::with_languages(&config.ocr_languages);
            let engine = TesseractEngine::new(&config.resolved_ocr_command(), profile)?;
            let recognizer = Recognizer::new(Box::new(engine));

            let batch = source::scan_images(&folder)?;
            if batch.is_empty() {
                return Err(error::GlyphSortError::NoImagesFound(
                    folder.display().to_string(),
                ));
            }
            println!("[1/2] {}枚を認識中...", batch.len());
            let per_image = recognizer.recognize_batch(&batch);

            if cli.verbose {
                for (path, detections) in &per_image {
                    match detections.first() {
                        Some(d) => println!(
                            "  {}: {} ({:.0}%)",
                            path.display(),
                            d.text,
                            d.confidence * 100.0
                        ),
                        None => println!("  {}: 検出なし", path.display()),
                    }
                }
            }

            println!("[2/2] 合意判定中...");
            let result = consensus::reduce(&per_image);
            match &result {
                glyph_sort_common::ConsensusResult::Label { text, .. } => {
                    println!(
                        "\n✅ 合意: {}（信頼度 {}% / {}）",
                        text,
                        result.percent().unwrap_or(0),
                        result.band().map(|b| b.to_string()).unwrap_or_default()
                    );
                }
                glyph_sort_common::ConsensusResult::NoConsensus => {
                    println!("\n⚠ 合意なし（検出なし・不一致・対象外文字）");
                }
            }
        }

        Commands::Config {
            set_ocr_command,
            set_languages,
            show,
        } => {
            let mut config = config;

            if let Some(command) = set_ocr_command {
                config.ocr_command = command;
                config.save()?;
                println!("✔ OCRコマンドを設定しました");
            }

            if let Some(languages) = set_languages {
                config.ocr_languages = languages;
                config.save()?;
                println!("✔ 認識言語を設定しました");
            }

            if show {
                println!("設定:");
                println!("  OCRコマンド: {}", config.ocr_command);
                println!("  認識言語: {}", config.ocr_languages);
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
