use clap::Parser;
use indicatif::ProgressBar;
use po_extract::{cli, config, editor, error, export, extractor, session};

use cli::{Cli, Commands};
use config::Config;
use error::{PoExtractError, Result};
use extractor::GeminiExtractor;
use session::{Mode, Record, Session};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Run { file, output, edit } => {
            println!("📄 po-extract - xử lý đơn đặt hàng\n");

            let extractor = GeminiExtractor::new(&config, cli.verbose)?;

            // 1. Trích xuất
            println!("[1/3] Đang phân tích {}...", file.display());
            let mut session = Session::new();
            submit_with_spinner(&mut session, &file, &extractor).await?;
            println!("✔ Trích xuất được {} dòng hàng\n", session.records().len());

            editor::print_records(session.records());
            println!();

            // 2. Chỉnh sửa (tùy chọn)
            if edit {
                println!("[2/3] Chỉnh sửa...");
                if !editor::run_interactive_editor(&mut session)? {
                    return Ok(());
                }
                println!();
            }

            // 3. Xuất Excel
            println!("[{}/3] Đang xuất Excel...", if edit { 3 } else { 2 });
            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(export::default_output_name(session.source_file_name()))
            });
            export::generate_excel(session.records(), &output_path)?;
            println!("✔ Đã xuất: {}", output_path.display());

            println!("\n✅ Hoàn tất");
        }

        Commands::Extract { file, output } => {
            println!("📄 po-extract - trích xuất\n");

            let extractor = GeminiExtractor::new(&config, cli.verbose)?;

            println!("[1/2] Đang phân tích {}...", file.display());
            let mut session = Session::new();
            submit_with_spinner(&mut session, &file, &extractor).await?;
            println!("✔ Trích xuất được {} dòng hàng\n", session.records().len());

            println!("[2/2] Đang lưu kết quả...");
            let output_path = output.unwrap_or_else(|| file.with_extension("json"));
            save_records(session.records(), &output_path)?;
            println!("✔ Đã lưu: {}", output_path.display());

            println!("\n✅ Hoàn tất");
        }

        Commands::Export { input, output } => {
            println!("📄 po-extract - xuất Excel\n");

            let records = load_records(&input)?;
            let source = input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();

            let output_path = output
                .unwrap_or_else(|| PathBuf::from(export::default_output_name(&source)));

            println!("- Đang xuất {} dòng hàng...", records.len());
            export::generate_excel(&records, &output_path)?;
            println!("✔ Đã xuất: {}", output_path.display());
        }

        Commands::Edit { input, output } => {
            println!("📄 po-extract - chỉnh sửa\n");

            let records = load_records(&input)?;
            if records.is_empty() {
                println!("Không có dòng hàng nào trong {}", input.display());
                return Ok(());
            }

            let source = input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let mut session = Session::restore(records, &source);

            if editor::run_interactive_editor(&mut session)? {
                let output_path = output.unwrap_or(input);
                save_records(session.records(), &output_path)?;
                println!("\n✔ Đã lưu: {}", output_path.display());
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ Đã lưu API key");
            }

            if show {
                println!("Cấu hình:");
                println!("  Model: {}", config.model);
                println!("  Timeout: {}s", config.timeout_seconds);
                println!(
                    "  API key: {}",
                    if config.get_api_key().is_ok() { "đã thiết lập" } else { "chưa thiết lập" }
                );
            }
        }
    }

    Ok(())
}

/// Gửi tệp vào phiên với spinner chờ; phiên `Failed` trở thành lỗi CLI
async fn submit_with_spinner<E: extractor::TableExtractor>(
    session: &mut Session,
    file: &Path,
    extractor: &E,
) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Đang gửi tài liệu đến Gemini...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    session.submit(file, extractor).await;

    spinner.finish_and_clear();

    if session.mode() == Mode::Failed {
        let message = session
            .error_message()
            .unwrap_or(session::MSG_EXTRACTION_FAILED)
            .to_string();
        return Err(PoExtractError::Extraction(message));
    }
    Ok(())
}

fn save_records(records: &[Record], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<Record> = serde_json::from_str(&content)?;
    Ok(records)
}
