use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "po-extract")]
#[command(about = "Trích xuất bảng đơn đặt hàng từ PDF bằng AI và xuất Excel", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// In log chi tiết
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trích xuất, chỉnh sửa và xuất Excel trong một lần chạy
    Run {
        /// Tệp PDF đơn đặt hàng
        #[arg(required = true)]
        file: PathBuf,

        /// File Excel đầu ra (mặc định: PO_Data_<tên tệp>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mở bước chỉnh sửa tương tác trước khi xuất
        #[arg(short, long)]
        edit: bool,
    },

    /// Trích xuất dòng hàng từ PDF và lưu JSON
    Extract {
        /// Tệp PDF đơn đặt hàng
        #[arg(required = true)]
        file: PathBuf,

        /// File JSON đầu ra (mặc định: <tên tệp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Xuất Excel từ file JSON đã lưu
    Export {
        /// File JSON dòng hàng
        #[arg(required = true)]
        input: PathBuf,

        /// File Excel đầu ra (mặc định: PO_Data_<tên file>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Chỉnh sửa tương tác file JSON đã lưu
    Edit {
        /// File JSON dòng hàng
        #[arg(required = true)]
        input: PathBuf,

        /// File lưu kết quả (mặc định: ghi đè file vào)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Xem/sửa cấu hình
    Config {
        /// Đặt API key cho Gemini
        #[arg(long)]
        set_api_key: Option<String>,

        /// Hiển thị cấu hình hiện tại
        #[arg(long)]
        show: bool,
    },
}
