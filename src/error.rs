use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoExtractError {
    #[error("Lỗi cấu hình: {0}")]
    Config(String),

    #[error("API Key cho Gemini chưa được thiết lập. Đặt biến môi trường GEMINI_API_KEY hoặc chạy `po-extract config --set-api-key KEY`")]
    MissingApiKey,

    #[error("Không đọc được tệp: {0}")]
    FileRead(String),

    #[error("Lỗi gọi API: {0}")]
    ApiCall(String),

    #[error("Không phân tích được phản hồi API: {0}")]
    ApiParse(String),

    #[error("{0}")]
    Extraction(String),

    #[error("Lỗi sinh file Excel: {0}")]
    ExcelGeneration(String),

    #[error("Lỗi nhập liệu: {0}")]
    Prompt(String),

    #[error("Lỗi JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lỗi IO: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PoExtractError>;
