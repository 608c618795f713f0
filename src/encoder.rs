//! Mã hóa tệp PDF sang base64 để gửi trong payload API

use crate::error::{PoExtractError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Đọc tệp và trả về nội dung đã mã hóa base64 (chỉ payload, không có tiền tố)
pub fn encode_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| PoExtractError::FileRead(format!("{}: {}", path.display(), e)))?;
    Ok(STANDARD.encode(bytes))
}

/// Giải mã base64 về bytes gốc
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| PoExtractError::FileRead(format!("base64 không hợp lệ: {}", e)))
}
