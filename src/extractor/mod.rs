//! Client trích xuất bảng đơn đặt hàng
//!
//! Gửi tài liệu đã mã hóa đến model hiểu tài liệu bên ngoài và
//! nhận về danh sách dòng hàng có cấu trúc. Trait [`TableExtractor`]
//! là điểm thay thế trong kiểm thử (mock thay vì gọi dịch vụ thật).

pub mod gemini;

pub use gemini::GeminiExtractor;

use crate::error::{PoExtractError, Result};
use serde::{Deserialize, Serialize};

/// Một dòng hàng do model trả về (chưa có định danh cục bộ)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub po: String,
    pub sku: String,
    pub description: String,
    pub quantity: f64,
    pub total: f64,
}

/// Hợp đồng trích xuất: một tài liệu base64 vào, một mảng dòng hàng ra.
///
/// Mảng rỗng là kết quả hợp lệ (model không tìm thấy bảng),
/// khác với lỗi gọi dịch vụ.
#[allow(async_fn_in_trait)]
pub trait TableExtractor {
    async fn extract(&self, base64_pdf: &str) -> Result<Vec<RecordDraft>>;
}

/// Lấy phần JSON từ văn bản phản hồi
///
/// Thứ tự ưu tiên:
/// 1. Khối ```json ... ```
/// 2. Mảng [...] thô
fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7;
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(PoExtractError::ApiParse("không tìm thấy JSON trong phản hồi".into()))
}

/// Phân tích văn bản phản hồi của model thành danh sách dòng hàng
///
/// Văn bản rỗng được coi là "không có dòng nào", không phải lỗi.
pub fn parse_extraction_response(response: &str) -> Result<Vec<RecordDraft>> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let json_str = extract_json(trimmed)?;
    let drafts: Vec<RecordDraft> = serde_json::from_str(json_str)
        .map_err(|e| PoExtractError::ApiParse(format!("JSON không đúng cấu trúc: {}", e)))?;
    Ok(drafts)
}
