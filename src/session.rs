//! Máy trạng thái phiên làm việc
//!
//! Một phiên = một chu kỳ tải lên → trích xuất → chỉnh sửa → xuất.
//! Mọi lỗi bất đồng bộ được chặn tại đây và chuyển thành thông báo
//! của trạng thái `Failed`; không lỗi nào thoát ra ngoài.

use crate::encoder;
use crate::error::PoExtractError;
use crate::extractor::{RecordDraft, TableExtractor};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thông báo khi model không tìm thấy bảng nào
pub const MSG_NO_TABLE: &str =
    "Không tìm thấy dữ liệu bảng nào trong tệp PDF. Vui lòng thử một tệp khác.";

/// Thông báo khi chưa cấu hình API key
pub const MSG_MISSING_API_KEY: &str =
    "Lỗi cấu hình: API Key cho Gemini chưa được thiết lập. Vui lòng đặt biến môi trường GEMINI_API_KEY hoặc chạy `po-extract config --set-api-key KEY`.";

/// Thông báo chung cho mọi lỗi trích xuất khác
pub const MSG_EXTRACTION_FAILED: &str =
    "Đã xảy ra lỗi khi phân tích tệp PDF. Vui lòng kiểm tra lại tệp hoặc thử lại sau.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Một dòng hàng đã nhận vào phiên, có định danh cục bộ bất biến
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub po: String,
    pub sku: String,
    pub description: String,
    #[serde(deserialize_with = "nan_as_null")]
    pub quantity: f64,
    #[serde(deserialize_with = "nan_as_null")]
    pub total: f64,
}

/// serde_json ghi NaN thành null; đọc lại null phải ra NaN,
/// nếu không file JSON đã lưu sẽ không nạp lại được
fn nan_as_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Trường có thể chỉnh sửa trên một dòng hàng
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Po,
    Sku,
    Description,
    Quantity,
    Total,
}

impl std::str::FromStr for RecordField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "po" => Ok(RecordField::Po),
            "sku" => Ok(RecordField::Sku),
            "description" | "diengiai" | "mota" => Ok(RecordField::Description),
            "quantity" | "soluong" | "sl" => Ok(RecordField::Quantity),
            "total" | "thanhtien" | "tt" => Ok(RecordField::Total),
            _ => Err(format!(
                "Trường không hợp lệ: {}. Dùng po, sku, description, quantity hoặc total",
                s
            )),
        }
    }
}

pub struct Session {
    mode: Mode,
    records: Vec<Record>,
    source_file_name: String,
    error_message: Option<String>,
    next_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            records: Vec::new(),
            source_file_name: String::new(),
            error_message: None,
            next_id: 1,
        }
    }

    /// Dựng lại phiên `Ready` từ danh sách dòng hàng đã lưu.
    /// Bộ đếm định danh tiếp tục sau id lớn nhất để không trùng lặp.
    pub fn restore(records: Vec<Record>, source_file_name: &str) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            mode: if records.is_empty() { Mode::Idle } else { Mode::Ready },
            records,
            source_file_name: source_file_name.to_string(),
            error_message: None,
            next_id,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn source_file_name(&self) -> &str {
        &self.source_file_name
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Gửi một tệp vào pipeline: mã hóa rồi gọi client trích xuất.
    ///
    /// Trạng thái `Loading` là khóa loại trừ: gọi lại khi đang
    /// `Loading` là no-op. Kết thúc ở `Ready` (≥1 dòng) hoặc `Failed`.
    pub async fn submit<E: TableExtractor>(&mut self, path: &Path, extractor: &E) {
        if self.mode == Mode::Loading {
            return;
        }

        self.mode = Mode::Loading;
        self.error_message = None;
        self.source_file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let outcome = match encoder::encode_file(path) {
            Ok(base64_pdf) => extractor.extract(&base64_pdf).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(drafts) if drafts.is_empty() => {
                self.fail(MSG_NO_TABLE);
            }
            Ok(drafts) => {
                let mut records = Vec::with_capacity(drafts.len());
                for draft in drafts {
                    records.push(self.assign_id(draft));
                }
                self.records = records;
                self.mode = Mode::Ready;
            }
            Err(PoExtractError::MissingApiKey) => {
                self.fail(MSG_MISSING_API_KEY);
            }
            Err(e) => {
                // chi tiết chỉ ghi ra stderr, người dùng thấy thông báo chung
                eprintln!("Lỗi trích xuất: {}", e);
                self.fail(MSG_EXTRACTION_FAILED);
            }
        }
    }

    /// Cập nhật một trường của đúng một dòng hàng theo định danh.
    ///
    /// Trường số được ép kiểu dễ dãi: văn bản không phải số cho ra
    /// NaN thay vì bị từ chối. Định danh lạ là no-op.
    pub fn update_field(&mut self, id: u64, field: RecordField, value: &str) -> bool {
        if self.mode != Mode::Ready {
            return false;
        }

        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return false;
        };

        match field {
            RecordField::Po => record.po = value.to_string(),
            RecordField::Sku => record.sku = value.to_string(),
            RecordField::Description => record.description = value.to_string(),
            RecordField::Quantity => record.quantity = coerce_number(value),
            RecordField::Total => record.total = coerce_number(value),
        }
        true
    }

    /// Quay về `Idle`, xóa toàn bộ dữ liệu của chu kỳ hiện tại
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.records.clear();
        self.source_file_name.clear();
        self.error_message = None;
    }

    fn assign_id(&mut self, draft: RecordDraft) -> Record {
        let id = self.next_id;
        self.next_id += 1;
        Record {
            id,
            po: draft.po,
            sku: draft.sku,
            description: draft.description,
            quantity: draft.quantity,
            total: draft.total,
        }
    }

    fn fail(&mut self, message: &str) {
        self.mode = Mode::Failed;
        self.error_message = Some(message.to_string());
    }
}

fn coerce_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(f64::NAN)
}
