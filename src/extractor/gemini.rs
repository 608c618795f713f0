//! Gọi Gemini API để trích xuất bảng từ PDF
//!
//! Một yêu cầu `generateContent` cho mỗi lần tải lên: prompt + tệp PDF
//! inline, kèm schema đầu ra để dịch vụ tự ràng buộc cấu trúc JSON.
//! Không retry, không cache.

use crate::config::Config;
use crate::error::{PoExtractError, Result};
use crate::extractor::{parse_extraction_response, RecordDraft, TableExtractor};
use serde_json::json;
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Yêu cầu tìm bảng dòng hàng trong PDF và trả về mảng JSON
const EXTRACTION_PROMPT: &str = "Phân tích tệp PDF được cung cấp. Tìm bảng chứa các mặt hàng trong đơn đặt hàng. Trích xuất dữ liệu và trả về một mảng JSON. Mỗi đối tượng trong mảng phải có các khóa sau: 'po', 'sku', 'description', 'quantity', và 'total'. Đảm bảo rằng 'quantity' và 'total' là số. Nếu không tìm thấy bảng, hãy trả về một mảng trống.";

pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    verbose: bool,
}

impl GeminiExtractor {
    /// Khởi tạo client; lỗi nếu chưa cấu hình API key
    pub fn new(config: &Config, verbose: bool) -> Result<Self> {
        let api_key = config.get_api_key()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PoExtractError::ApiCall(format!("không khởi tạo được HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            verbose,
        })
    }

    /// Schema đầu ra: mảng các đối tượng đủ 5 trường bắt buộc
    fn response_schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "po": { "type": "STRING", "description": "Số đơn hàng (PO Number)" },
                    "sku": { "type": "STRING", "description": "Mã sản phẩm (SKU)" },
                    "description": { "type": "STRING", "description": "Mô tả hoặc diễn giải sản phẩm" },
                    "quantity": { "type": "NUMBER", "description": "Số lượng sản phẩm" },
                    "total": { "type": "NUMBER", "description": "Thành tiền hoặc tổng giá trị của mục hàng" }
                },
                "required": ["po", "sku", "description", "quantity", "total"]
            }
        })
    }

    fn request_body(base64_pdf: &str) -> serde_json::Value {
        json!({
            "contents": [
                {
                    "parts": [
                        { "text": EXTRACTION_PROMPT },
                        {
                            "inlineData": {
                                "mimeType": "application/pdf",
                                "data": base64_pdf
                            }
                        }
                    ]
                }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": Self::response_schema()
            }
        })
    }

    /// Lấy văn bản của candidate đầu tiên; thiếu candidate coi như rỗng
    fn candidate_text(payload: &serde_json::Value) -> String {
        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

impl TableExtractor for GeminiExtractor {
    async fn extract(&self, base64_pdf: &str) -> Result<Vec<RecordDraft>> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );
        let body = Self::request_body(base64_pdf);

        if self.verbose {
            eprintln!("  [extract] model: {}, payload: {} bytes", self.model, base64_pdf.len());
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PoExtractError::ApiCall(format!("gửi yêu cầu thất bại: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PoExtractError::ApiCall(format!(
                "Gemini API trả về {}: {}",
                status,
                text.trim()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PoExtractError::ApiParse(format!("phản hồi không phải JSON: {}", e)))?;

        let text = Self::candidate_text(&payload);

        if self.verbose {
            eprintln!("  [extract] phản hồi: {} chars", text.len());
        }

        parse_extraction_response(&text)
    }
}
