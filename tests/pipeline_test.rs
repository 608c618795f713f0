//! Kịch bản đầu-cuối: tải lên → trích xuất → chỉnh sửa → xuất
//!
//! Client trích xuất được mock theo đúng hợp đồng (tài liệu base64 vào,
//! mảng dòng hàng hoặc lỗi ra) — không gọi dịch vụ thật.

use calamine::{Data, Reader, Xlsx};
use po_extract::error::{PoExtractError, Result};
use po_extract::export;
use po_extract::extractor::{RecordDraft, TableExtractor};
use po_extract::session::{Mode, RecordField, Session, MSG_EXTRACTION_FAILED, MSG_NO_TABLE};
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::tempdir;

enum MockOutcome {
    Records(Vec<RecordDraft>),
    TransportError,
}

struct MockExtractor {
    outcome: MockOutcome,
}

impl TableExtractor for MockExtractor {
    async fn extract(&self, base64_pdf: &str) -> Result<Vec<RecordDraft>> {
        // hợp đồng: đầu vào là base64 thuần
        assert!(!base64_pdf.is_empty());
        assert!(!base64_pdf.starts_with("data:"));

        match &self.outcome {
            MockOutcome::Records(drafts) => Ok(drafts.clone()),
            MockOutcome::TransportError => {
                Err(PoExtractError::ApiCall("connection refused".into()))
            }
        }
    }
}

fn write_pdf(dir: &std::path::Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4 noi dung kiem thu").unwrap();
    path
}

#[tokio::test]
async fn test_upload_edit_export_scenario() {
    let dir = tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "order1.pdf");

    // tải lên: một dòng hàng được trích xuất
    let extractor = MockExtractor {
        outcome: MockOutcome::Records(vec![RecordDraft {
            po: "PO100".into(),
            sku: "A1".into(),
            description: "Widget".into(),
            quantity: 5.0,
            total: 500.0,
        }]),
    };

    let mut session = Session::new();
    session.submit(&pdf, &extractor).await;

    assert_eq!(session.mode(), Mode::Ready);
    assert_eq!(session.source_file_name(), "order1.pdf");
    assert_eq!(session.records().len(), 1);

    // chỉnh sửa: quantity "10" (văn bản) → 10 (số)
    let id = session.records()[0].id;
    assert!(session.update_field(id, RecordField::Quantity, "10"));
    assert_eq!(session.records()[0].quantity, 10.0);

    // xuất: một hàng dữ liệu, Số lượng = 10
    let output_name = export::default_output_name(session.source_file_name());
    assert_eq!(output_name, "PO_Data_order1.pdf.xlsx");

    let buffer = export::generate_excel_buffer(session.records()).unwrap();
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(buffer)).unwrap();
    let range = workbook.worksheet_range("PO Data").unwrap();

    assert_eq!(range.height(), 2);
    assert_eq!(range.get_value((0, 3)), Some(&Data::String("Số lượng".into())));
    assert_eq!(range.get_value((1, 3)), Some(&Data::Float(10.0)));
}

#[tokio::test]
async fn test_transport_error_scenario() {
    let dir = tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "bad.pdf");

    let extractor = MockExtractor {
        outcome: MockOutcome::TransportError,
    };

    let mut session = Session::new();
    session.submit(&pdf, &extractor).await;

    assert_eq!(session.mode(), Mode::Failed);
    assert_eq!(session.error_message(), Some(MSG_EXTRACTION_FAILED));
    assert!(session.records().is_empty());
}

#[tokio::test]
async fn test_no_table_then_reset_then_retry() {
    let dir = tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "trang.pdf");

    let empty = MockExtractor {
        outcome: MockOutcome::Records(vec![]),
    };

    let mut session = Session::new();
    session.submit(&pdf, &empty).await;
    assert_eq!(session.mode(), Mode::Failed);
    assert_eq!(session.error_message(), Some(MSG_NO_TABLE));

    // reset rồi thử lại với tệp khác
    session.reset();
    assert_eq!(session.mode(), Mode::Idle);

    let pdf2 = write_pdf(dir.path(), "order2.pdf");
    let ok = MockExtractor {
        outcome: MockOutcome::Records(vec![RecordDraft {
            po: "PO200".into(),
            sku: "B1".into(),
            description: "Bu lông".into(),
            quantity: 100.0,
            total: 250000.0,
        }]),
    };
    session.submit(&pdf2, &ok).await;

    assert_eq!(session.mode(), Mode::Ready);
    assert_eq!(session.source_file_name(), "order2.pdf");
    assert_eq!(session.records().len(), 1);
    assert!(session.error_message().is_none());
}

#[tokio::test]
async fn test_records_json_roundtrip_and_restore() {
    let dir = tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "order3.pdf");

    let extractor = MockExtractor {
        outcome: MockOutcome::Records(vec![
            RecordDraft {
                po: "PO300".into(),
                sku: "C1".into(),
                description: "Sơn chống gỉ".into(),
                quantity: 12.0,
                total: 780000.0,
            },
            RecordDraft {
                po: "PO300".into(),
                sku: "C2".into(),
                description: "Cọ quét".into(),
                quantity: 4.0,
                total: 60000.0,
            },
        ]),
    };

    let mut session = Session::new();
    session.submit(&pdf, &extractor).await;
    assert_eq!(session.mode(), Mode::Ready);

    // lưu JSON như lệnh `extract` rồi nạp lại như lệnh `edit`/`export`
    let json = serde_json::to_string_pretty(session.records()).unwrap();
    let loaded: Vec<po_extract::session::Record> = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded, session.records());

    let mut restored = Session::restore(loaded, "order3");
    assert_eq!(restored.mode(), Mode::Ready);

    // sửa được trên phiên đã dựng lại
    let id = restored.records()[1].id;
    assert!(restored.update_field(id, RecordField::Total, "65000"));
    assert_eq!(restored.records()[1].total, 65000.0);
    assert_eq!(restored.records()[0].total, 780000.0);
}
