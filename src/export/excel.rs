//! Sinh file Excel từ danh sách dòng hàng
//!
//! Một sheet, năm cột cố định theo thứ tự PO / SKU / Diễn giải /
//! Số lượng / Thành tiền. Số giữ nguyên là số, chữ giữ nguyên là chữ.

use crate::error::{PoExtractError, Result};
use crate::session::Record;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

const SHEET_NAME: &str = "PO Data";

/// (nhãn cột, độ rộng hiển thị theo ký tự)
const COLUMNS: [(&str, f64); 5] = [
    ("PO", 20.0),
    ("SKU", 20.0),
    ("Diễn giải", 50.0),
    ("Số lượng", 15.0),
    ("Thành tiền", 20.0),
];

/// Sinh workbook vào buffer (một hàng tiêu đề + một hàng mỗi dòng hàng)
pub fn generate_excel_buffer(records: &[Record]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| PoExtractError::ExcelGeneration(format!("đặt tên sheet: {}", e)))?;

    for (col, (label, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, *width)
            .map_err(|e| PoExtractError::ExcelGeneration(format!("đặt độ rộng cột: {}", e)))?;
        worksheet
            .write_string_with_format(0, col, *label, &header_format)
            .map_err(|e| PoExtractError::ExcelGeneration(format!("ghi tiêu đề: {}", e)))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let write_err =
            |e: rust_xlsxwriter::XlsxError| PoExtractError::ExcelGeneration(format!("ghi dòng {}: {}", row, e));

        worksheet.write_string(row, 0, &record.po).map_err(write_err)?;
        worksheet.write_string(row, 1, &record.sku).map_err(write_err)?;
        worksheet
            .write_string(row, 2, &record.description)
            .map_err(write_err)?;
        worksheet.write_number(row, 3, record.quantity).map_err(write_err)?;
        worksheet.write_number(row, 4, record.total).map_err(write_err)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| PoExtractError::ExcelGeneration(format!("lưu workbook: {}", e)))
}

/// Sinh file Excel tại đường dẫn chỉ định.
/// Workbook được dựng trọn trong bộ nhớ trước; lỗi sinh không để lại file dở.
pub fn generate_excel(records: &[Record], output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(records)?;
    std::fs::write(output_path, buffer)
        .map_err(|e| PoExtractError::ExcelGeneration(format!("ghi file: {}", e)))?;
    Ok(())
}
