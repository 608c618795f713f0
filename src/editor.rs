//! Chỉnh sửa dòng hàng tương tác trên terminal
//!
//! Thay cho bảng chỉnh sửa trên trình duyệt: in bảng, nhận lệnh
//! `<dòng> <trường> <giá trị>`, sửa đúng một ô mỗi lệnh.

use crate::error::{PoExtractError, Result};
use crate::session::{Record, RecordField, Session};
use dialoguer::Input;

/// Hành động người dùng trong vòng lặp chỉnh sửa
pub enum EditAction {
    /// Sửa một ô: (số dòng 1-based, trường, giá trị mới)
    Edit(usize, RecordField, String),
    /// Kết thúc và tiếp tục xuất/lưu
    Done,
    /// Thoát, bỏ qua bước xuất
    Quit,
}

/// In bảng dòng hàng hiện tại
pub fn print_records(records: &[Record]) {
    println!(
        "{:>4}  {:<20} {:<20} {:<40} {:>12} {:>16}",
        "#", "PO", "SKU", "Diễn giải", "Số lượng", "Thành tiền"
    );
    for (i, r) in records.iter().enumerate() {
        println!(
            "{:>4}  {:<20} {:<20} {:<40} {:>12} {:>16}",
            i + 1,
            r.po,
            r.sku,
            r.description,
            format_number(r.quantity),
            format_number(r.total)
        );
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".into()
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Phân tích một dòng lệnh thành hành động
pub fn parse_action(input: &str) -> std::result::Result<EditAction, String> {
    let trimmed = input.trim();

    match trimmed {
        "x" | "X" => return Ok(EditAction::Done),
        "q" | "Q" => return Ok(EditAction::Quit),
        _ => {}
    }

    let mut parts = trimmed.splitn(3, char::is_whitespace);
    let row = parts
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| "Lệnh không hợp lệ. Dùng: <dòng> <trường> <giá trị>, x hoặc q".to_string())?;
    let field: RecordField = parts
        .next()
        .ok_or_else(|| "Thiếu tên trường".to_string())?
        .parse()?;
    let value = parts.next().unwrap_or("").trim().to_string();

    Ok(EditAction::Edit(row, field, value))
}

/// Vòng lặp chỉnh sửa. Trả về `true` nếu người dùng chọn tiếp tục xuất.
pub fn run_interactive_editor(session: &mut Session) -> Result<bool> {
    println!("---");
    println!("Lệnh: <dòng> <trường> <giá trị> để sửa | x: xong | q: thoát");
    println!("Trường: po, sku, description (mota), quantity (soluong), total (thanhtien)");
    println!("---\n");

    loop {
        print_records(session.records());

        let input: String = Input::new()
            .with_prompt("Lệnh")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PoExtractError::Prompt(e.to_string()))?;

        if input.trim().is_empty() {
            continue;
        }

        match parse_action(&input) {
            Ok(EditAction::Edit(row, field, value)) => {
                let Some(record) = session.records().get(row.wrapping_sub(1)) else {
                    println!("  → Không có dòng {}\n", row);
                    continue;
                };
                let id = record.id;
                if session.update_field(id, field, &value) {
                    println!("  → Đã cập nhật dòng {}\n", row);
                } else {
                    println!("  → Không cập nhật được\n");
                }
            }
            Ok(EditAction::Done) => return Ok(true),
            Ok(EditAction::Quit) => {
                println!("Thoát, không xuất file.");
                return Ok(false);
            }
            Err(msg) => println!("  → {}\n", msg),
        }
    }
}
