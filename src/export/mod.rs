pub mod excel;

pub use excel::{generate_excel, generate_excel_buffer};

/// Tên file xuất mặc định: `PO_Data_<tên tệp gốc>.xlsx`
pub fn default_output_name(source_file_name: &str) -> String {
    format!("PO_Data_{}.xlsx", source_file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(default_output_name("order1.pdf"), "PO_Data_order1.pdf.xlsx");
        assert_eq!(default_output_name(""), "PO_Data_.xlsx");
    }
}
