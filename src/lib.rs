//! po-extract - trích xuất bảng đơn đặt hàng từ PDF bằng Gemini
//! và xuất kết quả ra Excel

pub mod cli;
pub mod config;
pub mod editor;
pub mod encoder;
pub mod error;
pub mod export;
pub mod extractor;
pub mod session;
