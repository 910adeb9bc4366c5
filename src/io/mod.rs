mod export;
mod pdf;
mod receipt;

pub use export::Exporter;
pub use pdf::PdfRenderer;
pub use receipt::{build_receipt, receipt_text, ReceiptLine, ReceiptView};
