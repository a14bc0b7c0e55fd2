pub mod pdf_document;
pub mod pdf_printer;
pub mod temp_document;

pub use pdf_document::PdfDocument;
pub use pdf_printer::PdfPrinter;
pub use temp_document::TempDocument;
