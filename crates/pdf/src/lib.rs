//! PDF page-document extractor.
//!
//! Each page becomes one record: the first text span is the title, the rest
//! of the page's text is the body, and every image XObject the page uses is
//! written next to the record.

pub mod images;
pub mod parser;
pub mod text;

pub use parser::PdfExtractor;
