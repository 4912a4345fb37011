//! PPTX (Office Open XML) slide-deck extractor.
//!
//! Reads .pptx files, which are ZIP archives of XML parts, and pulls out
//! per-slide titles, body text and embedded pictures.

pub mod package;
pub mod parser;

pub use parser::{PptxExtractor, SlideElement};
