//! Core domain types, record builders, output layout and JSON serialization
//! for presentation content extraction.

pub mod builder;
pub mod error;
pub mod output;
pub mod serialize;
pub mod types;

pub use builder::{PageBuilder, SlideBuilder};
pub use error::{Error, Result};
pub use output::OutputDir;
pub use serialize::save_json;
pub use types::{
    Extraction, Extractor, ImageFailure, PresentationRecord, ShapeKind, SlideRecord, SourceFormat,
};
