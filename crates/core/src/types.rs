//! Domain types for representing extracted presentation content.

use crate::error::{Error, Result};
use crate::output::OutputDir;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The whole extracted document, as written to `presentation_data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRecord {
    /// Declared metadata title, or the base input filename.
    pub title: String,

    /// One record per slide or page, in document order.
    pub slides: Vec<SlideRecord>,
}

impl PresentationRecord {
    /// Create an empty record with the given document title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Append the next unit.
    pub fn add_slide(&mut self, slide: SlideRecord) {
        self.slides.push(slide);
    }

    /// All image filenames across every unit, in order.
    pub fn all_images(&self) -> impl Iterator<Item = &str> {
        self.slides
            .iter()
            .flat_map(|s| s.images.iter().map(String::as_str))
    }
}

/// Content of a single slide or page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// First text encountered in the unit; may be empty.
    pub title: String,

    /// Remaining text, newline-joined; may be empty.
    pub text: String,

    /// Filenames of images written to the output directory.
    pub images: Vec<String>,
}

/// The format of the source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Slide deck (Office Open XML presentation).
    Pptx,
    /// Page document (PDF).
    Pdf,
}

impl SourceFormat {
    /// Detect format from a file extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_extension(&ext).ok_or_else(|| {
            if ext.is_empty() {
                Error::UnsupportedFormat(format!("{} (no extension)", path.display()))
            } else {
                Error::UnsupportedFormat(format!(".{}", ext))
            }
        })
    }
}

/// Classification of a slide element, resolved once by the format adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// A shape with a text body.
    Text,
    /// A picture shape carrying embedded image bytes.
    Image,
    /// Anything else (groups, connectors, tables, charts).
    Other,
}

/// A recoverable failure for one image, reported alongside the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFailure {
    /// 1-based slide or page number.
    pub unit: usize,

    /// The filename the image would have been written to.
    pub filename: String,

    /// Why the image was skipped.
    pub reason: String,
}

impl ImageFailure {
    pub fn new(unit: usize, filename: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            unit,
            filename: filename.into(),
            reason: reason.to_string(),
        }
    }
}

/// The result of running an extractor over one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: PresentationRecord,
    pub failures: Vec<ImageFailure>,
}

impl Extraction {
    pub fn new(record: PresentationRecord) -> Self {
        Self {
            record,
            failures: Vec::new(),
        }
    }

    /// Record a skipped image, logging it as it happens.
    pub fn skip_image(&mut self, failure: ImageFailure) {
        log::warn!(
            "Skipping image {} on unit {}: {}",
            failure.filename,
            failure.unit,
            failure.reason
        );
        self.failures.push(failure);
    }

    /// Record an image error as a failure if extraction can continue past
    /// it, otherwise hand it back.
    pub fn image_error(
        &mut self,
        unit: usize,
        filename: impl Into<String>,
        err: Error,
    ) -> Result<()> {
        if !err.is_recoverable() {
            return Err(err);
        }
        self.skip_image(ImageFailure::new(unit, filename, err));
        Ok(())
    }
}

/// A format-specific walk over one input file.
///
/// Implementations write every image into `output` as they go and return
/// the record holding the filenames that were written.
pub trait Extractor {
    fn extract(&self, input: &Path, output: &OutputDir) -> Result<Extraction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("pptx"), Some(SourceFormat::Pptx));
        assert_eq!(SourceFormat::from_extension(".PPTX"), Some(SourceFormat::Pptx));
        assert_eq!(SourceFormat::from_extension("Pdf"), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_extension("ppt"), None);
        assert_eq!(SourceFormat::from_extension("docx"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SourceFormat::from_path(Path::new("talks/1_lecture.PDF")).unwrap(),
            SourceFormat::Pdf
        );

        let err = SourceFormat::from_path(Path::new("notes.docx")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref e) if e == ".docx"));

        let err = SourceFormat::from_path(Path::new("README")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_image_error_keeps_only_recoverable_failures() {
        let mut extraction = Extraction::new(PresentationRecord::new("deck.pptx"));

        extraction
            .image_error(2, "slide_2_image_5.jpg", Error::image("slide_2_image_5.jpg", "gone"))
            .unwrap();
        assert_eq!(extraction.failures.len(), 1);
        assert_eq!(extraction.failures[0].unit, 2);
        assert_eq!(extraction.failures[0].filename, "slide_2_image_5.jpg");

        let err = extraction
            .image_error(2, "slide_2_image_6.jpg", Error::Encrypted)
            .unwrap_err();
        assert!(matches!(err, Error::Encrypted));
        assert_eq!(extraction.failures.len(), 1);
    }

    #[test]
    fn test_all_images_in_order() {
        let mut record = PresentationRecord::new("deck.pptx");
        record.add_slide(SlideRecord {
            images: vec!["slide_1_image_3.jpg".into()],
            ..Default::default()
        });
        record.add_slide(SlideRecord::default());
        record.add_slide(SlideRecord {
            images: vec!["slide_3_image_2.jpg".into(), "slide_3_image_5.jpg".into()],
            ..Default::default()
        });

        let images: Vec<_> = record.all_images().collect();
        assert_eq!(
            images,
            vec!["slide_1_image_3.jpg", "slide_3_image_2.jpg", "slide_3_image_5.jpg"]
        );
    }
}
