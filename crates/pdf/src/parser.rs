//! PDF page walk.

use crate::images::{self, DecodedImage};
use crate::text::{self, decode_text_simple, TextBlock};
use lopdf::content::Content;
use lopdf::{Document, ObjectId};
use slidex_core::output::base_filename;
use slidex_core::{
    Error, Extraction, Extractor, ImageFailure, OutputDir, PageBuilder, PresentationRecord, Result,
    SlideRecord,
};
use std::collections::HashMap;
use std::path::Path;

/// Extractor for PDF page documents.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract from an already loaded document.
    ///
    /// The record title is always `filename`.
    pub fn extract_document(
        &self,
        doc: &Document,
        filename: &str,
        output: &OutputDir,
    ) -> Result<Extraction> {
        let mut extraction = Extraction::new(PresentationRecord::new(filename));

        let pages = doc.get_pages();
        log::debug!("Found {} pages", pages.len());

        for (idx, page_id) in pages.values().enumerate() {
            let page = self.extract_page(doc, *page_id, idx + 1, output, &mut extraction)?;
            extraction.record.add_slide(page);
        }

        Ok(extraction)
    }

    fn extract_page(
        &self,
        doc: &Document,
        page_id: ObjectId,
        page_number: usize,
        output: &OutputDir,
        extraction: &mut Extraction,
    ) -> Result<SlideRecord> {
        log::debug!("Parsing page {} (object {:?})", page_number, page_id);

        let mut page = PageBuilder::new();

        match page_blocks(doc, page_id) {
            Ok(blocks) => {
                for block in &blocks {
                    for line in &block.lines {
                        for span in &line.spans {
                            page.push_span(span);
                        }
                        page.end_line();
                    }
                }
            }
            Err(e) => log::warn!("No text read from page {}: {}", page_number, e),
        }

        for (index, image_id) in images::page_images(doc, page_id).into_iter().enumerate() {
            let stem = format!("slide_{}_image_{}", page_number, index);

            match images::decode_image(doc, image_id) {
                Ok(DecodedImage { data, ext }) => {
                    let filename = format!("{}.{}", stem, ext);
                    match output.write_image(&filename, &data) {
                        Ok(_) => page.push_image(filename),
                        Err(e) => extraction.image_error(page_number, filename, e)?,
                    }
                }
                Err(e) => extraction.skip_image(ImageFailure::new(page_number, stem, e)),
            }
        }

        Ok(page.finish())
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PdfExtractor {
    fn extract(&self, input: &Path, output: &OutputDir) -> Result<Extraction> {
        let doc = Document::load(input).map_err(|e| load_error(input, e))?;
        self.extract_document(&doc, &base_filename(input), output)
    }
}

fn load_error(path: &Path, err: lopdf::Error) -> Error {
    match err {
        lopdf::Error::IO(e) => Error::fs(path, e),
        lopdf::Error::Decryption(_) => Error::Encrypted,
        other => Error::PdfParse(other.to_string()),
    }
}

/// Decode a page's content stream into text blocks, using each font's
/// declared encoding where the document provides one.
pub fn page_blocks(doc: &Document, page_id: ObjectId) -> Result<Vec<TextBlock>> {
    let raw = doc
        .get_page_content(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;
    let content = Content::decode(&raw).map_err(|e| Error::PdfParse(e.to_string()))?;

    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let encodings: HashMap<Vec<u8>, _> = fonts
        .iter()
        .filter_map(|(name, font)| {
            font.get_font_encoding(doc)
                .ok()
                .map(|encoding| (name.clone(), encoding))
        })
        .collect();

    let decode = |font: &[u8], bytes: &[u8]| {
        encodings
            .get(font)
            .and_then(|encoding| Document::decode_text(encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    };

    Ok(text::segment(&content.operations, decode))
}
