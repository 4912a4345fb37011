//! Per-unit record builders.
//!
//! Both formats use the same "first text is the title" heuristic, but they
//! differ in how the remaining text is joined: slide decks contribute whole
//! shapes, page documents contribute individual spans grouped into lines.

use crate::types::SlideRecord;

/// Accumulates one slide of a slide deck, shape by shape.
#[derive(Debug, Default)]
pub struct SlideBuilder {
    record: SlideRecord,
}

impl SlideBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the text of one shape.
    ///
    /// The first non-blank text becomes the title. Every later text is
    /// appended trimmed and followed by a newline, so an empty shape after
    /// the title leaves a blank line.
    pub fn push_text(&mut self, text: &str) {
        let text = text.trim();
        if self.record.title.is_empty() {
            self.record.title = text.to_string();
        } else {
            self.record.text.push_str(text);
            self.record.text.push('\n');
        }
    }

    /// Add the filename of an image already written to disk.
    pub fn push_image(&mut self, filename: impl Into<String>) {
        self.record.images.push(filename.into());
    }

    pub fn finish(self) -> SlideRecord {
        self.record
    }
}

/// Accumulates one page of a page document, span by span.
#[derive(Debug, Default)]
pub struct PageBuilder {
    record: SlideRecord,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one span of the current line.
    ///
    /// The first non-blank span becomes the title. Every later span is
    /// appended trimmed and followed by a single space, blank ones included.
    pub fn push_span(&mut self, text: &str) {
        let text = text.trim();
        if self.record.title.is_empty() {
            self.record.title = text.to_string();
        } else {
            self.record.text.push_str(text);
            self.record.text.push(' ');
        }
    }

    /// Close the current line.
    pub fn end_line(&mut self) {
        self.record.text.push('\n');
    }

    /// Add the filename of an image already written to disk.
    pub fn push_image(&mut self, filename: impl Into<String>) {
        self.record.images.push(filename.into());
    }

    pub fn finish(self) -> SlideRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_first_text_is_title() {
        let mut slide = SlideBuilder::new();
        slide.push_text("  Intro ");
        slide.push_text("Welcome text");
        let record = slide.finish();
        assert_eq!(record.title, "Intro");
        assert_eq!(record.text, "Welcome text\n");
        assert!(record.images.is_empty());
    }

    #[test]
    fn test_slide_blank_shapes_before_title_are_skipped() {
        let mut slide = SlideBuilder::new();
        slide.push_text("   ");
        slide.push_text("Agenda");
        slide.push_text("Item one\nItem two");
        let record = slide.finish();
        assert_eq!(record.title, "Agenda");
        assert_eq!(record.text, "Item one\nItem two\n");
    }

    #[test]
    fn test_slide_blank_shapes_after_title_leave_empty_lines() {
        let mut slide = SlideBuilder::new();
        slide.push_text("Title");
        slide.push_text("   ");
        slide.push_text("Body");
        slide.push_text("\n");
        let record = slide.finish();
        assert_eq!(record.title, "Title");
        assert_eq!(record.text, "\nBody\n\n");
    }

    #[test]
    fn test_slide_images_keep_order() {
        let mut slide = SlideBuilder::new();
        slide.push_image("slide_2_image_7.jpg");
        slide.push_image("slide_2_image_4.jpg");
        let record = slide.finish();
        assert_eq!(record.title, "");
        assert_eq!(record.images, vec!["slide_2_image_7.jpg", "slide_2_image_4.jpg"]);
    }

    #[test]
    fn test_page_spans_and_lines() {
        let mut page = PageBuilder::new();
        page.push_span("Lecture 1 ");
        page.end_line();
        page.push_span("Sorting");
        page.push_span(" algorithms ");
        page.end_line();
        page.push_span("Quicksort");
        page.end_line();

        let record = page.finish();
        assert_eq!(record.title, "Lecture 1");
        assert_eq!(record.text, "\nSorting algorithms \nQuicksort \n");
    }

    #[test]
    fn test_page_title_is_mid_line() {
        let mut page = PageBuilder::new();
        page.push_span("");
        page.push_span("Heading");
        page.push_span("rest of line");
        page.end_line();

        let record = page.finish();
        assert_eq!(record.title, "Heading");
        assert_eq!(record.text, "rest of line \n");
    }

    #[test]
    fn test_page_blank_spans_after_title_keep_separator() {
        let mut page = PageBuilder::new();
        page.push_span("Title");
        page.end_line();
        page.push_span("a");
        page.push_span("  ");
        page.push_span("b");
        page.end_line();

        let record = page.finish();
        assert_eq!(record.text, "\na  b \n");
    }

    #[test]
    fn test_empty_page() {
        let record = PageBuilder::new().finish();
        assert_eq!(record, SlideRecord::default());
    }
}
