//! PPTX slide walk: shape classification, text and picture extraction.

use crate::package::{self, local_name, Relationship};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidex_core::output::base_filename;
use slidex_core::{
    Error, Extraction, Extractor, OutputDir, PresentationRecord, Result, ShapeKind,
    SlideBuilder, SlideRecord,
};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Extractor for PPTX (Office Open XML) slide decks.
pub struct PptxExtractor;

impl PptxExtractor {
    /// Create a new PPTX extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract from an already opened package.
    ///
    /// `filename` is the title used when the package declares none.
    pub fn extract_from<R: Read + Seek>(
        &self,
        reader: R,
        filename: &str,
        output: &OutputDir,
    ) -> Result<Extraction> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let title = package::core_title(&mut archive).unwrap_or_else(|| filename.to_string());
        let mut extraction = Extraction::new(PresentationRecord::new(title));

        let slide_order = package::slide_order(&mut archive)?;
        log::debug!("Found {} slides", slide_order.len());

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.extract_slide(&mut archive, slide_path, idx + 1, output, &mut extraction)?;
            extraction.record.add_slide(slide);
        }

        Ok(extraction)
    }

    /// Build the record of one slide, writing its pictures as it goes.
    fn extract_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
        output: &OutputDir,
        extraction: &mut Extraction,
    ) -> Result<SlideRecord> {
        log::debug!("Parsing slide {} ({})", slide_number, slide_path);

        let content = package::read_part(archive, slide_path)?;
        let rels = package::read_relationships(archive, slide_path)?;
        let elements = parse_shape_tree(&content)?;

        let mut slide = SlideBuilder::new();

        for (position, element) in elements.iter().enumerate() {
            if let Some(text) = element.text() {
                slide.push_text(text);
            }

            if element.kind == ShapeKind::Image {
                let shape_id = element
                    .shape_id
                    .clone()
                    .unwrap_or_else(|| (position + 1).to_string());
                let filename = format!("slide_{}_image_{}.jpg", slide_number, shape_id);

                match self.save_picture(archive, &rels, element, &filename, output) {
                    Ok(()) => slide.push_image(filename),
                    Err(e) => extraction.image_error(slide_number, filename, e)?,
                }
            }
        }

        Ok(slide.finish())
    }

    /// Resolve a picture's embedded blip and write its bytes.
    fn save_picture<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        rels: &[Relationship],
        element: &SlideElement,
        filename: &str,
        output: &OutputDir,
    ) -> Result<()> {
        let embed = element
            .embed
            .as_deref()
            .ok_or_else(|| Error::image(filename, "picture has no embedded image"))?;

        let rel = package::find_relationship(rels, embed)
            .ok_or_else(|| Error::image(filename, format!("no relationship '{}'", embed)))?;

        if rel.external {
            return Err(Error::image(
                filename,
                format!("image is linked externally to '{}'", rel.target),
            ));
        }

        let bytes = package::read_part_bytes(archive, &rel.target)
            .map_err(|e| Error::image(filename, e))?;

        output.write_image(filename, &bytes)?;
        Ok(())
    }
}

impl Default for PptxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PptxExtractor {
    fn extract(&self, input: &Path, output: &OutputDir) -> Result<Extraction> {
        let file = File::open(input).map_err(|e| Error::fs(input, e))?;
        self.extract_from(BufReader::new(file), &base_filename(input), output)
    }
}

/// A top-level element of a slide's shape tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideElement {
    pub kind: ShapeKind,
    /// `cNvPr id` of the shape.
    pub shape_id: Option<String>,
    /// Paragraphs joined with newlines; only kept for text shapes.
    pub text: String,
    /// Relationship id of the picture's blip.
    pub embed: Option<String>,
}

impl SlideElement {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            shape_id: None,
            text: String::new(),
            embed: None,
        }
    }

    /// The element's text, if it is a text shape.
    pub fn text(&self) -> Option<&str> {
        match self.kind {
            ShapeKind::Text => Some(&self.text),
            ShapeKind::Image | ShapeKind::Other => None,
        }
    }
}

/// In-progress state for the element being read.
#[derive(Debug)]
struct PendingElement {
    element: SlideElement,
    in_text_body: bool,
    in_text: bool,
    paragraphs: usize,
}

impl PendingElement {
    fn new(kind: ShapeKind) -> Self {
        Self {
            element: SlideElement::new(kind),
            in_text_body: false,
            in_text: false,
            paragraphs: 0,
        }
    }

    /// Handle a descendant start tag, or an empty one when `empty` is set.
    /// Empty tags never open a text body or a text run.
    fn open(&mut self, e: &BytesStart, empty: bool) {
        match local_name(e.name().as_ref()) {
            b"cNvPr" if self.element.shape_id.is_none() => {
                self.element.shape_id = attribute(e, b"id", false);
            }
            b"txBody" if !empty => self.in_text_body = true,
            b"p" if self.in_text_body => {
                if self.paragraphs > 0 {
                    self.element.text.push('\n');
                }
                self.paragraphs += 1;
            }
            b"br" if self.in_text_body => self.element.text.push('\n'),
            b"t" if self.in_text_body && !empty => self.in_text = true,
            b"blip" if self.element.embed.is_none() => {
                self.element.embed = attribute(e, b"embed", true);
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"txBody" => self.in_text_body = false,
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn finish(mut self) -> SlideElement {
        if self.element.kind != ShapeKind::Text {
            self.element.text.clear();
        }
        self.element
    }
}

/// Read the top-level elements of `p:spTree`, in document order.
///
/// Groups, graphic frames and compatibility wrappers are reported as
/// [`ShapeKind::Other`]; their children are not visited.
pub fn parse_shape_tree(xml_content: &str) -> Result<Vec<SlideElement>> {
    let mut elements = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    // depth below p:spTree; 0 means outside the tree
    let mut depth = 0usize;
    let mut in_tree = false;
    let mut current: Option<PendingElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                let name = local_name(name.as_ref());

                if !in_tree {
                    if name == b"spTree" {
                        in_tree = true;
                        depth = 0;
                    }
                    continue;
                }

                depth += 1;
                if depth == 1 {
                    current = classify(name).map(PendingElement::new);
                } else if let Some(ref mut pending) = current {
                    pending.open(e, false);
                }
            }
            Ok(Event::Empty(ref e)) => {
                if in_tree && depth >= 1 {
                    if let Some(ref mut pending) = current {
                        pending.open(e, true);
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut pending) = current {
                    if pending.in_text {
                        let text = e.unescape().unwrap_or_default();
                        pending.element.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                if !in_tree {
                    continue;
                }

                let name = e.name();
                let name = local_name(name.as_ref());

                if depth == 0 {
                    // end of p:spTree
                    in_tree = false;
                    continue;
                }

                if depth == 1 {
                    if let Some(pending) = current.take() {
                        elements.push(pending.finish());
                    }
                } else if let Some(ref mut pending) = current {
                    pending.close(name);
                }
                depth -= 1;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error (keeping {} shapes read so far): {}", elements.len(), e);
                break;
            }
            _ => {}
        }
    }

    Ok(elements)
}

/// Classify a direct child of `p:spTree`. Non-shape children (the tree's
/// own property elements) yield `None`.
fn classify(name: &[u8]) -> Option<ShapeKind> {
    match name {
        b"sp" => Some(ShapeKind::Text),
        b"pic" => Some(ShapeKind::Image),
        b"grpSp" | b"graphicFrame" | b"cxnSp" | b"contentPart" | b"AlternateContent" => {
            Some(ShapeKind::Other)
        }
        _ => None,
    }
}

/// Read an attribute by local name. `prefixed` selects namespaced
/// attributes such as `r:embed` over plain ones.
fn attribute(e: &BytesStart, name: &[u8], prefixed: bool) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        let matches = attr.key.local_name().as_ref() == name
            && attr.key.prefix().is_some() == prefixed;
        matches.then(|| String::from_utf8_lossy(&attr.value).into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
    const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

    fn text_shape(id: u32, paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>"#
        )
    }

    fn picture(id: u32, rid: &str) -> String {
        format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>"#
        )
    }

    fn slide_xml(shapes: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
            shapes.concat()
        )
    }

    fn rels_xml(rels: &[(&str, &str, &str)]) -> String {
        let body: String = rels
            .iter()
            .map(|(id, ty, target)| {
                format!(r#"<Relationship Id="{id}" Type="{ty}" Target="{target}"/>"#)
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#
        )
    }

    struct TestSlide {
        xml: String,
        rels: Vec<(&'static str, &'static str, &'static str)>,
    }

    /// Assemble a minimal package; slides are listed in the given order.
    fn build_pptx(title: Option<&str>, slides: &[TestSlide], media: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        let mut put = |name: &str, data: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        };

        put(
            "_rels/.rels",
            rels_xml(&[(
                "rId1",
                "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
                "docProps/core.xml",
            )])
            .as_bytes(),
        );

        if let Some(title) = title {
            let core = format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{title}</dc:title></cp:coreProperties>"#
            );
            put("docProps/core.xml", core.as_bytes());
        }

        let ids: Vec<String> = (0..slides.len()).map(|i| format!("rId{}", i + 10)).collect();
        let targets: Vec<String> = (0..slides.len())
            .map(|i| format!("slides/slide{}.xml", i + 1))
            .collect();
        let pres_rels: Vec<(&str, &str, &str)> = ids
            .iter()
            .zip(&targets)
            .map(|(id, target)| (id.as_str(), REL_SLIDE, target.as_str()))
            .collect();
        put("ppt/_rels/presentation.xml.rels", rels_xml(&pres_rels).as_bytes());

        let list: String = ids
            .iter()
            .enumerate()
            .map(|(i, id)| format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + i, id))
            .collect();
        put(
            "ppt/presentation.xml",
            format!(r#"<p:presentation {NS}><p:sldIdLst>{list}</p:sldIdLst></p:presentation>"#)
                .as_bytes(),
        );

        for (i, slide) in slides.iter().enumerate() {
            put(&format!("ppt/slides/slide{}.xml", i + 1), slide.xml.as_bytes());
            if !slide.rels.is_empty() {
                put(
                    &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                    rels_xml(&slide.rels).as_bytes(),
                );
            }
        }

        for (name, data) in media {
            put(name, data);
        }

        zip.finish().unwrap().into_inner()
    }

    fn run(bytes: Vec<u8>, out: &OutputDir) -> Extraction {
        PptxExtractor::new()
            .extract_from(Cursor::new(bytes), "deck.pptx", out)
            .unwrap()
    }

    #[test]
    fn test_three_slide_scenario() {
        let slides = vec![
            TestSlide {
                xml: slide_xml(&[text_shape(2, &["Intro"]), text_shape(3, &["Welcome text"])]),
                rels: vec![],
            },
            TestSlide {
                xml: slide_xml(&[picture(4, "rId2")]),
                rels: vec![("rId2", REL_IMAGE, "../media/image1.png")],
            },
            TestSlide {
                xml: slide_xml(&[]),
                rels: vec![],
            },
        ];
        let bytes = build_pptx(None, &slides, &[("ppt/media/image1.png", PNG_BYTES)]);

        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::new(tmp.path());
        let extraction = run(bytes, &out);
        let record = extraction.record;

        assert_eq!(record.title, "deck.pptx");
        assert_eq!(record.slides.len(), 3);
        assert_eq!(
            record.slides[0],
            SlideRecord {
                title: "Intro".into(),
                text: "Welcome text\n".into(),
                images: vec![],
            }
        );
        assert_eq!(
            record.slides[1],
            SlideRecord {
                title: String::new(),
                text: String::new(),
                images: vec!["slide_2_image_4.jpg".into()],
            }
        );
        assert_eq!(record.slides[2], SlideRecord::default());

        let written = std::fs::read(tmp.path().join("slide_2_image_4.jpg")).unwrap();
        assert_eq!(written, PNG_BYTES);
        assert!(extraction.failures.is_empty());
    }

    #[test]
    fn test_declared_title_and_multi_paragraph_body() {
        let slides = vec![TestSlide {
            xml: slide_xml(&[
                text_shape(2, &["Agenda"]),
                text_shape(3, &["  First point", "Second point  "]),
                text_shape(5, &["Тезис"]),
            ]),
            rels: vec![],
        }];
        let bytes = build_pptx(Some("Quarterly &amp; Review"), &slides, &[]);

        let tmp = tempfile::tempdir().unwrap();
        let record = run(bytes, &OutputDir::new(tmp.path())).record;

        assert_eq!(record.title, "Quarterly & Review");
        assert_eq!(record.slides[0].title, "Agenda");
        assert_eq!(record.slides[0].text, "First point\nSecond point\nТезис\n");
    }

    #[test]
    fn test_declared_title_is_kept_verbatim() {
        let slides = vec![TestSlide {
            xml: slide_xml(&[]),
            rels: vec![],
        }];
        let bytes = build_pptx(Some(" Annual Report "), &slides, &[]);

        let tmp = tempfile::tempdir().unwrap();
        let record = run(bytes, &OutputDir::new(tmp.path())).record;
        assert_eq!(record.title, " Annual Report ");
    }

    #[test]
    fn test_blank_declared_title_falls_back() {
        let slides = vec![TestSlide {
            xml: slide_xml(&[]),
            rels: vec![],
        }];
        let bytes = build_pptx(Some("   "), &slides, &[]);

        let tmp = tempfile::tempdir().unwrap();
        let record = run(bytes, &OutputDir::new(tmp.path())).record;
        assert_eq!(record.title, "deck.pptx");
    }

    #[test]
    fn test_dangling_picture_is_skipped_not_fatal() {
        let slides = vec![TestSlide {
            xml: slide_xml(&[
                text_shape(2, &["Photos"]),
                picture(6, "rId9"),
                picture(7, "rId2"),
                text_shape(8, &["Caption"]),
            ]),
            rels: vec![("rId2", REL_IMAGE, "../media/image2.jpeg")],
        }];
        let bytes = build_pptx(None, &slides, &[("ppt/media/image2.jpeg", b"\xFF\xD8\xFFjpeg")]);

        let tmp = tempfile::tempdir().unwrap();
        let extraction = run(bytes, &OutputDir::new(tmp.path()));

        let slide = &extraction.record.slides[0];
        assert_eq!(slide.title, "Photos");
        assert_eq!(slide.text, "Caption\n");
        assert_eq!(slide.images, vec!["slide_1_image_7.jpg"]);

        assert_eq!(extraction.failures.len(), 1);
        assert_eq!(extraction.failures[0].unit, 1);
        assert_eq!(extraction.failures[0].filename, "slide_1_image_6.jpg");
        assert!(!tmp.path().join("slide_1_image_6.jpg").exists());
    }

    #[test]
    fn test_missing_media_part_is_skipped() {
        let slides = vec![TestSlide {
            xml: slide_xml(&[picture(3, "rId2")]),
            rels: vec![("rId2", REL_IMAGE, "../media/gone.png")],
        }];
        let bytes = build_pptx(None, &slides, &[]);

        let tmp = tempfile::tempdir().unwrap();
        let extraction = run(bytes, &OutputDir::new(tmp.path()));
        assert!(extraction.record.slides[0].images.is_empty());
        assert_eq!(extraction.failures.len(), 1);
    }

    #[test]
    fn test_every_listed_image_exists() {
        let slides = vec![
            TestSlide {
                xml: slide_xml(&[picture(4, "rId2"), picture(5, "rId3")]),
                rels: vec![
                    ("rId2", REL_IMAGE, "../media/image1.png"),
                    ("rId3", REL_IMAGE, "../media/image2.png"),
                ],
            },
            TestSlide {
                xml: slide_xml(&[picture(4, "rId2")]),
                rels: vec![("rId2", REL_IMAGE, "../media/image1.png")],
            },
        ];
        let bytes = build_pptx(
            None,
            &slides,
            &[
                ("ppt/media/image1.png", PNG_BYTES),
                ("ppt/media/image2.png", PNG_BYTES),
            ],
        );

        let tmp = tempfile::tempdir().unwrap();
        let record = run(bytes, &OutputDir::new(tmp.path())).record;

        let images: Vec<_> = record.all_images().collect();
        assert_eq!(
            images,
            vec!["slide_1_image_4.jpg", "slide_1_image_5.jpg", "slide_2_image_4.jpg"]
        );
        for image in images {
            assert!(tmp.path().join(image).is_file(), "{} missing", image);
        }
    }

    #[test]
    fn test_shape_tree_classification() {
        let group = r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="9" name="Group"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="10" name="Inner"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:p><a:r><a:t>Nested</a:t></a:r></a:p></p:txBody></p:sp></p:grpSp>"#;
        let no_body = r#"<p:sp><p:nvSpPr><p:cNvPr id="11" name="Rect"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>"#;
        let xml = slide_xml(&[
            text_shape(2, &["Title"]),
            group.to_string(),
            no_body.to_string(),
            picture(12, "rId4"),
        ]);

        let elements = parse_shape_tree(&xml).unwrap();
        let kinds: Vec<_> = elements.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ShapeKind::Text, ShapeKind::Other, ShapeKind::Text, ShapeKind::Image]
        );

        assert_eq!(elements[0].text(), Some("Title"));
        assert_eq!(elements[0].shape_id.as_deref(), Some("2"));
        assert_eq!(elements[1].text(), None);
        assert_eq!(elements[2].text(), Some(""));
        assert_eq!(elements[3].shape_id.as_deref(), Some("12"));
        assert_eq!(elements[3].embed.as_deref(), Some("rId4"));
    }

    #[test]
    fn test_runs_breaks_and_entities() {
        let sp = r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Fish </a:t></a:r><a:r><a:rPr b="1"/><a:t>&amp; chips</a:t></a:r><a:br/><a:r><a:t>daily</a:t></a:r></a:p><a:p><a:fld id="{1}" type="slidenum"><a:t>7</a:t></a:fld></a:p></p:txBody></p:sp>"#;
        let elements = parse_shape_tree(&slide_xml(&[sp.to_string()])).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].text(), Some("Fish & chips\ndaily\n7"));
    }

    #[test]
    fn test_empty_text_run_does_not_capture_whitespace() {
        let sp = r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/></p:nvSpPr><p:txBody><a:p><a:r><a:t/></a:r>
            <a:r><a:t>Kept</a:t></a:r></a:p></p:txBody></p:sp>"#;
        let elements = parse_shape_tree(&slide_xml(&[sp.to_string()])).unwrap();
        assert_eq!(elements[0].text(), Some("Kept"));
    }

    #[test]
    fn test_empty_shapes_after_title_leave_blank_lines() {
        let placeholder = r#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="Subtitle"/></p:nvSpPr><p:txBody><a:bodyPr/><a:p/></p:txBody></p:sp>"#;
        let rect = r#"<p:sp><p:nvSpPr><p:cNvPr id="5" name="Rect"/></p:nvSpPr><p:spPr/></p:sp>"#;
        let slides = vec![TestSlide {
            xml: slide_xml(&[
                text_shape(2, &["Title"]),
                placeholder.to_string(),
                rect.to_string(),
                text_shape(6, &["Body"]),
            ]),
            rels: vec![],
        }];
        let bytes = build_pptx(None, &slides, &[]);

        let tmp = tempfile::tempdir().unwrap();
        let record = run(bytes, &OutputDir::new(tmp.path())).record;
        assert_eq!(record.slides[0].title, "Title");
        assert_eq!(record.slides[0].text, "\n\nBody\n");
    }
}
