//! OPC package plumbing: reading parts, relationships and part-name resolution.

use quick_xml::events::Event;
use quick_xml::Reader;
use slidex_core::{Error, Result};
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const DEFAULT_CORE_PART: &str = "docProps/core.xml";

/// One `<Relationship>` entry from a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Target resolved to an absolute part name (no leading slash).
    pub target: String,
    pub external: bool,
}

impl Relationship {
    fn type_is(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// Read a part as UTF-8 text.
pub fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    read_optional_part(archive, path)?
        .ok_or_else(|| Error::Zip(format!("File not found in archive '{}'", path)))
}

/// Read a part as UTF-8 text, or `None` if the archive lacks it.
pub fn read_optional_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Option<String>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(Error::Zip(format!("Failed to open '{}': {}", path, e))),
    };

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;

    Ok(Some(content))
}

/// Read a binary part such as a media file.
pub fn read_part_bytes<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Vec<u8>> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut content)
        .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// The relationships part belonging to `part`, e.g.
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target relative to the part that owns it.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Parse the relationships of `source_part`. A missing `.rels` part means
/// the part has no relationships.
pub fn read_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    source_part: &str,
) -> Result<Vec<Relationship>> {
    let rels_path = if source_part.is_empty() {
        "_rels/.rels".to_string()
    } else {
        rels_path_for(source_part)
    };

    match read_optional_part(archive, &rels_path)? {
        Some(content) => parse_relationships(&content, source_part),
        None => Ok(Vec::new()),
    }
}

fn parse_relationships(xml: &str, source_part: &str) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut id = String::new();
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut external = false;

                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                    match attr.key.as_ref() {
                        b"Id" => id = value,
                        b"Type" => rel_type = value,
                        b"Target" => target = value,
                        b"TargetMode" => external = value.eq_ignore_ascii_case("External"),
                        _ => {}
                    }
                }

                let target = if external {
                    target
                } else {
                    resolve_target(source_part, &target)
                };

                rels.push(Relationship {
                    id,
                    rel_type,
                    target,
                    external,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!(
                    "Error parsing relationships of '{}': {}",
                    source_part, e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Find a relationship by id.
pub fn find_relationship<'a>(rels: &'a [Relationship], id: &str) -> Option<&'a Relationship> {
    rels.iter().find(|r| r.id == id)
}

/// Get the ordered list of slide part names.
///
/// Order follows `p:sldIdLst` in `ppt/presentation.xml`. When the list is
/// missing the slide relationships are sorted by their numeric suffix.
pub fn slide_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let rels = read_relationships(archive, PRESENTATION_PART)?;
    let slide_rels: Vec<&Relationship> = rels
        .iter()
        .filter(|r| r.type_is("/slide") && !r.external)
        .collect();

    let presentation = read_part(archive, PRESENTATION_PART)?;
    let listed = slide_id_list(&presentation)?;

    if !listed.is_empty() {
        let mut slides = Vec::with_capacity(listed.len());
        for rid in &listed {
            match slide_rels.iter().find(|r| &r.id == rid) {
                Some(rel) => slides.push(rel.target.clone()),
                None => {
                    return Err(Error::PptxParse(format!(
                        "Slide id list references unknown relationship '{}'",
                        rid
                    )));
                }
            }
        }
        return Ok(slides);
    }

    log::debug!("No slide id list in presentation.xml, ordering slides by part name");
    let mut slides: Vec<(String, Option<usize>)> = slide_rels
        .iter()
        .map(|r| (r.target.clone(), extract_slide_number(&r.target)))
        .collect();

    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    Ok(slides.into_iter().map(|(path, _)| path).collect())
}

/// Collect the `r:id` of every `p:sldId`, in document order.
fn slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // `id` is the numeric slide id, `r:id` is the relationship
                for attr in e.attributes().flatten() {
                    if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
                        ids.push(String::from_utf8_lossy(&attr.value).into_owned());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing presentation.xml: {}", e)));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// The declared `dc:title` of the package, verbatim, if present and
/// non-blank.
pub fn core_title<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<String> {
    let core_part = read_relationships(archive, "")
        .ok()
        .and_then(|rels| {
            rels.into_iter()
                .find(|r| r.type_is("/core-properties"))
                .map(|r| r.target)
        })
        .unwrap_or_else(|| DEFAULT_CORE_PART.to_string());

    let xml = match read_optional_part(archive, &core_part) {
        Ok(Some(xml)) => xml,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Could not read core properties: {}", e);
            return None;
        }
    };

    let mut reader = Reader::from_str(&xml);
    let mut in_title = false;
    let mut title = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"title" => {
                in_title = true;
            }
            Ok(Event::Text(ref e)) if in_title => {
                title.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"title" => break,
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error in core properties: {}", e);
                return None;
            }
            _ => {}
        }
    }

    (!title.trim().is_empty()).then_some(title)
}

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(rels_path_for("ppt/presentation.xml"), "ppt/_rels/presentation.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide2.xml"),
            "ppt/slides/slide2.xml"
        );
        assert_eq!(resolve_target("", "docProps/core.xml"), "docProps/core.xml");
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "/ppt/media/image9.jpeg"),
            "ppt/media/image9.jpeg"
        );
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

        let rels = parse_relationships(xml, "ppt/slides/slide1.xml").unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels[1].target, "ppt/media/image1.png");
        assert!(rels[2].external);
        assert_eq!(rels[2].target, "https://example.com/?a=1&b=2");
        assert_eq!(find_relationship(&rels, "rId2").map(|r| r.id.as_str()), Some("rId2"));
        assert!(find_relationship(&rels, "rId9").is_none());
    }

    #[test]
    fn test_slide_id_list_uses_relationship_ids() {
        let xml = r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:sldIdLst>
    <p:sldId id="257" r:id="rId7"/>
    <p:sldId id="256" r:id="rId2"/>
  </p:sldIdLst>
</p:presentation>"#;

        assert_eq!(slide_id_list(xml).unwrap(), vec!["rId7", "rId2"]);
    }
}
