//! Image XObjects: listing the images a page uses and turning each one into
//! a standalone file.
//!
//! JPEG, JPEG 2000 and JBIG2 streams are written as stored. Everything else
//! is raw pixel data and gets re-encoded as PNG.

use flate2::read::ZlibDecoder;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashSet;
use std::io::{Cursor, Read};
use thiserror::Error;

/// Upper bound when following `Parent` links or nested references.
const MAX_DEPTH: usize = 32;

/// Why an image could not be turned into a file.
#[derive(Error, Debug)]
pub enum ImageDecodeError {
    #[error("not an image stream: {0}")]
    NotAnImage(String),

    #[error("unsupported filter {0}")]
    UnsupportedFilter(String),

    #[error("unsupported color space {0}")]
    UnsupportedColorSpace(String),

    #[error("unsupported bits per component: {0}")]
    UnsupportedDepth(i64),

    #[error("missing or invalid /{0}")]
    MissingKey(&'static str),

    #[error("image dimensions {width}x{height} are too large")]
    TooLarge { width: usize, height: usize },

    #[error("pixel data truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("decompression failed: {0}")]
    Decompress(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

type DecodeResult<T> = std::result::Result<T, ImageDecodeError>;

/// Image bytes ready to be written, with the extension matching them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub ext: &'static str,
}

/// The image XObjects used by a page, deduplicated by object reference.
///
/// Images of the page's resources come first, in dictionary order, then
/// those of any form XObjects the page uses.
pub fn page_images(doc: &Document, page_id: ObjectId) -> Vec<ObjectId> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    let mut forms = HashSet::new();

    if let Some(resources) = page_resources(doc, page_id) {
        collect_images(doc, resources, &mut seen, &mut forms, &mut found);
    }

    found
}

/// The page's `/Resources`, inherited from the page tree when absent.
fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            return resolve_dict(doc, resources);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }

    None
}

fn collect_images(
    doc: &Document,
    resources: &Dictionary,
    seen: &mut HashSet<ObjectId>,
    forms: &mut HashSet<ObjectId>,
    found: &mut Vec<ObjectId>,
) {
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve_dict(doc, o))
    else {
        return;
    };

    let mut nested = Vec::new();

    for (_, obj) in xobjects.iter() {
        let Ok(id) = obj.as_reference() else {
            continue;
        };
        let Ok(Object::Stream(stream)) = doc.get_object(id) else {
            continue;
        };

        match name(&stream.dict, b"Subtype") {
            Some(b"Image") => {
                if seen.insert(id) {
                    found.push(id);
                }
            }
            Some(b"Form") => {
                if forms.insert(id) {
                    nested.push(stream);
                }
            }
            _ => {}
        }
    }

    for form in nested {
        if let Some(form_resources) = form
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve_dict(doc, o))
        {
            collect_images(doc, form_resources, seen, forms, found);
        }
    }
}

/// Turn one image XObject into file bytes.
pub fn decode_image(doc: &Document, id: ObjectId) -> DecodeResult<DecodedImage> {
    let stream = doc
        .get_object(id)
        .and_then(|o| o.as_stream())
        .map_err(|e| ImageDecodeError::NotAnImage(e.to_string()))?;

    let filters = filter_names(doc, &stream.dict);
    let (last, preceding) = match filters.split_last() {
        Some((last, preceding)) => (Some(last.as_slice()), preceding),
        None => (None, &[][..]),
    };

    match last {
        Some(b"DCTDecode") | Some(b"DCT") => stored(stream, preceding, "jpeg"),
        Some(b"JPXDecode") => stored(stream, preceding, "jpx"),
        Some(b"JBIG2Decode") => stored(stream, preceding, "jb2"),
        Some(b"CCITTFaxDecode") | Some(b"CCF") => Err(ImageDecodeError::UnsupportedFilter(
            "CCITTFaxDecode".to_string(),
        )),
        _ => {
            let raw = if filters.is_empty() {
                stream.content.clone()
            } else {
                stream
                    .decompressed_content()
                    .map_err(|e| ImageDecodeError::Decompress(e.to_string()))?
            };
            Ok(DecodedImage {
                data: encode_png(doc, &stream.dict, &raw)?,
                ext: "png",
            })
        }
    }
}

/// An encoded image stream, with any outer Flate layers removed.
fn stored(stream: &Stream, preceding: &[Vec<u8>], ext: &'static str) -> DecodeResult<DecodedImage> {
    let mut data = stream.content.clone();

    for filter in preceding.iter().rev() {
        match filter.as_slice() {
            b"FlateDecode" | b"Fl" => {
                let mut inflated = Vec::new();
                ZlibDecoder::new(data.as_slice())
                    .read_to_end(&mut inflated)
                    .map_err(|e| ImageDecodeError::Decompress(e.to_string()))?;
                data = inflated;
            }
            other => {
                return Err(ImageDecodeError::UnsupportedFilter(
                    String::from_utf8_lossy(other).into_owned(),
                ));
            }
        }
    }

    Ok(DecodedImage { data, ext })
}

/// Color model of raw image samples.
#[derive(Debug, Clone, PartialEq)]
enum ColorModel {
    Gray,
    Rgb,
    Cmyk,
    Indexed { base: Box<ColorModel>, palette: Vec<u8> },
}

impl ColorModel {
    fn components(&self) -> usize {
        match self {
            ColorModel::Gray | ColorModel::Indexed { .. } => 1,
            ColorModel::Rgb => 3,
            ColorModel::Cmyk => 4,
        }
    }
}

fn encode_png(doc: &Document, dict: &Dictionary, raw: &[u8]) -> DecodeResult<Vec<u8>> {
    let width = positive(dict, b"Width", "Width")?;
    let height = positive(dict, b"Height", "Height")?;

    let is_mask = matches!(dict.get(b"ImageMask"), Ok(Object::Boolean(true)));
    let (model, bpc) = if is_mask {
        (ColorModel::Gray, 1)
    } else {
        let cs = dict
            .get(b"ColorSpace")
            .map_err(|_| ImageDecodeError::MissingKey("ColorSpace"))?;
        let bpc = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);
        (color_model(doc, cs, 0)?, bpc)
    };

    let samples = unpack_samples(raw, width, height, model.components(), bpc)?;
    let image = match model {
        ColorModel::Indexed { base, palette } => expand_palette(&base, &palette, &samples)?,
        other => {
            let scaled = scale_samples(samples, bpc);
            to_dynamic(&other, scaled)?
        }
    };

    let image = finish_buffer(image, width, height)?;
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}

/// Pixel buffer in either gray or RGB, before dimensions are attached.
enum Pixels {
    Gray(Vec<u8>),
    Rgb(Vec<u8>),
}

fn to_dynamic(model: &ColorModel, samples: Vec<u8>) -> DecodeResult<Pixels> {
    match model {
        ColorModel::Gray => Ok(Pixels::Gray(samples)),
        ColorModel::Rgb => Ok(Pixels::Rgb(samples)),
        ColorModel::Cmyk => Ok(Pixels::Rgb(cmyk_to_rgb(&samples))),
        ColorModel::Indexed { .. } => Err(ImageDecodeError::UnsupportedColorSpace(
            "nested Indexed".to_string(),
        )),
    }
}

fn expand_palette(base: &ColorModel, palette: &[u8], indices: &[u8]) -> DecodeResult<Pixels> {
    let n = base.components();
    let mut samples = Vec::with_capacity(indices.len() * n);

    for &index in indices {
        let start = index as usize * n;
        match palette.get(start..start + n) {
            Some(entry) => samples.extend_from_slice(entry),
            // out-of-range indices clamp to the last entry
            None => match palette.len().checked_sub(n).and_then(|s| palette.get(s..)) {
                Some(entry) => samples.extend_from_slice(entry),
                None => samples.extend(std::iter::repeat(0).take(n)),
            },
        }
    }

    to_dynamic(base, samples)
}

fn finish_buffer(pixels: Pixels, width: usize, height: usize) -> DecodeResult<DynamicImage> {
    let too_large = || ImageDecodeError::TooLarge { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;
    let image = match pixels {
        Pixels::Gray(data) => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        Pixels::Rgb(data) => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
    };
    image.ok_or(ImageDecodeError::MissingKey("Width"))
}

/// Split packed rows into one byte per sample. Samples deeper than 8 bits
/// keep their high byte; shallower samples keep their raw value.
fn unpack_samples(
    data: &[u8],
    width: usize,
    height: usize,
    components: usize,
    bpc: i64,
) -> DecodeResult<Vec<u8>> {
    let bits = match bpc {
        1 | 2 | 4 | 8 | 16 => bpc as usize,
        other => return Err(ImageDecodeError::UnsupportedDepth(other)),
    };
    let too_large = || ImageDecodeError::TooLarge { width, height };
    let per_row = width.checked_mul(components).ok_or_else(too_large)?;
    let row_bytes = per_row
        .checked_mul(bits)
        .and_then(|b| b.checked_add(7))
        .ok_or_else(too_large)?
        / 8;
    let expected = row_bytes.checked_mul(height).ok_or_else(too_large)?;
    let total = per_row.checked_mul(height).ok_or_else(too_large)?;
    if data.len() < expected {
        return Err(ImageDecodeError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let mut out = Vec::with_capacity(total);
    for row in data.chunks_exact(row_bytes).take(height) {
        match bits {
            8 => out.extend_from_slice(&row[..per_row]),
            16 => out.extend(row.chunks_exact(2).take(per_row).map(|c| c[0])),
            _ => {
                let mask = (1u8 << bits) - 1;
                for i in 0..per_row {
                    let bit = i * bits;
                    let shift = 8 - bits - (bit % 8);
                    out.push((row[bit / 8] >> shift) & mask);
                }
            }
        }
    }

    Ok(out)
}

/// Stretch sub-byte samples to the full 0-255 range.
fn scale_samples(mut samples: Vec<u8>, bpc: i64) -> Vec<u8> {
    let max = match bpc {
        1 => 1u16,
        2 => 3,
        4 => 15,
        _ => return samples,
    };
    for s in samples.iter_mut() {
        *s = (*s as u16 * 255 / max) as u8;
    }
    samples
}

fn cmyk_to_rgb(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks_exact(4)
        .flat_map(|px| {
            let k = 255 - px[3] as u16;
            [
                ((255 - px[0] as u16) * k / 255) as u8,
                ((255 - px[1] as u16) * k / 255) as u8,
                ((255 - px[2] as u16) * k / 255) as u8,
            ]
        })
        .collect()
}

fn color_model(doc: &Document, obj: &Object, depth: usize) -> DecodeResult<ColorModel> {
    if depth > 2 {
        return Err(ImageDecodeError::UnsupportedColorSpace(
            "nested too deeply".to_string(),
        ));
    }

    match deref(doc, obj)? {
        Object::Name(family) => match family.as_slice() {
            b"DeviceGray" | b"CalGray" | b"G" => Ok(ColorModel::Gray),
            b"DeviceRGB" | b"CalRGB" | b"RGB" => Ok(ColorModel::Rgb),
            b"DeviceCMYK" | b"CMYK" => Ok(ColorModel::Cmyk),
            other => Err(ImageDecodeError::UnsupportedColorSpace(
                String::from_utf8_lossy(other).into_owned(),
            )),
        },
        Object::Array(parts) => {
            let family = parts
                .first()
                .and_then(|o| o.as_name().ok())
                .ok_or(ImageDecodeError::MissingKey("ColorSpace"))?;

            match family {
                b"CalGray" => Ok(ColorModel::Gray),
                b"CalRGB" => Ok(ColorModel::Rgb),
                b"ICCBased" => {
                    let profile = parts
                        .get(1)
                        .ok_or(ImageDecodeError::MissingKey("ColorSpace"))
                        .and_then(|o| deref(doc, o))?
                        .as_stream()
                        .map_err(|_| ImageDecodeError::MissingKey("ColorSpace"))?;
                    match profile.dict.get(b"N").ok().and_then(|n| n.as_i64().ok()) {
                        Some(1) => Ok(ColorModel::Gray),
                        Some(3) => Ok(ColorModel::Rgb),
                        Some(4) => Ok(ColorModel::Cmyk),
                        _ => match profile.dict.get(b"Alternate") {
                            Ok(alternate) => color_model(doc, alternate, depth + 1),
                            Err(_) => Err(ImageDecodeError::MissingKey("N")),
                        },
                    }
                }
                b"Indexed" | b"I" => {
                    let base = parts
                        .get(1)
                        .ok_or(ImageDecodeError::MissingKey("ColorSpace"))?;
                    let base = color_model(doc, base, depth + 1)?;
                    if matches!(base, ColorModel::Indexed { .. }) {
                        return Err(ImageDecodeError::UnsupportedColorSpace(
                            "nested Indexed".to_string(),
                        ));
                    }
                    let lookup = parts
                        .get(3)
                        .ok_or(ImageDecodeError::MissingKey("ColorSpace"))?;
                    let palette = match deref(doc, lookup)? {
                        Object::String(bytes, _) => bytes.clone(),
                        Object::Stream(s) => s
                            .decompressed_content()
                            .unwrap_or_else(|_| s.content.clone()),
                        _ => return Err(ImageDecodeError::MissingKey("ColorSpace")),
                    };
                    Ok(ColorModel::Indexed {
                        base: Box::new(base),
                        palette,
                    })
                }
                other => Err(ImageDecodeError::UnsupportedColorSpace(
                    String::from_utf8_lossy(other).into_owned(),
                )),
            }
        }
        _ => Err(ImageDecodeError::MissingKey("ColorSpace")),
    }
}

/// The `/Filter` chain of a stream, as names.
fn filter_names(doc: &Document, dict: &Dictionary) -> Vec<Vec<u8>> {
    let Ok(filter) = dict.get(b"Filter") else {
        return Vec::new();
    };

    match deref(doc, filter) {
        Ok(Object::Name(n)) => vec![n.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|o| deref(doc, o).ok()?.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

fn name<'a>(dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    dict.get(key).ok().and_then(|o| o.as_name().ok())
}

fn positive(dict: &Dictionary, key: &[u8], label: &'static str) -> DecodeResult<usize> {
    match dict.get(key).ok().and_then(|o| o.as_i64().ok()) {
        Some(v) if v > 0 => Ok(v as usize),
        _ => Err(ImageDecodeError::MissingKey(label)),
    }
}

fn deref<'a>(doc: &'a Document, obj: &'a Object) -> DecodeResult<&'a Object> {
    let mut current = obj;
    for _ in 0..MAX_DEPTH {
        match current {
            Object::Reference(id) => {
                current = doc
                    .get_object(*id)
                    .map_err(|e| ImageDecodeError::NotAnImage(e.to_string()))?;
            }
            other => return Ok(other),
        }
    }
    Err(ImageDecodeError::NotAnImage("reference cycle".to_string()))
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match deref(doc, obj).ok()? {
        Object::Dictionary(d) => Some(d),
        Object::Stream(s) => Some(&s.dict),
        _ => None,
    }
}
