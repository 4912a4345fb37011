//! Page text decomposition into blocks, lines and spans.
//!
//! A block is one `BT … ET` text object. Lines break on positioning
//! operators that move down the page. A span is a run of text-showing
//! operators on one line in a single font and size.

use lopdf::content::Operation;
use lopdf::Object;

/// Displacement in a `TJ` array (thousandths of text space) below which the
/// gap is read as a word break.
const WORD_GAP: f32 = -250.0;

/// Vertical movement smaller than this does not start a new line.
const LINE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub spans: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

/// Split a page's content operations into text blocks.
///
/// `decode` turns the raw bytes of a shown string into text, given the
/// resource name of the current font.
pub fn segment<F>(operations: &[Operation], decode: F) -> Vec<TextBlock>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut segmenter = Segmenter::new(decode);
    for op in operations {
        segmenter.apply(op);
    }
    segmenter.finish()
}

struct Segmenter<F> {
    decode: F,
    blocks: Vec<TextBlock>,
    lines: Vec<TextLine>,
    spans: Vec<String>,
    span: Option<String>,
    span_font: Option<(Vec<u8>, f32)>,
    font: Vec<u8>,
    size: f32,
    line_y: f32,
    in_block: bool,
}

impl<F> Segmenter<F>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    fn new(decode: F) -> Self {
        Self {
            decode,
            blocks: Vec::new(),
            lines: Vec::new(),
            spans: Vec::new(),
            span: None,
            span_font: None,
            font: Vec::new(),
            size: 0.0,
            line_y: 0.0,
            in_block: false,
        }
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => self.begin_block(),
            "ET" => {
                self.end_block();
                self.in_block = false;
            }
            "Tf" => {
                if let Some(name) = operands.first().and_then(|o| o.as_name().ok()) {
                    self.font = name.to_vec();
                }
                if let Some(size) = operands.get(1).and_then(number) {
                    self.size = size;
                }
            }
            "Td" | "TD" => {
                let ty = operands.get(1).and_then(number).unwrap_or(0.0);
                if ty.abs() > LINE_EPSILON {
                    self.line_y += ty;
                    self.flush_line();
                } else {
                    self.flush_span();
                }
            }
            "Tm" => {
                let y = operands.get(5).and_then(number).unwrap_or(self.line_y);
                if (y - self.line_y).abs() > LINE_EPSILON {
                    self.flush_line();
                } else {
                    self.flush_span();
                }
                self.line_y = y;
            }
            "T*" => self.flush_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = (self.decode)(&self.font, bytes);
                    self.show(text);
                }
            }
            "'" => {
                self.flush_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = (self.decode)(&self.font, bytes);
                    self.show(text);
                }
            }
            "\"" => {
                self.flush_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    let text = (self.decode)(&self.font, bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text = self.decode_array(items);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    fn decode_array(&self, items: &[Object]) -> String {
        let mut text = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => text.push_str(&(self.decode)(&self.font, bytes)),
                other => {
                    if let Some(offset) = number(other) {
                        if offset < WORD_GAP && !text.ends_with(' ') {
                            text.push(' ');
                        }
                    }
                }
            }
        }
        text
    }

    fn show(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if !self.in_block {
            self.begin_block();
        }

        let key = (self.font.clone(), self.size);
        if self.span_font.as_ref() == Some(&key) {
            if let Some(span) = self.span.as_mut() {
                span.push_str(&text);
                return;
            }
        }

        self.flush_span();
        self.span = Some(text);
        self.span_font = Some(key);
    }

    fn begin_block(&mut self) {
        if self.in_block {
            self.end_block();
        }
        self.in_block = true;
        self.line_y = 0.0;
    }

    fn end_block(&mut self) {
        self.flush_line();
        if !self.lines.is_empty() {
            self.blocks.push(TextBlock {
                lines: std::mem::take(&mut self.lines),
            });
        }
    }

    fn flush_span(&mut self) {
        if let Some(span) = self.span.take() {
            self.spans.push(span);
        }
        self.span_font = None;
    }

    fn flush_line(&mut self) {
        self.flush_span();
        if !self.spans.is_empty() {
            self.lines.push(TextLine {
                spans: std::mem::take(&mut self.spans),
            });
        }
    }

    fn finish(mut self) -> Vec<TextBlock> {
        self.end_block();
        self.blocks
    }
}

/// Read a numeric operand.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Decoding used when the font's encoding is unknown: UTF-16BE with a byte
/// order mark, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}
