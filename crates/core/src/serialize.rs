//! JSON serialization of the extracted record.

use crate::error::{Error, Result};
use crate::types::PresentationRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const INDENT: &[u8] = b"    ";

/// Encode a record as indented JSON. Non-ASCII text is kept as-is.
pub fn to_json_string(record: &PresentationRecord) -> Result<String> {
    let mut buf = Vec::new();
    write_json(record, &mut buf)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a record to `path`, replacing any existing file.
pub fn save_json(record: &PresentationRecord, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::fs(path, e))?;
    let mut writer = BufWriter::new(file);
    write_json(record, &mut writer)?;
    writer.flush().map_err(|e| Error::fs(path, e))?;
    log::debug!("Saved record to {}", path.display());
    Ok(())
}

fn write_json<W: Write>(record: &PresentationRecord, writer: W) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    record.serialize(&mut ser)?;
    Ok(())
}
