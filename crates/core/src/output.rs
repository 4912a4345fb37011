//! Output directory layout.
//!
//! Every run writes into `<root>/<input stem>_output/`: one file per
//! extracted image plus `presentation_data.json`.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix appended to the input stem to name the output directory.
pub const OUTPUT_DIR_SUFFIX: &str = "_output";

/// Name of the serialized record inside the output directory.
pub const RECORD_FILENAME: &str = "presentation_data.json";

/// The directory that receives everything extracted from one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Use an explicit directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The output directory for `input`, placed under `root`.
    pub fn for_input(input: &Path, root: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "presentation".to_string());

        Self::new(root.join(format!("{}{}", stem, OUTPUT_DIR_SUFFIX)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the JSON record goes.
    pub fn json_path(&self) -> PathBuf {
        self.path.join(RECORD_FILENAME)
    }

    /// Create the directory (and parents). Succeeds if it already exists.
    pub fn create(&self) -> Result<()> {
        std::fs::create_dir_all(&self.path).map_err(|e| Error::fs(&self.path, e))
    }

    /// Write one image file, replacing any previous file of the same name.
    ///
    /// Failures come back as [`Error::ImageExtraction`] so callers can skip
    /// the image and keep going.
    pub fn write_image(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path.join(filename);
        let mut file = File::create(&path).map_err(|e| Error::image(filename, e))?;
        file.write_all(bytes).map_err(|e| Error::image(filename, e))?;
        log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// The input's file name including its extension, used as a fallback title.
pub fn base_filename(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}
