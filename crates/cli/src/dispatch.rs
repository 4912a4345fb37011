//! Format dispatch and run orchestration.

use slidex_core::{
    save_json, Error, Extraction, Extractor, ImageFailure, OutputDir, PresentationRecord, Result,
    SourceFormat,
};
use slidex_pdf::PdfExtractor;
use slidex_pptx::PptxExtractor;
use std::path::{Path, PathBuf};

/// What to extract and where to put it.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// The slide deck or page document to read.
    pub input: PathBuf,

    /// Directory that receives `<stem>_output/`. Defaults to the working
    /// directory.
    pub output_root: Option<PathBuf>,
}

impl ExtractConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_root: None,
        }
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(root.into());
        self
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct ExtractionReport {
    pub output_dir: PathBuf,
    pub json_path: PathBuf,
    pub record: PresentationRecord,
    pub failures: Vec<ImageFailure>,
}

/// Pick the extractor for a format.
fn extractor_for(format: SourceFormat) -> Box<dyn Extractor> {
    match format {
        SourceFormat::Pptx => Box::new(PptxExtractor::new()),
        SourceFormat::Pdf => Box::new(PdfExtractor::new()),
    }
}

/// Extract one file into its output directory and save the JSON record.
///
/// Format and input checks happen before anything is created on disk.
pub fn run(config: &ExtractConfig) -> Result<ExtractionReport> {
    let input = config.input.as_path();
    let format = SourceFormat::from_path(input)?;
    check_input(input)?;

    let root = config
        .output_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let output = OutputDir::for_input(input, &root);
    output.create()?;

    log::debug!("Extracting {} as {:?}", input.display(), format);
    let Extraction { record, failures } = extractor_for(format).extract(input, &output)?;

    let json_path = output.json_path();
    save_json(&record, &json_path)?;

    log::info!(
        "Saved {} slides to {} ({} images skipped)",
        record.slides.len(),
        output.path().display(),
        failures.len()
    );

    Ok(ExtractionReport {
        output_dir: output.path().to_path_buf(),
        json_path,
        record,
        failures,
    })
}

fn check_input(input: &Path) -> Result<()> {
    let metadata = std::fs::metadata(input).map_err(|e| Error::fs(input, e))?;
    if !metadata.is_file() {
        return Err(Error::fs(
            input,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    Ok(())
}
