use crate::report::{PipelineReport, Stage, StageReport, StageStatus};
use solfa_domain_musicxml::{mxl, strip};
use solfa_ports::OmrEngine;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const MARKUP_EXTENSION: &str = "xml";
pub const ARCHIVE_EXTENSION: &str = "mxl";
pub const PROJECT_EXTENSION: &str = "omr";
pub const METADATA_DIR: &str = "META-INF";

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("invalid input path: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Converts one scanned score PDF into a cleaned-up MusicXML file by
/// driving an external OMR engine and post-processing its output
/// directory.
///
/// The stage methods are independently callable and re-read the
/// filesystem, but [`run`](Self::run) owns the intended order: engine,
/// unarchive, verify, cleanup, harmony strip.
pub struct ConversionPipeline {
    input_pdf: PathBuf,
    output_dir: PathBuf,
    engine: Box<dyn OmrEngine>,
}

impl ConversionPipeline {
    pub fn new(
        engine: Box<dyn OmrEngine>,
        input_pdf: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_pdf: input_pdf.into(),
            output_dir: output_dir.into(),
            engine,
        }
    }

    /// Execute the full stage sequence and collect the per-stage outcomes.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let mut stages = Vec::with_capacity(5);

        stages.push(self.run_engine());
        stages.push(self.unarchive()?);

        let present = self.musicxml_present()?;
        stages.push(if present {
            StageReport::completed(Stage::Verify)
        } else {
            StageReport::degraded(Stage::Verify, "no musicxml in output directory")
        });

        let cleanup = self.cleanup()?;
        let succeeded = cleanup.status == StageStatus::Completed;
        stages.push(cleanup);

        stages.push(self.strip_harmony()?);

        Ok(PipelineReport { succeeded, stages })
    }

    /// Run the OMR engine against the input document. Engine failure is
    /// tolerated: it degrades the stage and later verification reports the
    /// overall outcome.
    pub fn run_engine(&self) -> StageReport {
        match self.engine.convert(&self.input_pdf, &self.output_dir) {
            Ok(status) if status.success() => {
                info!("OMR engine completed for {}", self.input_pdf.display());
                StageReport::completed(Stage::Engine)
            }
            Ok(status) => {
                let code = status
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "?".to_string());
                warn!("OMR engine failed (exit code: {})", code);
                StageReport::degraded(Stage::Engine, format!("engine exit code {}", code))
            }
            Err(err) => {
                warn!("OMR engine did not run: {}", err);
                StageReport::degraded(Stage::Engine, err.to_string())
            }
        }
    }

    /// Decompress every archive artifact directly inside the output
    /// directory, in place. A failing archive is logged and skipped.
    pub fn unarchive(&self) -> Result<StageReport, PipelineError> {
        if !self.output_dir.is_dir() {
            info!(
                "No output directory at {}, nothing to unarchive",
                self.output_dir.display()
            );
            return Ok(StageReport::skipped(
                Stage::Unarchive,
                "output directory missing",
            ));
        }

        let mut failures = Vec::new();
        for path in self.files_with_extension(ARCHIVE_EXTENSION)? {
            match mxl::extract_archive(&path, &self.output_dir) {
                Ok(written) => {
                    info!("Unpacked {} ({} entries)", path.display(), written.len());
                }
                Err(err) => {
                    warn!("Failed to unpack {}: {}", path.display(), err);
                    failures.push(format!("{}: {}", path.display(), err));
                }
            }
        }

        if failures.is_empty() {
            Ok(StageReport::completed(Stage::Unarchive))
        } else {
            Ok(StageReport::degraded(Stage::Unarchive, failures.join("; ")))
        }
    }

    /// True iff the output directory directly contains at least one markup
    /// file. Non-recursive, no side effects.
    pub fn musicxml_present(&self) -> Result<bool, PipelineError> {
        if !self.output_dir.is_dir() {
            return Ok(false);
        }
        Ok(!self.files_with_extension(MARKUP_EXTENSION)?.is_empty())
    }

    /// Delete intermediate artifacts and report the terminal outcome. The
    /// engine log and the markup file(s) are the only survivors on
    /// success. Filesystem errors here propagate: prior stages are assumed
    /// to have established the directory.
    pub fn cleanup(&self) -> Result<StageReport, PipelineError> {
        for extension in [ARCHIVE_EXTENSION, PROJECT_EXTENSION] {
            for path in self.files_with_extension(extension)? {
                info!("Deleting {}", path.display());
                fs::remove_file(&path).map_err(|e| PipelineError::Io(e.to_string()))?;
            }
        }

        let metadata_dir = self.output_dir.join(METADATA_DIR);
        if metadata_dir.is_dir() {
            info!("Deleting {} directory", metadata_dir.display());
            fs::remove_dir_all(&metadata_dir).map_err(|e| PipelineError::Io(e.to_string()))?;
        }

        if self.musicxml_present()? {
            info!("OMR succeeded: {}", self.output_dir.display());
            Ok(StageReport::completed(Stage::Cleanup))
        } else {
            warn!(
                "OMR failed: no MusicXML in {}, check the engine log",
                self.output_dir.display()
            );
            Ok(StageReport::degraded(Stage::Cleanup, "no musicxml produced"))
        }
    }

    /// Strip `<harmony>` chord symbols from the markup file matching the
    /// input's stem and rewrite it in place, indented with an XML
    /// declaration. A missing or unparseable file is an expected outcome
    /// of upstream failure, not an error.
    pub fn strip_harmony(&self) -> Result<StageReport, PipelineError> {
        let target = self.markup_path()?;
        if !target.exists() {
            info!("File not found: {}", target.display());
            return Ok(StageReport::skipped(
                Stage::StripHarmony,
                "markup file not found",
            ));
        }

        let xml = fs::read_to_string(&target).map_err(|e| PipelineError::Io(e.to_string()))?;
        match strip::strip_harmony(&xml) {
            Ok(result) => {
                fs::write(&target, result.xml).map_err(|e| PipelineError::Io(e.to_string()))?;
                info!(
                    "Stripped {} harmony element(s) from {}",
                    result.removed,
                    target.display()
                );
                Ok(StageReport {
                    stage: Stage::StripHarmony,
                    status: StageStatus::Completed,
                    detail: Some(format!("removed {}", result.removed)),
                })
            }
            Err(strip::StripError::Parse(err)) => {
                warn!("Failed to parse {}: {}", target.display(), err);
                Ok(StageReport::degraded(
                    Stage::StripHarmony,
                    format!("parse error: {}", err),
                ))
            }
        }
    }

    /// Expected markup file: `<input stem>.xml` in the output directory.
    fn markup_path(&self) -> Result<PathBuf, PipelineError> {
        let stem = self
            .input_pdf
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                PipelineError::InvalidInput(format!(
                    "cannot derive a file stem from {}",
                    self.input_pdf.display()
                ))
            })?;
        Ok(self.output_dir.join(format!("{}.{}", stem, MARKUP_EXTENSION)))
    }

    fn files_with_extension(&self, extension: &str) -> Result<Vec<PathBuf>, PipelineError> {
        let entries =
            fs::read_dir(&self.output_dir).map_err(|e| PipelineError::Io(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PipelineError::Io(e.to_string()))?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, extension) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
