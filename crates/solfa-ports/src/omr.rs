use serde::{Deserialize, Serialize};
use std::path::Path;

/// Exit status reported by an OMR engine run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Raw process exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl EngineStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum OmrError {
    #[error("failed to launch engine: {0}")]
    Launch(String),
    #[error("io error: {0}")]
    Io(String),
}

/// An external OMR engine invoked against one input document.
///
/// Implementations block until the engine exits and report only the exit
/// status; locating and judging the produced artifacts is the caller's job.
pub trait OmrEngine: Send + Sync {
    fn convert(&self, input: &Path, output_dir: &Path) -> Result<EngineStatus, OmrError>;
}
