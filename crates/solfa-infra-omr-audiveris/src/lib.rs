use solfa_ports::{EngineStatus, OmrEngine, OmrError};
use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::info;

/// Name of the log file the adapter writes into the output directory.
pub const ENGINE_LOG_NAME: &str = "audiveris.log";

pub struct AudiverisEngine {
    engine_path: Option<String>,
}

impl AudiverisEngine {
    pub fn new(engine_path: Option<String>) -> Self {
        Self { engine_path }
    }

    fn resolved_engine(&self) -> String {
        let engine = self
            .engine_path
            .clone()
            .unwrap_or_else(|| "audiveris".to_string());
        Self::normalize_engine_path(&engine)
    }

    fn normalize_engine_path(engine: &str) -> String {
        let engine = engine.trim();
        let path = Path::new(engine);
        let ext_is_app = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("app"));

        if ext_is_app {
            let candidate = path.join("Contents").join("MacOS").join("Audiveris");
            if candidate.exists() {
                return candidate.to_string_lossy().into_owned();
            }
        }

        engine.to_string()
    }
}

impl OmrEngine for AudiverisEngine {
    fn convert(&self, input: &Path, output_dir: &Path) -> Result<EngineStatus, OmrError> {
        fs::create_dir_all(output_dir).map_err(|e| OmrError::Io(e.to_string()))?;

        let log_path = output_dir.join(ENGINE_LOG_NAME);
        let log_file = File::create(&log_path).map_err(|e| OmrError::Io(e.to_string()))?;
        let log_file_err = log_file
            .try_clone()
            .map_err(|e| OmrError::Io(e.to_string()))?;

        let engine = self.resolved_engine();
        info!("Running {} on {}", engine, input.display());

        let status = Command::new(&engine)
            .arg("-batch")
            .arg("-export")
            .arg("-output")
            .arg(output_dir)
            .arg(input)
            // Avoid deadlocking on large Audiveris output by redirecting directly to a log file.
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(log_file_err))
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OmrError::Launch(format!(
                        "{} not found; install Audiveris or pass its path",
                        engine
                    ))
                } else {
                    OmrError::Launch(e.to_string())
                }
            })?;

        Ok(EngineStatus {
            code: status.code(),
        })
    }
}
