use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Stage {
    Engine,
    Unarchive,
    Verify,
    Cleanup,
    StripHarmony,
}

/// How a stage ended. `Degraded` stages log their problem and let the
/// pipeline keep going; verification is the real failure detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StageStatus {
    Completed,
    Degraded,
    Skipped,
}

#[derive(Clone, Debug, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    pub detail: Option<String>,
}

impl StageReport {
    pub fn completed(stage: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Completed,
            detail: None,
        }
    }

    pub fn degraded(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Degraded,
            detail: Some(detail.into()),
        }
    }

    pub fn skipped(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped,
            detail: Some(detail.into()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    /// True when the output directory held MusicXML after cleanup.
    pub succeeded: bool,
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }
}
