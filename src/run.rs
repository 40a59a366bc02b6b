use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::artifact::ArtifactMeta;
use crate::error::Result;

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Finished,
    Failed,
}

/// One NDJSON line in the run log.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum RunEvent {
    RunStarted {
        run_id: Uuid,
        job_type: String,
        at: DateTime<Utc>,
        params: serde_json::Value,
    },
    ArtifactUsed {
        run_id: Uuid,
        name: String,
        version: u64,
        sha256: String,
        at: DateTime<Utc>,
    },
    ArtifactLogged {
        run_id: Uuid,
        name: String,
        version: u64,
        artifact_type: String,
        sha256: String,
        at: DateTime<Utc>,
    },
    RunFinished {
        run_id: Uuid,
        status: RunStatus,
        at: DateTime<Utc>,
        input_rows: Option<usize>,
        output_rows: Option<usize>,
    },
}

/// Explicit run-tracking handle passed through the step entry point.
///
/// Records the parameters and artifact activity of one invocation as NDJSON
/// lines appended to a daily-rotated log under the data root. Deliberately a
/// value, not ambient global state.
pub struct RunContext {
    run_id: Uuid,
    job_type: String,
    log_dir: PathBuf,
    started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn start(job_type: &str, log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)?;
        Ok(Self {
            run_id: Uuid::new_v4(),
            job_type: job_type.to_string(),
            log_dir: log_dir.to_path_buf(),
            started_at: Utc::now(),
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Record the parameters this run was invoked with.
    pub fn log_params(&self, params: &impl Serialize) -> Result<()> {
        self.append(&RunEvent::RunStarted {
            run_id: self.run_id,
            job_type: self.job_type.clone(),
            at: self.started_at,
            params: serde_json::to_value(params)?,
        })
    }

    pub fn record_artifact_used(&self, meta: &ArtifactMeta) -> Result<()> {
        self.append(&RunEvent::ArtifactUsed {
            run_id: self.run_id,
            name: meta.name.clone(),
            version: meta.version,
            sha256: meta.sha256.clone(),
            at: Utc::now(),
        })
    }

    pub fn record_artifact_logged(&self, meta: &ArtifactMeta) -> Result<()> {
        self.append(&RunEvent::ArtifactLogged {
            run_id: self.run_id,
            name: meta.name.clone(),
            version: meta.version,
            artifact_type: meta.artifact_type.clone(),
            sha256: meta.sha256.clone(),
            at: Utc::now(),
        })
    }

    pub fn finish(
        &self,
        status: RunStatus,
        input_rows: Option<usize>,
        output_rows: Option<usize>,
    ) -> Result<()> {
        self.append(&RunEvent::RunFinished {
            run_id: self.run_id,
            status,
            at: Utc::now(),
            input_rows,
            output_rows,
        })
    }

    /// Append one event to today's run log file.
    fn append(&self, event: &RunEvent) -> Result<()> {
        fs::create_dir_all(&self.log_dir)?;
        let date_str = Utc::now().format("%Y-%m-%d");
        let path = self.log_dir.join(format!("run_{}.ndjson", date_str));
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = serde_json::to_string(event)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn read_log_lines(log_dir: &Path) -> Vec<serde_json::Value> {
        let mut lines = Vec::new();
        for entry in fs::read_dir(log_dir).unwrap() {
            let contents = fs::read_to_string(entry.unwrap().path()).unwrap();
            for line in contents.lines() {
                lines.push(serde_json::from_str(line).unwrap());
            }
        }
        lines
    }

    #[test]
    fn records_run_lifecycle_as_ndjson() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("runs");

        let run = RunContext::start("basic_cleaning", &log_dir).unwrap();
        run.log_params(&json!({"min_price": 10, "max_price": 350}))
            .unwrap();
        run.finish(RunStatus::Finished, Some(10), Some(7)).unwrap();

        let lines = read_log_lines(&log_dir);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "run_started");
        assert_eq!(lines[0]["job_type"], "basic_cleaning");
        assert_eq!(lines[0]["params"]["min_price"], 10);
        assert_eq!(lines[1]["event"], "run_finished");
        assert_eq!(lines[1]["status"], "finished");
        assert_eq!(lines[1]["output_rows"], 7);
    }

    #[test]
    fn failed_runs_are_recorded() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("runs");

        let run = RunContext::start("basic_cleaning", &log_dir).unwrap();
        run.finish(RunStatus::Failed, None, None).unwrap();

        let lines = read_log_lines(&log_dir);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["status"], "failed");
        assert!(lines[0]["input_rows"].is_null());
    }
}
