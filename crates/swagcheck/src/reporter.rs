//! Run results and their JSON export.

use crate::result::SwagResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    /// Scenario ran to completion
    Passed,
    /// Scenario body failed or panicked
    Failed,
    /// Scenario was not run
    Skipped,
    /// Harness could not set up the session
    FixtureSetupFailed,
}

impl TestStatus {
    /// Label used in result lines
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::FixtureSetupFailed => "FIXTURE_SETUP_FAILED",
        }
    }

    /// Counts as a failure of the run
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::FixtureSetupFailed)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Scenario id
    pub id: String,
    /// Scenario name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Wall-clock duration
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    /// Error or panic message on failure
    pub error: Option<String>,
    /// Screens visited, as `From --action--> To`
    pub trail: Vec<String>,
    /// Failure screenshot, when one was saved
    pub screenshot: Option<PathBuf>,
}

impl CaseResult {
    /// Result with no error, trail or screenshot
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: TestStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            duration: Duration::ZERO,
            error: None,
            trail: Vec::new(),
            screenshot: None,
        }
    }

    /// A scenario left out of the run
    #[must_use]
    pub fn skipped(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, TestStatus::Skipped)
    }
}

/// Results of a whole run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Environment the run targeted
    pub env: String,
    /// Backend that drove the run
    pub driver: String,
    /// Per-scenario results in execution order
    pub results: Vec<CaseResult>,
}

impl RunSummary {
    /// Empty summary
    #[must_use]
    pub fn new(env: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            driver: driver.into(),
            results: Vec::new(),
        }
    }

    /// Append a result
    pub fn record(&mut self, result: CaseResult) {
        self.results.push(result);
    }

    /// Passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|s| *s == TestStatus::Passed)
    }

    /// Failed scenarios, setup failures included
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(TestStatus::is_failure)
    }

    /// Skipped scenarios
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| *s == TestStatus::Skipped)
    }

    fn count(&self, pred: impl Fn(&TestStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }

    /// Sum of scenario durations
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// No scenario failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Results that failed
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.status.is_failure())
    }

    /// Serialise as pretty JSON
    pub fn to_json(&self) -> SwagResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `report_<timestamp>.json` into `dir` and return its path
    pub fn write_json(&self, dir: &Path) -> SwagResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("report_{}.json", crate::fixture::timestamp()));
        std::fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), "run report written");
        Ok(path)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped in {:.2}s",
            self.passed(),
            self.failed(),
            self.skipped(),
            self.total_duration().as_secs_f64()
        )
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn case(id: &str, status: TestStatus, ms: u64) -> CaseResult {
        CaseResult {
            duration: Duration::from_millis(ms),
            ..CaseResult::new(id, id.to_lowercase(), status)
        }
    }

    fn summary() -> RunSummary {
        let mut run = RunSummary::new("stage", "simulator");
        run.record(case("AUTH-001", TestStatus::Passed, 1500));
        run.record(case("AUTH-002", TestStatus::Failed, 500));
        run.record(case("E2E-001", TestStatus::FixtureSetupFailed, 0));
        run.record(CaseResult::skipped("E2E-003", "skipped"));
        run
    }

    #[test]
    fn test_counts() {
        let run = summary();
        assert_eq!(run.passed(), 1);
        assert_eq!(run.failed(), 2);
        assert_eq!(run.skipped(), 1);
        assert!(!run.all_passed());
        assert_eq!(run.total_duration(), Duration::from_secs(2));
        assert_eq!(run.to_string(), "1 passed, 2 failed, 1 skipped in 2.00s");
        let ids: Vec<&str> = run.failures().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["AUTH-002", "E2E-001"]);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TestStatus::FixtureSetupFailed.to_string(), "FIXTURE_SETUP_FAILED");
        let json = serde_json::to_string(&TestStatus::FixtureSetupFailed).unwrap();
        assert_eq!(json, "\"FIXTURE_SETUP_FAILED\"");
    }

    #[test]
    fn test_json_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = summary().write_json(dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: RunSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(back.results.len(), 4);
        assert_eq!(back.results[0].duration, Duration::from_millis(1500));
        assert_eq!(back.env, "stage");
    }
}
