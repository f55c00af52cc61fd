//! Shared helpers for the simulated-storefront integration tests.

#![allow(dead_code)]

use swagcheck::{scenarios, CaseResult, Harness, RunSummary, SimOptions, TestStatus};
use tempfile::TempDir;

/// Harness over the default simulator, writing artifacts into a temp dir
pub fn harness() -> (Harness, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    (Harness::simulated(SimOptions::default(), dir.path()), dir)
}

/// Run one catalogued scenario in a fresh session
pub async fn run_scenario(id: &str) -> CaseResult {
    let scenario = scenarios::by_id(id).unwrap_or_else(|| panic!("no scenario {id}"));
    let (harness, _dir) = harness();
    scenario.run(&harness).await
}

/// Run every scenario whose id or name contains `filter`
pub async fn run_filtered(filter: &str) -> RunSummary {
    let (harness, _dir) = harness();
    scenarios::run_all(&harness, scenarios::select(Some(filter))).await
}

/// Fail with the scenario error and trail when it did not pass
pub fn assert_passed(result: &CaseResult) {
    assert_eq!(
        result.status,
        TestStatus::Passed,
        "{} failed: {:?}\ntrail: {:#?}",
        result.id,
        result.error,
        result.trail
    );
    assert!(result.screenshot.is_none());
}
