//! Authentication scenarios against the simulated storefront.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{assert_passed, run_filtered, run_scenario};

#[tokio::test(start_paused = true)]
async fn test_standard_user_reaches_inventory() {
    let result = run_scenario("AUTH-001").await;
    assert_passed(&result);
    assert_eq!(result.trail, ["Login --submit--> Inventory"]);
}

#[tokio::test(start_paused = true)]
async fn test_glitch_user_login_waits_for_inventory() {
    assert_passed(&run_scenario("AUTH-003").await);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_logins_stay_on_login_page() {
    for id in ["AUTH-004", "AUTH-005", "AUTH-006", "AUTH-007", "AUTH-008", "AUTH-009"] {
        let result = run_scenario(id).await;
        assert_passed(&result);
        assert_eq!(result.trail, ["Login --submit--> Login"], "{id}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_protected_page_redirects_to_login() {
    let result = run_scenario("AUTH-010").await;
    assert_passed(&result);
    assert_eq!(result.trail, ["Login --visit--> Login"]);
}

#[tokio::test(start_paused = true)]
async fn test_whole_auth_group_passes() {
    let summary = run_filtered("AUTH-").await;
    assert_eq!(summary.results.len(), 11);
    assert!(summary.all_passed(), "{summary}: {:#?}", summary.failures().collect::<Vec<_>>());
    assert_eq!(summary.driver, "simulator");
}
