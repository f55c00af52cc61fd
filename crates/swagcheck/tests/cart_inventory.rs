//! Cart, listing, detail and menu scenarios against the simulated storefront.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{assert_passed, run_filtered, run_scenario};

#[tokio::test(start_paused = true)]
async fn test_cart_survives_relogin() {
    let result = run_scenario("CART-PERSIST-001").await;
    assert_passed(&result);
    assert!(result.trail.iter().any(|hop| hop.ends_with("--logout--> Login")));
}

#[tokio::test(start_paused = true)]
async fn test_add_and_remove_from_listing() {
    let result = run_scenario("E2E-003").await;
    assert_passed(&result);
    assert_eq!(result.trail, ["Login --submit--> Inventory"]);
}

#[tokio::test(start_paused = true)]
async fn test_sorting() {
    let summary = run_filtered("INV-SORT").await;
    assert_eq!(summary.results.len(), 2);
    assert!(summary.all_passed(), "{summary}: {:#?}", summary.failures().collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_detail_round_trip() {
    let result = run_scenario("DETAIL-001").await;
    assert_passed(&result);
    assert_eq!(
        result.trail,
        [
            "Login --submit--> Inventory",
            "Inventory --open_detail--> ProductDetail",
            "ProductDetail --back_to_products--> Inventory",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_menu_reset() {
    assert_passed(&run_scenario("MENU-RESET-001").await);
}
