//! Runs the catalogue against a real storefront.
//!
//! Needs a browser and network access, so it is ignored by default:
//!
//! ```bash
//! SWAG_CONFIG=config.json SWAG_ENV=stage SWAG_HEADLESS=true \
//!     cargo test -p swagcheck --features browser --test live -- --ignored
//! ```

#![cfg(feature = "browser")]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use swagcheck::config;
use swagcheck::{scenarios, DriverConfig, Harness, Launcher};

#[tokio::test]
#[ignore = "drives a real browser against the live storefront"]
async fn test_catalogue_against_live_storefront() {
    let settings = config::global_or_load().expect("settings").clone();
    settings.ensure_dirs().expect("output directories");
    let browser = config::browser_from_env().expect("browser");
    let launcher = Launcher::Browser(
        DriverConfig::new(browser).headless(config::headless_from_env()),
    );
    let harness = Harness::new(settings, launcher);
    let summary = scenarios::run_all(&harness, scenarios::select(None)).await;
    summary
        .write_json(&harness.settings().output_logs)
        .expect("report");
    assert!(summary.all_passed(), "{summary}");
}
