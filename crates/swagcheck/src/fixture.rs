//! Per-test session harness.
//!
//! Every scenario runs through [`Harness::run`], which owns the browser
//! lifecycle:
//!
//! 1. log the `STARTING` banner
//! 2. launch a driver, delete cookies, open the login page
//! 3. run the body, catching panics
//! 4. on failure, log the error with the navigation trail and save
//!    `FAIL_<name>_<timestamp>.png`
//! 5. close the session whatever happened
//! 6. log `RESULT: '<name>' is <STATUS>, Duration: <s>s`

use crate::config::Settings;
use crate::data::users;
use crate::driver::{self, DriverConfig, SharedDriver};
use crate::pages::{InventoryPage, LoginPage, Page};
use crate::reporter::{CaseResult, TestStatus};
use crate::result::{SwagError, SwagResult};
use crate::session::Session;
use crate::sim::{SimDriver, SimOptions};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const RULE: &str = "----------------------------------------------------------------------------------------------------";
const DOUBLE_RULE: &str = "====================================================================================================";

/// Local time as used in artifact names (`YYYYmmdd_HHMMSS`)
#[must_use]
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// How the harness obtains a driver for each test
#[derive(Debug, Clone)]
pub enum Launcher {
    /// A real browser
    Browser(DriverConfig),
    /// The in-process storefront
    Simulated(SimOptions),
}

impl Launcher {
    /// Start a fresh driver
    pub async fn launch(&self) -> SwagResult<SharedDriver> {
        match self {
            Self::Browser(config) => driver::launch(config).await,
            Self::Simulated(options) => Ok(Arc::new(SimDriver::new(*options))),
        }
    }

    /// Browser label for the environment banner
    #[must_use]
    pub fn browser_label(&self) -> String {
        match self {
            Self::Browser(config) => config.browser.to_string(),
            Self::Simulated(_) => "simulator".to_string(),
        }
    }

    const fn headless(&self) -> bool {
        match self {
            Self::Browser(config) => config.headless,
            Self::Simulated(_) => true,
        }
    }
}

/// Runs test bodies against fresh browser sessions
#[derive(Debug, Clone)]
pub struct Harness {
    settings: Settings,
    launcher: Launcher,
}

impl Harness {
    /// Create a harness.
    ///
    /// The simulator only answers on its own origin, so a simulated harness
    /// always targets [`SimDriver::BASE_URL`].
    #[must_use]
    pub fn new(mut settings: Settings, launcher: Launcher) -> Self {
        if matches!(launcher, Launcher::Simulated(_)) && settings.base_url != SimDriver::BASE_URL {
            SimDriver::BASE_URL.clone_into(&mut settings.base_url);
        }
        Self { settings, launcher }
    }

    /// Harness over the simulator with output under `root`
    #[must_use]
    pub fn simulated(options: SimOptions, root: &Path) -> Self {
        Self::new(
            Settings::new("sim", SimDriver::BASE_URL).with_output_root(root),
            Launcher::Simulated(options),
        )
    }

    /// Settings in effect
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Launcher in effect
    #[must_use]
    pub const fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    /// Launch a driver and run `body` from the login page
    pub async fn run<F, Fut>(&self, id: &str, name: &str, body: F) -> CaseResult
    where
        F: FnOnce(LoginPage) -> Fut,
        Fut: Future<Output = SwagResult<()>>,
    {
        info!("{RULE}");
        info!(
            "Test environment: {}, Browser: {}, Headless: {}, URL: {}",
            self.settings.env.to_uppercase(),
            self.launcher.browser_label(),
            self.launcher.headless(),
            self.settings.base_url
        );
        info!("{RULE}");
        match self.launcher.launch().await {
            Ok(driver) => self.run_with_driver(driver, id, name, body).await,
            Err(e) => {
                banner(name);
                let result = CaseResult {
                    error: Some(e.to_string()),
                    ..CaseResult::new(id, name, TestStatus::FixtureSetupFailed)
                };
                error!(test = name, error = %e, "browser launch failed");
                finish(result, Instant::now())
            }
        }
    }

    /// Run `body` on an already launched driver. The driver is closed afterwards.
    pub async fn run_with_driver<F, Fut>(
        &self,
        driver: SharedDriver,
        id: &str,
        name: &str,
        body: F,
    ) -> CaseResult
    where
        F: FnOnce(LoginPage) -> Fut,
        Fut: Future<Output = SwagResult<()>>,
    {
        banner(name);
        let started = Instant::now();
        let session = Session::new(
            driver.clone(),
            &self.settings.base_url,
            self.settings.wait_options(),
        );

        let mut result = match setup(&session).await {
            Err(e) => {
                error!(test = name, error = %e, "fixture setup failed");
                CaseResult {
                    error: Some(e.to_string()),
                    ..CaseResult::new(id, name, TestStatus::FixtureSetupFailed)
                }
            }
            Ok(login) => {
                let outcome = AssertUnwindSafe(body(login)).catch_unwind().await;
                let failure = match outcome {
                    Ok(Ok(())) => None,
                    Ok(Err(e)) => Some(e.to_string()),
                    Err(panic) => Some(panic_message(panic.as_ref())),
                };
                match failure {
                    None => CaseResult::new(id, name, TestStatus::Passed),
                    Some(message) => {
                        let mut failed = CaseResult {
                            error: Some(message.clone()),
                            ..CaseResult::new(id, name, TestStatus::Failed)
                        };
                        error!("Test '{name}' failed: {message}");
                        failed.screenshot = self.capture_failure(&driver, name).await;
                        failed
                    }
                }
            }
        };

        result.trail = session.trail().iter().map(ToString::to_string).collect();
        if result.status.is_failure() {
            for hop in &result.trail {
                info!(%hop, "navigation trail");
            }
        }

        info!("Closing browser session...");
        if let Err(e) = driver.close().await {
            warn!(error = %e, "could not close browser session");
        }
        finish(result, started)
    }

    /// Save `FAIL_<name>_<timestamp>.png`; failures to do so are only logged
    async fn capture_failure(&self, driver: &SharedDriver, name: &str) -> Option<PathBuf> {
        error!("Test '{name}' failed. Taking screenshot...");
        match save_screenshot(driver, &self.settings.output_screenshots, &format!("FAIL_{name}")).await {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Could not take screenshot on failed test '{name}': {e}");
                None
            }
        }
    }
}

/// Save a screenshot as `<dir>/<name>_<timestamp>.png`
pub async fn save_screenshot(driver: &SharedDriver, dir: &Path, name: &str) -> SwagResult<PathBuf> {
    let png = driver.screenshot().await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{name}_{}.png", timestamp()));
    tokio::fs::write(&path, png).await?;
    info!("Screenshot captured at: {}", path.display());
    Ok(path)
}

async fn setup(session: &Session) -> SwagResult<LoginPage> {
    session.driver().delete_all_cookies().await?;
    LoginPage::open(session.clone()).await
}

/// Log in as the standard user and check the browser landed on the inventory
pub async fn logged_in(login: LoginPage) -> SwagResult<InventoryPage> {
    info!(username = users::STANDARD.username, "Attempting to log in user");
    let inventory = login
        .login_as(users::STANDARD)
        .await?
        .moved()
        .ok_or_else(|| SwagError::assertion("Fixture: Failed to log in standard user."))?;
    let url = inventory.current_url().await?;
    let expected = inventory.session().url_of(InventoryPage::SCREEN);
    if url != expected {
        return Err(SwagError::assertion(format!(
            "Fixture: expected {expected} after login, got {url}"
        )));
    }
    info!("User successfully logged in and navigated to Inventory page");
    Ok(inventory)
}

fn banner(name: &str) {
    info!("{RULE}");
    info!("STARTING: {name}");
    info!("{RULE}");
}

fn finish(mut result: CaseResult, started: Instant) -> CaseResult {
    result.duration = started.elapsed();
    info!("{DOUBLE_RULE}");
    info!(
        "RESULT: '{}' is {}, Duration: {:.2}s",
        result.name,
        result.status,
        result.duration.as_secs_f64()
    );
    info!("{DOUBLE_RULE}");
    result
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "test panicked".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn harness(dir: &Path) -> Harness {
        Harness::simulated(SimOptions::instant(), dir)
    }

    mod lifecycle_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_passing_body() {
            let dir = tempfile::tempdir().unwrap();
            let result = harness(dir.path())
                .run("T-1", "test_passes", |login| async move {
                    login.verify_on_login_page().await
                })
                .await;
            assert_eq!(result.status, TestStatus::Passed);
            assert!(result.error.is_none());
            assert!(result.screenshot.is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn test_failing_body_saves_screenshot_and_trail() {
            let dir = tempfile::tempdir().unwrap();
            let result = harness(dir.path())
                .run("T-2", "test_fails", |login| async move {
                    let inventory = logged_in(login).await?;
                    inventory.navigate_to_cart().await?;
                    Err(SwagError::assertion("cart should not be empty"))
                })
                .await;
            assert_eq!(result.status, TestStatus::Failed);
            assert!(result.error.unwrap().contains("cart should not be empty"));
            assert_eq!(
                result.trail,
                ["Login --submit--> Inventory", "Inventory --open_cart--> Cart"]
            );
            let shot = result.screenshot.unwrap();
            assert!(shot.is_file());
            let file = shot.file_name().unwrap().to_string_lossy().into_owned();
            assert!(file.starts_with("FAIL_test_fails_"));
            assert!(file.ends_with(".png"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_panicking_body_is_caught() {
            let dir = tempfile::tempdir().unwrap();
            let result = harness(dir.path())
                .run("T-3", "test_panics", |login| async move {
                    let inventory = logged_in(login).await?;
                    let count = inventory.cart_count().await?;
                    assert_eq!(count, 1, "badge should show one item");
                    Ok(())
                })
                .await;
            assert_eq!(result.status, TestStatus::Failed);
            assert!(result.error.unwrap().contains("badge should show one item"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_save_screenshot_creates_directory() {
            let dir = tempfile::tempdir().unwrap();
            let nested = dir.path().join("shots").join("today");
            let driver: SharedDriver = Arc::new(SimDriver::new(SimOptions::instant()));
            driver.goto(SimDriver::BASE_URL).await.unwrap();
            let path = save_screenshot(&driver, &nested, "manual").await.unwrap();
            assert_eq!(path.parent(), Some(nested.as_path()));
            let bytes = tokio::fs::read(&path).await.unwrap();
            assert_eq!(&bytes[..4], b"\x89PNG");
        }

        #[tokio::test(start_paused = true)]
        async fn test_driver_closed_afterwards() {
            let dir = tempfile::tempdir().unwrap();
            let driver: SharedDriver = Arc::new(SimDriver::new(SimOptions::instant()));
            let result = harness(dir.path())
                .run_with_driver(driver.clone(), "T-4", "test_closes", |_login| async { Ok(()) })
                .await;
            assert_eq!(result.status, TestStatus::Passed);
            assert!(driver.current_url().await.is_err());
        }

        #[tokio::test(start_paused = true)]
        async fn test_setup_failure_reported() {
            let dir = tempfile::tempdir().unwrap();
            let driver: SharedDriver = Arc::new(SimDriver::new(SimOptions::instant()));
            driver.close().await.unwrap();
            let result = harness(dir.path())
                .run_with_driver(driver, "T-5", "test_setup", |_login| async { Ok(()) })
                .await;
            assert_eq!(result.status, TestStatus::FixtureSetupFailed);
        }
    }

    #[test]
    fn test_simulated_harness_targets_simulator() {
        let settings = Settings::new("stage", "https://example.test");
        let harness = Harness::new(settings, Launcher::Simulated(SimOptions::default()));
        assert_eq!(harness.settings().base_url, SimDriver::BASE_URL);
        assert_eq!(harness.launcher().browser_label(), "simulator");
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "test panicked");
    }
}
