//! Shared session handle threaded through every page object of a test.

use crate::driver::SharedDriver;
use crate::graph::{self, Action, Screen, Transition};
use crate::locator::Locator;
use crate::pages::Page;
use crate::result::{SwagError, SwagResult};
use crate::wait::{WaitCondition, WaitOptions, Waiter};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// One transition taken during a test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    /// Screen the action was taken on
    pub from: Screen,
    /// Action taken
    pub action: Action,
    /// Screen the browser ended up on
    pub to: Screen,
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.action, self.to)
    }
}

/// Driver, base URL, waiter and navigation trail of one test.
///
/// Cloning is cheap; all clones share the same browser session and trail.
#[derive(Debug, Clone)]
pub struct Session {
    waiter: Waiter,
    base_url: Arc<str>,
    trail: Arc<Mutex<Vec<Hop>>>,
}

impl Session {
    /// Create a session
    #[must_use]
    pub fn new(driver: SharedDriver, base_url: &str, options: WaitOptions) -> Self {
        Self {
            waiter: Waiter::new(driver, options),
            base_url: Arc::from(base_url),
            trail: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Wait-gated accessor
    #[must_use]
    pub const fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &SharedDriver {
        self.waiter.driver()
    }

    /// Base URL of the target application
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `screen`
    #[must_use]
    pub fn url_of(&self, screen: Screen) -> String {
        screen.url(&self.base_url)
    }

    /// URL the browser is at
    pub async fn current_url(&self) -> SwagResult<String> {
        self.driver().current_url().await
    }

    /// Navigate to `screen` by URL
    pub async fn goto(&self, screen: Screen) -> SwagResult<()> {
        let url = self.url_of(screen);
        debug!(%url, "navigating");
        self.driver().goto(&url).await
    }

    /// Transitions taken so far, oldest first
    #[must_use]
    pub fn trail(&self) -> Vec<Hop> {
        self.trail.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn record(&self, hop: Hop) {
        info!(%hop, "transition");
        if let Ok(mut trail) = self.trail.lock() {
            trail.push(hop);
        }
    }

    /// Attach a page object for the screen the browser is already on.
    pub async fn attach<P: Page>(&self) -> SwagResult<P> {
        self.arrive(P::SCREEN).await?;
        Ok(P::attach(self.clone()))
    }

    /// Take the edge `from --action--> P::SCREEN`.
    ///
    /// The edge is checked against the navigation graph before `perform`
    /// runs; afterwards the browser must reach the target screen.
    pub async fn enter<P, F>(&self, from: Screen, action: Action, perform: F) -> SwagResult<P>
    where
        P: Page,
        F: Future<Output = SwagResult<()>>,
    {
        graph::check(from, action, P::SCREEN)?;
        perform.await?;
        self.arrive(P::SCREEN).await?;
        self.record(Hop {
            from,
            action,
            to: P::SCREEN,
        });
        Ok(P::attach(self.clone()))
    }

    /// Dismiss a validation banner left over from an earlier submit.
    ///
    /// Does nothing when `error` is not shown.
    pub async fn clear_error(&self, error: &Locator, dismiss: &Locator) -> SwagResult<()> {
        let states = self.driver().probe(error).await?;
        if !WaitCondition::Visible.holds(&states) {
            return Ok(());
        }
        debug!(%error, "dismissing stale validation error");
        self.waiter.click(dismiss).await?;
        self.waiter.wait_invisible(error).await
    }

    /// Take an edge that the application may reject.
    ///
    /// Resolves to [`Transition::Moved`] once the browser reaches
    /// `Next::SCREEN`, or [`Transition::Stayed`] once `error` is shown
    /// while the browser shows `Stay::SCREEN`. A banner that was already
    /// visible before `perform` only counts after it has been seen hidden.
    pub async fn resolve<Next, Stay, F>(
        &self,
        from: Screen,
        action: Action,
        error: &Locator,
        perform: F,
    ) -> SwagResult<Transition<Next, Stay>>
    where
        Next: Page,
        Stay: Page,
        F: Future<Output = SwagResult<()>>,
    {
        graph::check(from, action, Next::SCREEN)?;
        graph::check(from, action, Stay::SCREEN)?;
        let stale = WaitCondition::Visible.holds(&self.driver().probe(error).await?);
        perform.await?;

        let driver = self.driver();
        let cleared = AtomicBool::new(!stale);
        let cleared = &cleared;
        let outcome = self
            .waiter
            .until(
                WaitCondition::Reached,
                format!("{} or {error}", Next::SCREEN),
                move || async move {
                    let url = driver.current_url().await?;
                    if Next::SCREEN.matches(&url) {
                        return Ok(Some(true));
                    }
                    if Stay::SCREEN.matches(&url) {
                        let shown = WaitCondition::Visible.holds(&driver.probe(error).await?);
                        if !shown {
                            cleared.store(true, Ordering::Relaxed);
                        } else if cleared.load(Ordering::Relaxed) {
                            return Ok(Some(false));
                        }
                    }
                    Ok(None)
                },
            )
            .await;

        match outcome {
            Ok(true) => {
                self.record(Hop {
                    from,
                    action,
                    to: Next::SCREEN,
                });
                Ok(Transition::Moved(Next::attach(self.clone())))
            }
            Ok(false) => {
                self.record(Hop {
                    from,
                    action,
                    to: Stay::SCREEN,
                });
                Ok(Transition::Stayed(Stay::attach(self.clone())))
            }
            Err(e) if e.is_timeout() => Err(self.mismatch(Next::SCREEN).await),
            Err(e) => Err(e),
        }
    }

    /// Wait until the browser shows `screen`
    async fn arrive(&self, screen: Screen) -> SwagResult<()> {
        let driver = self.driver();
        let result = self
            .waiter
            .until(WaitCondition::Reached, screen.as_str(), move || async move {
                let url = driver.current_url().await?;
                Ok(screen.matches(&url).then_some(()))
            })
            .await;
        match result {
            Err(e) if e.is_timeout() => Err(self.mismatch(screen).await),
            other => other,
        }
    }

    async fn mismatch(&self, expected: Screen) -> SwagError {
        match self.current_url().await {
            Ok(actual) => SwagError::NavigationMismatch { expected, actual },
            Err(e) => e,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::{messages, users};
    use crate::driver::Driver;
    use crate::pages::{CartPage, CheckoutCompletePage, InventoryPage, LoginPage};
    use crate::sim::{SimDriver, SimOptions};

    async fn session() -> (Arc<SimDriver>, Session) {
        let driver = Arc::new(SimDriver::new(SimOptions::instant()));
        let session = Session::new(driver.clone(), SimDriver::BASE_URL, WaitOptions::default());
        session.goto(Screen::Login).await.unwrap();
        (driver, session)
    }

    #[test]
    fn test_hop_display() {
        let hop = Hop {
            from: Screen::Login,
            action: Action::Submit,
            to: Screen::Inventory,
        };
        assert_eq!(hop.to_string(), "Login --submit--> Inventory");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_rejects_edge_before_acting() {
        let (driver, session) = session().await;
        let clicked = Arc::new(Mutex::new(false));
        let flag = clicked.clone();
        let err = session
            .enter::<CheckoutCompletePage, _>(Screen::Login, Action::Submit, async move {
                *flag.lock().unwrap() = true;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SwagError::IllegalTransition { .. }));
        assert!(!*clicked.lock().unwrap());
        assert!(Screen::Login.matches(&driver.current_url().await.unwrap()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_reports_navigation_mismatch() {
        let (_driver, session) = session().await;
        let err = session
            .enter::<InventoryPage, _>(Screen::Login, Action::Submit, async { Ok(()) })
            .await
            .unwrap_err();
        match err {
            SwagError::NavigationMismatch { expected, actual } => {
                assert_eq!(expected, Screen::Inventory);
                assert_eq!(actual, SimDriver::BASE_URL);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_trail_records_transitions() {
        let (_driver, session) = session().await;
        let login = session.attach::<LoginPage>().await.unwrap();
        let inventory = login
            .login("standard_user", "secret_sauce")
            .await
            .unwrap()
            .moved()
            .unwrap();
        let _cart: CartPage = inventory.navigate_to_cart().await.unwrap();
        let trail: Vec<String> = session.trail().iter().map(ToString::to_string).collect();
        assert_eq!(
            trail,
            vec![
                "Login --submit--> Inventory".to_string(),
                "Inventory --open_cart--> Cart".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_rejection_waits_for_slow_login() {
        let (_driver, session) = session().await;
        let login = session
            .attach::<LoginPage>()
            .await
            .unwrap()
            .login("performance_glitch_user", "wrong")
            .await
            .unwrap()
            .stayed()
            .expect("wrong password should stay on login");
        assert!(login.is_error_visible().await.unwrap());

        let outcome = login.login_as(users::PERFORMANCE_GLITCH).await.unwrap();
        assert!(matches!(outcome, Transition::Moved(_)));
        let trail: Vec<String> = session.trail().iter().map(ToString::to_string).collect();
        assert_eq!(
            trail,
            vec![
                "Login --submit--> Login".to_string(),
                "Login --submit--> Inventory".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_rejection_stays() {
        let (_driver, session) = session().await;
        let login = session.attach::<LoginPage>().await.unwrap();
        let login = login.login("", "").await.unwrap().stayed().unwrap();
        let login = login.login("", "").await.unwrap().stayed().unwrap();
        login
            .verify_error_message(messages::USERNAME_REQUIRED)
            .await
            .unwrap();
        assert_eq!(session.trail().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_error_dismisses_banner() {
        let (driver, session) = session().await;
        let login = session.attach::<LoginPage>().await.unwrap();
        let login = login.login("", "").await.unwrap().stayed().unwrap();
        session
            .clear_error(&LoginPage::ERROR_MESSAGE, &LoginPage::ERROR_DISMISS)
            .await
            .unwrap();
        let states = driver.probe(&LoginPage::ERROR_MESSAGE).await.unwrap();
        assert!(WaitCondition::Invisible.holds(&states));
        // nothing to dismiss the second time
        session
            .clear_error(&LoginPage::ERROR_MESSAGE, &LoginPage::ERROR_DISMISS)
            .await
            .unwrap();
        login.verify_on_login_page().await.unwrap();
    }
}
