//! Wait-gated element access.
//!
//! Every read and every interaction goes through a [`Waiter`]: the element is
//! polled until the relevant [`WaitCondition`] holds, and only then touched.
//! A condition that never holds ends in [`SwagError::Timeout`].
//!
//! Only the boolean queries ([`Waiter::is_present`], [`Waiter::is_visible`])
//! turn a timeout into `false`. Everything else propagates it.

use crate::driver::{ElementHandle, ElementState, SharedDriver};
use crate::locator::Locator;
use crate::result::{SwagError, SwagResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT CONDITION
// =============================================================================

/// Condition an element (or the page) must satisfy before the caller proceeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitCondition {
    /// At least one element matches
    Present,
    /// The first match is rendered with nonzero size
    Visible,
    /// The first match is visible, enabled and not covered
    Clickable,
    /// Nothing matches, or the first match is not rendered
    Invisible,
    /// The browser reached a URL
    Reached,
}

impl WaitCondition {
    /// Whether the condition holds for a probe result
    #[must_use]
    pub fn holds(self, states: &[ElementState]) -> bool {
        let first = states.first();
        match self {
            Self::Present => first.is_some(),
            Self::Visible => first.is_some_and(|s| s.displayed),
            Self::Clickable => first.is_some_and(ElementState::is_clickable),
            Self::Invisible => first.map_or(true, |s| !s.displayed),
            Self::Reached => false,
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
            Self::Invisible => "invisible",
            Self::Reached => "reached",
        }
    }
}

impl std::fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Timeout and polling cadence of a [`Waiter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Wait-gated accessor over a shared driver
#[derive(Debug, Clone)]
pub struct Waiter {
    driver: SharedDriver,
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter
    #[must_use]
    pub fn new(driver: SharedDriver, options: WaitOptions) -> Self {
        Self { driver, options }
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Wait options in effect
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Poll `check` until it yields a value or the timeout elapses.
    ///
    /// `target` names what is being waited for in the timeout error. Errors
    /// returned by `check` end the wait immediately.
    pub async fn until<T, F, Fut>(
        &self,
        condition: WaitCondition,
        target: impl Into<String>,
        mut check: F,
    ) -> SwagResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SwagResult<Option<T>>>,
    {
        let deadline = Instant::now() + self.options.timeout();
        loop {
            if let Some(value) = check().await? {
                return Ok(value);
            }
            if Instant::now() >= deadline {
                return Err(SwagError::Timeout {
                    condition,
                    locator: target.into(),
                    ms: self.options.timeout_ms,
                });
            }
            sleep(self.options.poll_interval()).await;
        }
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
    ) -> SwagResult<Option<ElementState>> {
        let driver = &self.driver;
        self.until(condition, locator.to_string(), move || async move {
            let states = driver.probe(locator).await?;
            Ok(condition
                .holds(&states)
                .then(|| states.into_iter().next()))
        })
        .await
    }

    async fn wait_for_handle(
        &self,
        locator: &Locator,
        condition: WaitCondition,
    ) -> SwagResult<ElementHandle> {
        let state = self
            .wait_for(locator, condition)
            .await?
            .ok_or_else(|| SwagError::ElementNotFound {
                locator: locator.to_string(),
            })?;
        Ok(ElementHandle::new(locator.clone(), state))
    }

    /// Wait until at least one element matches
    pub async fn wait_present(&self, locator: &Locator) -> SwagResult<ElementHandle> {
        self.wait_for_handle(locator, WaitCondition::Present).await
    }

    /// Wait until the element is rendered with nonzero size
    pub async fn wait_visible(&self, locator: &Locator) -> SwagResult<ElementHandle> {
        self.wait_for_handle(locator, WaitCondition::Visible).await
    }

    /// Wait until the element is visible, enabled and unobscured
    pub async fn wait_clickable(&self, locator: &Locator) -> SwagResult<ElementHandle> {
        self.wait_for_handle(locator, WaitCondition::Clickable).await
    }

    /// Wait until the element is gone or hidden
    pub async fn wait_invisible(&self, locator: &Locator) -> SwagResult<()> {
        self.wait_for(locator, WaitCondition::Invisible).await?;
        Ok(())
    }

    /// Visible, then clickable, then click
    pub async fn click(&self, locator: &Locator) -> SwagResult<()> {
        let result = async {
            self.wait_visible(locator).await?;
            self.wait_clickable(locator).await?;
            self.driver.click(locator).await
        }
        .await;
        logged("click", locator, result)
    }

    /// Visible, then clear, then send `text` verbatim
    pub async fn type_text(&self, locator: &Locator, text: &str) -> SwagResult<()> {
        let result = async {
            self.wait_visible(locator).await?;
            self.driver.clear(locator).await?;
            self.driver.send_keys(locator, text).await
        }
        .await;
        logged("type", locator, result)
    }

    /// Rendered text of a visible element, exactly as the browser exposes it
    pub async fn read_text(&self, locator: &Locator) -> SwagResult<String> {
        let result = self
            .wait_visible(locator)
            .await
            .map(|handle| handle.state.text);
        logged("read text", locator, result)
    }

    /// Rendered text of every match, once at least one is present
    pub async fn read_all_text(&self, locator: &Locator) -> SwagResult<Vec<String>> {
        let result = async {
            self.wait_present(locator).await?;
            let states = self.driver.probe(locator).await?;
            Ok(states.into_iter().map(|s| s.text).collect())
        }
        .await;
        logged("read all text", locator, result)
    }

    /// Number of matches; zero when nothing appears before the timeout
    pub async fn count(&self, locator: &Locator) -> SwagResult<usize> {
        if !self.is_present(locator).await? {
            return Ok(0);
        }
        Ok(self.driver.probe(locator).await?.len())
    }

    /// Visible, then choose the `<option>` with `value`
    pub async fn select_value(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        let result = async {
            self.wait_visible(locator).await?;
            self.driver.select_by_value(locator, value).await
        }
        .await;
        logged("select", locator, result)
    }

    /// Presence check; a timeout yields `false`
    pub async fn is_present(&self, locator: &Locator) -> SwagResult<bool> {
        timeout_as_false(locator, self.wait_for(locator, WaitCondition::Present).await)
    }

    /// Visibility check; a timeout yields `false`
    pub async fn is_visible(&self, locator: &Locator) -> SwagResult<bool> {
        timeout_as_false(locator, self.wait_for(locator, WaitCondition::Visible).await)
    }
}

fn logged<T>(action: &str, locator: &Locator, result: SwagResult<T>) -> SwagResult<T> {
    if let Err(ref e) = result {
        error!(%locator, action, error = %e, "element interaction failed");
    }
    result
}

fn timeout_as_false<T>(locator: &Locator, result: SwagResult<T>) -> SwagResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(e) if e.is_timeout() => {
            debug!(%locator, "condition not met before timeout");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
