//! Driver - abstract browser capability provider
//!
//! Page objects never talk to a browser directly. They go through a
//! [`Driver`], which can be:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Driver (async trait)                                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌────────────────┐  │
//! │  │  CdpDriver       │  │  WebDriverClient │  │  SimDriver     │  │
//! │  │  (`browser`)     │  │  (`webdriver`)   │  │  (always)      │  │
//! │  │  chromiumoxide   │  │  fantoccini      │  │  in-process    │  │
//! │  │  Chrome / Edge   │  │  any browser     │  │  storefront    │  │
//! │  └──────────────────┘  └──────────────────┘  └────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The driver does no waiting of its own. Every wait happens in
//! [`crate::wait::Waiter`], which polls [`Driver::probe`].

use crate::locator::Locator;
use crate::result::{SwagError, SwagResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Snapshot of one element matching a locator at the time of a probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Lowercase tag name
    pub tag: String,
    /// Rendered text as the browser exposes it
    pub text: String,
    /// Attached, rendered with nonzero size and not hidden by style
    pub displayed: bool,
    /// Not disabled
    pub enabled: bool,
    /// Another element sits on top of its center point
    pub obscured: bool,
}

impl ElementState {
    /// Element can receive a click
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.displayed && self.enabled && !self.obscured
    }
}

/// Handle returned by a satisfied wait condition
#[derive(Debug, Clone)]
pub struct ElementHandle {
    /// Locator that produced the handle
    pub locator: Locator,
    /// State observed when the condition held
    pub state: ElementState,
}

impl ElementHandle {
    /// Create a handle
    #[must_use]
    pub const fn new(locator: Locator, state: ElementState) -> Self {
        Self { locator, state }
    }

    /// Rendered text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.state.text
    }

    /// Whether the element was displayed
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.state.displayed
    }
}

/// Browser automation capabilities the suite relies on.
///
/// Single-element operations act on the first element matching the locator.
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Navigate to URL
    async fn goto(&self, url: &str) -> SwagResult<()>;

    /// Current URL
    async fn current_url(&self) -> SwagResult<String>;

    /// Describe every element matching `locator`, in document order
    async fn probe(&self, locator: &Locator) -> SwagResult<Vec<ElementState>>;

    /// Click element
    async fn click(&self, locator: &Locator) -> SwagResult<()>;

    /// Clear an input
    async fn clear(&self, locator: &Locator) -> SwagResult<()>;

    /// Send keystrokes to an input
    async fn send_keys(&self, locator: &Locator, text: &str) -> SwagResult<()>;

    /// Choose the `<option>` with the given value in a `<select>`
    async fn select_by_value(&self, locator: &Locator, value: &str) -> SwagResult<()>;

    /// Remove every cookie of the session
    async fn delete_all_cookies(&self) -> SwagResult<()>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> SwagResult<Vec<u8>>;

    /// End the browser session
    async fn close(&self) -> SwagResult<()>;
}

/// Shared driver handle; every page object of a test holds a clone
pub type SharedDriver = Arc<dyn Driver>;

/// Browser selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome / Chromium
    #[default]
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Microsoft Edge
    Edge,
}

impl BrowserKind {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
        }
    }

    /// Chromium-based browsers can be driven over CDP
    #[must_use]
    pub const fn speaks_cdp(self) -> bool {
        matches!(self, Self::Chrome | Self::Edge)
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" | "msedge" => Ok(Self::Edge),
            _ => Err(SwagError::UnsupportedBrowser {
                name: s.to_string(),
            }),
        }
    }
}

/// Browser configuration for driver launch
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Which browser to drive
    pub browser: BrowserKind,
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Executable path override (required for Edge when it is not installed
    /// in a standard location)
    pub executable_path: Option<PathBuf>,
    /// WebDriver server URL; when set the WebDriver backend is used
    pub webdriver_url: Option<String>,
    /// Sandbox mode (disabled by default, as in CI containers)
    pub sandbox: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chrome,
            headless: false,
            window_width: 1920,
            window_height: 1080,
            executable_path: None,
            webdriver_url: None,
            sandbox: false,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new(browser: BrowserKind) -> Self {
        Self {
            browser,
            ..Self::default()
        }
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window dimensions
    #[must_use]
    pub const fn window(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set executable path
    #[must_use]
    pub fn executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Use a WebDriver server
    #[must_use]
    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Which backend `launch` will pick for this configuration
    pub fn backend(&self) -> SwagResult<Backend> {
        if self.webdriver_url.is_some() {
            return if cfg!(feature = "webdriver") {
                Ok(Backend::WebDriver)
            } else {
                Err(SwagError::config(
                    "a WebDriver URL was given but swagcheck was built without the `webdriver` feature",
                ))
            };
        }
        if !self.browser.speaks_cdp() {
            return Err(SwagError::config(format!(
                "{} needs a WebDriver server; pass a WebDriver URL (e.g. http://localhost:4444)",
                self.browser
            )));
        }
        if cfg!(feature = "browser") {
            Ok(Backend::Cdp)
        } else {
            Err(SwagError::config(
                "swagcheck was built without the `browser` feature; rebuild with --features browser",
            ))
        }
    }
}

/// Backend chosen for a launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// chromiumoxide over CDP
    Cdp,
    /// fantoccini over WebDriver
    WebDriver,
}

/// Launch a browser session for `config`.
pub async fn launch(config: &DriverConfig) -> SwagResult<SharedDriver> {
    match config.backend()? {
        #[cfg(feature = "browser")]
        Backend::Cdp => crate::browser::CdpDriver::launch(config).await,
        #[cfg(feature = "webdriver")]
        Backend::WebDriver => crate::webdriver::WebDriverClient::connect(config).await,
        #[allow(unreachable_patterns)]
        other => Err(SwagError::config(format!(
            "backend {other:?} is not compiled in"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod element_tests {
        use super::*;

        fn state(displayed: bool, enabled: bool, obscured: bool) -> ElementState {
            ElementState {
                tag: "button".to_string(),
                text: "Login".to_string(),
                displayed,
                enabled,
                obscured,
            }
        }

        #[test]
        fn test_clickable_requires_all_three() {
            assert!(state(true, true, false).is_clickable());
            assert!(!state(false, true, false).is_clickable());
            assert!(!state(true, false, false).is_clickable());
            assert!(!state(true, true, true).is_clickable());
        }

        #[test]
        fn test_handle_exposes_text() {
            let handle = ElementHandle::new(Locator::id("login-button"), state(true, true, false));
            assert_eq!(handle.text(), "Login");
            assert!(handle.is_visible());
        }

        #[test]
        fn test_state_deserializes_from_probe_json() {
            let json = r#"[{"tag":"span","text":"2","displayed":true,"enabled":true,"obscured":false}]"#;
            let states: Vec<ElementState> = serde_json::from_str(json).unwrap();
            assert_eq!(states.len(), 1);
            assert_eq!(states[0].text, "2");
        }
    }

    mod browser_kind_tests {
        use super::*;

        #[test]
        fn test_parse_is_case_insensitive() {
            assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
            assert_eq!("FIREFOX".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
            assert_eq!("edge".parse::<BrowserKind>().unwrap(), BrowserKind::Edge);
        }

        #[test]
        fn test_parse_rejects_unknown_browser() {
            let err = "safari".parse::<BrowserKind>().unwrap_err();
            assert!(matches!(err, SwagError::UnsupportedBrowser { ref name } if name == "safari"));
            assert!(err.to_string().contains("chrome, firefox, edge"));
        }

        #[test]
        fn test_cdp_capability() {
            assert!(BrowserKind::Chrome.speaks_cdp());
            assert!(BrowserKind::Edge.speaks_cdp());
            assert!(!BrowserKind::Firefox.speaks_cdp());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_config_default() {
            let config = DriverConfig::default();
            assert_eq!(config.browser, BrowserKind::Chrome);
            assert!(!config.headless);
            assert_eq!((config.window_width, config.window_height), (1920, 1080));
            assert!(!config.sandbox);
        }

        #[test]
        fn test_config_builder() {
            let config = DriverConfig::new(BrowserKind::Edge)
                .headless(true)
                .window(1280, 720)
                .executable_path("/opt/microsoft/msedge/msedge");
            assert!(config.headless);
            assert_eq!(config.window_width, 1280);
            assert_eq!(
                config.executable_path,
                Some(PathBuf::from("/opt/microsoft/msedge/msedge"))
            );
        }

        #[test]
        fn test_firefox_without_webdriver_url_is_config_error() {
            let err = DriverConfig::new(BrowserKind::Firefox).backend().unwrap_err();
            assert!(matches!(err, SwagError::Config { .. }));
        }

        #[cfg(feature = "webdriver")]
        #[test]
        fn test_webdriver_url_selects_webdriver_backend() {
            let config = DriverConfig::new(BrowserKind::Firefox).webdriver_url("http://localhost:4444");
            assert_eq!(config.backend().unwrap(), Backend::WebDriver);
        }

        #[cfg(feature = "browser")]
        #[test]
        fn test_chrome_selects_cdp_backend() {
            assert_eq!(DriverConfig::default().backend().unwrap(), Backend::Cdp);
        }
    }
}
