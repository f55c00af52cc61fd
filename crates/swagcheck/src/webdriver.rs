//! Any browser through a running WebDriver server.
//!
//! geckodriver, chromedriver and msedgedriver all work; the browser is chosen
//! through the capabilities sent when the session is created.

use crate::driver::{BrowserKind, Driver, DriverConfig, ElementState, SharedDriver};
use crate::locator::{Locator, NativeQuery};
use crate::result::{SwagError, SwagResult};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Browser session held by a WebDriver server
#[derive(Debug)]
pub struct WebDriverClient {
    kind: BrowserKind,
    client: Client,
}

/// Session capabilities for `config`
fn capabilities(config: &DriverConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    let size = format!("--window-size={},{}", config.window_width, config.window_height);

    match config.browser {
        BrowserKind::Firefox => {
            let mut args = Vec::new();
            if config.headless {
                args.push("-headless".to_string());
            }
            caps.insert("browserName".to_string(), json!("firefox"));
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
        BrowserKind::Chrome | BrowserKind::Edge => {
            let mut args = vec![size, "--disable-notifications".to_string()];
            if config.headless {
                args.push("--headless=new".to_string());
                args.push("--disable-gpu".to_string());
            }
            if !config.sandbox {
                args.push("--no-sandbox".to_string());
                args.push("--disable-dev-shm-usage".to_string());
            }
            let mut options = json!({ "args": args });
            if let Some(ref path) = config.executable_path {
                options["binary"] = json!(path.display().to_string());
            }
            let (name, key) = if config.browser == BrowserKind::Edge {
                ("MicrosoftEdge", "ms:edgeOptions")
            } else {
                ("chrome", "goog:chromeOptions")
            };
            caps.insert("browserName".to_string(), json!(name));
            caps.insert(key.to_string(), options);
        }
    }
    caps
}

impl WebDriverClient {
    /// Open a session on the server named by `config.webdriver_url`
    pub async fn connect(config: &DriverConfig) -> SwagResult<SharedDriver> {
        let url = config
            .webdriver_url
            .as_deref()
            .ok_or_else(|| SwagError::config("no WebDriver URL configured"))?;

        debug!(url, browser = %config.browser, "connecting to WebDriver");
        let client = ClientBuilder::native()
            .capabilities(capabilities(config))
            .connect(url)
            .await
            .map_err(|e| SwagError::BrowserLaunch {
                message: format!("WebDriver session at {url}: {e}"),
            })?;

        if let Err(e) = client
            .set_window_size(config.window_width, config.window_height)
            .await
        {
            debug!(error = %e, "window size not applied");
        }

        info!(
            browser = %config.browser,
            headless = config.headless,
            url,
            "WebDriver session started"
        );
        Ok(Arc::new(Self {
            kind: config.browser,
            client,
        }))
    }

    async fn element(&self, locator: &Locator) -> SwagResult<fantoccini::elements::Element> {
        let found = match locator.native() {
            NativeQuery::Css(css) => self.client.find(WdLocator::Css(&css)).await,
            NativeQuery::XPath(xpath) => self.client.find(WdLocator::XPath(&xpath)).await,
        };
        found.map_err(|e| {
            debug!(%locator, error = %e, "element lookup failed");
            not_found_or_driver(locator, e)
        })
    }
}

fn not_found_or_driver(locator: &Locator, e: CmdError) -> SwagError {
    if e.is_no_such_element() {
        SwagError::ElementNotFound {
            locator: locator.to_string(),
        }
    } else {
        SwagError::driver(e)
    }
}

fn refused(locator: &Locator, e: CmdError) -> SwagError {
    SwagError::NotInteractable {
        locator: locator.to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl Driver for WebDriverClient {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    async fn goto(&self, url: &str) -> SwagResult<()> {
        self.client.goto(url).await.map_err(SwagError::driver)
    }

    async fn current_url(&self) -> SwagResult<String> {
        let url = self.client.current_url().await.map_err(SwagError::driver)?;
        Ok(url.to_string())
    }

    async fn probe(&self, locator: &Locator) -> SwagResult<Vec<ElementState>> {
        let script = format!("return {};", locator.probe_script());
        let value: Value = self
            .client
            .execute(&script, Vec::new())
            .await
            .map_err(|e| SwagError::InvalidSelector {
                selector: locator.to_string(),
                message: e.to_string(),
            })?;
        Ok(serde_json::from_value(value)?)
    }

    async fn click(&self, locator: &Locator) -> SwagResult<()> {
        let element = self.element(locator).await?;
        element.click().await.map_err(|e| refused(locator, e))?;
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> SwagResult<()> {
        let element = self.element(locator).await?;
        element.clear().await.map_err(|e| refused(locator, e))
    }

    async fn send_keys(&self, locator: &Locator, text: &str) -> SwagResult<()> {
        let element = self.element(locator).await?;
        element
            .send_keys(text)
            .await
            .map_err(|e| refused(locator, e))
    }

    async fn select_by_value(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        let element = self.element(locator).await?;
        element
            .select_by_value(value)
            .await
            .map_err(|e| refused(locator, e))
    }

    async fn delete_all_cookies(&self) -> SwagResult<()> {
        self.client
            .delete_all_cookies()
            .await
            .map_err(SwagError::driver)
    }

    async fn screenshot(&self) -> SwagResult<Vec<u8>> {
        self.client.screenshot().await.map_err(SwagError::driver)
    }

    async fn close(&self) -> SwagResult<()> {
        self.client.clone().close().await.map_err(SwagError::driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firefox_capabilities() {
        let config = DriverConfig::new(BrowserKind::Firefox).headless(true);
        let caps = capabilities(&config);
        assert_eq!(caps["browserName"], "firefox");
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!(["-headless"]));
    }

    #[test]
    fn test_edge_capabilities_carry_binary_and_size() {
        let config = DriverConfig::new(BrowserKind::Edge)
            .window(1280, 720)
            .executable_path("/opt/microsoft/msedge/msedge");
        let caps = capabilities(&config);
        assert_eq!(caps["browserName"], "MicrosoftEdge");
        let options = &caps["ms:edgeOptions"];
        assert_eq!(options["binary"], "/opt/microsoft/msedge/msedge");
        let args = options["args"].as_array().unwrap();
        assert!(args.contains(&json!("--window-size=1280,720")));
        assert!(!args.contains(&json!("--headless=new")));
    }

    #[test]
    fn test_chrome_headless_args() {
        let caps = capabilities(&DriverConfig::default().headless(true));
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--no-sandbox")));
    }
}
