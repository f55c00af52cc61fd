//! Chrome / Edge over the DevTools protocol.
//!
//! Element state comes from [`Locator::probe_script`], evaluated in the page.
//! Clicks and keystrokes go through real CDP input events so the page sees
//! the same events a user would produce.

use crate::driver::{BrowserKind, Driver, DriverConfig, ElementState, SharedDriver};
use crate::locator::{Locator, NativeQuery};
use crate::result::{SwagError, SwagResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::cdp::js_protocol::runtime::{CallArgument, CallFunctionOnParams};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Sets an input's value through the native setter so React notices, then
/// fires `input` and `change`.
const SET_VALUE_JS: &str = "function(value) { \
    var proto = this.tagName === 'SELECT' ? HTMLSelectElement.prototype : HTMLInputElement.prototype; \
    Object.getOwnPropertyDescriptor(proto, 'value').set.call(this, value); \
    this.dispatchEvent(new Event('input', { bubbles: true })); \
    this.dispatchEvent(new Event('change', { bubbles: true })); \
}";

/// Browser session driven over CDP
#[derive(Debug)]
pub struct CdpDriver {
    kind: BrowserKind,
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handler: JoinHandle<()>,
}

impl CdpDriver {
    /// Launch the browser and open a blank tab
    pub async fn launch(config: &DriverConfig) -> SwagResult<SharedDriver> {
        if config.browser == BrowserKind::Edge && config.executable_path.is_none() {
            return Err(SwagError::config(
                "edge over CDP needs the msedge executable path (--browser-path)",
            ));
        }

        let mut builder = CdpConfig::builder()
            .window_size(config.window_width, config.window_height)
            .arg("--disable-infobars")
            .arg("--disable-notifications")
            .arg("--disable-save-password-bubble")
            .arg("--disable-blink-features=AutomationControlled");
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| SwagError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| SwagError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SwagError::BrowserLaunch {
                message: e.to_string(),
            })?;

        info!(
            browser = %config.browser,
            headless = config.headless,
            width = config.window_width,
            height = config.window_height,
            "CDP browser launched"
        );
        Ok(Arc::new(Self {
            kind: config.browser,
            browser: Mutex::new(browser),
            page,
            handler,
        }))
    }

    async fn element(&self, locator: &Locator) -> SwagResult<Element> {
        let found = match locator.native() {
            NativeQuery::Css(css) => self.page.find_element(css).await,
            NativeQuery::XPath(xpath) => self.page.find_xpath(xpath).await,
        };
        found.map_err(|e| {
            debug!(%locator, error = %e, "element lookup failed");
            SwagError::ElementNotFound {
                locator: locator.to_string(),
            }
        })
    }

    async fn set_value(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        let element = self.element(locator).await?;
        let call = CallFunctionOnParams::builder()
            .function_declaration(SET_VALUE_JS)
            .object_id(element.remote_object_id.clone())
            .argument(
                CallArgument::builder()
                    .value(serde_json::Value::String(value.to_string()))
                    .build(),
            )
            .build()
            .map_err(SwagError::driver)?;
        self.page.execute(call).await.map_err(SwagError::driver)?;
        Ok(())
    }
}

#[async_trait]
impl Driver for CdpDriver {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    async fn goto(&self, url: &str) -> SwagResult<()> {
        self.page.goto(url).await.map_err(SwagError::driver)?;
        Ok(())
    }

    async fn current_url(&self) -> SwagResult<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(SwagError::driver)?
            .unwrap_or_default())
    }

    async fn probe(&self, locator: &Locator) -> SwagResult<Vec<ElementState>> {
        self.page
            .evaluate(locator.probe_script())
            .await
            .map_err(|e| SwagError::InvalidSelector {
                selector: locator.to_string(),
                message: e.to_string(),
            })?
            .into_value()
            .map_err(SwagError::driver)
    }

    async fn click(&self, locator: &Locator) -> SwagResult<()> {
        let element = self.element(locator).await?;
        element
            .click()
            .await
            .map_err(|e| SwagError::NotInteractable {
                locator: locator.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> SwagResult<()> {
        self.set_value(locator, "").await
    }

    async fn send_keys(&self, locator: &Locator, text: &str) -> SwagResult<()> {
        let element = self.element(locator).await?;
        element
            .click()
            .await
            .map_err(SwagError::driver)?
            .type_str(text)
            .await
            .map_err(SwagError::driver)?;
        Ok(())
    }

    async fn select_by_value(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        self.set_value(locator, value).await
    }

    async fn delete_all_cookies(&self) -> SwagResult<()> {
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(SwagError::driver)?;
        Ok(())
    }

    async fn screenshot(&self) -> SwagResult<Vec<u8>> {
        use base64::Engine;

        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let shot = self.page.execute(params).await.map_err(SwagError::driver)?;
        base64::engine::general_purpose::STANDARD
            .decode(&shot.data)
            .map_err(SwagError::driver)
    }

    async fn close(&self) -> SwagResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(SwagError::driver)?;
        self.handler.abort();
        Ok(())
    }
}
