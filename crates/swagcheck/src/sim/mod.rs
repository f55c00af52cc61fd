//! In-process Swag Labs storefront.
//!
//! [`SimDriver`] implements [`Driver`] over a simulated copy of the site: the
//! same URLs, ids, classes and messages, the same business rules, and render
//! delays that make the wait layer earn its keep. It lets every scenario run
//! offline and deterministically, under paused tokio time in tests.
//!
//! Timing model:
//!
//! | Region | Visible after |
//! |---|---|
//! | page body | `render_delay` after each navigation |
//! | cart badge | `render_delay` after each cart change |
//! | burger menu | `render_delay` after opening; stays up `render_delay` after closing |
//! | inventory after `performance_glitch_user` login | `glitch_delay` |
//!
//! While the menu is on screen it covers everything else, so clicks outside
//! it fail with [`SwagError::NotInteractable`].

mod dom;
mod render;
mod store;

pub use store::SimOptions;

use crate::driver::{Driver, ElementState};
use crate::graph::Screen;
use crate::locator::Locator;
use crate::result::{SwagError, SwagResult};
use async_trait::async_trait;
use dom::{Dom, Group, Query};
use std::sync::{Mutex, MutexGuard};
use store::{Field, Route, Sort, Storefront};
use tokio::time::Instant;
use tracing::debug;

/// 1x1 transparent PNG
const BLANK_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Driver backed by the in-process storefront
#[derive(Debug)]
pub struct SimDriver {
    state: Mutex<Storefront>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new(SimOptions::default())
    }
}

/// Element resolved against the current render
struct Target {
    state: ElementState,
    id: Option<String>,
    command: Option<store::Command>,
}

impl SimDriver {
    /// Origin the simulated site answers on
    pub const BASE_URL: &'static str = "https://www.saucedemo.com/";

    /// Create a driver sitting on `about:blank`
    #[must_use]
    pub fn new(options: SimOptions) -> Self {
        Self {
            state: Mutex::new(Storefront::new(options)),
        }
    }

    /// Lock the storefront and apply any navigation that has come due
    fn store(&self) -> SwagResult<(MutexGuard<'_, Storefront>, Instant)> {
        let mut store = self
            .state
            .lock()
            .map_err(|_| SwagError::driver("storefront state poisoned"))?;
        if store.closed {
            return Err(SwagError::driver("session closed"));
        }
        let now = Instant::now();
        store.tick(now);
        Ok((store, now))
    }

    fn resolve(store: &Storefront, now: Instant, locator: &Locator) -> SwagResult<Vec<Target>> {
        let query = Query::parse(locator)?;
        let root = render::render(store);
        let dom = Dom::new(&root);
        let covered = store.menu_covers_page(now);
        Ok(dom
            .select(&query)
            .into_iter()
            .map(|i| {
                let entry = dom.entry(i);
                let settled = match entry.group {
                    Group::Page => store.page_visible(now),
                    Group::Badge => store.badge_visible(now),
                    Group::Menu => store.menu_visible(now),
                };
                Target {
                    state: ElementState {
                        tag: entry.node.tag.to_string(),
                        text: entry.node.inner_text(),
                        displayed: settled && !entry.hidden,
                        enabled: !entry.node.disabled,
                        obscured: covered && entry.group != Group::Menu,
                    },
                    id: entry.node.id.clone(),
                    command: dom.command_for(i),
                }
            })
            .collect())
    }

    /// First match, which must be able to take input
    fn interactable(store: &Storefront, now: Instant, locator: &Locator) -> SwagResult<Target> {
        let target = Self::resolve(store, now, locator)?
            .into_iter()
            .next()
            .ok_or_else(|| SwagError::ElementNotFound {
                locator: locator.to_string(),
            })?;
        let reason = if !target.state.displayed {
            Some("element is not displayed")
        } else if !target.state.enabled {
            Some("element is disabled")
        } else if target.state.obscured {
            Some("element is covered by the menu")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(SwagError::NotInteractable {
                locator: locator.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(target),
        }
    }

    fn field(store: &Storefront, now: Instant, locator: &Locator) -> SwagResult<Field> {
        let target = Self::interactable(store, now, locator)?;
        if target.state.tag != "input" {
            return Err(SwagError::NotInteractable {
                locator: locator.to_string(),
                reason: format!("<{}> does not take text", target.state.tag),
            });
        }
        target
            .id
            .as_deref()
            .and_then(Field::from_id)
            .ok_or_else(|| SwagError::NotInteractable {
                locator: locator.to_string(),
                reason: "input is read-only".to_string(),
            })
    }

    fn route_for(url: &str) -> SwagResult<Route> {
        let Some(rest) = url.strip_prefix(Self::BASE_URL) else {
            return Ok(Route::External(url.to_string()));
        };
        let screen = Screen::from_url(url).ok_or_else(|| SwagError::driver(format!("404: /{rest}")))?;
        if screen != Screen::ProductDetail {
            return Ok(Route::Screen(screen));
        }
        let id = rest
            .split_once('?')
            .and_then(|(_, query)| query.split('&').find_map(|kv| kv.strip_prefix("id=")))
            .and_then(|id| id.parse().ok());
        Ok(id.map_or(Route::Screen(screen), Route::Detail))
    }
}

#[async_trait]
impl Driver for SimDriver {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn goto(&self, url: &str) -> SwagResult<()> {
        let route = Self::route_for(url)?;
        let (mut store, now) = self.store()?;
        debug!(url, "simulated navigation");
        store.visit(route, now);
        Ok(())
    }

    async fn current_url(&self) -> SwagResult<String> {
        let (store, _) = self.store()?;
        Ok(store.route.url(Self::BASE_URL))
    }

    async fn probe(&self, locator: &Locator) -> SwagResult<Vec<ElementState>> {
        let (store, now) = self.store()?;
        Ok(Self::resolve(&store, now, locator)?
            .into_iter()
            .map(|t| t.state)
            .collect())
    }

    async fn click(&self, locator: &Locator) -> SwagResult<()> {
        let (mut store, now) = self.store()?;
        let target = Self::interactable(&store, now, locator)?;
        if let Some(command) = target.command {
            debug!(%locator, ?command, "simulated click");
            store.run(command, now);
        }
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> SwagResult<()> {
        let (mut store, now) = self.store()?;
        let field = Self::field(&store, now, locator)?;
        store.fields.get_mut(field).clear();
        Ok(())
    }

    async fn send_keys(&self, locator: &Locator, text: &str) -> SwagResult<()> {
        let (mut store, now) = self.store()?;
        let field = Self::field(&store, now, locator)?;
        store.fields.get_mut(field).push_str(text);
        Ok(())
    }

    async fn select_by_value(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        let (mut store, now) = self.store()?;
        let target = Self::interactable(&store, now, locator)?;
        if target.state.tag != "select" {
            return Err(SwagError::NotInteractable {
                locator: locator.to_string(),
                reason: format!("<{}> is not a select", target.state.tag),
            });
        }
        store.sort = Sort::from_value(value)
            .ok_or_else(|| SwagError::driver(format!("no option with value '{value}'")))?;
        Ok(())
    }

    async fn delete_all_cookies(&self) -> SwagResult<()> {
        let (mut store, _) = self.store()?;
        store.user = None;
        Ok(())
    }

    async fn screenshot(&self) -> SwagResult<Vec<u8>> {
        self.store()?;
        Ok(BLANK_PNG.to_vec())
    }

    async fn close(&self) -> SwagResult<()> {
        let (mut store, _) = self.store()?;
        store.closed = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::messages;
    use std::time::Duration;

    async fn on_login(options: SimOptions) -> SimDriver {
        let driver = SimDriver::new(options);
        driver.goto(SimDriver::BASE_URL).await.unwrap();
        driver
    }

    async fn login(driver: &SimDriver, username: &str, password: &str) {
        driver.send_keys(&Locator::id("user-name"), username).await.unwrap();
        driver.send_keys(&Locator::id("password"), password).await.unwrap();
        driver.click(&Locator::id("login-button")).await.unwrap();
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_starts_blank() {
            let driver = SimDriver::default();
            assert_eq!(driver.current_url().await.unwrap(), "about:blank");
        }

        #[tokio::test]
        async fn test_detail_url_carries_id() {
            assert_eq!(
                SimDriver::route_for("https://www.saucedemo.com/inventory-item.html?id=4").unwrap(),
                Route::Detail(4)
            );
            assert_eq!(
                SimDriver::route_for("https://www.saucedemo.com/cart.html").unwrap(),
                Route::Screen(Screen::Cart)
            );
            assert!(SimDriver::route_for("https://www.saucedemo.com/nope.html").is_err());
        }

        #[tokio::test]
        async fn test_protected_page_redirects_to_login() {
            let driver = on_login(SimOptions::instant()).await;
            driver.goto("https://www.saucedemo.com/inventory.html").await.unwrap();
            assert_eq!(driver.current_url().await.unwrap(), SimDriver::BASE_URL);
            let error = driver.probe(&Locator::css("[data-test='error']")).await.unwrap();
            assert_eq!(error[0].text, messages::restricted_access("/inventory.html"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_glitch_login_is_delayed() {
            let driver = on_login(SimOptions::instant()).await;
            login(&driver, "performance_glitch_user", "secret_sauce").await;
            assert!(Screen::Login.matches(&driver.current_url().await.unwrap()));
            tokio::time::sleep(Duration::from_secs(3)).await;
            assert!(Screen::Inventory.matches(&driver.current_url().await.unwrap()));
        }
    }

    mod element_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_page_renders_after_delay() {
            let driver = on_login(SimOptions::default()).await;
            let button = Locator::id("login-button");
            assert!(!driver.probe(&button).await.unwrap()[0].displayed);
            let err = driver.click(&button).await.unwrap_err();
            assert!(matches!(err, SwagError::NotInteractable { .. }));
            tokio::time::sleep(Duration::from_millis(250)).await;
            assert!(driver.probe(&button).await.unwrap()[0].is_clickable());
        }

        #[tokio::test]
        async fn test_missing_element() {
            let driver = on_login(SimOptions::instant()).await;
            let err = driver.click(&Locator::id("checkout")).await.unwrap_err();
            assert!(matches!(err, SwagError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_inventory_markup() {
            let driver = on_login(SimOptions::instant()).await;
            login(&driver, "standard_user", "secret_sauce").await;
            let names = driver.probe(&Locator::class_name("inventory_item_name")).await.unwrap();
            assert_eq!(names.len(), 6);
            assert_eq!(names[0].text, "Sauce Labs Backpack");

            driver
                .click(&Locator::id("add-to-cart-sauce-labs-backpack"))
                .await
                .unwrap();
            let badge = driver.probe(&Locator::css(".shopping_cart_badge")).await.unwrap();
            assert_eq!(badge[0].text, "1");
            assert_eq!(
                driver.probe(&Locator::id("remove-sauce-labs-backpack")).await.unwrap()[0].text,
                "Remove"
            );
        }

        #[tokio::test]
        async fn test_sort_select() {
            let driver = on_login(SimOptions::instant()).await;
            login(&driver, "standard_user", "secret_sauce").await;
            let select = Locator::class_name("product_sort_container");
            driver.select_by_value(&select, "lohi").await.unwrap();
            let prices = driver.probe(&Locator::class_name("inventory_item_price")).await.unwrap();
            assert_eq!(prices[0].text, "$7.99");
            assert!(driver.select_by_value(&select, "bogus").await.is_err());
        }

        #[tokio::test(start_paused = true)]
        async fn test_open_menu_covers_page() {
            let driver = on_login(SimOptions::default()).await;
            tokio::time::sleep(Duration::from_millis(250)).await;
            login(&driver, "standard_user", "secret_sauce").await;
            tokio::time::sleep(Duration::from_millis(250)).await;
            driver.click(&Locator::id("react-burger-menu-btn")).await.unwrap();
            let cart = driver.probe(&Locator::id("shopping_cart_container")).await.unwrap();
            assert!(cart[0].obscured);
            tokio::time::sleep(Duration::from_millis(250)).await;
            let logout = driver.probe(&Locator::id("logout_sidebar_link")).await.unwrap();
            assert!(logout[0].is_clickable());
        }

        #[tokio::test]
        async fn test_closed_session_refuses_calls() {
            let driver = on_login(SimOptions::instant()).await;
            assert!(!driver.screenshot().await.unwrap().is_empty());
            driver.close().await.unwrap();
            assert!(driver.current_url().await.is_err());
        }
    }
}
