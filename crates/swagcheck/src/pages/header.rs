//! Header bar: cart icon and badge, burger menu.

use super::{CartPage, InventoryPage, LoginPage};
use crate::graph::{Action, Screen};
use crate::locator::Locator;
use crate::result::SwagResult;
use crate::session::Session;
use crate::wait::WaitCondition;
use tracing::debug;

/// Header shown on every logged-in screen
#[derive(Debug, Clone)]
pub struct HeaderBar {
    session: Session,
    screen: Screen,
}

impl HeaderBar {
    /// Cart icon
    pub const CART_ICON: Locator = Locator::id("shopping_cart_container");
    /// Item count badge on the cart icon
    pub const CART_BADGE: Locator = Locator::xpath("//span[@class='shopping_cart_badge']");
    /// Burger menu button
    pub const MENU_BUTTON: Locator = Locator::id("react-burger-menu-btn");
    /// Menu entries
    pub const MENU_ITEMS: Locator = Locator::class_name("menu-item");
    /// Menu "All Items"
    pub const ALL_ITEMS_LINK: Locator = Locator::id("inventory_sidebar_link");
    /// Menu "About"
    pub const ABOUT_LINK: Locator = Locator::id("about_sidebar_link");
    /// Menu "Logout"
    pub const LOGOUT_LINK: Locator = Locator::id("logout_sidebar_link");
    /// Menu "Reset App State"
    pub const RESET_LINK: Locator = Locator::id("reset_sidebar_link");
    /// Menu close button
    pub const MENU_CLOSE: Locator = Locator::id("react-burger-cross-btn");

    /// Header of the page showing `screen`
    #[must_use]
    pub const fn new(session: Session, screen: Screen) -> Self {
        Self { session, screen }
    }

    /// Count on the cart badge.
    ///
    /// Zero when no badge appears or its text is not a number.
    pub async fn cart_count(&self) -> SwagResult<u32> {
        let waiter = self.session.waiter();
        if !waiter.is_visible(&Self::CART_BADGE).await? {
            return Ok(0);
        }
        let text = waiter.read_text(&Self::CART_BADGE).await?;
        Ok(text.trim().parse().unwrap_or_else(|_| {
            debug!(%text, "cart badge is not a number");
            0
        }))
    }

    /// Open the burger menu and wait for it to slide in
    pub async fn open_menu(&self) -> SwagResult<()> {
        let waiter = self.session.waiter();
        waiter.click(&Self::MENU_BUTTON).await?;
        waiter.wait_visible(&Self::MENU_CLOSE).await?;
        Ok(())
    }

    /// Close the burger menu and wait for it to slide out
    pub async fn close_menu(&self) -> SwagResult<()> {
        let waiter = self.session.waiter();
        waiter.click(&Self::MENU_CLOSE).await?;
        waiter.wait_invisible(&Self::MENU_CLOSE).await
    }

    /// Labels of the menu entries; opens the menu if needed
    pub async fn menu_items(&self) -> SwagResult<Vec<String>> {
        let states = self.session.driver().probe(&Self::MENU_CLOSE).await?;
        if !WaitCondition::Visible.holds(&states) {
            self.open_menu().await?;
        }
        self.session.waiter().read_all_text(&Self::MENU_ITEMS).await
    }

    /// Empty the cart through the menu, then close the menu
    pub async fn reset_app_state(&self) -> SwagResult<()> {
        self.open_menu().await?;
        self.session.waiter().click(&Self::RESET_LINK).await?;
        self.close_menu().await
    }

    /// Open the cart
    pub async fn open_cart(self) -> SwagResult<CartPage> {
        self.session
            .enter(
                self.screen,
                Action::OpenCart,
                self.session.waiter().click(&Self::CART_ICON),
            )
            .await
    }

    /// Log out through the menu
    pub async fn logout(self) -> SwagResult<LoginPage> {
        let perform = async {
            self.open_menu().await?;
            self.session.waiter().click(&Self::LOGOUT_LINK).await
        };
        self.session.enter(self.screen, Action::Logout, perform).await
    }

    /// Follow the menu "About" link off the storefront.
    ///
    /// Returns the URL reached. Nothing is recorded in the trail since the
    /// page is not part of the storefront.
    pub async fn about(self) -> SwagResult<String> {
        let waiter = self.session.waiter();
        self.open_menu().await?;
        waiter.click(&Self::ABOUT_LINK).await?;
        let base = self.session.base_url();
        let driver = self.session.driver();
        waiter
            .until(WaitCondition::Reached, "a page outside the storefront", move || async move {
                let url = driver.current_url().await?;
                Ok((!url.starts_with(base)).then_some(url))
            })
            .await
    }

    /// Menu "All Items"
    pub async fn all_items(self) -> SwagResult<InventoryPage> {
        let perform = async {
            self.open_menu().await?;
            self.session.waiter().click(&Self::ALL_ITEMS_LINK).await
        };
        self.session.enter(self.screen, Action::AllItems, perform).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::users;
    use crate::pages::Page;
    use crate::sim::{SimDriver, SimOptions};
    use crate::wait::WaitOptions;
    use std::sync::Arc;

    async fn inventory() -> (Session, InventoryPage) {
        let driver = Arc::new(SimDriver::new(SimOptions::default()));
        let session = Session::new(driver, SimDriver::BASE_URL, WaitOptions::default());
        session.goto(Screen::Login).await.unwrap();
        let login = session.attach::<LoginPage>().await.unwrap();
        let inventory = login.login_as(users::STANDARD).await.unwrap().moved().unwrap();
        (session, inventory)
    }

    mod menu_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_about_leaves_storefront() {
            let (session, inventory) = inventory().await;
            let url = inventory.header().about().await.unwrap();
            assert_eq!(url, "https://saucelabs.com/");
            assert_eq!(session.trail().len(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_menu_items_open_menu_once() {
            let (_session, inventory) = inventory().await;
            let header = inventory.header();
            let first = header.menu_items().await.unwrap();
            let again = header.menu_items().await.unwrap();
            assert_eq!(first, again);
            assert_eq!(first.len(), 4);
        }
    }
}
