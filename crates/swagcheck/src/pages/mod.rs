//! Page objects, one per screen of the storefront.
//!
//! A page object owns a [`Session`] clone and the locators of its screen.
//! Actions that navigate consume the page and return the page object of the
//! destination, so a handle to a screen the browser has left cannot be used.
//! Actions the application may reject return a [`Transition`].
//!
//! [`Transition`]: crate::graph::Transition

macro_rules! page_object {
    ($page:ident, $screen:expr) => {
        impl $crate::pages::Page for $page {
            const SCREEN: $crate::graph::Screen = $screen;

            fn attach(session: $crate::session::Session) -> Self {
                Self { session }
            }

            fn session(&self) -> &$crate::session::Session {
                &self.session
            }
        }
    };
}

mod cart;
mod checkout;
mod header;
mod inventory;
mod login;
mod product_detail;

pub use cart::CartPage;
pub use checkout::{
    CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, ContinueOutcome, LineItem,
};
pub use header::HeaderBar;
pub use inventory::{InventoryPage, SortOrder};
pub use login::{LoginOutcome, LoginPage};
pub use product_detail::ProductDetailPage;

use crate::graph::Screen;
use crate::result::SwagResult;
use crate::session::Session;
use async_trait::async_trait;

/// Page object bound to one screen
#[async_trait]
pub trait Page: Sized + Send + Sync + std::fmt::Debug {
    /// Screen this page object drives
    const SCREEN: Screen;

    /// Bind to a session whose browser shows [`Self::SCREEN`]
    fn attach(session: Session) -> Self;

    /// Session this page belongs to
    fn session(&self) -> &Session;

    /// Header bar shared by the logged-in screens
    fn header(&self) -> HeaderBar {
        HeaderBar::new(self.session().clone(), Self::SCREEN)
    }

    /// URL the browser is at
    async fn current_url(&self) -> SwagResult<String> {
        self.session().current_url().await
    }

    /// Number shown on the cart badge; zero when there is no badge
    async fn cart_count(&self) -> SwagResult<u32> {
        self.header().cart_count().await
    }

    /// Log out through the menu
    async fn logout(self) -> SwagResult<LoginPage> {
        self.header().logout().await
    }
}
