//! Cart contents.

use super::{CheckoutInfoPage, InventoryPage};
use crate::graph::{Action, Screen};
use crate::locator::Locator;
use crate::result::SwagResult;
use crate::session::Session;
use tracing::info;

/// Cart screen
#[derive(Debug)]
pub struct CartPage {
    session: Session,
}

page_object!(CartPage, Screen::Cart);

impl CartPage {
    /// Page title
    pub const TITLE: Locator = Locator::css(".title");
    /// One row per cart line
    pub const CART_ITEM: Locator = Locator::css(".cart_item");
    /// Product names of the cart lines
    pub const ITEM_NAMES: Locator = Locator::class_name("inventory_item_name");
    /// "Checkout"
    pub const CHECKOUT_BUTTON: Locator = Locator::id("checkout");
    /// "Continue Shopping"
    pub const CONTINUE_SHOPPING_BUTTON: Locator = Locator::id("continue-shopping");
    /// Id prefix of "Remove" buttons
    pub const REMOVE_PREFIX: &'static str = "remove-";

    /// Page title text
    pub async fn title(&self) -> SwagResult<String> {
        self.session.waiter().read_text(&Self::TITLE).await
    }

    /// Number of cart lines; zero for an empty cart
    pub async fn item_count(&self) -> SwagResult<usize> {
        self.session.waiter().count(&Self::CART_ITEM).await
    }

    /// Product names in cart order
    pub async fn item_names(&self) -> SwagResult<Vec<String>> {
        if self.item_count().await? == 0 {
            return Ok(Vec::new());
        }
        self.session.waiter().read_all_text(&Self::ITEM_NAMES).await
    }

    /// Click "Remove" for `product`
    pub async fn remove(&self, product: &str) -> SwagResult<()> {
        info!(product, "removing from cart");
        let button = Locator::product_button(Self::REMOVE_PREFIX, product);
        self.session.waiter().click(&button).await
    }

    /// Start checkout
    pub async fn checkout(self) -> SwagResult<CheckoutInfoPage> {
        self.session
            .enter(
                Screen::Cart,
                Action::Checkout,
                self.session.waiter().click(&Self::CHECKOUT_BUTTON),
            )
            .await
    }

    /// Back to the listing
    pub async fn continue_shopping(self) -> SwagResult<InventoryPage> {
        self.session
            .enter(
                Screen::Cart,
                Action::ContinueShopping,
                self.session.waiter().click(&Self::CONTINUE_SHOPPING_BUTTON),
            )
            .await
    }
}
