//! Single product.

use super::{CartPage, InventoryPage, Page};
use crate::graph::{Action, Screen};
use crate::locator::Locator;
use crate::money::Money;
use crate::result::SwagResult;
use crate::session::Session;

/// Product detail screen
#[derive(Debug)]
pub struct ProductDetailPage {
    session: Session,
}

page_object!(ProductDetailPage, Screen::ProductDetail);

impl ProductDetailPage {
    /// Product name
    pub const PRODUCT_NAME: Locator = Locator::css(".inventory_details_name");
    /// Product description
    pub const PRODUCT_DESCRIPTION: Locator = Locator::css(".inventory_details_desc");
    /// Product price
    pub const PRODUCT_PRICE: Locator = Locator::css(".inventory_details_price");
    /// "Back to products"
    pub const BACK_TO_PRODUCTS: Locator = Locator::id("back-to-products");
    /// "Add to cart"
    pub const ADD_TO_CART: Locator = Locator::css(".btn_primary.btn_inventory");
    /// "Remove"
    pub const REMOVE_FROM_CART: Locator = Locator::css(".btn_secondary.btn_inventory");

    /// Product name
    pub async fn name(&self) -> SwagResult<String> {
        self.session.waiter().read_text(&Self::PRODUCT_NAME).await
    }

    /// Product description
    pub async fn description(&self) -> SwagResult<String> {
        self.session.waiter().read_text(&Self::PRODUCT_DESCRIPTION).await
    }

    /// Product price
    pub async fn price(&self) -> SwagResult<Money> {
        let text = self.session.waiter().read_text(&Self::PRODUCT_PRICE).await?;
        Money::parse(&text)
    }

    /// Click "Add to cart"
    pub async fn add_to_cart(&self) -> SwagResult<()> {
        self.session.waiter().click(&Self::ADD_TO_CART).await
    }

    /// Click "Remove"
    pub async fn remove_from_cart(&self) -> SwagResult<()> {
        self.session.waiter().click(&Self::REMOVE_FROM_CART).await
    }

    /// Whether "Add to cart" is shown
    pub async fn is_add_to_cart_visible(&self) -> SwagResult<bool> {
        self.session.waiter().is_visible(&Self::ADD_TO_CART).await
    }

    /// Whether "Remove" is shown
    pub async fn is_remove_visible(&self) -> SwagResult<bool> {
        self.session.waiter().is_visible(&Self::REMOVE_FROM_CART).await
    }

    /// Back to the listing
    pub async fn back_to_products(self) -> SwagResult<InventoryPage> {
        self.session
            .enter(
                Screen::ProductDetail,
                Action::BackToProducts,
                self.session.waiter().click(&Self::BACK_TO_PRODUCTS),
            )
            .await
    }

    /// Click the cart icon
    pub async fn navigate_to_cart(self) -> SwagResult<CartPage> {
        self.header().open_cart().await
    }
}
