//! Product listing.

use super::{CartPage, Page, ProductDetailPage};
use crate::graph::{Action, Screen};
use crate::locator::{xpath_literal, By, Locator};
use crate::money::Money;
use crate::result::{SwagError, SwagResult};
use crate::session::Session;
use crate::wait::WaitCondition;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Sort options of the product dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Name (A to Z)
    NameAsc,
    /// Name (Z to A)
    NameDesc,
    /// Price (low to high)
    PriceAsc,
    /// Price (high to low)
    PriceDesc,
}

impl SortOrder {
    /// All options in dropdown order
    pub const ALL: [Self; 4] = [Self::NameAsc, Self::NameDesc, Self::PriceAsc, Self::PriceDesc];

    /// `<option>` value
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::NameAsc => "az",
            Self::NameDesc => "za",
            Self::PriceAsc => "lohi",
            Self::PriceDesc => "hilo",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for SortOrder {
    type Err = SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.value() == s)
            .ok_or_else(|| SwagError::Parse {
                what: "sort order",
                text: s.to_string(),
            })
    }
}

/// Product listing
#[derive(Debug)]
pub struct InventoryPage {
    session: Session,
}

page_object!(InventoryPage, Screen::Inventory);

impl InventoryPage {
    /// Page title
    pub const TITLE: Locator = Locator::css(".title");
    /// Sort dropdown
    pub const SORT_DROPDOWN: Locator = Locator::class_name("product_sort_container");
    /// Product names
    pub const PRODUCT_NAMES: Locator = Locator::class_name("inventory_item_name");
    /// Product prices
    pub const PRODUCT_PRICES: Locator = Locator::class_name("inventory_item_price");
    /// Id prefix of "Add to cart" buttons
    pub const ADD_TO_CART_PREFIX: &'static str = "add-to-cart-";
    /// Id prefix of "Remove" buttons
    pub const REMOVE_PREFIX: &'static str = "remove-";

    /// "Add to cart" button of `product`
    #[must_use]
    pub fn add_button(product: &str) -> Locator {
        Locator::product_button(Self::ADD_TO_CART_PREFIX, product)
    }

    /// "Remove" button of `product`
    #[must_use]
    pub fn remove_button(product: &str) -> Locator {
        Locator::product_button(Self::REMOVE_PREFIX, product)
    }

    /// Name link of `product`
    #[must_use]
    pub fn product_link(product: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!(
                "//div[contains(@class,'inventory_item_name') and normalize-space()={}]",
                xpath_literal(product)
            ),
        )
    }

    /// Page title text
    pub async fn title(&self) -> SwagResult<String> {
        self.session.waiter().read_text(&Self::TITLE).await
    }

    /// Choose a sort option
    pub async fn sort_by(&self, order: SortOrder) -> SwagResult<()> {
        self.session
            .waiter()
            .select_value(&Self::SORT_DROPDOWN, order.value())
            .await
    }

    /// Product names in display order
    pub async fn product_names(&self) -> SwagResult<Vec<String>> {
        self.session.waiter().read_all_text(&Self::PRODUCT_NAMES).await
    }

    /// Product prices in display order
    pub async fn product_prices(&self) -> SwagResult<Vec<Money>> {
        self.session
            .waiter()
            .read_all_text(&Self::PRODUCT_PRICES)
            .await?
            .iter()
            .map(|text| Money::parse(text))
            .collect()
    }

    /// Click "Add to cart" for `product`
    pub async fn add_to_cart(&self, product: &str) -> SwagResult<()> {
        info!(product, "adding to cart");
        self.session.waiter().click(&Self::add_button(product)).await
    }

    /// Click "Remove" for `product`
    pub async fn remove_from_cart(&self, product: &str) -> SwagResult<()> {
        info!(product, "removing from cart");
        self.session.waiter().click(&Self::remove_button(product)).await
    }

    /// Label of whichever cart button `product` shows; `None` when neither
    /// appears before the timeout
    pub async fn product_button_text(&self, product: &str) -> SwagResult<Option<String>> {
        let add = Self::add_button(product);
        let remove = Self::remove_button(product);
        let driver = self.session.driver();
        let (add_ref, remove_ref) = (&add, &remove);
        let found = self
            .session
            .waiter()
            .until(
                WaitCondition::Visible,
                format!("{add} or {remove}"),
                move || async move {
                    for locator in [add_ref, remove_ref] {
                        let states = driver.probe(locator).await?;
                        if WaitCondition::Visible.holds(&states) {
                            return Ok(states.into_iter().next().map(|s| s.text));
                        }
                    }
                    Ok(None)
                },
            )
            .await;
        match found {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.is_timeout() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Click a product name
    pub async fn open_detail(self, product: &str) -> SwagResult<ProductDetailPage> {
        let link = Self::product_link(product);
        self.session
            .enter(
                Screen::Inventory,
                Action::OpenDetail,
                self.session.waiter().click(&link),
            )
            .await
    }

    /// Click the cart icon
    pub async fn navigate_to_cart(self) -> SwagResult<CartPage> {
        self.header().open_cart().await
    }
}
