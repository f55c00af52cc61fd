//! The three checkout steps.

use super::{CartPage, InventoryPage};
use crate::data::BuyerInfo;
use crate::graph::{Action, Screen, Transition};
use crate::locator::Locator;
use crate::money::Money;
use crate::result::{SwagError, SwagResult};
use crate::session::Session;
use tracing::info;

/// Checkout step one: buyer information
#[derive(Debug)]
pub struct CheckoutInfoPage {
    session: Session,
}

page_object!(CheckoutInfoPage, Screen::CheckoutInfo);

/// Outcome of submitting the buyer information
pub type ContinueOutcome = Transition<CheckoutOverviewPage, CheckoutInfoPage>;

impl CheckoutInfoPage {
    /// First name input
    pub const FIRST_NAME_FIELD: Locator = Locator::id("first-name");
    /// Last name input
    pub const LAST_NAME_FIELD: Locator = Locator::id("last-name");
    /// Postal code input
    pub const POSTAL_CODE_FIELD: Locator = Locator::id("postal-code");
    /// "Continue"
    pub const CONTINUE_BUTTON: Locator = Locator::id("continue");
    /// "Cancel"
    pub const CANCEL_BUTTON: Locator = Locator::id("cancel");
    /// Validation error banner
    pub const ERROR_MESSAGE: Locator = Locator::css("[data-test='error']");
    /// Close button on the error banner
    pub const ERROR_DISMISS: Locator = Locator::css("[data-test='error-button']");

    /// Type all three fields. Empty strings leave a field empty.
    pub async fn fill(&self, first_name: &str, last_name: &str, postal_code: &str) -> SwagResult<()> {
        let waiter = self.session.waiter();
        waiter.type_text(&Self::FIRST_NAME_FIELD, first_name).await?;
        waiter.type_text(&Self::LAST_NAME_FIELD, last_name).await?;
        waiter.type_text(&Self::POSTAL_CODE_FIELD, postal_code).await
    }

    /// [`Self::fill`] from a buyer record
    pub async fn fill_buyer(&self, buyer: &BuyerInfo) -> SwagResult<()> {
        self.fill(buyer.first_name, buyer.last_name, buyer.postal_code)
            .await
    }

    /// Click "Continue".
    ///
    /// Moves to the overview, or stays here when a field is missing.
    pub async fn continue_checkout(self) -> SwagResult<ContinueOutcome> {
        self.session
            .clear_error(&Self::ERROR_MESSAGE, &Self::ERROR_DISMISS)
            .await?;
        self.session
            .resolve(
                Screen::CheckoutInfo,
                Action::Continue,
                &Self::ERROR_MESSAGE,
                self.session.waiter().click(&Self::CONTINUE_BUTTON),
            )
            .await
    }

    /// Abandon checkout, back to the cart
    pub async fn cancel(self) -> SwagResult<CartPage> {
        self.session
            .enter(
                Screen::CheckoutInfo,
                Action::Cancel,
                self.session.waiter().click(&Self::CANCEL_BUTTON),
            )
            .await
    }

    /// Text of the validation error
    pub async fn error_message(&self) -> SwagResult<String> {
        self.session.waiter().read_text(&Self::ERROR_MESSAGE).await
    }

    /// Whether a validation error is shown
    pub async fn is_error_visible(&self) -> SwagResult<bool> {
        self.session.waiter().is_visible(&Self::ERROR_MESSAGE).await
    }
}

/// One line of the order summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Product name
    pub name: String,
    /// Listed price
    pub price: Money,
}

/// Checkout step two: order summary
#[derive(Debug)]
pub struct CheckoutOverviewPage {
    session: Session,
}

page_object!(CheckoutOverviewPage, Screen::CheckoutOverview);

impl CheckoutOverviewPage {
    /// "Finish"
    pub const FINISH_BUTTON: Locator = Locator::id("finish");
    /// "Cancel"
    pub const CANCEL_BUTTON: Locator = Locator::id("cancel");
    /// "Item total: $…"
    pub const ITEM_TOTAL_LABEL: Locator = Locator::css(".summary_subtotal_label");
    /// "Tax: $…"
    pub const TAX_LABEL: Locator = Locator::css(".summary_tax_label");
    /// "Total: $…"
    pub const TOTAL_LABEL: Locator = Locator::css(".summary_total_label");
    /// Order lines
    pub const CART_ITEM_LABELS: Locator = Locator::css(".cart_item_label");
    /// Names inside the order lines
    pub const LINE_NAMES: Locator = Locator::css(".cart_item_label .inventory_item_name");
    /// Prices inside the order lines
    pub const LINE_PRICES: Locator = Locator::css(".cart_item_label .inventory_item_price");

    /// Name and price of every order line
    pub async fn item_details(&self) -> SwagResult<Vec<LineItem>> {
        let waiter = self.session.waiter();
        let lines = waiter.count(&Self::CART_ITEM_LABELS).await?;
        if lines == 0 {
            return Ok(Vec::new());
        }
        let names = waiter.read_all_text(&Self::LINE_NAMES).await?;
        let prices = waiter.read_all_text(&Self::LINE_PRICES).await?;
        if names.len() != lines || prices.len() != lines {
            return Err(SwagError::Parse {
                what: "order lines",
                text: format!("{lines} lines, {} names, {} prices", names.len(), prices.len()),
            });
        }
        names
            .into_iter()
            .zip(prices.iter())
            .map(|(name, price)| -> SwagResult<LineItem> {
                let price = Money::parse(price)?;
                info!(%name, %price, "order line");
                Ok(LineItem { name, price })
            })
            .collect()
    }

    /// "Item total" amount
    pub async fn item_total(&self) -> SwagResult<Money> {
        self.amount(&Self::ITEM_TOTAL_LABEL).await
    }

    /// "Tax" amount
    pub async fn tax(&self) -> SwagResult<Money> {
        self.amount(&Self::TAX_LABEL).await
    }

    /// "Total" amount
    pub async fn total(&self) -> SwagResult<Money> {
        self.amount(&Self::TOTAL_LABEL).await
    }

    async fn amount(&self, label: &Locator) -> SwagResult<Money> {
        let text = self.session.waiter().read_text(label).await?;
        Money::parse(&text)
    }

    /// Place the order
    pub async fn finish(self) -> SwagResult<CheckoutCompletePage> {
        self.session
            .enter(
                Screen::CheckoutOverview,
                Action::Finish,
                self.session.waiter().click(&Self::FINISH_BUTTON),
            )
            .await
    }

    /// Abandon the order, back to the listing
    pub async fn cancel(self) -> SwagResult<InventoryPage> {
        self.session
            .enter(
                Screen::CheckoutOverview,
                Action::Cancel,
                self.session.waiter().click(&Self::CANCEL_BUTTON),
            )
            .await
    }
}

/// Order confirmation
#[derive(Debug)]
pub struct CheckoutCompletePage {
    session: Session,
}

page_object!(CheckoutCompletePage, Screen::CheckoutComplete);

impl CheckoutCompletePage {
    /// Confirmation header
    pub const COMPLETE_HEADER: Locator = Locator::css(".complete-header");
    /// Confirmation body
    pub const COMPLETE_TEXT: Locator = Locator::css(".complete-text");
    /// "Back Home"
    pub const BACK_HOME_BUTTON: Locator = Locator::id("back-to-products");

    /// Confirmation header text
    pub async fn header_text(&self) -> SwagResult<String> {
        self.session.waiter().read_text(&Self::COMPLETE_HEADER).await
    }

    /// Confirmation body text
    pub async fn message_text(&self) -> SwagResult<String> {
        self.session.waiter().read_text(&Self::COMPLETE_TEXT).await
    }

    /// Back to the listing
    pub async fn back_home(self) -> SwagResult<InventoryPage> {
        self.session
            .enter(
                Screen::CheckoutComplete,
                Action::BackHome,
                self.session.waiter().click(&Self::BACK_HOME_BUTTON),
            )
            .await
    }
}
