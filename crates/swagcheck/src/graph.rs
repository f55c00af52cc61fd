//! Navigation graph of the storefront.
//!
//! The screens the application can show and the actions that move the browser
//! between them are listed once, in [`EDGES`]. Page objects consult this table
//! whenever an action is expected to navigate. A page object method whose
//! target type disagrees with the table fails with
//! [`SwagError::IllegalTransition`] before the driver is touched.
//!
//! ```text
//!            submit                 open_detail
//!   Login ───────────▶ Inventory ─────────────▶ ProductDetail
//!     ▲                  │   ▲ ▲  back_to_products   │
//!     │ logout (any)     │   │ └─────────────────────┘
//!     │        open_cart │   │ continue_shopping / cancel / back_home
//!     │                  ▼   │
//!     │                 Cart ─┘
//!     │                  │ checkout
//!     │                  ▼
//!     │             CheckoutInfo ──continue──▶ CheckoutOverview ──finish──▶ CheckoutComplete
//! ```

use crate::result::{SwagError, SwagResult};
use std::fmt;

/// Logical screen of the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Credentials form at the site root
    Login,
    /// Product listing
    Inventory,
    /// Single product
    ProductDetail,
    /// Cart contents
    Cart,
    /// Checkout step one: buyer information
    CheckoutInfo,
    /// Checkout step two: order summary
    CheckoutOverview,
    /// Order confirmation
    CheckoutComplete,
}

impl Screen {
    /// All screens
    pub const ALL: [Self; 7] = [
        Self::Login,
        Self::Inventory,
        Self::ProductDetail,
        Self::Cart,
        Self::CheckoutInfo,
        Self::CheckoutOverview,
        Self::CheckoutComplete,
    ];

    /// Path relative to the base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "",
            Self::Inventory => "inventory.html",
            Self::ProductDetail => "inventory-item.html",
            Self::Cart => "cart.html",
            Self::CheckoutInfo => "checkout-step-one.html",
            Self::CheckoutOverview => "checkout-step-two.html",
            Self::CheckoutComplete => "checkout-complete.html",
        }
    }

    /// Absolute URL under `base_url`
    #[must_use]
    pub fn url(self, base_url: &str) -> String {
        if base_url.ends_with('/') {
            format!("{base_url}{}", self.path())
        } else {
            format!("{base_url}/{}", self.path())
        }
    }

    /// Screen shown at `url`. Query string and fragment are ignored.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let end = url.find(['?', '#']).unwrap_or(url.len());
        let without_query = &url[..end];
        let last = without_query.rsplit('/').next().unwrap_or("");
        match last {
            "" | "index.html" => Some(Self::Login),
            other => Self::ALL
                .into_iter()
                .find(|s| !s.path().is_empty() && s.path() == other),
        }
    }

    /// Whether the browser at `url` shows this screen
    #[must_use]
    pub fn matches(self, url: &str) -> bool {
        Self::from_url(url) == Some(self)
    }

    /// Name as written in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Inventory => "Inventory",
            Self::ProductDetail => "ProductDetail",
            Self::Cart => "Cart",
            Self::CheckoutInfo => "CheckoutInfo",
            Self::CheckoutOverview => "CheckoutOverview",
            Self::CheckoutComplete => "CheckoutComplete",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User action that may move the browser to another screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Submit the login form
    Submit,
    /// Click a product name
    OpenDetail,
    /// Click the cart icon
    OpenCart,
    /// Start checkout from the cart
    Checkout,
    /// Submit buyer information
    Continue,
    /// Place the order
    Finish,
    /// Log out through the menu
    Logout,
    /// Menu "All Items"
    AllItems,
    /// Back from a product
    BackToProducts,
    /// Back from the cart
    ContinueShopping,
    /// Abandon a checkout step
    Cancel,
    /// Back from the confirmation
    BackHome,
    /// Open the inventory URL directly
    Visit,
}

impl Action {
    /// Snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::OpenDetail => "open_detail",
            Self::OpenCart => "open_cart",
            Self::Checkout => "checkout",
            Self::Continue => "continue",
            Self::Finish => "finish",
            Self::Logout => "logout",
            Self::AllItems => "all_items",
            Self::BackToProducts => "back_to_products",
            Self::ContinueShopping => "continue_shopping",
            Self::Cancel => "cancel",
            Self::BackHome => "back_home",
            Self::Visit => "visit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One permitted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Source screen; `None` means any screen
    pub from: Option<Screen>,
    /// Action taken
    pub action: Action,
    /// Screen reached on success
    pub to: Screen,
    /// Screen shown when the application rejects the input
    pub rejects_to: Option<Screen>,
}

impl Edge {
    const fn new(from: Option<Screen>, action: Action, to: Screen) -> Self {
        Self {
            from,
            action,
            to,
            rejects_to: None,
        }
    }

    const fn or_rejects_to(mut self, screen: Screen) -> Self {
        self.rejects_to = Some(screen);
        self
    }

    fn applies_to(&self, from: Screen, action: Action) -> bool {
        self.action == action && self.from.map_or(true, |f| f == from)
    }
}

/// Permitted transitions. Screen-specific edges precede wildcard ones.
pub const EDGES: &[Edge] = &[
    Edge::new(Some(Screen::Login), Action::Submit, Screen::Inventory).or_rejects_to(Screen::Login),
    Edge::new(Some(Screen::Inventory), Action::OpenDetail, Screen::ProductDetail),
    Edge::new(Some(Screen::Inventory), Action::OpenCart, Screen::Cart),
    Edge::new(Some(Screen::ProductDetail), Action::OpenCart, Screen::Cart),
    Edge::new(Some(Screen::ProductDetail), Action::BackToProducts, Screen::Inventory),
    Edge::new(Some(Screen::Cart), Action::Checkout, Screen::CheckoutInfo),
    Edge::new(Some(Screen::Cart), Action::ContinueShopping, Screen::Inventory),
    Edge::new(Some(Screen::CheckoutInfo), Action::Continue, Screen::CheckoutOverview)
        .or_rejects_to(Screen::CheckoutInfo),
    Edge::new(Some(Screen::CheckoutInfo), Action::Cancel, Screen::Cart),
    Edge::new(Some(Screen::CheckoutOverview), Action::Finish, Screen::CheckoutComplete),
    Edge::new(Some(Screen::CheckoutOverview), Action::Cancel, Screen::Inventory),
    Edge::new(Some(Screen::CheckoutComplete), Action::BackHome, Screen::Inventory),
    Edge::new(None, Action::Logout, Screen::Login),
    Edge::new(None, Action::AllItems, Screen::Inventory),
    Edge::new(None, Action::Visit, Screen::Inventory).or_rejects_to(Screen::Login),
];

/// Edge taken by `action` on `from`, if any
#[must_use]
pub fn edge(from: Screen, action: Action) -> Option<&'static Edge> {
    EDGES.iter().find(|e| e.applies_to(from, action))
}

/// Check that `action` on `from` leads to `to`, on success or on rejection.
pub fn check(from: Screen, action: Action, to: Screen) -> SwagResult<&'static Edge> {
    edge(from, action)
        .filter(|e| e.to == to || e.rejects_to == Some(to))
        .ok_or(SwagError::IllegalTransition { from, action, to })
}

/// Actions available on `from` and where they lead on success
#[must_use]
pub fn successors(from: Screen) -> Vec<(Action, Screen)> {
    let mut out: Vec<(Action, Screen)> = Vec::new();
    for e in EDGES {
        if e.applies_to(from, e.action) && !out.iter().any(|(a, _)| *a == e.action) {
            out.push((e.action, e.to));
        }
    }
    out
}

/// Outcome of an action that navigates on success and stays put on rejection
#[derive(Debug)]
pub enum Transition<Next, Stay> {
    /// The browser reached the target screen
    Moved(Next),
    /// The application rejected the input; the screen did not change
    Stayed(Stay),
}

impl<Next, Stay> Transition<Next, Stay> {
    /// Whether the browser moved
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }

    /// Target page, if reached
    pub fn moved(self) -> Option<Next> {
        match self {
            Self::Moved(next) => Some(next),
            Self::Stayed(_) => None,
        }
    }

    /// Current page, if the input was rejected
    pub fn stayed(self) -> Option<Stay> {
        match self {
            Self::Moved(_) => None,
            Self::Stayed(stay) => Some(stay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    mod screen_tests {
        use super::*;

        const BASE: &str = "https://www.saucedemo.com/";

        #[test]
        fn test_url_round_trip() {
            for screen in Screen::ALL {
                assert_eq!(Screen::from_url(&screen.url(BASE)), Some(screen));
            }
        }

        #[test]
        fn test_url_ignores_query_and_fragment() {
            let url = "https://www.saucedemo.com/inventory-item.html?id=4";
            assert_eq!(Screen::from_url(url), Some(Screen::ProductDetail));
            assert!(Screen::Cart.matches("https://www.saucedemo.com/cart.html#top"));
        }

        #[test]
        fn test_url_without_trailing_slash() {
            assert_eq!(
                Screen::Inventory.url("https://www.saucedemo.com"),
                "https://www.saucedemo.com/inventory.html"
            );
        }

        #[test]
        fn test_unknown_page_has_no_screen() {
            assert_eq!(Screen::from_url("https://saucelabs.com/about.html"), None);
        }
    }

    mod edge_tests {
        use super::*;

        #[test]
        fn test_table_from_contract() {
            assert!(check(Screen::Login, Action::Submit, Screen::Inventory).is_ok());
            assert!(check(Screen::Login, Action::Submit, Screen::Login).is_ok());
            assert!(check(Screen::Inventory, Action::OpenDetail, Screen::ProductDetail).is_ok());
            assert!(check(Screen::Inventory, Action::OpenCart, Screen::Cart).is_ok());
            assert!(check(Screen::Cart, Action::Checkout, Screen::CheckoutInfo).is_ok());
            assert!(check(Screen::CheckoutInfo, Action::Continue, Screen::CheckoutOverview).is_ok());
            assert!(check(Screen::CheckoutInfo, Action::Continue, Screen::CheckoutInfo).is_ok());
            assert!(check(Screen::CheckoutOverview, Action::Finish, Screen::CheckoutComplete).is_ok());
        }

        #[test]
        fn test_logout_from_every_screen() {
            for screen in Screen::ALL {
                assert_eq!(edge(screen, Action::Logout).map(|e| e.to), Some(Screen::Login));
            }
        }

        #[test]
        fn test_undefined_edge_is_illegal() {
            let err = check(Screen::Cart, Action::Finish, Screen::CheckoutComplete).unwrap_err();
            assert!(matches!(
                err,
                SwagError::IllegalTransition {
                    from: Screen::Cart,
                    action: Action::Finish,
                    ..
                }
            ));
        }

        #[test]
        fn test_wrong_target_is_illegal() {
            assert!(check(Screen::Inventory, Action::OpenCart, Screen::CheckoutInfo).is_err());
            assert!(check(Screen::CheckoutOverview, Action::Finish, Screen::CheckoutOverview).is_err());
        }

        #[test]
        fn test_cancel_depends_on_source() {
            assert_eq!(edge(Screen::CheckoutInfo, Action::Cancel).map(|e| e.to), Some(Screen::Cart));
            assert_eq!(
                edge(Screen::CheckoutOverview, Action::Cancel).map(|e| e.to),
                Some(Screen::Inventory)
            );
            assert!(edge(Screen::Cart, Action::Cancel).is_none());
        }

        #[test]
        fn test_no_duplicate_specific_edges() {
            let mut seen = HashSet::new();
            for e in EDGES {
                assert!(seen.insert((e.from, e.action)), "duplicate edge {e:?}");
            }
        }

        #[test]
        fn test_every_screen_reachable_from_login() {
            let mut reached = HashSet::from([Screen::Login]);
            let mut queue = VecDeque::from([Screen::Login]);
            while let Some(screen) = queue.pop_front() {
                for (_, next) in successors(screen) {
                    if reached.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            assert_eq!(reached.len(), Screen::ALL.len());
        }
    }

    mod transition_tests {
        use super::*;

        #[test]
        fn test_transition_accessors() {
            let moved: Transition<u8, &str> = Transition::Moved(1);
            assert!(moved.is_moved());
            assert_eq!(moved.moved(), Some(1));

            let stayed: Transition<u8, &str> = Transition::Stayed("login");
            assert!(!stayed.is_moved());
            assert_eq!(stayed.stayed(), Some("login"));
        }
    }
}
