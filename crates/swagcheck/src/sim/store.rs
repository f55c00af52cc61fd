//! Storefront state and business rules.

use crate::data::{messages, products, users, Product};
use crate::graph::Screen;
use crate::money::Money;
use std::time::Duration;
use tokio::time::Instant;

/// Catalogue entry as the storefront stores it
#[derive(Debug, Clone, Copy)]
pub struct Item {
    /// Numeric id used in detail URLs and title link ids
    pub id: u32,
    /// Suffix of the cart button ids
    pub key: &'static str,
    pub product: Product,
    pub description: &'static str,
}

pub const CATALOGUE: [Item; 6] = [
    Item {
        id: 4,
        key: "sauce-labs-backpack",
        product: products::BACKPACK,
        description: "carry.allTheThings() with the sleek, streamlined Sly Pack that melds \
                      uncompromising style with unequaled laptop and tablet protection.",
    },
    Item {
        id: 0,
        key: "sauce-labs-bike-light",
        product: products::BIKE_LIGHT,
        description: "A red light isn't the desired state in testing but it sure helps when \
                      riding your bike at night. Water-resistant with 3 lighting modes, 1 AAA \
                      battery included.",
    },
    Item {
        id: 1,
        key: "sauce-labs-bolt-t-shirt",
        product: products::BOLT_T_SHIRT,
        description: "Get your testing superhero on with the Sauce Labs bolt T-shirt. From \
                      American Apparel, 100% ringspun combed cotton, heather gray with red bolt.",
    },
    Item {
        id: 5,
        key: "sauce-labs-fleece-jacket",
        product: products::FLEECE_JACKET,
        description: "It's not every day that you come across a midweight quarter-zip fleece \
                      jacket capable of handling everything from a relaxing day outdoors to a \
                      busy day at the office.",
    },
    Item {
        id: 2,
        key: "sauce-labs-onesie",
        product: products::ONESIE,
        description: "Rib snap infant onesie for the junior automation engineer in development. \
                      Reinforced 3-snap bottom closure, two-needle hemmed sleeved and bottom \
                      won't unravel.",
    },
    Item {
        id: 3,
        key: "test.allthethings()-t-shirt-(red)",
        product: products::ALL_THE_THINGS_T_SHIRT_RED,
        description: "This classic Sauce Labs t-shirt is perfect to wear when cookin' or \
                      relaxin'. Made in American Apparel, 100% ringspun combed cotton.",
    },
];

/// Look up a catalogue item by id
pub fn item(id: u32) -> Option<&'static Item> {
    CATALOGUE.iter().find(|i| i.id == id)
}

/// Where the browser is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Screen(Screen),
    Detail(u32),
    External(String),
}

impl Route {
    pub fn url(&self, base: &str) -> String {
        match self {
            Self::Screen(screen) => screen.url(base),
            Self::Detail(id) => format!("{}?id={id}", Screen::ProductDetail.url(base)),
            Self::External(url) => url.clone(),
        }
    }

    const fn screen(&self) -> Option<Screen> {
        match self {
            Self::Screen(screen) => Some(*screen),
            Self::Detail(_) => Some(Screen::ProductDetail),
            Self::External(_) => None,
        }
    }
}

/// Text inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
    FirstName,
    LastName,
    PostalCode,
}

impl Field {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "user-name" => Some(Self::Username),
            "password" => Some(Self::Password),
            "first-name" => Some(Self::FirstName),
            "last-name" => Some(Self::LastName),
            "postal-code" => Some(Self::PostalCode),
            _ => None,
        }
    }
}

/// What a click does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Login,
    DismissError,
    AddToCart(u32),
    RemoveFromCart(u32),
    OpenDetail(u32),
    OpenCart,
    Checkout,
    ContinueShopping,
    ContinueCheckout,
    CancelInfo,
    CancelOverview,
    Finish,
    BackToProducts,
    BackHome,
    OpenMenu,
    CloseMenu,
    AllItems,
    About,
    Logout,
    ResetAppState,
}

/// Sort applied to the product list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl Sort {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "az" => Some(Self::NameAsc),
            "za" => Some(Self::NameDesc),
            "lohi" => Some(Self::PriceAsc),
            "hilo" => Some(Self::PriceDesc),
            _ => None,
        }
    }

    /// Catalogue in this order; ties keep name order
    pub fn apply(self) -> Vec<&'static Item> {
        let mut items: Vec<&'static Item> = CATALOGUE.iter().collect();
        items.sort_by(|a, b| a.product.name.cmp(b.product.name));
        match self {
            Self::NameAsc => {}
            Self::NameDesc => items.reverse(),
            Self::PriceAsc => items.sort_by_key(|i| i.product.price),
            Self::PriceDesc => items.sort_by(|a, b| b.product.price.cmp(&a.product.price)),
        }
        items
    }
}

/// Timing knobs of the simulated storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOptions {
    /// Delay before a freshly rendered region becomes visible
    pub render_delay: Duration,
    /// Login delay of `performance_glitch_user`
    pub glitch_delay: Duration,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            render_delay: Duration::from_millis(250),
            glitch_delay: Duration::from_secs(3),
        }
    }
}

impl SimOptions {
    /// Regions render immediately; the glitch delay is kept
    #[must_use]
    pub fn instant() -> Self {
        Self {
            render_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Set the render delay
    #[must_use]
    pub const fn with_render_delay(mut self, delay: Duration) -> Self {
        self.render_delay = delay;
        self
    }
}

#[derive(Debug, Default)]
pub struct Fields {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

impl Fields {
    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::PostalCode => &mut self.postal_code,
        }
    }
}

/// Whole browser + application state
#[derive(Debug)]
pub struct Storefront {
    pub options: SimOptions,
    pub route: Route,
    /// `session-username` cookie
    pub user: Option<String>,
    /// `cart-contents` in local storage; survives logout
    pub cart: Vec<u32>,
    pub fields: Fields,
    pub error: Option<String>,
    pub sort: Sort,
    pub menu_open: bool,
    menu_changed: Option<Instant>,
    page_settles: Instant,
    badge_settles: Instant,
    pending: Option<(Instant, Route)>,
    pub closed: bool,
}

impl Storefront {
    pub fn new(options: SimOptions) -> Self {
        let now = Instant::now();
        Self {
            options,
            route: Route::External("about:blank".to_string()),
            user: None,
            cart: Vec::new(),
            fields: Fields::default(),
            error: None,
            sort: Sort::default(),
            menu_open: false,
            menu_changed: None,
            page_settles: now,
            badge_settles: now,
            pending: None,
            closed: false,
        }
    }

    /// Apply a delayed navigation that has come due
    pub fn tick(&mut self, now: Instant) {
        if let Some((at, _)) = &self.pending {
            if now >= *at {
                if let Some((_, route)) = self.pending.take() {
                    self.navigate(route, now);
                }
            }
        }
    }

    pub fn navigate(&mut self, route: Route, now: Instant) {
        self.route = route;
        self.fields = Fields::default();
        self.error = None;
        self.sort = Sort::default();
        self.menu_open = false;
        self.menu_changed = None;
        self.page_settles = now + self.options.render_delay;
        self.badge_settles = self.page_settles;
    }

    /// Open `route` as if typed into the address bar
    pub fn visit(&mut self, route: Route, now: Instant) {
        self.pending = None;
        let protected = route.screen().is_some_and(|s| s != Screen::Login);
        if protected && self.user.is_none() {
            let path = format!("/{}", route.screen().map_or("", Screen::path));
            self.navigate(Route::Screen(Screen::Login), now);
            self.error = Some(messages::restricted_access(&path));
        } else {
            self.navigate(route, now);
        }
    }

    pub fn page_visible(&self, now: Instant) -> bool {
        now >= self.page_settles
    }

    pub fn badge_visible(&self, now: Instant) -> bool {
        self.page_visible(now) && now >= self.badge_settles
    }

    /// Menu panel is on screen (fully open, or still sliding out)
    pub fn menu_visible(&self, now: Instant) -> bool {
        let settled = self
            .menu_changed
            .map_or(true, |t| now >= t + self.options.render_delay);
        if self.menu_open {
            settled
        } else {
            !settled
        }
    }

    /// Menu overlay covers the page
    pub fn menu_covers_page(&self, now: Instant) -> bool {
        self.menu_open || self.menu_visible(now)
    }

    pub fn cart_total(&self) -> Money {
        self.cart_items().map(|i| i.product.price).sum()
    }

    pub fn cart_items(&self) -> impl Iterator<Item = &'static Item> + '_ {
        self.cart.iter().filter_map(|id| item(*id))
    }

    fn cart_changed(&mut self, now: Instant) {
        self.badge_settles = now + self.options.render_delay;
    }

    /// Dispatch a click
    pub fn run(&mut self, command: Command, now: Instant) {
        use Command as C;
        match command {
            C::Login => self.login(now),
            C::DismissError => self.error = None,
            C::AddToCart(id) => {
                if !self.cart.contains(&id) {
                    self.cart.push(id);
                }
                self.cart_changed(now);
            }
            C::RemoveFromCart(id) => {
                self.cart.retain(|c| *c != id);
                self.cart_changed(now);
            }
            C::OpenDetail(id) => self.navigate(Route::Detail(id), now),
            C::OpenCart | C::CancelInfo => self.navigate(Route::Screen(Screen::Cart), now),
            C::Checkout => self.navigate(Route::Screen(Screen::CheckoutInfo), now),
            C::ContinueShopping
            | C::CancelOverview
            | C::BackToProducts
            | C::BackHome
            | C::AllItems => self.navigate(Route::Screen(Screen::Inventory), now),
            C::ContinueCheckout => self.continue_checkout(now),
            C::Finish => {
                self.cart.clear();
                self.navigate(Route::Screen(Screen::CheckoutComplete), now);
            }
            C::OpenMenu => {
                self.menu_open = true;
                self.menu_changed = Some(now);
            }
            C::CloseMenu => {
                self.menu_open = false;
                self.menu_changed = Some(now);
            }
            C::About => self.navigate(Route::External("https://saucelabs.com/".to_string()), now),
            C::Logout => {
                self.user = None;
                self.navigate(Route::Screen(Screen::Login), now);
            }
            C::ResetAppState => {
                self.cart.clear();
                self.cart_changed(now);
            }
        }
    }

    fn login(&mut self, now: Instant) {
        self.error = None;
        let username = self.fields.username.clone();
        let password = &self.fields.password;
        let known = [
            users::STANDARD,
            users::LOCKED_OUT,
            users::PROBLEM,
            users::PERFORMANCE_GLITCH,
        ]
        .iter()
        .any(|u| u.username == username && u.password == password);

        let error = if username.is_empty() {
            Some(messages::USERNAME_REQUIRED)
        } else if password.is_empty() {
            Some(messages::PASSWORD_REQUIRED)
        } else if !known {
            Some(messages::INVALID_CREDENTIALS)
        } else if username == users::LOCKED_OUT.username {
            Some(messages::LOCKED_OUT_USER)
        } else {
            None
        };

        if let Some(message) = error {
            self.error = Some(message.to_string());
            return;
        }
        let glitch = username == users::PERFORMANCE_GLITCH.username;
        self.user = Some(username);
        let inventory = Route::Screen(Screen::Inventory);
        if glitch {
            self.pending = Some((now + self.options.glitch_delay, inventory));
        } else {
            self.navigate(inventory, now);
        }
    }

    fn continue_checkout(&mut self, now: Instant) {
        self.error = None;
        let fields = &self.fields;
        let error = if fields.first_name.is_empty() {
            Some(messages::FIRST_NAME_REQUIRED)
        } else if fields.last_name.is_empty() {
            Some(messages::LAST_NAME_REQUIRED)
        } else if fields.postal_code.is_empty() {
            Some(messages::POSTAL_CODE_REQUIRED)
        } else {
            None
        };
        match error {
            Some(message) => self.error = Some(message.to_string()),
            None => self.navigate(Route::Screen(Screen::CheckoutOverview), now),
        }
    }
}

/// Sales tax on `item_total`: 8%, rounded to the cent
pub fn tax(item_total: Money) -> Money {
    Money::from_cents((item_total.cents() * 8 + 50) / 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Storefront {
        let mut store = Storefront::new(SimOptions::instant());
        store.visit(Route::Screen(Screen::Login), Instant::now());
        store
    }

    fn login(store: &mut Storefront, username: &str, password: &str) {
        store.fields.username = username.to_string();
        store.fields.password = password.to_string();
        store.run(Command::Login, Instant::now());
    }

    #[test]
    fn test_catalogue_matches_test_data() {
        assert_eq!(CATALOGUE.len(), products::ALL.len());
        for product in products::ALL {
            assert!(CATALOGUE.iter().any(|i| i.product == product));
        }
    }

    #[test]
    fn test_sort_orders() {
        let names = |sort: Sort| -> Vec<&str> { sort.apply().iter().map(|i| i.product.name).collect() };
        assert_eq!(names(Sort::NameAsc)[0], "Sauce Labs Backpack");
        assert_eq!(names(Sort::NameDesc)[0], "Test.allTheThings() T-Shirt (Red)");
        assert_eq!(names(Sort::PriceAsc)[0], "Sauce Labs Onesie");
        assert_eq!(names(Sort::PriceDesc)[0], "Sauce Labs Fleece Jacket");
    }

    #[test]
    fn test_tax_rounds_to_cent() {
        assert_eq!(tax(Money::from_cents(7998)), Money::from_cents(640));
        assert_eq!(tax(Money::from_cents(2999)), Money::from_cents(240));
    }

    #[test]
    fn test_login_rules() {
        let mut s = store();
        login(&mut s, "", "");
        assert_eq!(s.error.as_deref(), Some(messages::USERNAME_REQUIRED));
        login(&mut s, "standard_user", "");
        assert_eq!(s.error.as_deref(), Some(messages::PASSWORD_REQUIRED));
        login(&mut s, "locked_out_user", "wrong");
        assert_eq!(s.error.as_deref(), Some(messages::INVALID_CREDENTIALS));
        login(&mut s, "locked_out_user", "secret_sauce");
        assert_eq!(s.error.as_deref(), Some(messages::LOCKED_OUT_USER));
        assert_eq!(s.route, Route::Screen(Screen::Login));
        login(&mut s, "standard_user", "secret_sauce");
        assert_eq!(s.route, Route::Screen(Screen::Inventory));
        assert_eq!(s.error, None);
    }

    #[test]
    fn test_slow_login_clears_previous_error() {
        let mut s = store();
        let start = Instant::now();
        login(&mut s, "performance_glitch_user", "wrong");
        assert_eq!(s.error.as_deref(), Some(messages::INVALID_CREDENTIALS));
        s.fields.username = "performance_glitch_user".to_string();
        s.fields.password = "secret_sauce".to_string();
        s.run(Command::Login, start);
        assert_eq!(s.error, None);
        assert_eq!(s.route, Route::Screen(Screen::Login));
        s.tick(start + s.options.glitch_delay);
        assert_eq!(s.route, Route::Screen(Screen::Inventory));
    }

    #[test]
    fn test_continue_clears_previous_error() {
        let mut s = store();
        login(&mut s, "standard_user", "secret_sauce");
        s.run(Command::Checkout, Instant::now());
        s.run(Command::ContinueCheckout, Instant::now());
        assert_eq!(s.error.as_deref(), Some(messages::FIRST_NAME_REQUIRED));
        s.fields.first_name = "John".to_string();
        s.fields.last_name = "Doe".to_string();
        s.fields.postal_code = "12345".to_string();
        s.run(Command::ContinueCheckout, Instant::now());
        assert_eq!(s.error, None);
    }

    #[test]
    fn test_render_delay_option() {
        let options = SimOptions::instant().with_render_delay(Duration::from_millis(40));
        assert_eq!(options.render_delay, Duration::from_millis(40));
        assert_eq!(options.glitch_delay, SimOptions::default().glitch_delay);

        let mut s = Storefront::new(options);
        let start = Instant::now();
        s.run(Command::OpenMenu, start);
        assert!(!s.menu_visible(start + Duration::from_millis(20)));
        assert!(s.menu_visible(start + Duration::from_millis(40)));
    }

    #[test]
    fn test_restricted_access_redirects() {
        let mut s = store();
        s.visit(Route::Screen(Screen::Cart), Instant::now());
        assert_eq!(s.route, Route::Screen(Screen::Login));
        assert_eq!(s.error, Some(messages::restricted_access("/cart.html")));
    }

    #[test]
    fn test_cart_survives_logout() {
        let mut s = store();
        login(&mut s, "standard_user", "secret_sauce");
        s.run(Command::AddToCart(4), Instant::now());
        s.run(Command::AddToCart(4), Instant::now());
        s.run(Command::AddToCart(5), Instant::now());
        s.run(Command::Logout, Instant::now());
        assert_eq!(s.user, None);
        assert_eq!(s.cart, vec![4, 5]);
        assert_eq!(s.cart_total(), Money::from_cents(7998));
    }

    #[test]
    fn test_checkout_rules() {
        let mut s = store();
        login(&mut s, "standard_user", "secret_sauce");
        s.run(Command::Checkout, Instant::now());
        s.fields.first_name = "John".to_string();
        s.run(Command::ContinueCheckout, Instant::now());
        assert_eq!(s.error.as_deref(), Some(messages::LAST_NAME_REQUIRED));
        s.fields.last_name = "Doe".to_string();
        s.run(Command::ContinueCheckout, Instant::now());
        assert_eq!(s.error.as_deref(), Some(messages::POSTAL_CODE_REQUIRED));
        s.fields.postal_code = "12345".to_string();
        s.run(Command::ContinueCheckout, Instant::now());
        assert_eq!(s.route, Route::Screen(Screen::CheckoutOverview));
    }

    #[test]
    fn test_menu_slides() {
        let mut s = Storefront::new(SimOptions::default());
        let start = Instant::now();
        s.run(Command::OpenMenu, start);
        assert!(!s.menu_visible(start));
        assert!(s.menu_covers_page(start));
        let later = start + Duration::from_millis(300);
        assert!(s.menu_visible(later));
        s.run(Command::CloseMenu, later);
        assert!(s.menu_visible(later));
        assert!(!s.menu_visible(later + Duration::from_millis(300)));
        assert!(!s.menu_covers_page(later + Duration::from_millis(300)));
    }
}
