//! Login screen.

use super::{InventoryPage, Page};
use crate::data::Credentials;
use crate::graph::{Action, Screen, Transition};
use crate::locator::Locator;
use crate::result::{SwagError, SwagResult};
use crate::session::Session;
use tracing::info;

/// Credentials form at the site root
#[derive(Debug)]
pub struct LoginPage {
    session: Session,
}

page_object!(LoginPage, Screen::Login);

/// Outcome of submitting the login form
pub type LoginOutcome = Transition<InventoryPage, LoginPage>;

impl LoginPage {
    /// Username input
    pub const USERNAME_FIELD: Locator = Locator::id("user-name");
    /// Password input
    pub const PASSWORD_FIELD: Locator = Locator::id("password");
    /// Submit button
    pub const LOGIN_BUTTON: Locator = Locator::id("login-button");
    /// Validation error banner
    pub const ERROR_MESSAGE: Locator = Locator::css("[data-test='error']");
    /// Close button on the error banner
    pub const ERROR_DISMISS: Locator = Locator::css("[data-test='error-button']");

    /// Navigate to the login screen and wait for the form
    pub async fn open(session: Session) -> SwagResult<Self> {
        session.goto(Screen::Login).await?;
        session.waiter().wait_visible(&Self::LOGIN_BUTTON).await?;
        info!("navigated to login page");
        Ok(Self { session })
    }

    /// Type the username
    pub async fn enter_username(&self, username: &str) -> SwagResult<()> {
        self.session
            .waiter()
            .type_text(&Self::USERNAME_FIELD, username)
            .await
    }

    /// Type the password
    pub async fn enter_password(&self, password: &str) -> SwagResult<()> {
        self.session
            .waiter()
            .type_text(&Self::PASSWORD_FIELD, password)
            .await
    }

    /// Click the login button
    pub async fn click_login_button(&self) -> SwagResult<()> {
        self.session.waiter().click(&Self::LOGIN_BUTTON).await
    }

    /// Fill the form and submit it.
    ///
    /// Moves to the inventory on success. Stays here when the application
    /// shows a validation error.
    pub async fn login(self, username: &str, password: &str) -> SwagResult<LoginOutcome> {
        info!(username, "attempting login");
        self.session
            .clear_error(&Self::ERROR_MESSAGE, &Self::ERROR_DISMISS)
            .await?;
        let perform = async {
            self.enter_username(username).await?;
            self.enter_password(password).await?;
            self.click_login_button().await
        };
        self.session
            .resolve(Screen::Login, Action::Submit, &Self::ERROR_MESSAGE, perform)
            .await
    }

    /// [`Self::login`] with a credentials pair
    pub async fn login_as(self, credentials: Credentials) -> SwagResult<LoginOutcome> {
        self.login(credentials.username, credentials.password).await
    }

    /// Open the inventory URL directly.
    ///
    /// Without a logged-in session the application sends the browser back
    /// here with a restricted-access error.
    pub async fn visit_inventory(self) -> SwagResult<LoginOutcome> {
        self.session
            .resolve(
                Screen::Login,
                Action::Visit,
                &Self::ERROR_MESSAGE,
                self.session.goto(Screen::Inventory),
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

    /// Fail unless the validation error reads `expected`
    pub async fn verify_error_message(&self, expected: &str) -> SwagResult<()> {
        let actual = self.error_message().await?;
        if actual == expected {
            Ok(())
        } else {
            Err(SwagError::assertion(format!(
                "Expected error '{expected}' but got '{actual}'"
            )))
        }
    }

    /// Fail unless the browser shows the login form
    pub async fn verify_on_login_page(&self) -> SwagResult<()> {
        let url = self.current_url().await?;
        if !Screen::Login.matches(&url) {
            return Err(SwagError::assertion(format!(
                "Expected to be on login page ({}), but got {url}",
                self.session.url_of(Screen::Login)
            )));
        }
        if !self.session.waiter().is_visible(&Self::LOGIN_BUTTON).await? {
            return Err(SwagError::assertion("Login button not visible on login page."));
        }
        Ok(())
    }
}
