//! Test data: accounts, catalogue, expected messages and buyer details.

use crate::money::Money;

/// Login credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    /// Username
    pub username: &'static str,
    /// Password
    pub password: &'static str,
}

/// Password shared by every demo account
pub const PASSWORD: &str = "secret_sauce";

/// Accounts of the demo storefront
pub mod users {
    use super::{Credentials, PASSWORD};

    /// Regular shopper
    pub const STANDARD: Credentials = Credentials {
        username: "standard_user",
        password: PASSWORD,
    };

    /// Rejected at login
    pub const LOCKED_OUT: Credentials = Credentials {
        username: "locked_out_user",
        password: PASSWORD,
    };

    /// Logs in, but the storefront misbehaves for it
    pub const PROBLEM: Credentials = Credentials {
        username: "problem_user",
        password: PASSWORD,
    };

    /// Logs in after a deliberate delay
    pub const PERFORMANCE_GLITCH: Credentials = Credentials {
        username: "performance_glitch_user",
        password: PASSWORD,
    };

    /// Accounts that reach the inventory
    pub const ACCEPTED: [Credentials; 3] = [STANDARD, PROBLEM, PERFORMANCE_GLITCH];
}

/// Catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    /// Display name
    pub name: &'static str,
    /// Listed price
    pub price: Money,
}

const fn product(name: &'static str, cents: i64) -> Product {
    Product {
        name,
        price: Money::from_cents(cents),
    }
}

/// Catalogue of the demo storefront
pub mod products {
    use super::{product, Product};

    /// Sauce Labs Backpack
    pub const BACKPACK: Product = product("Sauce Labs Backpack", 2999);
    /// Sauce Labs Bike Light
    pub const BIKE_LIGHT: Product = product("Sauce Labs Bike Light", 999);
    /// Sauce Labs Bolt T-Shirt
    pub const BOLT_T_SHIRT: Product = product("Sauce Labs Bolt T-Shirt", 1599);
    /// Sauce Labs Fleece Jacket
    pub const FLEECE_JACKET: Product = product("Sauce Labs Fleece Jacket", 4999);
    /// Sauce Labs Onesie
    pub const ONESIE: Product = product("Sauce Labs Onesie", 799);
    /// Test.allTheThings() T-Shirt (Red)
    pub const ALL_THE_THINGS_T_SHIRT_RED: Product =
        product("Test.allTheThings() T-Shirt (Red)", 1599);

    /// Every product, in the default (name ascending) order
    pub const ALL: [Product; 6] = [
        BACKPACK,
        BIKE_LIGHT,
        BOLT_T_SHIRT,
        FLEECE_JACKET,
        ONESIE,
        ALL_THE_THINGS_T_SHIRT_RED,
    ];
}

/// Messages rendered by the storefront
pub mod messages {
    /// Login without a username
    pub const USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
    /// Login without a password
    pub const PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";
    /// Unknown user or wrong password
    pub const INVALID_CREDENTIALS: &str =
        "Epic sadface: Username and password do not match any user in this service";
    /// Locked-out account
    pub const LOCKED_OUT_USER: &str = "Epic sadface: Sorry, this user has been locked out.";
    /// Checkout without a first name
    pub const FIRST_NAME_REQUIRED: &str = "Error: First Name is required";
    /// Checkout without a last name
    pub const LAST_NAME_REQUIRED: &str = "Error: Last Name is required";
    /// Checkout without a postal code
    pub const POSTAL_CODE_REQUIRED: &str = "Error: Postal Code is required";
    /// Confirmation header
    pub const THANK_YOU: &str = "Thank you for your order!";
    /// Confirmation body
    pub const ORDER_DISPATCHED: &str =
        "Your order has been dispatched, and will arrive just as fast as the pony can get there!";

    /// Shown on the login page after opening `path` without a session
    #[must_use]
    pub fn restricted_access(path: &str) -> String {
        format!("Epic sadface: You can only access '{path}' when you are logged in.")
    }
}

/// Buyer details for checkout step one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyerInfo {
    /// First name
    pub first_name: &'static str,
    /// Last name
    pub last_name: &'static str,
    /// ZIP / postal code
    pub postal_code: &'static str,
}

/// Buyer details used by the checkout scenarios
pub mod buyers {
    use super::BuyerInfo;

    /// Default buyer
    pub const JOHN_DOE: BuyerInfo = BuyerInfo {
        first_name: "John",
        last_name: "Doe",
        postal_code: "12345",
    };

    /// Second buyer
    pub const JANE_SMITH: BuyerInfo = BuyerInfo {
        first_name: "Jane",
        last_name: "Smith",
        postal_code: "98765",
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_name_ascending() {
        let names: Vec<&str> = products::ALL.iter().map(|p| p.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_restricted_access_message() {
        assert_eq!(
            messages::restricted_access("/inventory.html"),
            "Epic sadface: You can only access '/inventory.html' when you are logged in."
        );
    }

    #[test]
    fn test_accounts_share_password() {
        for user in users::ACCEPTED {
            assert_eq!(user.password, PASSWORD);
        }
        assert_eq!(users::LOCKED_OUT.password, PASSWORD);
    }
}
