//! Locators: the (strategy, selector) pairs page objects use to address DOM elements.
//!
//! Page objects declare their locators as associated constants. Locators that
//! depend on domain data (product buttons, product name links) are derived
//! through [`slugify`] and [`xpath_literal`], so every call site produces
//! exactly the same identifier for the same product.

use std::borrow::Cow;
use std::fmt;

/// Locator strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum By {
    /// Element `id` attribute
    Id,
    /// CSS selector
    Css,
    /// Single class name
    ClassName,
    /// XPath expression
    XPath,
}

impl By {
    /// Short strategy name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::ClassName => "class",
            Self::XPath => "xpath",
        }
    }
}

/// A query the browser backends understand natively
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeQuery {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
}

/// An immutable strategy + selector pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    by: By,
    selector: Cow<'static, str>,
}

impl Locator {
    /// Locate by `id`
    #[must_use]
    pub const fn id(selector: &'static str) -> Self {
        Self {
            by: By::Id,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self {
            by: By::Css,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locate by class name
    #[must_use]
    pub const fn class_name(selector: &'static str) -> Self {
        Self {
            by: By::ClassName,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locate by XPath
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self {
            by: By::XPath,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locator built at runtime from domain data
    #[must_use]
    pub fn dynamic(by: By, selector: impl Into<String>) -> Self {
        Self {
            by,
            selector: Cow::Owned(selector.into()),
        }
    }

    /// Button whose id is `prefix` followed by the slug of `product`,
    /// e.g. `add-to-cart-sauce-labs-backpack`.
    #[must_use]
    pub fn product_button(prefix: &str, product: &str) -> Self {
        Self::dynamic(By::Id, format!("{prefix}{}", slugify(product)))
    }

    /// Strategy
    #[must_use]
    pub const fn by(&self) -> By {
        self.by
    }

    /// Selector string
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Translate into a CSS or XPath query
    #[must_use]
    pub fn native(&self) -> NativeQuery {
        match self.by {
            By::Id => NativeQuery::Css(format!("[id={}]", css_string(&self.selector))),
            By::Css => NativeQuery::Css(self.selector.to_string()),
            By::ClassName => NativeQuery::Css(format!(".{}", self.selector)),
            By::XPath => NativeQuery::XPath(self.selector.to_string()),
        }
    }

    /// JavaScript expression evaluating to an array of all matching elements
    #[must_use]
    pub fn to_query_all(&self) -> String {
        let literal = js_string(&self.selector);
        match self.by {
            By::Id => format!("[document.getElementById({literal})].filter(Boolean)"),
            By::Css => format!("Array.from(document.querySelectorAll({literal}))"),
            By::ClassName => format!("Array.from(document.getElementsByClassName({literal}))"),
            By::XPath => format!(
                "(function() {{ var r = document.evaluate({literal}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); var out = []; \
                 for (var i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} \
                 return out; }})()"
            ),
        }
    }

    /// JavaScript expression describing every match as an `ElementState`
    #[must_use]
    pub fn probe_script(&self) -> String {
        format!(
            "({query}).map(function(el) {{ \
               var r = el.getBoundingClientRect(); \
               var s = window.getComputedStyle(el); \
               var displayed = r.width > 0 && r.height > 0 && s.visibility !== 'hidden' \
                 && s.display !== 'none' && s.opacity !== '0'; \
               var top = displayed ? document.elementFromPoint(r.left + r.width / 2, r.top + r.height / 2) : null; \
               return {{ \
                 tag: el.tagName.toLowerCase(), \
                 text: el.innerText || '', \
                 displayed: displayed, \
                 enabled: !el.disabled, \
                 obscured: top !== null && top !== el && !el.contains(top) \
               }}; \
             }})",
            query = self.to_query_all()
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.by.as_str(), self.selector)
    }
}

/// Derive the id fragment the storefront uses for a product.
///
/// Lowercase, spaces become hyphens, parentheses and periods are removed.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .replace(['(', ')', '.'], "")
}

/// Quote `text` as an XPath string literal.
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{text}'")
    } else if !text.contains('"') {
        format!("\"{text}\"")
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

fn css_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
