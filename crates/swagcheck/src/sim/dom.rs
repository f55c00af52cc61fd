//! Minimal DOM: a node tree plus the selector subset the page objects use.
//!
//! Supported queries:
//!
//! | Strategy | Form |
//! |---|---|
//! | id | exact `id` |
//! | class | one class name |
//! | css | compound selectors (`tag#id.class[attr='v']`) joined by descendant combinators |
//! | xpath | `//tag[...]` and `/tag[...]` steps; predicates `@a='v'`, `contains(@a,'v')`, `normalize-space()='v'`, `text()='v'`, joined by `and` |

use super::store::Command;
use crate::locator::{By, Locator};
use crate::result::{SwagError, SwagResult};
use regex::Regex;
use std::sync::OnceLock;

/// Render group of a node; each group settles independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// Page body, settles after navigation
    Page,
    /// Cart badge, settles after a cart change
    Badge,
    /// Burger menu, slides in and out
    Menu,
}

/// One element
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<&'static str>,
    pub attrs: Vec<(&'static str, String)>,
    pub text: String,
    pub children: Vec<Node>,
    pub group: Option<Group>,
    pub hidden: bool,
    pub disabled: bool,
    pub on_click: Option<Command>,
}

impl Node {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            group: None,
            hidden: false,
            disabled: false,
            on_click: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Space-separated class list
    pub fn class(mut self, classes: &'static str) -> Self {
        self.classes.extend(classes.split_whitespace());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn maybe(mut self, child: Option<Node>) -> Self {
        self.children.extend(child);
        self
    }

    pub const fn group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub const fn on_click(mut self, command: Command) -> Self {
        self.on_click = Some(command);
        self
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" => (!self.classes.is_empty()).then(|| self.classes.join(" ")),
            _ => self
                .attrs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone()),
        }
    }

    /// Text as `innerText` would report it
    pub fn inner_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.text.is_empty() {
            parts.push(self.text.clone());
        }
        parts.extend(
            self.children
                .iter()
                .map(Self::inner_text)
                .filter(|t| !t.is_empty()),
        );
        parts.join("\n")
    }
}

/// A node of the flattened tree
#[derive(Debug)]
pub struct Entry<'a> {
    pub node: &'a Node,
    pub parent: Option<usize>,
    pub group: Group,
    pub hidden: bool,
}

/// Document-order view of a tree
#[derive(Debug)]
pub struct Dom<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> Dom<'a> {
    pub fn new(root: &'a Node) -> Self {
        let mut entries = Vec::new();
        flatten(root, None, Group::Page, false, &mut entries);
        Self { entries }
    }

    pub fn entry(&self, index: usize) -> &Entry<'a> {
        &self.entries[index]
    }

    /// Indices of every node matching `query`, in document order
    pub fn select(&self, query: &Query) -> Vec<usize> {
        match query {
            Query::Css(chain) => (0..self.entries.len())
                .filter(|&i| self.matches_chain(i, chain))
                .collect(),
            Query::XPath(steps) => self.select_xpath(steps),
        }
    }

    /// Command of the node or its nearest ancestor that has one
    pub fn command_for(&self, index: usize) -> Option<Command> {
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            if let Some(command) = self.entries[i].node.on_click {
                return Some(command);
            }
            cursor = self.entries[i].parent;
        }
        None
    }

    fn is_ancestor(&self, ancestor: usize, mut index: usize) -> bool {
        while let Some(parent) = self.entries[index].parent {
            if parent == ancestor {
                return true;
            }
            index = parent;
        }
        false
    }

    fn matches_chain(&self, index: usize, chain: &[Compound]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        if !last.matches(self.entries[index].node) {
            return false;
        }
        let mut cursor = self.entries[index].parent;
        for compound in rest.iter().rev() {
            loop {
                let Some(i) = cursor else {
                    return false;
                };
                cursor = self.entries[i].parent;
                if compound.matches(self.entries[i].node) {
                    break;
                }
            }
        }
        true
    }

    fn select_xpath(&self, steps: &[Step]) -> Vec<usize> {
        let mut context: Option<Vec<usize>> = None;
        for step in steps {
            let selected: Vec<usize> = (0..self.entries.len())
                .filter(|&i| step.test(self.entries[i].node))
                .filter(|&i| match (&context, step.descendant) {
                    (None, true) => true,
                    (None, false) => self.entries[i].parent.is_none(),
                    (Some(ctx), true) => ctx.iter().any(|&c| self.is_ancestor(c, i)),
                    (Some(ctx), false) => self.entries[i]
                        .parent
                        .is_some_and(|p| ctx.contains(&p)),
                })
                .collect();
            context = Some(selected);
        }
        context.unwrap_or_default()
    }
}

fn flatten<'a>(
    node: &'a Node,
    parent: Option<usize>,
    group: Group,
    hidden: bool,
    out: &mut Vec<Entry<'a>>,
) {
    let group = node.group.unwrap_or(group);
    let hidden = hidden || node.hidden;
    let index = out.len();
    out.push(Entry {
        node,
        parent,
        group,
        hidden,
    });
    for child in &node.children {
        flatten(child, Some(index), group, hidden, out);
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// Parsed locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Descendant chain of compound selectors
    Css(Vec<Compound>),
    /// Location path
    XPath(Vec<Step>),
}

impl Query {
    pub fn parse(locator: &Locator) -> SwagResult<Self> {
        let selector = locator.selector();
        match locator.by() {
            By::Id => Ok(Self::Css(vec![Compound {
                id: Some(selector.to_string()),
                ..Compound::default()
            }])),
            By::ClassName => Ok(Self::Css(vec![Compound {
                classes: vec![selector.to_string()],
                ..Compound::default()
            }])),
            By::Css => parse_css(selector).map(Self::Css),
            By::XPath => parse_xpath(selector).map(Self::XPath),
        }
    }
}

/// `tag#id.class[attr='value']`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        self.tag.as_deref().map_or(true, |t| t == node.tag)
            && self
                .id
                .as_deref()
                .map_or(true, |id| node.id.as_deref() == Some(id))
            && self
                .classes
                .iter()
                .all(|c| node.classes.iter().any(|n| *n == c.as_str()))
            && self
                .attrs
                .iter()
                .all(|(name, value)| node.attribute(name).as_deref() == Some(value.as_str()))
    }
}

/// One XPath step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    descendant: bool,
    tag: Option<String>,
    predicates: Vec<Predicate>,
}

impl Step {
    fn test(&self, node: &Node) -> bool {
        self.tag.as_deref().map_or(true, |t| t == node.tag)
            && self.predicates.iter().all(|p| p.holds(node))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    AttrEquals(String, String),
    AttrContains(String, String),
    TextEquals(String),
    NormalizedTextEquals(String),
}

impl Predicate {
    fn holds(&self, node: &Node) -> bool {
        match self {
            Self::AttrEquals(name, value) => node.attribute(name).as_deref() == Some(value.as_str()),
            Self::AttrContains(name, value) => {
                node.attribute(name).is_some_and(|a| a.contains(value.as_str()))
            }
            Self::TextEquals(value) => node.text == *value,
            Self::NormalizedTextEquals(value) => normalize_space(&node.inner_text()) == *value,
        }
    }
}

fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn invalid(selector: &str, message: &str) -> SwagError {
    SwagError::InvalidSelector {
        selector: selector.to_string(),
        message: message.to_string(),
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("selector pattern compiles"))
}

fn compound_token() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(
        &CELL,
        r#"^(?:#([\w-]+)|\.([\w-]+)|\[\s*([\w-]+)\s*=\s*(?:'([^']*)'|"([^"]*)"|([\w-]+))\s*\])"#,
    )
}

fn parse_css(selector: &str) -> SwagResult<Vec<Compound>> {
    let chain: Vec<Compound> = split_outside_brackets(selector)
        .into_iter()
        .map(|part| parse_compound(selector, part))
        .collect::<SwagResult<_>>()?;
    if chain.is_empty() {
        return Err(invalid(selector, "empty selector"));
    }
    Ok(chain)
}

fn split_outside_brackets(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in selector.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if c.is_whitespace() && depth == 0 => {
                if start < i {
                    parts.push(&selector[start..i]);
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if start < selector.len() {
        parts.push(&selector[start..]);
    }
    parts
}

fn parse_compound(selector: &str, part: &str) -> SwagResult<Compound> {
    let mut compound = Compound::default();
    let tag_len = part
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '*'))
        .unwrap_or(part.len());
    let tag = &part[..tag_len];
    if !tag.is_empty() && tag != "*" {
        compound.tag = Some(tag.to_lowercase());
    }
    let mut rest = &part[tag_len..];
    while !rest.is_empty() {
        let caps = compound_token()
            .captures(rest)
            .ok_or_else(|| invalid(selector, "unsupported CSS syntax"))?;
        if let Some(id) = caps.get(1) {
            compound.id = Some(id.as_str().to_string());
        } else if let Some(class) = caps.get(2) {
            compound.classes.push(class.as_str().to_string());
        } else if let Some(name) = caps.get(3) {
            let value = caps
                .get(4)
                .or_else(|| caps.get(5))
                .or_else(|| caps.get(6))
                .map_or("", |m| m.as_str());
            compound.attrs.push((name.as_str().to_string(), value.to_string()));
        }
        rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
    }
    Ok(compound)
}

fn xpath_step() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"^(//|/)([A-Za-z*][\w-]*)(?:\[((?:[^\[\]'\x22]|'[^']*'|\x22[^\x22]*\x22)*)\])?")
}

fn predicate_patterns() -> &'static [Regex; 3] {
    static CELL: OnceLock<[Regex; 3]> = OnceLock::new();
    CELL.get_or_init(|| {
        let literal = r#"(?:'([^']*)'|"([^"]*)")"#;
        [
            Regex::new(&format!(r"^@([\w-]+)\s*=\s*{literal}$")),
            Regex::new(&format!(r"^contains\(\s*@([\w-]+)\s*,\s*{literal}\s*\)$")),
            Regex::new(&format!(
                r"^(normalize-space\(\s*\.?\s*\)|text\(\))\s*=\s*{literal}$"
            )),
        ]
        .map(|r| r.expect("predicate pattern compiles"))
    })
}

fn parse_xpath(selector: &str) -> SwagResult<Vec<Step>> {
    let mut steps = Vec::new();
    let mut rest = selector.trim();
    while !rest.is_empty() {
        let caps = xpath_step()
            .captures(rest)
            .ok_or_else(|| invalid(selector, "unsupported XPath syntax"))?;
        let tag = &caps[2];
        let predicates = match caps.get(3) {
            Some(body) => split_and(body.as_str())
                .into_iter()
                .map(|p| parse_predicate(selector, p))
                .collect::<SwagResult<Vec<_>>>()?,
            None => Vec::new(),
        };
        steps.push(Step {
            descendant: &caps[1] == "//",
            tag: (tag != "*").then(|| tag.to_string()),
            predicates,
        });
        rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
    }
    if steps.is_empty() {
        return Err(invalid(selector, "empty XPath"));
    }
    Ok(steps)
}

fn split_and(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < body.len() {
        let c = bytes[i] as char;
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if bytes[i..].starts_with(b" and ") => {
                parts.push(body[start..i].trim());
                i += " and ".len();
                start = i;
                continue;
            }
            None => {}
        }
        i += 1;
    }
    parts.push(body[start..].trim());
    parts
}

fn parse_predicate(selector: &str, text: &str) -> SwagResult<Predicate> {
    let [attr_eq, attr_contains, text_eq] = predicate_patterns();
    let literal = |caps: &regex::Captures<'_>, first: usize| {
        caps.get(first)
            .or_else(|| caps.get(first + 1))
            .map_or(String::new(), |m| m.as_str().to_string())
    };
    if let Some(caps) = attr_eq.captures(text) {
        return Ok(Predicate::AttrEquals(caps[1].to_string(), literal(&caps, 2)));
    }
    if let Some(caps) = attr_contains.captures(text) {
        return Ok(Predicate::AttrContains(caps[1].to_string(), literal(&caps, 2)));
    }
    if let Some(caps) = text_eq.captures(text) {
        let value = literal(&caps, 2);
        return Ok(if caps[1].starts_with("text") {
            Predicate::TextEquals(value)
        } else {
            Predicate::NormalizedTextEquals(value)
        });
    }
    Err(invalid(selector, "unsupported XPath predicate"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page() -> Node {
        Node::new("div").id("root").children([
            Node::new("div")
                .id("shopping_cart_container")
                .class("shopping_cart_container")
                .child(
                    Node::new("span")
                        .class("shopping_cart_badge")
                        .attr("data-test", "shopping-cart-badge")
                        .text("2")
                        .group(Group::Badge),
                ),
            Node::new("div").class("cart_item_label").children([
                Node::new("div").class("inventory_item_name ").text("Sauce Labs Backpack"),
                Node::new("div").class("inventory_item_price").text("$29.99"),
            ]),
            Node::new("div").class("inventory_item_name").text("Sauce Labs Onesie"),
            Node::new("h3")
                .attr("data-test", "error")
                .text("Epic sadface: Username is required")
                .hidden(true),
        ])
    }

    fn select(root: &Node, by: By, selector: &str) -> Vec<String> {
        let dom = Dom::new(root);
        let query = Query::parse(&Locator::dynamic(by, selector)).unwrap();
        dom.select(&query)
            .into_iter()
            .map(|i| dom.entry(i).node.inner_text())
            .collect()
    }

    mod css_tests {
        use super::*;

        #[test]
        fn test_class_and_id() {
            let root = page();
            assert_eq!(select(&root, By::ClassName, "inventory_item_name").len(), 2);
            assert_eq!(select(&root, By::Id, "shopping_cart_container"), vec!["2"]);
        }

        #[test]
        fn test_attribute_selector() {
            let root = page();
            assert_eq!(
                select(&root, By::Css, "[data-test='error']"),
                vec!["Epic sadface: Username is required"]
            );
        }

        #[test]
        fn test_descendant_combinator() {
            let root = page();
            assert_eq!(
                select(&root, By::Css, ".cart_item_label .inventory_item_name"),
                vec!["Sauce Labs Backpack"]
            );
        }

        #[test]
        fn test_compound_classes() {
            let root = Node::new("div").children([
                Node::new("button").class("btn btn_primary btn_small btn_inventory").text("Add to cart"),
                Node::new("button").class("btn btn_secondary btn_inventory").text("Remove"),
            ]);
            assert_eq!(
                select(&root, By::Css, ".btn_primary.btn_inventory"),
                vec!["Add to cart"]
            );
            assert_eq!(select(&root, By::Css, "button.btn_secondary"), vec!["Remove"]);
        }

        #[test]
        fn test_unsupported_css_is_invalid_selector() {
            let err = Query::parse(&Locator::css("div > span")).unwrap_err();
            assert!(matches!(err, SwagError::InvalidSelector { .. }));
        }
    }

    mod xpath_tests {
        use super::*;

        #[test]
        fn test_attribute_equality() {
            let root = page();
            assert_eq!(
                select(&root, By::XPath, "//span[@class='shopping_cart_badge']"),
                vec!["2"]
            );
        }

        #[test]
        fn test_contains_and_normalize_space() {
            let root = page();
            let found = select(
                &root,
                By::XPath,
                "//div[contains(@class,'inventory_item_name') and normalize-space()='Sauce Labs Backpack']",
            );
            assert_eq!(found, vec!["Sauce Labs Backpack"]);
        }

        #[test]
        fn test_double_quoted_literal() {
            let root = Node::new("div").child(Node::new("a").text("Bob's"));
            assert_eq!(select(&root, By::XPath, "//a[text()=\"Bob's\"]"), vec!["Bob's"]);
        }

        #[test]
        fn test_child_step() {
            let root = page();
            assert_eq!(
                select(&root, By::XPath, "//div[@id='shopping_cart_container']/span"),
                vec!["2"]
            );
            assert!(select(&root, By::XPath, "//div[@id='root']/span").is_empty());
        }

        #[test]
        fn test_unsupported_predicate() {
            let err = Query::parse(&Locator::xpath("//div[position()=1]")).unwrap_err();
            assert!(matches!(err, SwagError::InvalidSelector { .. }));
        }
    }

    mod tree_tests {
        use super::*;

        #[test]
        fn test_group_and_hidden_inherit() {
            let root = Node::new("div").child(
                Node::new("nav")
                    .group(Group::Menu)
                    .hidden(true)
                    .child(Node::new("a").id("logout_sidebar_link")),
            );
            let dom = Dom::new(&root);
            let entry = dom.entry(2);
            assert_eq!(entry.group, Group::Menu);
            assert!(entry.hidden);
        }

        #[test]
        fn test_inner_text_joins_children() {
            let node = Node::new("div")
                .child(Node::new("div").text("Sauce Labs Onesie"))
                .child(Node::new("div").text("$7.99"));
            assert_eq!(node.inner_text(), "Sauce Labs Onesie\n$7.99");
        }
    }
}
