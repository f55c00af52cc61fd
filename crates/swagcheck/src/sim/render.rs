//! Markup of each storefront screen, with the live ids and classes.

use super::dom::{Group, Node};
use super::store::{self, Command, Item, Route, Storefront};
use crate::graph::Screen;

const INVENTORY_REMOVE: &str = "btn btn_secondary btn_small btn_inventory";

/// Markup of the current route
pub fn render(store: &Storefront) -> Node {
    let root = Node::new("div").id("root");
    match &store.route {
        Route::External(_) => root,
        Route::Screen(Screen::Login) => root.child(login(store)),
        Route::Screen(Screen::Inventory) => root.child(shell(store, "Products", inventory(store))),
        Route::Detail(id) => root.child(shell(store, "", detail(store, *id))),
        Route::Screen(Screen::ProductDetail) => root.child(shell(store, "", detail(store, u32::MAX))),
        Route::Screen(Screen::Cart) => root.child(shell(store, "Your Cart", cart(store))),
        Route::Screen(Screen::CheckoutInfo) => {
            root.child(shell(store, "Checkout: Your Information", checkout_info(store)))
        }
        Route::Screen(Screen::CheckoutOverview) => {
            root.child(shell(store, "Checkout: Overview", overview(store)))
        }
        Route::Screen(Screen::CheckoutComplete) => {
            root.child(shell(store, "Checkout: Complete!", complete()))
        }
    }
}

fn error_banner(store: &Storefront) -> Option<Node> {
    store.error.as_ref().map(|message| {
        Node::new("div").class("error-message-container error").child(
            Node::new("h3")
                .attr("data-test", "error")
                .text(message.clone())
                .child(
                    Node::new("button")
                        .class("error-button")
                        .attr("data-test", "error-button")
                        .on_click(Command::DismissError),
                ),
        )
    })
}

fn input(id: &'static str, placeholder: &'static str) -> Node {
    Node::new("input")
        .id(id)
        .class("input_error form_input")
        .attr("data-test", id)
        .attr("placeholder", placeholder)
        .attr("type", "text")
}

fn button(id: impl Into<String>, classes: &'static str, label: &'static str, command: Command) -> Node {
    let id = id.into();
    Node::new("button")
        .id(id.clone())
        .class(classes)
        .attr("data-test", id)
        .text(label)
        .on_click(command)
}

fn login(store: &Storefront) -> Node {
    Node::new("div").class("login_container").children([
        Node::new("div").class("login_logo").text("Swag Labs"),
        Node::new("div").class("login_wrapper").child(
            Node::new("form").children([
                Node::new("div").class("form_group").child(input("user-name", "Username")),
                Node::new("div").class("form_group").child(input("password", "Password")),
                error_banner(store).unwrap_or_else(|| Node::new("div").class("error-message-container")),
                Node::new("input")
                    .id("login-button")
                    .class("submit-button btn_action")
                    .attr("data-test", "login-button")
                    .attr("type", "submit")
                    .attr("value", "Login")
                    .on_click(Command::Login),
            ]),
        ),
    ])
}

fn menu(store: &Storefront) -> Node {
    let link = |id: &'static str, label: &'static str, command: Command| {
        Node::new("a")
            .id(id)
            .class("bm-item menu-item")
            .attr("data-test", id.replace("_sidebar_link", "-sidebar-link"))
            .text(label)
            .on_click(command)
    };
    Node::new("div")
        .class("bm-menu-wrap")
        .group(Group::Menu)
        .children([
            Node::new("div").class("bm-menu").child(Node::new("nav").class("bm-item-list").children([
                link("inventory_sidebar_link", "All Items", Command::AllItems),
                link("about_sidebar_link", "About", Command::About),
                link("logout_sidebar_link", "Logout", Command::Logout),
                link("reset_sidebar_link", "Reset App State", Command::ResetAppState),
            ])),
            Node::new("div").class("bm-cross-button").child(
                Node::new("button")
                    .id("react-burger-cross-btn")
                    .text("Close Menu")
                    .on_click(Command::CloseMenu),
            ),
        ])
}

fn shell(store: &Storefront, title: &'static str, body: Node) -> Node {
    let count = store.cart.len();
    let badge = (count > 0).then(|| {
        Node::new("span")
            .class("shopping_cart_badge")
            .attr("data-test", "shopping-cart-badge")
            .text(count.to_string())
            .group(Group::Badge)
    });
    let secondary = Node::new("div")
        .class("header_secondary_container")
        .maybe((!title.is_empty()).then(|| Node::new("span").class("title").text(title)));
    Node::new("div").id("page_wrapper").class("page_wrapper").children([
        Node::new("div").id("header_container").class("header_container").children([
            Node::new("div").class("primary_header").children([
                Node::new("div").id("menu_button_container").children([
                    Node::new("div").class("bm-burger-button").child(
                        Node::new("button")
                            .id("react-burger-menu-btn")
                            .text("Open Menu")
                            .on_click(Command::OpenMenu),
                    ),
                    menu(store),
                ]),
                Node::new("div").class("header_label").child(Node::new("div").class("app_logo").text("Swag Labs")),
                Node::new("div")
                    .id("shopping_cart_container")
                    .class("shopping_cart_container")
                    .on_click(Command::OpenCart)
                    .child(Node::new("a").class("shopping_cart_link").maybe(badge)),
            ]),
            secondary,
        ]),
        body,
    ])
}

fn title_link(item: &Item) -> Node {
    Node::new("a")
        .id(format!("item_{}_title_link", item.id))
        .on_click(Command::OpenDetail(item.id))
        .child(
            Node::new("div")
                .class("inventory_item_name")
                .attr("data-test", "inventory-item-name")
                .text(item.product.name),
        )
}

fn price(item: &Item) -> Node {
    Node::new("div")
        .class("inventory_item_price")
        .attr("data-test", "inventory-item-price")
        .text(item.product.price.to_string())
}

fn cart_button(store: &Storefront, item: &Item, key: Option<&str>, remove_classes: &'static str) -> Node {
    let id = |prefix: &str| key.map_or_else(|| prefix.to_string(), |k| format!("{prefix}-{k}"));
    if store.cart.contains(&item.id) {
        button(id("remove"), remove_classes, "Remove", Command::RemoveFromCart(item.id))
    } else {
        button(
            id("add-to-cart"),
            "btn btn_primary btn_small btn_inventory",
            "Add to cart",
            Command::AddToCart(item.id),
        )
    }
}

fn inventory(store: &Storefront) -> Node {
    let sort = Node::new("select")
        .class("product_sort_container")
        .attr("data-test", "product-sort-container");
    let items = store.sort.apply().into_iter().map(|item| {
        Node::new("div").class("inventory_item").attr("data-test", "inventory-item").children([
            Node::new("div").class("inventory_item_description").children([
                Node::new("div").class("inventory_item_label").children([
                    title_link(item),
                    Node::new("div").class("inventory_item_desc").text(item.description),
                ]),
                Node::new("div").class("pricebar").children([
                    price(item),
                    cart_button(store, item, Some(item.key), INVENTORY_REMOVE),
                ]),
            ]),
        ])
    });
    Node::new("div").id("inventory_container").children([
        Node::new("div").class("right_component").child(sort),
        Node::new("div").class("inventory_list").children(items),
    ])
}

fn detail(store: &Storefront, id: u32) -> Node {
    let back = button(
        "back-to-products",
        "btn btn_secondary back btn_large inventory_details_back_button",
        "Back to products",
        Command::BackToProducts,
    );
    let body = match store::item(id) {
        Some(item) => Node::new("div").class("inventory_details_desc_container").children([
            Node::new("div").class("inventory_details_name large_size").text(item.product.name),
            Node::new("div").class("inventory_details_desc large_size").text(item.description),
            Node::new("div").class("inventory_details_price").text(item.product.price.to_string()),
            cart_button(store, item, None, INVENTORY_REMOVE),
        ]),
        None => Node::new("div").class("inventory_details_desc_container").children([
            Node::new("div").class("inventory_details_name large_size").text("ITEM NOT FOUND"),
            Node::new("div")
                .class("inventory_details_desc large_size")
                .text("We're sorry, but your call could not be completed as dialled."),
            Node::new("div").class("inventory_details_price").text("$√-1"),
        ]),
    };
    Node::new("div").id("inventory_item_container").children([
        back,
        Node::new("div").class("inventory_details").child(body),
    ])
}

fn cart_line(store: &Storefront, item: &Item, removable: bool) -> Node {
    let pricebar = Node::new("div").class("item_pricebar").child(price(item)).maybe(
        removable.then(|| cart_button(store, item, Some(item.key), "btn btn_secondary btn_small cart_button")),
    );
    Node::new("div").class("cart_item").children([
        Node::new("div").class("cart_quantity").text("1"),
        Node::new("div").class("cart_item_label").children([
            title_link(item),
            Node::new("div").class("inventory_item_desc").text(item.description),
            pricebar,
        ]),
    ])
}

fn cart(store: &Storefront) -> Node {
    Node::new("div").id("cart_contents_container").children([
        Node::new("div").class("cart_list").children(
            [
                Node::new("div").class("cart_quantity_label").text("QTY"),
                Node::new("div").class("cart_desc_label").text("Description"),
            ]
            .into_iter()
            .chain(store.cart_items().map(|item| cart_line(store, item, true))),
        ),
        Node::new("div").class("cart_footer").children([
            button(
                "continue-shopping",
                "btn btn_secondary back btn_medium",
                "Continue Shopping",
                Command::ContinueShopping,
            ),
            button(
                "checkout",
                "btn btn_action btn_medium checkout_button",
                "Checkout",
                Command::Checkout,
            ),
        ]),
    ])
}

fn checkout_info(store: &Storefront) -> Node {
    Node::new("div").id("checkout_info_container").child(
        Node::new("form").children([
            Node::new("div").class("checkout_info").children([
                Node::new("div").class("form_group").child(input("first-name", "First Name")),
                Node::new("div").class("form_group").child(input("last-name", "Last Name")),
                Node::new("div").class("form_group").child(input("postal-code", "Zip/Postal Code")),
            ])
            .maybe(error_banner(store)),
            Node::new("div").class("checkout_buttons").children([
                button("cancel", "btn btn_secondary back btn_medium cart_cancel_link", "Cancel", Command::CancelInfo),
                Node::new("input")
                    .id("continue")
                    .class("submit-button btn btn_primary cart_button btn_action")
                    .attr("data-test", "continue")
                    .attr("type", "submit")
                    .attr("value", "Continue")
                    .on_click(Command::ContinueCheckout),
            ]),
        ]),
    )
}

fn overview(store: &Storefront) -> Node {
    let item_total = store.cart_total();
    let tax = store::tax(item_total);
    let summary = |class: &'static str, text: String| Node::new("div").class(class).text(text);
    Node::new("div").id("checkout_summary_container").children([
        Node::new("div").class("cart_list").children(store.cart_items().map(|item| cart_line(store, item, false))),
        Node::new("div").class("summary_info").children([
            summary("summary_info_label", "Payment Information:".to_string()),
            summary("summary_value_label", "SauceCard #31337".to_string()),
            summary("summary_info_label", "Shipping Information:".to_string()),
            summary("summary_value_label", "Free Pony Express Delivery!".to_string()),
            summary("summary_info_label", "Price Total".to_string()),
            summary("summary_subtotal_label", format!("Item total: {item_total}")),
            summary("summary_tax_label", format!("Tax: {tax}")),
            summary("summary_info_label summary_total_label", format!("Total: {}", item_total + tax)),
            Node::new("div").class("cart_footer").children([
                button("cancel", "btn btn_secondary back btn_medium cart_cancel_link", "Cancel", Command::CancelOverview),
                button("finish", "btn btn_action btn_medium cart_button", "Finish", Command::Finish),
            ]),
        ]),
    ])
}

fn complete() -> Node {
    Node::new("div").id("checkout_complete_container").class("checkout_complete_container").children([
        Node::new("img").class("pony_express").attr("alt", "Pony Express"),
        Node::new("h2").class("complete-header").text(crate::data::messages::THANK_YOU),
        Node::new("div").class("complete-text").text(crate::data::messages::ORDER_DISPATCHED),
        button("back-to-products", "btn btn_primary btn_small", "Back Home", Command::BackHome),
    ])
}
