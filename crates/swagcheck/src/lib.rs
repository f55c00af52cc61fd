//! swagcheck: page-object end-to-end suite for the Swag Labs storefront
//!
//! Scenarios drive the storefront through typed page objects. Page objects
//! reach the browser only through a wait-gated accessor, and every
//! navigation they perform is checked against a single navigation graph.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    SWAGCHECK Architecture                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenarios  │    │ Page       │    │ Waiter     │            │
//! │   │ + Harness  │───►│ Objects    │───►│ (poll +    │            │
//! │   │            │    │ (typed)    │    │  timeout)  │            │
//! │   └────────────┘    └─────┬──────┘    └─────┬──────┘            │
//! │                           │ EDGES           │                   │
//! │                     ┌─────▼──────┐    ┌─────▼──────┐            │
//! │                     │ Navigation │    │ Driver     │            │
//! │                     │ Graph      │    │ CDP / WD / │            │
//! │                     │            │    │ Simulator  │            │
//! │                     └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use swagcheck::{scenarios, Harness, SimOptions};
//!
//! # async fn demo() {
//! let harness = Harness::simulated(SimOptions::default(), std::path::Path::new("target/swag"));
//! let summary = scenarios::run_all(&harness, scenarios::select(Some("AUTH"))).await;
//! assert!(summary.all_passed());
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod data;
pub mod driver;
pub mod fixture;
pub mod graph;
pub mod locator;
pub mod money;
pub mod pages;
pub mod reporter;
pub mod result;
pub mod scenarios;
pub mod session;
pub mod sim;
pub mod telemetry;
pub mod wait;

/// Chrome and Edge over CDP
#[cfg(feature = "browser")]
pub mod browser;

/// Any browser over WebDriver
#[cfg(feature = "webdriver")]
pub mod webdriver;

pub use config::Settings;
pub use driver::{BrowserKind, Driver, DriverConfig, ElementState, SharedDriver};
pub use fixture::{Harness, Launcher};
pub use graph::{Action, Screen, Transition};
pub use locator::{By, Locator};
pub use money::Money;
pub use reporter::{CaseResult, RunSummary, TestStatus};
pub use result::{SwagError, SwagResult};
pub use session::Session;
pub use sim::{SimDriver, SimOptions};
pub use wait::{WaitCondition, WaitOptions, Waiter};

#[cfg(feature = "browser")]
pub use browser::CdpDriver;

#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverClient;
