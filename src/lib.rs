//! # browser-chain
//!
//! A fluent scripting layer for driving a headless browser, aimed at
//! end-to-end tests and page automation.
//!
//! ## Features
//!
//! - **Deferred execution**: verbs only queue actions; [`Session::run`] executes them in order
//! - **Selector scopes**: nest selectors the way the page nests elements
//! - **Waiting**: fixed delays, selectors and page functions, polled against a configurable timeout
//! - **Assertions**: class, count, visibility, value, text, checked state and custom page functions, each negatable with `not()`
//! - **Pluggable engine**: headless Chrome by default (`chrome` feature), or any [`Launcher`] implementation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use browser_chain::{Session, SessionOptions, js};
//! use std::time::Duration;
//!
//! # fn main() -> browser_chain::Result<()> {
//! let options = SessionOptions::new()
//!     .base_url("http://localhost:8080")
//!     .timeout(Duration::from_secs(5));
//! let mut session = Session::chrome(options);
//!
//! {
//!     let mut page = session.root();
//!     page.open("/todo")
//!         .select("input.new-todo")
//!         .set_value("write docs")
//!         .select("button.add")
//!         .click()
//!         .wait(js("function () { return document.querySelectorAll('li').length > 0; }"));
//!
//!     let mut list = page.scope("ul.todo-list");
//!     list.select("li").test().count(1);
//!     list.select("li").test().not().has_class("done");
//! }
//!
//! session.run()?;
//! session.exit()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom actions
//!
//! Anything implementing [`Action`] (closures included) can be queued:
//!
//! ```rust,no_run
//! use browser_chain::{Session, SessionOptions, from_fn};
//!
//! # fn main() -> browser_chain::Result<()> {
//! let mut session = Session::chrome(SessionOptions::default());
//! session.after_open(from_fn(|context| {
//!     context.evaluate("function () { localStorage.clear(); }", &[])?;
//!     Ok(())
//! }));
//! session.root().open("https://example.com");
//! session.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Sessions, options and the engine contract
//! - [`scope`]: Selector scopes and the chainable verbs
//! - [`assert`]: Assertions queued through [`Scope::test`]
//! - [`actions`]: The [`Action`] trait and the built-in actions
//! - [`wait`]: Polling, clocks and wait targets
//! - [`queue`]: The FIFO action queue
//! - [`error`]: Error types and result aliases

pub mod actions;
pub mod assert;
pub mod browser;
pub mod error;
pub mod queue;
pub mod scope;
pub mod wait;

pub use actions::{Action, ActionContext, from_fn};
pub use assert::Test;
pub use browser::{Engine, LaunchParams, Launcher, MouseEvent, Page, Session, SessionOptions};
pub use error::{AssertionFailure, BrowserError, Result};
pub use queue::ActionQueue;
pub use scope::Scope;
pub use wait::{Clock, ManualClock, Script, SystemClock, WaitFor, js};

#[cfg(feature = "chrome")]
pub use browser::{ChromeLauncher, ChromeOptions};
