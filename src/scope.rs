//! Selector scopes and the chainable verb vocabulary
//!
//! A [`Scope`] carries a selector prefix built from its ancestors and one
//! "current selector" slot filled by [`Scope::select`]. Verbs resolve their
//! target against both when they are called and append an action to the
//! session's queue; nothing touches the page until [`Session::run`].
//!
//! ```rust,no_run
//! use browser_chain::{Session, SessionOptions};
//!
//! # fn main() -> browser_chain::Result<()> {
//! let mut session = Session::chrome(SessionOptions::new().base_url("http://localhost:3000"));
//! {
//!     let mut page = session.root();
//!     page.open("/login");
//!
//!     let mut form = page.scope("form#login");
//!     form.select("input[name=email]").set_value("ada@example.com");
//!     form.select("button[type=submit]").click();
//!
//!     page.wait(".dashboard").select(".dashboard .greeting").test().text("Hello, Ada");
//! }
//! session.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Session::run`]: crate::Session::run

use crate::actions::{
    Action, ClickAction, ClickMode, DelayAction, EvalAction, FailedAction, OpenAction, ScreenshotAction,
    SetValueAction, ViewportAction, WaitForFunctionAction, WaitForSelectorAction,
};
use crate::assert::Test;
use crate::browser::session::Session;
use crate::error::{BrowserError, Result};
use crate::wait::WaitFor;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// A selector context bound to a session
#[derive(Clone)]
pub struct Scope<'s> {
    session: &'s Session,
    prefix: String,
    selected: Option<String>,
}

impl<'s> Scope<'s> {
    pub(crate) fn root(session: &'s Session) -> Self {
        Self {
            session,
            prefix: String::new(),
            selected: None,
        }
    }

    /// Child scope whose selectors are nested under `selector`
    pub fn scope(&self, selector: &str) -> Scope<'s> {
        Scope {
            session: self.session,
            prefix: format!("{}{} ", self.prefix, selector),
            selected: None,
        }
    }

    /// Make `selector` the target of the following verbs
    pub fn select(&mut self, selector: impl Into<String>) -> &mut Self {
        self.selected = Some(selector.into());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Full selector for `explicit`, or for the current selection when
    /// `explicit` is `None` or empty
    pub fn resolve(&self, explicit: Option<&str>) -> Result<String> {
        let current = explicit
            .filter(|s| !s.is_empty())
            .or(self.selected.as_deref())
            .filter(|s| !s.is_empty())
            .ok_or(BrowserError::NoSelection)?;

        Ok(format!("{}{}", self.prefix, current))
    }

    /// Queue a custom action
    pub fn enqueue(&mut self, action: impl Action + 'static) -> &mut Self {
        self.session.enqueue_boxed(Box::new(action));
        self
    }

    /// Queue the action built from the resolved selector, or a failing
    /// placeholder when resolution fails
    pub(crate) fn enqueue_targeted<A>(
        &mut self,
        verb: &'static str,
        explicit: Option<&str>,
        build: impl FnOnce(String) -> A,
    ) -> &mut Self
    where
        A: Action + 'static,
    {
        match self.resolve(explicit) {
            Ok(selector) => self.session.enqueue_boxed(Box::new(build(selector))),
            Err(error) => self.session.enqueue_boxed(Box::new(FailedAction::new(verb, error))),
        }
        self
    }

    /// Evaluate a page function with JSON arguments
    pub fn eval(&mut self, function: impl Into<String>, args: Vec<Value>) -> &mut Self {
        self.enqueue(EvalAction::new(function, args))
    }

    /// Evaluate a page function and pass its result to `callback`
    pub fn eval_then(
        &mut self,
        function: impl Into<String>,
        args: Vec<Value>,
        callback: impl FnMut(Value) + 'static,
    ) -> &mut Self {
        self.enqueue(EvalAction::new(function, args).then(callback))
    }

    /// Dispatch a click on the selected element
    pub fn click(&mut self) -> &mut Self {
        self.enqueue_targeted("click", None, |selector| ClickAction::new(selector, ClickMode::Dispatch))
    }

    /// Send a real mouse click to the selected element's position
    pub fn mouse_click(&mut self) -> &mut Self {
        self.enqueue_targeted("mouse_click", None, |selector| ClickAction::new(selector, ClickMode::Mouse))
    }

    /// Set the selected element's value and fire `change`
    pub fn set_value(&mut self, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        self.enqueue_targeted("set_value", None, move |selector| SetValueAction::new(selector, value))
    }

    /// Reset the viewport to the session default, then navigate to
    /// `base_url + location`
    pub fn open(&mut self, location: impl Into<String>) -> &mut Self {
        let options = self.session.options();
        let (width, height) = (options.width, options.height);
        self.enqueue(ViewportAction::new(width, height)).enqueue(OpenAction::new(location))
    }

    pub fn viewport(&mut self, width: u32, height: u32) -> &mut Self {
        if width == 0 || height == 0 {
            let error = BrowserError::InvalidArgument(format!("viewport must not be empty, got {}x{}", width, height));
            return self.enqueue(FailedAction::new("viewport", error));
        }
        self.enqueue(ViewportAction::new(width, height))
    }

    pub fn screenshot(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.enqueue(ScreenshotAction::new(path))
    }

    /// Wait for a duration, a selector or a page function
    pub fn wait(&mut self, target: impl Into<WaitFor>) -> &mut Self {
        match target.into() {
            WaitFor::Delay(duration) => self.delay(duration),
            WaitFor::Selector(selector) => self.wait_for_selector(&selector),
            WaitFor::Function(script) => self.wait_for_function(script.source()),
        }
    }

    pub fn delay(&mut self, duration: Duration) -> &mut Self {
        self.enqueue(DelayAction::new(duration))
    }

    /// Wait until `selector` (or the current selection, when empty) matches
    pub fn wait_for_selector(&mut self, selector: &str) -> &mut Self {
        self.enqueue_targeted("wait_for_selector", Some(selector), |selector| WaitForSelectorAction::new(selector))
    }

    /// Wait until a page function returns a truthy value
    pub fn wait_for_function(&mut self, function: impl Into<String>) -> &mut Self {
        let function = function.into();
        if function.trim().is_empty() {
            let error = BrowserError::InvalidArgument("wait accepts a duration, a selector or a script".to_string());
            return self.enqueue(FailedAction::new("wait_for_function", error));
        }
        self.enqueue(WaitForFunctionAction::new(function, Vec::new()))
    }

    /// Start one assertion
    pub fn test(&mut self) -> Test<'_, 's> {
        Test::new(self)
    }
}

impl std::fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("prefix", &self.prefix)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}
