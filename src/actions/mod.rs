//! Deferred page interactions
//!
//! Every verb of the scripting DSL becomes one [`Action`]: a unit of work the
//! session runs later, strictly after the previously queued one finished.

pub mod click;
pub mod eval;
pub mod input;
pub mod navigate;
pub mod page;
pub mod scripts;
pub mod wait;

pub use click::{ClickAction, ClickMode};
pub use eval::EvalAction;
pub use input::SetValueAction;
pub use navigate::OpenAction;
pub use page::{ScreenshotAction, ViewportAction};
pub use wait::{DelayAction, WaitForFunctionAction, WaitForSelectorAction};

use crate::browser::config::SessionOptions;
use crate::browser::engine::Page;
use crate::error::{BrowserError, Result};
use crate::queue::ActionQueue;
use crate::wait::{Clock, WaitConfig};
use serde_json::Value;

/// A deferred unit of page interaction
///
/// Closures of the shape `Fn(&mut ActionContext) -> Result<()>` are actions too.
pub trait Action {
    /// Short verb used in logs
    fn name(&self) -> &str;

    /// Run against the page; `Err` halts the rest of the queue
    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()>;

    /// Verb plus its target, e.g. `click(#submit)`
    fn describe(&self) -> String {
        self.name().to_string()
    }
}

impl<F> Action for F
where
    F: Fn(&mut ActionContext<'_>) -> Result<()>,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        self(context)
    }
}

/// Turn a closure into an [`Action`], pinning down its signature
///
/// ```rust
/// use browser_chain::actions::from_fn;
///
/// let action = from_fn(|context| {
///     context.evaluate("function () { localStorage.clear(); }", &[])?;
///     Ok(())
/// });
/// # let _ = action;
/// ```
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(&mut ActionContext<'_>) -> Result<()>,
{
    f
}

/// Everything an action may touch while it runs
pub struct ActionContext<'a> {
    page: &'a mut dyn Page,
    options: &'a SessionOptions,
    clock: &'a dyn Clock,
    after_open: &'a ActionQueue,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(
        page: &'a mut dyn Page,
        options: &'a SessionOptions,
        clock: &'a dyn Clock,
        after_open: &'a ActionQueue,
    ) -> Self {
        Self {
            page,
            options,
            clock,
            after_open,
        }
    }

    pub fn page(&mut self) -> &mut dyn Page {
        &mut *self.page
    }

    pub fn options(&self) -> &SessionOptions {
        self.options
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock
    }

    /// Timeout and poll interval from the session options
    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig::new(self.options.timeout, self.options.poll_interval)
    }

    /// Evaluate a page function
    pub fn evaluate(&mut self, function: &str, args: &[Value]) -> Result<Value> {
        self.page.evaluate(function, args)
    }

    /// Run every after-open action in registration order
    pub(crate) fn run_after_open(&mut self) -> Result<()> {
        let hooks = self.after_open;
        for hook in hooks.iter() {
            self.trace(hook);
            hook.execute(self)?;
        }
        Ok(())
    }

    pub(crate) fn trace(&self, action: &dyn Action) {
        if self.options.debug {
            log::debug!("{}", action.describe());
        }
    }
}

/// Placeholder for a verb that could not be built, e.g. nothing was
/// selected. Fails with the stored error when its turn comes.
pub(crate) struct FailedAction {
    verb: &'static str,
    error: BrowserError,
}

impl FailedAction {
    pub(crate) fn new(verb: &'static str, error: BrowserError) -> Self {
        Self { verb, error }
    }
}

impl Action for FailedAction {
    fn name(&self) -> &str {
        self.verb
    }

    fn execute(&self, _context: &mut ActionContext<'_>) -> Result<()> {
        Err(self.error.clone())
    }
}
