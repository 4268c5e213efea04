use crate::actions::{Action, ActionContext, scripts};
use crate::error::Result;
use crate::wait::{is_truthy, poll_until};
use serde_json::Value;
use std::time::Duration;

/// Sleep for a fixed time
#[derive(Debug, Clone, Copy)]
pub struct DelayAction {
    duration: Duration,
}

impl DelayAction {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Action for DelayAction {
    fn name(&self) -> &str {
        "delay"
    }

    fn describe(&self) -> String {
        format!("delay({}ms)", self.duration.as_millis())
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        context.clock().sleep(self.duration);
        Ok(())
    }
}

/// Poll until at least one element matches
#[derive(Debug, Clone)]
pub struct WaitForSelectorAction {
    selector: String,
}

impl WaitForSelectorAction {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl Action for WaitForSelectorAction {
    fn name(&self) -> &str {
        "wait_for_selector"
    }

    fn describe(&self) -> String {
        format!("wait_for_selector({})", self.selector)
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        let config = context.wait_config();
        let description = format!("selector '{}'", self.selector);
        let args = [Value::from(self.selector.as_str())];
        let ActionContext { page, clock, .. } = context;

        poll_until(*clock, config, &description, || {
            let count = page.evaluate(scripts::COUNT, &args)?;
            Ok(count.as_u64().unwrap_or(0) > 0)
        })
    }
}

/// Poll until a page function returns a truthy value
#[derive(Debug, Clone)]
pub struct WaitForFunctionAction {
    function: String,
    args: Vec<Value>,
}

impl WaitForFunctionAction {
    pub fn new(function: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            function: function.into(),
            args,
        }
    }
}

impl Action for WaitForFunctionAction {
    fn name(&self) -> &str {
        "wait_for_function"
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        let config = context.wait_config();
        let ActionContext { page, clock, .. } = context;

        poll_until(*clock, config, "page function to return a truthy value", || {
            let result = page.evaluate(&self.function, &self.args)?;
            Ok(is_truthy(&result))
        })
    }
}
