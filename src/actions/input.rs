use crate::actions::{Action, ActionContext, scripts};
use crate::error::{BrowserError, Result};
use serde_json::Value;

/// Set the `value` of the first match and notify `change` listeners
#[derive(Debug, Clone)]
pub struct SetValueAction {
    selector: String,
    value: String,
}

impl SetValueAction {
    pub fn new(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            value: value.into(),
        }
    }
}

impl Action for SetValueAction {
    fn name(&self) -> &str {
        "set_value"
    }

    fn describe(&self) -> String {
        format!("set_value({}, {:?})", self.selector, self.value)
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        let outcome = context.evaluate(
            scripts::SET_VALUE,
            &[Value::from(self.selector.as_str()), Value::from(self.value.as_str())],
        )?;

        match outcome.as_str() {
            Some("ok") => Ok(()),
            Some("not-input") => Err(BrowserError::NotAnInput(self.selector.clone())),
            Some("missing") => Err(BrowserError::ElementNotFound(self.selector.clone())),
            _ => Err(BrowserError::engine(format!(
                "Unexpected set_value result for {}: {}",
                self.selector, outcome
            ))),
        }
    }
}
