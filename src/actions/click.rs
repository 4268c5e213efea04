use crate::actions::{Action, ActionContext, scripts};
use crate::browser::engine::MouseEvent;
use crate::error::{BrowserError, Result};
use serde::Deserialize;
use serde_json::Value;

/// How a click reaches the element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// Dispatch a synthetic DOM `click` event on the element
    Dispatch,
    /// Send a low-level mouse click at the element's top-left corner
    Mouse,
}

#[derive(Debug, Deserialize)]
struct ClickTarget {
    left: f64,
    top: f64,
}

/// Click the first element matching a resolved selector
#[derive(Debug, Clone)]
pub struct ClickAction {
    selector: String,
    mode: ClickMode,
}

impl ClickAction {
    pub fn new(selector: impl Into<String>, mode: ClickMode) -> Self {
        Self {
            selector: selector.into(),
            mode,
        }
    }
}

impl Action for ClickAction {
    fn name(&self) -> &str {
        match self.mode {
            ClickMode::Dispatch => "click",
            ClickMode::Mouse => "mouse_click",
        }
    }

    fn describe(&self) -> String {
        format!("{}({})", self.name(), self.selector)
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        let args = [Value::from(self.selector.as_str())];

        match self.mode {
            ClickMode::Dispatch => {
                let clicked = context.evaluate(scripts::CLICK, &args)?;
                if clicked != Value::Bool(true) {
                    return Err(BrowserError::ElementNotFound(self.selector.clone()));
                }
            }
            ClickMode::Mouse => {
                let target = context.evaluate(scripts::CLICK_TARGET, &args)?;
                if target.is_null() {
                    return Err(BrowserError::ElementNotFound(self.selector.clone()));
                }
                let target: ClickTarget = serde_json::from_value(target)
                    .map_err(|e| BrowserError::engine(format!("Bad click target for {}: {}", self.selector, e)))?;
                context.page().send_event(MouseEvent::Click, target.left, target.top)?;
            }
        }

        Ok(())
    }
}
