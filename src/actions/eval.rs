use crate::actions::{Action, ActionContext};
use crate::error::Result;
use serde_json::Value;
use std::cell::RefCell;

type ResultCallback = RefCell<Box<dyn FnMut(Value)>>;

/// Evaluate a page function, optionally handing its result to a callback
pub struct EvalAction {
    function: String,
    args: Vec<Value>,
    then: Option<ResultCallback>,
}

impl EvalAction {
    pub fn new(function: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            function: function.into(),
            args,
            then: None,
        }
    }

    /// Receive the evaluation result before the action completes
    pub fn then(mut self, callback: impl FnMut(Value) + 'static) -> Self {
        self.then = Some(RefCell::new(Box::new(callback)));
        self
    }
}

impl Action for EvalAction {
    fn name(&self) -> &str {
        "eval"
    }

    fn describe(&self) -> String {
        format!("eval(<fn>, {})", Value::Array(self.args.clone()))
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        let result = context.evaluate(&self.function, &self.args)?;
        if let Some(callback) = &self.then {
            let mut callback = callback.borrow_mut();
            (*callback)(result);
        }
        Ok(())
    }
}
