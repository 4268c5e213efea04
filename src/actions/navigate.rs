use crate::actions::{Action, ActionContext};
use crate::error::Result;

/// Prefix `location` with the session's base URL.
///
/// Plain concatenation: `"http://app.test"` + `"/login"`.
pub fn join_url(base_url: &str, location: &str) -> String {
    format!("{}{}", base_url, location)
}

/// Navigate the page, then run the after-open actions
#[derive(Debug, Clone)]
pub struct OpenAction {
    location: String,
}

impl OpenAction {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl Action for OpenAction {
    fn name(&self) -> &str {
        "open"
    }

    fn describe(&self) -> String {
        format!("open({})", self.location)
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        let url = join_url(&context.options().base_url, &self.location);
        context.page().open(&url)?;
        context.run_after_open()
    }
}
