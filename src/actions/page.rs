use crate::actions::{Action, ActionContext};
use crate::error::Result;
use std::path::PathBuf;

/// Resize the page's viewport
#[derive(Debug, Clone, Copy)]
pub struct ViewportAction {
    width: u32,
    height: u32,
}

impl ViewportAction {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Action for ViewportAction {
    fn name(&self) -> &str {
        "viewport"
    }

    fn describe(&self) -> String {
        format!("viewport({}x{})", self.width, self.height)
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        context.page().set_viewport(self.width, self.height)
    }
}

/// Render the page to a PNG file
#[derive(Debug, Clone)]
pub struct ScreenshotAction {
    path: PathBuf,
}

impl ScreenshotAction {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Action for ScreenshotAction {
    fn name(&self) -> &str {
        "screenshot"
    }

    fn describe(&self) -> String {
        format!("screenshot({})", self.path.display())
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        context.page().render(&self.path)
    }
}
