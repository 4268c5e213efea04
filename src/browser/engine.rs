//! Capability contract between a session and the browser engine that backs it
//!
//! The session never talks to a browser directly. It launches an [`Engine`]
//! through a [`Launcher`], asks it for one [`Page`], and drives that page
//! through the handful of operations below.

use crate::browser::config::LaunchParams;
use crate::error::Result;
use serde_json::Value;
use std::path::Path;

/// Starts a browser engine
pub trait Launcher {
    fn launch(&self, params: &LaunchParams) -> Result<Box<dyn Engine>>;
}

impl<F> Launcher for F
where
    F: Fn(&LaunchParams) -> Result<Box<dyn Engine>>,
{
    fn launch(&self, params: &LaunchParams) -> Result<Box<dyn Engine>> {
        self(params)
    }
}

/// A running browser engine
pub trait Engine {
    /// Open a new page
    fn create_page(&mut self) -> Result<Box<dyn Page>>;

    /// Shut the engine down
    fn exit(&mut self) -> Result<()>;
}

/// Low-level input events a page can synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEvent {
    Click,
}

/// One browser page
pub trait Page {
    /// Navigate to `url` and wait for the load to finish
    fn open(&mut self, url: &str) -> Result<()>;

    /// Call `function` (JavaScript function source) inside the page with
    /// `args` and return its JSON-serializable result.
    ///
    /// A function that throws is an error; `undefined` comes back as `Value::Null`.
    fn evaluate(&mut self, function: &str, args: &[Value]) -> Result<Value>;

    fn set_viewport(&mut self, width: u32, height: u32) -> Result<()>;

    /// Write a PNG rendering of the page to `path`
    fn render(&mut self, path: &Path) -> Result<()>;

    fn send_event(&mut self, event: MouseEvent, x: f64, y: f64) -> Result<()>;
}
