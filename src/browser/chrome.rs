//! Chromium engine built on `headless_chrome`

use crate::browser::config::LaunchParams;
use crate::browser::engine::{Engine, Launcher, MouseEvent, Page};
use crate::error::{BrowserError, Result};
use headless_chrome::browser::tab::point::Point;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, Tab};
use serde::Deserialize;
use serde_json::Value;
use std::{ffi::OsStr, path::Path, path::PathBuf, sync::Arc, time::Duration};

/// How to start Chrome/Chromium
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    /// Run without a visible window (default: true)
    pub headless: bool,

    /// Keep the Chrome sandbox enabled (default: true)
    pub sandbox: bool,

    /// Custom browser binary; autodetected when `None`
    pub chrome_path: Option<PathBuf>,

    /// Profile directory; a temporary one when `None`
    pub user_data_dir: Option<PathBuf>,

    /// How long the browser may go without CDP traffic before headless_chrome
    /// closes it. Sessions sit idle between `run` calls, so the default is
    /// one hour rather than headless_chrome's 30 seconds.
    pub idle_timeout: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            chrome_path: None,
            user_data_dir: None,
            idle_timeout: Duration::from_secs(60 * 60),
        }
    }
}

impl ChromeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

/// Launches a local Chrome/Chromium instance
#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher {
    options: ChromeOptions,
}

impl ChromeLauncher {
    pub fn new(options: ChromeOptions) -> Self {
        Self { options }
    }
}

impl Launcher for ChromeLauncher {
    fn launch(&self, params: &LaunchParams) -> Result<Box<dyn Engine>> {
        let switches = chrome_switches(params);
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.args = switches.iter().map(OsStr::new).collect();
        launch_opts.idle_browser_timeout = self.options.idle_timeout;
        launch_opts.headless = self.options.headless;
        launch_opts.sandbox = self.options.sandbox;
        launch_opts.window_size = Some((params.width, params.height));
        launch_opts.ignore_certificate_errors = params.flag_enabled("ignore-ssl-errors", true);
        launch_opts.path = self.options.chrome_path.clone();
        launch_opts.user_data_dir = self.options.user_data_dir.clone();

        let browser = Browser::new(launch_opts).map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        Ok(Box::new(ChromeEngine { browser: Some(browser) }))
    }
}

/// Translate native launch flags into Chromium command-line switches.
///
/// Flags Chromium has no switch for are reported and skipped.
pub fn chrome_switches(params: &LaunchParams) -> Vec<String> {
    let mut switches = Vec::new();

    if !params.flag_enabled("load-images", true) {
        switches.push("--blink-settings=imagesEnabled=false".to_string());
    }

    if !params.flag_enabled("web-security", true) {
        switches.push("--disable-web-security".to_string());
    }

    if let Some(protocol) = params.flag("ssl-protocol")
        && !protocol.eq_ignore_ascii_case("any")
    {
        switches.push(format!("--ssl-version-min={}", protocol.to_ascii_lowercase()));
    }

    if let Some(proxy) = params.flag("proxy") {
        let scheme = params.flag("proxy-type").unwrap_or("http");
        switches.push(format!("--proxy-server={}://{}", scheme, proxy));
    }

    for unsupported in ["proxy-auth", "cookies-file"] {
        if params.flag(unsupported).is_some() {
            log::warn!("Launch parameter '{}' is not supported by Chromium and is ignored", unsupported);
        }
    }

    switches
}

/// A running Chromium instance
pub struct ChromeEngine {
    browser: Option<Browser>,
}

impl Engine for ChromeEngine {
    fn create_page(&mut self) -> Result<Box<dyn Page>> {
        let browser = self.browser.as_ref().ok_or(BrowserError::SessionClosed)?;
        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Box::new(ChromePage { tab }))
    }

    fn exit(&mut self) -> Result<()> {
        // headless_chrome kills the process when the Browser is dropped
        if let Some(browser) = self.browser.take() {
            let tabs = browser
                .get_tabs()
                .lock()
                .map_err(|e| BrowserError::engine(format!("Failed to get tabs: {}", e)))?
                .clone();
            for tab in tabs {
                if let Err(e) = tab.close(false) {
                    log::warn!("Failed to close tab: {}", e);
                }
            }
        }
        Ok(())
    }
}

/// One Chromium tab
pub struct ChromePage {
    tab: Arc<Tab>,
}

/// Wire shape of [`ChromePage::evaluate`]'s wrapper
#[derive(Debug, Deserialize)]
struct Evaluation {
    #[serde(default)]
    value: Value,
    error: Option<String>,
}

/// Wrap a page function so that the call, its arguments and any exception
/// travel as one JSON string
fn evaluation_script(function: &str, args: &[Value]) -> Result<String> {
    let args = serde_json::to_string(args).map_err(BrowserError::engine)?;
    Ok(format!(
        r#"(function () {{
            try {{
                return JSON.stringify({{ value: ({function}).apply(null, {args}) }});
            }} catch (e) {{
                return JSON.stringify({{ error: String(e && e.stack ? e.stack : e) }});
            }}
        }})()"#
    ))
}

impl Page for ChromePage {
    fn open(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::NavigationFailed(format!("Navigation to {} did not complete: {}", url, e)))?;

        Ok(())
    }

    fn evaluate(&mut self, function: &str, args: &[Value]) -> Result<Value> {
        let script = evaluation_script(function, args)?;
        let result = self.tab.evaluate(&script, false).map_err(BrowserError::engine)?;

        let json = result
            .value
            .ok_or_else(|| BrowserError::engine("No value returned from page evaluation"))?;
        let json_str = json
            .as_str()
            .ok_or_else(|| BrowserError::engine(format!("Unexpected evaluation result: {}", json)))?;

        let evaluation: Evaluation = serde_json::from_str(json_str).map_err(BrowserError::engine)?;
        match evaluation.error {
            Some(error) => Err(BrowserError::Engine(error)),
            None => Ok(evaluation.value),
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        self.tab
            .set_bounds(Bounds::Normal {
                left: Some(0),
                top: Some(0),
                width: Some(f64::from(width)),
                height: Some(f64::from(height)),
            })
            .map_err(|e| BrowserError::engine(format!("Failed to set viewport to {}x{}: {}", width, height, e)))?;
        Ok(())
    }

    fn render(&mut self, path: &Path) -> Result<()> {
        let png = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| BrowserError::engine(format!("Failed to capture screenshot: {}", e)))?;

        std::fs::write(path, png)
            .map_err(|e| BrowserError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn send_event(&mut self, event: MouseEvent, x: f64, y: f64) -> Result<()> {
        let point = Point { x, y };
        let result = match event {
            MouseEvent::Click => self.tab.click_point(point).map(|_| ()),
        };
        result.map_err(|e| BrowserError::engine(format!("Failed to send {:?} at ({}, {}): {}", event, x, y, e)))
    }
}
