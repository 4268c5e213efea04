//! Condition polling
//!
//! Every wait-style action funnels through [`poll_until`]: run a check,
//! stop on success or error, otherwise sleep and try again until the
//! timeout has been exceeded. Time is read through a [`Clock`] so tests can
//! drive the loop deterministically.

use crate::error::{BrowserError, Result};
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time and sleeping
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;

    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when slept on.
///
/// Clones share the same time, so a test can keep a handle while a session
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without sleeping
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Timeout and poll interval for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self { timeout, poll_interval }
    }
}

/// Run `check` until it reports `true`.
///
/// An `Err` from the check ends the wait immediately. Once the time since the
/// first check exceeds `config.timeout` and the check is still false, the wait
/// fails with [`BrowserError::Timeout`] naming `description`.
pub fn poll_until<F>(clock: &dyn Clock, config: WaitConfig, description: &str, mut check: F) -> Result<()>
where
    F: FnMut() -> Result<bool>,
{
    let start = clock.now();

    loop {
        if check()? {
            return Ok(());
        }

        if clock.now().saturating_sub(start) > config.timeout {
            return Err(BrowserError::Timeout {
                condition: description.to_string(),
                timeout: config.timeout,
            });
        }

        clock.sleep(config.poll_interval);
    }
}

/// JavaScript truthiness of a value returned from the page
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Source of a JavaScript function to run inside the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script(String);

impl Script {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }
}

/// Shorthand for [`Script::new`]
pub fn js(source: impl Into<String>) -> Script {
    Script::new(source)
}

/// What a generic `wait` should wait for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitFor {
    /// Sleep for a fixed time
    Delay(Duration),
    /// At least one element matches the selector (relative to the scope)
    Selector(String),
    /// The page function returns a truthy value
    Function(Script),
}

impl From<Duration> for WaitFor {
    fn from(duration: Duration) -> Self {
        WaitFor::Delay(duration)
    }
}

/// Milliseconds
impl From<u64> for WaitFor {
    fn from(ms: u64) -> Self {
        WaitFor::Delay(Duration::from_millis(ms))
    }
}

impl From<&str> for WaitFor {
    fn from(selector: &str) -> Self {
        WaitFor::Selector(selector.to_string())
    }
}

impl From<String> for WaitFor {
    fn from(selector: String) -> Self {
        WaitFor::Selector(selector)
    }
}

impl From<Script> for WaitFor {
    fn from(script: Script) -> Self {
        WaitFor::Function(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> WaitConfig {
        WaitConfig::new(Duration::from_millis(100), Duration::from_millis(10))
    }

    #[test]
    fn test_times_out_when_condition_is_late() {
        let clock = ManualClock::new();
        let mut polls = 0;

        let result = poll_until(&clock, config(), "late condition", || {
            polls += 1;
            Ok(clock.now() >= Duration::from_millis(250))
        });

        match result {
            Err(BrowserError::Timeout { condition, timeout }) => {
                assert_eq!(condition, "late condition");
                assert_eq!(timeout, Duration::from_millis(100));
            }
            other => panic!("Expected timeout, got {:?}", other),
        }
        // checks at 0, 10, ..., 110ms
        assert_eq!(polls, 12);
        assert!(polls >= 10);
    }

    #[test]
    fn test_stops_as_soon_as_condition_holds() {
        let clock = ManualClock::new();
        let mut polls = 0;

        poll_until(&clock, config(), "early condition", || {
            polls += 1;
            Ok(clock.now() >= Duration::from_millis(50))
        })
        .unwrap();

        assert_eq!(polls, 6);
        assert_eq!(clock.now(), Duration::from_millis(50));
    }

    #[test]
    fn test_check_error_is_not_retried() {
        let clock = ManualClock::new();
        let mut polls = 0;

        let result = poll_until(&clock, config(), "broken", || {
            polls += 1;
            Err(BrowserError::Engine("ReferenceError: x is not defined".to_string()))
        });

        assert!(matches!(result, Err(BrowserError::Engine(_))));
        assert_eq!(polls, 1);
    }

    #[test]
    fn test_timeout_counts_from_first_check() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(60));

        poll_until(&clock, config(), "immediate", || Ok(true)).unwrap();
        assert_eq!(clock.now(), Duration::from_secs(60));
    }

    #[test]
    fn test_tiny_interval_still_terminates() {
        let clock = ManualClock::new();
        let cfg = WaitConfig::new(Duration::from_millis(5), Duration::from_micros(1));
        let result = poll_until(&clock, cfg, "never", || Ok(false));
        assert!(matches!(result, Err(BrowserError::Timeout { .. })));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(3)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_wait_for_conversions() {
        assert_eq!(WaitFor::from(250u64), WaitFor::Delay(Duration::from_millis(250)));
        assert_eq!(WaitFor::from(".item"), WaitFor::Selector(".item".to_string()));
        assert_eq!(
            WaitFor::from(js("function () { return true; }")),
            WaitFor::Function(Script::new("function () { return true; }"))
        );
    }
}
