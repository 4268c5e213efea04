//! In-memory engine for driving sessions without a browser

#![allow(dead_code)]

use browser_chain::actions::scripts;
use browser_chain::{
    BrowserError, Clock, Engine, LaunchParams, Launcher, ManualClock, MouseEvent, Page, Result, Session,
    SessionOptions,
};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

type Responder = Box<dyn FnMut(&str, &[Value]) -> Option<Result<Value>>>;

/// One element of the fake page
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub classes: Vec<String>,
    pub value: Option<String>,
    pub text: String,
    pub checked: bool,
    pub hidden: bool,
    pub left: f64,
    pub top: f64,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, name: &str) -> Self {
        self.classes.push(name.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.left = left;
        self.top = top;
        self
    }
}

#[derive(Default)]
struct State {
    events: Vec<String>,
    launches: usize,
    pages: usize,
    launch_params: Option<LaunchParams>,
    /// Elements keyed by the exact selector the session resolves to
    dom: HashMap<String, Vec<Element>>,
    /// Selectors that only match once the clock reaches the given time
    appears_at: HashMap<String, Duration>,
    responder: Option<Responder>,
    /// URLs whose navigation fails
    broken_urls: HashSet<String>,
}

/// Handle shared by the test, the launcher and every page it creates
#[derive(Clone)]
pub struct FakeBrowser {
    state: Rc<RefCell<State>>,
    clock: ManualClock,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State::default())),
            clock: ManualClock::new(),
        }
    }

    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    /// Session wired to this browser and its manual clock
    pub fn session(&self, options: SessionOptions) -> Session {
        Session::new(options, self.clone()).with_clock(self.clock.clone())
    }

    pub fn insert(&self, selector: &str, elements: Vec<Element>) -> &Self {
        self.state.borrow_mut().dom.insert(selector.to_string(), elements);
        self
    }

    pub fn element(&self, selector: &str, element: Element) -> &Self {
        self.insert(selector, vec![element])
    }

    /// Make `selector` match only from `at` on
    pub fn appear_at(&self, selector: &str, at: Duration, element: Element) -> &Self {
        self.element(selector, element);
        self.state.borrow_mut().appears_at.insert(selector.to_string(), at);
        self
    }

    /// Answer evaluations before the built-in fake DOM does; `None` falls through
    pub fn respond(&self, responder: impl FnMut(&str, &[Value]) -> Option<Result<Value>> + 'static) -> &Self {
        self.state.borrow_mut().responder = Some(Box::new(responder));
        self
    }

    /// Make navigation to `url` fail
    pub fn break_url(&self, url: &str) -> &Self {
        self.state.borrow_mut().broken_urls.insert(url.to_string());
        self
    }

    /// Append to the event log, e.g. from a custom action
    pub fn record(&self, event: impl Into<String>) {
        self.log(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.state.borrow().events.clone()
    }

    pub fn launches(&self) -> usize {
        self.state.borrow().launches
    }

    pub fn pages(&self) -> usize {
        self.state.borrow().pages
    }

    pub fn launch_params(&self) -> Option<LaunchParams> {
        self.state.borrow().launch_params.clone()
    }

    pub fn value_of(&self, selector: &str) -> Option<String> {
        let state = self.state.borrow();
        state.dom.get(selector)?.first()?.value.clone()
    }

    fn log(&self, event: String) {
        self.state.borrow_mut().events.push(event);
    }
}

impl Launcher for FakeBrowser {
    fn launch(&self, params: &LaunchParams) -> Result<Box<dyn Engine>> {
        {
            let mut state = self.state.borrow_mut();
            state.launches += 1;
            state.launch_params = Some(params.clone());
        }
        self.log("launch".to_string());
        Ok(Box::new(FakeEngine { browser: self.clone() }))
    }
}

struct FakeEngine {
    browser: FakeBrowser,
}

impl Engine for FakeEngine {
    fn create_page(&mut self) -> Result<Box<dyn Page>> {
        self.browser.state.borrow_mut().pages += 1;
        self.browser.log("page".to_string());
        Ok(Box::new(FakePage {
            browser: self.browser.clone(),
        }))
    }

    fn exit(&mut self) -> Result<()> {
        self.browser.log("exit".to_string());
        Ok(())
    }
}

struct FakePage {
    browser: FakeBrowser,
}

impl FakePage {
    /// Elements matching `selector` right now
    fn query(&self, selector: &str) -> Vec<Element> {
        let state = self.browser.state.borrow();
        if let Some(at) = state.appears_at.get(selector)
            && self.browser.clock.now() < *at
        {
            return Vec::new();
        }
        state.dom.get(selector).cloned().unwrap_or_default()
    }

    fn first(&self, selector: &str) -> Option<Element> {
        self.query(selector).into_iter().next()
    }

    fn dom_script(&mut self, function: &str, args: &[Value]) -> Result<Value> {
        let selector = args.first().and_then(Value::as_str).unwrap_or_default().to_string();

        let value = match function {
            scripts::CLICK => match self.first(&selector) {
                Some(_) => {
                    self.browser.log(format!("click {}", selector));
                    json!(true)
                }
                None => json!(false),
            },
            scripts::CLICK_TARGET => match self.first(&selector) {
                Some(element) => json!({ "left": element.left, "top": element.top }),
                None => Value::Null,
            },
            scripts::SET_VALUE => match self.first(&selector) {
                None => json!("missing"),
                Some(element) if element.value.is_none() => json!("not-input"),
                Some(_) => {
                    let value = args.get(1).and_then(Value::as_str).unwrap_or_default().to_string();
                    self.browser.log(format!("set_value {}={}", selector, value));
                    let mut state = self.browser.state.borrow_mut();
                    if let Some(element) = state.dom.get_mut(&selector).and_then(|e| e.first_mut()) {
                        element.value = Some(value);
                    }
                    json!("ok")
                }
            },
            scripts::COUNT => json!(self.query(&selector).len()),
            scripts::HAS_CLASS => {
                let name = args.get(1).and_then(Value::as_str).unwrap_or_default();
                match self.first(&selector) {
                    Some(element) => json!(element.classes.iter().any(|c| c == name)),
                    None => Value::Null,
                }
            }
            scripts::VISIBLE => match self.first(&selector) {
                Some(element) => json!(!element.hidden),
                None => Value::Null,
            },
            scripts::VALUE => match self.first(&selector) {
                Some(Element { value: Some(value), .. }) => json!(value),
                Some(_) => json!(false),
                None => Value::Null,
            },
            scripts::TEXT => {
                let elements = self.query(&selector);
                if elements.is_empty() {
                    Value::Null
                } else {
                    json!(elements.iter().map(|e| e.text.trim()).collect::<String>())
                }
            }
            scripts::CHECKED => match self.first(&selector) {
                Some(element) => json!(element.checked),
                None => Value::Null,
            },
            other => {
                return Err(BrowserError::Engine(format!("fake page cannot evaluate {}", other)));
            }
        };

        Ok(value)
    }
}

impl Page for FakePage {
    fn open(&mut self, url: &str) -> Result<()> {
        if self.browser.state.borrow().broken_urls.contains(url) {
            return Err(BrowserError::NavigationFailed(format!("net::ERR_NAME_NOT_RESOLVED at {}", url)));
        }
        self.browser.log(format!("open {}", url));
        Ok(())
    }

    fn evaluate(&mut self, function: &str, args: &[Value]) -> Result<Value> {
        let answer = {
            let mut state = self.browser.state.borrow_mut();
            state.responder.as_mut().and_then(|respond| respond(function, args))
        };
        match answer {
            Some(answer) => answer,
            None => self.dom_script(function, args),
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        self.browser.log(format!("viewport {}x{}", width, height));
        Ok(())
    }

    fn render(&mut self, path: &Path) -> Result<()> {
        self.browser.log(format!("render {}", path.display()));
        Ok(())
    }

    fn send_event(&mut self, event: MouseEvent, x: f64, y: f64) -> Result<()> {
        self.browser.log(format!("mouse {:?} {},{}", event, x, y));
        Ok(())
    }
}

/// Options with a short timeout so polling tests stay small
pub fn options() -> SessionOptions {
    SessionOptions::new()
        .timeout(Duration::from_millis(100))
        .poll_interval(Duration::from_millis(10))
}
