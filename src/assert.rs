//! Assertions with an expect/not contract
//!
//! [`Scope::test`] hands out a fresh [`Test`] for every assertion. The
//! builder starts out expecting the check to hold; [`Test::not`] flips that
//! for the single assertion made through it. Each assertion queues one action
//! that queries the page, compares the answer with the expectation and fails
//! the run with an [`AssertionFailure`] on mismatch.

use crate::actions::{Action, ActionContext, scripts};
use crate::error::{AssertionFailure, BrowserError, Result};
use crate::scope::Scope;
use crate::wait::is_truthy;
use serde_json::Value;

/// Single-use assertion builder
#[derive(Debug)]
pub struct Test<'a, 's> {
    scope: &'a mut Scope<'s>,
    expect: bool,
}

impl<'a, 's> Test<'a, 's> {
    pub(crate) fn new(scope: &'a mut Scope<'s>) -> Self {
        Self { scope, expect: true }
    }

    /// Invert the next assertion
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.expect = !self.expect;
        self
    }

    /// The selected element carries class `name`
    pub fn has_class(self, name: impl Into<String>) -> &'a mut Scope<'s> {
        self.targeted("has_class", Check::HasClass(name.into()))
    }

    /// Exactly `n` elements match the selection
    pub fn count(self, n: usize) -> &'a mut Scope<'s> {
        self.targeted("count", Check::Count(n))
    }

    /// The selected element has a non-empty bounding box
    pub fn visible(self) -> &'a mut Scope<'s> {
        self.targeted("visible", Check::Visible)
    }

    /// The selected element's current value equals `value`
    pub fn value(self, value: impl Into<String>) -> &'a mut Scope<'s> {
        self.targeted("value", Check::Value(value.into()))
    }

    /// The trimmed text of all matches, concatenated, equals `text`
    pub fn text(self, text: impl Into<String>) -> &'a mut Scope<'s> {
        self.targeted("text", Check::Text(text.into()))
    }

    /// The selected checkbox or radio button is checked
    pub fn checked(self) -> &'a mut Scope<'s> {
        self.targeted("checked", Check::Checked)
    }

    /// A page function returns a truthy value
    pub fn eval(self, function: impl Into<String>, args: Vec<Value>) -> &'a mut Scope<'s> {
        let Test { scope, expect } = self;
        scope.enqueue(Assertion {
            selector: None,
            expect,
            check: Check::Eval {
                function: function.into(),
                args,
            },
        })
    }

    fn targeted(self, verb: &'static str, check: Check) -> &'a mut Scope<'s> {
        let Test { scope, expect } = self;
        scope.enqueue_targeted(verb, None, move |selector| Assertion {
            selector: Some(selector),
            expect,
            check,
        })
    }
}

#[derive(Debug, Clone)]
enum Check {
    HasClass(String),
    Count(usize),
    Visible,
    Value(String),
    Text(String),
    Checked,
    Eval { function: String, args: Vec<Value> },
}

/// A queued assertion
#[derive(Debug, Clone)]
struct Assertion {
    selector: Option<String>,
    expect: bool,
    check: Check,
}

/// Outcome of querying the page for one check
struct Observation {
    matched: bool,
    expected: String,
    actual: String,
    message: String,
}

impl Assertion {
    fn selector(&self) -> &str {
        self.selector.as_deref().unwrap_or_default()
    }

    fn observe(&self, context: &mut ActionContext<'_>) -> Result<Observation> {
        let selector = self.selector();
        let target = [Value::from(selector)];
        let not = if self.expect { "" } else { "not " };

        let observation = match &self.check {
            Check::HasClass(name) => {
                let result = context.evaluate(scripts::HAS_CLASS, &[Value::from(selector), Value::from(name.as_str())])?;
                let present = self.found(&result)?.as_bool().unwrap_or(false);
                Observation {
                    matched: present,
                    expected: format!("{}class '{}'", not, name),
                    actual: if present { "present" } else { "absent" }.to_string(),
                    message: format!("expected '{}' {}to have class '{}'", selector, not, name),
                }
            }
            Check::Count(n) => {
                let result = context.evaluate(scripts::COUNT, &target)?;
                let found = result
                    .as_u64()
                    .ok_or_else(|| BrowserError::engine(format!("Unexpected count for {}: {}", selector, result)))?;
                let message = if self.expect {
                    format!("expected {} elements matching '{}', found {}", n, selector, found)
                } else {
                    format!("expected anything but {} elements matching '{}', found {}", n, selector, found)
                };
                Observation {
                    matched: found == *n as u64,
                    expected: format!("{}{}", not, n),
                    actual: found.to_string(),
                    message,
                }
            }
            Check::Visible => {
                let result = context.evaluate(scripts::VISIBLE, &target)?;
                let visible = self.found(&result)?.as_bool().unwrap_or(false);
                Observation {
                    matched: visible,
                    expected: format!("{}visible", not),
                    actual: if visible { "visible" } else { "hidden" }.to_string(),
                    message: format!("expected '{}' {}to be visible", selector, not),
                }
            }
            Check::Value(expected) => {
                let result = context.evaluate(scripts::VALUE, &target)?;
                let actual = match self.found(&result)? {
                    Value::String(value) => value.clone(),
                    _ => return Err(BrowserError::NotAnInput(selector.to_string())),
                };
                Observation {
                    matched: actual == *expected,
                    message: format!(
                        "expected value of '{}' {}to be '{}', found '{}'",
                        selector, not, expected, actual
                    ),
                    expected: expected.clone(),
                    actual,
                }
            }
            Check::Text(expected) => {
                let result = context.evaluate(scripts::TEXT, &target)?;
                let actual = self.found(&result)?.as_str().unwrap_or_default().to_string();
                Observation {
                    matched: actual == *expected,
                    message: format!(
                        "expected text of '{}' {}to be '{}', found '{}'",
                        selector, not, expected, actual
                    ),
                    expected: expected.clone(),
                    actual,
                }
            }
            Check::Checked => {
                let result = context.evaluate(scripts::CHECKED, &target)?;
                let checked = self.found(&result)?.as_bool().unwrap_or(false);
                Observation {
                    matched: checked,
                    expected: format!("{}checked", not),
                    actual: if checked { "checked" } else { "unchecked" }.to_string(),
                    message: format!("expected '{}' {}to be checked", selector, not),
                }
            }
            Check::Eval { function, args } => {
                let result = context.evaluate(function, args)?;
                let truthy = is_truthy(&result);
                Observation {
                    matched: truthy,
                    expected: if self.expect { "truthy" } else { "falsy" }.to_string(),
                    actual: result.to_string(),
                    message: format!(
                        "expected page function to return a {} value, got {}",
                        if self.expect { "truthy" } else { "falsy" },
                        result
                    ),
                }
            }
        };

        Ok(observation)
    }

    /// `null` from an element query means nothing matched
    fn found<'v>(&self, result: &'v Value) -> Result<&'v Value> {
        if result.is_null() {
            return Err(BrowserError::ElementNotFound(self.selector().to_string()));
        }
        Ok(result)
    }
}

impl Action for Assertion {
    fn name(&self) -> &str {
        match self.check {
            Check::HasClass(_) => "test.has_class",
            Check::Count(_) => "test.count",
            Check::Visible => "test.visible",
            Check::Value(_) => "test.value",
            Check::Text(_) => "test.text",
            Check::Checked => "test.checked",
            Check::Eval { .. } => "test.eval",
        }
    }

    fn describe(&self) -> String {
        let not = if self.expect { "" } else { ".not" };
        let name = self.name().trim_start_matches("test.");
        match &self.selector {
            Some(selector) => format!("test{}.{}({})", not, name, selector),
            None => format!("test{}.{}(<fn>)", not, name),
        }
    }

    fn execute(&self, context: &mut ActionContext<'_>) -> Result<()> {
        let observation = self.observe(context)?;
        if observation.matched == self.expect {
            return Ok(());
        }

        Err(BrowserError::Assertion(AssertionFailure {
            selector: self.selector.clone(),
            expected: observation.expected,
            actual: observation.actual,
            message: observation.message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_shows_negation() {
        let assertion = Assertion {
            selector: Some(".item".to_string()),
            expect: false,
            check: Check::Count(3),
        };
        assert_eq!(assertion.name(), "test.count");
        assert_eq!(assertion.describe(), "test.not.count(.item)");
    }

    #[test]
    fn test_describe_eval() {
        let assertion = Assertion {
            selector: None,
            expect: true,
            check: Check::Eval {
                function: "function () { return 1; }".to_string(),
                args: Vec::new(),
            },
        };
        assert_eq!(assertion.describe(), "test.eval(<fn>)");
    }
}
