//! Page functions evaluated by the built-in verbs and assertions
//!
//! Each takes the resolved selector as its first argument. Functions that
//! need an element return `null` when nothing matches, so callers can tell a
//! missing element apart from a negative answer.

/// `true` after dispatching a bubbling click on the first match, `false` if none
pub const CLICK: &str = r#"function (selector) {
    var element = document.querySelector(selector);
    if (!element) return false;
    var event = document.createEvent('MouseEvents');
    event.initEvent('click', true, true);
    element.dispatchEvent(event);
    return true;
}"#;

/// Top-left corner of the first match as `{left, top}`
pub const CLICK_TARGET: &str = r#"function (selector) {
    var element = document.querySelector(selector);
    if (!element) return null;
    var box = element.getBoundingClientRect();
    return { left: Math.ceil(box.left), top: Math.ceil(box.top) };
}"#;

/// `"ok"`, `"missing"` or `"not-input"`; fires `change` after setting the value
pub const SET_VALUE: &str = r#"function (selector, value) {
    var element = document.querySelector(selector);
    if (!element) return 'missing';
    if (typeof element.value === 'undefined') return 'not-input';
    element.value = value;
    var event = document.createEvent('HTMLEvents');
    event.initEvent('change', false, true);
    element.dispatchEvent(event);
    return 'ok';
}"#;

pub const COUNT: &str = r#"function (selector) {
    return document.querySelectorAll(selector).length;
}"#;

pub const HAS_CLASS: &str = r#"function (selector, name) {
    var element = document.querySelector(selector);
    if (!element) return null;
    return element.classList.contains(name);
}"#;

pub const VISIBLE: &str = r#"function (selector) {
    var element = document.querySelector(selector);
    if (!element) return null;
    var box = element.getBoundingClientRect();
    return box.width > 0 && box.height > 0;
}"#;

/// Current value as a string, `false` if the element has no value property
pub const VALUE: &str = r#"function (selector) {
    var element = document.querySelector(selector);
    if (!element) return null;
    if (typeof element.value === 'undefined') return false;
    return String(element.value);
}"#;

/// Trimmed inner text of every match, concatenated
pub const TEXT: &str = r#"function (selector) {
    var elements = document.querySelectorAll(selector);
    if (!elements.length) return null;
    return Array.prototype.map.call(elements, function (element) {
        return (element.innerText || element.textContent || '').trim();
    }).join('');
}"#;

pub const CHECKED: &str = r#"function (selector) {
    var element = document.querySelector(selector);
    if (!element) return null;
    return !!element.checked;
}"#;
