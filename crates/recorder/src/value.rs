//! Dynamic value model for the page execution context.
//!
//! The page runtime deals in dynamically-typed values: primitives, dates,
//! patterns, errors, DOM elements, arrays, records, and opaque objects.
//! Arrays and records are shared and interior-mutable so that cyclic
//! structures can actually be built, which is what the deep-copy cycle
//! detection is tested against.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::{DateTime, SecondsFormat, Utc};

/// A value as seen by a console call inside the page context.
#[derive(Debug, Clone)]
pub enum PageValue {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Date-like value.
    Date(DateTime<Utc>),
    /// Pattern/regex-like value, held as its textual representation.
    Pattern(String),
    /// Error-like value.
    Error {
        name: String,
        message: String,
        stack: String,
    },
    /// DOM-element-like value.
    Element {
        tag: String,
        id: String,
        classes: Vec<String>,
    },
    /// Ordered sequence. Shared so two paths can reach the same one.
    Array(Rc<RefCell<Vec<PageValue>>>),
    /// Plain record of own enumerable keys, in insertion order.
    Object(Rc<RefCell<Vec<(String, PageValue)>>>),
    /// Function value. Never JSON-serializable.
    Function(String),
    /// Object of some named constructor that is none of the above.
    Complex(Rc<ComplexObject>),
    /// A value whose copy always fails, like a throwing property getter.
    Poisoned,
}

/// An opaque object: a constructor name plus its fields.
#[derive(Debug)]
pub struct ComplexObject {
    pub constructor: String,
    pub fields: RefCell<Vec<(String, PageValue)>>,
}

impl PageValue {
    pub fn str(s: impl Into<String>) -> Self {
        PageValue::Str(s.into())
    }

    pub fn array(items: Vec<PageValue>) -> Self {
        PageValue::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(fields: Vec<(&str, PageValue)>) -> Self {
        PageValue::Object(Rc::new(RefCell::new(
            fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        )))
    }

    pub fn complex(constructor: impl Into<String>, fields: Vec<(&str, PageValue)>) -> Self {
        PageValue::Complex(Rc::new(ComplexObject {
            constructor: constructor.into(),
            fields: RefCell::new(
                fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            ),
        }))
    }

    /// Best-effort stringification, mirroring what the page runtime's
    /// `String(value)` produces. Returns `None` when stringification
    /// itself would fail.
    pub fn display_string(&self) -> Option<String> {
        self.display_with(&mut HashSet::new())
    }

    fn display_with(&self, visiting: &mut HashSet<usize>) -> Option<String> {
        match self {
            PageValue::Null => Some("null".into()),
            PageValue::Undefined => Some("undefined".into()),
            PageValue::Bool(b) => Some(b.to_string()),
            PageValue::Number(n) => Some(format_number(*n)),
            PageValue::Str(s) => Some(s.clone()),
            PageValue::Date(d) => Some(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            PageValue::Pattern(p) => Some(p.clone()),
            PageValue::Error { name, message, .. } => Some(format!("{name}: {message}")),
            PageValue::Element { .. } => Some("[object Element]".into()),
            // Join with cycle protection: an array reached again while it
            // is being rendered comes out empty, as the engine's join does.
            PageValue::Array(items) => {
                let key = Rc::as_ptr(items) as usize;
                if visiting.contains(&key) {
                    return Some(String::new());
                }
                visiting.insert(key);
                let parts: Option<Vec<String>> = items
                    .borrow()
                    .iter()
                    .map(|item| item.display_with(visiting))
                    .collect();
                visiting.remove(&key);
                parts.map(|p| p.join(","))
            }
            PageValue::Object(_) => Some("[object Object]".into()),
            PageValue::Function(name) => Some(format!("function {name}")),
            PageValue::Complex(obj) => Some(format!("[object {}]", obj.constructor)),
            PageValue::Poisoned => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
