//! Deep copy of page values into detached, JSON-safe form.
//!
//! The copy is an ordered chain of type tests. Cycles are tracked with an
//! identity set of the containers currently being copied; an identity is
//! un-marked as soon as its subtree finishes, so the same object reached
//! through two sibling paths is copied twice rather than collapsed.
//!
//! Nothing here returns an error to the capture path: every failure
//! degrades to a descriptive placeholder string.

use std::collections::HashSet;
use std::rc::Rc;

use chrono::SecondsFormat;
use serde_json::{Map, Value};

use crate::value::{ComplexObject, PageValue};

/// Marker substituted for a value already being copied higher up the
/// same traversal.
pub const CIRCULAR_REF: &str = "[Circular Reference]";

/// Placeholder for a single record key whose value could not be copied.
pub const PROPERTY_ERROR: &str = "[Error cloning property]";

/// Placeholder for a whole argument whose copy failed at the top level.
pub const ARGUMENT_ERROR: &str = "[Error cloning argument]";

/// Placeholder for an opaque object whose JSON round trip failed.
pub fn non_serializable(constructor: &str) -> String {
    format!("[Non-serializable object: {constructor}]")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyError {
    /// The value itself refuses to be read.
    Poisoned,
    /// Strict round trip hit a function, a poisoned value, or a cycle.
    NonSerializable,
}

/// Produces a structurally equivalent, fully detached, JSON-safe copy.
///
/// Never fails: a value that cannot be copied at all comes back as the
/// [`ARGUMENT_ERROR`] placeholder string.
pub fn deep_copy(value: &PageValue) -> Value {
    let mut seen = HashSet::new();
    match copy_value(value, &mut seen, false) {
        Ok(copied) => copied,
        Err(_) => Value::String(ARGUMENT_ERROR.into()),
    }
}

fn copy_value(value: &PageValue, seen: &mut HashSet<usize>, strict: bool) -> Result<Value, CopyError> {
    match value {
        PageValue::Null | PageValue::Undefined => Ok(Value::Null),
        PageValue::Bool(b) => Ok(Value::Bool(*b)),
        // NaN and infinities have no JSON representation; they become null
        // the way a JSON round trip would make them.
        PageValue::Number(n) => Ok(serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null)),
        PageValue::Str(s) => Ok(Value::String(s.clone())),
        PageValue::Date(d) => Ok(Value::String(
            d.to_rfc3339_opts(SecondsFormat::Millis, true),
        )),
        PageValue::Pattern(p) => Ok(Value::String(p.clone())),
        PageValue::Error {
            name,
            message,
            stack,
        } => {
            let mut map = Map::new();
            map.insert("name".into(), Value::String(name.clone()));
            map.insert("message".into(), Value::String(message.clone()));
            map.insert("stack".into(), Value::String(stack.clone()));
            Ok(Value::Object(map))
        }
        PageValue::Element { tag, id, classes } => {
            Ok(Value::String(element_descriptor(tag, id, classes)))
        }
        PageValue::Array(cell) => {
            let key = Rc::as_ptr(cell) as usize;
            if seen.contains(&key) {
                return circular(strict);
            }
            seen.insert(key);
            let result = copy_items(&cell.borrow(), seen, strict);
            seen.remove(&key);
            result
        }
        PageValue::Object(cell) => {
            let key = Rc::as_ptr(cell) as usize;
            if seen.contains(&key) {
                return circular(strict);
            }
            seen.insert(key);
            let result = copy_fields(&cell.borrow(), seen, strict);
            seen.remove(&key);
            result
        }
        PageValue::Function(_) => {
            if strict {
                Err(CopyError::NonSerializable)
            } else {
                Ok(Value::String(non_serializable("Function")))
            }
        }
        PageValue::Complex(obj) => copy_complex(obj, seen, strict),
        PageValue::Poisoned => Err(CopyError::Poisoned),
    }
}

fn circular(strict: bool) -> Result<Value, CopyError> {
    if strict {
        Err(CopyError::NonSerializable)
    } else {
        Ok(Value::String(CIRCULAR_REF.into()))
    }
}

fn copy_items(
    items: &[PageValue],
    seen: &mut HashSet<usize>,
    strict: bool,
) -> Result<Value, CopyError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(copy_value(item, seen, strict)?);
    }
    Ok(Value::Array(out))
}

fn copy_fields(
    fields: &[(String, PageValue)],
    seen: &mut HashSet<usize>,
    strict: bool,
) -> Result<Value, CopyError> {
    let mut map = Map::with_capacity(fields.len());
    for (key, field) in fields {
        match copy_value(field, seen, strict) {
            Ok(copied) => {
                map.insert(key.clone(), copied);
            }
            Err(e) if strict => return Err(e),
            // One bad property must not fail the whole record.
            Err(_) => {
                map.insert(key.clone(), Value::String(PROPERTY_ERROR.into()));
            }
        }
    }
    Ok(Value::Object(map))
}

/// Opaque objects get a best-effort JSON round trip that fails closed:
/// a function, a poisoned value, or a cycle anywhere inside replaces the
/// whole object with a placeholder naming its constructor.
fn copy_complex(
    obj: &Rc<ComplexObject>,
    seen: &mut HashSet<usize>,
    strict: bool,
) -> Result<Value, CopyError> {
    let key = Rc::as_ptr(obj) as usize;
    if seen.contains(&key) {
        return circular(strict);
    }
    seen.insert(key);
    let attempt = copy_fields(&obj.fields.borrow(), seen, true);
    seen.remove(&key);

    match attempt {
        Ok(copied) => Ok(copied),
        Err(e) if strict => Err(e),
        Err(_) => Ok(Value::String(non_serializable(&obj.constructor))),
    }
}

fn element_descriptor(tag: &str, id: &str, classes: &[String]) -> String {
    let mut out = String::from("[");
    out.push_str(&tag.to_uppercase());
    if !id.is_empty() {
        out.push('#');
        out.push_str(id);
    }
    for class in classes {
        out.push('.');
        out.push_str(class);
    }
    out.push(']');
    out
}
