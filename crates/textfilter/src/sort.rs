use std::borrow::Borrow;
use std::cmp::Ordering;

use serde_json::Value;

use crate::dig::dig;

/// Sorts records by the value found at a dotted path.
///
/// The sort is stable. Records where the path is absent always come last, in both directions.
pub fn dig_sort<T: Borrow<Value>>(records: &mut [T], key: &str, reverse: bool) {
    records.sort_by(|a, b| compare_dug(a.borrow(), b.borrow(), key, reverse));
}

/// Sorts records by several dotted paths, the first key being the most significant.
pub fn dig_sort_many<T: Borrow<Value>, K: AsRef<str>>(records: &mut [T], keys: &[K]) {
    records.sort_by(|a, b| {
        keys.iter().fold(Ordering::Equal, |ordering, key| {
            ordering.then_with(|| compare_dug(a.borrow(), b.borrow(), key.as_ref(), false))
        })
    });
}

fn compare_dug(a: &Value, b: &Value, key: &str, reverse: bool) -> Ordering {
    match (dig(a, key), dig(b, key)) {
        (Some(a), Some(b)) if reverse => compare_values(b, a),
        (Some(a), Some(b)) => compare_values(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values.
///
/// Values of different types are ordered by type: null, booleans, numbers, strings, arrays, objects.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(a, b)| compare_values(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Object(a), Value::Object(b)) => a.len().cmp(&b.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}
