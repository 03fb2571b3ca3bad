use serde_json::Value;

/// Resolves a dot-separated path into a nested record value.
///
/// Returns `None` as soon as a segment is missing or an intermediate value cannot hold named
/// fields. Numeric segments index into arrays. A `null` leaf counts as absent.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use textfilter::dig;
///
/// let record = json!({"build": {"version": "mac-3.1", "tags": ["a", "b"]}});
///
/// assert_eq!(dig(&record, "build.version"), Some(&json!("mac-3.1")));
/// assert_eq!(dig(&record, "build.tags.1"), Some(&json!("b")));
/// assert_eq!(dig(&record, "build.version.name"), None);
/// ```
pub fn dig<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(record, |current, segment| step(current, segment))
        .filter(|v| !v.is_null())
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// The record a predicate is evaluated against.
///
/// A composite subject behaves like the shallow merge of its records, later records
/// overriding the top-level fields of earlier ones.
#[derive(Clone, Copy, Debug)]
pub enum Subject<'a> {
    Single(&'a Value),
    Composite(&'a [Value]),
}

impl<'a> Subject<'a> {
    /// Resolves a dot-separated path through the merged view of the subject.
    pub fn dig(&self, key: &str) -> Option<&'a Value> {
        match *self {
            Subject::Single(record) => dig(record, key),
            Subject::Composite(records) => {
                let (head, rest) = match key.split_once('.') {
                    Some((head, rest)) => (head, Some(rest)),
                    None => (key, None),
                };

                let top = records
                    .iter()
                    .rev()
                    .find_map(|record| record.as_object().and_then(|fields| fields.get(head)))?;

                match rest {
                    Some(rest) => dig(top, rest),
                    None => Some(top).filter(|v| !v.is_null()),
                }
            }
        }
    }
}

/// JSON arrays are treated as composite subjects.
impl<'a> From<&'a Value> for Subject<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Array(records) => Subject::Composite(records),
            record => Subject::Single(record),
        }
    }
}

impl<'a> From<&'a [Value]> for Subject<'a> {
    fn from(records: &'a [Value]) -> Self {
        Subject::Composite(records)
    }
}

impl<'a> From<&'a Vec<Value>> for Subject<'a> {
    fn from(records: &'a Vec<Value>) -> Self {
        Subject::Composite(records)
    }
}
