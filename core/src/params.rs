//! Caller-supplied parameter sets.
//!
//! # Design
//! A key that was never inserted means "not supplied". A key holding
//! [`ParamValue::Null`] is an explicit absence marker for a nullable
//! parameter. Both are dropped by the request builder, while an empty
//! string, `0` or `false` are real values and are sent.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// One row of an array-of-records parameter (e.g. a sequence step).
pub type Record = IndexMap<String, String>;

/// A single argument value before it is encoded for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Records(Vec<Record>),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Short name of the value's shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "boolean",
            ParamValue::Int(_) => "integer",
            ParamValue::Str(_) => "string",
            ParamValue::Records(_) => "array of records",
        }
    }

    /// Convert a decoded JSON value. Nested objects and arrays of anything
    /// other than flat objects are rejected.
    pub fn from_json(name: &str, value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::Null => Ok(ParamValue::Null),
            Value::Bool(b) => Ok(ParamValue::Bool(*b)),
            Value::Number(n) => n.as_i64().map(ParamValue::Int).ok_or_else(|| {
                ApiError::InvalidArgument(format!("parameter '{name}': {n} is not an integer"))
            }),
            Value::String(s) => Ok(ParamValue::Str(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| record_from_json(name, item))
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::Records),
            Value::Object(_) => Err(ApiError::InvalidArgument(format!(
                "parameter '{name}': objects must be wrapped in an array of records"
            ))),
        }
    }
}

fn record_from_json(name: &str, item: &Value) -> Result<Record, ApiError> {
    let Value::Object(fields) = item else {
        return Err(ApiError::InvalidArgument(format!(
            "parameter '{name}': array elements must be records"
        )));
    };
    fields
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(true) => "1".to_string(),
                Value::Bool(false) => String::new(),
                _ => {
                    return Err(ApiError::InvalidArgument(format!(
                        "parameter '{name}': record field '{key}' must be a scalar"
                    )))
                }
            };
            Ok((key.clone(), text))
        })
        .collect()
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<Vec<Record>> for ParamValue {
    fn from(value: Vec<Record>) -> Self {
        ParamValue::Records(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Named arguments for one operation call, in insertion order.
///
/// Insertion order is kept for inspection only; the wire order always
/// follows the operation's declared parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: IndexMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. `None` becomes the null marker.
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Build a parameter set from a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        let Value::Object(map) = value else {
            return Err(ApiError::InvalidArgument(
                "parameters must be a JSON object".to_string(),
            ));
        };
        let mut params = Params::new();
        for (name, value) in map {
            params.insert(name, ParamValue::from_json(name, value)?);
        }
        Ok(params)
    }

    /// Build a parameter set from any serializable argument record.
    ///
    /// Fields skipped during serialization are "not supplied"; fields that
    /// serialize to `null` carry the null marker.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(record)
            .map_err(|e| ApiError::InvalidArgument(format!("unserializable arguments: {e}")))?;
        Self::from_json(&value)
    }
}

/// Flatten an array-of-records parameter into `name[i][field]=value` pairs.
///
/// Rows and fields keep their input order, which is what the service relies
/// on when it re-parses the query.
pub fn flatten_records(name: &str, records: &[Record]) -> Vec<(String, String)> {
    records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| {
            record
                .iter()
                .map(move |(field, value)| (format!("{name}[{index}][{field}]"), value.clone()))
        })
        .collect()
}

/// Inverse of [`flatten_records`]: recover the ordered rows for `name` from
/// decoded query pairs. Pairs for other keys are ignored.
pub fn parse_records<'a, I>(name: &str, pairs: I) -> Result<Vec<Record>, ApiError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut rows: IndexMap<usize, Record> = IndexMap::new();
    for (key, value) in pairs {
        let Some(rest) = key.strip_prefix(name).and_then(|r| r.strip_prefix('[')) else {
            continue;
        };
        let malformed = || ApiError::InvalidArgument(format!("malformed record key '{key}'"));
        let (index, rest) = rest.split_once("][").ok_or_else(malformed)?;
        let field = rest.strip_suffix(']').ok_or_else(malformed)?;
        let index: usize = index.parse().map_err(|_| malformed())?;
        rows.entry(index)
            .or_default()
            .insert(field.to_string(), value.to_string());
    }
    rows.sort_keys();
    let expected: Vec<usize> = (0..rows.len()).collect();
    if rows.keys().copied().ne(expected) {
        return Err(ApiError::InvalidArgument(format!(
            "record indexes for '{name}' are not contiguous"
        )));
    }
    Ok(rows.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> Record {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn none_becomes_null_marker() {
        let params = Params::new().with("account", None::<String>);
        assert_eq!(params.get("account"), Some(&ParamValue::Null));
        assert!(params.get("client").is_none());
    }

    #[test]
    fn empty_zero_and_false_are_values() {
        let params = Params::new()
            .with("a", "")
            .with("b", 0)
            .with("c", false);
        assert_eq!(params.get("a"), Some(&ParamValue::Str(String::new())));
        assert_eq!(params.get("b"), Some(&ParamValue::Int(0)));
        assert_eq!(params.get("c"), Some(&ParamValue::Bool(false)));
    }

    #[test]
    fn from_json_maps_each_shape() {
        let value = serde_json::json!({
            "s": "x",
            "i": 7,
            "b": true,
            "n": null,
            "r": [{"type": "tone", "duration": 100}]
        });
        let params = Params::from_json(&value).unwrap();
        assert_eq!(params.get("s"), Some(&ParamValue::Str("x".to_string())));
        assert_eq!(params.get("i"), Some(&ParamValue::Int(7)));
        assert_eq!(params.get("b"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("n"), Some(&ParamValue::Null));
        assert_eq!(
            params.get("r"),
            Some(&ParamValue::Records(vec![record(&[
                ("type", "tone"),
                ("duration", "100")
            ])]))
        );
    }

    #[test]
    fn from_json_rejects_fractions_and_objects() {
        assert!(matches!(
            Params::from_json(&serde_json::json!({"x": 1.5})),
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            Params::from_json(&serde_json::json!({"x": {"a": 1}})),
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            Params::from_json(&serde_json::json!([1, 2])),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn from_record_skips_and_nulls() {
        #[derive(Serialize)]
        struct Args {
            client: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            email: Option<String>,
            company: Option<String>,
        }
        let params = Params::from_record(&Args {
            client: "100".to_string(),
            email: None,
            company: None,
        })
        .unwrap();
        assert_eq!(params.len(), 2);
        assert!(params.get("email").is_none());
        assert_eq!(params.get("company"), Some(&ParamValue::Null));
    }

    #[test]
    fn flatten_uses_indexed_keys_in_order() {
        let steps = vec![
            record(&[("type", "tone"), ("tone", "440")]),
            record(&[("type", "pause"), ("duration", "2")]),
        ];
        let pairs = flatten_records("steps", &steps);
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "steps[0][type]",
                "steps[0][tone]",
                "steps[1][type]",
                "steps[1][duration]"
            ]
        );
    }

    #[test]
    fn parse_records_recovers_flattened_sequence() {
        let steps = vec![
            record(&[("type", "tone"), ("tone", "440")]),
            record(&[("type", "pause"), ("duration", "2")]),
            record(&[("type", "dtmf"), ("digits", "12#")]),
        ];
        let mut pairs = vec![("method".to_string(), "setSequences".to_string())];
        pairs.extend(flatten_records("steps", &steps));
        let parsed =
            parse_records("steps", pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))).unwrap();
        assert_eq!(parsed, steps);
    }

    #[test]
    fn parse_records_rejects_gaps() {
        let pairs = [("steps[0][type]", "tone"), ("steps[2][type]", "pause")];
        assert!(parse_records("steps", pairs).is_err());
    }

    #[test]
    fn parse_records_ignores_prefix_lookalikes() {
        let pairs = [("stepsize", "3"), ("steps[0][type]", "tone")];
        let parsed = parse_records("steps", pairs).unwrap();
        assert_eq!(parsed, vec![record(&[("type", "tone")])]);
    }
}
