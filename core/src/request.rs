//! Turns an operation plus caller arguments into the flat query sent to the
//! service.
//!
//! # Design
//! Output order is fixed: `api_username`, `api_password`, `method`, then the
//! operation's parameters in catalog order. Caller insertion order never
//! leaks into the wire format, so identical inputs always produce identical
//! queries.

use tracing::debug;

use crate::catalog::{BoolEncoding, Operation, ParamKind, ParamSpec, Presence};
use crate::credential::Credential;
use crate::error::ApiError;
use crate::params::{flatten_records, ParamValue, Params};

pub const USERNAME_KEY: &str = "api_username";
pub const PASSWORD_KEY: &str = "api_password";
pub const METHOD_KEY: &str = "method";

/// Build the ordered key/value pairs for one call.
pub fn build_query(
    credential: &Credential,
    operation: &Operation,
    params: &Params,
) -> Result<Vec<(String, String)>, ApiError> {
    if let Some(unknown) = params.names().find(|name| operation.param(name).is_none()) {
        return Err(ApiError::InvalidArgument(format!(
            "{} does not take parameter '{unknown}'",
            operation.method
        )));
    }

    let mut query = vec![
        (USERNAME_KEY.to_string(), credential.username().to_string()),
        (PASSWORD_KEY.to_string(), credential.password().expose().to_string()),
        (METHOD_KEY.to_string(), operation.method.to_string()),
    ];

    for spec in operation.params {
        match params.get(spec.name) {
            None | Some(ParamValue::Null) => {
                if spec.presence == Presence::Required {
                    return Err(ApiError::InvalidArgument(format!(
                        "{} requires parameter '{}'",
                        operation.method, spec.name
                    )));
                }
            }
            Some(value) => encode(operation, spec, value, &mut query)?,
        }
    }

    debug!(
        method = operation.method,
        parameters = query.len() - 3,
        "built request"
    );
    Ok(query)
}

fn encode(
    operation: &Operation,
    spec: &ParamSpec,
    value: &ParamValue,
    query: &mut Vec<(String, String)>,
) -> Result<(), ApiError> {
    let mismatch = || {
        ApiError::InvalidArgument(format!(
            "{}: parameter '{}' expects {}, got {}",
            operation.method,
            spec.name,
            kind_name(spec.kind),
            value.type_name()
        ))
    };
    let mut push = |text: String| query.push((spec.name.to_string(), text));

    match (spec.kind, value) {
        (ParamKind::Str, ParamValue::Str(s)) => push(s.clone()),
        (ParamKind::Str, ParamValue::Int(i)) => push(i.to_string()),
        (ParamKind::Int, ParamValue::Int(i)) => {
            if !(spec.presence == Presence::OmitIfZero && *i == 0) {
                push(i.to_string());
            }
        }
        (ParamKind::Int, ParamValue::Str(s)) => {
            let i: i64 = s.trim().parse().map_err(|_| {
                ApiError::InvalidArgument(format!(
                    "{}: parameter '{}' expects integer, got '{s}'",
                    operation.method, spec.name
                ))
            })?;
            if !(spec.presence == Presence::OmitIfZero && i == 0) {
                push(i.to_string());
            }
        }
        (ParamKind::Bool(encoding), ParamValue::Bool(b)) => match (encoding, b) {
            (BoolEncoding::OneOrEmpty, true) => push("1".to_string()),
            (BoolEncoding::OneOrEmpty, false) => push(String::new()),
            (BoolEncoding::TrueOrAbsent, true) => push("True".to_string()),
            (BoolEncoding::TrueOrAbsent, false) => {}
        },
        (ParamKind::Records, ParamValue::Records(records)) => {
            // An empty list or row puts nothing on the wire, which the
            // service reads as "not sent".
            if records.is_empty() && spec.presence == Presence::Required {
                return Err(ApiError::InvalidArgument(format!(
                    "{}: parameter '{}' needs at least one record",
                    operation.method, spec.name
                )));
            }
            if let Some(index) = records.iter().position(|record| record.is_empty()) {
                return Err(ApiError::InvalidArgument(format!(
                    "{}: record {index} of '{}' has no fields",
                    operation.method, spec.name
                )));
            }
            query.extend(flatten_records(spec.name, records));
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

fn kind_name(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Str => "string",
        ParamKind::Int => "integer",
        ParamKind::Bool(_) => "boolean",
        ParamKind::Records => "array of records",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::operation;
    use crate::params::Record;

    fn credential() -> Credential {
        Credential::new("user@example.com", "s3cret")
    }

    fn build(method: &str, params: Params) -> Result<Vec<(String, String)>, ApiError> {
        build_query(&credential(), operation(method).unwrap(), &params)
    }

    fn keys(query: &[(String, String)]) -> Vec<&str> {
        query.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn mandatory_keys_lead_every_request() {
        let query = build("getIP", Params::new()).unwrap();
        assert_eq!(
            query,
            vec![
                ("api_username".to_string(), "user@example.com".to_string()),
                ("api_password".to_string(), "s3cret".to_string()),
                ("method".to_string(), "getIP".to_string()),
            ]
        );
    }

    #[test]
    fn presence_flag_omitted_when_false() {
        let query = build("getBalance", Params::new().with("advanced", false)).unwrap();
        assert_eq!(keys(&query), ["api_username", "api_password", "method"]);

        let query = build("getBalance", Params::new().with("advanced", true)).unwrap();
        assert_eq!(query[3], ("advanced".to_string(), "True".to_string()));
    }

    #[test]
    fn one_or_empty_flag_always_sent() {
        let base = Params::new()
            .with("client", "100")
            .with("charge", "5.00")
            .with("description", "setup");
        let query = build("addCharge", base.clone().with("testing", false)).unwrap();
        assert_eq!(query.last().unwrap(), &("testing".to_string(), String::new()));

        let query = build("addCharge", base.with("testing", true)).unwrap();
        assert_eq!(query.last().unwrap(), &("testing".to_string(), "1".to_string()));
    }

    #[test]
    fn empty_string_and_zero_are_sent() {
        let query = build(
            "getConferenceRecordings",
            Params::new().with("conference", 0).with("date_from", ""),
        )
        .unwrap();
        assert_eq!(
            &query[3..],
            [
                ("conference".to_string(), "0".to_string()),
                ("date_from".to_string(), String::new())
            ]
        );
    }

    #[test]
    fn null_marker_is_absence() {
        let query = build("getSubAccounts", Params::new().with("account", None::<String>)).unwrap();
        assert_eq!(query.len(), 3);
    }

    #[test]
    fn zero_sentinel_is_omitted() {
        let query = build("getSequences", Params::new().with("client", 0)).unwrap();
        assert_eq!(query.len(), 3);

        let query = build("getSequences", Params::new().with("client", 42)).unwrap();
        assert_eq!(query[3], ("client".to_string(), "42".to_string()));
    }

    #[test]
    fn all_optional_absent_is_a_valid_request() {
        let query = build("getSequences", Params::new()).unwrap();
        assert_eq!(keys(&query), ["api_username", "api_password", "method"]);
    }

    #[test]
    fn missing_required_parameter_fails() {
        let err = build("getConference", Params::new()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(ref m) if m.contains("conference")));

        let err = build("getConference", Params::new().with("conference", None::<i64>)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn non_numeric_string_for_integer_fails() {
        let err = build("getConference", Params::new().with("conference", "abc")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(ref m) if m.contains("'abc'")));
    }

    #[test]
    fn numeric_string_for_integer_is_normalized() {
        let query = build("getConference", Params::new().with("conference", " 12 ")).unwrap();
        assert_eq!(query[3].1, "12");
    }

    #[test]
    fn wrong_shape_fails() {
        let err = build("getBalance", Params::new().with("advanced", "yes")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(ref m) if m.contains("expects boolean")));
    }

    #[test]
    fn unknown_parameter_fails() {
        let err = build("getIP", Params::new().with("verbose", true)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(ref m) if m.contains("verbose")));
    }

    #[test]
    fn schema_order_wins_over_insertion_order() {
        let a = build(
            "getTransactionHistory",
            Params::new().with("date_to", "2024-02-01").with("date_from", "2024-01-01"),
        )
        .unwrap();
        let b = build(
            "getTransactionHistory",
            Params::new().with("date_from", "2024-01-01").with("date_to", "2024-02-01"),
        )
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(keys(&a)[3..], ["date_from", "date_to"]);
    }

    /// Two different values for a parameter of `kind` that are both sent.
    fn sample(kind: ParamKind, second: bool) -> ParamValue {
        let row = |step: &str| -> Record {
            [("type", step)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        match (kind, second) {
            (ParamKind::Str, false) => ParamValue::from("value"),
            (ParamKind::Str, true) => ParamValue::from(""),
            (ParamKind::Int, false) => ParamValue::from(1),
            (ParamKind::Int, true) => ParamValue::from("42"),
            (ParamKind::Bool(BoolEncoding::OneOrEmpty), flip) => ParamValue::from(flip),
            // `false` is how this encoding spells "not sent".
            (ParamKind::Bool(BoolEncoding::TrueOrAbsent), _) => ParamValue::from(true),
            (ParamKind::Records, false) => ParamValue::from(vec![row("tone")]),
            (ParamKind::Records, true) => ParamValue::from(vec![row("pause")]),
        }
    }

    #[test]
    fn key_set_depends_only_on_presence() {
        for op in crate::catalog::CATALOG {
            let fill = |second: bool| {
                op.params.iter().fold(Params::new(), |params, spec| {
                    params.with(spec.name, sample(spec.kind, second))
                })
            };
            let one = build_query(&credential(), op, &fill(false))
                .unwrap_or_else(|e| panic!("{}: {e}", op.method));
            let other = build_query(&credential(), op, &fill(true))
                .unwrap_or_else(|e| panic!("{}: {e}", op.method));
            assert_eq!(keys(&one), keys(&other), "{}", op.method);
        }
    }

    #[test]
    fn records_are_flattened_in_place() {
        let step: Record = [("type", "tone"), ("tone", "440")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let query = build(
            "setSequences",
            Params::new()
                .with("steps", vec![step])
                .with("name", "ring")
                .with("sequence", "7"),
        )
        .unwrap();
        assert_eq!(
            keys(&query)[3..],
            ["sequence", "name", "steps[0][type]", "steps[0][tone]"]
        );
    }

    #[test]
    fn empty_required_records_fail() {
        let err = build(
            "setSequences",
            Params::new()
                .with("sequence", "7")
                .with("name", "ring")
                .with("steps", Vec::<Record>::new()),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(ref m) if m.contains("steps")));
    }

    #[test]
    fn empty_record_row_fails() {
        let step: Record = [("type".to_string(), "tone".to_string())].into_iter().collect();
        let err = build(
            "setSequences",
            Params::new()
                .with("sequence", "7")
                .with("name", "ring")
                .with("steps", vec![Record::new(), step]),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(ref m) if m.contains("record 0")));
    }
}
