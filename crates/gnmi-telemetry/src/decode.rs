//! Response decoding.
//!
//! A gNMI notification is flattened into a [`FlatMap`]: `/`-joined leaf
//! paths mapped to string values, plus the synthetic keys [`POLICY_NAME_KEY`]
//! and [`RULE_NAME_KEY`] taken from the response path. Two encodings are
//! handled:
//!
//! - JSON IETF: each update carries a JSON tree under its own path, which is
//!   flattened here. The policy and rule keys come from the update path.
//! - PROTO: each update carries one typed scalar under a leaf path. The policy
//!   and rule keys come from the notification prefix.

use crate::counter::Counter;
use crate::error::{DecodeError, DecodeResult};
use crate::path::{elem_key, path_to_string};
use serde_json::Value;
use sonic_gnmi_proto::gnmi::{
    subscribe_response, typed_value, Notification, Path, SubscribeResponse, Update,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Flattened view of one notification.
pub type FlatMap = HashMap<String, String>;

/// Synthetic key holding the policy-map name of the response.
pub const POLICY_NAME_KEY: &str = "policy_name";

/// Synthetic key holding the rule name of the response.
pub const RULE_NAME_KEY: &str = "rule_name";

/// Value recorded for typed scalars this decoder does not render.
pub const UNSUPPORTED_TYPE: &str = "unsupported_type";

const POLICY_MAP_ELEM: &str = "policy-map";
const POLICY_NAME_ATTR: &str = "policy-name";
const RULE_NAME_ELEM: &str = "rule-name";
const RULE_NAME_ATTR: &str = "rule-name";

/// Encoding observed on a decoded update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateEncoding {
    Proto,
    JsonIetf,
}

/// Decodes a JSON IETF update into flattened leaf keys.
///
/// Nested objects join their member names with `/`. An array index `0` that
/// is followed by a deeper key is dropped, so a single-element list wrapping
/// a container collapses into the container. Non-string leaves render in
/// their JSON form, string leaves are copied as-is.
///
/// Returns [`DecodeError::Syntax`] if the payload is not well-formed JSON.
pub fn decode_json_ietf(update: &Update) -> DecodeResult<FlatMap> {
    let payload = match update.val.as_ref().and_then(|v| v.value.as_ref()) {
        Some(typed_value::Value::JsonIetfVal(bytes)) => bytes.as_slice(),
        _ => &[],
    };
    let tree: Value = serde_json::from_slice(payload)?;

    let mut flat = FlatMap::new();
    flatten_json(&tree, String::new(), &mut flat);
    Ok(flat)
}

fn flatten_json(value: &Value, prefix: String, out: &mut FlatMap) {
    match value {
        Value::Object(members) if !members.is_empty() => {
            for (name, child) in members {
                let key = format!("{}/{}", prefix, escape_pointer_token(name));
                flatten_json(child, key, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                let collapse = index == 0 && is_container(child);
                let key = if collapse {
                    prefix.clone()
                } else {
                    format!("{prefix}/{index}")
                };
                flatten_json(child, key, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        // Scalars and empty containers render as JSON text.
        Value::Object(_) | Value::Array(_) => {
            out.insert(prefix, Value::Null.to_string());
        }
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}

fn is_container(value: &Value) -> bool {
    match value {
        Value::Object(members) => !members.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Decodes a PROTO update into one `(path, value)` pair.
///
/// The key is the update's own path. Unsigned, signed and double values
/// render in decimal, booleans as `true`/`false`, strings as-is. Other kinds
/// render as [`UNSUPPORTED_TYPE`].
pub fn decode_proto(update: &Update) -> (String, String) {
    let key = update.path.as_ref().map(path_to_string).unwrap_or_default();
    let value = match update.val.as_ref().and_then(|v| v.value.as_ref()) {
        Some(typed_value::Value::UintVal(v)) => v.to_string(),
        Some(typed_value::Value::IntVal(v)) => v.to_string(),
        Some(typed_value::Value::StringVal(v)) => v.clone(),
        Some(typed_value::Value::BoolVal(v)) => v.to_string(),
        Some(typed_value::Value::DoubleVal(v)) => v.to_string(),
        _ => UNSUPPORTED_TYPE.to_string(),
    };
    (key, value)
}

/// Flattens a notification and attaches the policy and rule names.
///
/// The prefix origin must contain `path_origin`. Updates without a path or a
/// value are skipped. The path searched for policy/rule keys is the prefix
/// when the last decoded update was PROTO, otherwise the path of the last
/// JSON IETF update.
pub fn parse_notification(notification: &Notification, path_origin: &str) -> DecodeResult<FlatMap> {
    let prefix = match notification.prefix.as_ref() {
        Some(prefix) if !prefix.origin.is_empty() => prefix,
        _ => {
            warn!("Response contained no prefix");
            return Err(DecodeError::NoPrefixInResponse);
        }
    };
    if !prefix.origin.contains(path_origin) {
        warn!(origin = %prefix.origin, expected = %path_origin, "Response contained wrong prefix");
        return Err(DecodeError::UnknownError(format!(
            "unexpected prefix origin '{}'",
            prefix.origin
        )));
    }

    if notification.update.is_empty() {
        debug!("Update does not exist");
        return Err(DecodeError::NoUpdateInNotification);
    }

    let mut flat = FlatMap::new();
    let mut encoding = UpdateEncoding::Proto;
    let mut json_path: Option<&Path> = None;

    for update in &notification.update {
        let (Some(path), Some(val)) = (update.path.as_ref(), update.val.as_ref()) else {
            continue;
        };
        if matches!(val.value, Some(typed_value::Value::JsonIetfVal(_))) {
            encoding = UpdateEncoding::JsonIetf;
            json_path = Some(path);
            flat.extend(decode_json_ietf(update)?);
        } else {
            encoding = UpdateEncoding::Proto;
            let (key, value) = decode_proto(update);
            flat.insert(key, value);
        }
    }

    let printed_path = match (encoding, json_path) {
        (UpdateEncoding::JsonIetf, Some(path)) => path,
        _ => prefix,
    };

    let policy = elem_key(printed_path, POLICY_MAP_ELEM, POLICY_NAME_ATTR).filter(|p| !p.is_empty());
    let Some(policy) = policy else {
        warn!(path = %path_to_string(printed_path), "Could not find policy name on return path");
        return Err(DecodeError::NoPolicyNameInResponse);
    };
    let rule = elem_key(printed_path, RULE_NAME_ELEM, RULE_NAME_ATTR).filter(|r| !r.is_empty());
    let Some(rule) = rule else {
        warn!(path = %path_to_string(printed_path), "Could not find rule name on return path");
        return Err(DecodeError::NoRuleNameInResponse);
    };

    flat.insert(POLICY_NAME_KEY.to_string(), policy.to_string());
    flat.insert(RULE_NAME_KEY.to_string(), rule.to_string());
    Ok(flat)
}

/// Turns one subscribe response into a counter record.
///
/// A `sync_response` marker, or a response with no notification, yields
/// [`DecodeError::NoNotification`].
pub fn check_response<C: Counter + ?Sized>(
    response: &SubscribeResponse,
    counter: &C,
) -> DecodeResult<C::Stat> {
    match response.response.as_ref() {
        Some(subscribe_response::Response::Update(notification)) => {
            let flat = parse_notification(notification, counter.path_origin())?;
            counter.from_map(&flat)
        }
        Some(subscribe_response::Response::SyncResponse(_)) => {
            debug!("Target has sent all values associated with the subscription at least once");
            Err(DecodeError::NoNotification)
        }
        Some(subscribe_response::Response::Error(error)) => {
            warn!(code = error.code, message = %error.message, "Target reported an error in the response");
            Err(DecodeError::NoNotification)
        }
        None => {
            debug!("No new notifications");
            Err(DecodeError::NoNotification)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::string_to_path;
    use pretty_assertions::assert_eq;
    use sonic_gnmi_proto::gnmi::TypedValue;

    const ORIGIN: &str = "Cisco-IOS-XR-pbr-fwd-stats-oper";

    fn json_update(path: &str, json: &str) -> Update {
        Update {
            path: Some(string_to_path(path).unwrap()),
            val: Some(TypedValue {
                value: Some(typed_value::Value::JsonIetfVal(json.as_bytes().to_vec())),
            }),
            duplicates: 0,
        }
    }

    fn typed_update(path: &str, value: typed_value::Value) -> Update {
        Update {
            path: Some(string_to_path(path).unwrap()),
            val: Some(TypedValue { value: Some(value) }),
            duplicates: 0,
        }
    }

    fn prefix(origin: &str, path: &str) -> Option<Path> {
        let mut prefix = string_to_path(path).unwrap();
        prefix.origin = origin.to_string();
        Some(prefix)
    }

    fn map(entries: &[(&str, &str)]) -> FlatMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_json_ietf_nested() {
        let update = json_update(
            "/x",
            r#"{"fib-stats":{"byte-count":1000,"packet-count":500,"collection-timestamp":{"seconds":17,"nano-seconds":9}}}"#,
        );
        let flat = decode_json_ietf(&update).unwrap();
        assert_eq!(
            flat,
            map(&[
                ("/fib-stats/byte-count", "1000"),
                ("/fib-stats/packet-count", "500"),
                ("/fib-stats/collection-timestamp/seconds", "17"),
                ("/fib-stats/collection-timestamp/nano-seconds", "9"),
            ])
        );
    }

    #[test]
    fn test_decode_json_ietf_collapses_single_element_array() {
        let update = json_update(
            "/x",
            r#"{"paction":{"policy-rule-action":[{"act-un":{"type":"T"}}]}}"#,
        );
        let flat = decode_json_ietf(&update).unwrap();
        assert_eq!(flat, map(&[("/paction/policy-rule-action/act-un/type", "T")]));
    }

    #[test]
    fn test_decode_json_ietf_scalar_arrays_keep_index() {
        let update = json_update("/x", r#"{"list":[1,2],"objs":[{"a":1},{"a":2}]}"#);
        let flat = decode_json_ietf(&update).unwrap();
        assert_eq!(
            flat,
            map(&[
                ("/list/0", "1"),
                ("/list/1", "2"),
                ("/objs/a", "1"),
                ("/objs/1/a", "2"),
            ])
        );
    }

    #[test]
    fn test_decode_json_ietf_leaf_rendering() {
        let update = json_update(
            "/x",
            r#"{"s":"text","b":true,"f":1.5,"n":null,"e":{},"neg":-3}"#,
        );
        let flat = decode_json_ietf(&update).unwrap();
        assert_eq!(
            flat,
            map(&[
                ("/s", "text"),
                ("/b", "true"),
                ("/f", "1.5"),
                ("/n", "null"),
                ("/e", "null"),
                ("/neg", "-3"),
            ])
        );
    }

    #[test]
    fn test_decode_json_ietf_escapes_member_names() {
        let update = json_update("/x", r#"{"a/b":{"c~d":"v"}}"#);
        let flat = decode_json_ietf(&update).unwrap();
        assert_eq!(flat, map(&[("/a~1b/c~0d", "v")]));
    }

    #[test]
    fn test_decode_json_ietf_missing_fields() {
        let update = json_update("/x", r#"{"fib-stats":{"byte-count":1000}}"#);
        let flat = decode_json_ietf(&update).unwrap();
        assert_eq!(flat.get("/fib-stats/byte-count").map(String::as_str), Some("1000"));
        assert!(!flat.contains_key("/fib-stats/packet-count"));
    }

    #[test]
    fn test_decode_json_ietf_malformed() {
        let update = json_update("/x", r#"{"fib-stats":{"byte-count":1000"#);
        let err = decode_json_ietf(&update).unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
        assert!(err.is_fault());
    }

    #[test]
    fn test_decode_proto_values() {
        let cases = [
            (typed_value::Value::UintVal(42), "42"),
            (typed_value::Value::IntVal(-7), "-7"),
            (typed_value::Value::StringVal("abc".to_string()), "abc"),
            (typed_value::Value::BoolVal(true), "true"),
            (typed_value::Value::BoolVal(false), "false"),
            (typed_value::Value::DoubleVal(2.5), "2.5"),
            (typed_value::Value::BytesVal(vec![1, 2]), UNSUPPORTED_TYPE),
            (typed_value::Value::AsciiVal("x".to_string()), UNSUPPORTED_TYPE),
        ];
        for (value, expected) in cases {
            let update = typed_update("/fib-stats/byte-count", value);
            assert_eq!(
                decode_proto(&update),
                ("/fib-stats/byte-count".to_string(), expected.to_string())
            );
        }
    }

    #[test]
    fn test_parse_notification_json_ietf() {
        let notification = Notification {
            prefix: prefix(&format!("{ORIGIN}-extra"), ""),
            update: vec![json_update(
                "/pbr-stats/policy-maps/policy-map[policy-name=P]/rule-names/rule-name[rule-name=R]",
                r#"{"fib-stats":{"byte-count":1000,"packet-count":500}}"#,
            )],
            ..Default::default()
        };
        let flat = parse_notification(&notification, ORIGIN).unwrap();
        assert_eq!(
            flat,
            map(&[
                (POLICY_NAME_KEY, "P"),
                (RULE_NAME_KEY, "R"),
                ("/fib-stats/byte-count", "1000"),
                ("/fib-stats/packet-count", "500"),
            ])
        );
    }

    #[test]
    fn test_parse_notification_proto_uses_prefix() {
        let notification = Notification {
            prefix: prefix(
                ORIGIN,
                "/pbr-stats/policy-maps/policy-map[policy-name=P2]/rule-names/rule-name[rule-name=R2]",
            ),
            update: vec![
                typed_update("/fib-stats/byte-count", typed_value::Value::UintVal(10)),
                typed_update("/fib-stats/packet-count", typed_value::Value::UintVal(2)),
            ],
            ..Default::default()
        };
        let flat = parse_notification(&notification, ORIGIN).unwrap();
        assert_eq!(
            flat,
            map(&[
                (POLICY_NAME_KEY, "P2"),
                (RULE_NAME_KEY, "R2"),
                ("/fib-stats/byte-count", "10"),
                ("/fib-stats/packet-count", "2"),
            ])
        );
    }

    #[test]
    fn test_parse_notification_skips_updates_without_value() {
        let mut bare = typed_update("/fib-stats/byte-count", typed_value::Value::UintVal(1));
        bare.val = None;
        let notification = Notification {
            prefix: prefix(ORIGIN, "/policy-map[policy-name=P]/rule-name[rule-name=R]"),
            update: vec![bare],
            ..Default::default()
        };
        let flat = parse_notification(&notification, ORIGIN).unwrap();
        assert_eq!(flat, map(&[(POLICY_NAME_KEY, "P"), (RULE_NAME_KEY, "R")]));
    }

    #[test]
    fn test_parse_notification_no_updates() {
        let notification = Notification {
            prefix: prefix(ORIGIN, "/policy-map[policy-name=P]"),
            ..Default::default()
        };
        assert!(matches!(
            parse_notification(&notification, ORIGIN),
            Err(DecodeError::NoUpdateInNotification)
        ));
    }

    #[test]
    fn test_parse_notification_no_prefix() {
        let notification = Notification {
            update: vec![typed_update("/a", typed_value::Value::UintVal(1))],
            ..Default::default()
        };
        assert!(matches!(
            parse_notification(&notification, ORIGIN),
            Err(DecodeError::NoPrefixInResponse)
        ));

        let empty_origin = Notification {
            prefix: prefix("", "/a"),
            update: vec![typed_update("/a", typed_value::Value::UintVal(1))],
            ..Default::default()
        };
        assert!(matches!(
            parse_notification(&empty_origin, ORIGIN),
            Err(DecodeError::NoPrefixInResponse)
        ));
    }

    #[test]
    fn test_parse_notification_wrong_origin() {
        let notification = Notification {
            prefix: prefix("openconfig-interfaces", "/policy-map[policy-name=P]"),
            update: vec![typed_update("/a", typed_value::Value::UintVal(1))],
            ..Default::default()
        };
        let err = parse_notification(&notification, ORIGIN).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownError(_)));
    }

    #[test]
    fn test_parse_notification_missing_policy() {
        let notification = Notification {
            prefix: prefix(ORIGIN, "/rule-names/rule-name[rule-name=R]"),
            update: vec![typed_update("/a", typed_value::Value::UintVal(1))],
            ..Default::default()
        };
        assert!(matches!(
            parse_notification(&notification, ORIGIN),
            Err(DecodeError::NoPolicyNameInResponse)
        ));
    }

    #[test]
    fn test_parse_notification_missing_rule() {
        let notification = Notification {
            prefix: prefix(ORIGIN, "/policy-maps/policy-map[policy-name=P]"),
            update: vec![typed_update("/a", typed_value::Value::UintVal(1))],
            ..Default::default()
        };
        assert!(matches!(
            parse_notification(&notification, ORIGIN),
            Err(DecodeError::NoRuleNameInResponse)
        ));
    }

    #[test]
    fn test_parse_notification_malformed_json_propagates() {
        let notification = Notification {
            prefix: prefix(ORIGIN, ""),
            update: vec![json_update(
                "/policy-map[policy-name=P]/rule-name[rule-name=R]",
                "{not json",
            )],
            ..Default::default()
        };
        assert!(matches!(
            parse_notification(&notification, ORIGIN),
            Err(DecodeError::Syntax(_))
        ));
    }

    #[test]
    fn test_parse_notification_last_update_decides_path() {
        // A trailing PROTO update switches the lookup back to the prefix,
        // which carries no policy key here.
        let notification = Notification {
            prefix: prefix(ORIGIN, "/pbr-stats"),
            update: vec![
                json_update(
                    "/policy-map[policy-name=P]/rule-name[rule-name=R]",
                    r#"{"fib-stats":{"byte-count":1}}"#,
                ),
                typed_update("/fib-stats/packet-count", typed_value::Value::UintVal(2)),
            ],
            ..Default::default()
        };
        assert!(matches!(
            parse_notification(&notification, ORIGIN),
            Err(DecodeError::NoPolicyNameInResponse)
        ));
    }
}
