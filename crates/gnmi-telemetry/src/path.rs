//! gNMI path string codec.
//!
//! Converts between [`Path`] and its textual form
//! `/policy-maps/policy-map[policy-name=P1]/rule-names/rule-name[rule-name=R1]`.
//! See the openconfig gNMI path conventions for the addressing scheme.

use crate::error::PathError;
use sonic_gnmi_proto::gnmi::{Path, PathElem};

/// Renders a path as `/name[key=value]...` for every element.
///
/// An empty path renders as the empty string. Keys of one element render in
/// key order.
pub fn path_to_string(path: &Path) -> String {
    let mut out = String::new();
    for elem in &path.elem {
        out.push('/');
        out.push_str(&elem.name);
        for (key, value) in &elem.key {
            out.push('[');
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push(']');
        }
    }
    out
}

/// Parses a path string into a [`Path`].
///
/// One leading and one trailing `/` are accepted. Each segment is a name,
/// optionally followed by exactly one `[key=value]` group. The empty string
/// decodes to a path with no elements.
pub fn string_to_path(s: &str) -> Result<Path, PathError> {
    let invalid = |reason| PathError {
        path: s.to_string(),
        reason,
    };

    let mut path = Path::default();
    let body = s.strip_prefix('/').unwrap_or(s);
    if body.is_empty() {
        return Ok(path);
    }
    let body = body.strip_suffix('/').unwrap_or(body);

    for segment in body.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty path element"));
        }
        path.elem.push(parse_elem(segment).map_err(invalid)?);
    }
    Ok(path)
}

fn parse_elem(segment: &str) -> Result<PathElem, &'static str> {
    let Some(open) = segment.find('[') else {
        return Ok(PathElem {
            name: segment.to_string(),
            ..Default::default()
        });
    };

    let close = segment
        .find(']')
        .ok_or("missing closing bracket in key-value pair")?;
    if close < open {
        return Err("missing closing bracket in key-value pair");
    }
    if close + 1 != segment.len() {
        return Err("unexpected text after key-value pair");
    }

    let name = &segment[..open];
    if name.is_empty() {
        return Err("name before key-value pair cannot be empty");
    }

    let (key, value) = segment[open + 1..close]
        .split_once('=')
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .ok_or("key-value pair must be in the format 'key=value'")?;

    let mut elem = PathElem {
        name: name.to_string(),
        ..Default::default()
    };
    elem.key.insert(key.to_string(), value.to_string());
    Ok(elem)
}

/// Returns the value of `key` on the first element named `name`.
pub fn elem_key<'a>(path: &'a Path, name: &str, key: &str) -> Option<&'a str> {
    path.elem
        .iter()
        .filter(|elem| elem.name == name)
        .find_map(|elem| elem.key.get(key))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn elem(name: &str, keys: &[(&str, &str)]) -> PathElem {
        PathElem {
            name: name.to_string(),
            key: keys
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_path_to_string() {
        let path = Path {
            elem: vec![
                elem("policy-maps", &[]),
                elem("policy-map", &[("policy-name", "P1")]),
                elem("rule-names", &[]),
                elem("rule-name", &[("rule-name", "R1")]),
            ],
            ..Default::default()
        };
        assert_eq!(
            path_to_string(&path),
            "/policy-maps/policy-map[policy-name=P1]/rule-names/rule-name[rule-name=R1]"
        );
    }

    #[test]
    fn test_empty_path_to_string() {
        assert_eq!(path_to_string(&Path::default()), "");
    }

    #[test]
    fn test_path_with_empty_key_value() {
        let path = Path {
            elem: vec![elem("interface", &[("name", "")])],
            ..Default::default()
        };
        assert_eq!(path_to_string(&path), "/interface[name=]");
    }

    #[test]
    fn test_multiple_keys_render_in_key_order() {
        let path = Path {
            elem: vec![elem("neighbor", &[("vrf", "default"), ("address", "10.0.0.1")])],
            ..Default::default()
        };
        assert_eq!(
            path_to_string(&path),
            "/neighbor[address=10.0.0.1][vrf=default]"
        );
    }

    #[test]
    fn test_string_to_path() {
        let path =
            string_to_path("/policy-maps/policy-map[policy-name=P1]/rule-names").unwrap();
        assert_eq!(
            path.elem,
            vec![
                elem("policy-maps", &[]),
                elem("policy-map", &[("policy-name", "P1")]),
                elem("rule-names", &[]),
            ]
        );
    }

    #[test]
    fn test_string_to_path_without_leading_slash() {
        let path = string_to_path("system/interfaces").unwrap();
        assert_eq!(path.elem, vec![elem("system", &[]), elem("interfaces", &[])]);
    }

    #[test]
    fn test_trailing_slash() {
        let path = string_to_path("system/interfaces/").unwrap();
        assert_eq!(path.elem.len(), 2);
        assert_eq!(path.elem[1].name, "interfaces");
    }

    #[test]
    fn test_empty_string() {
        assert!(string_to_path("").unwrap().elem.is_empty());
        assert!(string_to_path("/").unwrap().elem.is_empty());
    }

    #[test]
    fn test_origin_kept_in_first_element() {
        let path = string_to_path(
            "Cisco-IOS-XR-pbr-fwd-stats-oper:pbr-stats/policy-maps/policy-map[policy-name=P]/",
        )
        .unwrap();
        assert_eq!(path.elem[0].name, "Cisco-IOS-XR-pbr-fwd-stats-oper:pbr-stats");
        assert_eq!(elem_key(&path, "policy-map", "policy-name"), Some("P"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let path = string_to_path("/a[k=x=y]").unwrap();
        assert_eq!(elem_key(&path, "a", "k"), Some("x=y"));
    }

    #[test]
    fn test_consecutive_slashes_rejected() {
        let err = string_to_path("/system//interfaces///interface").unwrap_err();
        assert_eq!(err.reason, "empty path element");
        assert!(string_to_path("//").is_err());
    }

    #[test]
    fn test_missing_closing_bracket() {
        let err = string_to_path("/interfaces/interface[name=eth0").unwrap_err();
        assert_eq!(err.reason, "missing closing bracket in key-value pair");
        assert!(string_to_path("/a]b[k=v").is_err());
    }

    #[test]
    fn test_empty_name_before_bracket() {
        let err = string_to_path("/[name=eth0]").unwrap_err();
        assert_eq!(err.reason, "name before key-value pair cannot be empty");
    }

    #[test]
    fn test_malformed_key_value() {
        for bad in ["/a[name]", "/a[=eth0]", "/a[name=]", "/a[]"] {
            let err = string_to_path(bad).unwrap_err();
            assert_eq!(
                err.reason, "key-value pair must be in the format 'key=value'",
                "{bad}"
            );
        }
    }

    #[test]
    fn test_text_after_bracket_rejected() {
        assert!(string_to_path("/a[k=v]tail").is_err());
        assert!(string_to_path("/a[k=v][j=w]").is_err());
    }

    #[test]
    fn test_roundtrip_normalizes_leading_slash() {
        for s in [
            "/policy-maps/policy-map[policy-name=P1]/rule-names/rule-name[rule-name=R1]",
            "fib-stats/byte-count",
            "/a/b[c=d]/e",
        ] {
            let encoded = path_to_string(&string_to_path(s).unwrap());
            let expected = if s.starts_with('/') {
                s.to_string()
            } else {
                format!("/{s}")
            };
            assert_eq!(encoded, expected);
        }
    }

    #[test]
    fn test_elem_key_missing() {
        let path = string_to_path("/policy-map[policy-name=P]").unwrap();
        assert_eq!(elem_key(&path, "rule-name", "rule-name"), None);
        assert_eq!(elem_key(&path, "policy-map", "other"), None);
    }
}
