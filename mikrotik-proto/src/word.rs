//! Word classification and the attribute codec (spec §3, §4.2, §4.4).
//!
//! A word is classified by its leading character: `/` command, `=` attribute,
//! `.` API attribute, `?` query/filter, `!` reply, anything else unclassified.

use alloc::format;
use alloc::string::{String, ToString};

use crate::error::ProtocolError;

/// A typed attribute value (spec invariant I4: integers and booleans must
/// never be confused, because `0 == false` and `1 == true` in many runtimes
/// — so this is a tagged enum, not a dynamically-typed value).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A signed integer literal.
    Int(i64),
    /// A boolean, written as `yes`/`no` and read from `yes|true`/`no|false`.
    Bool(bool),
    /// Anything else, including numeric-looking strings that aren't meant
    /// as integers (callers who need `"0"`/`"1"` verbatim should use this
    /// variant directly rather than `Int`).
    Str(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Parses the literal on the right of an attribute word's `=`.
///
/// Tries an integer parse first, then the boolean literal tokens
/// `yes|true|no|false`, else falls back to the string as-is.
pub fn parse_value(literal: &str) -> Value {
    if let Ok(n) = literal.parse::<i64>() {
        return Value::Int(n);
    }
    match literal {
        "yes" | "true" => Value::Bool(true),
        "no" | "false" => Value::Bool(false),
        _ => Value::Str(literal.to_string()),
    }
}

/// Formats a [`Value`] the way the wire expects it (spec I4, P3): integers
/// as decimal, booleans as `yes`/`no`, strings verbatim. The runtime type
/// tag is what's discriminated on, not the value — `Value::Int(0)` encodes
/// as `"0"`, never `"no"`.
pub fn value_to_api(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Str(s) => s.clone(),
    }
}

/// Splits `"=key=value"` into `(key, value)`, typing the value per
/// [`parse_value`]. A bare `"=key="` (no value after the second `=`) or
/// `"=key"` (no value at all, a flag attribute) yields `Value::Str("")`.
pub fn parse_word(word: &str) -> Result<(String, Value), ProtocolError> {
    let rest = word
        .strip_prefix('=')
        .ok_or_else(|| ProtocolError::MalformedWord(word.to_string()))?;
    let mut parts = rest.splitn(2, '=');
    let key = parts
        .next()
        .ok_or_else(|| ProtocolError::MalformedWord(word.to_string()))?;
    let value = parts.next().unwrap_or("");
    Ok((key.to_string(), parse_value(value)))
}

/// Builds `"=key=value"` from a key/value pair (spec §4.4 `composeWord`).
pub fn compose_word(key: &str, value: &Value) -> String {
    format!("={key}={}", value_to_api(value))
}

/// Classification of a decoded word, independent of which layer produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum WordKind {
    /// A command word, e.g. `/ip/address/print`.
    Command(String),
    /// An attribute word, e.g. `=name=ether1`.
    Attribute(String, Value),
    /// An API attribute word, e.g. `.tag=123` or `.id=*1` — passed through
    /// verbatim (spec invariant I5).
    ApiAttribute(String, String),
    /// A query/filter word, e.g. `?=name=ether1` or `?#&`.
    Query(String),
    /// A reply word, e.g. `!done`.
    Reply(String),
    /// Anything not matching the above, including `!fatal`'s message word.
    Unclassified(String),
}

/// Classifies a single decoded word by its leading character (spec §3).
pub fn classify(word: &str) -> WordKind {
    if let Some(stripped) = word.strip_prefix('/') {
        WordKind::Command(alloc::format!("/{stripped}"))
    } else if let Some(rest) = word.strip_prefix('=') {
        let mut parts = rest.splitn(2, '=');
        let key = parts.next().unwrap_or_default().to_string();
        let value = parse_value(parts.next().unwrap_or(""));
        WordKind::Attribute(key, value)
    } else if let Some(rest) = word.strip_prefix('.') {
        let mut parts = rest.splitn(2, '=');
        let key = alloc::format!(".{}", parts.next().unwrap_or_default());
        let value = parts.next().unwrap_or_default().to_string();
        WordKind::ApiAttribute(key, value)
    } else if word.starts_with('?') {
        WordKind::Query(word.to_string())
    } else if word.starts_with('!') {
        WordKind::Reply(word.to_string())
    } else {
        WordKind::Unclassified(word.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p3_asymmetric_bool_encoding() {
        assert_eq!(compose_word("x", &Value::Bool(true)), "=x=yes");
        assert_eq!(compose_word("x", &Value::Int(1)), "=x=1");
        assert_eq!(compose_word("x", &Value::Int(0)), "=x=0");
    }

    #[test]
    fn p2_round_trip() {
        for (k, v) in [
            ("a", Value::Int(42)),
            ("b", Value::Bool(true)),
            ("c", Value::Bool(false)),
            ("d", Value::Str("ether1".to_string())),
        ] {
            let word = compose_word(k, &v);
            let (rk, rv) = parse_word(&word).unwrap();
            assert_eq!(rk, k);
            assert_eq!(rv, v);
        }
    }

    #[test]
    fn parses_yes_no_true_false() {
        assert_eq!(parse_value("yes"), Value::Bool(true));
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("no"), Value::Bool(false));
        assert_eq!(parse_value("false"), Value::Bool(false));
        assert_eq!(parse_value("ether1"), Value::Str("ether1".to_string()));
        assert_eq!(parse_value("-5"), Value::Int(-5));
    }

    #[test]
    fn classifies_by_leading_character() {
        assert!(matches!(classify("/ip/address/print"), WordKind::Command(_)));
        assert!(matches!(classify("=name=ether1"), WordKind::Attribute(..)));
        assert!(matches!(classify(".id=*1"), WordKind::ApiAttribute(..)));
        assert!(matches!(classify("?=name=ether1"), WordKind::Query(_)));
        assert!(matches!(classify("!done"), WordKind::Reply(_)));
        assert!(matches!(classify("server down"), WordKind::Unclassified(_)));
    }
}
