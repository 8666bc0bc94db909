//! Path joining and the reverse-polish query/filter compiler (spec §4.7,
//! scenario S4).

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use alloc::vec;

use crate::word::{value_to_api, Value};

/// Joins path segments into an absolute command path: a leading `/`, single
/// `/` separators, and no trailing `/` (spec §4.7 "path join").
pub fn join(segments: &[&str]) -> String {
    let mut out = String::from("/");
    let mut first = true;
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if !first {
            out.push('/');
        }
        out.push_str(segment);
        first = false;
    }
    out
}

/// One named attribute key a filter expression is built against.
#[derive(Debug, Clone, Copy)]
pub struct Key<'a>(pub &'a str);

/// A single RPN filter term, already in wire form (e.g. `?=name=ether1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term(String);

impl Term {
    /// The term's raw wire word.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'a> Key<'a> {
    /// `key == value`. `value` is cast through [`Value`] per spec invariant
    /// I4, so `Key("disabled").eq(false)` writes `?=disabled=no`, not
    /// `?=disabled=false`.
    pub fn eq(self, value: impl Into<Value>) -> Term {
        Term(format!("?={}={}", self.0, value_to_api(&value.into())))
    }

    /// `key != value`, expressed as equality followed by a negation operator
    /// (RouterOS has no direct `!=` filter word).
    pub fn ne(self, value: impl Into<Value>) -> Vec<Term> {
        vec![
            Term(format!("?={}={}", self.0, value_to_api(&value.into()))),
            Term("?#!".to_string()),
        ]
    }

    /// `key < value`.
    pub fn lt(self, value: impl Into<Value>) -> Term {
        Term(format!("?<{}={}", self.0, value_to_api(&value.into())))
    }

    /// `key > value`.
    pub fn gt(self, value: impl Into<Value>) -> Term {
        Term(format!("?>{}={}", self.0, value_to_api(&value.into())))
    }

    /// `key` is present on the item at all.
    pub fn present(self) -> Term {
        Term(format!("?{}", self.0))
    }

    /// `key` is absent from the item.
    pub fn absent(self) -> Term {
        Term(format!("?-{}", self.0))
    }

    /// `key` equals any one of `values`, expressed as an OR-chain of
    /// equality terms.
    pub fn in_<V: Into<Value> + Copy>(self, values: &[V]) -> Vec<Term> {
        or(values.iter().map(|&v| self.eq(v)).collect())
    }
}

/// Combines terms (or groups of terms) with the `&` operator: `a AND b`
/// becomes `?=a ?=b ?#&`.
pub fn and(groups: Vec<impl IntoTerms>) -> Vec<Term> {
    combine(groups, "&")
}

/// Combines terms (or groups of terms) with the `|` operator: `a OR b`
/// becomes `?=a ?=b ?#|`.
pub fn or(groups: Vec<impl IntoTerms>) -> Vec<Term> {
    combine(groups, "|")
}

fn combine(groups: Vec<impl IntoTerms>, op: &str) -> Vec<Term> {
    let mut terms = Vec::new();
    let count = groups.len();
    for group in groups {
        terms.extend(group.into_terms());
    }
    for _ in 1..count {
        terms.push(Term(format!("?#{op}")));
    }
    terms
}

/// Anything that can be flattened into a list of filter terms: a single
/// [`Term`], or a `Vec<Term>` from [`Key::ne`]/[`Key::in_`]/[`and`]/[`or`].
pub trait IntoTerms {
    /// Flattens `self` into its constituent terms, in order.
    fn into_terms(self) -> Vec<Term>;
}

impl IntoTerms for Term {
    fn into_terms(self) -> Vec<Term> {
        vec![self]
    }
}

impl IntoTerms for Vec<Term> {
    fn into_terms(self) -> Vec<Term> {
        self
    }
}

/// A compiled query: an optional property list restriction plus an ordered
/// list of RPN filter words (spec §4.7, scenario S4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// `=.proplist=a,b,c`, present only when a property list was requested.
    pub proplist: Option<String>,
    /// The filter expression's RPN words, in wire order.
    pub filter: Vec<String>,
}

impl Query {
    /// Builds a query over `properties` (for `.proplist`, empty = all
    /// properties) filtered by `terms`.
    pub fn new(properties: &[&str], terms: Vec<Term>) -> Self {
        let proplist = if properties.is_empty() {
            None
        } else {
            Some(format!("=.proplist={}", properties.join(",")))
        };
        Query {
            proplist,
            filter: terms.into_iter().map(|t| t.0).collect(),
        }
    }

    /// Renders the query as the sequence of words a `print` command would
    /// send, in order: proplist (if any), then filter terms.
    pub fn into_words(self) -> Vec<String> {
        let mut words = Vec::new();
        if let Some(proplist) = self.proplist {
            words.push(proplist);
        }
        words.extend(self.filter);
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_normalizes_separators() {
        assert_eq!(join(&["interface"]), "/interface");
        assert_eq!(join(&["ip", "address"]), "/ip/address");
        assert_eq!(join(&["/ip/", "/address/"]), "/ip/address");
        assert_eq!(join(&[]), "/");
    }

    #[test]
    fn scenario_s4_compiled_query() {
        let filter = and(vec![
            Key("disabled").eq("no").into_terms(),
            or(vec![Key("name").eq("ether2"), Key("name").eq("wlan-lan")]),
        ]);
        let query = Query::new(&["name", "disabled"], filter);
        let words = query.into_words();
        assert_eq!(
            words,
            vec![
                "=.proplist=name,disabled",
                "?=disabled=no",
                "?=name=ether2",
                "?=name=wlan-lan",
                "?#|",
                "?#&",
            ]
        );
    }

    #[test]
    fn in_expands_to_or_chain() {
        let terms = Key("name").in_(&["ether1", "ether2", "ether3"]);
        assert_eq!(terms.len(), 5);
        assert_eq!(terms.last().unwrap().as_str(), "?#|");
    }

    #[test]
    fn typed_operands_cast_through_value() {
        assert_eq!(Key("disabled").eq(false).as_str(), "?=disabled=no");
        assert_eq!(Key("disabled").eq(true).as_str(), "?=disabled=yes");
        assert_eq!(Key("mtu").eq(1500i64).as_str(), "?=mtu=1500");
        assert_eq!(Key("mtu").gt(1500i64).as_str(), "?>mtu=1500");
    }
}
