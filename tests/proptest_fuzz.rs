//! Property-based tests for statement safety and rank reconciliation.
//!
//! Uses proptest to generate hostile text and arbitrary orderings and checks
//! that generated statements always stay well-formed and that reconciliation
//! always follows rank order.
//!
//! Run with: `cargo test --test proptest_fuzz`

use proptest::prelude::*;
use std::collections::HashSet;

use index_sync::index::statement::{escape_match, match_statement, quote_string};
use index_sync::{reconcile, AttributeType, FieldValue, IndexDescriptor, PropertyAccessor, Record};

// =============================================================================
// Helpers
// =============================================================================

/// Lex one MySQL single-quoted literal at the start of `input`.
/// Returns the decoded value and the rest of the input after the closing quote.
fn lex_literal(input: &str) -> Option<(String, &str)> {
    let mut chars = input.char_indices();
    if chars.next()?.1 != '\'' {
        return None;
    }
    let mut value = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                value.push(match escaped {
                    '0' => '\0',
                    'n' => '\n',
                    'r' => '\r',
                    'Z' => '\x1a',
                    other => other,
                });
            }
            '\'' => return Some((value, &input[i + 1..])),
            other => value.push(other),
        }
    }
    None
}

/// Undo full-text escaping; fails if an operator character is left bare.
fn unescape_match(input: &str) -> Option<String> {
    const SPECIAL: &str = "\\()|-!@~\"&/^$=<";
    let mut out = String::new();
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next()?);
        } else if SPECIAL.contains(c) {
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[derive(Debug, Clone)]
struct Doc {
    id: u64,
    body: String,
    label: String,
    weight: i64,
}

impl Record for Doc {
    fn primary_key(&self) -> u64 {
        self.id
    }

    fn resolve_property(name: &str) -> Option<PropertyAccessor<Self>> {
        let read: fn(&Self) -> FieldValue = match name {
            "body" => |d| d.body.as_str().into(),
            "label" => |d| d.label.as_str().into(),
            "weight" => |d| d.weight.into(),
            _ => return None,
        };
        Some(PropertyAccessor::new(name, read))
    }
}

// =============================================================================
// Strategies
// =============================================================================

/// Text biased towards characters that matter to SQL and the query syntax.
fn hostile_text() -> impl Strategy<Value = String> {
    prop_oneof![
        ".*",
        "[a-z '\\\\\"();@|\\-!~&/^$=<>*\n\r\u{0}\u{1a}]{0,40}",
    ]
}

/// Unique ranked ids plus a shuffled subset of them present in the store.
fn ranking() -> impl Strategy<Value = (Vec<u64>, Vec<u64>)> {
    prop::collection::hash_set(0u64..10_000, 0..60)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_flat_map(|ranked| {
            let len = ranked.len();
            (
                Just(ranked.clone()),
                prop::sample::subsequence(ranked, 0..=len).prop_shuffle(),
            )
        })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn quoted_strings_round_trip(s in hostile_text()) {
        let literal = quote_string(&s);
        let (decoded, rest) = lex_literal(&literal).expect("literal must terminate");
        prop_assert_eq!(decoded, s);
        prop_assert_eq!(rest, "");
    }

    #[test]
    fn match_escaping_leaves_no_bare_operators(s in hostile_text()) {
        let escaped = escape_match(&s);
        prop_assert_eq!(unescape_match(&escaped), Some(s));
    }

    #[test]
    fn match_statement_cannot_be_broken_out_of(query in hostile_text(), offset in 0u64..10_000, limit in 1u32..500) {
        let sql = match_statement("docs", &["body", "label"], &query, offset, limit);
        let prefix = "SELECT id, WEIGHT() AS w FROM docs WHERE MATCH(";
        prop_assert!(sql.starts_with(prefix));

        let (expression, rest) = lex_literal(&sql[prefix.len()..]).expect("literal must terminate");
        prop_assert_eq!(rest, format!(") ORDER BY w DESC LIMIT {}, {}", offset, limit));

        if query.trim().is_empty() {
            prop_assert_eq!(expression, "");
        } else {
            let inner = expression
                .strip_prefix("(@(body,label) ")
                .and_then(|e| e.strip_suffix(')'))
                .expect("field group wraps the query");
            prop_assert_eq!(unescape_match(inner), Some(query.trim().to_string()));
        }
    }

    #[test]
    fn value_tuples_keep_column_count(body in hostile_text(), label in hostile_text(), weight in any::<i64>(), id in any::<u64>()) {
        let descriptor = IndexDescriptor::<Doc>::builder("docs")
            .field("body", "body")
            .attribute("label", "label", AttributeType::String)
            .attribute("weight", "weight", AttributeType::Int)
            .build()
            .unwrap();

        let tuple = descriptor.value_tuple(&Doc { id, body: body.clone(), label: label.clone(), weight }).unwrap();

        let rest = tuple.strip_prefix(&format!("({}, ", id)).expect("id first");
        let (decoded_body, rest) = lex_literal(rest).expect("body literal");
        let rest = rest.strip_prefix(", ").expect("separator");
        let (decoded_label, rest) = lex_literal(rest).expect("label literal");
        prop_assert_eq!(decoded_body, body);
        prop_assert_eq!(decoded_label, label);
        prop_assert_eq!(rest, format!(", {})", weight));
    }

    #[test]
    fn reconcile_follows_rank_order((ranked, present) in ranking()) {
        let records: Vec<Doc> = present
            .iter()
            .map(|&id| Doc { id, body: String::new(), label: String::new(), weight: 0 })
            .collect();
        let present: HashSet<u64> = present.into_iter().collect();

        let result = reconcile(&ranked, records);

        let got: Vec<u64> = result.records.iter().map(|d| d.id).collect();
        let expected: Vec<u64> = ranked.iter().copied().filter(|id| present.contains(id)).collect();
        let missing: Vec<u64> = ranked.iter().copied().filter(|id| !present.contains(id)).collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(result.missing, missing);
    }
}
