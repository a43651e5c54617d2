// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! SphinxQL statement rendering.
//!
//! Manticore has no usable server-side parameter binding for `MATCH()`, so
//! statements are rendered as text. Values are always emitted as escaped
//! literals; identifiers (index, field and attribute names) are validated
//! when the descriptor is built and emitted verbatim.
//!
//! # Generated forms
//!
//! ```text
//! INSERT INTO idx (id, name, status) VALUES (1, 'name1', 'enabled')
//! REPLACE INTO idx (id, name, status) VALUES (1, 'a', 'x'), (2, 'b', 'y')
//! SELECT id, WEIGHT() AS w FROM idx WHERE MATCH('(@(name) term)') ORDER BY w DESC LIMIT 0, 20
//! SHOW META
//! DELETE FROM idx WHERE id IN (1, 2)
//! TRUNCATE RTINDEX idx
//! ```

use std::fmt;

use crate::record::FieldValue;

/// Companion statement describing the last query on the session.
pub const META_STATEMENT: &str = "SHOW META";

/// `SHOW META` row carrying the total number of matches.
pub const TOTAL_FOUND: &str = "total_found";
pub const META_NAME_COLUMN: &str = "Variable_name";
pub const META_VALUE_COLUMN: &str = "Value";

/// Characters with meaning in the extended full-text query syntax.
const MATCH_SPECIAL: &[char] = &[
    '\\', '(', ')', '|', '-', '!', '@', '~', '"', '&', '/', '^', '$', '=', '<',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteVerb {
    Insert,
    Replace,
}

impl fmt::Display for WriteVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteVerb::Insert => write!(f, "INSERT"),
            WriteVerb::Replace => write!(f, "REPLACE"),
        }
    }
}

/// True for `[A-Za-z_][A-Za-z0-9_]*`.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Single-quoted string literal, MySQL escaping rules.
#[must_use]
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Neutralise full-text operators so user input is matched as plain terms.
#[must_use]
pub fn escape_match(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars() {
        if MATCH_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render a value as a SQL literal. Errors describe why a value cannot be
/// expressed (non-finite floats).
pub fn render_literal(value: &FieldValue) -> Result<String, String> {
    Ok(match value {
        FieldValue::Null => "NULL".to_string(),
        FieldValue::String(s) => quote_string(s),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) if f.is_finite() => f.to_string(),
        FieldValue::Float(f) => return Err(format!("float value {} has no SQL literal", f)),
        FieldValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        FieldValue::Multi(values) => {
            let items: Vec<String> = values.iter().map(i64::to_string).collect();
            format!("({})", items.join(","))
        }
    })
}

/// `<VERB> INTO <index> (<columns>) VALUES <tuple>, <tuple>, ...`
///
/// Each tuple is already rendered, parentheses included.
#[must_use]
pub fn write_statement(verb: WriteVerb, index: &str, columns: &[&str], tuples: &[String]) -> String {
    format!(
        "{} INTO {} ({}) VALUES {}",
        verb,
        index,
        columns.join(", "),
        tuples.join(", ")
    )
}

/// Field-restricted match expression, before SQL quoting.
#[must_use]
pub fn match_expression(fields: &[&str], query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return String::new();
    }
    format!("(@({}) {})", fields.join(","), escape_match(query))
}

#[must_use]
pub fn match_statement(index: &str, fields: &[&str], query: &str, offset: u64, limit: u32) -> String {
    format!(
        "SELECT id, WEIGHT() AS w FROM {} WHERE MATCH({}) ORDER BY w DESC LIMIT {}, {}",
        index,
        quote_string(&match_expression(fields, query)),
        offset,
        limit
    )
}

#[must_use]
pub fn delete_statement(index: &str, ids: &[u64]) -> String {
    let ids: Vec<String> = ids.iter().map(u64::to_string).collect();
    format!("DELETE FROM {} WHERE id IN ({})", index, ids.join(", "))
}

#[must_use]
pub fn truncate_statement(index: &str) -> String {
    format!("TRUNCATE RTINDEX {}", index)
}
