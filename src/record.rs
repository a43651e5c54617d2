// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Record model shared by descriptors, managers and stores.
//!
//! A [`Record`] is any domain type that can be mirrored into a search index.
//! Instead of looking properties up by name on every write, each record type
//! hands out a [`PropertyAccessor`] once per mapped property when the
//! descriptor is built:
//!
//! ```rust
//! use index_sync::{FieldValue, PropertyAccessor, Record};
//!
//! struct Article { id: u64, title: String, views: i64 }
//!
//! impl Record for Article {
//!     fn primary_key(&self) -> u64 { self.id }
//!
//!     fn resolve_property(name: &str) -> Option<PropertyAccessor<Self>> {
//!         let read: fn(&Self) -> FieldValue = match name {
//!             "title" => |a| a.title.as_str().into(),
//!             "views" => |a| a.views.into(),
//!             _ => return None,
//!         };
//!         Some(PropertyAccessor::new(name, read))
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A domain record that can be written to a search index.
pub trait Record: Send + Sync + 'static {
    /// Primary key, used as the index document id.
    fn primary_key(&self) -> u64;

    /// Resolve a readable property by name.
    ///
    /// Called once per mapped property at descriptor construction.
    /// Returning `None` makes the descriptor invalid.
    fn resolve_property(name: &str) -> Option<PropertyAccessor<Self>>
    where
        Self: Sized;
}

/// Runtime identity of a record type.
///
/// Equality and hashing only consider the `TypeId`; the name is for messages.
#[derive(Clone, Copy)]
pub struct RecordType {
    id: TypeId,
    name: &'static str,
}

impl RecordType {
    #[must_use]
    pub fn of<R: Record>() -> Self {
        Self {
            id: TypeId::of::<R>(),
            name: std::any::type_name::<R>(),
        }
    }

    /// Fully qualified Rust type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True iff `value`'s concrete type is this record type.
    #[must_use]
    pub fn matches(&self, value: &dyn Any) -> bool {
        value.type_id() == self.id
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordType({})", self.name)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Reads one property off a record.
pub struct PropertyAccessor<R> {
    property: String,
    read: Arc<dyn Fn(&R) -> FieldValue + Send + Sync>,
}

impl<R> PropertyAccessor<R> {
    pub fn new(
        property: impl Into<String>,
        read: impl Fn(&R) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            property: property.into(),
            read: Arc::new(read),
        }
    }

    /// Name of the record property this accessor reads.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn read(&self, record: &R) -> FieldValue {
        (self.read)(record)
    }
}

impl<R> Clone for PropertyAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            read: Arc::clone(&self.read),
        }
    }
}

impl<R> fmt::Debug for PropertyAccessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

/// Declared scalar type of a filterable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Int,
    Float,
    Bool,
    /// Multi-value attribute (set of integers)
    Multi,
}

impl AttributeType {
    /// Whether a value of this shape may be written to an attribute of this type.
    ///
    /// `Null` always fits; integers widen into float attributes.
    #[must_use]
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (_, FieldValue::Null)
                | (AttributeType::String, FieldValue::String(_))
                | (AttributeType::Int, FieldValue::Int(_))
                | (AttributeType::Float, FieldValue::Float(_) | FieldValue::Int(_))
                | (AttributeType::Bool, FieldValue::Bool(_))
                | (AttributeType::Multi, FieldValue::Multi(_))
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Int => write!(f, "int"),
            AttributeType::Float => write!(f, "float"),
            AttributeType::Bool => write!(f, "bool"),
            AttributeType::Multi => write!(f, "multi"),
        }
    }
}

/// Value read off a record for a search field or attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Multi(Vec<i64>),
}

impl FieldValue {
    /// Short tag used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::String(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Multi(_) => "multi",
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<i64>> for FieldValue {
    fn from(value: Vec<i64>) -> Self {
        FieldValue::Multi(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}
