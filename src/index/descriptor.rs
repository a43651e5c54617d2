// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index Descriptor
//!
//! Immutable description of how one record type maps onto a search index:
//! which record properties feed full-text fields and which feed typed,
//! filterable attributes.
//!
//! ```text
//! test_index  (Article)
//!   id      ← Article::primary_key()
//!   name    ← property "name"          full-text field
//!   status  ← property "status"        string attribute
//! ```
//!
//! Declaration order is preserved and becomes column order in every write.
//! Properties are resolved once, in [`IndexDescriptorBuilder::build`].

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use super::error::{IndexError, Result};
use super::statement::{is_identifier, render_literal};
use crate::record::{AttributeType, FieldValue, PropertyAccessor, Record, RecordType};

/// Column holding the document id. Reserved.
pub const ID_COLUMN: &str = "id";

/// Full-text field bound to a record property.
pub struct SearchField<R> {
    pub name: String,
    accessor: PropertyAccessor<R>,
}

impl<R> SearchField<R> {
    #[must_use]
    pub fn property(&self) -> &str {
        self.accessor.property()
    }
}

/// Typed attribute bound to a record property.
pub struct AttributeField<R> {
    pub name: String,
    pub attribute_type: AttributeType,
    accessor: PropertyAccessor<R>,
}

impl<R> AttributeField<R> {
    #[must_use]
    pub fn property(&self) -> &str {
        self.accessor.property()
    }
}

pub struct IndexDescriptor<R> {
    name: String,
    record_type: RecordType,
    fields: Vec<SearchField<R>>,
    attributes: Vec<AttributeField<R>>,
}

impl<R: Record> IndexDescriptor<R> {
    pub fn builder(name: impl Into<String>) -> IndexDescriptorBuilder<R> {
        IndexDescriptorBuilder {
            name: name.into(),
            fields: Vec::new(),
            attributes: Vec::new(),
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    #[must_use]
    pub fn fields(&self) -> &[SearchField<R>] {
        &self.fields
    }

    #[must_use]
    pub fn attributes(&self) -> &[AttributeField<R>] {
        &self.attributes
    }

    /// Search field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Attribute names in declaration order.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// `id`, then fields, then attributes.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        std::iter::once(ID_COLUMN)
            .chain(self.fields.iter().map(|f| f.name.as_str()))
            .chain(self.attributes.iter().map(|a| a.name.as_str()))
            .collect()
    }

    /// True iff `record`'s concrete type is the one this index covers.
    #[must_use]
    pub fn is_indexable(&self, record: &dyn Any) -> bool {
        self.record_type.matches(record)
    }

    /// Render the parenthesised value tuple for `record`, in [`columns`](Self::columns) order.
    ///
    /// Attribute values are checked against their declared type here.
    pub fn value_tuple(&self, record: &R) -> Result<String> {
        let id = record.primary_key();
        let mut values = Vec::with_capacity(1 + self.fields.len() + self.attributes.len());
        values.push(id.to_string());

        for field in &self.fields {
            let value = field.accessor.read(record);
            if matches!(value, FieldValue::Multi(_)) {
                return Err(self.value_error(id, &field.name, "multi-value is not valid for a full-text field"));
            }
            values.push(self.render(id, &field.name, &value)?);
        }

        for attribute in &self.attributes {
            let value = attribute.accessor.read(record);
            if !attribute.attribute_type.accepts(&value) {
                return Err(self.value_error(
                    id,
                    &attribute.name,
                    &format!("expected {}, got {}", attribute.attribute_type, value.kind()),
                ));
            }
            values.push(self.render(id, &attribute.name, &value)?);
        }

        Ok(format!("({})", values.join(", ")))
    }

    fn render(&self, id: u64, column: &str, value: &FieldValue) -> Result<String> {
        render_literal(value).map_err(|reason| self.value_error(id, column, &reason))
    }

    fn value_error(&self, id: u64, column: &str, reason: &str) -> IndexError {
        IndexError::Configuration(format!(
            "index '{}', column '{}', record {}: {}",
            self.name, column, id, reason
        ))
    }
}

impl<R> fmt::Debug for IndexDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexDescriptor")
            .field("name", &self.name)
            .field("record_type", &self.record_type)
            .field("fields", &self.fields.iter().map(|x| &x.name).collect::<Vec<_>>())
            .field("attributes", &self.attributes.iter().map(|x| &x.name).collect::<Vec<_>>())
            .finish()
    }
}

/// Collects the mapping; nothing is validated until [`build`](Self::build).
pub struct IndexDescriptorBuilder<R> {
    name: String,
    fields: Vec<(String, String)>,
    attributes: Vec<(String, String, AttributeType)>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> IndexDescriptorBuilder<R> {
    /// Add a full-text field fed by `property`.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, property: impl Into<String>) -> Self {
        self.fields.push((name.into(), property.into()));
        self
    }

    /// Add a typed attribute fed by `property`.
    #[must_use]
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        property: impl Into<String>,
        attribute_type: AttributeType,
    ) -> Self {
        self.attributes.push((name.into(), property.into(), attribute_type));
        self
    }

    pub fn build(self) -> Result<IndexDescriptor<R>> {
        let record_type = RecordType::of::<R>();
        let config_error = |msg: String| {
            IndexError::Configuration(format!("index '{}' ({}): {}", self.name, record_type, msg))
        };

        if !is_identifier(&self.name) {
            return Err(config_error("index name is not a valid identifier".into()));
        }
        if self.fields.is_empty() {
            return Err(config_error("at least one full-text field is required".into()));
        }

        let mut seen = HashSet::new();
        let names = self
            .fields
            .iter()
            .map(|(name, _)| name)
            .chain(self.attributes.iter().map(|(name, _, _)| name));
        for name in names {
            if !is_identifier(name) {
                return Err(config_error(format!("'{}' is not a valid column name", name)));
            }
            if name.eq_ignore_ascii_case(ID_COLUMN) {
                return Err(config_error(format!("'{}' is reserved for the document id", name)));
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(config_error(format!("column '{}' is declared twice", name)));
            }
        }

        let resolve = |property: &str| {
            R::resolve_property(property)
                .ok_or_else(|| config_error(format!("unknown property '{}'", property)))
        };

        let fields = self
            .fields
            .iter()
            .map(|(name, property)| -> Result<SearchField<R>> {
                Ok(SearchField {
                    name: name.clone(),
                    accessor: resolve(property)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let attributes = self
            .attributes
            .iter()
            .map(|(name, property, attribute_type)| -> Result<AttributeField<R>> {
                Ok(AttributeField {
                    name: name.clone(),
                    attribute_type: *attribute_type,
                    accessor: resolve(property)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(IndexDescriptor {
            name: self.name,
            record_type,
            fields,
            attributes,
        })
    }
}
