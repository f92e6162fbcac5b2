//! Index declarations and storage-key derivation.
//!
//! This module provides the declarative description of a table, the primary
//! (ID) index plus any number of secondary indexes, and the machinery to
//! derive every storage key a record occupies.
//!
//! # Key layout
//!
//! Every index entry lives at
//!
//! ```text
//! <namespace>/<indexName>/<encodedOrderValue>/<encodedFilterValue>/<encodedPrimaryKey>
//! ```
//!
//! The trailing primary key makes each entry globally unique even when the
//! indexed value is not, and the leading order component makes a plain
//! prefix scan of the store come back in the declared sort order. For the ID
//! index, all three components are the primary key itself and the record
//! payload is stored at the key; secondary entries store the encoded primary
//! key as a pointer.
//!
//! # Example
//!
//! ```
//! use tabledb_core::Index;
//!
//! // Equality index on `tag`, unique, ordered by `tag` itself.
//! let tag = Index::by_equality("tag").unique(true);
//!
//! // Equality index on `type`, results ordered by `age` descending.
//! let by_age = Index::by_equality("type").order_by("age").descending();
//! assert_eq!(by_age.order_field(), "age");
//! ```

use serde::{Deserialize, Serialize};

use crate::codec::{
    encode_value, encode_value_desc, index_key, index_prefix, invert_component, SEPARATOR,
};
use crate::error::CoreError;
use crate::query::Query;
use crate::types::{Fields, Value};

/// How an index orders its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderType {
    /// Ascending by the order field.
    #[default]
    Asc,
    /// Descending by the order field.
    Desc,
    /// Scan order is unspecified; only point lookups matter.
    Unordered,
}

/// An index's order specification.
///
/// When `field_name` differs from the index's filter field, the index
/// filters on one field but sorts its results by another.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Order {
    /// The direction of the ordering.
    pub order_type: OrderType,
    /// The field the ordering applies to; `None` means the index's own
    /// filter field.
    pub field_name: Option<String>,
}

impl Order {
    /// Ascending order over `field`.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self { order_type: OrderType::Asc, field_name: Some(field.into()) }
    }

    /// Descending order over `field`.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self { order_type: OrderType::Desc, field_name: Some(field.into()) }
    }

    /// No ordering requirement.
    #[must_use]
    pub fn unordered() -> Self {
        Self { order_type: OrderType::Unordered, field_name: None }
    }
}

/// An equality index over one record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// The field this index filters on.
    pub field: String,
    /// The order entries are kept in.
    pub order: Order,
    /// When true, two records may not coexist with the same value of
    /// `field` (unless they share the primary key).
    pub unique: bool,
    /// Strings are right-padded to this many bytes before encoding, so
    /// fixed-width comparison reproduces string order. 0 disables padding.
    pub string_pad_length: usize,
}

impl Index {
    /// Create an ascending equality index on `field`.
    #[must_use]
    pub fn by_equality(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: Order::default(),
            unique: false,
            string_pad_length: 0,
        }
    }

    /// The index's name, used as the second key component.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.field
    }

    /// The field this index orders by (the filter field unless overridden).
    #[inline]
    #[must_use]
    pub fn order_field(&self) -> &str {
        self.order.field_name.as_deref().unwrap_or(&self.field)
    }

    /// Whether the index orders by the same field it filters on.
    #[must_use]
    pub fn self_ordered(&self) -> bool {
        self.order_field().eq_ignore_ascii_case(&self.field)
    }

    /// Whether a query on `field` can be served by this index.
    ///
    /// Field names compare case-insensitively because a record's serialized
    /// field name may differ in case from the declaration.
    #[must_use]
    pub fn matches(&self, field: &str) -> bool {
        self.field.eq_ignore_ascii_case(field)
    }

    /// Switch the index to descending order.
    #[must_use]
    pub fn descending(mut self) -> Self {
        self.order.order_type = OrderType::Desc;
        self
    }

    /// Drop any ordering requirement.
    #[must_use]
    pub fn unordered(mut self) -> Self {
        self.order.order_type = OrderType::Unordered;
        self
    }

    /// Order results by a different field than the one filtered on.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order.field_name = Some(field.into());
        self
    }

    /// Set the uniqueness constraint.
    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Set the string pad length.
    #[must_use]
    pub fn string_pad_length(mut self, pad: usize) -> Self {
        self.string_pad_length = pad;
        self
    }

    /// Build a query against this index, inheriting its order.
    #[must_use]
    pub fn to_query(&self, value: impl Into<Value>) -> Query {
        Query {
            field: self.field.clone(),
            value: value.into(),
            order: Order {
                order_type: self.order.order_type,
                field_name: Some(self.order_field().to_owned()),
            },
            limit: 0,
            offset: 0,
        }
    }

    /// Encode a value as this index's filter (or primary-key) component.
    #[must_use]
    pub fn encode_component(&self, value: &Value) -> Vec<u8> {
        encode_value(value, self.string_pad_length)
    }

    /// Encode a value as this index's order component, honouring the
    /// declared direction.
    #[must_use]
    pub fn encode_order_component(&self, value: &Value) -> Vec<u8> {
        match self.order.order_type {
            OrderType::Desc => encode_value_desc(value, self.string_pad_length),
            OrderType::Asc | OrderType::Unordered => {
                encode_value(value, self.string_pad_length)
            }
        }
    }
}

/// One storage key a record occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// The full storage key.
    pub key: Vec<u8>,
    /// Whether this is the ID-index entry (payload) rather than a secondary
    /// entry (pointer).
    pub primary: bool,
}

/// The declared indexes of one table: the ID index plus any secondaries.
///
/// Immutable after construction; all key derivation for a table goes
/// through this type.
#[derive(Debug, Clone)]
pub struct IndexSet {
    namespace: String,
    id_index: Index,
    secondary: Vec<Index>,
}

impl IndexSet {
    /// Create an index set for a namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>, id_index: Index, secondary: Vec<Index>) -> Self {
        Self { namespace: namespace.into(), id_index, secondary }
    }

    /// The default primary index: equality on a field named `id`,
    /// unordered, unique.
    #[must_use]
    pub fn default_id_index() -> Index {
        Index::by_equality("id").unordered().unique(true)
    }

    /// The namespace isolating this table's keys.
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The primary index.
    #[inline]
    #[must_use]
    pub fn id_index(&self) -> &Index {
        &self.id_index
    }

    /// The declared secondary indexes.
    #[inline]
    #[must_use]
    pub fn secondary(&self) -> &[Index] {
        &self.secondary
    }

    /// Encode a record's primary key.
    ///
    /// Returns the empty byte string when the ID field is missing or null;
    /// callers treat that as a missing ID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedField`] if the ID field holds a
    /// non-scalar value.
    pub fn primary_key(&self, fields: &Fields) -> Result<Vec<u8>, CoreError> {
        let value = fields.value(&self.id_index.field)?;
        Ok(self.id_index.encode_component(&value))
    }

    /// The ID-index key for an encoded primary key.
    ///
    /// All three value components of the ID-index key are the primary key
    /// itself, so the key is reconstructible from a secondary pointer alone.
    #[must_use]
    pub fn id_key(&self, primary: &[u8]) -> Vec<u8> {
        let order = if self.id_index.order.order_type == OrderType::Desc {
            invert_component(primary)
        } else {
            primary.to_vec()
        };
        index_key(&self.namespace, self.id_index.name(), &order, primary, primary)
    }

    /// Derive every storage key a record occupies: the ID-index entry plus
    /// one entry per secondary index.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedField`] if any indexed field holds a
    /// non-scalar value.
    pub fn entries(&self, fields: &Fields) -> Result<Vec<IndexEntry>, CoreError> {
        let primary = self.primary_key(fields)?;
        let mut entries = Vec::with_capacity(1 + self.secondary.len());
        entries.push(IndexEntry { key: self.id_key(&primary), primary: true });
        for index in &self.secondary {
            let order_value = fields.value(index.order_field())?;
            let filter_value = fields.value(&index.field)?;
            let key = index_key(
                &self.namespace,
                index.name(),
                &index.encode_order_component(&order_value),
                &index.encode_component(&filter_value),
                &primary,
            );
            entries.push(IndexEntry { key, primary: false });
        }
        Ok(entries)
    }

    /// The `<namespace>/<index>/<order>/<filter>/` prefix covering every
    /// entry that shares a record's order and filter values on one index.
    /// Used for uniqueness checks.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedField`] if an involved field holds a
    /// non-scalar value.
    pub fn value_prefix(&self, index: &Index, fields: &Fields) -> Result<Vec<u8>, CoreError> {
        let order_value = fields.value(index.order_field())?;
        let filter_value = fields.value(&index.field)?;
        let mut prefix = index_prefix(&self.namespace, index.name());
        prefix.extend_from_slice(&index.encode_order_component(&order_value));
        prefix.push(SEPARATOR);
        prefix.extend_from_slice(&index.encode_component(&filter_value));
        prefix.push(SEPARATOR);
        Ok(prefix)
    }
}
