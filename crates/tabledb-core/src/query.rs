//! Query descriptions for point reads and filtered listings.

use serde::{Deserialize, Serialize};

use crate::index::Order;
use crate::types::Value;

/// An equality query against one indexed field.
///
/// A [`Value::Null`] value means "no filter": list everything under the
/// chosen index in its declared order.
///
/// # Example
///
/// ```
/// use tabledb_core::Query;
///
/// let by_id = Query::equals("id", "1");
/// let everything = Query::equals("created", tabledb_core::Value::Null);
/// assert!(everything.value.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// The field the query filters on.
    pub field: String,
    /// The value the field must equal; `Null` lists all records.
    pub value: Value,
    /// The requested result order.
    pub order: Order,
    /// Maximum number of records to return; 0 applies the default.
    pub limit: usize,
    /// Number of matching records to skip.
    pub offset: usize,
}

impl Query {
    /// Build an equality query on `field`, ordered ascending by the same
    /// field.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        Self {
            order: Order::ascending(field.clone()),
            field,
            value: value.into(),
            limit: 0,
            offset: 0,
        }
    }

    /// Set the result limit.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the result offset.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}
