//! The query planner.
//!
//! The planner chooses which index a query must use and translates the
//! filter and ordering into a prefix range scan on that index:
//!
//! 1. A query on the ID index's field (compared case-insensitively) uses
//!    the ID index.
//! 2. Otherwise the field must match exactly one declared secondary index.
//! 3. Anything else is an invalid query.
//!
//! The scan prefix is `<namespace>/<index>/` plus, when the query carries a
//! value and the index orders by its own field, the encoded order and
//! filter components. When the index orders by a *different* field, the
//! order component cannot be derived from the query, so the plan scans the
//! whole index prefix and carries the encoded filter value for the table
//! engine to match against each hit.
//!
//! Physical keys are encoded in the index's declared direction, so a query
//! requesting the opposite direction becomes a reverse scan.

use tabledb_core::codec::{index_prefix, SEPARATOR};
use tabledb_core::{Index, IndexSet, OrderType, Query};

use crate::error::Error;

/// Default number of records a list operation returns.
pub(crate) const DEFAULT_LIST_LIMIT: usize = 20;

/// A planned prefix scan.
#[derive(Debug, Clone)]
pub(crate) struct ScanPlan {
    /// The byte prefix to scan.
    pub prefix: Vec<u8>,
    /// Maximum number of matching entries to return.
    pub limit: usize,
    /// Number of matching entries to skip.
    pub offset: usize,
    /// Scan the prefix in reverse key order.
    pub reverse: bool,
    /// Whether the chosen index is the ID index (entries hold payloads
    /// rather than pointers).
    pub primary: bool,
    /// Encoded filter value to match per hit, set only when the chosen
    /// index orders by a different field than it filters on.
    pub filter: Option<Vec<u8>>,
}

/// Plan a query against a table's declared indexes.
///
/// `forced_limit` overrides the query/default limit for point operations
/// (reads and deletes).
pub(crate) fn plan(
    query: &Query,
    indexes: &IndexSet,
    forced_limit: Option<usize>,
) -> Result<ScanPlan, Error> {
    let (index, primary) = select_index(query, indexes)?;

    let mut prefix = index_prefix(indexes.namespace(), index.name());
    let mut filter = None;
    if !query.value.is_null() {
        let encoded = index.encode_component(&query.value);
        if index.self_ordered() {
            prefix.extend_from_slice(&index.encode_order_component(&query.value));
            prefix.push(SEPARATOR);
            prefix.extend_from_slice(&encoded);
            prefix.push(SEPARATOR);
        } else {
            filter = Some(encoded);
        }
    }

    let query_desc = query.order.order_type == OrderType::Desc;
    let index_desc = index.order.order_type == OrderType::Desc;

    let limit = forced_limit
        .unwrap_or(if query.limit == 0 { DEFAULT_LIST_LIMIT } else { query.limit });

    Ok(ScanPlan {
        prefix,
        limit,
        offset: query.offset,
        reverse: query_desc != index_desc,
        primary,
        filter,
    })
}

fn select_index<'a>(query: &Query, indexes: &'a IndexSet) -> Result<(&'a Index, bool), Error> {
    if indexes.id_index().matches(&query.field) {
        return Ok((indexes.id_index(), true));
    }
    let mut candidates = indexes.secondary().iter().filter(|index| index.matches(&query.field));
    match (candidates.next(), candidates.next()) {
        (Some(index), None) => Ok((index, false)),
        (Some(_), Some(_)) => Err(Error::InvalidQuery(format!(
            "field '{}' matches more than one index",
            query.field
        ))),
        (None, _) => Err(Error::InvalidQuery(format!(
            "field '{}' matches no declared index",
            query.field
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tabledb_core::Value;

    fn indexes() -> IndexSet {
        IndexSet::new(
            "users",
            IndexSet::default_id_index(),
            vec![
                Index::by_equality("age"),
                Index::by_equality("created").descending(),
                Index::by_equality("type").order_by("age").descending(),
            ],
        )
    }

    #[test]
    fn id_queries_use_the_id_index_case_insensitively() {
        let plan = plan(&Query::equals("ID", "1"), &indexes(), None).unwrap();
        assert!(plan.primary);
        assert_eq!(plan.prefix, b"users/id/1/1/");
    }

    #[test]
    fn secondary_queries_use_the_matching_index() {
        let plan = plan(&Query::equals("age", 25i64), &indexes(), None).unwrap();
        assert!(!plan.primary);
        assert!(plan.prefix.starts_with(b"users/age/"));
        assert!(plan.filter.is_none());
    }

    #[test]
    fn unknown_fields_are_invalid_queries() {
        let err = plan(&Query::equals("nope", 1i64), &indexes(), None).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn ambiguous_fields_are_invalid_queries() {
        let set = IndexSet::new(
            "ns",
            IndexSet::default_id_index(),
            vec![Index::by_equality("tag"), Index::by_equality("tag").descending()],
        );
        let err = plan(&Query::equals("tag", "x"), &set, None).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn null_value_scans_the_whole_index() {
        let plan = plan(&Query::equals("age", Value::Null), &indexes(), None).unwrap();
        assert_eq!(plan.prefix, b"users/age/");
        assert!(plan.filter.is_none());
    }

    #[test]
    fn filter_and_order_mismatch_defers_filtering_to_the_scan() {
        let set = indexes();
        let query = set.secondary()[2].to_query("post-tag");
        let plan = plan(&query, &set, None).unwrap();
        assert_eq!(plan.prefix, b"users/type/");
        assert_eq!(plan.filter.as_deref(), Some(&b"post-tag"[..]));
        // Query inherited the index's descending order, so the scan runs
        // forward over the inverted keys.
        assert!(!plan.reverse);
    }

    #[test]
    fn opposite_direction_queries_reverse_the_scan() {
        let set = indexes();

        // Descending query on an ascending index.
        let mut query = Query::equals("age", Value::Null);
        query.order.order_type = OrderType::Desc;
        assert!(plan(&query, &set, None).unwrap().reverse);

        // Ascending query on a descending index.
        let query = Query::equals("created", Value::Null);
        assert!(plan(&query, &set, None).unwrap().reverse);

        // Matching directions scan forward.
        let query = set.secondary()[1].to_query(Value::Null);
        assert!(!plan(&query, &set, None).unwrap().reverse);
    }

    #[test]
    fn limits_default_and_force() {
        let set = indexes();
        let query = Query::equals("age", Value::Null);
        assert_eq!(plan(&query, &set, None).unwrap().limit, DEFAULT_LIST_LIMIT);
        assert_eq!(plan(&query.clone().limit(7), &set, None).unwrap().limit, 7);
        assert_eq!(plan(&query.limit(7), &set, Some(1)).unwrap().limit, 1);
    }

    #[test]
    fn offsets_carry_through() {
        let query = Query::equals("age", Value::Null).offset(5);
        assert_eq!(plan(&query, &indexes(), None).unwrap().offset, 5);
    }
}
