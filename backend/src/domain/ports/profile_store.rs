//! Port for the relational profile store.
//!
//! Calls are table-scoped and independent: nothing spans two tables or two
//! calls, so callers sequence multi-step writes themselves.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::Table;

use super::define_store_error;

/// A flat row keyed by column name.
pub type Row = Map<String, Value>;

define_store_error! {
    /// Errors raised by profile store adapters.
    pub enum ProfileStoreError {
        /// The store could not be reached or timed out.
        Transport => "transport",
        /// The store refused the request (constraint, permission, schema).
        Rejected => "rejected",
        /// The store answered with a payload the adapter could not read.
        Decode => "decode",
    }
}

/// Equality match on a single key column.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchKey {
    /// Key column.
    pub column: String,
    /// Value the column must equal.
    pub value: Value,
}

impl MatchKey {
    /// Build a match on `column = value`.
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Row filter for selections.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq {
        /// Filtered column.
        column: String,
        /// Expected value.
        value: Value,
    },
    /// `column IN (values)`
    In {
        /// Filtered column.
        column: String,
        /// Accepted values.
        values: Vec<Value>,
    },
}

/// Sort order for selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Sort column.
    pub column: String,
    /// Ascending when `true`.
    pub ascending: bool,
}

/// Selection parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    /// Filters combined with AND.
    pub filters: Vec<Filter>,
    /// Optional ordering.
    pub order: Option<OrderBy>,
    /// Optional row limit.
    pub limit: Option<u32>,
}

impl SelectQuery {
    /// Select at most one row matching `key`.
    pub fn by_key(key: &MatchKey) -> Self {
        Self {
            filters: vec![Filter::Eq {
                column: key.column.clone(),
                value: key.value.clone(),
            }],
            order: None,
            limit: Some(1),
        }
    }
}

/// Table-scoped relational access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert one or more rows.
    async fn insert(&self, table: Table, rows: &[Row]) -> Result<(), ProfileStoreError>;

    /// Patch the rows matching `key`.
    async fn update(
        &self,
        table: Table,
        key: &MatchKey,
        patch: &Row,
    ) -> Result<(), ProfileStoreError>;

    /// Delete the rows matching `key`.
    async fn delete(&self, table: Table, key: &MatchKey) -> Result<(), ProfileStoreError>;

    /// Select rows.
    async fn select(&self, table: Table, query: &SelectQuery)
    -> Result<Vec<Row>, ProfileStoreError>;
}
