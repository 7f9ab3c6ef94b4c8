//! Profile store adapter for the hosted PostgREST API.
//!
//! Filters are rendered in PostgREST's query syntax: `column=eq.value` and
//! `column=in.("a","b")`. Writes ask for `return=minimal`, so no row is
//! echoed back.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;

use super::connection::{HostedConnection, HttpFailure};
use crate::domain::Table;
use crate::domain::ports::{
    Filter, MatchKey, ProfileStore, ProfileStoreError, Row, SelectQuery,
};

const REST_PATH: &str = "rest/v1/";
const PREFER_MINIMAL: &str = "return=minimal";

/// Profile store backed by the hosted PostgREST API.
#[derive(Debug, Clone)]
pub struct HostedProfileStore {
    connection: Arc<HostedConnection>,
}

impl HostedProfileStore {
    /// Adapter sharing `connection`.
    pub fn new(connection: Arc<HostedConnection>) -> Self {
        Self { connection }
    }

    fn table_url(&self, table: Table) -> Result<Url, ProfileStoreError> {
        self.connection
            .endpoint(REST_PATH, [table.as_str()])
            .map_err(map_failure)
    }

    async fn write(&self, method: Method, url: Url, body: Option<&Value>) -> Result<(), ProfileStoreError> {
        let mut request = self
            .connection
            .request(method, url)
            .header("Prefer", PREFER_MINIMAL);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.connection
            .send(request)
            .await
            .map(|_| ())
            .map_err(map_failure)
    }
}

#[async_trait]
impl ProfileStore for HostedProfileStore {
    async fn insert(&self, table: Table, rows: &[Row]) -> Result<(), ProfileStoreError> {
        let url = self.table_url(table)?;
        let body = Value::Array(rows.iter().cloned().map(Value::Object).collect());
        self.write(Method::POST, url, Some(&body)).await
    }

    async fn update(
        &self,
        table: Table,
        key: &MatchKey,
        patch: &Row,
    ) -> Result<(), ProfileStoreError> {
        let mut url = self.table_url(table)?;
        apply_filters(&mut url, &[key_filter(key)]);
        self.write(Method::PATCH, url, Some(&Value::Object(patch.clone())))
            .await
    }

    async fn delete(&self, table: Table, key: &MatchKey) -> Result<(), ProfileStoreError> {
        let mut url = self.table_url(table)?;
        apply_filters(&mut url, &[key_filter(key)]);
        self.write(Method::DELETE, url, None).await
    }

    async fn select(
        &self,
        table: Table,
        query: &SelectQuery,
    ) -> Result<Vec<Row>, ProfileStoreError> {
        let mut url = self.table_url(table)?;
        apply_select(&mut url, query);
        let bytes = self
            .connection
            .send(self.connection.request(Method::GET, url))
            .await
            .map_err(map_failure)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ProfileStoreError::decode(format!("invalid row payload: {err}")))
    }
}

fn key_filter(key: &MatchKey) -> Filter {
    Filter::Eq {
        column: key.column.clone(),
        value: key.value.clone(),
    }
}

fn apply_filters(url: &mut Url, filters: &[Filter]) {
    let mut pairs = url.query_pairs_mut();
    for filter in filters {
        match filter {
            Filter::Eq { column, value } if value.is_null() => {
                pairs.append_pair(column, "is.null");
            }
            Filter::Eq { column, value } => {
                pairs.append_pair(column, &format!("eq.{}", literal(value)));
            }
            Filter::In { column, values } => {
                let list = values.iter().map(quoted).collect::<Vec<_>>().join(",");
                pairs.append_pair(column, &format!("in.({list})"));
            }
        }
    }
}

fn apply_select(url: &mut Url, query: &SelectQuery) {
    url.query_pairs_mut().append_pair("select", "*");
    apply_filters(url, &query.filters);
    let mut pairs = url.query_pairs_mut();
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        pairs.append_pair("order", &format!("{}.{direction}", order.column));
    }
    if let Some(limit) = query.limit {
        pairs.append_pair("limit", &limit.to_string());
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{}\"", text.replace('\\', r"\\").replace('"', "\\\"")),
        other => other.to_string(),
    }
}

fn map_failure(failure: HttpFailure) -> ProfileStoreError {
    match failure {
        HttpFailure::Decode(message) => ProfileStoreError::decode(message),
        failure if failure.is_transient() => ProfileStoreError::transport(failure.into_message()),
        failure => ProfileStoreError::rejected(failure.into_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::OrderBy;
    use rstest::rstest;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://abc.example.co/rest/v1/clients").expect("valid url")
    }

    #[rstest]
    fn key_filters_use_eq_syntax() {
        let mut url = base();
        apply_filters(&mut url, &[key_filter(&MatchKey::new("case_id", 42))]);
        assert_eq!(url.query(), Some("case_id=eq.42"));
    }

    #[rstest]
    fn null_keys_use_is_syntax() {
        let mut url = base();
        apply_filters(
            &mut url,
            &[Filter::Eq {
                column: "lawyer_id".to_owned(),
                value: Value::Null,
            }],
        );
        assert_eq!(url.query(), Some("lawyer_id=is.null"));
    }

    #[rstest]
    fn set_filters_quote_strings() {
        let mut url = base();
        apply_filters(
            &mut url,
            &[Filter::In {
                column: "id".to_owned(),
                values: vec![json!("a,b"), json!(7)],
            }],
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("id".to_owned(), "in.(\"a,b\",7)".to_owned())]);
    }

    #[rstest]
    fn select_renders_order_and_limit() {
        let mut url = base();
        let query = SelectQuery {
            filters: vec![Filter::Eq {
                column: "status".to_owned(),
                value: json!("open"),
            }],
            order: Some(OrderBy {
                column: "created_at".to_owned(),
                ascending: false,
            }),
            limit: Some(10),
        };
        apply_select(&mut url, &query);
        assert_eq!(
            url.query(),
            Some("select=*&status=eq.open&order=created_at.desc&limit=10")
        );
    }

    #[rstest]
    fn constraint_violations_are_rejections() {
        let err = map_failure(HttpFailure::Status {
            status: reqwest::StatusCode::CONFLICT,
            message: "duplicate key value violates unique constraint".to_owned(),
        });
        assert_eq!(err.kind(), "rejected");
    }
}
