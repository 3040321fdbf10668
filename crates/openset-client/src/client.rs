//! Request/response wrapper around the cluster's REST endpoints.
//!
//! Every method issues exactly one HTTP request. Success bodies are returned
//! as opaque JSON; the cluster's `{ "error": { ... } }` envelope is turned into
//! [`ClientError::Remote`].
//!
//! | method            | route                                   |
//! |-------------------|-----------------------------------------|
//! | `init_cluster`    | `PUT /v1/cluster/init?partitions=N`     |
//! | `invite_node`     | `PUT /v1/cluster/join?host=H&port=P`    |
//! | `create_table`    | `POST /v1/table/{table}`                |
//! | `describe_table`  | `GET /v1/table/{table}`                 |
//! | `add_column`      | `PUT /v1/table/{table}/column/{name}`   |
//! | `drop_column`     | `DELETE /v1/table/{table}/column/{name}`|
//! | `insert`          | `POST /v1/insert/{table}`               |
//! | `query_events`    | `POST /v1/query/{table}/event`          |
//! | `status`          | `GET /v1/status`                        |

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use openset_core::metrics::increment_route;
use openset_core::{Batch, ColumnDef, ColumnType, CreateTableRequest, ErrorEnvelope};
use reqwest::{RequestBuilder, Response, Url, header};
use serde::Serialize;
use serde_json::Value;

/// Result ordering for event queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Optional query-string parameters of an event query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryOptions {
    /// Return the compiled script and execution trace instead of results.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub debug: bool,

    /// Keep only the first N result rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<i64>,

    /// Column to sort by (`group` sorts by key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,

    /// Session window in milliseconds, overriding the table default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_time: Option<i64>,

    /// Comma-separated segment names to restrict the query to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<String>,
}

/// Async HTTP client for one cluster node.
#[derive(Debug, Clone)]
pub struct OpenSetClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OpenSetClient {
    /// Create a client for the node described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url())
            .map_err(|e| ClientError::Config(format!("invalid base URL: {}", e)))?;

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        tracing::debug!("OpenSet client initialized: {}", base_url);

        Ok(Self { http, base_url })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Cluster
    // =========================================================================

    /// Initialize a fresh node as a one-node cluster with `partitions` partitions.
    pub async fn init_cluster(&self, partitions: u32) -> Result<Value> {
        let url = self.url(&["v1", "cluster", "init"])?;
        let request = self.http.put(url).query(&[("partitions", partitions)]);
        self.execute("init_cluster", request).await
    }

    /// Invite the node at `host:port` to join this node's cluster.
    pub async fn invite_node(&self, host: &str, port: u16) -> Result<Value> {
        let url = self.url(&["v1", "cluster", "join"])?;
        let request = self
            .http
            .put(url)
            .query(&[("host", host.to_string()), ("port", port.to_string())]);
        self.execute("invite_node", request).await
    }

    /// Node and cluster status.
    pub async fn status(&self) -> Result<Value> {
        let url = self.url(&["v1", "status"])?;
        self.execute("status", self.http.get(url)).await
    }

    // =========================================================================
    // Tables
    // =========================================================================

    pub async fn create_table(&self, table: &str, columns: &[ColumnDef]) -> Result<Value> {
        self.create_table_with(
            table,
            &CreateTableRequest {
                columns: columns.to_vec(),
                z_order: None,
            },
        )
        .await
    }

    /// Create a table from a full request body (columns plus optional z-order).
    pub async fn create_table_with(
        &self,
        table: &str,
        request: &CreateTableRequest,
    ) -> Result<Value> {
        openset_core::validate_table_name(table)?;
        let url = self.url(&["v1", "table", table])?;
        self.execute("create_table", self.http.post(url).json(request))
            .await
    }

    pub async fn describe_table(&self, table: &str) -> Result<Value> {
        openset_core::validate_table_name(table)?;
        let url = self.url(&["v1", "table", table])?;
        self.execute("describe_table", self.http.get(url)).await
    }

    pub async fn add_column(
        &self,
        table: &str,
        name: &str,
        column_type: ColumnType,
        is_set: bool,
    ) -> Result<Value> {
        openset_core::validate_table_name(table)?;
        let url = self.url(&["v1", "table", table, "column", name])?;
        let request = self.http.put(url).query(&[
            ("type", column_type.as_str().to_string()),
            ("is_set", is_set.to_string()),
        ]);
        self.execute("add_column", request).await
    }

    pub async fn drop_column(&self, table: &str, name: &str) -> Result<Value> {
        openset_core::validate_table_name(table)?;
        let url = self.url(&["v1", "table", table, "column", name])?;
        self.execute("drop_column", self.http.delete(url)).await
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Send one batch to the table's insert endpoint.
    ///
    /// The cluster acknowledges once the events are queued on their
    /// partitions; it may delay the reply while partitions are backlogged.
    pub async fn insert(&self, batch: &Batch) -> Result<Value> {
        let url = self.url(&["v1", "insert", batch.table()])?;
        self.execute("insert", self.http.post(url).json(batch)).await
    }

    /// Run a query script against a table's events.
    pub async fn query_events(
        &self,
        table: &str,
        code: &str,
        options: &QueryOptions,
    ) -> Result<Value> {
        openset_core::validate_table_name(table)?;
        let url = self.url(&["v1", "query", table, "event"])?;
        let request = self
            .http
            .post(url)
            .query(options)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(code.to_string());
        self.execute("query_events", request).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(&self, route: &'static str, request: RequestBuilder) -> Result<Value> {
        increment_route("client_requests_total", route);

        let result = match request.send().await {
            Ok(response) => read_response(response).await,
            Err(e) => Err(e.into()),
        };

        if let Err(ref e) = result {
            increment_route("client_request_errors_total", route);
            tracing::debug!(route, "request failed: {}", e);
        }

        result
    }
}

/// Decode a response: JSON on success, an error envelope otherwise.
///
/// An empty success body becomes `null`; a non-JSON success body is returned
/// as a string.
async fn read_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)));
    }

    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => Err(ClientError::Remote {
            status,
            class: envelope.error.class,
            message: envelope.error.message,
        }),
        Err(_) => Err(ClientError::Status { status, body }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenSetClient {
        OpenSetClient::new(&ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client();
        let url = client.url(&["v1", "table", "highstreet"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:2020/v1/table/highstreet");
    }

    #[test]
    fn test_url_escapes_segments() {
        let client = client();
        let url = client
            .url(&["v1", "table", "t", "column", "a b/c"])
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:2020/v1/table/t/column/a%20b%2Fc");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = OpenSetClient::new(&ClientConfig::new("", 2020));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_query_options_skip_unset() {
        let options = QueryOptions::default();
        assert_eq!(serde_json::to_value(&options).unwrap(), serde_json::json!({}));

        let options = QueryOptions {
            debug: true,
            trim: Some(10),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({ "debug": true, "trim": 10, "order": "asc" })
        );
    }

    #[tokio::test]
    async fn test_describe_table_rejects_bad_name_without_sending() {
        let err = client().describe_table("bad name").await.unwrap_err();
        assert!(matches!(err, ClientError::Core(_)));
    }
}
