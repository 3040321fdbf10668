//! Destination for dispatched batches.

use crate::error::SinkError;
use openset_client::OpenSetClient;
use openset_core::Batch;
use serde_json::Value;
use std::future::Future;

/// Accepts one batch per call and reports the outcome.
///
/// The shuttler awaits each call before starting the next, so an
/// implementation never sees two batches in flight.
pub trait RemoteSink {
    fn send_batch(&self, batch: Batch) -> impl Future<Output = Result<Value, SinkError>> + Send;
}

/// Sends batches to a cluster's insert endpoint.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: OpenSetClient,
}

impl HttpSink {
    pub fn new(client: OpenSetClient) -> Self {
        Self { client }
    }
}

impl RemoteSink for HttpSink {
    async fn send_batch(&self, batch: Batch) -> Result<Value, SinkError> {
        Ok(self.client.insert(&batch).await?)
    }
}
