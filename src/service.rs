use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::api::QueryService;
use crate::api_client::SdkClient;
use crate::client::AthenaClient;
use crate::models::*;
use crate::results::{self, FlatRow};

/// Higher-level service layer built on top of `AthenaClient`.
/// Provides combinatorial / convenience operations like polling until completion.
#[derive(Debug, Clone)]
pub struct AthenaQueryService<S = SdkClient> {
    client: AthenaClient<S>,
}

impl<S: QueryService> AthenaQueryService<S> {
    pub fn new(client: AthenaClient<S>) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying client (if you need direct calls).
    pub fn client(&self) -> &AthenaClient<S> {
        &self.client
    }

    /// Polls a query until it is no longer RUNNING.
    ///
    /// A status payload without a state counts as still running. Returns the final status
    /// payload, or an error once `max_polls` polls have not seen the query finish.
    #[instrument(skip(self))]
    pub async fn poll_until_finished(
        &self,
        query_execution_id: &str,
        poll_interval: Duration,
        max_polls: usize,
    ) -> Result<QueryExecutionResponse> {
        let mut polls = 0;
        loop {
            let resp = self.client.get_execution_status(query_execution_id).await?;
            if resp.is_finished() {
                debug!(state = ?resp.state(), polls, "Query finished");
                return Ok(resp);
            }

            polls += 1;
            if polls >= max_polls {
                return Err(AthenaError::Other(format!(
                    "Max polls reached before query {} finished.",
                    query_execution_id
                )));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Submit a query, then poll until it finishes.
    pub async fn execute_and_wait(
        &self,
        request: &QueryRequest,
        poll_interval: Duration,
        max_polls: usize,
    ) -> Result<QueryExecutionResponse> {
        let query_execution_id = self.submit(request).await?;
        self.poll_until_finished(&query_execution_id, poll_interval, max_polls)
            .await
    }

    /// Submit a query, wait for it, and collect every result row.
    ///
    /// Any final state other than SUCCEEDED is reported as [`AthenaError::QueryFailed`].
    #[instrument(skip(self, request))]
    pub async fn run_query(
        &self,
        request: &QueryRequest,
        poll_interval: Duration,
        max_polls: usize,
    ) -> Result<Vec<FlatRow>> {
        let query_execution_id = self.submit(request).await?;
        let finished = self
            .poll_until_finished(&query_execution_id, poll_interval, max_polls)
            .await?;

        let status = finished
            .query_execution
            .and_then(|execution| execution.status)
            .unwrap_or_default();
        let state = status.state.unwrap_or_default();

        if state != SUCCEEDED_STATE {
            return Err(AthenaError::QueryFailed {
                execution_id: query_execution_id,
                state,
                reason: status
                    .state_change_reason
                    .unwrap_or_else(|| "no reason given".to_string()),
            });
        }

        let page = self
            .client
            .fetch_all_results(&query_execution_id, None)
            .await?;
        let rows = results::flatten_to_rows(Some(&page));
        info!(%query_execution_id, rows = rows.len(), "Query results collected");
        Ok(rows)
    }

    async fn submit(&self, request: &QueryRequest) -> Result<String> {
        let submitted = self.client.submit_query(request).await?;
        match submitted.query_execution_id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(AthenaError::ApiError(
                "No query execution ID returned by StartQueryExecution.".to_string(),
            )),
        }
    }
}
