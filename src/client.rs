use tracing::{debug, instrument};

use crate::api::QueryService;
use crate::api_client::SdkClient;
use crate::config::AthenaConfig;
use crate::models::*;
use crate::results::{self, FlatRow};

/// Athena client exposing the submit / status / results operations, one service call each.
///
/// Generic over the [`QueryService`] so tests can substitute their own implementation; by default
/// it wraps the AWS SDK.
#[derive(Debug, Clone)]
pub struct AthenaClient<S = SdkClient> {
    service: S,
    config: AthenaConfig,
}

impl AthenaClient<SdkClient> {
    /// Creates a client backed by the AWS SDK, with region and credentials that `config` leaves
    /// unset resolved from the environment.
    pub async fn new(config: AthenaConfig) -> Self {
        let service = SdkClient::from_config(&config).await;
        Self { service, config }
    }
}

impl<S: QueryService> AthenaClient<S> {
    pub fn with_service(service: S, config: AthenaConfig) -> Self {
        Self { service, config }
    }

    /// Returns the wrapped service, for operations this client does not expose.
    pub fn instance(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &AthenaConfig {
        &self.config
    }

    /// StartQueryExecution
    /// Queue up a query. The request is passed through as is.
    #[instrument(skip(self, request))]
    pub async fn submit_query(&self, request: &QueryRequest) -> Result<StartQueryResponse> {
        let response = self.service.start_query_execution(request).await?;
        debug!(query_execution_id = ?response.query_execution_id, "Query submitted");
        Ok(response)
    }

    /// GetQueryExecution
    /// Full execution record for `query_execution_id`. An empty id fails without a service call.
    #[instrument(skip(self))]
    pub async fn get_execution_status(
        &self,
        query_execution_id: &str,
    ) -> Result<QueryExecutionResponse> {
        if query_execution_id.is_empty() {
            return Err(AthenaError::InvalidIdentifier);
        }
        self.service.get_query_execution(query_execution_id).await
    }

    /// Whether the query has left the `RUNNING` state.
    ///
    /// A status payload without `QueryExecution.Status.State` counts as not finished rather than
    /// an error; only a failed status call is reported as one.
    #[instrument(skip(self))]
    pub async fn is_query_finished(&self, query_execution_id: &str) -> Result<bool> {
        let response = self.get_execution_status(query_execution_id).await?;
        if response.state().is_none() {
            debug!("Status payload has no state, treating query as not finished");
        }
        Ok(response.is_finished())
    }

    /// GetQueryResults, following `NextToken` until the last page.
    /// See [`results::fetch_all_results`].
    pub async fn fetch_all_results(
        &self,
        query_execution_id: &str,
        next_token: Option<&str>,
    ) -> Result<QueryResultsResponse> {
        results::fetch_all_results(&self.service, query_execution_id, next_token).await
    }

    /// See [`results::flatten_to_rows`].
    pub fn flatten_to_rows(&self, page: Option<&QueryResultsResponse>) -> Vec<FlatRow> {
        results::flatten_to_rows(page)
    }
}
