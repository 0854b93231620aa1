use std::future::Future;

use crate::models::{QueryExecutionResponse, QueryRequest, QueryResultsResponse, Result, StartQueryResponse};

/// The Athena operations the client is built on.
///
/// Implemented by [`SdkClient`](crate::api_client::SdkClient) for the real service; tests supply
/// their own implementations.
pub trait QueryService: Send + Sync {
    /// StartQueryExecution
    /// Queue a query for execution; the response carries the new query execution id.
    fn start_query_execution(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<StartQueryResponse>> + Send;

    /// GetQueryExecution
    /// Fetch the execution record, including its current status.
    fn get_query_execution(
        &self,
        query_execution_id: &str,
    ) -> impl Future<Output = Result<QueryExecutionResponse>> + Send;

    /// GetQueryResults
    /// Fetch one page of results, starting at `next_token` when given.
    fn get_query_results(
        &self,
        query_execution_id: &str,
        next_token: Option<&str>,
    ) -> impl Future<Output = Result<QueryResultsResponse>> + Send;
}
