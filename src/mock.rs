//! Scripted [`QueryService`] that records every call it receives.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::api::QueryService;
use crate::models::{
    AthenaError, QueryExecution, QueryExecutionResponse, QueryExecutionStatus, QueryRequest,
    QueryResultsResponse, Result, StartQueryResponse,
};

#[derive(Default)]
pub(crate) struct MockQueryService {
    starts: Mutex<VecDeque<Result<StartQueryResponse>>>,
    executions: Mutex<VecDeque<Result<QueryExecutionResponse>>>,
    results: Mutex<VecDeque<Result<QueryResultsResponse>>>,
    submitted: Mutex<Vec<QueryRequest>>,
    status_requests: Mutex<Vec<String>>,
    result_requests: Mutex<Vec<(String, Option<String>)>>,
    calls: AtomicUsize,
}

impl MockQueryService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_start(&self, response: Result<StartQueryResponse>) {
        self.starts.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_execution(&self, response: Result<QueryExecutionResponse>) {
        self.executions.lock().unwrap().push_back(response);
    }

    /// Queues a status payload whose nested state is `state`.
    pub(crate) fn push_state(&self, state: &str) {
        self.push_execution(Ok(execution_in_state(state)));
    }

    pub(crate) fn push_results(&self, response: Result<QueryResultsResponse>) {
        self.results.lock().unwrap().push_back(response);
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn submitted(&self) -> Vec<QueryRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub(crate) fn status_requests(&self) -> Vec<String> {
        self.status_requests.lock().unwrap().clone()
    }

    pub(crate) fn result_requests(&self) -> Vec<(String, Option<String>)> {
        self.result_requests.lock().unwrap().clone()
    }
}

pub(crate) fn execution_in_state(state: &str) -> QueryExecutionResponse {
    QueryExecutionResponse {
        query_execution: Some(QueryExecution {
            status: Some(QueryExecutionStatus {
                state: Some(state.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
    }
}

fn exhausted<T>(operation: &str) -> Result<T> {
    Err(AthenaError::Other(format!("no scripted response for {operation}")))
}

impl QueryService for MockQueryService {
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<StartQueryResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(request.clone());
        let next = self.starts.lock().unwrap().pop_front();
        next.unwrap_or_else(|| exhausted("StartQueryExecution"))
    }

    async fn get_query_execution(&self, query_execution_id: &str) -> Result<QueryExecutionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.status_requests
            .lock()
            .unwrap()
            .push(query_execution_id.to_string());
        let next = self.executions.lock().unwrap().pop_front();
        next.unwrap_or_else(|| exhausted("GetQueryExecution"))
    }

    async fn get_query_results(
        &self,
        query_execution_id: &str,
        next_token: Option<&str>,
    ) -> Result<QueryResultsResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result_requests
            .lock()
            .unwrap()
            .push((query_execution_id.to_string(), next_token.map(str::to_owned)));
        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| exhausted("GetQueryResults"))
    }
}
