use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State Athena reports while a query is still executing.
pub const RUNNING_STATE: &str = "RUNNING";

/// State Athena reports for a query that completed successfully.
pub const SUCCEEDED_STATE: &str = "SUCCEEDED";

/// Request body for StartQueryExecution
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest {
    pub query_string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_execution_context: Option<QueryExecutionContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_configuration: Option<ResultConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_request_token: Option<String>,
    /// Values for `?` placeholders, in order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_parameters: Option<Vec<String>>,
}

impl QueryRequest {
    pub fn new(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
            ..Default::default()
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.query_execution_context
            .get_or_insert_with(QueryExecutionContext::default)
            .database = Some(database.into());
        self
    }

    /// S3 location where Athena writes the query output, e.g. `s3://bucket/prefix/`.
    pub fn with_output_location(mut self, output_location: impl Into<String>) -> Self {
        self.result_configuration
            .get_or_insert_with(ResultConfiguration::default)
            .output_location = Some(output_location.into());
        self
    }

    pub fn with_work_group(mut self, work_group: impl Into<String>) -> Self {
        self.work_group = Some(work_group.into());
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QueryExecutionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResultConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_location: Option<String>,
}

/// Response body for StartQueryExecution
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct StartQueryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_execution_id: Option<String>,
}

/// Response body for GetQueryExecution, kept as close to the raw payload as possible.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QueryExecutionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_execution: Option<QueryExecution>,
}

impl QueryExecutionResponse {
    /// The nested `QueryExecution.Status.State` value, if every level is present.
    pub fn state(&self) -> Option<&str> {
        self.query_execution
            .as_ref()?
            .status
            .as_ref()?
            .state
            .as_deref()
    }

    /// `false` while the state is `RUNNING` or cannot be located, `true` for any other state.
    pub fn is_finished(&self) -> bool {
        match self.state() {
            Some(state) => state != RUNNING_STATE,
            None => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QueryExecution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_execution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QueryExecutionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<QueryExecutionStatistics>,
}

/// Execution status
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QueryExecutionStatus {
    /// Examples: "QUEUED", "RUNNING", "SUCCEEDED", "FAILED", "CANCELLED"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_change_reason: Option<String>,
    /// Seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_date_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date_time: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QueryExecutionStatistics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_execution_time_in_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_scanned_in_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_execution_time_in_millis: Option<i64>,
}

/// One page of GetQueryResults output.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResultsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_set: Option<ResultSet>,
    /// Present when more pages remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_count: Option<i64>,
}

impl QueryResultsResponse {
    pub fn rows(&self) -> &[Row] {
        self.result_set
            .as_ref()
            .and_then(|rs| rs.rows.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResultSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_set_metadata: Option<ResultSetMetadata>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Datum>>,
}

impl Row {
    pub fn cells(&self) -> &[Datum] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Builds a row from optional cell values, left to right.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Row {
            data: Some(
                values
                    .into_iter()
                    .map(|value| Datum {
                        var_char_value: value.map(Into::into),
                    })
                    .collect(),
            ),
        }
    }
}

/// A single cell. Absent values stay absent.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Datum {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var_char_value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResultSetMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_info: Option<Vec<ColumnInfo>>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnInfo {
    pub name: String,
    /// Athena SQL type name, e.g. "varchar", "bigint".
    #[serde(rename = "Type")]
    pub column_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<String>,
}

/// Possible errors encountered by the Athena client
#[derive(Error, Debug)]
pub enum AthenaError {
    #[error("Invalid query execution id")]
    InvalidIdentifier,

    #[error("Athena service error: {0}")]
    Service(#[from] aws_sdk_athena::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Query {execution_id} finished in state {state}: {reason}")]
    QueryFailed {
        execution_id: String,
        state: String,
        reason: String,
    },

    #[error("Unknown error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AthenaError>;
