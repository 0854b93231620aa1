use aws_config::BehaviorVersion;
use aws_sdk_athena::config::Region;
use aws_sdk_athena::types as sdk;
use aws_sdk_athena::Client;
use tracing::{debug, instrument};

use crate::api::QueryService;
use crate::config::AthenaConfig;
use crate::models::{
    ColumnInfo, Datum, QueryExecution, QueryExecutionResponse, QueryExecutionStatistics,
    QueryExecutionStatus, QueryRequest, QueryResultsResponse, Result, ResultSet,
    ResultSetMetadata, Row, StartQueryResponse,
};

/// Athena client backed by the AWS SDK.
///
/// Converts SDK output into this crate's models and SDK failures into
/// [`AthenaError::Service`](crate::models::AthenaError::Service) without touching them.
#[derive(Debug, Clone)]
pub struct SdkClient {
    inner: Client,
    page_size: Option<i32>,
}

impl SdkClient {
    /// Wraps an already configured SDK client.
    pub fn new(inner: Client) -> Self {
        Self {
            inner,
            page_size: None,
        }
    }

    /// Loads the shared AWS configuration, applying any overrides from `config`.
    pub async fn from_config(config: &AthenaConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let shared = loader.load().await;

        debug!(
            api_version = %config.api_version,
            region = ?shared.region(),
            "Athena SDK client configured"
        );

        Self {
            inner: Client::new(&shared),
            page_size: config.page_size,
        }
    }

    pub fn with_page_size(mut self, page_size: Option<i32>) -> Self {
        self.page_size = page_size;
        self
    }

    /// The raw SDK client, for operations this crate does not wrap.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

impl QueryService for SdkClient {
    #[instrument(skip(self, request), fields(work_group = ?request.work_group))]
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<StartQueryResponse> {
        let mut call = self
            .inner
            .start_query_execution()
            .query_string(request.query_string.as_str())
            .set_work_group(request.work_group.clone())
            .set_client_request_token(request.client_request_token.clone())
            .set_execution_parameters(request.execution_parameters.clone());

        if let Some(context) = &request.query_execution_context {
            call = call.query_execution_context(
                sdk::QueryExecutionContext::builder()
                    .set_database(context.database.clone())
                    .set_catalog(context.catalog.clone())
                    .build(),
            );
        }
        if let Some(result_configuration) = &request.result_configuration {
            call = call.result_configuration(
                sdk::ResultConfiguration::builder()
                    .set_output_location(result_configuration.output_location.clone())
                    .build(),
            );
        }

        let output = call.send().await.map_err(aws_sdk_athena::Error::from)?;

        Ok(StartQueryResponse {
            query_execution_id: output.query_execution_id().map(str::to_owned),
        })
    }

    #[instrument(skip(self))]
    async fn get_query_execution(&self, query_execution_id: &str) -> Result<QueryExecutionResponse> {
        let output = self
            .inner
            .get_query_execution()
            .query_execution_id(query_execution_id)
            .send()
            .await
            .map_err(aws_sdk_athena::Error::from)?;

        Ok(QueryExecutionResponse {
            query_execution: output.query_execution().map(convert_execution),
        })
    }

    #[instrument(skip(self))]
    async fn get_query_results(
        &self,
        query_execution_id: &str,
        next_token: Option<&str>,
    ) -> Result<QueryResultsResponse> {
        let output = self
            .inner
            .get_query_results()
            .query_execution_id(query_execution_id)
            .set_next_token(next_token.map(str::to_owned))
            .set_max_results(self.page_size)
            .send()
            .await
            .map_err(aws_sdk_athena::Error::from)?;

        Ok(QueryResultsResponse {
            result_set: output.result_set().map(convert_result_set),
            next_token: output.next_token().map(str::to_owned),
            update_count: output.update_count(),
        })
    }
}

fn convert_execution(execution: &sdk::QueryExecution) -> QueryExecution {
    QueryExecution {
        query_execution_id: execution.query_execution_id().map(str::to_owned),
        query: execution.query().map(str::to_owned),
        work_group: execution.work_group().map(str::to_owned),
        status: execution.status().map(|status| QueryExecutionStatus {
            state: status.state().map(|state| state.as_str().to_owned()),
            state_change_reason: status.state_change_reason().map(str::to_owned),
            submission_date_time: status.submission_date_time().map(|t| t.as_secs_f64()),
            completion_date_time: status.completion_date_time().map(|t| t.as_secs_f64()),
        }),
        statistics: execution.statistics().map(|stats| QueryExecutionStatistics {
            engine_execution_time_in_millis: stats.engine_execution_time_in_millis(),
            data_scanned_in_bytes: stats.data_scanned_in_bytes(),
            total_execution_time_in_millis: stats.total_execution_time_in_millis(),
        }),
    }
}

fn convert_result_set(result_set: &sdk::ResultSet) -> ResultSet {
    let rows = result_set
        .rows()
        .iter()
        .map(|row| Row {
            data: Some(
                row.data()
                    .iter()
                    .map(|datum| Datum {
                        var_char_value: datum.var_char_value().map(str::to_owned),
                    })
                    .collect(),
            ),
        })
        .collect();

    let result_set_metadata = result_set
        .result_set_metadata()
        .map(|metadata| ResultSetMetadata {
            column_info: Some(
                metadata
                    .column_info()
                    .iter()
                    .map(|column| ColumnInfo {
                        name: column.name().to_owned(),
                        column_type: column.r#type().to_owned(),
                        nullable: column.nullable().map(|n| n.as_str().to_owned()),
                    })
                    .collect(),
            ),
        });

    ResultSet {
        rows: Some(rows),
        result_set_metadata,
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_athena::config::Credentials;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::AthenaError;

    const AMZ_JSON: &str = "application/x-amz-json-1.1";

    fn test_client(endpoint: &str) -> SdkClient {
        let config = aws_sdk_athena::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .endpoint_url(endpoint)
            .build();
        SdkClient::new(Client::from_conf(config))
    }

    fn amz_json(body: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), AMZ_JSON)
    }

    #[tokio::test]
    async fn test_start_query_execution_wiremock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("x-amz-target", "AmazonAthena.StartQueryExecution"))
            .and(body_partial_json(json!({
                "QueryString": "SELECT 1",
                "QueryExecutionContext": { "Database": "analytics" },
                "ResultConfiguration": { "OutputLocation": "s3://results/" }
            })))
            .respond_with(amz_json(json!({ "QueryExecutionId": "qe-123" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let request = QueryRequest::new("SELECT 1")
            .with_database("analytics")
            .with_output_location("s3://results/");

        let response = client
            .start_query_execution(&request)
            .await
            .expect("start_query_execution should succeed");

        assert_eq!(response.query_execution_id.as_deref(), Some("qe-123"));
    }

    #[tokio::test]
    async fn test_get_query_execution_maps_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("x-amz-target", "AmazonAthena.GetQueryExecution"))
            .and(body_partial_json(json!({ "QueryExecutionId": "qe-123" })))
            .respond_with(amz_json(json!({
                "QueryExecution": {
                    "QueryExecutionId": "qe-123",
                    "Query": "SELECT 1",
                    "Status": {
                        "State": "FAILED",
                        "StateChangeReason": "SYNTAX_ERROR"
                    },
                    "Statistics": { "DataScannedInBytes": 42 }
                }
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let response = client.get_query_execution("qe-123").await.unwrap();

        assert_eq!(response.state(), Some("FAILED"));
        let execution = response.query_execution.unwrap();
        assert_eq!(execution.query.as_deref(), Some("SELECT 1"));
        assert_eq!(
            execution.status.unwrap().state_change_reason.as_deref(),
            Some("SYNTAX_ERROR")
        );
        assert_eq!(execution.statistics.unwrap().data_scanned_in_bytes, Some(42));
    }

    #[tokio::test]
    async fn test_get_query_results_maps_rows_and_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("x-amz-target", "AmazonAthena.GetQueryResults"))
            .and(body_partial_json(json!({ "QueryExecutionId": "qe-123", "NextToken": "page-2" })))
            .respond_with(amz_json(json!({
                "ResultSet": {
                    "Rows": [
                        { "Data": [ { "VarCharValue": "id" }, { "VarCharValue": "name" } ] },
                        { "Data": [ { "VarCharValue": "1" }, {} ] }
                    ],
                    "ResultSetMetadata": {
                        "ColumnInfo": [
                            { "Name": "id", "Type": "integer" },
                            { "Name": "name", "Type": "varchar" }
                        ]
                    }
                },
                "NextToken": "page-3"
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let page = client
            .get_query_results("qe-123", Some("page-2"))
            .await
            .unwrap();

        assert_eq!(page.next_token.as_deref(), Some("page-3"));
        assert_eq!(page.rows().len(), 2);
        assert_eq!(page.rows()[1].cells()[0].var_char_value.as_deref(), Some("1"));
        assert_eq!(page.rows()[1].cells()[1].var_char_value, None);

        let columns = page
            .result_set
            .unwrap()
            .result_set_metadata
            .unwrap()
            .column_info
            .unwrap();
        assert_eq!(columns[1].name, "name");
        assert_eq!(columns[1].column_type, "varchar");
    }

    #[tokio::test]
    async fn test_service_error_is_propagated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("x-amz-target", "AmazonAthena.GetQueryExecution"))
            .respond_with(ResponseTemplate::new(400).set_body_raw(
                json!({
                    "__type": "InvalidRequestException",
                    "Message": "QueryExecution qe-404 was not found"
                })
                .to_string(),
                AMZ_JSON,
            ))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let err = client.get_query_execution("qe-404").await.unwrap_err();

        assert!(matches!(
            err,
            AthenaError::Service(aws_sdk_athena::Error::InvalidRequestException(_))
        ));
    }
}
