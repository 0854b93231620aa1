//! Async Amazon Athena client.
//!
//! [`AthenaClient`] submits queries, reports their status and drains paginated results;
//! [`flatten_to_rows`] turns a result set into one [`FlatRow`] per data row, keyed by the
//! header row. [`AthenaQueryService`] adds polling on top.
//!
//! ```no_run
//! use std::time::Duration;
//! use athena_query_client::{AthenaClient, AthenaConfig, AthenaQueryService, QueryRequest};
//!
//! # async fn example() -> athena_query_client::Result<()> {
//! let client = AthenaClient::new(AthenaConfig::builder().with_region("us-east-1").build()).await;
//! let service = AthenaQueryService::new(client);
//!
//! let request = QueryRequest::new("SELECT id, name FROM users")
//!     .with_database("analytics")
//!     .with_output_location("s3://my-athena-results/");
//! let rows = service.run_query(&request, Duration::from_secs(1), 300).await?;
//! for row in &rows {
//!     println!("{:?}", row.get("name"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod api_client;
pub mod client;
pub mod config;
pub mod models;
pub mod results;
pub mod service;

#[cfg(test)]
mod mock;

pub use api::QueryService;
pub use api_client::SdkClient;
pub use client::AthenaClient;
pub use config::{AthenaConfig, AthenaConfigBuilder};
pub use models::{AthenaError, QueryRequest, QueryResultsResponse, Result};
pub use results::{fetch_all_results, flatten_to_rows, FlatRow};
pub use service::AthenaQueryService;
