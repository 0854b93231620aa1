//! Client configuration.

use serde::Deserialize;

/// Athena API version the client is written against.
pub const DEFAULT_API_VERSION: &str = "2017-05-18";

/// Configuration used to build the Athena client.
///
/// Region, profile and credentials that are left unset are resolved by the AWS SDK's own
/// provider chain (environment, `~/.aws/config`, instance metadata, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AthenaConfig {
    /// Athena API version. Recorded for callers, not interpreted.
    pub api_version: String,
    /// AWS region, e.g. `us-east-1`.
    pub region: Option<String>,
    /// Named profile from the shared AWS config files.
    pub profile: Option<String>,
    /// Endpoint override, mostly for local testing.
    pub endpoint_url: Option<String>,
    /// MaxResults sent with each GetQueryResults call.
    pub page_size: Option<i32>,
}

impl Default for AthenaConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            region: None,
            profile: None,
            endpoint_url: None,
            page_size: None,
        }
    }
}

impl AthenaConfig {
    /// Create a new config builder.
    pub fn builder() -> AthenaConfigBuilder {
        AthenaConfigBuilder::default()
    }
}

/// Builder for AthenaConfig.
#[derive(Debug, Default)]
pub struct AthenaConfigBuilder {
    config: AthenaConfig,
}

impl AthenaConfigBuilder {
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = api_version.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.config.region = Some(region.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.config.profile = Some(profile.into());
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.config.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Athena caps this at 1000.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.config.page_size = Some(page_size);
        self
    }

    pub fn build(self) -> AthenaConfig {
        self.config
    }
}
