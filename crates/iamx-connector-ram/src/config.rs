//! Connector configuration.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{RamError, RamResult};

/// Default RAM service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ram.aliyuncs.com";

/// API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2015-05-01";

const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Access key pair for the RAM account.
#[derive(Clone)]
pub struct RamCredentials {
    /// Access key identifier.
    pub access_key_id: String,
    /// Access key secret. Only exposed inside the request signer.
    pub access_key_secret: SecretString,
}

impl std::fmt::Debug for RamCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RamCredentials")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// Configuration for the RAM connector.
#[derive(Debug, Clone)]
pub struct RamConfig {
    /// Account credentials used to sign every request.
    pub credentials: RamCredentials,
    /// Service endpoint.
    pub endpoint: String,
    /// API version.
    pub api_version: String,
    /// Wait inserted after mutating workflow phases so the directory can
    /// settle before the caller observes the result.
    pub settle_delay: Duration,
    /// Transport-level timeout applied by the HTTP client.
    pub request_timeout: Duration,
}

impl RamConfig {
    /// Returns a builder with the service defaults.
    #[must_use]
    pub fn builder() -> RamConfigBuilder {
        RamConfigBuilder::default()
    }

    /// Validates the configuration.
    pub(crate) fn validate(&self) -> RamResult<()> {
        if self.credentials.access_key_id.is_empty() {
            return Err(RamError::Config("access key id must not be empty".into()));
        }
        if self.credentials.access_key_secret.expose_secret().is_empty() {
            return Err(RamError::Config(
                "access key secret must not be empty".into(),
            ));
        }
        url::Url::parse(&self.endpoint)?;
        Ok(())
    }
}

/// Builder for [`RamConfig`].
#[derive(Debug, Default)]
pub struct RamConfigBuilder {
    access_key_id: Option<String>,
    access_key_secret: Option<SecretString>,
    endpoint: Option<String>,
    api_version: Option<String>,
    settle_delay: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl RamConfigBuilder {
    /// Sets the access key identifier (required).
    #[must_use]
    pub fn access_key_id(mut self, id: impl Into<String>) -> Self {
        self.access_key_id = Some(id.into());
        self
    }

    /// Sets the access key secret (required).
    #[must_use]
    pub fn access_key_secret(mut self, secret: impl Into<String>) -> Self {
        self.access_key_secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Overrides the service endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the API version.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Overrides the settle delay.
    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    /// Overrides the HTTP request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is missing or empty, or the endpoint
    /// is not a valid URL.
    pub fn build(self) -> RamResult<RamConfig> {
        let access_key_id = self
            .access_key_id
            .ok_or_else(|| RamError::Config("access key id is required".into()))?;
        let access_key_secret = self
            .access_key_secret
            .ok_or_else(|| RamError::Config("access key secret is required".into()))?;

        let config = RamConfig {
            credentials: RamCredentials {
                access_key_id,
                access_key_secret,
            },
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.into()),
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.into()),
            settle_delay: self.settle_delay.unwrap_or(DEFAULT_SETTLE_DELAY),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        };
        config.validate()?;
        Ok(config)
    }
}
