//! Connector identification, consumed by the orchestrator for capability
//! discovery.

/// Static descriptor for a connector build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorMetadata {
    /// Engine identifier.
    pub engine: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Semantic version.
    pub version: &'static str,
    /// Names of the supported workflow operations.
    pub supported_execution: &'static [&'static str],
}

/// Metadata for the Aliyun RAM connector.
pub const METADATA: ConnectorMetadata = ConnectorMetadata {
    engine: "iamx-aliyun",
    name: "IAMX Aliyun Connector",
    version: env!("CARGO_PKG_VERSION"),
    supported_execution: &["provision", "revoke", "show", "fetchBatch"],
};
