//! Signed HTTP client for the RAM RPC API.
//!
//! Every action is a GET of `/` carrying the common parameters, the
//! action-specific parameters, and an HMAC-SHA1 signature over the
//! canonicalized query.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha1::Sha1;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::RamConfig;
use crate::error::{RamError, RamErrorCode, RamResult};

type HmacSha1 = Hmac<Sha1>;

/// Error payload returned by the RAM endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub request_id: String,
}

/// HTTP client for the RAM RPC endpoint.
///
/// Owns the connection pool and signs every request with the account
/// credentials. Shared configuration only; safe for concurrent use by
/// multiple in-flight logical requests.
#[derive(Debug)]
pub struct RpcClient {
    http_client: reqwest::Client,
    config: RamConfig,
}

impl RpcClient {
    /// Creates the client, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: RamConfig) -> RamResult<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RamError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Invokes `action` with the given action-specific parameters and
    /// deserializes the response.
    ///
    /// Failures are surfaced as-is: a non-2xx response becomes a
    /// [`RamError::Api`] carrying the classified wire code. No retries.
    #[instrument(skip(self, params))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, String)],
    ) -> RamResult<T> {
        let query = self.signed_query(action, params);

        debug!("dispatching {action}");
        let response = self
            .http_client
            .get(&self.config.endpoint)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => Err(RamError::Api {
                code: RamErrorCode::parse(&api_error.code),
                message: api_error.message,
                request_id: api_error.request_id,
            }),
            // Not a structured API error (e.g. a gateway page); keep the
            // status and raw body so the caller can still see what happened.
            Err(_) => Err(RamError::Api {
                code: RamErrorCode::Unclassified(status.to_string()),
                message: body,
                request_id: String::new(),
            }),
        }
    }

    /// Assembles the common parameters, the action parameters, and the
    /// signature into the full request query.
    fn signed_query(&self, action: &str, params: &[(&str, String)]) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = vec![
            ("Action".into(), action.to_string()),
            ("Format".into(), "JSON".into()),
            ("Version".into(), self.config.api_version.clone()),
            (
                "AccessKeyId".into(),
                self.config.credentials.access_key_id.clone(),
            ),
            ("SignatureMethod".into(), "HMAC-SHA1".into()),
            ("SignatureVersion".into(), "1.0".into()),
            ("SignatureNonce".into(), Uuid::new_v4().to_string()),
            (
                "Timestamp".into(),
                Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
        ];
        query.extend(params.iter().map(|(k, v)| ((*k).to_string(), v.clone())));

        let signature = sign(
            self.config.credentials.access_key_secret.expose_secret(),
            &query,
        );
        query.push(("Signature".into(), signature));
        query
    }
}

/// Computes the request signature over the canonicalized query.
fn sign(secret: &str, query: &[(String, String)]) -> String {
    let canonical = canonicalized_query(query);
    let string_to_sign = format!("GET&%2F&{}", percent_encode(&canonical));
    hmac_sha1_base64(&format!("{secret}&"), &string_to_sign)
}

/// Sorts the parameters by name and joins them `k=v` with `&`, with both
/// keys and values percent-encoded.
fn canonicalized_query(query: &[(String, String)]) -> String {
    let mut pairs: Vec<&(String, String)> = query.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// RFC 3986 percent-encoding as the signature algorithm requires: unreserved
/// characters (`A-Z a-z 0-9 - _ . ~`) pass through, everything else is
/// encoded.
fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn hmac_sha1_base64(key: &str, data: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}
