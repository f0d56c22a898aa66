//! Common test utilities for iamx-connector-ram integration tests.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

use iamx_connector_ram::{RamConfig, RamConnector};

/// Builds a connector pointed at the mock directory endpoint.
pub fn connector_for(server: &MockServer) -> RamConnector {
    let config = RamConfig::builder()
        .access_key_id("test-access-key-id")
        .access_key_secret("test-access-key-secret")
        .endpoint(server.uri())
        .settle_delay(Duration::from_millis(5))
        .build()
        .expect("valid test configuration");
    RamConnector::new(config).expect("connector construction")
}

/// Test data factory for a directory user record.
pub fn user_record(id: &str, username: &str) -> Value {
    json!({
        "UserId": id,
        "UserName": username,
        "DisplayName": format!("User {username}"),
        "Email": format!("{username}@example.com"),
        "MobilePhone": "86-1860000****",
        "Comments": ""
    })
}

/// A user record carrying only the required fields.
pub fn minimal_user_record(id: &str, username: &str) -> Value {
    json!({ "UserId": id, "UserName": username })
}

/// RAM error body.
pub fn ram_error(code: &str, message: &str) -> Value {
    json!({
        "RequestId": "9AE4F9F0-12D9-4E27-A302-7B2C4E6F18AA",
        "HostId": "ram.aliyuncs.com",
        "Code": code,
        "Message": message
    })
}

/// Acknowledgement-only response body.
pub fn ack() -> Value {
    json!({ "RequestId": "ACK-REQUEST-ID" })
}

/// `GetUser` / `CreateUser` response wrapping one user record.
pub fn user_response(user: Value) -> Value {
    json!({ "RequestId": "REQ-USER", "User": user })
}

/// `ListUsers` page; truncated exactly when a continuation marker is given.
pub fn list_users_response(users: Vec<Value>, marker: Option<&str>) -> Value {
    let mut response = json!({
        "RequestId": "REQ-LIST-USERS",
        "Users": { "User": users },
        "IsTruncated": marker.is_some()
    });
    if let Some(marker) = marker {
        response["Marker"] = json!(marker);
    }
    response
}

/// `ListPoliciesForUser` response from `(name, type)` pairs.
pub fn policies_response(policies: &[(&str, &str)]) -> Value {
    let records: Vec<Value> = policies
        .iter()
        .map(|(name, policy_type)| {
            json!({
                "PolicyName": name,
                "PolicyType": policy_type,
                "Description": "",
                "AttachDate": "2024-01-15T08:00:00Z"
            })
        })
        .collect();
    json!({ "RequestId": "REQ-POLICIES", "Policies": { "Policy": records } })
}

/// `ListGroupsForUser` response from group names.
pub fn groups_response(groups: &[&str]) -> Value {
    let records: Vec<Value> = groups
        .iter()
        .map(|name| json!({ "GroupName": name, "Comments": "" }))
        .collect();
    json!({ "RequestId": "REQ-GROUPS", "Groups": { "Group": records } })
}

/// Mock RAM endpoint with per-action setup helpers.
///
/// Every directory action arrives as a GET of `/` whose `Action` query
/// parameter names the call, so the helpers discriminate on that plus any
/// extra parameters a test cares about.
pub struct MockRamServer {
    pub server: MockServer,
}

impl MockRamServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn connector(&self) -> RamConnector {
        connector_for(&self.server)
    }

    fn action(action: &str) -> MockBuilder {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("Action", action))
    }

    /// Responds 200 to every call of `action`.
    pub async fn mock_ok(&self, action: &str, body: Value) {
        Self::action(action)
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Responds 200 to calls of `action` carrying the given parameter,
    /// verifying the exact call count when the server is dropped.
    pub async fn mock_ok_expect(&self, action: &str, param: (&str, &str), body: Value, hits: u64) {
        Self::action(action)
            .and(query_param(param.0, param.1))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(hits)
            .mount(&self.server)
            .await;
    }

    /// Responds with a RAM error to every call of `action`.
    pub async fn mock_error(&self, action: &str, status: u16, code: &str, message: &str) {
        Self::action(action)
            .respond_with(ResponseTemplate::new(status).set_body_json(ram_error(code, message)))
            .mount(&self.server)
            .await;
    }

    /// Responds with a RAM error to calls of `action` carrying the given
    /// parameter.
    pub async fn mock_error_param(
        &self,
        action: &str,
        param: (&str, &str),
        status: u16,
        code: &str,
        message: &str,
    ) {
        Self::action(action)
            .and(query_param(param.0, param.1))
            .respond_with(ResponseTemplate::new(status).set_body_json(ram_error(code, message)))
            .mount(&self.server)
            .await;
    }

    /// Declares that `action` must never be called.
    pub async fn forbid(&self, action: &str) {
        Self::action(action)
            .respond_with(ResponseTemplate::new(200).set_body_json(ack()))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}
