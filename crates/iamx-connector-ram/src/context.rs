//! Workflow context types exchanged with the orchestrator.
//!
//! These mirror the JSON shapes of the connector's I/O contracts; the
//! schema documents in [`crate::schema`] describe the same shapes for the
//! orchestrator's validation layer.

use serde::{Deserialize, Serialize};

/// A RAM directory user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RamUser {
    /// Unique username within the account.
    pub username: String,
    /// Identifier assigned by the directory; only known after creation or
    /// fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// When true, revoke cascades to full account deletion.
    #[serde(default)]
    pub delete_user: bool,
}

impl RamUser {
    /// A user context carrying only the username.
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// Console-login credential for a user.
///
/// An absent login profile means no console password is set or changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginProfile {
    pub password: String,
    /// Whether the user must reset the password on first console login.
    #[serde(default = "default_password_reset")]
    pub require_password_reset: bool,
}

fn default_password_reset() -> bool {
    true
}

/// Policy type as the directory classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyType {
    System,
    Custom,
}

impl PolicyType {
    /// The wire spelling of this policy type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::System => "System",
            PolicyType::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for PolicyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named policy attachment. The `(name, type)` pair identifies the
/// attachable policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPolicy {
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
}

/// The policies and groups associated with a user.
///
/// Order carries no meaning; this is the working set for attach/detach.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicies {
    #[serde(default)]
    pub user_policies: Vec<UserPolicy>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Unit of work passed between the orchestrator and the connector.
///
/// The read-only operations need only `ram_user.username`; the mutating
/// operations additionally consume whichever optional sections are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowContext {
    pub ram_user: RamUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_profile: Option<LoginProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_policies: Option<AccessPolicies>,
}

impl WorkflowContext {
    /// A context carrying only a username, as the read-only operations
    /// accept.
    pub fn for_user(username: impl Into<String>) -> Self {
        Self {
            ram_user: RamUser::named(username),
            login_profile: None,
            access_policies: None,
        }
    }
}

/// Pagination request over the user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContext {
    /// Opaque cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Maximum number of users per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
    /// Restrict results to users belonging to this group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contain_group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutating_context_deserialization() {
        let value = json!({
            "ramUser": {
                "username": "alice",
                "displayName": "Alice",
                "deleteUser": true
            },
            "loginProfile": {
                "password": "Xyz123!"
            },
            "accessPolicies": {
                "userPolicies": [
                    { "name": "ReadOnlyAccess", "type": "System" }
                ],
                "groups": ["dev"]
            }
        });

        let context: WorkflowContext = serde_json::from_value(value).unwrap();
        assert_eq!(context.ram_user.username, "alice");
        assert!(context.ram_user.delete_user);
        assert_eq!(context.ram_user.email, None);

        let profile = context.login_profile.unwrap();
        // Defaults to true when the orchestrator leaves it out.
        assert!(profile.require_password_reset);

        let access = context.access_policies.unwrap();
        assert_eq!(
            access.user_policies,
            vec![UserPolicy {
                name: "ReadOnlyAccess".to_string(),
                policy_type: PolicyType::System,
            }]
        );
        assert_eq!(access.groups, vec!["dev".to_string()]);
    }

    #[test]
    fn test_read_only_context_deserialization() {
        let value = json!({ "ramUser": { "username": "bob" } });
        let context: WorkflowContext = serde_json::from_value(value).unwrap();
        assert_eq!(context.ram_user.username, "bob");
        assert!(!context.ram_user.delete_user);
        assert!(context.login_profile.is_none());
        assert!(context.access_policies.is_none());
    }

    #[test]
    fn test_context_serialization_skips_absent_sections() {
        let context = WorkflowContext::for_user("carol");
        let value = serde_json::to_value(&context).unwrap();
        assert_eq!(value["ramUser"]["username"], "carol");
        assert!(value.get("loginProfile").is_none());
        assert!(value.get("accessPolicies").is_none());
    }

    #[test]
    fn test_policy_type_wire_spelling() {
        assert_eq!(
            serde_json::to_value(PolicyType::System).unwrap(),
            json!("System")
        );
        assert_eq!(PolicyType::Custom.as_str(), "Custom");
    }

    #[test]
    fn test_list_context_defaults() {
        let list: ListContext = serde_json::from_value(json!({})).unwrap();
        assert!(list.marker.is_none());
        assert!(list.max_items.is_none());
        assert!(list.contain_group.is_none());
    }
}
