//! Typed wrapper over the remote RAM actions.
//!
//! Each method maps to exactly one directory action. The manager absorbs
//! the remote codes that mean "already in the desired state" so the
//! composite workflow operations stay retryable; every other failure
//! propagates unchanged.

use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::context::{AccessPolicies, ListContext, LoginProfile, PolicyType, RamUser, UserPolicy};
use crate::error::{RamErrorCode, RamResult};
use crate::rpc::RpcClient;

/// User record as the directory returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    pub user_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_phone: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl UserRecord {
    /// Maps the record into the connector's user representation.
    ///
    /// Total: absent profile fields default to the empty string, matching
    /// what the directory stores for them.
    #[must_use]
    pub fn into_ram_user(self) -> RamUser {
        RamUser {
            username: self.user_name,
            user_id: self.user_id,
            display_name: Some(self.display_name.unwrap_or_default()),
            email: Some(self.email.unwrap_or_default()),
            mobile_phone: Some(self.mobile_phone.unwrap_or_default()),
            comments: self.comments,
            delete_user: false,
        }
    }
}

/// Policy record as returned by `ListPoliciesForUser`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyRecord {
    pub policy_name: String,
    pub policy_type: PolicyType,
}

/// Group record as returned by `ListGroupsForUser`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupRecord {
    pub group_name: String,
}

/// Response to `GetUser`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetUserResponse {
    #[serde(default)]
    pub request_id: String,
    pub user: UserRecord,
}

/// Response to `CreateUser`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserResponse {
    #[serde(default)]
    pub request_id: String,
    pub user: UserRecord,
}

/// One page of `ListUsers`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListUsersResponse {
    #[serde(default)]
    pub request_id: String,
    pub users: UserList,
    /// True while more users remain beyond this page.
    #[serde(default)]
    pub is_truncated: bool,
    /// Cursor for the next page, present when truncated.
    #[serde(default)]
    pub marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserList {
    #[serde(default)]
    pub user: Vec<UserRecord>,
}

/// Response to `ListPoliciesForUser`. The directory returns the full set
/// for one user, unpaged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListPoliciesForUserResponse {
    #[serde(default)]
    pub request_id: String,
    pub policies: PolicyList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyList {
    #[serde(default)]
    pub policy: Vec<PolicyRecord>,
}

/// Response to `ListGroupsForUser`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListGroupsForUserResponse {
    #[serde(default)]
    pub request_id: String,
    pub groups: GroupList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupList {
    #[serde(default)]
    pub group: Vec<GroupRecord>,
}

/// Acknowledgement-only response shared by the mutating actions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AckResponse {
    #[serde(default)]
    pub request_id: String,
}

/// Account-level primitives over the RAM directory.
#[derive(Debug)]
pub struct AccountManager {
    rpc: RpcClient,
}

impl AccountManager {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Fetches a user by username.
    ///
    /// Propagates every error, including `EntityNotExist.User`.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn get_user(&self, user: &RamUser) -> RamResult<GetUserResponse> {
        self.rpc
            .request("GetUser", &[("UserName", user.username.clone())])
            .await
    }

    /// Lists one page of the user directory, passing through only the
    /// pagination parameters that are present.
    #[instrument(skip(self, list))]
    pub async fn list_users(&self, list: &ListContext) -> RamResult<ListUsersResponse> {
        let mut params = Vec::new();
        if let Some(max_items) = list.max_items {
            params.push(("MaxItems", max_items.to_string()));
        }
        if let Some(ref marker) = list.marker {
            params.push(("Marker", marker.clone()));
        }
        self.rpc.request("ListUsers", &params).await
    }

    /// Lists the policies currently attached to the user.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn list_attached_policies(
        &self,
        user: &RamUser,
    ) -> RamResult<ListPoliciesForUserResponse> {
        self.rpc
            .request("ListPoliciesForUser", &[("UserName", user.username.clone())])
            .await
    }

    /// Lists the groups the user currently belongs to.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn list_assigned_groups(
        &self,
        user: &RamUser,
    ) -> RamResult<ListGroupsForUserResponse> {
        self.rpc
            .request("ListGroupsForUser", &[("UserName", user.username.clone())])
            .await
    }

    /// Creates the user unless it already exists.
    ///
    /// An existing user is left untouched; its profile fields are not
    /// overwritten. Any probe failure other than `EntityNotExist.User`
    /// propagates.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create_user(&self, user: &RamUser) -> RamResult<()> {
        match self.get_user(user).await {
            Ok(_) => {
                debug!("user already exists, skipping creation");
                Ok(())
            }
            Err(err) if err.is_api_code(&RamErrorCode::UserNotFound) => {
                info!("creating user");
                let params = [
                    ("UserName", user.username.clone()),
                    ("Comments", user.comments.clone().unwrap_or_default()),
                    ("DisplayName", user.display_name.clone().unwrap_or_default()),
                    ("Email", user.email.clone().unwrap_or_default()),
                    ("MobilePhone", user.mobile_phone.clone().unwrap_or_default()),
                ];
                let _: CreateUserResponse = self.rpc.request("CreateUser", &params).await?;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Deletes the user. No-op unless `delete_user` is set; remote
    /// failures (e.g. the user still owning resources) propagate.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn delete_user(&self, user: &RamUser) -> RamResult<()> {
        if !user.delete_user {
            return Ok(());
        }
        info!("deleting user");
        let _: AckResponse = self
            .rpc
            .request("DeleteUser", &[("UserName", user.username.clone())])
            .await?;
        Ok(())
    }

    /// Creates the console login profile, or updates it in place when one
    /// already exists. No-op when no profile or password was supplied.
    #[instrument(skip(self, user, profile), fields(username = %user.username))]
    pub async fn create_login_profile(
        &self,
        user: &RamUser,
        profile: Option<&LoginProfile>,
    ) -> RamResult<()> {
        let Some(profile) = profile else {
            return Ok(());
        };
        if profile.password.is_empty() {
            return Ok(());
        }

        let params = [
            ("UserName", user.username.clone()),
            ("Password", profile.password.clone()),
            (
                "PasswordResetRequired",
                profile.require_password_reset.to_string(),
            ),
        ];
        let _: AckResponse = self.rpc.request("CreateLoginProfile", &params).await?;
        Ok(())
    }

    /// Deletes the console login profile ahead of account deletion.
    ///
    /// No-op unless `delete_user` is set; a profile that never existed is
    /// not an error.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn delete_login_profile(&self, user: &RamUser) -> RamResult<()> {
        if !user.delete_user {
            return Ok(());
        }
        let result: RamResult<AckResponse> = self
            .rpc
            .request("DeleteLoginProfile", &[("UserName", user.username.clone())])
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) if err.is_api_code(&RamErrorCode::LoginProfileNotFound) => {
                debug!("login profile does not exist");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Attaches the listed policies. Policies already attached are ignored.
    #[instrument(skip(self, user, access), fields(username = %user.username))]
    pub async fn attach_policies(
        &self,
        user: &RamUser,
        access: Option<&AccessPolicies>,
    ) -> RamResult<()> {
        let policies = access.map(|a| a.user_policies.as_slice()).unwrap_or(&[]);
        self.attach_user_policies(user, policies).await
    }

    /// Detaches policies from the user.
    ///
    /// When the user is marked for deletion, the actually-attached set is
    /// fetched and cleared in full, irrespective of what the caller passed;
    /// otherwise exactly the listed policies are detached and
    /// already-detached ones are ignored.
    #[instrument(skip(self, user, access), fields(username = %user.username))]
    pub async fn detach_policies(
        &self,
        user: &RamUser,
        access: Option<&AccessPolicies>,
    ) -> RamResult<()> {
        if !user.delete_user {
            let policies = access.map(|a| a.user_policies.as_slice()).unwrap_or(&[]);
            return self.detach_user_policies(user, policies).await;
        }

        let attached = self.list_attached_policies(user).await?;
        let policies: Vec<UserPolicy> = attached
            .policies
            .policy
            .into_iter()
            .map(|record| UserPolicy {
                name: record.policy_name,
                policy_type: record.policy_type,
            })
            .collect();
        self.detach_user_policies(user, &policies).await
    }

    /// Adds the user to the listed groups. Memberships that already exist
    /// are ignored.
    #[instrument(skip(self, user, access), fields(username = %user.username))]
    pub async fn add_to_groups(
        &self,
        user: &RamUser,
        access: Option<&AccessPolicies>,
    ) -> RamResult<()> {
        let groups = access.map(|a| a.groups.as_slice()).unwrap_or(&[]);
        self.add_user_to_groups(user, groups).await
    }

    /// Removes the user from groups; the deletion path lists the actual
    /// membership first and clears all of it.
    #[instrument(skip(self, user, access), fields(username = %user.username))]
    pub async fn remove_from_groups(
        &self,
        user: &RamUser,
        access: Option<&AccessPolicies>,
    ) -> RamResult<()> {
        if !user.delete_user {
            let groups = access.map(|a| a.groups.as_slice()).unwrap_or(&[]);
            return self.remove_user_from_groups(user, groups).await;
        }

        let assigned = self.list_assigned_groups(user).await?;
        let groups: Vec<String> = assigned
            .groups
            .group
            .into_iter()
            .map(|record| record.group_name)
            .collect();
        self.remove_user_from_groups(user, &groups).await
    }

    async fn attach_user_policies(&self, user: &RamUser, policies: &[UserPolicy]) -> RamResult<()> {
        try_join_all(policies.iter().map(|policy| async move {
            let params = [
                ("UserName", user.username.clone()),
                ("PolicyName", policy.name.clone()),
                ("PolicyType", policy.policy_type.as_str().to_string()),
            ];
            match self.rpc.request::<AckResponse>("AttachPolicyToUser", &params).await {
                Ok(_) => Ok(()),
                Err(err) if err.is_api_code(&RamErrorCode::PolicyAlreadyAttached) => Ok(()),
                Err(err) => Err(err),
            }
        }))
        .await?;
        Ok(())
    }

    async fn detach_user_policies(&self, user: &RamUser, policies: &[UserPolicy]) -> RamResult<()> {
        try_join_all(policies.iter().map(|policy| async move {
            let params = [
                ("UserName", user.username.clone()),
                ("PolicyName", policy.name.clone()),
                ("PolicyType", policy.policy_type.as_str().to_string()),
            ];
            match self.rpc.request::<AckResponse>("DetachPolicyFromUser", &params).await {
                Ok(_) => Ok(()),
                Err(err) if err.is_api_code(&RamErrorCode::PolicyNotAttached) => Ok(()),
                Err(err) => Err(err),
            }
        }))
        .await?;
        Ok(())
    }

    async fn add_user_to_groups(&self, user: &RamUser, groups: &[String]) -> RamResult<()> {
        try_join_all(groups.iter().map(|group| async move {
            let params = [
                ("UserName", user.username.clone()),
                ("GroupName", group.clone()),
            ];
            match self.rpc.request::<AckResponse>("AddUserToGroup", &params).await {
                Ok(_) => Ok(()),
                Err(err) if err.is_api_code(&RamErrorCode::AlreadyInGroup) => Ok(()),
                Err(err) => Err(err),
            }
        }))
        .await?;
        Ok(())
    }

    async fn remove_user_from_groups(&self, user: &RamUser, groups: &[String]) -> RamResult<()> {
        try_join_all(groups.iter().map(|group| async move {
            let params = [
                ("UserName", user.username.clone()),
                ("GroupName", group.clone()),
            ];
            match self.rpc.request::<AckResponse>("RemoveUserFromGroup", &params).await {
                Ok(_) => Ok(()),
                Err(err) if err.is_api_code(&RamErrorCode::NotInGroup) => Ok(()),
                Err(err) => Err(err),
            }
        }))
        .await?;
        Ok(())
    }
}
