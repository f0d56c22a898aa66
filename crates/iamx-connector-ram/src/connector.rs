//! Workflow operations composed from the account primitives.

use std::time::Duration;

use futures::future::try_join_all;
use tokio::time::sleep;
use tracing::{info, instrument};

use crate::account::AccountManager;
use crate::batch::BatchIterator;
use crate::config::RamConfig;
use crate::context::{AccessPolicies, ListContext, RamUser, UserPolicy, WorkflowContext};
use crate::error::RamResult;
use crate::metadata::{ConnectorMetadata, METADATA};
use crate::rpc::RpcClient;
use crate::schema;

/// Aliyun RAM provisioning connector.
///
/// Composes the account primitives into the four workflow operations the
/// orchestrator drives: [`provision`](Self::provision),
/// [`revoke`](Self::revoke), [`show`](Self::show) and
/// [`fetch_batch`](Self::fetch_batch).
#[derive(Debug)]
pub struct RamConnector {
    account: AccountManager,
    settle_delay: Duration,
}

impl RamConnector {
    /// Builds the connector, validating the configuration and constructing
    /// the signed RPC client up front. The client is owned for the
    /// connector's lifetime.
    pub fn new(config: RamConfig) -> RamResult<Self> {
        let settle_delay = config.settle_delay;
        let rpc = RpcClient::new(config)?;
        Ok(Self {
            account: AccountManager::new(rpc),
            settle_delay,
        })
    }

    /// Connector metadata for capability discovery.
    #[must_use]
    pub fn metadata(&self) -> &'static ConnectorMetadata {
        &METADATA
    }

    /// Schema of a credentials registry entry.
    #[must_use]
    pub fn registry_format() -> serde_json::Value {
        schema::credentials_registry_schema()
    }

    /// Schema of the context accepted by `show`.
    #[must_use]
    pub fn read_context_format() -> serde_json::Value {
        schema::read_only_context_schema()
    }

    /// Schema of the context accepted by `provision` and `revoke`.
    #[must_use]
    pub fn write_context_format() -> serde_json::Value {
        schema::mutating_context_schema()
    }

    /// Schema of the request accepted by `fetch_batch`.
    #[must_use]
    pub fn list_context_format() -> serde_json::Value {
        schema::list_context_schema()
    }

    /// The account-level primitives, for callers needing finer control
    /// than the workflow operations.
    #[must_use]
    pub fn account(&self) -> &AccountManager {
        &self.account
    }

    /// Creates the user, then applies policies, group membership and the
    /// login profile concurrently.
    ///
    /// A failure leaves partially-applied remote state in place; re-running
    /// the operation converges because every step treats "already in the
    /// desired state" as success.
    #[instrument(skip(self, context), fields(username = %context.ram_user.username))]
    pub async fn provision(&self, context: WorkflowContext) -> RamResult<WorkflowContext> {
        self.account.create_user(&context.ram_user).await?;

        tokio::try_join!(
            self.account
                .attach_policies(&context.ram_user, context.access_policies.as_ref()),
            self.account
                .add_to_groups(&context.ram_user, context.access_policies.as_ref()),
            self.account
                .create_login_profile(&context.ram_user, context.login_profile.as_ref()),
        )?;

        // Give the directory time to settle before the caller observes the
        // new account.
        sleep(self.settle_delay).await;

        info!("user provisioned");
        Ok(context)
    }

    /// Strips the login profile, policy attachments and group memberships
    /// in that order, then deletes the user when `deleteUser` is set.
    ///
    /// With `deleteUser` unset this only removes the listed policies and
    /// groups, leaving the account in place. With it set, the actual
    /// attached/assigned state is listed remotely and cleared in full.
    #[instrument(skip(self, context), fields(username = %context.ram_user.username))]
    pub async fn revoke(&self, context: WorkflowContext) -> RamResult<WorkflowContext> {
        let user = &context.ram_user;
        let access = context.access_policies.as_ref();

        self.account.delete_login_profile(user).await?;
        self.account.detach_policies(user, access).await?;
        self.account.remove_from_groups(user, access).await?;

        sleep(self.settle_delay).await;
        self.account.delete_user(user).await?;

        info!("user revoked");
        Ok(context)
    }

    /// Fetches the user's current remote state: profile, group membership
    /// and attached policies.
    ///
    /// Only `ramUser.username` is read from the input; everything in the
    /// returned context reflects the directory.
    #[instrument(skip(self, context), fields(username = %context.ram_user.username))]
    pub async fn show(&self, context: WorkflowContext) -> RamResult<WorkflowContext> {
        let fetched = self.account.get_user(&context.ram_user).await?;
        self.enrich(fetched.user.into_ram_user()).await
    }

    /// Lists one page of the user directory, enriches every user with its
    /// group membership and attached policies, and wraps the page into a
    /// [`BatchIterator`].
    ///
    /// With `containGroup` set, the page is filtered to users belonging to
    /// that group after enrichment.
    #[instrument(skip(self, list))]
    pub async fn fetch_batch(&self, list: ListContext) -> RamResult<BatchIterator<'_>> {
        let page = self.account.list_users(&list).await?;

        let contexts = try_join_all(
            page.users
                .user
                .into_iter()
                .map(|record| self.enrich(record.into_ram_user())),
        )
        .await?;

        let results: Vec<WorkflowContext> = match &list.contain_group {
            Some(group) => contexts
                .into_iter()
                .filter(|context| {
                    context
                        .access_policies
                        .as_ref()
                        .is_some_and(|access| access.groups.iter().any(|g| g == group))
                })
                .collect(),
            None => contexts,
        };

        info!(
            users = results.len(),
            truncated = page.is_truncated,
            "fetched user batch"
        );

        Ok(BatchIterator::new(
            self,
            results,
            page.marker,
            list.max_items,
            list.contain_group,
            page.is_truncated,
        ))
    }

    /// Assembles a full context for one user by listing its groups and
    /// policies concurrently.
    async fn enrich(&self, ram_user: RamUser) -> RamResult<WorkflowContext> {
        let (groups, policies) = tokio::try_join!(
            self.account.list_assigned_groups(&ram_user),
            self.account.list_attached_policies(&ram_user),
        )?;

        let access = AccessPolicies {
            user_policies: policies
                .policies
                .policy
                .into_iter()
                .map(|record| UserPolicy {
                    name: record.policy_name,
                    policy_type: record.policy_type,
                })
                .collect(),
            groups: groups
                .groups
                .group
                .into_iter()
                .map(|record| record.group_name)
                .collect(),
        };

        Ok(WorkflowContext {
            ram_user,
            login_profile: None,
            access_policies: Some(access),
        })
    }
}
