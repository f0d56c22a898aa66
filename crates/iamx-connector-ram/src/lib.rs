//! Aliyun RAM identity-provisioning connector
//!
//! This crate provisions and revokes user accounts in an Aliyun RAM
//! (Resource Access Management) directory on behalf of a workflow
//! orchestrator. It exposes four workflow operations — provision, revoke,
//! show and fetch_batch — over a typed, signed RPC client.
//!
//! # Features
//!
//! - Idempotent-leaning provisioning: remote "already in the desired
//!   state" responses are absorbed, so re-running a failed workflow
//!   converges instead of erroring
//! - Login-profile, policy-attachment and group-membership management
//! - Paginated directory retrieval with per-user enrichment and an
//!   optional group filter
//! - HMAC-SHA1 request signing with credentials held as secrets
//!
//! # Example
//!
//! ```no_run
//! use iamx_connector_ram::{RamConfig, RamConnector, WorkflowContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RamConfig::builder()
//!     .access_key_id("your-access-key-id")
//!     .access_key_secret("your-access-key-secret")
//!     .build()?;
//!
//! let connector = RamConnector::new(config)?;
//! let shown = connector.show(WorkflowContext::for_user("alice")).await?;
//! println!("{:?}", shown.access_policies);
//! # Ok(())
//! # }
//! ```

mod account;
mod batch;
mod config;
mod connector;
mod context;
mod error;
mod metadata;
mod rpc;
mod schema;

// Re-exports
pub use account::{
    AccountManager, AckResponse, CreateUserResponse, GetUserResponse, GroupList, GroupRecord,
    ListGroupsForUserResponse, ListPoliciesForUserResponse, ListUsersResponse, PolicyList,
    PolicyRecord, UserList, UserRecord,
};
pub use batch::BatchIterator;
pub use config::{RamConfig, RamConfigBuilder, RamCredentials, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
pub use connector::RamConnector;
pub use context::{
    AccessPolicies, ListContext, LoginProfile, PolicyType, RamUser, UserPolicy, WorkflowContext,
};
pub use error::{RamError, RamErrorCode, RamResult};
pub use metadata::{ConnectorMetadata, METADATA};
pub use rpc::RpcClient;
