//! Account storage interface for the Identity Provider.
//!
//! Callers interact with a [`Store`] through three generic methods, one per kind of access:
//!
//! - [`Store::query`] reads accounts without changing them.
//! - [`Store::persist`] creates accounts or changes their fields.
//! - [`Store::delete`] removes accounts.
//!
//! Each method accepts any operation type from the matching module ([`query`], [`persist`]
//! or [`delete`]) and returns the response type that operation declares.
//! The operation traits are sealed so the set of operations is fixed by this crate.
//!
//! ```ignore
//! use idp_store::query::LookupAccount;
//!
//! let account = store.query(context, LookupAccount::from(id)).await?;
//! println!("{}", account.username);
//! ```
//!
//! ## Errors
//!
//! Backends report the conditions defined in [`idp_errors`] wrapped in [`anyhow::Error`]s:
//!
//! - [`AccountNotFound`](idp_errors::AccountNotFound) when an account does not exist.
//! - [`UsernameConflict`](idp_errors::UsernameConflict) when a username is already taken.
//! - [`PasswordMismatch`](idp_errors::PasswordMismatch) when a confirming password is wrong.
//! - [`InvalidAccount`](idp_errors::InvalidAccount) when account data can't be stored.
//!
//! Any other error indicates a failure of the store itself.
//!
//! ## Backends
//!
//! A [`StoreBackend`] receives every operation wrapped in the `*Ops` enum of its group
//! and must answer with the `*Responses` variant the operation expects.
//! Backends own the concurrency control of the records they store:
//! username uniqueness must hold even with concurrent creates and renames.
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value as Json;

use idp_context::Context;

pub mod delete;
pub mod persist;
pub mod query;

#[cfg(any(test, feature = "test-fixture"))]
mod fixture;
#[cfg(any(test, feature = "test-fixture"))]
pub use self::fixture::StoreFixture;


use self::delete::DeleteOp;
use self::delete::DeleteOps;
use self::delete::DeleteResponses;
use self::persist::PersistOp;
use self::persist::PersistOps;
use self::persist::PersistResponses;
use self::query::QueryOp;
use self::query::QueryOps;
use self::query::QueryResponses;

/// Handle to the account storage backend selected at startup.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn StoreBackend>,
}

impl Store {
    /// Remove an account from the store.
    pub async fn delete<O>(&self, context: &Context, op: O) -> Result<O::Response>
    where
        O: DeleteOp,
    {
        let response = self.inner.delete(context, op.into()).await?;
        Ok(O::Response::from(response))
    }

    /// Read account records from the store.
    pub async fn query<O>(&self, context: &Context, op: O) -> Result<O::Response>
    where
        O: QueryOp,
    {
        let response = self.inner.query(context, op.into()).await?;
        Ok(O::Response::from(response))
    }

    /// Create or modify account records in the store.
    pub async fn persist<O>(&self, context: &Context, op: O) -> Result<O::Response>
    where
        O: PersistOp,
    {
        let response = self.inner.persist(context, op.into()).await?;
        Ok(O::Response::from(response))
    }
}

impl<T> From<T> for Store
where
    T: StoreBackend + 'static,
{
    fn from(value: T) -> Self {
        Store {
            inner: Arc::new(value),
        }
    }
}

#[cfg(any(test, feature = "test-fixture"))]
impl Store {
    /// Store backed by an empty [`StoreFixture`].
    pub fn fixture() -> Self {
        let inner = StoreFixture::default();
        Self::from(inner)
    }
}

/// Account storage implementation plugged behind a [`Store`].
#[async_trait::async_trait]
pub trait StoreBackend: Send + Sync {
    async fn delete(&self, context: &Context, op: DeleteOps) -> Result<DeleteResponses>;
    async fn query(&self, context: &Context, op: QueryOps) -> Result<QueryResponses>;
    async fn persist(&self, context: &Context, op: PersistOps) -> Result<PersistResponses>;
}

/// Builds [`Store`]s for a named backend from its configuration block.
#[async_trait::async_trait]
pub trait StoreFactory: Send + Sync {
    /// Reject configuration blocks the backend would fail to start with.
    fn conf_check(&self, context: &Context, conf: &Json) -> Result<()>;

    /// Add the backend's own metrics to the process registry.
    fn register_metrics(&self, registry: &prometheus::Registry) -> Result<()>;

    /// Connect to the backend and return a [`Store`] handle for it.
    async fn store<'a>(&self, args: StoreFactoryArgs<'a>) -> Result<Store>;
}

/// Inputs to [`StoreFactory::store`].
pub struct StoreFactoryArgs<'a> {
    /// Backend options from the `store` configuration section.
    pub conf: &'a Json,
    pub context: &'a Context,
}
