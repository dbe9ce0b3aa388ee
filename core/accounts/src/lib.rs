//! Authorisation gated account operations.
//!
//! The [`Accounts`] dispatcher maps the six account operations onto the Identity [`Store`]
//! after checking with the Authorisation Gate ([`Authoriser`]) that the requesting entity
//! is allowed to act on the target identity.
//!
//! Every operation follows the same fixed sequence:
//!
//! 1. The target account ID must be non-empty.
//! 2. The request body is decoded and validated.
//! 3. The action is authorised on the [`permission`] resource of the target ID.
//! 4. The matching [`Store`] operation is performed.
//! 5. The resulting account is returned as a redacted [`AccountView`].
//!
//! Each step only runs if the previous ones succeeded: requests that are malformed never
//! consume an authorisation check and denied requests never reach the store, so the
//! existence of an account can't be observed without permission.
//!
//! Account creation is the exception to step 3: no resource exists to authorise against
//! until the system assigns an ID to the new account.
use idp_auth::access::Authoriser;
use idp_auth::access::Forbidden;
use idp_auth::permission;
use idp_auth::Action;
use idp_context::Context;
use idp_models::AccountView;
use idp_models::CreateAccountRequest;
use idp_models::UpdateDataRequest;
use idp_models::UpdatePasswordRequest;
use idp_models::UpdateUsernameRequest;
use idp_store::delete::DeleteAccount;
use idp_store::persist::CreateAccount;
use idp_store::persist::UpdateData;
use idp_store::persist::UpdatePassword;
use idp_store::persist::UpdateUsername;
use idp_store::query::LookupAccount;
use idp_store::Store;

mod basic;
mod decode;
mod error;
mod owner;
mod telemetry;


pub use self::basic::BasicAuthentication;
pub use self::basic::BasicAuthenticationFactory;
pub use self::error::ErrorKind;
pub use self::error::OperationError;
pub use self::owner::Owner;
pub use self::telemetry::register_metrics;

use self::decode::decode;
use self::decode::CREATE_ACCOUNT_SCHEMA;
use self::decode::UPDATE_DATA_SCHEMA;
use self::decode::UPDATE_PASSWORD_SCHEMA;
use self::decode::UPDATE_USERNAME_SCHEMA;

/// Context attribute carrying the ID of the account an operation targets.
pub const OWNER_ATTRIBUTE: &str = "owner";

/// Perform account operations on behalf of authorised entities.
#[derive(Clone)]
pub struct Accounts {
    authoriser: Authoriser,
    store: Store,
}

impl Accounts {
    pub fn new(authoriser: Authoriser, store: Store) -> Self {
        Accounts { authoriser, store }
    }

    /// Create a new account from a [`CreateAccountRequest`] body.
    ///
    /// Any ID in the request is discarded and a new one is generated.
    pub async fn create(
        &self,
        context: &Context,
        body: &[u8],
    ) -> Result<AccountView, OperationError> {
        let result = self.create_account(context, body).await;
        telemetry::observe(context, Action::Create, &result);
        result
    }

    /// Delete the account with the given ID.
    pub async fn delete(&self, context: &Context, id: &str) -> Result<(), OperationError> {
        let result = self.delete_account(context, id).await;
        telemetry::observe(context, Action::Delete, &result);
        result
    }

    /// Lookup the account with the given ID.
    pub async fn get(&self, context: &Context, id: &str) -> Result<AccountView, OperationError> {
        let result = self.get_account(context, id).await;
        telemetry::observe(context, Action::Get, &result);
        result
    }

    /// Replace the free-form data of an account from an [`UpdateDataRequest`] body.
    pub async fn update_data(
        &self,
        context: &Context,
        id: &str,
        body: &[u8],
    ) -> Result<AccountView, OperationError> {
        let result = self.put_data(context, id, body).await;
        telemetry::observe(context, Action::PutData, &result);
        result
    }

    /// Change the password of an account from an [`UpdatePasswordRequest`] body.
    pub async fn update_password(
        &self,
        context: &Context,
        id: &str,
        body: &[u8],
    ) -> Result<AccountView, OperationError> {
        let result = self.put_password(context, id, body).await;
        telemetry::observe(context, Action::PutPassword, &result);
        result
    }

    /// Change the username of an account from an [`UpdateUsernameRequest`] body.
    pub async fn update_username(
        &self,
        context: &Context,
        id: &str,
        body: &[u8],
    ) -> Result<AccountView, OperationError> {
        let result = self.put_username(context, id, body).await;
        telemetry::observe(context, Action::PutUsername, &result);
        result
    }
}

impl Accounts {
    /// Authorise an action on the identity with the given ID.
    ///
    /// Returns the [`Context`] to continue the operation with.
    async fn authorise(
        &self,
        context: &Context,
        action: Action,
        id: &str,
    ) -> Result<Context, OperationError> {
        let context = context.derive().attribute(OWNER_ATTRIBUTE, id).build();
        let result = self
            .authoriser
            .authorise(&context, action, permission(id))
            .await;
        if let Err(error) = result {
            if !error.is::<Forbidden>() {
                slog::error!(
                    context.logger, "Authorisation could not be verified";
                    "action" => action.as_str(),
                    "error" => format!("{:?}", error),
                );
            }
            return Err(OperationError::from_gate(&error));
        }
        Ok(context)
    }

    async fn create_account(
        &self,
        context: &Context,
        body: &[u8],
    ) -> Result<AccountView, OperationError> {
        let request: CreateAccountRequest = decode(&CREATE_ACCOUNT_SCHEMA, body)?;
        if let Some(data) = request.data.as_deref().filter(|data| !data.is_empty()) {
            self::decode::json_data(data)?;
        }

        let id = uuid::Uuid::new_v4().to_string();
        if let Some(requested) = &request.id {
            slog::debug!(
                context.logger, "Discarding client provided account ID";
                "requested" => requested,
                "id" => &id,
            );
        }
        let account = self
            .store
            .persist(context, CreateAccount::new(id, request))
            .await
            .map_err(|error| store_error(context, error))?;
        Ok(AccountView::from(account))
    }

    async fn delete_account(&self, context: &Context, id: &str) -> Result<(), OperationError> {
        let id = target(id)?;
        let context = self.authorise(context, Action::Delete, id).await?;
        self.store
            .delete(&context, DeleteAccount::from(id))
            .await
            .map_err(|error| store_error(&context, error))?;
        Ok(())
    }

    async fn get_account(&self, context: &Context, id: &str) -> Result<AccountView, OperationError> {
        let id = target(id)?;
        let context = self.authorise(context, Action::Get, id).await?;
        let account = self
            .store
            .query(&context, LookupAccount::from(id))
            .await
            .map_err(|error| store_error(&context, error))?;
        Ok(AccountView::from(account))
    }

    async fn put_data(
        &self,
        context: &Context,
        id: &str,
        body: &[u8],
    ) -> Result<AccountView, OperationError> {
        let id = target(id)?;
        let request: UpdateDataRequest = decode(&UPDATE_DATA_SCHEMA, body)?;
        self::decode::json_data(&request.data)?;

        let context = self.authorise(context, Action::PutData, id).await?;
        let update = UpdateData {
            id: id.to_string(),
            request,
        };
        let account = self
            .store
            .persist(&context, update)
            .await
            .map_err(|error| store_error(&context, error))?;
        Ok(AccountView::from(account))
    }

    async fn put_password(
        &self,
        context: &Context,
        id: &str,
        body: &[u8],
    ) -> Result<AccountView, OperationError> {
        let id = target(id)?;
        let request: UpdatePasswordRequest = decode(&UPDATE_PASSWORD_SCHEMA, body)?;

        let context = self.authorise(context, Action::PutPassword, id).await?;
        let update = UpdatePassword {
            id: id.to_string(),
            request,
        };
        let account = self
            .store
            .persist(&context, update)
            .await
            .map_err(|error| store_error(&context, error))?;
        Ok(AccountView::from(account))
    }

    async fn put_username(
        &self,
        context: &Context,
        id: &str,
        body: &[u8],
    ) -> Result<AccountView, OperationError> {
        let id = target(id)?;
        let request: UpdateUsernameRequest = decode(&UPDATE_USERNAME_SCHEMA, body)?;

        let context = self.authorise(context, Action::PutUsername, id).await?;
        let update = UpdateUsername {
            id: id.to_string(),
            request,
        };
        let account = self
            .store
            .persist(&context, update)
            .await
            .map_err(|error| store_error(&context, error))?;
        Ok(AccountView::from(account))
    }
}

/// Classify a store error, logging failures that are not the caller's fault.
fn store_error(context: &Context, error: anyhow::Error) -> OperationError {
    let failure = OperationError::from_store(&error);
    if failure.kind == ErrorKind::Internal {
        slog::error!(
            context.logger, "Identity store operation failed";
            "error" => format!("{:?}", error),
        );
    }
    failure
}

/// Ensure the target account ID of an operation is present.
fn target(id: &str) -> Result<&str, OperationError> {
    if id.is_empty() {
        return Err(OperationError::bad_input("the target account ID is required"));
    }
    Ok(id)
}
