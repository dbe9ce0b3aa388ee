//! Identity Store operations to persist records.
use idp_models::Account;
use idp_models::CreateAccountRequest;
use idp_models::UpdateDataRequest;
use idp_models::UpdatePasswordRequest;
use idp_models::UpdateUsernameRequest;

use self::seal::SealPersistOp;

/// Internal trait to enable persist operations on the persistent store.
pub trait PersistOp: Into<PersistOps> + SealPersistOp {
    /// Type returned by the matching persist operation.
    type Response: From<PersistResponses>;
}

/// List of all persist operations the persistent store must implement.
pub enum PersistOps {
    /// Create a new account record.
    CreateAccount(CreateAccount),

    /// Replace the free-form data of an account.
    UpdateData(UpdateData),

    /// Change the password of an account, confirmed by the current password.
    UpdatePassword(UpdatePassword),

    /// Change the username of an account, confirmed by the current password.
    UpdateUsername(UpdateUsername),
}

/// List of all responses from persist operations.
pub enum PersistResponses {
    /// The operation completed successfully and returns the updated account.
    Account(Account),
}

// --- High level persist operations --- //
/// Create a new account record with a system assigned ID.
///
/// Fails with [`UsernameConflict`](idp_errors::UsernameConflict) if the username is taken.
#[derive(Clone, Debug)]
pub struct CreateAccount {
    pub data: String,
    pub id: String,
    pub password: String,
    pub username: String,
}

impl CreateAccount {
    /// Prepare a new account with the given ID from a creation request.
    ///
    /// Any ID in the request is discarded.
    pub fn new<S: Into<String>>(id: S, request: CreateAccountRequest) -> Self {
        CreateAccount {
            data: request.data.unwrap_or_default(),
            id: id.into(),
            password: request.password,
            username: request.username,
        }
    }
}

/// Replace the free-form data of an account.
#[derive(Clone, Debug)]
pub struct UpdateData {
    pub id: String,
    pub request: UpdateDataRequest,
}

/// Change the password of an account.
///
/// Fails with [`PasswordMismatch`](idp_errors::PasswordMismatch) if the current password is wrong.
#[derive(Clone, Debug)]
pub struct UpdatePassword {
    pub id: String,
    pub request: UpdatePasswordRequest,
}

/// Change the username of an account.
///
/// Fails with [`PasswordMismatch`](idp_errors::PasswordMismatch) if the password is wrong
/// and with [`UsernameConflict`](idp_errors::UsernameConflict) if the username is taken.
#[derive(Clone, Debug)]
pub struct UpdateUsername {
    pub id: String,
    pub request: UpdateUsernameRequest,
}

// --- Create internal implementation details follow --- //
/// Private module to seal implementation details.
mod seal {
    /// Super-trait to seal the [`PersistOp`](super::PersistOp) trait.
    pub trait SealPersistOp {}
}

// --- Implement PersistOp and super traits on types for transparent operations --- //
impl PersistOp for CreateAccount {
    type Response = Account;
}
impl SealPersistOp for CreateAccount {}
impl From<CreateAccount> for PersistOps {
    fn from(value: CreateAccount) -> Self {
        PersistOps::CreateAccount(value)
    }
}

impl PersistOp for UpdateData {
    type Response = Account;
}
impl SealPersistOp for UpdateData {}
impl From<UpdateData> for PersistOps {
    fn from(value: UpdateData) -> Self {
        PersistOps::UpdateData(value)
    }
}

impl PersistOp for UpdatePassword {
    type Response = Account;
}
impl SealPersistOp for UpdatePassword {}
impl From<UpdatePassword> for PersistOps {
    fn from(value: UpdatePassword) -> Self {
        PersistOps::UpdatePassword(value)
    }
}

impl PersistOp for UpdateUsername {
    type Response = Account;
}
impl SealPersistOp for UpdateUsername {}
impl From<UpdateUsername> for PersistOps {
    fn from(value: UpdateUsername) -> Self {
        PersistOps::UpdateUsername(value)
    }
}

// --- Implement PersistResponses conversions on return types for transparent operations --- //
impl From<PersistResponses> for Account {
    fn from(value: PersistResponses) -> Self {
        match value {
            PersistResponses::Account(account) => account,
        }
    }
}
