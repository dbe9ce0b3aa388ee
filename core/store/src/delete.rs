//! Identity Store operations to delete records.
use idp_models::Account;

use self::seal::SealDeleteOp;

/// Internal trait to enable delete operations on the persistent store.
pub trait DeleteOp: Into<DeleteOps> + SealDeleteOp {
    /// Type returned by the matching delete operation.
    type Response: From<DeleteResponses>;
}

/// List of all delete operations the persistent store must implement.
pub enum DeleteOps {
    /// Delete an account by ID.
    Account(DeleteAccount),
}

/// List of all responses from delete operations.
pub enum DeleteResponses {
    /// The operation completed successfully and does not return data.
    Success,
}

// --- High level delete operations --- //
/// Request deletion of an [`Account`] record.
///
/// Fails with [`AccountNotFound`](idp_errors::AccountNotFound) if no such account exists,
/// including when the account was already deleted.
pub struct DeleteAccount {
    /// Identifier of the [`Account`] record to delete.
    pub id: String,
}
impl From<&Account> for DeleteAccount {
    fn from(value: &Account) -> Self {
        DeleteAccount {
            id: value.id.clone(),
        }
    }
}
impl From<String> for DeleteAccount {
    fn from(value: String) -> Self {
        DeleteAccount { id: value }
    }
}
impl From<&str> for DeleteAccount {
    fn from(value: &str) -> Self {
        DeleteAccount {
            id: value.to_string(),
        }
    }
}

// --- Create internal implementation details follow --- //
/// Private module to seal implementation details.
mod seal {
    /// Super-trait to seal the [`DeleteOp`](super::DeleteOp) trait.
    pub trait SealDeleteOp {}
}

// --- Implement DeleteOp and super traits on types for transparent operations --- //
impl DeleteOp for DeleteAccount {
    type Response = ();
}
impl SealDeleteOp for DeleteAccount {}
impl From<DeleteAccount> for DeleteOps {
    fn from(value: DeleteAccount) -> Self {
        DeleteOps::Account(value)
    }
}

impl DeleteOp for &Account {
    type Response = ();
}
impl SealDeleteOp for &Account {}
impl From<&Account> for DeleteOps {
    fn from(value: &Account) -> Self {
        let value = DeleteAccount::from(value);
        DeleteOps::Account(value)
    }
}

// --- Implement DeleteResponses conversions on return types for transparent operations --- //
impl From<DeleteResponses> for () {
    fn from(value: DeleteResponses) -> Self {
        match value {
            DeleteResponses::Success => (),
        }
    }
}
