//! Common errors from and for Identity Store implementations.
//!
//! Store backends return these conditions wrapped in `anyhow::Error`s so that
//! callers can classify failures by downcasting while keeping any extra context.

/// The expected account was not found.
#[derive(Debug, thiserror::Error)]
#[error("the expected account '{id}' was not found")]
pub struct AccountNotFound {
    pub id: String,
}

impl AccountNotFound {
    /// The expected account was not found.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into() }
    }
}

/// The requested account data is not valid for storage.
#[derive(Debug, thiserror::Error)]
#[error("invalid account: {reason}")]
pub struct InvalidAccount {
    pub reason: String,
}

impl InvalidAccount {
    /// The requested account data is not valid for storage.
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The password provided to confirm an operation does not match the stored one.
#[derive(Debug, thiserror::Error)]
#[error("the provided password does not match")]
pub struct PasswordMismatch;

/// The username is already in use by another account.
#[derive(Debug, thiserror::Error)]
#[error("the username '{username}' is already taken")]
pub struct UsernameConflict {
    pub username: String,
}

impl UsernameConflict {
    /// The username is already in use by another account.
    pub fn new<S: Into<String>>(username: S) -> Self {
        Self {
            username: username.into(),
        }
    }
}
