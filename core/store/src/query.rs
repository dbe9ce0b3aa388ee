//! Identity Store operations to query records.
use idp_models::Account;

use self::seal::SealQueryOp;

/// Internal trait to enable query operations on the persistent store.
pub trait QueryOp: Into<QueryOps> + SealQueryOp {
    /// Type returned by the matching query operation.
    type Response: From<QueryResponses>;
}

/// List of all query operations the persistent store must implement.
pub enum QueryOps {
    /// Query an account by ID.
    Account(LookupAccount),

    /// Query an account by username, verifying the given password matches.
    Authenticate(AuthenticateAccount),
}

/// List of all responses from query operations.
pub enum QueryResponses {
    /// Return the [`Account`] matching the query.
    Account(Account),
}

// --- High level query operations --- //
/// Lookup an [`Account`] record by ID.
///
/// Fails with [`AccountNotFound`](idp_errors::AccountNotFound) if no such account exists.
#[derive(Clone, Debug)]
pub struct LookupAccount {
    pub id: String,
}
impl From<String> for LookupAccount {
    fn from(value: String) -> Self {
        LookupAccount { id: value }
    }
}
impl From<&str> for LookupAccount {
    fn from(value: &str) -> Self {
        LookupAccount {
            id: value.to_string(),
        }
    }
}

/// Lookup an [`Account`] by username and password.
///
/// Fails with [`AccountNotFound`](idp_errors::AccountNotFound) if the username is unknown
/// and with [`PasswordMismatch`](idp_errors::PasswordMismatch) if the password is wrong.
#[derive(Clone)]
pub struct AuthenticateAccount {
    pub password: String,
    pub username: String,
}

impl AuthenticateAccount {
    pub fn new<S1, S2>(username: S1, password: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        AuthenticateAccount {
            password: password.into(),
            username: username.into(),
        }
    }
}

// --- Internal implementation details follow --- //
/// Private module to seal implementation details.
mod seal {
    /// Super-trait to seal the [`QueryOp`](super::QueryOp) trait.
    pub trait SealQueryOp {}
}

// --- Implement QueryOp and super traits on types for transparent operations --- //
impl SealQueryOp for LookupAccount {}
impl QueryOp for LookupAccount {
    type Response = Account;
}
impl From<LookupAccount> for QueryOps {
    fn from(value: LookupAccount) -> Self {
        QueryOps::Account(value)
    }
}

impl SealQueryOp for AuthenticateAccount {}
impl QueryOp for AuthenticateAccount {
    type Response = Account;
}
impl From<AuthenticateAccount> for QueryOps {
    fn from(value: AuthenticateAccount) -> Self {
        QueryOps::Authenticate(value)
    }
}

// --- Implement QueryResponses conversions on return types for transparent operations --- //
impl From<QueryResponses> for Account {
    fn from(value: QueryResponses) -> Self {
        match value {
            QueryResponses::Account(account) => account,
        }
    }
}
