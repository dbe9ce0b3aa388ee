//! Data models for the Identity Provider.
//!
//! - [`Account`]: the identity record as persisted by the Identity Store.
//! - [`AccountView`]: the only representation of an account returned to callers.
//! - Request types: the validated input shapes of mutating operations.
//! - [`auth`]: entities, actions and resources used to authorise operations.
pub mod auth;

mod account;
mod requests;

pub use self::account::Account;
pub use self::account::AccountView;
pub use self::requests::CreateAccountRequest;
pub use self::requests::UpdateDataRequest;
pub use self::requests::UpdatePasswordRequest;
pub use self::requests::UpdateUsernameRequest;
