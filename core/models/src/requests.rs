//! Inputs of the mutating account operations.
//!
//! Request types are transient and owned by a single operation.
//! The target account ID of updates is never part of the body.
use serde::Deserialize;
use serde::Serialize;

/// Request to create a new account.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Client supplied ID, always discarded in favour of a system generated one.
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub data: Option<String>,
}

/// Request to change the username of an account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UpdateUsernameRequest {
    /// Current password of the account, to confirm the change.
    pub password: String,

    /// New username for the account.
    pub username: String,
}

/// Request to change the password of an account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request to replace the free-form data of an account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UpdateDataRequest {
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::CreateAccountRequest;
    use super::UpdatePasswordRequest;

    #[test]
    fn create_request_optional_fields() {
        let request: CreateAccountRequest =
            serde_json::from_str(r#"{"username": "peter", "password": "secret"}"#).unwrap();
        assert_eq!(request.id, None);
        assert_eq!(request.data, None);
    }

    #[test]
    fn password_request_uses_camel_case() {
        let request: UpdatePasswordRequest =
            serde_json::from_str(r#"{"currentPassword": "old", "newPassword": "new"}"#).unwrap();
        assert_eq!(request.current_password, "old");
        assert_eq!(request.new_password, "new");
    }
}
