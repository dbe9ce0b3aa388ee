//! Uniform outcome of failed account operations.
use serde::Serialize;
use serde_json::Value as Json;

use idp_auth::access::Forbidden;
use idp_errors::AccountNotFound;
use idp_errors::InvalidAccount;
use idp_errors::PasswordMismatch;
use idp_errors::UsernameConflict;

/// Classification of account operation failures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Missing target ID or a malformed request body.
    BadInput,

    /// The Authorisation Gate denied the operation, or failed to decide.
    Forbidden,

    /// The target account does not exist.
    NotFound,

    /// The requested username is already in use.
    Conflict,

    /// The password confirming an update is wrong.
    PasswordMismatch,

    /// The Identity Store failed for reasons not classified above.
    Internal,

    /// The credentials attached to the request are not valid.
    Unauthenticated,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadInput => "BadInput",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::PasswordMismatch => "PasswordMismatch",
            ErrorKind::Internal => "Internal",
            ErrorKind::Unauthenticated => "Unauthenticated",
        }
    }

    /// HTTP status code that best represents the failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadInput => 400,
            ErrorKind::PasswordMismatch | ErrorKind::Unauthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account operation failed.
///
/// Messages are safe to return to callers: they never include passwords
/// and denied operations never reveal if the target account exists.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct OperationError {
    pub kind: ErrorKind,
    pub message: String,

    /// Individual payload validation failures, if any.
    pub violations: Vec<String>,
}

impl OperationError {
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        OperationError {
            kind,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    pub fn bad_input<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::BadInput, message)
    }

    /// The request payload failed JSON Schema validation.
    pub fn violations(errors: jsonschema::ErrorIterator) -> Self {
        let violations = errors.map(|error| error.to_string()).collect();
        OperationError {
            kind: ErrorKind::BadInput,
            message: "Payload validation failed".into(),
            violations,
        }
    }

    /// Classify an error returned by the Authorisation Gate.
    ///
    /// Every outcome is a [`ErrorKind::Forbidden`] error, faults included.
    /// Only explicit denials expose their reason, including any cause the gate attached.
    pub(crate) fn from_gate(error: &anyhow::Error) -> Self {
        if error.downcast_ref::<Forbidden>().is_some() {
            return Self::new(ErrorKind::Forbidden, format!("{:#}", error));
        }
        Self::new(ErrorKind::Forbidden, "unable to verify authorisation")
    }

    /// Classify an error returned by the Identity Store.
    pub(crate) fn from_store(error: &anyhow::Error) -> Self {
        if let Some(error) = error.downcast_ref::<AccountNotFound>() {
            return Self::new(ErrorKind::NotFound, error.to_string());
        }
        if let Some(error) = error.downcast_ref::<UsernameConflict>() {
            return Self::new(ErrorKind::Conflict, error.to_string());
        }
        if let Some(error) = error.downcast_ref::<PasswordMismatch>() {
            return Self::new(ErrorKind::PasswordMismatch, error.to_string());
        }
        if let Some(error) = error.downcast_ref::<InvalidAccount>() {
            return Self::new(ErrorKind::BadInput, error.to_string());
        }
        Self::new(ErrorKind::Internal, "the identity store failed to process the request")
    }

    /// Structured representation of the error for callers.
    pub fn to_json(&self) -> Json {
        let mut body = serde_json::json!({
            "error": true,
            "error_msg": self.message,
            "kind": self.kind,
        });
        if !self.violations.is_empty() {
            body["violations"] = serde_json::json!(self.violations);
        }
        body
    }
}

#[cfg(feature = "actix-web")]
impl actix_web::ResponseError for OperationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(self.kind.status_code())
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(self.to_json())
    }
}
