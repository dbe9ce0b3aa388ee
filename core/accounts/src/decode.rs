//! Decode and validate request bodies into Request Types.
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;

use crate::OperationError;

/// Meta-programming to inline JSON Schemas for input validation.
macro_rules! schema {
    ($schema:ident, $source:expr) => {
        pub static $schema: Lazy<JSONSchema> = Lazy::new(|| {
            let schema = include_str!($source);
            let error = format!("invalid JSON schema for {}", stringify!($schema));
            let schema = serde_json::from_str(schema).expect(&error);
            JSONSchema::compile(&schema).expect(&error)
        });
    };
}

schema!(CREATE_ACCOUNT_SCHEMA, "schemas/create-account.schema.json");
schema!(UPDATE_DATA_SCHEMA, "schemas/update-data.schema.json");
schema!(UPDATE_PASSWORD_SCHEMA, "schemas/update-password.schema.json");
schema!(UPDATE_USERNAME_SCHEMA, "schemas/update-username.schema.json");

/// JSON decode a request body, validating it against a schema first.
pub fn decode<T>(schema: &JSONSchema, body: &[u8]) -> Result<T, OperationError>
where
    T: DeserializeOwned,
{
    let payload: Json = serde_json::from_slice(body).map_err(|error| {
        OperationError::bad_input(format!("request body is not valid JSON: {}", error))
    })?;
    schema.validate(&payload).map_err(OperationError::violations)?;
    serde_json::from_value(payload).map_err(|error| {
        OperationError::bad_input(format!("request body is not valid: {}", error))
    })
}

/// Ensure free-form account data is a valid JSON document.
pub fn json_data(data: &str) -> Result<(), OperationError> {
    serde_json::from_str::<serde::de::IgnoredAny>(data)
        .map(|_| ())
        .map_err(|error| OperationError::bad_input(format!("data is not valid JSON: {}", error)))
}
