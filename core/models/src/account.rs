use serde::Deserialize;
use serde::Serialize;

/// Identity record persisted by the Identity Store.
///
/// The `password` attribute holds credential material managed by the store
/// and is never serialised.
/// Callers outside the store must be handed an [`AccountView`] instead.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// System assigned, immutable, unique identifier of the account.
    pub id: String,

    /// Unique name of the account.
    pub username: String,

    /// Stored credential material (possibly hashed by the store).
    #[serde(skip_serializing, default)]
    pub password: String,

    /// Free-form data attached to the account, valid JSON when not empty.
    #[serde(default)]
    pub data: String,
}

/// Redacted view of an [`Account`] safe to return to callers.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
}

impl From<Account> for AccountView {
    fn from(value: Account) -> Self {
        AccountView {
            id: value.id,
            username: value.username,
            data: value.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Account;
    use super::AccountView;

    fn account() -> Account {
        Account {
            id: "e4a0f3a6".into(),
            username: "peter".into(),
            password: "secret".into(),
            data: r#"{"age":42}"#.into(),
        }
    }

    #[test]
    fn account_never_serialises_password() {
        let json = serde_json::to_value(account()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "e4a0f3a6",
                "username": "peter",
                "data": r#"{"age":42}"#,
            })
        );
    }

    #[test]
    fn view_drops_password() {
        let view = AccountView::from(account());
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn view_omits_empty_data() {
        let mut account = account();
        account.data = String::new();
        let json = serde_json::to_value(AccountView::from(account)).unwrap();
        assert_eq!(json, serde_json::json!({"id": "e4a0f3a6", "username": "peter"}));
    }
}
