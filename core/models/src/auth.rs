//! Authentication and Authorisation data models.
//!
//! Authorisation decisions are requested for an [`Entity`] performing an [`Action`]
//! on a [`Resource`], together with additional request attributes.
use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Closed set of actions that can be authorised on identity resources.
///
/// Tags are matched exactly against policies so new actions must only be added here.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "create")]
    Create,

    #[serde(rename = "get")]
    Get,

    #[serde(rename = "delete")]
    Delete,

    #[serde(rename = "put:username")]
    PutUsername,

    #[serde(rename = "put:password")]
    PutPassword,

    #[serde(rename = "put:data")]
    PutData,
}

impl Action {
    /// All known actions.
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Get,
        Action::Delete,
        Action::PutUsername,
        Action::PutPassword,
        Action::PutData,
    ];

    /// The exact tag policies match this action against.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Get => "get",
            Action::Delete => "delete",
            Action::PutUsername => "put:username",
            Action::PutPassword => "put:password",
            Action::PutData => "put:data",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information about who is performing a request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    /// The request carries no identity information.
    Anonymous,

    /// The request was made on behalf of an authenticated account.
    Account(EntityAccount),

    /// The request was initiated by the Identity Provider itself.
    System(EntitySystem),
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Anonymous => write!(f, "anonymous"),
            Entity::Account(account) => write!(f, "account:{}", account.id),
            Entity::System(system) => write!(f, "system:{}", system.component),
        }
    }
}

/// An authenticated account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EntityAccount {
    /// ID of the account the request was authenticated as.
    pub id: String,

    /// Username the account authenticated with.
    pub username: String,
}

/// An internal component of the Identity Provider.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EntitySystem {
    /// Name of the component performing the request.
    pub component: String,
}

/// The target of an authorised action.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Namespace of the resource identifier.
    pub kind: String,

    /// ID of the specific resource within its kind.
    pub resource_id: String,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.resource_id)
    }
}

/// Authorisation decision request: can `entity` perform `action` on `resource`?
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Action to authorise.
    pub action: Action,

    /// Entity performing the action.
    pub entity: Entity,

    /// Resource the action is performed on.
    pub resource: Resource,

    /// Additional request attributes policies may consider.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::Action;
    use super::Entity;
    use super::EntityAccount;

    #[test]
    fn action_tags_match_serialisation() {
        for action in Action::ALL {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, serde_json::json!(action.as_str()));
        }
    }

    #[test]
    fn entity_serialises_with_kind() {
        let entity = Entity::Account(EntityAccount {
            id: "abc".into(),
            username: "peter".into(),
        });
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "account", "id": "abc", "username": "peter"})
        );
        assert_eq!(entity.to_string(), "account:abc");
    }
}
