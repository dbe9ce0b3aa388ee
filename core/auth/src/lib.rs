//! Authentication and Authorisation data and interfaces for the Identity Provider.
//!
//! First of all:
//!
//! - Authentication: answers "who is asking for access?" (it is about identity).
//! - Authorisation: answers "can they do what they are asking to do?" (it is about access).
//!
//! For more details on how [`Entity`]s, [`Action`]s and [`Resource`]s are modelled refer to
//! the [`idp_models::auth`] module.
//!
//! ## Identity resources
//!
//! Every identity is protected by its own [`Resource`], derived from the identity ID
//! with [`permission`].
//! All operations on an identity must authorise against this resource so that
//! policies can be written once for all operations.
pub mod access;
pub mod identity;

// Re-export model definitions for convenience.
pub use idp_models::auth::Action;
pub use idp_models::auth::AuthRequest;
pub use idp_models::auth::Entity;
pub use idp_models::auth::EntityAccount;
pub use idp_models::auth::EntitySystem;
pub use idp_models::auth::Resource;

/// Resource kind (namespace) of identity resources.
pub const IDENTITY_RESOURCE_KIND: &str = "rn:idp:identities";

/// Derive the [`Resource`] protecting the identity with the given ID.
///
/// The canonical form of the resource is `rn:idp:identities:<id>`.
pub fn permission(id: &str) -> Resource {
    Resource {
        kind: IDENTITY_RESOURCE_KIND.to_string(),
        resource_id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::permission;

    #[test]
    fn permission_is_canonical() {
        let resource = permission("e4a0f3a6-7d9c-4c53-a7e6-5b1b7e1c2f10");
        assert_eq!(
            resource.to_string(),
            "rn:idp:identities:e4a0f3a6-7d9c-4c53-a7e6-5b1b7e1c2f10"
        );
    }

    #[test]
    fn permission_is_deterministic() {
        assert_eq!(permission("abc"), permission("abc"));
        assert_eq!(permission("abc").to_string(), permission("abc").to_string());
    }

    #[test]
    fn permission_does_not_collide() {
        let ids = ["a", "b", "ab", "a:b", "a:", ":b", "A", " a"];
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            assert!(seen.insert(permission(id).to_string()), "collision for {}", id);
        }
    }
}
