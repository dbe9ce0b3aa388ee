//! Authorise accounts to act on their own identity only.
use anyhow::Result;
use serde_json::Value as Json;

use idp_auth::access::Authorisation;
use idp_auth::access::AuthorisationFactory;
use idp_auth::access::AuthorisationFactoryArgs;
use idp_auth::access::Authoriser;
use idp_auth::access::Forbidden;
use idp_auth::AuthRequest;
use idp_auth::Entity;
use idp_auth::IDENTITY_RESOURCE_KIND;
use idp_context::Context;

/// Allow an [`Entity::Account`] to perform any action on its own identity resource.
///
/// All other requests are denied.
pub struct Owner;

#[async_trait::async_trait]
impl Authorisation for Owner {
    async fn authorise(&self, _: &Context, request: &AuthRequest) -> Result<()> {
        let owner = match &request.entity {
            Entity::Account(account) => account.id.as_str(),
            _ => anyhow::bail!(Forbidden::from(request)),
        };
        if request.resource.kind != IDENTITY_RESOURCE_KIND || request.resource.resource_id != owner {
            anyhow::bail!(Forbidden::from(request));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthorisationFactory for Owner {
    fn conf_check(&self, _: &Context, _: &Json) -> Result<()> {
        Ok(())
    }

    fn register_metrics(&self, _: &prometheus::Registry) -> Result<()> {
        Ok(())
    }

    async fn authoriser<'a>(&self, _: AuthorisationFactoryArgs<'a>) -> Result<Authoriser> {
        Ok(Authoriser::wrap(Owner))
    }
}

#[cfg(test)]
mod tests {
    use idp_auth::access::Authoriser;
    use idp_auth::access::Forbidden;
    use idp_auth::permission;
    use idp_auth::Action;
    use idp_auth::Entity;
    use idp_auth::EntityAccount;
    use idp_auth::Resource;
    use idp_context::Context;

    use super::Owner;

    fn context(entity: Entity) -> Context {
        Context::fixture().derive().authenticated(entity).build()
    }

    fn account(id: &str) -> Entity {
        Entity::Account(EntityAccount {
            id: id.into(),
            username: "peter".into(),
        })
    }

    #[tokio::test]
    async fn allow_own_identity() {
        let authoriser = Authoriser::wrap(Owner);
        for action in Action::ALL {
            authoriser
                .authorise(&context(account("a1")), action, permission("a1"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn deny_other_identity() {
        let authoriser = Authoriser::wrap(Owner);
        let error = authoriser
            .authorise(&context(account("a1")), Action::Get, permission("b2"))
            .await
            .unwrap_err();
        assert!(error.is::<Forbidden>());
    }

    #[tokio::test]
    async fn deny_anonymous() {
        let authoriser = Authoriser::wrap(Owner);
        let error = authoriser
            .authorise(&context(Entity::Anonymous), Action::Get, permission("a1"))
            .await
            .unwrap_err();
        assert!(error.is::<Forbidden>());
    }

    #[tokio::test]
    async fn deny_other_resource_kinds() {
        let authoriser = Authoriser::wrap(Owner);
        let resource = Resource {
            kind: "rn:idp:groups".into(),
            resource_id: "a1".into(),
        };
        let error = authoriser
            .authorise(&context(account("a1")), Action::Get, resource)
            .await
            .unwrap_err();
        assert!(error.is::<Forbidden>());
    }
}
