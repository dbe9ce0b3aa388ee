//! Insecure Authentication and Authorisation service to allow all access.
//!
//! This backend is intended for early development cycles or demo instances.
use anyhow::Result;
use serde_json::Value as Json;

use idp_auth::access::Authorisation;
use idp_auth::access::AuthorisationFactory;
use idp_auth::access::AuthorisationFactoryArgs;
use idp_auth::access::Authoriser;
use idp_auth::identity::Authentication;
use idp_auth::identity::AuthenticationFactory;
use idp_auth::identity::AuthenticationFactoryArgs;
use idp_auth::identity::Authenticator;
use idp_auth::identity::IdentityReader;
use idp_auth::AuthRequest;
use idp_auth::Entity;
use idp_context::Context;

/// Unconditionally authenticate all requested as [`Entity::Anonymous`].
pub struct Anonymous;

#[async_trait::async_trait(?Send)]
impl Authentication for Anonymous {
    async fn authenticate(&self, _: &Context, _: &dyn IdentityReader) -> Result<Entity> {
        Ok(Entity::Anonymous)
    }
}

#[async_trait::async_trait]
impl AuthenticationFactory for Anonymous {
    fn conf_check(&self, _: &Context, _: &Json) -> Result<()> {
        Ok(())
    }

    fn register_metrics(&self, _: &prometheus::Registry) -> Result<()> {
        Ok(())
    }

    async fn authenticator<'a>(&self, _: AuthenticationFactoryArgs<'a>) -> Result<Authenticator> {
        Ok(Authenticator::from(Anonymous))
    }
}

/// Authorise unrestricted access for all requests.
pub struct Unrestricted;

#[async_trait::async_trait]
impl Authorisation for Unrestricted {
    async fn authorise(&self, _: &Context, _: &AuthRequest) -> Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthorisationFactory for Unrestricted {
    fn conf_check(&self, _: &Context, _: &Json) -> Result<()> {
        Ok(())
    }

    fn register_metrics(&self, _: &prometheus::Registry) -> Result<()> {
        Ok(())
    }

    async fn authoriser<'a>(&self, _: AuthorisationFactoryArgs<'a>) -> Result<Authoriser> {
        Ok(Authoriser::wrap(Unrestricted))
    }
}
