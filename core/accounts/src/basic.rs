//! Authenticate requests with HTTP Basic credentials checked against the Identity Store.
use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value as Json;

use idp_auth::identity::Authentication;
use idp_auth::identity::AuthenticationFactory;
use idp_auth::identity::AuthenticationFactoryArgs;
use idp_auth::identity::Authenticator;
use idp_auth::identity::IdentityReader;
use idp_auth::identity::InvalidCredentials;
use idp_auth::Entity;
use idp_auth::EntityAccount;
use idp_context::Context;
use idp_errors::AccountNotFound;
use idp_errors::PasswordMismatch;
use idp_store::query::AuthenticateAccount;
use idp_store::Store;

/// Metadata entry carrying the credentials.
const AUTHORIZATION: &str = "authorization";

/// Authenticate accounts with `Authorization: Basic` credentials.
///
/// Requests without credentials are authenticated as [`Entity::Anonymous`].
pub struct BasicAuthentication {
    store: Store,
}

impl BasicAuthentication {
    pub fn new(store: Store) -> Self {
        BasicAuthentication { store }
    }
}

#[async_trait::async_trait(?Send)]
impl Authentication for BasicAuthentication {
    async fn authenticate(
        &self,
        context: &Context,
        transport: &dyn IdentityReader,
    ) -> Result<Entity> {
        let header = match transport.metadata(AUTHORIZATION)? {
            None => return Ok(Entity::Anonymous),
            Some(header) => header,
        };
        let (username, password) = decode_credentials(header)?;

        let lookup = AuthenticateAccount::new(username, password);
        match self.store.query(context, lookup).await {
            Ok(account) => Ok(Entity::Account(EntityAccount {
                id: account.id,
                username: account.username,
            })),
            Err(error) if error.is::<AccountNotFound>() || error.is::<PasswordMismatch>() => {
                Err(InvalidCredentials.into())
            }
            Err(error) => Err(error),
        }
    }
}

/// Extract username and password from a Basic `Authorization` header value.
fn decode_credentials(header: &str) -> Result<(String, String)> {
    let (scheme, encoded) = header.split_once(' ').ok_or(InvalidCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        anyhow::bail!(InvalidCredentials);
    }
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| InvalidCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| InvalidCredentials)?;
    let (username, password) = decoded.split_once(':').ok_or(InvalidCredentials)?;
    Ok((username.to_string(), password.to_string()))
}

/// Initialise [`BasicAuthentication`] backends.
pub struct BasicAuthenticationFactory;

#[async_trait::async_trait]
impl AuthenticationFactory for BasicAuthenticationFactory {
    fn conf_check(&self, _: &Context, _: &Json) -> Result<()> {
        Ok(())
    }

    fn register_metrics(&self, _: &prometheus::Registry) -> Result<()> {
        Ok(())
    }

    async fn authenticator<'a>(&self, args: AuthenticationFactoryArgs<'a>) -> Result<Authenticator> {
        let backend = BasicAuthentication::new(args.store.clone());
        Ok(Authenticator::from(backend))
    }
}
