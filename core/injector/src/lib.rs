//! Container for the process dependencies to inject into other components.
use idp_accounts::Accounts;
use idp_auth::access::Authoriser;
use idp_auth::identity::Authenticator;
use idp_context::Context;
use idp_store::Store;

/// Container for all process dependencies to be injected in other components.
///
/// The container is built once during process initialisation and handed
/// explicitly to the components that need it.
#[derive(Clone)]
pub struct Injector {
    /// Authorisation gated account operations.
    pub accounts: Accounts,

    /// Determine the entity performing requests.
    pub authenticator: Authenticator,

    /// Root context for the process.
    pub context: Context,
}

impl Injector {
    /// Assemble the container from initialised dependencies.
    ///
    /// The [`Store`] is handed to the [`Accounts`] operations, the only component using it.
    pub fn new(
        context: Context,
        authenticator: Authenticator,
        authoriser: Authoriser,
        store: Store,
    ) -> Injector {
        slog::trace!(context.logger, "Initialising Injector for the process");
        let accounts = Accounts::new(authoriser, store.clone());
        Injector {
            accounts,
            authenticator,
            context,
        }
    }
}

#[cfg(any(test, feature = "test-fixture"))]
impl Injector {
    /// [`Injector`] instance to be used with unit tests.
    ///
    /// Requests are authenticated as anonymous and authorised unconditionally.
    pub fn fixture() -> Injector {
        Self::fixture_with(Store::fixture())
    }

    /// [`Injector`] instance for unit tests operating on the given [`Store`].
    pub fn fixture_with(store: Store) -> Injector {
        Injector::new(
            Context::fixture(),
            Authenticator::from(idp_auth_insecure::Anonymous),
            Authoriser::wrap(idp_auth_insecure::Unrestricted),
            store,
        )
    }
}
