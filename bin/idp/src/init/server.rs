//! Identity Provider Server initialisation as a builder.
use anyhow::Result;

use idp_auth::access::AuthorisationFactoryArgs;
use idp_auth::identity::AuthenticationFactoryArgs;
use idp_conf::Conf;
use idp_context::Context;
use idp_injector::Injector;
use idp_store::StoreFactoryArgs;

use super::backends::Backends;
use super::generic::GenericInit;

/// Process builder to initialise and run an Identity Provider instance.
pub struct Server {
    /// Process initialisation logic common to all idp commands.
    generic: GenericInit,
}

impl Server {
    /// Build a server from the loaded configuration.
    pub fn configure(conf: Conf) -> Result<Self> {
        let generic = GenericInit::configure(conf)?;
        Ok(Self { generic })
    }

    /// Register all supported backends for all process dependencies.
    ///
    /// Supported dependencies can be tuned at compile time using crate features.
    pub fn register_default_backends(mut self) -> Self {
        self.generic.register_default_backends();
        self
    }

    /// Finalise process initialisation and run the Identity Provider server.
    pub async fn run(mut self) -> Result<()> {
        // Prepare for late process initialisation.
        let context = self.generic.context();
        self.generic
            .validate_backends_conf(&context)?
            .register_metrics()?;

        // Initialise dependencies and start serving requests.
        let injector = injector(&context, &self.generic.conf, &self.generic.backends).await?;
        let server = self.generic.run_server(&context, injector)?;
        slog::info!(
            context.logger,
            "Identity Provider process initialisation complete"
        );

        // Run until user-requested exit or process error.
        server.await?;
        slog::info!(context.logger, "Identity Provider process stopped");
        Ok(())
    }

    /// Add an HTTP server configuration closure to be applied when the server is started.
    pub fn with_http_config<F>(mut self, config: F) -> Self
    where
        F: Fn(&mut actix_web::web::ServiceConfig) + Send + Sync + 'static,
    {
        self.generic.api.with_config(config);
        self
    }
}

/// Initialise all backends and collected them into an [`Injector`] object.
pub async fn injector(context: &Context, conf: &Conf, backends: &Backends) -> Result<Injector> {
    let store = backends
        .store(&conf.store.backend)?
        .store(StoreFactoryArgs {
            conf: &conf.store.options,
            context,
        })
        .await?;
    let authenticator = backends
        .authentication(&conf.auth.authentication.backend)?
        .authenticator(AuthenticationFactoryArgs {
            conf: &conf.auth.authentication.options,
            context,
            store: &store,
        })
        .await?;
    let authoriser = backends
        .authorisation(&conf.auth.authorisation.backend)?
        .authoriser(AuthorisationFactoryArgs {
            conf: &conf.auth.authorisation.options,
            context,
        })
        .await?;

    let injector = Injector::new(
        context.clone(),
        authenticator,
        authoriser,
        store,
    );
    Ok(injector)
}
