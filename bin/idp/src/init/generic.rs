//! Process initialisation builder for aspects to initialise for all commands.
use anyhow::Result;

use idp_conf::Conf;
use idp_context::Context;
use idp_injector::Injector;

use super::actix::ActixServer;
use super::backends::Backends;
use super::logging::Logging;

/// Process builder to initialise all Identity Provider commands.
pub struct GenericInit {
    pub api: ActixServer,
    pub backends: Backends,
    pub conf: Conf,
    pub logging: Logging,
    pub metrics: prometheus::Registry,
}

impl GenericInit {
    /// Build a process from the loaded configuration.
    pub fn configure(conf: Conf) -> Result<Self> {
        let logging = super::logging::configure(&conf.logging);
        slog::info!(logging.logger, "Process logging initialised");
        let metrics = prometheus::Registry::new();
        let api = ActixServer::new(conf.http.clone(), metrics.clone());
        let init = Self {
            api,
            backends: Default::default(),
            conf,
            logging,
            metrics,
        };
        Ok(init)
    }

    /// Root context for the process.
    pub fn context(&self) -> Context {
        Context::root(self.logging.logger.clone()).build()
    }

    /// Register all supported backends for all process dependencies.
    ///
    /// Supported dependencies can be tuned at compile time using crate features.
    pub fn register_default_backends(&mut self) -> &mut Self {
        self.backends
            .register_authentication("anonymous", idp_auth_insecure::Anonymous)
            .register_authentication("basic", idp_accounts::BasicAuthenticationFactory)
            .register_authorisation("owner", idp_accounts::Owner)
            .register_authorisation("unrestricted", idp_auth_insecure::Unrestricted);

        #[cfg(feature = "idp-store-memory")]
        self.backends
            .register_store("memory", idp_store_memory::MemoryFactory);
        self
    }

    /// Register metrics for the process and all selected backends.
    pub fn register_metrics(&self) -> Result<&Self> {
        idp_accounts::register_metrics(&self.metrics)?;
        self.backends
            .authentication(&self.conf.auth.authentication.backend)?
            .register_metrics(&self.metrics)?;
        self.backends
            .authorisation(&self.conf.auth.authorisation.backend)?
            .register_metrics(&self.metrics)?;
        self.backends
            .store(&self.conf.store.backend)?
            .register_metrics(&self.metrics)?;
        Ok(self)
    }

    /// Configure and start the API server.
    pub fn run_server(
        &mut self,
        context: &Context,
        injector: Injector,
    ) -> Result<actix_web::dev::Server> {
        slog::debug!(context.logger, "Starting API server");
        let grace = self.conf.runtime.shutdown_grace_sec;
        let server = self.api.clone().run(injector, grace)?;
        slog::info!(
            context.logger, "API server listening for connection";
            "address" => &self.conf.http.bind,
        );
        Ok(server)
    }

    /// Validate the loaded configuration objects for the selected backends.
    pub fn validate_backends_conf(&self, context: &Context) -> Result<&Self> {
        let auth = &self.conf.auth;
        self.backends
            .authentication(&auth.authentication.backend)?
            .conf_check(context, &auth.authentication.options)?;
        self.backends
            .authorisation(&auth.authorisation.backend)?
            .conf_check(context, &auth.authorisation.options)?;
        self.backends
            .store(&self.conf.store.backend)?
            .conf_check(context, &self.conf.store.options)?;
        Ok(self)
    }
}
