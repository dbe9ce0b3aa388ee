//! Generic ActixWeb Server initialisation logic.
use std::sync::Arc;

use actix_web::web::Data;
use actix_web::web::ServiceConfig;
use actix_web::App;
use actix_web::HttpServer;
use anyhow::Result;

use idp_conf::HttpConf;
use idp_injector::Injector;

use crate::api::context::ContextMiddleware;

/// Closure to configure the services of an [`App`].
type AppConfig = Arc<dyn Fn(&mut ServiceConfig) + Send + Sync>;

/// Builder pattern to configure and start an ActixWeb Server.
#[derive(Clone)]
pub struct ActixServer {
    app: Vec<AppConfig>,
    conf: HttpConf,
    metrics: prometheus::Registry,
}

impl ActixServer {
    /// Create an ActixWeb Server configuration builder.
    pub fn new(conf: HttpConf, metrics: prometheus::Registry) -> Self {
        ActixServer {
            app: Vec::new(),
            conf,
            metrics,
        }
    }

    /// Convert the builder into an [`HttpServer`] and run it.
    ///
    /// The server stops accepting connections on SIGINT/SIGTERM and waits up to
    /// `shutdown_grace_sec` for in-flight requests to complete.
    pub fn run(self, injector: Injector, shutdown_grace_sec: u64) -> Result<actix_web::dev::Server> {
        let context_middleware =
            ContextMiddleware::new(injector.context.clone(), injector.authenticator.clone());
        let configs = self.app;
        let injector = Data::new(injector);
        let metrics = Data::new(self.metrics);

        let server = HttpServer::new(move || {
            let mut app = App::new()
                .app_data(injector.clone())
                .app_data(metrics.clone());
            for config in &configs {
                app = app.configure(|service| config(service));
            }
            app.wrap(context_middleware.clone())
        })
        .shutdown_timeout(shutdown_grace_sec);
        let server = match self.conf.workers {
            Some(workers) => server.workers(workers),
            None => server,
        };
        let server = server.bind(&self.conf.bind)?;
        Ok(server.run())
    }

    /// Add a server configuration closure to be applied when the server is started.
    pub fn with_config<F>(&mut self, config: F) -> &mut Self
    where
        F: Fn(&mut ServiceConfig) + Send + Sync + 'static,
    {
        self.app.push(Arc::new(config));
        self
    }
}
