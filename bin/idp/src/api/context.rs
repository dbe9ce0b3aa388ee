//! ActixWeb Middleware to attach authenticated [`Context`] objects to requests.
use std::future::Ready;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::forward_ready;
use actix_web::dev::Service;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::dev::Transform;
use actix_web::Error;
use actix_web::HttpMessage;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use futures_util::future::LocalBoxFuture;

use idp_accounts::ErrorKind;
use idp_accounts::OperationError;
use idp_auth::identity::Authenticator;
use idp_auth::identity::InvalidCredentials;
use idp_context::Context;
use idp_context::ContextBuilder;

/// Context attribute carrying the address of the client performing the request.
const REMOTE_ADDR_ATTRIBUTE: &str = "remote_addr";

/// Derive a per-request [`Context`] and attach it to requests before they are handled.
pub struct ContextService<S> {
    authenticator: Authenticator,
    config: ContextConfig,
    root: Context,
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for ContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, request: ServiceRequest) -> Self::Future {
        let context = self.root.derive();
        let context = context_derive_logging(context, &self.config);
        let context = match request.connection_info().realip_remote_addr() {
            Some(addr) => context.attribute(REMOTE_ADDR_ATTRIBUTE, addr),
            None => context,
        };

        // Delay invoking the service so we can authenticate the request asynchronously.
        let authenticator = self.authenticator.clone();
        let root = self.root.clone();
        let service = Arc::clone(&self.service);
        Box::pin(async move {
            let entity = authenticator.authenticate(&root, request.request()).await;
            let entity = match entity {
                Ok(entity) => entity,
                Err(error) => {
                    let response = authentication_failed(&root, &error);
                    let response = request.into_response(response).map_into_right_body();
                    return Ok(response);
                }
            };

            // Attach the derived context to the request.
            let context = context.authenticated(entity).build();
            request.extensions_mut().insert(context);

            // Proceed to the wrapped service and handle the request.
            let response = service.call(request).await?;
            Ok(response.map_into_left_body())
        })
    }
}

/// Wrap an [`App`](actix_web::App) with a middleware that derives per-request contexts.
#[derive(Clone)]
pub struct ContextMiddleware {
    authenticator: Authenticator,
    config: ContextConfig,
    root: Context,
}

impl ContextMiddleware {
    /// Initialise a [`ContextMiddleware`] with the root [`Context`] to derive from.
    pub fn new(root: Context, authenticator: Authenticator) -> Self {
        let config = ContextConfig::default();
        Self {
            authenticator,
            config,
            root,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ContextMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ContextService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let middleware = ContextService {
            authenticator: self.authenticator.clone(),
            config: self.config.clone(),
            root: self.root.clone(),
            service: Arc::new(service),
        };
        std::future::ready(Ok(middleware))
    }
}

/// Configuration of the per-request [`Context`] derivation process.
#[derive(Clone, Debug)]
pub struct ContextConfig {
    /// Enable adding the current trace ID to logs (if a trace ID is available).
    pub add_trace_id: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig { add_trace_id: true }
    }
}

/// Build the response for requests that could not be authenticated.
fn authentication_failed(context: &Context, error: &anyhow::Error) -> HttpResponse {
    let error = if error.is::<InvalidCredentials>() {
        OperationError::new(ErrorKind::Unauthenticated, error.to_string())
    } else {
        slog::error!(
            context.logger, "Unable to authenticate request";
            "error" => format!("{:?}", error),
        );
        OperationError::new(ErrorKind::Internal, "unable to authenticate request")
    };
    error.error_response()
}

/// Configure logging options for the derived context.
fn context_derive_logging(context: ContextBuilder, config: &ContextConfig) -> ContextBuilder {
    if config.add_trace_id {
        context.log_trace()
    } else {
        context
    }
}
