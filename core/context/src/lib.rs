//! Request scoped values for Identity Provider operations.
//!
//! A [`Context`] bundles what an operation needs to know about who it runs for:
//!
//! - The [`Entity`] the request was authenticated as, if any.
//! - Free form attributes forwarded to authorisation checks (remote address, owner, ...).
//! - A [`Logger`] decorated with request details such as the trace ID.
//!
//! The process starts from a single root context and every HTTP request derives its own.
//! Operations derive further contexts when they need to attach more details,
//! parents are never modified.
use std::collections::BTreeMap;
use std::future::Ready;

use actix_web::dev::Payload;
use actix_web::Error;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use opentelemetry_api::trace::TraceContextExt;
use opentelemetry_api::trace::TraceId;
use opentelemetry_api::Context as OtelContext;
use slog::Logger;
use slog::OwnedKV;
use slog::SendSyncRefUnwindSafeKV;

use idp_models::auth::Entity;

/// Immutable bag of request scoped values, see the [crate level docs](crate).
#[derive(Clone, Debug)]
pub struct Context {
    /// Additional attributes of the request, passed along to authorisation checks.
    pub attributes: BTreeMap<String, String>,

    /// Entity the request was authenticated as, `None` until authentication runs.
    pub entity: Option<Entity>,

    /// Logger with contextual attributes attached to it.
    pub logger: Logger,
}

impl Context {
    /// Derive a new [`Context`] by making changes to the current one.
    pub fn derive(&self) -> ContextBuilder {
        ContextBuilder {
            attributes: self.attributes.clone(),
            entity: self.entity.clone(),
            logger: self.logger.clone(),
        }
    }

    /// Derive a new [`Context`] by making changes to the current one using the provided callback.
    pub fn derive_with<F>(&self, callback: F) -> Context
    where
        F: FnOnce(ContextBuilder) -> ContextBuilder,
    {
        let builder = callback(self.derive());
        builder.build()
    }

    /// Initialise a new root context with no values attached.
    pub fn root(logger: Logger) -> ContextBuilder {
        ContextBuilder {
            attributes: BTreeMap::new(),
            entity: None,
            logger,
        }
    }
}

impl FromRequest for Context {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(request: &HttpRequest, _: &mut Payload) -> Self::Future {
        let context = request
            .extensions()
            .get::<Context>()
            .cloned()
            .ok_or_else(|| actix_web::error::ErrorInternalServerError("request has no context"));
        std::future::ready(context)
    }
}

/// A builder for root and derived contexts.
pub struct ContextBuilder {
    attributes: BTreeMap<String, String>,
    entity: Option<Entity>,
    logger: Logger,
}

impl ContextBuilder {
    /// Attach an attribute describing the request to the context.
    pub fn attribute<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Mark the context to be created as authenticated as the given [`Entity`].
    ///
    /// The entity is also attached to the context logger.
    pub fn authenticated(mut self, entity: Entity) -> Self {
        self.logger = self.logger.new(slog::o!("entity" => entity.to_string()));
        self.entity = Some(entity);
        self
    }

    /// Finalise the build process and return a new [`Context`].
    pub fn build(self) -> Context {
        Context {
            attributes: self.attributes,
            entity: self.entity,
            logger: self.logger,
        }
    }

    /// Decorate the [`Context`]'s logger with the trace ID of the current OpenTelemetry span.
    pub fn log_trace(self) -> Self {
        let context = OtelContext::current();
        let span = context.span();
        let trace_id = span.span_context().trace_id();
        if trace_id == TraceId::INVALID {
            self
        } else {
            let trace_id = trace_id.to_string();
            self.log_values(slog::o!("trace_id" => trace_id))
        }
    }

    /// Update the [`Context`] logger to attach new log key/pair values.
    pub fn log_values<T>(mut self, entries: OwnedKV<T>) -> Self
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        self.logger = self.logger.new(entries);
        self
    }
}

#[cfg(any(test, feature = "test-fixture"))]
impl Context {
    /// Create an empty context useful for test.
    pub fn fixture() -> Context {
        let logger = Logger::root(slog::Discard, slog::o!());
        Context {
            attributes: BTreeMap::new(),
            entity: None,
            logger,
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use actix_web::FromRequest;
    use actix_web::HttpMessage;

    use idp_models::auth::Entity;
    use idp_models::auth::EntityAccount;

    use super::Context;

    #[test]
    fn derive_attributes() {
        let root = Context::fixture();
        let parent = root.derive().attribute("remote_addr", "127.0.0.1").build();
        let context = parent.derive().attribute("owner", "abc").build();
        assert_eq!(context.attributes.len(), 2);
        assert_eq!(context.attributes["remote_addr"], "127.0.0.1");
        assert!(parent.attributes.get("owner").is_none());
    }

    #[test]
    fn derive_authenticated() {
        let root = Context::fixture();
        let entity = Entity::Account(EntityAccount {
            id: "abc".into(),
            username: "peter".into(),
        });
        let context = root.derive().authenticated(entity.clone()).build();
        assert_eq!(context.entity, Some(entity));
        assert_eq!(format!("{:?}", context.logger.list()), "(entity)");
    }

    #[test]
    fn derive_log_attributes() {
        let root = Context::fixture();
        let parent = root
            .derive()
            .log_values(slog::o!("root" => "value", "test" => "root"))
            .build();
        let context = parent
            .derive()
            .log_values(slog::o!("test" => "override"))
            .build();
        assert_eq!(format!("{:?}", context.logger.list()), "(test, test, root)");
    }

    #[test]
    fn derive_noop() {
        let parent = Context::fixture();
        let context = parent.derive_with(|builder| builder);
        assert_eq!(
            format!("{:?}", parent.logger.list()),
            format!("{:?}", context.logger.list()),
        );
        assert_eq!(context.entity, None);
    }

    #[actix_web::test]
    async fn extract_context() {
        let context = Context::fixture();
        let request = TestRequest::get().to_http_request();
        request.extensions_mut().insert(context);
        Context::extract(&request).await.unwrap();
    }

    #[actix_web::test]
    async fn extract_missing_context_fails() {
        let request = TestRequest::get().to_http_request();
        assert!(Context::extract(&request).await.is_err());
    }
}
