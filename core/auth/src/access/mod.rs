//! Module to deal with the Authorisation (what can be done) side of Auth.
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value as Json;

use idp_context::Context;

mod audit;

#[cfg(test)]
mod test;

pub use self::audit::Audit;
pub use self::audit::AuditDecision;

use crate::Action;
use crate::AuthRequest;
use crate::Entity;
use crate::Resource;

/// Operations implemented by Authorisation modes and services supported by the Identity Provider.
#[async_trait::async_trait]
pub trait Authorisation: Send + Sync {
    /// Determine if a request should be authorised.
    ///
    /// Authorisation implementations will use the given [`AuthRequest`]
    /// to check who is trying to do what on which resource.
    ///
    /// The return value indicates if authorisation was granted:
    ///
    /// - Return `Ok` if the request is authorised.
    /// - Return `Err` with a [`Forbidden`] error if the request was denied.
    /// - Return `Err` with any other error if the authorisation check failed
    ///   (this will still deny requests).
    ///
    /// NOTE: thanks to the use of the [`anyhow`] crate errors returned by this method
    /// can be "marked" using context methods.
    /// This pattern can be used to report an authorisation failure while also preserving
    /// the reason for the decision:
    ///
    /// ```ignore
    /// let reason = anyhow::anyhow!("only the account owner can change it");
    /// Err(reason.context(Forbidden::from(request)))
    /// ```
    async fn authorise(&self, context: &Context, request: &AuthRequest) -> Result<()>;
}

/// Initialisation logic for [`Authorisation`] implementations.
#[async_trait::async_trait]
pub trait AuthorisationFactory: Send + Sync {
    /// Validate the user provided configuration for the backend.
    fn conf_check(&self, context: &Context, conf: &Json) -> Result<()>;

    /// Register backend specific metrics.
    fn register_metrics(&self, registry: &prometheus::Registry) -> Result<()>;

    /// Initialise an [`Authoriser`] object.
    async fn authoriser<'a>(&self, args: AuthorisationFactoryArgs<'a>) -> Result<Authoriser>;
}

/// Arguments passed to the [`AuthorisationFactory`] initialisation method.
pub struct AuthorisationFactoryArgs<'a> {
    /// The configuration block for the backend to initialise.
    pub conf: &'a Json,

    /// Container for operation scoped values.
    pub context: &'a Context,
}

/// Verify permissions for a requesting entity to perform a specific action on a resource.
#[derive(Clone)]
pub struct Authoriser {
    /// Authorisation backend to check for permission.
    inner: Arc<dyn Authorisation>,
}

impl Authoriser {
    /// Verify the [`Entity`] in the [`Context`] is allowed to perform an action on a resource.
    ///
    /// The decision request is composed of:
    ///
    /// - The [`Context::entity`] performing the request.
    /// - The given [`Action`] and [`Resource`].
    /// - The [`Context::attributes`] of the request.
    ///
    /// If authorisation is denied the method returns a [`Forbidden`] error.
    /// Contexts that were never authenticated are always denied.
    ///
    /// After authorisation is verified this method also records an audit log
    /// for system operators to troubleshoot access problems or verify past access.
    ///
    /// ## System [`Entity`] bypass
    ///
    /// The `system` family of [`Entity`]es is used to represent actions initiated by
    /// the Identity Provider itself to perform duties.
    ///
    /// Any request initiated by the system is allowed without checking with the
    /// configured backend. An audit record is still logged to ensure a complete picture
    /// of what is happening.
    pub async fn authorise(
        &self,
        context: &Context,
        action: Action,
        resource: Resource,
    ) -> Result<()> {
        let entity = match &context.entity {
            Some(entity) => entity.clone(),
            None => {
                let error = Forbidden::unauthenticated(action, &resource);
                slog::warn!(
                    context.logger,
                    "Denied authorisation for unauthenticated request";
                    "audit" => true,
                    "action" => action.as_str(),
                    "resource" => resource.to_string(),
                );
                return Err(error.into());
            }
        };
        let request = AuthRequest {
            action,
            entity,
            resource,
            attributes: context.attributes.clone(),
        };

        // Check with the backend for all non-system entities.
        let result = if matches!(request.entity, Entity::System(_)) {
            Ok(())
        } else {
            self.inner.authorise(context, &request).await
        };

        // Audit the authorisation result and done.
        self.audit(context, &request, &result);
        result
    }

    /// Wrap an [`Authorisation`] interface for use by the system.
    pub fn wrap<T>(inner: T) -> Self
    where
        T: Authorisation + 'static,
    {
        let inner = Arc::new(inner);
        Authoriser { inner }
    }
}

impl Authoriser {
    /// Generate an authorisation audit record and log it.
    ///
    /// Errors during audit are ignored to preserve availability.
    ///
    /// NOTE:
    ///   Only auditing errors are ignored, authorisation errors will prevent access.
    fn audit(&self, context: &Context, request: &AuthRequest, result: &Result<()>) {
        let audit = Audit::record(request, result);
        let payload = match serde_json::to_string(&audit) {
            Ok(payload) => payload,
            Err(error) => {
                slog::error!(
                    context.logger,
                    "Failed to JSON serialise authorisation audit payload";
                    "audit" => true,
                    "error" => %error,
                );
                return;
            }
        };
        slog::info!(
            context.logger,
            "Authorisation decision";
            "audit" => true,
            "decision" => audit.decision.as_str(),
            "payload" => payload,
        );
    }
}

/// An entity is not allowed to perform an action on a resource.
#[derive(Debug, thiserror::Error)]
#[error("entity \"{entity}\" is not allowed to perform \"{action}\" on resource \"{resource}\"")]
pub struct Forbidden {
    action: String,
    entity: String,
    resource: String,
}

impl Forbidden {
    /// Deny an entity from performing an action onto a resource.
    pub fn deny<S1, S2, S3>(entity: S1, action: S2, resource: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            action: action.into(),
            entity: entity.into(),
            resource: resource.into(),
        }
    }

    /// Deny a request that was never authenticated.
    pub fn unauthenticated(action: Action, resource: &Resource) -> Self {
        Self::deny("unauthenticated", action.as_str(), resource.to_string())
    }
}

impl From<&AuthRequest> for Forbidden {
    fn from(value: &AuthRequest) -> Self {
        Self {
            action: value.action.as_str().to_string(),
            entity: value.entity.to_string(),
            resource: value.resource.to_string(),
        }
    }
}
