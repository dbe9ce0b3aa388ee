//! Information attached to authorisation audit records.
use anyhow::Result;
use opentelemetry_api::trace::TraceContextExt;
use opentelemetry_api::trace::TraceId;
use opentelemetry_api::Context as OTelContext;
use serde::Deserialize;
use serde::Serialize;

use super::Forbidden;
use crate::Action;
use crate::AuthRequest;
use crate::Entity;
use crate::Resource;

/// Payload for Audit records.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    /// Action being authorised.
    pub action: Action,

    /// Result of the authorisation process.
    pub decision: AuditDecision,

    /// Entity the action is performed by.
    pub entity: Entity,

    /// Resource the action is performed on.
    pub resource: Resource,

    /// Tracing ID to link this audit record to a larger context, if tracing is available.
    pub trace_id: Option<String>,
}

impl Audit {
    /// Compose an authorisation audit record from authorisation information.
    pub fn record(request: &AuthRequest, result: &Result<()>) -> Audit {
        let trace_id = OTelContext::current().span().span_context().trace_id();
        let trace_id = if trace_id == TraceId::INVALID {
            None
        } else {
            Some(trace_id.to_string())
        };
        Audit {
            action: request.action,
            decision: AuditDecision::from(result),
            entity: request.entity.clone(),
            resource: request.resource.clone(),
            trace_id,
        }
    }
}

/// Decision of an authorisation request reported in an [`Audit`] record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AuditDecision {
    /// The request was authorised.
    Allow,

    /// The request was denied.
    Deny,

    /// There was an error performing the authorisation check (so the request was denied).
    Error,
}

impl AuditDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditDecision::Allow => "Allow",
            AuditDecision::Deny => "Deny",
            AuditDecision::Error => "Error",
        }
    }
}

impl From<&Result<()>> for AuditDecision {
    fn from(value: &Result<()>) -> Self {
        match value {
            Ok(()) => AuditDecision::Allow,
            Err(error) if error.is::<Forbidden>() => AuditDecision::Deny,
            Err(_) => AuditDecision::Error,
        }
    }
}
