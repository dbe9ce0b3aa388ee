use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;

use idp_context::Context;

use super::Audit;
use super::AuditDecision;
use super::Authorisation;
use super::Authoriser;
use super::Forbidden;
use crate::Action;
use crate::AuthRequest;
use crate::Entity;
use crate::EntityAccount;
use crate::EntitySystem;

/// Test Authorisation backend to allow all requests.
struct AllowAll;

#[async_trait::async_trait]
impl Authorisation for AllowAll {
    async fn authorise(&self, _: &Context, _: &AuthRequest) -> Result<()> {
        Ok(())
    }
}

/// Test Authorisation backend to deny all requests.
struct DenyAll;

#[async_trait::async_trait]
impl Authorisation for DenyAll {
    async fn authorise(&self, _: &Context, request: &AuthRequest) -> Result<()> {
        let forbid = Forbidden::from(request);
        anyhow::bail!(forbid)
    }
}

/// Test Authorisation backend that fails to reach a decision.
struct Broken;

#[async_trait::async_trait]
impl Authorisation for Broken {
    async fn authorise(&self, _: &Context, _: &AuthRequest) -> Result<()> {
        anyhow::bail!("policy engine unreachable")
    }
}

/// Test Authorisation backend recording requests it receives.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<AuthRequest>>>);

#[async_trait::async_trait]
impl Authorisation for Recorder {
    async fn authorise(&self, _: &Context, request: &AuthRequest) -> Result<()> {
        self.0.lock().unwrap().push(request.clone());
        Ok(())
    }
}

fn account() -> Entity {
    Entity::Account(EntityAccount {
        id: "abc".into(),
        username: "peter".into(),
    })
}

fn context(entity: Entity) -> Context {
    Context::fixture().derive().authenticated(entity).build()
}

#[tokio::test]
async fn bypass_backend_for_system_entities() {
    let entity = Entity::System(EntitySystem {
        component: "test".into(),
    });
    let auth = Authoriser::wrap(DenyAll);
    auth.authorise(&context(entity), Action::Get, crate::permission("abc"))
        .await
        .expect("request should be authorised");
}

#[tokio::test]
async fn request_allowed() {
    let auth = Authoriser::wrap(AllowAll);
    auth.authorise(&context(account()), Action::Delete, crate::permission("abc"))
        .await
        .expect("request to be authorised");
}

#[tokio::test]
async fn request_denied() {
    let auth = Authoriser::wrap(DenyAll);
    let error = auth
        .authorise(&context(account()), Action::Get, crate::permission("abc"))
        .await
        .unwrap_err();
    assert!(error.is::<Forbidden>());
    assert_eq!(
        error.to_string(),
        r#"entity "account:abc" is not allowed to perform "get" on resource "rn:idp:identities:abc""#,
    );
}

#[tokio::test]
async fn request_denied_on_backend_error() {
    let auth = Authoriser::wrap(Broken);
    let result = auth
        .authorise(&context(account()), Action::Get, crate::permission("abc"))
        .await;
    assert!(result.is_err());
    assert_eq!(AuditDecision::from(&result), AuditDecision::Error);
}

#[tokio::test]
async fn request_denied_without_entity() {
    let recorder = Recorder::default();
    let auth = Authoriser::wrap(recorder.clone());
    let error = auth
        .authorise(&Context::fixture(), Action::Get, crate::permission("abc"))
        .await
        .unwrap_err();
    assert!(error.is::<Forbidden>());
    assert!(recorder.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn request_carries_context_attributes() {
    let recorder = Recorder::default();
    let auth = Authoriser::wrap(recorder.clone());
    let context = context(account())
        .derive()
        .attribute("owner", "abc")
        .build();
    auth.authorise(&context, Action::PutData, crate::permission("abc"))
        .await
        .unwrap();

    let requests = recorder.0.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.action, Action::PutData);
    assert_eq!(request.entity, account());
    assert_eq!(request.resource.to_string(), "rn:idp:identities:abc");
    assert_eq!(request.attributes["owner"], "abc");
}

#[test]
fn audit_record_payload() {
    let request = AuthRequest {
        action: Action::PutUsername,
        entity: Entity::Anonymous,
        resource: crate::permission("abc"),
        attributes: Default::default(),
    };
    let forbid = Forbidden::from(&request);
    let result: Result<()> = Err(anyhow::anyhow!("anonymous access").context(forbid));
    let audit = Audit::record(&request, &result);
    assert_eq!(
        serde_json::to_value(audit).unwrap(),
        serde_json::json!({
            "action": "put:username",
            "decision": "Deny",
            "entity": {"kind": "anonymous"},
            "resource": {
                "kind": "rn:idp:identities",
                "resource_id": "abc",
            },
            "trace_id": null,
        })
    );
}
