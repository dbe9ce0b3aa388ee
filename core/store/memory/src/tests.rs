use argon2::Params;
use serde_json::json;

use idp_context::Context;
use idp_errors::AccountNotFound;
use idp_errors::InvalidAccount;
use idp_errors::PasswordMismatch;
use idp_errors::UsernameConflict;
use idp_models::CreateAccountRequest;
use idp_models::UpdateDataRequest;
use idp_models::UpdatePasswordRequest;
use idp_models::UpdateUsernameRequest;
use idp_store::delete::DeleteAccount;
use idp_store::persist::CreateAccount;
use idp_store::persist::UpdateData;
use idp_store::persist::UpdatePassword;
use idp_store::persist::UpdateUsername;
use idp_store::query::AuthenticateAccount;
use idp_store::query::LookupAccount;
use idp_store::Store;
use idp_store::StoreFactory;
use idp_store::StoreFactoryArgs;

use crate::Conf;
use crate::MemoryFactory;
use crate::MemoryStore;

fn store() -> Store {
    let params = Params::new(8, 1, 1, None).expect("test argon2 params are valid");
    Store::from(MemoryStore::new(params))
}

fn create(id: &str, username: &str, password: &str) -> CreateAccount {
    let request = CreateAccountRequest {
        username: username.into(),
        password: password.into(),
        ..Default::default()
    };
    CreateAccount::new(id, request)
}

#[tokio::test]
async fn create_hashes_password() {
    let context = Context::fixture();
    let store = store();
    let account = store
        .persist(&context, create("a1", "alice", "pw1"))
        .await
        .unwrap();
    assert_eq!(account.id, "a1");
    assert_eq!(account.username, "alice");
    assert!(account.password.starts_with("$argon2id$"));
    assert_ne!(account.password, "pw1");
}

#[tokio::test]
async fn create_rejects_taken_username() {
    let context = Context::fixture();
    let store = store();
    store
        .persist(&context, create("a1", "alice", "pw1"))
        .await
        .unwrap();
    let error = store
        .persist(&context, create("a2", "alice", "pw2"))
        .await
        .unwrap_err();
    assert!(error.is::<UsernameConflict>());
}

#[tokio::test]
async fn create_rejects_empty_credentials() {
    let context = Context::fixture();
    let store = store();
    let error = store
        .persist(&context, create("a1", "", "pw1"))
        .await
        .unwrap_err();
    assert!(error.is::<InvalidAccount>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_claim_username_once() {
    let context = Context::fixture();
    let store = store();
    let attempts = (0..8).map(|index| {
        let store = store.clone();
        let context = context.clone();
        async move {
            let id = format!("a{}", index);
            store.persist(&context, create(&id, "alice", "pw")).await
        }
    });
    let results = futures::future::join_all(attempts).await;
    let created = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(created, 1);
    for result in results.into_iter().filter_map(Result::err) {
        assert!(result.is::<UsernameConflict>());
    }
}

#[tokio::test]
async fn authenticate_checks_password() {
    let context = Context::fixture();
    let store = store();
    store
        .persist(&context, create("a1", "alice", "pw1"))
        .await
        .unwrap();

    let account = store
        .query(&context, AuthenticateAccount::new("alice", "pw1"))
        .await
        .unwrap();
    assert_eq!(account.id, "a1");

    let error = store
        .query(&context, AuthenticateAccount::new("alice", "nope"))
        .await
        .unwrap_err();
    assert!(error.is::<PasswordMismatch>());

    let error = store
        .query(&context, AuthenticateAccount::new("bob", "pw1"))
        .await
        .unwrap_err();
    assert!(error.is::<AccountNotFound>());
}

#[tokio::test]
async fn authenticate_unknown_username_checks_a_hash() {
    let context = Context::fixture();
    let params = Params::new(8, 1, 1, None).expect("test argon2 params are valid");
    let backend = MemoryStore::new(params);
    let store = Store::from(backend.clone());
    assert!(!backend.decoy_checked());

    let error = store
        .query(&context, AuthenticateAccount::new("bob", "pw1"))
        .await
        .unwrap_err();
    assert!(error.is::<AccountNotFound>());
    assert!(backend.decoy_checked());
}

#[tokio::test]
async fn delete_frees_username() {
    let context = Context::fixture();
    let store = store();
    store
        .persist(&context, create("a1", "alice", "pw1"))
        .await
        .unwrap();
    store
        .delete(&context, DeleteAccount::from("a1"))
        .await
        .unwrap();

    let error = store
        .query(&context, LookupAccount::from("a1"))
        .await
        .unwrap_err();
    assert!(error.is::<AccountNotFound>());
    let error = store
        .delete(&context, DeleteAccount::from("a1"))
        .await
        .unwrap_err();
    assert!(error.is::<AccountNotFound>());

    store
        .persist(&context, create("a2", "alice", "pw2"))
        .await
        .unwrap();
}

#[tokio::test]
async fn update_data_replaces_content() {
    let context = Context::fixture();
    let store = store();
    store
        .persist(&context, create("a1", "alice", "pw1"))
        .await
        .unwrap();
    let update = UpdateData {
        id: "a1".into(),
        request: UpdateDataRequest {
            data: r#"{"theme":"dark"}"#.into(),
        },
    };
    let account = store.persist(&context, update).await.unwrap();
    assert_eq!(account.data, r#"{"theme":"dark"}"#);
}

#[tokio::test]
async fn update_password_requires_current_password() {
    let context = Context::fixture();
    let store = store();
    store
        .persist(&context, create("a1", "alice", "pw1"))
        .await
        .unwrap();

    let update = UpdatePassword {
        id: "a1".into(),
        request: UpdatePasswordRequest {
            current_password: "wrong".into(),
            new_password: "pw2".into(),
        },
    };
    let error = store.persist(&context, update).await.unwrap_err();
    assert!(error.is::<PasswordMismatch>());

    let update = UpdatePassword {
        id: "a1".into(),
        request: UpdatePasswordRequest {
            current_password: "pw1".into(),
            new_password: "pw2".into(),
        },
    };
    store.persist(&context, update).await.unwrap();
    store
        .query(&context, AuthenticateAccount::new("alice", "pw2"))
        .await
        .unwrap();
    let error = store
        .query(&context, AuthenticateAccount::new("alice", "pw1"))
        .await
        .unwrap_err();
    assert!(error.is::<PasswordMismatch>());
}

#[tokio::test]
async fn update_username_moves_index() {
    let context = Context::fixture();
    let store = store();
    store
        .persist(&context, create("a1", "alice", "pw1"))
        .await
        .unwrap();
    store
        .persist(&context, create("b1", "bob", "pw2"))
        .await
        .unwrap();

    let rename = |username: &str, password: &str| UpdateUsername {
        id: "a1".into(),
        request: UpdateUsernameRequest {
            password: password.into(),
            username: username.into(),
        },
    };
    let error = store
        .persist(&context, rename("bob", "pw1"))
        .await
        .unwrap_err();
    assert!(error.is::<UsernameConflict>());
    let error = store
        .persist(&context, rename("carol", "wrong"))
        .await
        .unwrap_err();
    assert!(error.is::<PasswordMismatch>());

    let account = store
        .persist(&context, rename("carol", "pw1"))
        .await
        .unwrap();
    assert_eq!(account.username, "carol");

    // Renaming to the current username is allowed.
    store
        .persist(&context, rename("carol", "pw1"))
        .await
        .unwrap();
    // The old username is free again.
    store
        .persist(&context, create("a2", "alice", "pw3"))
        .await
        .unwrap();
}

#[tokio::test]
async fn factory_creates_store() {
    let context = Context::fixture();
    let conf = json!({"argon2": {"memory_kib": 8, "iterations": 1, "parallelism": 1}});
    MemoryFactory.conf_check(&context, &conf).unwrap();
    let args = StoreFactoryArgs {
        conf: &conf,
        context: &context,
    };
    let store = MemoryFactory.store(args).await.unwrap();
    store
        .persist(&context, create("a1", "alice", "pw1"))
        .await
        .unwrap();
}

#[test]
fn factory_rejects_bad_params() {
    let context = Context::fixture();
    let conf = json!({"argon2": {"iterations": 0}});
    let error = MemoryFactory.conf_check(&context, &conf);
    assert!(error.is_err());
}

#[test]
fn conf_defaults() {
    let conf: Conf = serde_json::from_value(json!({})).unwrap();
    assert_eq!(conf, Conf::default());
    assert_eq!(conf.argon2.memory_kib, Params::DEFAULT_M_COST);
}
