//! Inefficient in-memory implementation of [`Store`](super::Store) for unit tests.
//!
//! Passwords are stored and compared in plain text.
use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use anyhow::Result;

use idp_context::Context;
use idp_errors::AccountNotFound;
use idp_errors::InvalidAccount;
use idp_errors::PasswordMismatch;
use idp_errors::UsernameConflict;
use idp_models::Account;

use super::DeleteOps;
use super::DeleteResponses;
use super::PersistOps;
use super::PersistResponses;
use super::QueryOps;
use super::QueryResponses;
use super::StoreBackend;

/// In-memory implementation of a mock [`Store`](super::Store) for unit tests.
#[derive(Clone)]
pub struct StoreFixture {
    /// Number of operations invoked on the store.
    calls: Arc<AtomicUsize>,

    /// Shared in-memory state to mock the DB with.
    inner: Arc<Mutex<StoreFixtureState>>,
}

impl StoreFixture {
    /// Number of operations the store was asked to perform so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Insert an account directly into the store, bypassing all checks.
    pub fn insert(&self, account: Account) {
        self.access().accounts.insert(account.id.clone(), account);
    }

    /// Inspect an account directly from the store, without counting as an operation.
    pub fn peek(&self, id: &str) -> Option<Account> {
        self.access().accounts.get(id).cloned()
    }

    /// Lock and access the shared inner store.
    fn access(&self) -> MutexGuard<StoreFixtureState> {
        self.inner
            .lock()
            .expect("StoreFixture::inner state lock poisoned")
    }
}

impl Default for StoreFixture {
    fn default() -> Self {
        let inner = StoreFixtureState::default();
        let inner = Mutex::new(inner);
        let inner = Arc::new(inner);
        StoreFixture {
            calls: Default::default(),
            inner,
        }
    }
}

#[async_trait::async_trait]
impl StoreBackend for StoreFixture {
    async fn delete(&self, _: &Context, op: DeleteOps) -> Result<DeleteResponses> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut store = self.access();
        match op {
            DeleteOps::Account(account) => {
                store
                    .accounts
                    .remove(&account.id)
                    .ok_or_else(|| AccountNotFound::new(&account.id))?;
            }
        };
        Ok(DeleteResponses::Success)
    }

    async fn query(&self, _: &Context, op: QueryOps) -> Result<QueryResponses> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let store = self.access();
        let account = match op {
            QueryOps::Account(lookup) => store.get(&lookup.id)?.clone(),
            QueryOps::Authenticate(auth) => {
                let account = store
                    .accounts
                    .values()
                    .find(|account| account.username == auth.username)
                    .ok_or_else(|| AccountNotFound::new(&auth.username))?;
                if account.password != auth.password {
                    anyhow::bail!(PasswordMismatch);
                }
                account.clone()
            }
        };
        Ok(QueryResponses::Account(account))
    }

    async fn persist(&self, _: &Context, op: PersistOps) -> Result<PersistResponses> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut store = self.access();
        let account = match op {
            PersistOps::CreateAccount(create) => {
                if create.username.is_empty() || create.password.is_empty() {
                    anyhow::bail!(InvalidAccount::new("username and password are required"));
                }
                if store.accounts.contains_key(&create.id) {
                    anyhow::bail!(InvalidAccount::new("account ID already in use"));
                }
                store.check_username(&create.id, &create.username)?;
                let account = Account {
                    data: create.data,
                    id: create.id,
                    password: create.password,
                    username: create.username,
                };
                store.accounts.insert(account.id.clone(), account.clone());
                account
            }
            PersistOps::UpdateData(update) => {
                let account = store.get_mut(&update.id)?;
                account.data = update.request.data;
                account.clone()
            }
            PersistOps::UpdatePassword(update) => {
                let account = store.get_mut(&update.id)?;
                if account.password != update.request.current_password {
                    anyhow::bail!(PasswordMismatch);
                }
                account.password = update.request.new_password;
                account.clone()
            }
            PersistOps::UpdateUsername(update) => {
                let current = store.get(&update.id)?;
                if current.password != update.request.password {
                    anyhow::bail!(PasswordMismatch);
                }
                store.check_username(&update.id, &update.request.username)?;
                let account = store.get_mut(&update.id)?;
                account.username = update.request.username;
                account.clone()
            }
        };
        Ok(PersistResponses::Account(account))
    }
}

/// Container for the shared state.
#[derive(Default)]
struct StoreFixtureState {
    accounts: HashMap<String, Account>,
}

impl StoreFixtureState {
    /// Ensure no account other then the given one uses the username.
    fn check_username(&self, id: &str, username: &str) -> Result<()> {
        let taken = self
            .accounts
            .values()
            .any(|account| account.username == username && account.id != id);
        if taken {
            anyhow::bail!(UsernameConflict::new(username));
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<&Account> {
        let account = self
            .accounts
            .get(id)
            .ok_or_else(|| AccountNotFound::new(id))?;
        Ok(account)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Account> {
        let account = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| AccountNotFound::new(id))?;
        Ok(account)
    }
}
