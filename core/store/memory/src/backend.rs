//! In-memory implementation of the [`StoreBackend`] interface.
use std::collections::HashMap;
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
use idp_store::delete::DeleteAccount;
use idp_store::delete::DeleteOps;
use idp_store::delete::DeleteResponses;
use idp_store::persist::CreateAccount;
use idp_store::persist::PersistOps;
use idp_store::persist::PersistResponses;
use idp_store::persist::UpdateData;
use idp_store::persist::UpdatePassword;
use idp_store::persist::UpdateUsername;
use idp_store::query::AuthenticateAccount;
use idp_store::query::QueryOps;
use idp_store::query::QueryResponses;
use idp_store::StoreBackend;

use crate::hashing::PasswordHasher;
use crate::telemetry::observe_op;
use crate::telemetry::CountOnErr;
use crate::telemetry::ACCOUNTS;

/// Identity Store keeping accounts in process memory.
///
/// The lock around the state is never held while hashing passwords.
/// Operations confirmed by a password re-check the stored hash before committing
/// so that concurrent password changes are never lost.
#[derive(Clone)]
pub struct MemoryStore {
    hasher: PasswordHasher,
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store hashing passwords with the given argon2 parameters.
    pub fn new(params: argon2::Params) -> Self {
        MemoryStore {
            hasher: PasswordHasher::new(params),
            state: Default::default(),
        }
    }

    /// Lock and access the shared state.
    fn access(&self) -> MutexGuard<State> {
        self.state
            .lock()
            .expect("MemoryStore::state lock poisoned")
    }

    async fn authenticate(&self, auth: AuthenticateAccount) -> Result<Account> {
        let account = self.access().by_username(&auth.username).cloned();
        let account = match account {
            Ok(account) => account,
            Err(error) => {
                self.hasher.verify_decoy(auth.password).await?;
                return Err(error);
            }
        };
        self.confirm(&account, auth.password).await?;
        Ok(account)
    }

    #[cfg(test)]
    pub(crate) fn decoy_checked(&self) -> bool {
        self.hasher.decoy_ready()
    }

    /// Verify a password against the stored hash of an account snapshot.
    async fn confirm(&self, account: &Account, password: String) -> Result<()> {
        let matches = self
            .hasher
            .verify(password, account.password.clone())
            .await?;
        if !matches {
            anyhow::bail!(PasswordMismatch);
        }
        Ok(())
    }

    async fn create(&self, create: CreateAccount) -> Result<Account> {
        if create.username.is_empty() || create.password.is_empty() {
            anyhow::bail!(InvalidAccount::new("username and password are required"));
        }
        let password = self.hasher.hash(create.password).await?;

        let mut state = self.access();
        if state.accounts.contains_key(&create.id) {
            anyhow::bail!(InvalidAccount::new("account ID already in use"));
        }
        if state.usernames.contains_key(&create.username) {
            anyhow::bail!(UsernameConflict::new(create.username));
        }
        let account = Account {
            data: create.data,
            id: create.id,
            password,
            username: create.username,
        };
        state
            .usernames
            .insert(account.username.clone(), account.id.clone());
        state.accounts.insert(account.id.clone(), account.clone());
        ACCOUNTS.set(state.accounts.len() as i64);
        Ok(account)
    }

    fn delete_account(&self, delete: DeleteAccount) -> Result<()> {
        let mut state = self.access();
        let account = state
            .accounts
            .remove(&delete.id)
            .ok_or_else(|| AccountNotFound::new(&delete.id))?;
        state.usernames.remove(&account.username);
        ACCOUNTS.set(state.accounts.len() as i64);
        Ok(())
    }

    fn update_data(&self, update: UpdateData) -> Result<Account> {
        let mut state = self.access();
        let account = state.get_mut(&update.id)?;
        account.data = update.request.data;
        Ok(account.clone())
    }

    async fn update_password(&self, update: UpdatePassword) -> Result<Account> {
        if update.request.new_password.is_empty() {
            anyhow::bail!(InvalidAccount::new("password is required"));
        }
        let snapshot = self.access().get(&update.id)?.clone();
        self.confirm(&snapshot, update.request.current_password)
            .await?;
        let password = self.hasher.hash(update.request.new_password).await?;

        let mut state = self.access();
        let account = state.get_mut(&update.id)?;
        if account.password != snapshot.password {
            anyhow::bail!(PasswordMismatch);
        }
        account.password = password;
        Ok(account.clone())
    }

    async fn update_username(&self, update: UpdateUsername) -> Result<Account> {
        if update.request.username.is_empty() {
            anyhow::bail!(InvalidAccount::new("username is required"));
        }
        let snapshot = self.access().get(&update.id)?.clone();
        self.confirm(&snapshot, update.request.password).await?;

        let mut state = self.access();
        let current = state.get(&update.id)?;
        if current.password != snapshot.password {
            anyhow::bail!(PasswordMismatch);
        }
        let previous = current.username.clone();
        let username = update.request.username;
        match state.usernames.get(&username) {
            Some(owner) if owner != &update.id => {
                anyhow::bail!(UsernameConflict::new(username));
            }
            _ => (),
        }

        state.usernames.remove(&previous);
        state.usernames.insert(username.clone(), update.id.clone());
        let account = state.get_mut(&update.id)?;
        account.username = username;
        Ok(account.clone())
    }
}

#[async_trait::async_trait]
impl StoreBackend for MemoryStore {
    async fn delete(&self, context: &Context, op: DeleteOps) -> Result<DeleteResponses> {
        match op {
            DeleteOps::Account(account) => {
                let (err_count, _timer) = observe_op("account.delete");
                slog::debug!(context.logger, "Deleting account"; "id" => &account.id);
                self.delete_account(account).count_on_err(err_count)?;
            }
        };
        Ok(DeleteResponses::Success)
    }

    async fn query(&self, context: &Context, op: QueryOps) -> Result<QueryResponses> {
        let account = match op {
            QueryOps::Account(lookup) => {
                let (err_count, _timer) = observe_op("account.get");
                slog::debug!(context.logger, "Looking up account"; "id" => &lookup.id);
                let account = self.access().get(&lookup.id).cloned();
                account.count_on_err(err_count)?
            }
            QueryOps::Authenticate(auth) => {
                let (err_count, _timer) = observe_op("account.authenticate");
                slog::debug!(
                    context.logger, "Authenticating account";
                    "username" => &auth.username,
                );
                self.authenticate(auth).await.count_on_err(err_count)?
            }
        };
        Ok(QueryResponses::Account(account))
    }

    async fn persist(&self, context: &Context, op: PersistOps) -> Result<PersistResponses> {
        let account = match op {
            PersistOps::CreateAccount(create) => {
                let (err_count, _timer) = observe_op("account.create");
                slog::debug!(context.logger, "Creating account"; "id" => &create.id);
                self.create(create).await.count_on_err(err_count)?
            }
            PersistOps::UpdateData(update) => {
                let (err_count, _timer) = observe_op("account.update.data");
                slog::debug!(context.logger, "Updating account data"; "id" => &update.id);
                self.update_data(update).count_on_err(err_count)?
            }
            PersistOps::UpdatePassword(update) => {
                let (err_count, _timer) = observe_op("account.update.password");
                slog::debug!(context.logger, "Updating account password"; "id" => &update.id);
                self.update_password(update).await.count_on_err(err_count)?
            }
            PersistOps::UpdateUsername(update) => {
                let (err_count, _timer) = observe_op("account.update.username");
                slog::debug!(context.logger, "Updating account username"; "id" => &update.id);
                self.update_username(update).await.count_on_err(err_count)?
            }
        };
        Ok(PersistResponses::Account(account))
    }
}

/// Accounts and the index of usernames to account IDs.
#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    usernames: HashMap<String, String>,
}

impl State {
    fn by_username(&self, username: &str) -> Result<&Account> {
        let id = self
            .usernames
            .get(username)
            .ok_or_else(|| AccountNotFound::new(username))?;
        self.get(id)
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
