//! Dependency backends configuration and initialisation logic.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use idp_auth::access::AuthorisationFactory;
use idp_auth::identity::AuthenticationFactory;
use idp_store::StoreFactory;

/// Error looking for a specific backend implementation.
#[derive(Debug, thiserror::Error)]
pub enum BackendNotFound {
    /// Authentication backend not recognised.
    #[error("authentication backend '{0}' not recognised")]
    // (id,)
    Authentication(String),

    /// Authorisation backend not recognised.
    #[error("authorisation backend '{0}' not recognised")]
    // (id,)
    Authorisation(String),

    /// Identity Store backend not recognised.
    #[error("identity store backend '{0}' not recognised")]
    // (id,)
    Store(String),
}

/// Registers of backend factories for implementations supported by the process/build.
#[derive(Clone, Default)]
pub struct Backends {
    /// Supported Authentication backends.
    authentication: HashMap<String, Arc<dyn AuthenticationFactory>>,

    /// Supported Authorisation backends.
    authorisation: HashMap<String, Arc<dyn AuthorisationFactory>>,

    /// Supported Identity Store backends.
    stores: HashMap<String, Arc<dyn StoreFactory>>,
}

impl Backends {
    /// Lookup an [`AuthenticationFactory`] by ID.
    pub fn authentication(&self, id: &str) -> Result<&dyn AuthenticationFactory> {
        let factory = self
            .authentication
            .get(id)
            .ok_or_else(|| BackendNotFound::Authentication(id.to_string()))?;
        Ok(factory.as_ref())
    }

    /// Lookup an [`AuthorisationFactory`] by ID.
    pub fn authorisation(&self, id: &str) -> Result<&dyn AuthorisationFactory> {
        let factory = self
            .authorisation
            .get(id)
            .ok_or_else(|| BackendNotFound::Authorisation(id.to_string()))?;
        Ok(factory.as_ref())
    }

    /// Register a new factory for an Authentication implementation.
    ///
    /// # Panics
    ///
    /// This method panics if the identifier of the new backend is already in use.
    pub fn register_authentication<B, S>(&mut self, id: S, backend: B) -> &mut Self
    where
        B: AuthenticationFactory + 'static,
        S: Into<String>,
    {
        match self.authentication.entry(id.into()) {
            Entry::Occupied(entry) => {
                panic!(
                    "an AuthenticationFactory with id '{}' is already registered",
                    entry.key()
                )
            }
            Entry::Vacant(entry) => entry.insert(Arc::new(backend)),
        };
        self
    }

    /// Register a new factory for an Authorisation implementation.
    ///
    /// # Panics
    ///
    /// This method panics if the identifier of the new backend is already in use.
    pub fn register_authorisation<B, S>(&mut self, id: S, backend: B) -> &mut Self
    where
        B: AuthorisationFactory + 'static,
        S: Into<String>,
    {
        match self.authorisation.entry(id.into()) {
            Entry::Occupied(entry) => {
                panic!(
                    "an AuthorisationFactory with id '{}' is already registered",
                    entry.key()
                )
            }
            Entry::Vacant(entry) => entry.insert(Arc::new(backend)),
        };
        self
    }

    /// Register a new factory for an Identity Store implementation.
    ///
    /// # Panics
    ///
    /// This method panics if the identifier of the new backend is already in use.
    pub fn register_store<B, S>(&mut self, id: S, backend: B) -> &mut Self
    where
        B: StoreFactory + 'static,
        S: Into<String>,
    {
        match self.stores.entry(id.into()) {
            Entry::Occupied(entry) => {
                panic!(
                    "a StoreFactory with id '{}' is already registered",
                    entry.key()
                )
            }
            Entry::Vacant(entry) => entry.insert(Arc::new(backend)),
        };
        self
    }

    /// Lookup a [`StoreFactory`] by ID.
    pub fn store(&self, id: &str) -> Result<&dyn StoreFactory> {
        let factory = self
            .stores
            .get(id)
            .ok_or_else(|| BackendNotFound::Store(id.to_string()))?;
        Ok(factory.as_ref())
    }
}
