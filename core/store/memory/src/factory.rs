//! Initialise the in-memory Identity Store.
use anyhow::Context as AnyContext;
use anyhow::Result;
use serde_json::Value as Json;

use idp_context::Context;
use idp_store::Store;
use idp_store::StoreFactory;
use idp_store::StoreFactoryArgs;

use crate::Conf;
use crate::ConfError;
use crate::MemoryStore;

/// Initialise the in-memory Identity Store.
pub struct MemoryFactory;

impl MemoryFactory {
    fn decode(conf: &Json) -> Result<Conf> {
        // A missing options block means all defaults.
        if conf.is_null() {
            return Ok(Conf::default());
        }
        let conf = serde_json::from_value(conf.clone()).context(ConfError::Decode)?;
        Ok(conf)
    }
}

#[async_trait::async_trait]
impl StoreFactory for MemoryFactory {
    fn conf_check(&self, _: &Context, conf: &Json) -> Result<()> {
        let conf = Self::decode(conf)?;
        conf.argon2.params()?;
        Ok(())
    }

    fn register_metrics(&self, registry: &prometheus::Registry) -> Result<()> {
        crate::telemetry::register_metrics(registry)
    }

    async fn store<'a>(&self, args: StoreFactoryArgs<'a>) -> Result<Store> {
        let conf = Self::decode(args.conf)?;
        let params = conf.argon2.params()?;
        slog::warn!(
            args.context.logger,
            "Using in-memory store means data will be lost once the process terminates"
        );
        let store = MemoryStore::new(params);
        Ok(Store::from(store))
    }
}
