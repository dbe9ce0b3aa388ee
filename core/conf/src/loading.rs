//! Load configuration from files.
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;

use crate::Conf;

/// Errors handling Identity Provider configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to decode configuration from file at the given path.
    #[error("unable to decode configuration from file at '{0}'")]
    // (path,)
    Decode(String),

    /// Unable to read configuration file at the given path.
    #[error("unable to read configuration file at '{0}'")]
    // (path,)
    Open(String),

    /// Configuration file not found at the given path.
    #[error("configuration file not found at '{0}'")]
    // (path,)
    PathNotFound(String),
}

/// Load process configuration from the specified path.
pub fn load(path: &str) -> Result<Conf> {
    if !Path::new(path).exists() {
        anyhow::bail!(Error::PathNotFound(path.to_string()));
    }

    let file = File::open(path).with_context(|| Error::Open(path.into()))?;
    let conf = serde_yaml::from_reader(file).with_context(|| Error::Decode(path.into()))?;
    Ok(conf)
}
