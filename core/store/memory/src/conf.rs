//! Configuration for the in-memory store backend.
use argon2::Params;
use serde::Deserialize;
use serde::Serialize;

/// In-memory specific configuration for the persistent store interface.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Conf {
    /// Cost parameters for password hashing.
    #[serde(default)]
    pub argon2: Argon2Conf,
}

/// Cost parameters of the argon2id password hashing function.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Argon2Conf {
    /// Number of iterations.
    #[serde(default = "Argon2Conf::default_iterations")]
    pub iterations: u32,

    /// Memory size in KiB.
    #[serde(default = "Argon2Conf::default_memory_kib")]
    pub memory_kib: u32,

    /// Degree of parallelism.
    #[serde(default = "Argon2Conf::default_parallelism")]
    pub parallelism: u32,
}

impl Argon2Conf {
    fn default_iterations() -> u32 {
        Params::DEFAULT_T_COST
    }

    fn default_memory_kib() -> u32 {
        Params::DEFAULT_M_COST
    }

    fn default_parallelism() -> u32 {
        Params::DEFAULT_P_COST
    }

    /// Convert the configuration into argon2 parameters, validating the costs.
    pub fn params(&self) -> Result<Params, ConfError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|error| ConfError::Argon2(error.to_string()))
    }
}

impl Default for Argon2Conf {
    fn default() -> Self {
        Argon2Conf {
            iterations: Self::default_iterations(),
            memory_kib: Self::default_memory_kib(),
            parallelism: Self::default_parallelism(),
        }
    }
}

/// The in-memory persistent store backend configuration is not valid.
#[derive(Debug, thiserror::Error)]
pub enum ConfError {
    /// The argon2 cost parameters are not valid.
    #[error("invalid argon2 parameters: {0}")]
    Argon2(String),

    /// The configuration block could not be decoded.
    #[error("the in-memory persistent store backend configuration is not valid")]
    Decode,
}
