//! Identity Store kept entirely in process memory.
//!
//! This backend is intended for development, tests and demo instances:
//! all accounts are lost as soon as the process terminates.
//!
//! Passwords are never kept in plain text but stored as argon2id PHC strings.
mod backend;
mod conf;
mod factory;
mod hashing;
mod telemetry;

#[cfg(test)]
mod tests;

pub use self::backend::MemoryStore;
pub use self::conf::Argon2Conf;
pub use self::conf::Conf;
pub use self::conf::ConfError;
pub use self::factory::MemoryFactory;
