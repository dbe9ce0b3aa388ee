//! Initialisation logic for Identity Provider processes.
mod actix;
mod backends;
mod generic;
mod logging;
mod server;

pub use self::generic::GenericInit;
pub use self::server::Server;
