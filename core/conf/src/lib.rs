//! Identity Provider configuration object and helpers.
mod loading;
mod object;
mod runtime;

pub use self::loading::load;
pub use self::loading::Error;
pub use self::object::AuthConf;
pub use self::object::BackendConf;
pub use self::object::Conf;
pub use self::object::HttpConf;
pub use self::object::LogLevel;
pub use self::object::LogMode;
pub use self::object::LoggingConf;
pub use self::runtime::RuntimeConf;
