//! Data object storing the Identity Provider configuration.
use serde::Deserialize;
use serde::Serialize;

use super::RuntimeConf;

/// Global configuration for the Identity Provider process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conf {
    /// Authentication and authorisation backends.
    #[serde(default)]
    pub auth: AuthConf,

    /// HTTP Server configuration.
    #[serde(default)]
    pub http: HttpConf,

    /// Process logging configuration.
    #[serde(default)]
    pub logging: LoggingConf,

    /// Process runtime configuration.
    #[serde(default)]
    pub runtime: RuntimeConf,

    /// Identity Store service configuration.
    #[serde(default = "Conf::default_store")]
    pub store: BackendConf,
}

impl Conf {
    fn default_store() -> BackendConf {
        BackendConf::new("memory")
    }
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            auth: Default::default(),
            http: Default::default(),
            logging: Default::default(),
            runtime: Default::default(),
            store: Self::default_store(),
        }
    }
}

/// Selection of the authentication and authorisation backends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConf {
    /// Backend that identifies the entity performing a request.
    #[serde(default = "AuthConf::default_authentication")]
    pub authentication: BackendConf,

    /// Backend that decides if an entity may perform an action.
    #[serde(default = "AuthConf::default_authorisation")]
    pub authorisation: BackendConf,
}

impl AuthConf {
    fn default_authentication() -> BackendConf {
        BackendConf::new("basic")
    }

    fn default_authorisation() -> BackendConf {
        BackendConf::new("owner")
    }
}

impl Default for AuthConf {
    fn default() -> Self {
        AuthConf {
            authentication: Self::default_authentication(),
            authorisation: Self::default_authorisation(),
        }
    }
}

/// Unstructured configuration for runtime selected service backends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendConf {
    /// ID of the backend selected to provide the service.
    pub backend: String,

    /// Backend specific configuration options.
    #[serde(default, flatten)]
    pub options: serde_json::Value,
}

impl BackendConf {
    /// Select a backend with no options.
    pub fn new<S: Into<String>>(backend: S) -> Self {
        BackendConf {
            backend: backend.into(),
            options: serde_json::Value::Object(Default::default()),
        }
    }
}

/// HTTP Server configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HttpConf {
    /// Address and port to bind the server to.
    #[serde(default = "HttpConf::default_bind")]
    pub bind: String,

    /// Number of HTTP worker threads, defaults to the number of CPUs.
    #[serde(default)]
    pub workers: Option<usize>,
}

impl HttpConf {
    fn default_bind() -> String {
        "127.0.0.1:8080".into()
    }
}

impl Default for HttpConf {
    fn default() -> Self {
        HttpConf {
            bind: Self::default_bind(),
            workers: None,
        }
    }
}

/// Process logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConf {
    /// Flush logs asynchronously.
    #[serde(default = "LoggingConf::default_async", rename = "async")]
    pub flush_async: bool,

    /// Minimum level of events to emit.
    #[serde(default)]
    pub level: LogLevel,

    /// Format of the emitted events.
    #[serde(default)]
    pub mode: LogMode,
}

impl LoggingConf {
    fn default_async() -> bool {
        true
    }
}

impl Default for LoggingConf {
    fn default() -> Self {
        LoggingConf {
            flush_async: Self::default_async(),
            level: Default::default(),
            mode: Default::default(),
        }
    }
}

/// Verbosity levels for the process logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

/// Formats for the process logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// JSON encoded events, one per line.
    #[default]
    Json,

    /// Human readable events for terminals.
    Term,
}
