//! Container for the complete process runtime configuration.
use serde::Deserialize;
use serde::Serialize;

/// Container for the complete process runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConf {
    /// Allowed time, in seconds, for running operations to complete once process shutdown begins.
    #[serde(default = "RuntimeConf::default_shutdown_grace")]
    pub shutdown_grace_sec: u64,

    /// Number of tokio worker threads, defaults to the number of CPUs.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl RuntimeConf {
    fn default_shutdown_grace() -> u64 {
        30
    }
}

impl Default for RuntimeConf {
    fn default() -> Self {
        RuntimeConf {
            shutdown_grace_sec: Self::default_shutdown_grace(),
            worker_threads: None,
        }
    }
}
