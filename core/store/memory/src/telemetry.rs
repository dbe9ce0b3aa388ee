//! Telemetry related to the in-memory store implementation.
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::Counter;
use prometheus::CounterVec;
use prometheus::HistogramOpts;
use prometheus::HistogramTimer;
use prometheus::HistogramVec;
use prometheus::Opts;

/// Number of accounts currently held in memory.
pub static ACCOUNTS: Lazy<prometheus::IntGauge> = Lazy::new(|| {
    prometheus::IntGauge::new(
        "idp_store_memory_accounts",
        "Number of accounts currently held in memory",
    )
    .expect("failed to initialise ACCOUNTS gauge")
});

/// Duration (in seconds) of in-memory store operations.
pub static OPS_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "idp_store_memory_ops_duration",
            "Duration (in seconds) of in-memory store operations",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["op"],
    )
    .expect("failed to initialise OPS_DURATION histogram")
});

/// Number of in-memory store operations that resulted in error.
pub static OPS_ERR: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        Opts::new(
            "idp_store_memory_ops_error",
            "Number of in-memory store operations that resulted in error",
        ),
        &["op"],
    )
    .expect("failed to initialise OPS_ERR counter")
});

/// Ensure metrics are registered only once.
static METRICS_REGISTERED: AtomicBool = AtomicBool::new(false);

/// The first time this method is called it will register the in-memory store metrics.
pub fn register_metrics(reg: &prometheus::Registry) -> Result<()> {
    // Skip registration if already done before.
    if METRICS_REGISTERED.swap(true, Ordering::AcqRel) {
        return Ok(());
    }

    let collectors: [Box<dyn prometheus::core::Collector>; 3] = [
        Box::new(ACCOUNTS.clone()),
        Box::new(OPS_DURATION.clone()),
        Box::new(OPS_ERR.clone()),
    ];
    for collector in collectors {
        reg.register(collector)?;
    }
    Ok(())
}

/// Observe the execution of a store operation.
///
/// ## Returns
///
/// - A [`Counter`] to increment in case of error.
/// - A started timer to observe the duration of the operation.
#[inline]
pub fn observe_op(op: &str) -> (Counter, HistogramTimer) {
    let err_count = OPS_ERR.with_label_values(&[op]);
    let timer = OPS_DURATION.with_label_values(&[op]).start_timer();
    (err_count, timer)
}

/// Increment an error counter when a [`Result`] is an error.
pub trait CountOnErr {
    fn count_on_err(self, counter: Counter) -> Self;
}

impl<T, E> CountOnErr for std::result::Result<T, E> {
    fn count_on_err(self, counter: Counter) -> Self {
        if self.is_err() {
            counter.inc();
        }
        self
    }
}
