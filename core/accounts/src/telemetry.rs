//! Telemetry related to account operations.
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::CounterVec;
use prometheus::Opts;

use idp_auth::Action;
use idp_context::Context;

use crate::OperationError;

/// Number of account operations requested.
pub static OPERATIONS: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        Opts::new(
            "idp_accounts_operations_total",
            "Number of account operations requested",
        ),
        &["operation"],
    )
    .expect("failed to initialise OPERATIONS counter")
});

/// Number of account operations that failed, by error kind.
pub static OPERATIONS_ERR: Lazy<CounterVec> = Lazy::new(|| {
    CounterVec::new(
        Opts::new(
            "idp_accounts_operations_errors_total",
            "Number of account operations that failed, by error kind",
        ),
        &["operation", "kind"],
    )
    .expect("failed to initialise OPERATIONS_ERR counter")
});

/// Ensure metrics are registered only once.
static METRICS_REGISTERED: AtomicBool = AtomicBool::new(false);

/// The first time this method is called it will register the account operation metrics.
pub fn register_metrics(reg: &prometheus::Registry) -> Result<()> {
    // Skip registration if already done before.
    if METRICS_REGISTERED.swap(true, Ordering::AcqRel) {
        return Ok(());
    }

    reg.register(Box::new(OPERATIONS.clone()))?;
    reg.register(Box::new(OPERATIONS_ERR.clone()))?;
    Ok(())
}

/// Record the outcome of an account operation.
pub fn observe<T>(context: &Context, action: Action, result: &Result<T, OperationError>) {
    let operation = action.as_str();
    OPERATIONS.with_label_values(&[operation]).inc();
    match result {
        Ok(_) => slog::debug!(
            context.logger, "Account operation succeeded";
            "operation" => operation,
        ),
        Err(error) => {
            OPERATIONS_ERR
                .with_label_values(&[operation, error.kind.as_str()])
                .inc();
            slog::debug!(
                context.logger, "Account operation failed";
                "operation" => operation,
                "kind" => error.kind.as_str(),
                "error" => %error,
            );
        }
    }
}
