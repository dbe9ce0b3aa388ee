//! Process logger initialisation.
use std::io::stdout;
use std::sync::Mutex;

use slog::Drain;
use slog::FnValue;
use slog::IgnoreResult;
use slog::Level;
use slog::Logger;
use slog::Never;
use slog::OwnedKVList;
use slog::Record;
use slog::SendSyncRefUnwindSafeDrain;
use slog::SendSyncUnwindSafeDrain;
use slog_async::Async;
use slog_async::AsyncGuard;

use idp_conf::LogLevel;
use idp_conf::LogMode;
use idp_conf::LoggingConf;

/// Process logger and the guard to flush asynchronous drains with.
pub struct Logging {
    /// Flush pending log events when dropped.
    _guard: Option<AsyncGuard>,

    /// Root logger for the process.
    pub logger: Logger,
}

/// Creates a process [`Logger`] based on the given configuration.
pub fn configure(conf: &LoggingConf) -> Logging {
    let level = level(conf.level);
    match conf.mode {
        LogMode::Json => {
            let drain = slog_json::Json::new(stdout())
                .set_newlines(true)
                .set_flush(true)
                .add_default_keys()
                .build();
            let drain = Mutex::new(drain).map(IgnoreResult::new);
            config_async(conf, LevelFilter(drain, level))
        }
        LogMode::Term => {
            let decorator = slog_term::TermDecorator::new().stdout().build();
            let drain = slog_term::FullFormat::new(decorator).build();
            let drain = Mutex::new(drain).map(IgnoreResult::new);
            config_async(conf, LevelFilter(drain, level))
        }
    }
}

/// Optionally wrap the drain into an [`Async`] drain.
fn config_async<D>(conf: &LoggingConf, drain: D) -> Logging
where
    D: SendSyncUnwindSafeDrain<Ok = (), Err = Never>,
    D: 'static + SendSyncRefUnwindSafeDrain<Err = Never, Ok = ()> + std::panic::UnwindSafe,
{
    if !conf.flush_async {
        return Logging {
            _guard: None,
            logger: into_logger(drain),
        };
    }
    let (drain, guard) = Async::new(drain).build_with_guard();
    Logging {
        _guard: Some(guard),
        logger: into_logger(drain.ignore_res()),
    }
}

/// Converts a [`Drain`] into a [`Logger`] setting global tags.
fn into_logger<D>(drain: D) -> Logger
where
    D: 'static + SendSyncRefUnwindSafeDrain<Err = Never, Ok = ()> + std::panic::UnwindSafe,
{
    Logger::root(
        drain,
        slog::o!(
            "module" => FnValue(|rinfo : &Record| rinfo.module()),
            "version" => env!("CARGO_PKG_VERSION"),
        ),
    )
}

fn level(level: LogLevel) -> Level {
    match level {
        LogLevel::Critical => Level::Critical,
        LogLevel::Error => Level::Error,
        LogLevel::Warning => Level::Warning,
        LogLevel::Info => Level::Info,
        LogLevel::Debug => Level::Debug,
    }
}

/// Alternative implementation of slog's [`LevelFilter`] with `Ok == ()`.
///
/// The default [`LevelFilter`] implementation wraps `D::Ok` into an [`Option`].
/// This makes it impossible to wrap a filtering drain into a [`Logger`].
///
/// [`LevelFilter`]: slog::LevelFilter
#[derive(Debug, Clone)]
struct LevelFilter<D: Drain>(pub D, pub Level);
impl<D: Drain> Drain for LevelFilter<D> {
    type Ok = ();
    type Err = D::Err;
    fn log(
        &self,
        record: &Record,
        logger_values: &OwnedKVList,
    ) -> std::result::Result<Self::Ok, Self::Err> {
        if record.level().is_at_least(self.1) {
            self.0.log(record, logger_values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use idp_conf::LogLevel;
    use idp_conf::LogMode;
    use idp_conf::LoggingConf;

    #[test]
    fn configure_sync_json_logger() {
        let conf = LoggingConf {
            flush_async: false,
            level: LogLevel::Critical,
            mode: LogMode::Json,
        };
        let logging = super::configure(&conf);
        slog::debug!(logging.logger, "Filtered out");
    }

    #[test]
    fn map_levels() {
        assert_eq!(super::level(LogLevel::Warning), slog::Level::Warning);
        assert_eq!(super::level(LogLevel::Debug), slog::Level::Debug);
    }
}
