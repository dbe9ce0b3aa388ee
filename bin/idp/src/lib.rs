//! Combine individual logical units to initialise and run an Identity Provider process.
use anyhow::Context as AnyContext;
use anyhow::Result;
use clap::Parser;

use idp_conf::Conf;

mod api;
mod cmd;
mod init;

pub use self::cmd::Cli;

/// Initialise the idp process and invoke a command implementation.
pub async fn execute(cli: Cli, conf: Conf) -> Result<()> {
    match cli.command {
        cmd::Command::Check => cmd::check::run(cli, conf).await,
        cmd::Command::Server => cmd::server::run(cli, conf).await,
    }
}

/// Initialise the async runtime for the process and invoke [`execute`].
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let conf = idp_conf::load(&cli.config)?;
    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    runtime.enable_all();
    if let Some(threads) = conf.runtime.worker_threads {
        runtime.worker_threads(threads);
    }
    runtime
        .build()
        .context("failed tokio runtime initialisation")?
        .block_on(execute(cli, conf))
}
