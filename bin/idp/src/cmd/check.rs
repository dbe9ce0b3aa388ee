//! Validate the process configuration without running the server.
use anyhow::Result;

use idp_conf::Conf;

use super::Cli;
use crate::init::GenericInit;

/// Validate the configuration and the options of all selected backends.
pub async fn run(cli: Cli, conf: Conf) -> Result<()> {
    let mut init = GenericInit::configure(conf)?;
    init.register_default_backends();
    let context = init.context();
    init.validate_backends_conf(&context)?;
    slog::info!(
        context.logger, "Configuration is valid";
        "path" => &cli.config,
    );
    Ok(())
}
