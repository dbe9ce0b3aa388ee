//! Run the Identity Provider server.
use anyhow::Result;

use idp_conf::Conf;

use super::Cli;
use crate::init::Server;

/// Run the Identity Provider server.
pub async fn run(_cli: Cli, conf: Conf) -> Result<()> {
    Server::configure(conf)?
        .register_default_backends()
        .with_http_config(crate::api::configure)
        .run()
        .await
}
