//! Built-in `idp` commands.
use clap::Parser;
use clap::Subcommand;

pub mod check;
pub mod server;

/// Identity Provider exposing authorisation gated account operations.
#[derive(Debug, Parser)]
#[command(version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the Identity Provider configuration to use.
    #[arg(short = 'c', long = "config", default_value_t = String::from("idp.yaml"))]
    pub config: String,

    /// Select the idp command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Select the idp command to run.
#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Validate the configuration and the options of all selected backends, then exit.
    #[command(alias = "check-conf")]
    Check,

    /// Run the Identity Provider server.
    #[command(alias = "run")]
    Server,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;
    use super::Command;

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["idp", "-c", "/etc/idp.yaml", "run"]);
        assert_eq!(cli.config, "/etc/idp.yaml");
        assert!(matches!(cli.command, Command::Server));
    }

    #[test]
    fn default_config_path() {
        let cli = Cli::parse_from(["idp", "check"]);
        assert_eq!(cli.config, "idp.yaml");
        assert!(matches!(cli.command, Command::Check));
    }
}
