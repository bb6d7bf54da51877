//! [`Args`] definitions.

use clap::{Parser, Subcommand};

/// Server of the real-estate listing website.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to run instead of serving HTTP.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// One-off maintenance command.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Creates a new back-office administrator.
    CreateAdmin {
        /// Email to sign in with.
        #[arg(long)]
        email: String,

        /// Display name.
        #[arg(long)]
        name: String,

        /// Password to sign in with.
        #[arg(long)]
        password: String,
    },
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::{Args, Command};

    #[test]
    fn defaults_to_serving() {
        let args = Args::try_parse_from(["application"]).unwrap();

        assert_eq!(args.config, "config.toml");
        assert!(args.command.is_none());
    }

    #[test]
    fn parses_create_admin() {
        let args = Args::try_parse_from([
            "application",
            "--config",
            "prod.toml",
            "create-admin",
            "--email",
            "admin@example.com",
            "--name",
            "Admin",
            "--password",
            "s3cret-pass",
        ])
        .unwrap();

        assert_eq!(args.config, "prod.toml");
        let Some(Command::CreateAdmin { email, .. }) = args.command else {
            panic!("expected `create-admin` command");
        };
        assert_eq!(email, "admin@example.com");
    }
}
