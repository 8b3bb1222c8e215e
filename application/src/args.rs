//! [`Args`]-related definitions.

use clap::Parser;

/// Command line arguments of the booking engine server.
#[derive(Clone, Debug, Parser)]
#[command(about = "Serves booking quotes, date conflict checks and bookings")]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses the command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if the provided command line arguments are invalid.
    pub fn parse() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
