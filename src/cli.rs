use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "discord-alert",
    version,
    about = "Send a service status alert to Discord"
)]
pub struct Args {
    /// Name of the service
    pub service: String,

    /// New status of the service (e.g., STARTED, STOPPED, ERROR)
    pub status: String,

    /// Configuration file (defaults to <config dir>/discord-alert/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
