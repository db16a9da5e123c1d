use clap::Parser;
use log::error;
use std::process::ExitCode;

use discord_alert::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args = Args::parse();
    match discord_alert::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to send status alert: {e}");
            ExitCode::FAILURE
        }
    }
}
