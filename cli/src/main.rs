use anyhow::Result;
use clap::Parser;
use hotel_cli::commands::jwt::{JwtCommand, handle_jwt_command};

#[derive(Parser)]
#[command(
    name = "hotel-cli",
    about = "Developer tooling for the hotel admin authorizer: test keys, tokens and offline verification",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// JWT testing utilities for local development
    #[command(subcommand)]
    Jwt(JwtCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    hotel_cli::logging::init()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Jwt(command) => handle_jwt_command(command).await,
    }
}
