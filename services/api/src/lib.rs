mod cli;
mod commands;
mod infra;
mod routes;
mod server;
#[cfg(test)]
mod test_support;

use ev_siting::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
