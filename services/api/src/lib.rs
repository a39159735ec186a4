mod batch;
mod cli;
mod infra;
mod lookup;
mod routes;
mod server;

#[cfg(test)]
mod test_support;

use patent_uig::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
