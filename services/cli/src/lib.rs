mod cli;
mod demo;
mod infra;

use credit_desk::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
