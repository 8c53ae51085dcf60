mod config;
mod db;
mod error;
mod logging;
mod manager;
mod models;
mod report;
mod run;
mod store;
mod util;

#[cfg(test)]
mod util_tests;

use anyhow::Result;

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    let db = db::Database::open(&config.db_path)?;

    run::as_cli(&args, &db, &config)
}
