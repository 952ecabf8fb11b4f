use anyhow::Result;
use clap::Parser;
use tracing::error;

use hypestat_scraper::args::validate_args;
use hypestat_scraper::utils::setup_logging;
use hypestat_scraper::{init_default_locators, run, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    validate_args(&args)?;

    if args.init {
        return init_default_locators();
    }

    match run(&args) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(action = "abort", component = "main", error = %e, "Run failed");
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
