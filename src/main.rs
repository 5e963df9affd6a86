use anyhow::Result;
use clap::Parser;
use tracing::error;

use coopstats::{print_snapshot, run_refresh, utils, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    match run_refresh(&args) {
        Ok(snapshot) => {
            print_snapshot(&snapshot, &args);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Refresh failed; previous results remain current");
            std::process::exit(1);
        }
    }
}
