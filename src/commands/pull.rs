//! Pull command: fetch or update working copies without building.

use anyhow::Result;
use clap::Args;
use console::style;

use pgforge::config::{Config, Paths};
use pgforge::instance::Instance;

use crate::commands::{preprocess_targets, report_error};

/// Arguments for the pull command
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Instances to update; empty means every known instance
    pub target: Vec<String>,
}

/// Execute the pull command
pub fn execute(args: PullArgs) -> Result<()> {
    let paths = Paths::from_env()?;
    paths.ensure_exists()?;
    let config = Config::load(&paths)?;

    let mut failed = 0;
    for target in preprocess_targets(&args.target, paths.root())? {
        println!("Selected instance: {}", style(&target).bold());

        if let Err(e) = Instance::new(target, &paths, config.clone()).pull() {
            report_error(&e);
            failed += 1;
        }

        println!(); // splitter
    }

    if failed > 0 {
        anyhow::bail!("{} instance(s) failed", failed);
    }

    Ok(())
}
