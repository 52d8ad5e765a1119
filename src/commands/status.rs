//! Status command: show some info for each installed instance.

use anyhow::Result;
use clap::Args;
use console::style;

use pgforge::config::{Config, Paths};
use pgforge::instance::Instance;

use crate::commands::preprocess_targets;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Instances to inspect; empty means every known instance
    pub target: Vec<String>,
}

/// Execute the status command
pub fn execute(args: StatusArgs) -> Result<()> {
    let paths = Paths::from_env()?;
    paths.ensure_exists()?;
    let config = Config::load(&paths)?;

    for target in preprocess_targets(&args.target, paths.root())? {
        println!("Selected instance: {}", style(&target).bold());
        Instance::new(target, &paths, config.clone()).status();
        println!(); // splitter
    }

    Ok(())
}
