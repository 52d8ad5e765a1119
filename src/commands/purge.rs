//! Purge command: remove working copies whose install dir is gone.

use std::fs;

use anyhow::Result;
use clap::Args;

use pgforge::config::Paths;
use pgforge::output::step;

use crate::commands::preprocess_targets;

/// Arguments for the purge command
#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Instances to consider; empty means every cloned working copy
    pub target: Vec<String>,
}

/// Execute the purge command
pub fn execute(args: PurgeArgs) -> Result<()> {
    let paths = Paths::from_env()?;
    paths.ensure_exists()?;

    // orphans live under the work root, so that is the baseline
    for target in preprocess_targets(&args.target, &paths.work_root())? {
        let main_dir = paths.instance_dir(target.value());
        let work_dir = paths.work_dir(target.value());

        if !main_dir.exists() && work_dir.exists() {
            fs::remove_dir_all(&work_dir)?;
            step(format!("Removed orphaned work dir of {}", target));
        }
    }

    Ok(())
}
