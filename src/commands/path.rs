//! Path command: print install dirs of the specified instances.

use anyhow::Result;
use clap::Args;

use pgforge::config::Paths;

use crate::commands::preprocess_targets;

/// Arguments for the path command
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Instances to resolve; empty means every known instance
    pub target: Vec<String>,
}

/// Execute the path command
pub fn execute(args: PathArgs) -> Result<()> {
    let paths = Paths::from_env()?;

    for target in preprocess_targets(&args.target, paths.root())? {
        println!("{}", paths.instance_dir(target.value()).display());
    }

    Ok(())
}
