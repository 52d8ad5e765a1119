//! Remove command: delete installed builds and their working copies.

use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::Confirm;

use pgforge::config::{Config, Paths};
use pgforge::error::Error;
use pgforge::instance::Instance;

use crate::commands::preprocess_targets;

/// Arguments for the remove command
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Instances to remove; empty means every known instance
    pub target: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the remove command
pub fn execute(args: RemoveArgs) -> Result<()> {
    let paths = Paths::from_env()?;
    paths.ensure_exists()?;
    let config = Config::load(&paths)?;

    // safety pin: removing everything must be asked for explicitly
    if args.target.is_empty() {
        if config.commands.remove.require_args {
            return Err(Error::Config {
                message: "remove requires explicit targets".to_string(),
                hint: Some(
                    "pass instance names, or set commands.remove.require_args = false"
                        .to_string(),
                ),
            }
            .into());
        }

        if !args.yes
            && !Confirm::new()
                .with_prompt("Remove ALL instances?")
                .default(false)
                .interact()?
        {
            return Ok(());
        }
    }

    for target in preprocess_targets(&args.target, paths.root())? {
        println!("Selected instance: {}", style(&target).bold());
        Instance::new(target, &paths, config.clone()).remove();
        println!(); // splitter
    }

    Ok(())
}
