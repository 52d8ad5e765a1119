//! Install command: build & install a list of instances.

use anyhow::Result;
use clap::Args;
use console::style;

use pgforge::config::{Config, Paths};
use pgforge::exec::ExecOutput;
use pgforge::instance::{split_options, InstallOptions, Instance};

use crate::commands::{preprocess_targets, report_error};

/// Arguments for the install command
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Instances to install; empty means every known instance
    pub target: Vec<String>,

    /// Options for ./configure, as one whitespace-separated string
    #[arg(long, value_name = "OPTS", allow_hyphen_values = true)]
    pub configure: Option<String>,

    /// Do not pull and install updates
    #[arg(short = 'E', long)]
    pub no_update: bool,

    /// Stream build tool output instead of capturing it
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the install command
pub fn execute(args: InstallArgs) -> Result<()> {
    let paths = Paths::from_env()?;
    paths.ensure_exists()?;
    let config = Config::load(&paths)?;

    let configure = args.configure.as_deref().map(split_options);
    let output = if args.verbose {
        ExecOutput::Stream
    } else {
        ExecOutput::Capture
    };

    let mut failed = 0;
    for target in preprocess_targets(&args.target, paths.root())? {
        println!("Selected instance: {}", style(&target).bold());

        let opts = InstallOptions {
            configure: configure.clone(),
            update: !args.no_update,
            output,
        };

        if let Err(e) = Instance::new(target, &paths, config.clone()).install(&opts) {
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
