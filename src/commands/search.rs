//! Search command: find matching refs in the configured repositories.

use anyhow::Result;
use clap::Args;
use console::style;
use indicatif::ProgressBar;
use std::time::Duration;

use pgforge::config::{Config, Paths};
use pgforge::name::NameKind;
use pgforge::rank::sort_refs;
use pgforge::repository::{GitSource, RepositorySource};

use crate::commands::{preprocess_targets, report_error};

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Instances to search refs for; empty means every known instance
    pub target: Vec<String>,
}

/// Execute the search command
pub fn execute(args: SearchArgs) -> Result<()> {
    let paths = Paths::from_env()?;
    paths.ensure_exists()?;
    let config = Config::load(&paths)?;
    let source = GitSource;

    for target in preprocess_targets(&args.target, paths.root())? {
        let kind = match target.kind() {
            NameKind::Version => "version",
            NameKind::Branch => "branch",
        };
        println!(
            "Search query: {} ({})",
            style(target.query()).bold(),
            kind
        );

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("querying repositories...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let refs = source.discover(
            &config.repos.urls,
            &target.to_patterns(),
            config.repos.first_match,
        );
        spinner.finish_and_clear();

        match refs {
            Ok(refs) => {
                for r in sort_refs(refs, &target) {
                    println!("\t {}", r.name);
                }
            }
            Err(e) => report_error(&e),
        }

        println!(); // splitter
    }

    Ok(())
}
