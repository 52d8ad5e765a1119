//! # Instance Reconciliation
//!
//! An instance is one named source-built installation: a working copy
//! under `<root>/.pgforge/<name>` plus an installed artifact under
//! `<root>/<name>`. [`Instance::install`] converges both to the desired
//! source state with the minimum amount of work, evaluated in a fixed
//! order each pass:
//!
//! 1. No working copy: resolve the name against the configured
//!    repositories (patterns → discovery → ranking) and shallow-clone the
//!    winning ref.
//! 2. Working copy present and updates not suppressed: fast-forward the
//!    current branch (skipped for detached tag checkouts).
//! 3. Staleness: compare the working copy's commit against the recorded
//!    built/installed commits and the configure options (see
//!    [`crate::state::assess`]).
//! 4. Clean: `distclean` when the tree was configured and a rebuild or a
//!    configure change is due; failure to clean is logged, not fatal, so a
//!    broken tree cannot block a fresh build.
//! 5. Configure: when no makefile exists, with the resolved option list:
//!    explicit override, else the installed artifact's own
//!    `pg_config --configure` output, else the configured defaults.
//! 6. Build + install: the built-commit marker is written after the
//!    compile succeeds and before install begins; the installed-commit
//!    marker only after install succeeds, so an interrupted install is
//!    retried on the next pass.
//! 7. Nothing to do: a second pass with no source changes performs zero
//!    build actions.
//!
//! Each pass returns a [`Report`] of the steps performed and the resolved
//! ref (when discovery ran), for the CLI layer to summarize.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;

use crate::build::{BuildTools, MakeTools};
use crate::config::{Config, Paths, EXCLUDE_PATTERN, IGNORE_FILE};
use crate::error::{Error, Result};
use crate::exec::{try_execute, ExecOutput};
use crate::name::InstanceName;
use crate::output::{detail, step};
use crate::rank::{sort_refs, RemoteRef};
use crate::repository::{GitSource, RepositorySource};
use crate::state::{assess, BuildState, Staleness};

/// One reconciliation action that was actually performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clone,
    Pull,
    Clean,
    Configure,
    BuildInstall,
}

/// Outcome of one reconciliation pass, for the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// The remote ref discovery settled on, when a clone happened.
    pub resolved_ref: Option<RemoteRef>,
    /// Steps performed, in order.
    pub steps: Vec<Step>,
    /// The instance was skipped because of its ignore marker.
    pub skipped: bool,
}

/// Knobs for one `install` pass.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Explicit `./configure` options; `None` means resolve from the
    /// installed artifact or the configuration.
    pub configure: Option<Vec<String>>,
    /// Pull the working copy before judging staleness.
    pub update: bool,
    /// Where build tool output goes.
    pub output: ExecOutput,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            configure: None,
            update: true,
            output: ExecOutput::Capture,
        }
    }
}

/// One named source-built installation.
pub struct Instance {
    name: InstanceName,
    main_dir: PathBuf,
    work_dir: PathBuf,
    state: BuildState,
    config: Config,
    source: Box<dyn RepositorySource>,
    tools: Box<dyn BuildTools>,
}

impl Instance {
    pub fn new(name: InstanceName, paths: &Paths, config: Config) -> Self {
        Self::with_backends(name, paths, config, Box::new(GitSource), Box::new(MakeTools))
    }

    fn with_backends(
        name: InstanceName,
        paths: &Paths,
        config: Config,
        source: Box<dyn RepositorySource>,
        tools: Box<dyn BuildTools>,
    ) -> Self {
        let main_dir = paths.instance_dir(name.value());
        let work_dir = paths.work_dir(name.value());
        let state = BuildState::new(&main_dir, &work_dir);

        Self {
            name,
            main_dir,
            work_dir,
            state,
            config,
            source,
            tools,
        }
    }

    pub fn name(&self) -> &InstanceName {
        &self.name
    }

    pub fn main_dir(&self) -> &Path {
        &self.main_dir
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Whether the install dir carries the ignore marker.
    pub fn ignored(&self) -> bool {
        self.main_dir.join(IGNORE_FILE).exists()
    }

    /// Commit currently checked out in the working copy, if there is one.
    pub fn actual_commit(&self) -> Option<String> {
        if !self.work_dir.exists() {
            return None;
        }
        self.source.current_commit(&self.work_dir).ok()
    }

    /// Run one reconciliation pass (steps 1-7 above).
    pub fn install(&self, opts: &InstallOptions) -> Result<Report> {
        let mut report = Report::default();

        if self.ignored() {
            step(style(format!("Ignored due to {}", IGNORE_FILE)).yellow());
            report.skipped = true;
            return Ok(report);
        }

        self.ensure_work_tree(opts.update, &mut report)?;
        self.maybe_clean(opts.configure.as_deref(), &mut report)?;
        self.maybe_configure(opts.configure.as_deref(), opts.output, &mut report)?;
        self.maybe_build_install(opts.configure.as_deref(), opts.output, &mut report)?;

        Ok(report)
    }

    /// Fetch or update the working copy without building.
    pub fn pull(&self) -> Result<Report> {
        let mut report = Report::default();
        self.ensure_work_tree(true, &mut report)?;
        Ok(report)
    }

    /// Delete the install dir and the working copy.
    pub fn remove(&self) {
        for (dir, label) in [(&self.main_dir, "main"), (&self.work_dir, "work")] {
            if dir.exists() {
                match fs::remove_dir_all(dir) {
                    Ok(()) => step(format!("Removed {} dir", label)),
                    Err(e) => log::warn!("failed to remove {}: {}", dir.display(), e),
                }
            }
        }
    }

    /// Print a human-readable report on this instance.
    pub fn status(&self) {
        let installed = self.bin_path("postgres").exists();
        let status = if installed {
            if self.assess_now(None).requires_reinstall {
                style("Installed (out of date)").yellow()
            } else {
                style("Installed").green()
            }
        } else {
            style("Not installed").red()
        };

        detail("Status:", status);
        detail("Main dir:", path_or_dash(&self.main_dir));
        detail("Work dir:", path_or_dash(&self.work_dir));

        if self.work_dir.exists() {
            let checked_out = self
                .source
                .current_branch(&self.work_dir)
                .or_else(|| self.source.current_tag(&self.work_dir));
            if let Some(name) = checked_out {
                detail("Branch:", name);
            }
        }

        if let Some(version) = self.pg_config(&["--version"]) {
            detail("Version:", version.trim());
        }

        if let Some(commit) = self.state.installed_commit() {
            detail("Commit:", commit);
        }

        if self.valgrind_enabled() {
            detail("Valgrind:", "Enabled");
        }

        detail("CONFIGURE:", self.resolved_configure_options().join(" "));
    }

    /// Effective configure options: the installed artifact's own record,
    /// stripped of `--prefix`, falling back to the configured defaults.
    pub fn resolved_configure_options(&self) -> Vec<String> {
        if let Some(out) = self.pg_config(&["--configure"]) {
            return split_options(&out)
                .into_iter()
                .filter(|opt| !opt.starts_with("--prefix"))
                .collect();
        }

        self.config.build.configure_options.clone()
    }

    fn assess_now(&self, requested: Option<&[String]>) -> Staleness {
        let actual = self.actual_commit();
        let built = self.state.built_commit();
        let installed = self.state.installed_commit();
        let last_options = self.resolved_configure_options();

        assess(
            actual.as_deref(),
            built.as_deref(),
            installed.as_deref(),
            &last_options,
            requested,
        )
    }

    /// Step 1-2: make sure a working copy exists and is current.
    fn ensure_work_tree(&self, update: bool, report: &mut Report) -> Result<()> {
        if self.source.has_working_copy(&self.work_dir) {
            let branch = self.source.current_branch(&self.work_dir);

            if update && branch.is_some() {
                self.source.pull(&self.work_dir)?;
                report.steps.push(Step::Pull);
            }

            if self.assess_now(None).requires_reinstall {
                if let Some(branch) = &branch {
                    // show how far the installed build is behind
                    let fresh_commits = self
                        .state
                        .installed_commit()
                        .and_then(|installed| {
                            self.source.commit_distance(&self.work_dir, &installed, branch)
                        })
                        .map(|n| format!(" ({} commits)", n))
                        .unwrap_or_default();

                    step(format!("Current branch: {}", style(branch).bold()));
                    step(format!("Installed build is out of date{}", fresh_commits));
                }
            }
        } else {
            step("No work dir, choosing repo & branch");

            let patterns = self.name.to_patterns();
            let refs = self.source.discover(
                &self.config.repos.urls,
                &patterns,
                self.config.repos.first_match,
            )?;

            if refs.is_empty() {
                return Err(Error::NoMatchingRef {
                    target: self.name.value().to_string(),
                });
            }

            let best = sort_refs(refs, &self.name).swap_remove(0);
            step(format!("Selected repo {}", style(&best.url).bold()));
            step(format!("Selected branch {}", style(&best.name).bold()));

            self.source.clone_ref(&best.url, &best.name, &self.work_dir, 1)?;
            step("Cloned git repo to work dir");

            report.steps.push(Step::Clone);
            report.resolved_ref = Some(best);
        }

        // keep our marker files out of git's sight
        self.source.append_exclude(&self.work_dir, EXCLUDE_PATTERN)?;

        Ok(())
    }

    /// Step 4: reset the tree when a rebuild or configure change is due.
    fn maybe_clean(&self, requested: Option<&[String]>, report: &mut Report) -> Result<()> {
        if !self.tools.is_configured(&self.work_dir) {
            return Ok(());
        }

        let staleness = self.assess_now(requested);
        if staleness.configure_changed || staleness.requires_rebuild {
            // the tree is about to be invalidated either way
            self.state.clear_built()?;

            if let Err(e) = self.tools.distclean(&self.work_dir) {
                log::warn!("distclean failed in {}: {}", self.work_dir.display(), e);
            }

            step("Prepared work dir for a new build");
            report.steps.push(Step::Clean);
        }

        Ok(())
    }

    /// Step 5: configure a pristine tree.
    fn maybe_configure(
        &self,
        requested: Option<&[String]>,
        output: ExecOutput,
        report: &mut Report,
    ) -> Result<()> {
        if self.tools.is_configured(&self.work_dir) {
            return Ok(());
        }

        // NOTE: an explicit empty list is a valid choice
        let options = match requested {
            Some(explicit) => explicit.to_vec(),
            None => self.resolved_configure_options(),
        };

        self.tools
            .configure(&self.work_dir, &self.main_dir, &options, output)?;
        step(format!("Configured sources with [{}]", options.join(" ")));
        report.steps.push(Step::Configure);

        Ok(())
    }

    /// Step 6: compile and install, updating the markers in retry-safe
    /// order.
    fn maybe_build_install(
        &self,
        requested: Option<&[String]>,
        output: ExecOutput,
        report: &mut Report,
    ) -> Result<()> {
        let staleness = self.assess_now(requested);
        if !staleness.configure_changed && !staleness.requires_reinstall {
            return Ok(());
        }

        let actual = self.source.current_commit(&self.work_dir)?;

        self.tools.build(&self.work_dir, self.config.build.jobs, output)?;
        self.state.record_built(&actual)?;

        self.tools.install(&self.work_dir, output)?;
        self.state.record_installed(&actual)?;

        step("Built and installed");
        report.steps.push(Step::BuildInstall);

        Ok(())
    }

    fn bin_path(&self, name: &str) -> PathBuf {
        self.main_dir.join("bin").join(name)
    }

    fn pg_config(&self, args: &[&str]) -> Option<String> {
        let bin = self.bin_path("pg_config");
        if !bin.exists() {
            return None;
        }
        try_execute(&bin.to_string_lossy(), args, None, ExecOutput::Capture)
    }

    fn valgrind_enabled(&self) -> bool {
        let header = self.main_dir.join("include").join("pg_config_manual.h");
        let Ok(content) = fs::read_to_string(header) else {
            return false;
        };

        for line in content.lines() {
            if line.starts_with("#define MEMORY_CONTEXT_CHECKING") {
                break; // too late
            }
            if line.starts_with("#define USE_VALGRIND") {
                return true;
            }
        }

        false
    }
}

fn path_or_dash(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        "-".to_string()
    }
}

/// Split a configure-option string the way a shell would, honoring single
/// and double quotes (`pg_config --configure` reports options quoted).
pub fn split_options(input: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        result.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if in_word {
        result.push(current);
    }

    result
}
