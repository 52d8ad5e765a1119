//! # Build Tool Invocations
//!
//! The clean/configure/compile/install steps are plain child-process
//! calls into the instance's working copy. They sit behind the
//! [`BuildTools`] trait for the same reason repository access sits behind
//! [`crate::repository::RepositorySource`]: the reconciler's step machine
//! is exercised in tests without running configure scripts or make.
//!
//! A working copy counts as "configured" when its `GNUmakefile` exists;
//! that file is the configure script's main product and `distclean`
//! removes it again.

use std::env;
use std::path::Path;

use crate::error::Result;
use crate::exec::{execute, ExecOutput};

/// The external build steps of one working copy.
pub trait BuildTools {
    /// Whether a configure run has already produced its makefile here.
    fn is_configured(&self, work_dir: &Path) -> bool;

    /// Reset the tree to a pristine state (`make distclean`).
    fn distclean(&self, work_dir: &Path) -> Result<()>;

    /// Run `./configure --prefix=<prefix> <options...>`.
    fn configure(
        &self,
        work_dir: &Path,
        prefix: &Path,
        options: &[String],
        output: ExecOutput,
    ) -> Result<()>;

    /// Compile with the given parallelism factor.
    fn build(&self, work_dir: &Path, jobs: u32, output: ExecOutput) -> Result<()>;

    /// Install the compiled tree into the configured prefix.
    fn install(&self, work_dir: &Path, output: ExecOutput) -> Result<()>;
}

/// The default implementation: `./configure` and `make` (honoring the
/// `MAKE` environment variable).
pub struct MakeTools;

fn make_program() -> String {
    env::var("MAKE").unwrap_or_else(|_| "make".to_string())
}

impl BuildTools for MakeTools {
    fn is_configured(&self, work_dir: &Path) -> bool {
        work_dir.join("GNUmakefile").exists()
    }

    fn distclean(&self, work_dir: &Path) -> Result<()> {
        execute(
            &make_program(),
            &["distclean"],
            Some(work_dir),
            ExecOutput::Discard,
        )?;
        Ok(())
    }

    fn configure(
        &self,
        work_dir: &Path,
        prefix: &Path,
        options: &[String],
        output: ExecOutput,
    ) -> Result<()> {
        let prefix_arg = format!("--prefix={}", prefix.display());
        let mut args = vec![prefix_arg.as_str()];
        args.extend(options.iter().map(String::as_str));

        execute("./configure", &args, Some(work_dir), output)?;
        Ok(())
    }

    fn build(&self, work_dir: &Path, jobs: u32, output: ExecOutput) -> Result<()> {
        let jobs_arg = format!("-j{}", jobs);
        execute(&make_program(), &[&jobs_arg], Some(work_dir), output)?;
        Ok(())
    }

    fn install(&self, work_dir: &Path, output: ExecOutput) -> Result<()> {
        execute(&make_program(), &["install"], Some(work_dir), output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_configured_tracks_makefile() {
        let temp = TempDir::new().unwrap();
        assert!(!MakeTools.is_configured(temp.path()));

        std::fs::write(temp.path().join("GNUmakefile"), "all:\n").unwrap();
        assert!(MakeTools.is_configured(temp.path()));
    }
}
