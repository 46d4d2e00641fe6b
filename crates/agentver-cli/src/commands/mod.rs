//! Command implementations for agentver-cli

pub mod configure;
pub mod current;
pub mod list;
pub mod set;

pub use configure::run_configure;
pub use current::run_current;
pub use list::run_list;
pub use set::run_set;

use agentver_core::{EnumerationPolicy, PlatformContext};

use crate::cli::Cli;
use crate::error::Result;

/// Build the platform context for this invocation, applying flag and env overrides.
pub fn build_context(cli: &Cli) -> Result<PlatformContext> {
    let mut ctx = PlatformContext::detect()?;
    if let Some(etc_dir) = &cli.etc_dir {
        ctx = ctx.with_etc_dir(absolute(etc_dir)?);
    }
    if let Some(link) = &cli.link {
        ctx = ctx.with_link_path(absolute(link)?);
    }
    if let Some(entrypoint) = &cli.entrypoint {
        ctx = ctx.with_entrypoint(entrypoint.as_str());
    }
    tracing::debug!(
        platform = %ctx.platform(),
        etc_dir = %ctx.etc_dir(),
        link = %ctx.link_path(),
        entrypoint = ctx.entrypoint(),
        "Resolved platform context"
    );
    Ok(ctx)
}

/// Enumeration policy selected by `--skip-invalid`.
pub fn policy(skip_invalid: bool) -> EnumerationPolicy {
    if skip_invalid {
        EnumerationPolicy::SkipInvalid
    } else {
        EnumerationPolicy::FailFast
    }
}

/// Absolute form of a user-supplied path, without resolving links.
pub fn absolute(path: &std::path::Path) -> Result<std::path::PathBuf> {
    let absolute = std::path::absolute(path)?;
    Ok(dunce::simplified(&absolute).to_path_buf())
}
