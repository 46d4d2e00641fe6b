//! Set command: switch the active installation by version

use agentver_core::{EnumerationPolicy, PlatformContext};

use crate::error::Result;

/// Run the set command
///
/// Activates the first registered installation declaring `version` and
/// prints its path.
pub fn run_set(ctx: &PlatformContext, version: &str, policy: EnumerationPolicy) -> Result<()> {
    let target = ctx.registry().find_version(version, policy)?;
    ctx.switch().activate(&target.path)?;
    println!("{}", target.path);
    Ok(())
}
