//! Current command: report the active installation

use agentver_core::PlatformContext;

use crate::error::Result;

/// Run the current command
pub fn run_current(ctx: &PlatformContext) -> Result<()> {
    let current = ctx.switch().current_version()?;
    println!("{current}");
    Ok(())
}
