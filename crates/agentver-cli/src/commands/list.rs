//! List command: registered installations in registration order

use agentver_core::{EnumerationPolicy, PlatformContext};

use crate::error::Result;

/// Run the list command
///
/// Prints one `VERSION:PATH` line per installation. Under fail-fast the
/// lines already printed stay on stdout and the error ends the command.
pub fn run_list(ctx: &PlatformContext, policy: EnumerationPolicy) -> Result<()> {
    let registry = ctx.registry();
    let mut count = 0usize;

    for entry in registry.enumerate(policy)? {
        println!("{}", entry?);
        count += 1;
    }

    tracing::debug!(count, manifest = %registry.manifest_path(), "Listed installations");
    Ok(())
}
