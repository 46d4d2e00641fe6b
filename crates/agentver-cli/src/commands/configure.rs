//! Configure command: install sequence for one installation directory

use std::path::Path;

use colored::Colorize;

use agentver_core::{Installer, PlatformContext, Registration};
use agentver_fs::NormalizedPath;

use super::absolute;
use crate::error::Result;

/// Run the configure command
pub fn run_configure(ctx: &PlatformContext, path: &Path) -> Result<()> {
    let installation = NormalizedPath::new(absolute(path)?);
    let mut store = ctx.config_store();

    let report = Installer::new(ctx, &mut store).run(&installation)?;

    println!(
        "{} agent {} at {}",
        "Configured".green().bold(),
        report.version,
        report.installation
    );
    if report.registration == Registration::AlreadyPresent {
        println!("  {}", "already registered".dimmed());
    }
    println!(
        "  {} {} config keys set, {} cleared",
        "config:".dimmed(),
        report.merge.supplied.len(),
        report.merge.cleared.len()
    );
    Ok(())
}
