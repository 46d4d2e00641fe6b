//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

/// agentver - Manage side-by-side installations of the agent
///
/// Examples:
///   agentver --configure /opt/agent/1.2.0   # Register and activate an installation
///   agentver --list                         # Show registered installations
///   agentver --set 1.1.0                    # Switch the active version
#[derive(Parser, Debug)]
#[command(name = "agentver")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["configure", "list", "set", "current"])
))]
pub struct Cli {
    /// Configure, register and activate the installation at PATH
    #[arg(long, value_name = "PATH")]
    pub configure: Option<PathBuf>,

    /// List registered installations as VERSION:PATH
    #[arg(long)]
    pub list: bool,

    /// Activate the registered installation declaring VERSION
    #[arg(long, value_name = "VERSION")]
    pub set: Option<String>,

    /// Print the active installation as VERSION:PATH
    #[arg(long)]
    pub current: bool,

    /// Skip installations with unreadable metadata instead of failing
    #[arg(long)]
    pub skip_invalid: bool,

    /// Directory holding versions.json and config.json
    #[arg(long, env = "AGENTVER_ETC_DIR", value_name = "DIR")]
    pub etc_dir: Option<PathBuf>,

    /// Location of the active-version link
    #[arg(long, env = "AGENTVER_LINK", value_name = "PATH")]
    pub link: Option<PathBuf>,

    /// Entry-point file name under <installation>/bin/
    #[arg(long, env = "AGENTVER_ENTRYPOINT", value_name = "NAME")]
    pub entrypoint: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// The one action selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Configure(PathBuf),
    List,
    Set(String),
    Current,
}

impl Cli {
    pub fn action(&self) -> Action {
        if let Some(path) = &self.configure {
            Action::Configure(path.clone())
        } else if let Some(version) = &self.set {
            Action::Set(version.clone())
        } else if self.current {
            Action::Current
        } else {
            Action::List
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_configure() {
        let cli = Cli::try_parse_from(["agentver", "--configure", "/opt/agent/1.0.0"]).unwrap();
        assert_eq!(cli.action(), Action::Configure(PathBuf::from("/opt/agent/1.0.0")));
    }

    #[test]
    fn parse_set_with_overrides() {
        let cli = Cli::try_parse_from([
            "agentver",
            "--set",
            "1.1.0",
            "--etc-dir",
            "/tmp/etc",
            "--link",
            "/tmp/bin/agent",
        ])
        .unwrap();
        assert_eq!(cli.action(), Action::Set("1.1.0".to_string()));
        assert_eq!(cli.etc_dir, Some(PathBuf::from("/tmp/etc")));
        assert_eq!(cli.link, Some(PathBuf::from("/tmp/bin/agent")));
    }

    #[test]
    fn actions_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["agentver", "--list", "--set", "1.0.0"]).is_err());
        assert!(Cli::try_parse_from(["agentver", "--list", "--current"]).is_err());
    }

    #[test]
    fn an_action_is_required() {
        assert!(Cli::try_parse_from(["agentver", "--verbose"]).is_err());
    }
}
