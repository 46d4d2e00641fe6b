//! Error types for agentver-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from agentver-core
    #[error(transparent)]
    Core(#[from] agentver_core::Error),

    /// Error from agentver-fs
    #[error(transparent)]
    Fs(#[from] agentver_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The install sequence stopped at a stage
    #[error(transparent)]
    Install(#[from] agentver_core::InstallFailure),
}
