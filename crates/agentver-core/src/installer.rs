//! Install orchestration
//!
//! `configure` runs a fixed sequence of stages. Each stage either succeeds
//! and hands over to the next, or the run stops with an [`InstallFailure`]
//! naming the stage. Nothing is retried, skipped or rolled back: work done
//! by earlier stages stays on disk.

use std::fmt;

use agentver_fs::{NormalizedPath, io};

use crate::error::{Error, Result};
use crate::hooks::HookContext;
use crate::merge::{self, MergeReport};
use crate::platform::PlatformContext;
use crate::registry::Registration;
use crate::store::ConfigStore;
use crate::validator;

/// Install sequence stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validating,
    EnsuringStorageDir,
    Activating,
    Registering,
    MergingConfig,
    RunningPostInstallHook,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "validation"),
            Self::EnsuringStorageDir => write!(f, "storage directory setup"),
            Self::Activating => write!(f, "activation"),
            Self::Registering => write!(f, "registration"),
            Self::MergingConfig => write!(f, "config merge"),
            Self::RunningPostInstallHook => write!(f, "post-install hook"),
            Self::Done => write!(f, "completion"),
        }
    }
}

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub installation: NormalizedPath,
    pub version: String,
    pub registration: Registration,
    pub merge: MergeReport,
    /// Whether the etc directory had to be created
    pub created_storage_dir: bool,
}

/// An install that stopped at `stage`.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct InstallFailure {
    pub stage: Stage,
    #[source]
    pub error: Error,
}

/// Runs the install sequence against one platform context and config store.
pub struct Installer<'a> {
    ctx: &'a PlatformContext,
    store: &'a mut dyn ConfigStore,
    stage: Stage,
}

impl<'a> Installer<'a> {
    pub fn new(ctx: &'a PlatformContext, store: &'a mut dyn ConfigStore) -> Self {
        Self {
            ctx,
            store,
            stage: Stage::Validating,
        }
    }

    /// Stage the installer is in, or stopped in.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Install the agent found at `path`.
    pub fn run(&mut self, path: &NormalizedPath) -> std::result::Result<InstallReport, InstallFailure> {
        let span = tracing::info_span!("install", path = %path);
        let _guard = span.enter();
        let ctx = self.ctx;

        self.enter(Stage::Validating);
        let version = validator::validate(path).map_err(|e| self.fail(e))?;

        self.enter(Stage::EnsuringStorageDir);
        let etc_dir = ctx.etc_dir();
        let created_storage_dir = io::ensure_dir(etc_dir)
            .map_err(|e| self.fail(Error::storage_dir(etc_dir.clone(), e)))?;

        self.enter(Stage::Activating);
        ctx.switch().activate(path).map_err(|e| self.fail(e))?;

        self.enter(Stage::Registering);
        let registration = ctx.registry().register(path).map_err(|e| self.fail(e))?;

        self.enter(Stage::MergingConfig);
        let merge = merge::merge(path, &mut *self.store).map_err(|e| self.fail(e))?;

        self.enter(Stage::RunningPostInstallHook);
        let hook_ctx = HookContext::new(path.clone(), version.clone(), etc_dir.clone());
        self.run_hook(&hook_ctx).map_err(|e| self.fail(e))?;

        self.enter(Stage::Done);
        tracing::info!(version = %version, "Installation configured");
        Ok(InstallReport {
            installation: path.clone(),
            version,
            registration,
            merge,
            created_storage_dir,
        })
    }

    fn run_hook(&self, ctx: &HookContext) -> Result<()> {
        let hook = self.ctx.hook();
        tracing::debug!(hook = hook.name(), "Running post-install hook");
        hook.run(ctx)
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(stage = %stage, "Entering stage");
        self.stage = stage;
    }

    fn fail(&self, error: Error) -> InstallFailure {
        tracing::error!(stage = %self.stage, origin = %error.origin(), error = %error, "Install failed");
        InstallFailure {
            stage: self.stage,
            error,
        }
    }
}
