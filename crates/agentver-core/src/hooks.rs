//! Post-install hooks
//!
//! The last install stage hands control to a per-platform hook. The shipped
//! hooks either do nothing or run a script that the installation carries
//! under `scripts/<platform>/`, as a subprocess with the install context
//! exported as environment variables.

use std::collections::HashMap;
use std::process::Command;

use agentver_fs::NormalizedPath;

use crate::error::{Error, Result};

/// Values available to a post-install hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    pub installation: NormalizedPath,
    pub version: String,
    pub etc_dir: NormalizedPath,
}

impl HookContext {
    pub fn new(installation: NormalizedPath, version: impl Into<String>, etc_dir: NormalizedPath) -> Self {
        Self {
            installation,
            version: version.into(),
            etc_dir,
        }
    }

    /// Variables exported to the hook process and substituted into its args
    pub fn vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert(
            "AGENTVER_INSTALL_DIR".to_string(),
            self.installation.to_native().display().to_string(),
        );
        vars.insert("AGENTVER_VERSION".to_string(), self.version.clone());
        vars.insert(
            "AGENTVER_ETC_DIR".to_string(),
            self.etc_dir.to_native().display().to_string(),
        );
        vars
    }
}

/// Platform action run after a successful install.
pub trait PostInstallHook: std::fmt::Debug + Send + Sync {
    /// Short name used in logs and in `HookFailed`
    fn name(&self) -> &str;

    fn run(&self, ctx: &HookContext) -> Result<()>;
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl PostInstallHook for NoopHook {
    fn name(&self) -> &str {
        "noop"
    }

    fn run(&self, ctx: &HookContext) -> Result<()> {
        tracing::debug!(installation = %ctx.installation, "No post-install hook configured");
        Ok(())
    }
}

/// Runs a script shipped inside the installation.
///
/// The script path is relative to the installation root. A missing script
/// means the installation has nothing to do on this platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHook {
    interpreter: Vec<String>,
    script: String,
    args: Vec<String>,
}

impl ScriptHook {
    /// `interpreter` is the program (and leading args) the script is passed to,
    /// e.g. `["sh"]` or `["cmd", "/C"]`.
    pub fn new<I, S>(interpreter: I, script: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interpreter: interpreter.into_iter().map(Into::into).collect(),
            script: script.into(),
            args: Vec::new(),
        }
    }

    /// Extra args passed after the script. `${VAR}` placeholders are
    /// replaced with [`HookContext::vars`].
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl PostInstallHook for ScriptHook {
    fn name(&self) -> &str {
        &self.script
    }

    fn run(&self, ctx: &HookContext) -> Result<()> {
        let script = ctx.installation.join(&self.script);
        if !script.is_file() {
            tracing::debug!(script = %script, "Post-install script not present, nothing to do");
            return Ok(());
        }

        let Some((program, leading)) = self.interpreter.split_first() else {
            return Err(Error::hook_failed(&self.script, "no interpreter configured"));
        };

        let vars = ctx.vars();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| substitute_vars(arg, &vars))
            .collect();

        tracing::info!(script = %script, "Running post-install script");
        let output = Command::new(program)
            .args(leading)
            .arg(script.to_native())
            .args(&args)
            .current_dir(ctx.installation.to_native())
            .envs(&vars)
            .output()
            .map_err(|e| Error::hook_failed(&self.script, format!("failed to start {program}: {e}")))?;

        if output.status.success() {
            tracing::debug!(
                stdout = %String::from_utf8_lossy(&output.stdout).trim(),
                "Post-install script finished"
            );
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            format!(
                "Hook exited with non-zero status (exit code: {:?})",
                output.status.code()
            )
        } else {
            format!(
                "Hook exited with non-zero status (exit code: {:?}): {}",
                output.status.code(),
                stderr
            )
        };
        Err(Error::hook_failed(&self.script, message))
    }
}

/// Substitute ${VAR_NAME} patterns in a string with context variables
fn substitute_vars(input: &str, vars: &HashMap<String, String>) -> String {
    let mut result = input.to_string();
    for (key, value) in vars {
        let pattern = format!("${{{}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}
