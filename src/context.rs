//! Process environment captured once at start-up.
//!
//! Everything terminalai reads from the environment lives in [`Environment`],
//! which is passed down explicitly instead of being looked up ad hoc.

use std::path::PathBuf;

/// Environment variable holding the OpenRouter credential.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "TERMINALAI_MODEL";
/// Environment variable overriding the shell dialect.
pub const SHELL_VAR: &str = "TERMINALAI_SHELL";

/// Shell dialect used when nothing else is known.
pub const DEFAULT_SHELL: &str = "zsh";

/// Snapshot of the environment relevant to terminalai.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub shell_override: Option<String>,
    /// The user's login shell (`$SHELL`), usually a full path.
    pub login_shell: Option<String>,
    pub home: Option<PathBuf>,
}

impl Environment {
    /// Read the real process environment.
    pub fn capture() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), dirs::home_dir())
    }

    /// Build a snapshot from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F, home: Option<PathBuf>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR),
            shell_override: get(SHELL_VAR),
            login_shell: get("SHELL"),
            home,
        }
    }

    /// Resolve the shell dialect for command generation: an explicit choice,
    /// then `TERMINALAI_SHELL`, then the basename of `$SHELL`, then zsh.
    pub fn resolve_shell(&self, explicit: Option<&str>) -> String {
        explicit
            .filter(|s| !s.is_empty())
            .or(self.shell_override.as_deref())
            .map(str::to_string)
            .or_else(|| self.login_shell_name())
            .unwrap_or_else(|| DEFAULT_SHELL.to_string())
    }

    /// Basename of `$SHELL`, e.g. `zsh` for `/bin/zsh`.
    fn login_shell_name(&self) -> Option<String> {
        self.login_shell
            .as_deref()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}
