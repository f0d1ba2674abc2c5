//! Shell integration installer.
//!
//! Appends an `ai` wrapper function to shell startup files. The wrapper runs
//! terminalai and puts the generated command on the command line (zsh, fish)
//! or into history (bash).

use crate::client::Console;
use crate::context::Environment;
use crate::error::Error;
use anyhow::{Context, Result};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Text whose presence in a startup file means the wrapper is installed.
pub const MARKER: &str = "# terminalai - AI command generator";

const ZSH_SNIPPET: &str = r#"
# terminalai - AI command generator
function ai() {
  if [[ -z "$*" ]]; then
    echo "Usage: ai <natural language query>"
    echo "Example: ai find all jpg files"
    return 1
  fi
  local cmd
  cmd=$(terminalai "$*")
  if [[ -n "$cmd" ]]; then
    print -z "$cmd"
  fi
}
"#;

const BASH_SNIPPET: &str = r#"
# terminalai - AI command generator
function ai() {
  if [[ -z "$*" ]]; then
    echo "Usage: ai <natural language query>"
    echo "Example: ai find all jpg files"
    return 1
  fi
  local cmd
  cmd=$(terminalai "$*")
  if [[ -n "$cmd" ]]; then
    history -s "$cmd"
    echo "$cmd"
    echo "Command added to history. Press Up arrow or copy to execute."
  fi
}
"#;

const FISH_SNIPPET: &str = r#"
# terminalai - AI command generator
function ai
  if test (count $argv) -eq 0
    echo "Usage: ai <natural language query>"
    echo "Example: ai find all jpg files"
    return 1
  end
  set cmd (terminalai $argv)
  if test -n "$cmd"
    commandline -r "$cmd"
  end
end
"#;

/// Shells with a known wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
}

impl Shell {
    pub const ALL: [Shell; 3] = [Shell::Zsh, Shell::Bash, Shell::Fish];

    pub fn name(self) -> &'static str {
        match self {
            Shell::Zsh => "zsh",
            Shell::Bash => "bash",
            Shell::Fish => "fish",
        }
    }

    /// Startup file relative to the home directory.
    pub fn startup_file(self) -> &'static str {
        match self {
            Shell::Zsh => ".zshrc",
            Shell::Bash => ".bashrc",
            Shell::Fish => ".config/fish/config.fish",
        }
    }

    /// Wrapper function appended to the startup file.
    pub fn snippet(self) -> &'static str {
        match self {
            Shell::Zsh => ZSH_SNIPPET,
            Shell::Bash => BASH_SNIPPET,
            Shell::Fish => FISH_SNIPPET,
        }
    }

    /// Shell named in `$SHELL`, falling back to zsh.
    pub fn detect(login_shell: Option<&str>) -> Shell {
        let login_shell = login_shell.unwrap_or_default();
        Shell::ALL
            .into_iter()
            .find(|shell| login_shell.contains(shell.name()))
            .unwrap_or(Shell::Zsh)
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shell {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Shell::ALL
            .into_iter()
            .find(|shell| shell.name() == s)
            .ok_or_else(|| Error::configuration(format!("Unsupported shell: {}", s)))
    }
}

/// What happened to one startup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(PathBuf),
    AlreadyInstalled(PathBuf),
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallOutcome::Installed(path) => write!(f, "Added to {}", path.display()),
            InstallOutcome::AlreadyInstalled(path) => {
                write!(f, "Already installed in {}", path.display())
            }
        }
    }
}

/// Installs wrappers under a given home directory.
pub struct Installer {
    home: PathBuf,
}

impl Installer {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn startup_path(&self, shell: Shell) -> PathBuf {
        self.home.join(shell.startup_file())
    }

    /// Append the wrapper for `shell` unless the marker is already present.
    /// Existing content is never modified.
    pub fn install(&self, shell: Shell) -> Result<InstallOutcome> {
        let path = self.startup_path(shell);

        if is_installed(&path)? {
            debug!("Marker found in {}", path.display());
            return Ok(InstallOutcome::AlreadyInstalled(path));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(shell.snippet().as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(InstallOutcome::Installed(path))
    }
}

/// Whether the startup file already carries the marker. A missing file is not
/// installed; bytes that are not UTF-8 are fine.
fn is_installed(path: &Path) -> Result<bool> {
    match std::fs::read(path) {
        Ok(contents) => Ok(contents
            .windows(MARKER.len())
            .any(|window| window == MARKER.as_bytes())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Interactive setup. `only` restricts installation to one named shell and
/// skips the question; otherwise the user picks between every supported shell
/// and the detected one. Progress goes to `out`.
pub fn run<R: BufRead, W: Write, O: Write>(
    env: &Environment,
    only: Option<&str>,
    console: &mut Console<R, W>,
    out: &mut O,
) -> Result<()> {
    let home = env
        .home
        .as_deref()
        .context("Could not determine home directory")?;
    let installer = Installer::new(home);

    writeln!(out, "\nterminalai setup\n")?;
    writeln!(out, "This will add the 'ai' command to your shell configuration.\n")?;

    let detected = Shell::detect(env.login_shell.as_deref());
    let shells = match only {
        Some(name) => vec![name.parse::<Shell>()?],
        None => {
            writeln!(out, "Detected shell: {}\n", detected)?;
            out.flush()?;
            if console.confirm_all_shells()? {
                Shell::ALL.to_vec()
            } else {
                vec![detected]
            }
        }
    };

    writeln!(out, "\nInstalling...\n")?;
    for shell in &shells {
        writeln!(out, "{}:", shell)?;
        let outcome = installer.install(*shell)?;
        writeln!(out, "  {}", outcome)?;
    }

    let source_shell = if shells.contains(&detected) {
        detected
    } else {
        shells[0]
    };
    writeln!(out, "\nSetup complete!\n")?;
    writeln!(out, "To start using terminalai, either:")?;
    writeln!(out, "  1. Open a new terminal window, or")?;
    writeln!(out, "  2. Run: source ~/{}\n", source_shell.startup_file())?;
    writeln!(out, "Then try: ai find all jpg files\n")?;
    Ok(())
}
