//! System prompt construction.

/// The two halves of a chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Platform named in the system prompt.
const HOST_OS: &str = if cfg!(target_os = "macos") {
    "macOS"
} else if cfg!(target_os = "linux") {
    "Linux"
} else if cfg!(target_os = "windows") {
    "Windows"
} else {
    "Unix-like"
};

/// Build the system instructions for a given shell dialect.
pub fn system_prompt(shell: &str) -> String {
    format!(
        r#"You are a terminal command generator. Convert natural language requests into shell commands.

Rules:
- Output ONLY the command, nothing else
- No explanations, no markdown, no code blocks
- Use {shell} syntax
- Assume {os} environment
- Use common Unix utilities (find, grep, awk, sed, etc.)
- For file searches, prefer 'find' or 'fd' if available
- For text searches, prefer 'grep' or 'rg' if available
- If the request is ambiguous, make reasonable assumptions
- Avoid destructive commands (rm -rf /, etc.) unless explicitly requested
- Use safe defaults (e.g., -i for interactive mode when deleting)

Examples:
User: find all jpg files
Output: find . -name "*.jpg"

User: list files sorted by size
Output: ls -lhS

User: find text "TODO" in all python files
Output: grep -r "TODO" --include="*.py" .

User: show disk usage
Output: df -h

User: count lines in all js files
Output: find . -name "*.js" -exec wc -l {{}} + | tail -1"#,
        shell = shell,
        os = HOST_OS,
    )
}

/// Pair the shell-specific instructions with the user's query, verbatim.
pub fn build_prompt(query: &str, shell: &str) -> Prompt {
    Prompt {
        system: system_prompt(shell),
        user: query.to_string(),
    }
}
