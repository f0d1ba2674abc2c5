//! Normalization of raw model replies into a bare command.

/// Characters that may wrap a whole reply and get stripped as a pair.
const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Turn a model reply into a single command string.
///
/// Trims whitespace, removes one Markdown fence pair and one wrapping quote
/// pair per pass, and repeats until nothing changes, so applying it to its own
/// output is a no-op. An empty reply stays empty.
pub fn clean_command(reply: &str) -> String {
    let mut command = reply.trim();
    loop {
        let next = strip_wrapping_quotes(strip_fences(command).trim()).trim();
        if next == command {
            return command.to_string();
        }
        command = next;
    }
}

/// Remove a leading ```` ```lang ```` opener and a trailing ```` ``` ````.
fn strip_fences(text: &str) -> &str {
    let mut text = text;
    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.split_once('\n') {
            // The rest of the opener line is a language tag only if it is a
            // single word.
            Some((tag, body)) if !tag.trim().contains(char::is_whitespace) => body,
            _ => rest,
        };
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.strip_suffix('\n').unwrap_or(rest);
    }
    text
}

/// Remove one pair of quotes, only when the same quote opens and closes the
/// whole string. Backticks also need to be the only ones in the string, so
/// `` `a` && `b` `` keeps its command substitutions.
fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in QUOTES {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            let inner = &text[1..text.len() - 1];
            if quote == '`' && inner.contains('`') {
                return text;
            }
            return inner;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_command_plain() {
        assert_eq!(clean_command("ls -la"), "ls -la");
        assert_eq!(clean_command("  ls -la \n"), "ls -la");
    }

    #[test]
    fn test_clean_command_with_code_block() {
        assert_eq!(
            clean_command("```bash\nfind . -name \"*.jpg\"\n```"),
            "find . -name \"*.jpg\""
        );
        assert_eq!(clean_command("```\ndf -h\n```"), "df -h");
        assert_eq!(clean_command("```shell-session\ndf -h\n```"), "df -h");
    }

    #[test]
    fn test_clean_command_with_inline_fence() {
        assert_eq!(clean_command("```ls -la```"), "ls -la");
    }

    #[test]
    fn test_clean_command_wrapping_quotes() {
        assert_eq!(clean_command("\"ls -la\""), "ls -la");
        assert_eq!(clean_command("'ls -la'"), "ls -la");
        assert_eq!(clean_command("`ls -la`"), "ls -la");
    }

    #[test]
    fn test_clean_command_keeps_multiple_backticks() {
        assert_eq!(clean_command("`a` && `b`"), "`a` && `b`");
        assert_eq!(clean_command("echo `date`"), "echo `date`");
        assert_eq!(clean_command("```\n`a` && `b`\n```"), "`a` && `b`");
    }

    #[test]
    fn test_clean_command_keeps_inner_quotes() {
        assert_eq!(clean_command("it's \"fine\""), "it's \"fine\"");
        assert_eq!(clean_command("echo \"hi\""), "echo \"hi\"");
        assert_eq!(
            clean_command("grep -r \"TODO\" --include=\"*.py\" ."),
            "grep -r \"TODO\" --include=\"*.py\" ."
        );
    }

    #[test]
    fn test_clean_command_mismatched_quotes() {
        assert_eq!(clean_command("\"ls -la'"), "\"ls -la'");
    }

    #[test]
    fn test_clean_command_lone_quote() {
        assert_eq!(clean_command("\""), "\"");
    }

    #[test]
    fn test_clean_command_empty() {
        assert_eq!(clean_command(""), "");
        assert_eq!(clean_command("   \n"), "");
        assert_eq!(clean_command("```\n```"), "");
    }

    #[test]
    fn test_clean_command_is_idempotent() {
        let replies = [
            "ls -la",
            "```bash\nfind . -name \"*.jpg\"\n```",
            "\"ls -la\"",
            "'\"ls\"'",
            "```\n```\nls\n```\n```",
            "it's \"fine\"",
            "\"",
            "``````",
            "```zsh\n'du -sh *'\n```",
            "",
        ];
        for reply in replies {
            let once = clean_command(reply);
            assert_eq!(clean_command(&once), once, "reply: {reply:?}");
        }
    }
}
