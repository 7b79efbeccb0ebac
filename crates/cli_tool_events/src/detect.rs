//! Command Classifier: finds which known CLI a shell command line runs.

use serde::Serialize;

use crate::command_line::{split_segments, split_words, ShellWord};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CliTool {
    Codex,
    Gemini,
}

impl CliTool {
    pub const ALL: [CliTool; 2] = [CliTool::Codex, CliTool::Gemini];

    pub fn binary_name(self) -> &'static str {
        match self {
            CliTool::Codex => "codex",
            CliTool::Gemini => "gemini",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CliTool::Codex => "Codex",
            CliTool::Gemini => "Gemini",
        }
    }

    fn from_command_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.binary_name() == word)
    }
}

/// The matched tool plus the words of the segment that invoked it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ToolInvocation {
    pub tool: CliTool,
    /// Words after the command name, environment prefixes removed.
    pub args: Vec<ShellWord>,
}

/// Returns the tool invoked by the first command segment whose command word
/// is a known binary, or `None`.
///
/// Only the command position of each segment counts, so a tool name that
/// appears inside an argument (e.g. a prompt mentioning "gemini") is ignored.
pub fn detect_tool(command: &str) -> Option<ToolInvocation> {
    split_segments(command).into_iter().find_map(|segment| {
        let mut words = split_words(segment)
            .into_iter()
            .skip_while(ShellWord::is_env_assignment);
        let tool = CliTool::from_command_word(words.next()?.as_str())?;
        Some(ToolInvocation {
            tool,
            args: words.collect(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(command: &str) -> Option<CliTool> {
        detect_tool(command).map(|invocation| invocation.tool)
    }

    #[test]
    fn detects_tool_at_start_of_line() {
        assert_eq!(tool(r#"codex exec --full-auto "q""#), Some(CliTool::Codex));
        assert_eq!(tool(r#"  gemini -p "q""#), Some(CliTool::Gemini));
    }

    #[test]
    fn detects_tool_after_each_separator() {
        assert_eq!(tool("cd repo && codex exec q"), Some(CliTool::Codex));
        assert_eq!(tool("cd repo; gemini -p q"), Some(CliTool::Gemini));
        assert_eq!(tool("cat f | gemini -p q"), Some(CliTool::Gemini));
        assert_eq!(tool("false || codex exec q"), Some(CliTool::Codex));
    }

    #[test]
    fn tool_name_inside_prompt_does_not_match() {
        assert_eq!(
            tool(r#"codex exec --full-auto "compare with gemini; then gemini -p x""#),
            Some(CliTool::Codex)
        );
        assert_eq!(tool(r#"echo "explain what gemini is""#), None);
        assert_eq!(tool("grep codex notes.md"), None);
    }

    #[test]
    fn heredoc_body_lines_are_not_commands() {
        assert_eq!(
            tool("cat > notes.md <<'EOF'\ngemini -p is the other model we compare against\nEOF"),
            None
        );
        assert_eq!(
            tool("cat > /tmp/p.md <<'EOF'\ngemini should not be used here\nEOF\ncodex exec - < /tmp/p.md"),
            Some(CliTool::Codex)
        );
    }

    #[test]
    fn first_matching_segment_wins() {
        assert_eq!(
            tool("gemini -p a && codex exec b"),
            Some(CliTool::Gemini)
        );
    }

    #[test]
    fn prefix_of_binary_name_is_not_a_match() {
        assert_eq!(tool("codex-wrapper run"), None);
        assert_eq!(tool("geminix -p q"), None);
        assert_eq!(tool("Codex exec q"), None);
    }

    #[test]
    fn environment_prefix_is_skipped() {
        let invocation = detect_tool("RUST_LOG=debug codex exec q").unwrap();
        assert_eq!(invocation.tool, CliTool::Codex);
        assert_eq!(invocation.args[0].as_str(), "exec");
    }

    #[test]
    fn empty_command_matches_nothing() {
        assert_eq!(tool(""), None);
        assert_eq!(tool(" ; && "), None);
    }

    #[test]
    fn tool_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CliTool::Gemini).unwrap(), "\"gemini\"");
    }
}
