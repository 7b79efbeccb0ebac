//! Field Extractor: model, prompt and streams for one detected invocation.

use crate::command_line::ShellWord;
use crate::detect::{CliTool, ToolInvocation};
use crate::normalized::{ExitCode, NormalizedPayload};

const CODEX_VALUE_OPTIONS: &[&str] = &[
    "-m",
    "--model",
    "-s",
    "--sandbox",
    "-C",
    "--cd",
    "-c",
    "--config",
    "-p",
    "--profile",
    "-i",
    "--image",
    "-o",
    "--output-last-message",
    "--output-schema",
    "--color",
    "-a",
    "--ask-for-approval",
    "--add-dir",
];

/// Codex subcommands that never take a prompt.
const CODEX_NON_PROMPT_SUBCOMMANDS: &[&str] = &[
    "login",
    "logout",
    "mcp",
    "mcp-server",
    "app-server",
    "apply",
    "completion",
    "sandbox",
    "debug",
    "cloud",
    "features",
    "help",
];

const GEMINI_VALUE_OPTIONS: &[&str] = &[
    "-m",
    "--model",
    "-p",
    "--prompt",
    "-i",
    "--prompt-interactive",
    "--approval-mode",
    "-o",
    "--output-format",
    "-e",
    "--extensions",
    "--include-directories",
];

const GEMINI_NON_PROMPT_SUBCOMMANDS: &[&str] = &["mcp", "extensions"];

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExtractedFields {
    pub tool: CliTool,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: ExitCode,
}

impl ExtractedFields {
    /// Limits every text field to `max_chars` characters, appending a
    /// truncation marker to any field that was cut.
    pub fn truncated(self, max_chars: usize) -> Self {
        Self {
            prompt: self.prompt.map(|prompt| truncate_text(&prompt, max_chars)),
            stdout: truncate_text(&self.stdout, max_chars),
            stderr: truncate_text(&self.stderr, max_chars),
            ..self
        }
    }
}

pub fn extract_fields(invocation: &ToolInvocation, payload: NormalizedPayload) -> ExtractedFields {
    let scanned = match invocation.tool {
        CliTool::Codex => ScannedArgs::scan(&invocation.args, CODEX_VALUE_OPTIONS),
        CliTool::Gemini => ScannedArgs::scan(&invocation.args, GEMINI_VALUE_OPTIONS),
    };
    let (prompt, model) = match invocation.tool {
        CliTool::Codex => (codex_prompt(&scanned), codex_model(&scanned)),
        CliTool::Gemini => (gemini_prompt(&scanned), scanned.model_flag()),
    };
    ExtractedFields {
        tool: invocation.tool,
        model: model.map(str::to_string),
        prompt: prompt.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
        stdout: payload.stdout,
        stderr: payload.stderr,
        exit_code: payload.exit_code,
    }
}

/// Cuts `text` to at most `max_chars` characters. A cut string gets
/// `... [truncated, N total chars]` appended, N being the original length.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let total = text.chars().count();
    format!("{}... [truncated, {total} total chars]", &text[..cut])
}

#[derive(Debug, Default)]
struct ScannedArgs<'a> {
    positionals: Vec<&'a str>,
    options: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> ScannedArgs<'a> {
    fn scan(args: &'a [ShellWord], value_options: &[&str]) -> Self {
        let mut scanned = Self::default();
        let mut words = args.iter();
        let mut only_positionals = false;

        while let Some(word) = words.next() {
            let text = word.as_str();
            if only_positionals || word.quoted {
                scanned.positionals.push(text);
                continue;
            }
            if word.is_redirection() {
                if word.redirection_needs_target() {
                    words.next();
                }
                continue;
            }
            if text == "--" {
                only_positionals = true;
                continue;
            }
            if text.starts_with("--") {
                match text.split_once('=') {
                    Some((name, value)) => scanned.options.push((name, Some(value))),
                    None if value_options.contains(&text) => {
                        let value = words.next().map(ShellWord::as_str);
                        scanned.options.push((text, value));
                    }
                    None => scanned.options.push((text, None)),
                }
                continue;
            }
            if text.len() > 1 && text.starts_with('-') {
                let value = if value_options.contains(&text) {
                    words.next().map(ShellWord::as_str)
                } else {
                    None
                };
                scanned.options.push((text, value));
                continue;
            }
            scanned.positionals.push(text);
        }
        scanned
    }

    fn option_values<'s>(
        &'s self,
        names: &'static [&'static str],
    ) -> impl Iterator<Item = &'a str> + 's {
        self.options
            .iter()
            .filter(move |(name, _)| names.contains(name))
            .filter_map(|(_, value)| *value)
    }

    fn model_flag(&self) -> Option<&'a str> {
        self.option_values(&["--model", "-m"])
            .find(|value| !value.is_empty())
    }
}

fn codex_prompt<'a>(scanned: &ScannedArgs<'a>) -> Option<&'a str> {
    let mut positionals = scanned.positionals.iter().copied().peekable();
    match positionals.peek() {
        Some(&("exec" | "e")) => {
            positionals.next();
        }
        Some(first) if CODEX_NON_PROMPT_SUBCOMMANDS.contains(first) => return None,
        _ => {}
    }
    positionals.next().filter(|prompt| *prompt != "-")
}

fn codex_model<'a>(scanned: &ScannedArgs<'a>) -> Option<&'a str> {
    scanned.model_flag().or_else(|| {
        scanned
            .option_values(&["-c", "--config"])
            .filter_map(|value| value.strip_prefix("model="))
            .map(|value| value.trim_matches(['"', '\'']))
            .find(|value| !value.is_empty())
    })
}

fn gemini_prompt<'a>(scanned: &ScannedArgs<'a>) -> Option<&'a str> {
    if let Some(prompt) = scanned.option_values(&["-p", "--prompt"]).next() {
        return Some(prompt);
    }
    match scanned.positionals.first() {
        Some(first) if GEMINI_NON_PROMPT_SUBCOMMANDS.contains(first) => None,
        first => first.copied(),
    }
}
