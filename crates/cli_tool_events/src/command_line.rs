//! Minimal POSIX-shell lexing: command segments and words.
//!
//! Only what detection and prompt extraction need. No expansion is performed
//! and unterminated quotes simply run to the end of the input.

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShellWord {
    pub text: String,
    /// True when the word starts with a quoted or escaped character, which
    /// keeps it from being read as an option, assignment or redirection.
    pub quoted: bool,
}

impl ShellWord {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// An unquoted `NAME=value` prefix such as `FOO=1 codex ...`.
    pub fn is_env_assignment(&self) -> bool {
        if self.quoted {
            return false;
        }
        let Some((name, _)) = self.text.split_once('=') else {
            return false;
        };
        let mut chars = name.chars();
        matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
            && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
    }

    /// An unquoted redirection operator, optionally with its target attached
    /// (`>`, `2>>`, `&>`, `<`, `2>/dev/null`, `2>&1`).
    pub fn is_redirection(&self) -> bool {
        if self.quoted {
            return false;
        }
        let rest = self.text.trim_start_matches(|c: char| c.is_ascii_digit());
        let rest = rest.strip_prefix('&').unwrap_or(rest);
        rest.starts_with('>') || rest.starts_with('<')
    }

    /// A redirection operator whose target is the following word.
    pub fn redirection_needs_target(&self) -> bool {
        self.is_redirection()
            && self
                .text
                .trim_end_matches(['>', '<'])
                .chars()
                .all(|c| c.is_ascii_digit() || c == '&')
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Quote {
    None,
    Single,
    Double,
    AnsiC,
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct Heredoc {
    delimiter: String,
    /// `<<-` form: leading tabs are ignored when matching the delimiter.
    strip_tabs: bool,
}

/// Splits a command line on `;`, `|`, `||`, `&&`, `&` and newlines that
/// appear outside quotes. Returned slices are trimmed; empty ones dropped.
///
/// Here-document bodies are data, not commands: after the newline that ends
/// a line carrying `<<WORD`, everything up to the closing `WORD` line is
/// skipped and belongs to no segment.
pub fn split_segments(command: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = command.char_indices().collect();
    let mut segments = Vec::new();
    let mut quote = Quote::None;
    let mut pending_heredocs: Vec<Heredoc> = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, ch) = chars[i];
        let next = chars.get(i + 1).map(|(_, c)| *c);
        let prev = i.checked_sub(1).map(|p| chars[p].1);
        match quote {
            Quote::Single => {
                if ch == '\'' {
                    quote = Quote::None;
                }
            }
            Quote::Double | Quote::AnsiC => {
                if ch == '\\' {
                    i += 1;
                } else if (quote == Quote::Double && ch == '"')
                    || (quote == Quote::AnsiC && ch == '\'')
                {
                    quote = Quote::None;
                }
            }
            Quote::None => match ch {
                '\\' => i += 1,
                '\'' if prev == Some('$') => quote = Quote::AnsiC,
                '\'' => quote = Quote::Single,
                '"' => quote = Quote::Double,
                ';' | '\n' => {
                    push_segment(command, start, pos, &mut segments);
                    start = pos + ch.len_utf8();
                    if ch == '\n' && !pending_heredocs.is_empty() {
                        start = skip_heredoc_bodies(command, start, pending_heredocs.drain(..));
                        i = chars.partition_point(|(p, _)| *p < start);
                        continue;
                    }
                }
                '<' if next == Some('<') => {
                    if chars.get(i + 2).map(|(_, c)| *c) == Some('<') {
                        // `<<<` here-string: no body follows.
                        i += 2;
                    } else if let Some((heredoc, end)) = read_heredoc_delimiter(&chars, i + 2) {
                        pending_heredocs.push(heredoc);
                        i = end;
                        continue;
                    } else {
                        i += 1;
                    }
                }
                '|' | '&' => {
                    let doubled = next == Some(ch);
                    let is_redirect = ch == '&'
                        && !doubled
                        && (matches!(prev, Some('>') | Some('<')) || next == Some('>'));
                    if !is_redirect {
                        push_segment(command, start, pos, &mut segments);
                        let width = if doubled { 2 } else { 1 };
                        start = pos + width;
                        i += width - 1;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    push_segment(command, start, command.len(), &mut segments);
    segments
}

/// Reads the delimiter word after `<<` (or `<<-`), removing its quotes.
/// Returns the heredoc and the index of the first char after the word.
fn read_heredoc_delimiter(chars: &[(usize, char)], from: usize) -> Option<(Heredoc, usize)> {
    let mut j = from;
    let strip_tabs = chars.get(j).map(|(_, c)| *c) == Some('-');
    if strip_tabs {
        j += 1;
    }
    while matches!(chars.get(j), Some((_, ' ' | '\t'))) {
        j += 1;
    }

    let mut delimiter = String::new();
    let mut quote: Option<char> = None;
    while let Some(&(_, c)) = chars.get(j) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => delimiter.push(c),
            None => match c {
                '\'' | '"' => quote = Some(c),
                '\\' => {
                    j += 1;
                    if let Some(&(_, escaped)) = chars.get(j) {
                        delimiter.push(escaped);
                    }
                }
                c if c.is_whitespace() || matches!(c, ';' | '|' | '&' | '<' | '>' | '(' | ')') => {
                    break
                }
                _ => delimiter.push(c),
            },
        }
        j += 1;
    }

    (!delimiter.is_empty()).then(|| {
        (
            Heredoc {
                delimiter,
                strip_tabs,
            },
            j,
        )
    })
}

/// Skips the bodies of `heredocs` in order, starting at byte `from`, and
/// returns the byte offset just past the last closing delimiter line. An
/// unterminated body runs to the end of the command.
fn skip_heredoc_bodies(
    command: &str,
    from: usize,
    heredocs: impl Iterator<Item = Heredoc>,
) -> usize {
    let mut pos = from;
    for heredoc in heredocs {
        loop {
            if pos >= command.len() {
                return command.len();
            }
            let line_end = command[pos..]
                .find('\n')
                .map_or(command.len(), |offset| pos + offset);
            let line = command[pos..line_end].trim_end_matches('\r');
            let line = if heredoc.strip_tabs {
                line.trim_start_matches('\t')
            } else {
                line
            };
            pos = (line_end + 1).min(command.len());
            if line == heredoc.delimiter {
                break;
            }
        }
    }
    pos
}

fn push_segment<'a>(command: &'a str, from: usize, to: usize, segments: &mut Vec<&'a str>) {
    let segment = command[from..to].trim();
    if !segment.is_empty() {
        segments.push(segment);
    }
}

/// Splits one segment into words, removing quotes and processing escapes.
pub fn split_words(segment: &str) -> Vec<ShellWord> {
    let mut words = Vec::new();
    let mut current: Option<ShellWord> = None;
    let mut quote = Quote::None;
    let mut chars = segment.chars().peekable();

    fn word(current: &mut Option<ShellWord>, quoted: bool) -> &mut ShellWord {
        current.get_or_insert_with(|| ShellWord {
            text: String::new(),
            quoted,
        })
    }

    while let Some(ch) = chars.next() {
        match quote {
            Quote::Single => {
                if ch == '\'' {
                    quote = Quote::None;
                } else {
                    word(&mut current, true).text.push(ch);
                }
            }
            Quote::Double => match ch {
                '"' => quote = Quote::None,
                '\\' => match chars.next() {
                    Some('\n') => {}
                    Some(c @ ('"' | '\\' | '$' | '`')) => word(&mut current, true).text.push(c),
                    Some(c) => {
                        let w = word(&mut current, true);
                        w.text.push('\\');
                        w.text.push(c);
                    }
                    None => word(&mut current, true).text.push('\\'),
                },
                _ => word(&mut current, true).text.push(ch),
            },
            Quote::AnsiC => match ch {
                '\'' => quote = Quote::None,
                '\\' => {
                    let w = word(&mut current, true);
                    match chars.next() {
                        Some('n') => w.text.push('\n'),
                        Some('t') => w.text.push('\t'),
                        Some('r') => w.text.push('\r'),
                        Some(c @ ('\\' | '\'' | '"')) => w.text.push(c),
                        Some(c) => {
                            w.text.push('\\');
                            w.text.push(c);
                        }
                        None => w.text.push('\\'),
                    }
                }
                _ => word(&mut current, true).text.push(ch),
            },
            Quote::None => match ch {
                c if c.is_whitespace() => {
                    if let Some(done) = current.take() {
                        words.push(done);
                    }
                }
                '\\' => match chars.next() {
                    Some('\n') => {}
                    Some(c) => word(&mut current, true).text.push(c),
                    None => word(&mut current, false).text.push('\\'),
                },
                '\'' => {
                    word(&mut current, true);
                    quote = Quote::Single;
                }
                '"' => {
                    word(&mut current, true);
                    quote = Quote::Double;
                }
                '$' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    word(&mut current, true);
                    quote = Quote::AnsiC;
                }
                _ => word(&mut current, false).text.push(ch),
            },
        }
    }
    if let Some(done) = current {
        words.push(done);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segment: &str) -> Vec<String> {
        split_words(segment).into_iter().map(|w| w.text).collect()
    }

    #[test]
    fn splits_on_every_separator() {
        assert_eq!(
            split_segments("a; b | c && d || e & f\ng"),
            vec!["a", "b", "c", "d", "e", "f", "g"]
        );
    }

    #[test]
    fn separators_inside_quotes_are_ignored() {
        assert_eq!(
            split_segments(r#"echo "a; b | c" && printf 'x && y' ; z"#),
            vec![r#"echo "a; b | c""#, "printf 'x && y'", "z"]
        );
    }

    #[test]
    fn escaped_separator_does_not_split() {
        assert_eq!(split_segments(r"echo a\; b"), vec![r"echo a\; b"]);
    }

    #[test]
    fn fd_redirections_are_not_background_separators() {
        assert_eq!(
            split_segments("codex exec \"q\" 2>&1 | tee out &> log"),
            vec!["codex exec \"q\" 2>&1", "tee out &> log"]
        );
    }

    #[test]
    fn ansi_c_quotes_hide_separators() {
        assert_eq!(
            split_segments(r"gemini -p $'it\'s; fine' | cat"),
            vec![r"gemini -p $'it\'s; fine'", "cat"]
        );
    }

    #[test]
    fn heredoc_body_is_not_split_into_segments() {
        assert_eq!(
            split_segments("cat > notes.md <<'EOF'\ngemini -p is the other model\nEOF"),
            vec!["cat > notes.md <<'EOF'"]
        );
    }

    #[test]
    fn splitting_resumes_after_heredoc_delimiter() {
        assert_eq!(
            split_segments(
                "cat > /tmp/p.md <<EOF && echo done\ncodex exec x; y\nEOF\ncodex exec - < /tmp/p.md"
            ),
            vec!["cat > /tmp/p.md <<EOF", "echo done", "codex exec - < /tmp/p.md"]
        );
    }

    #[test]
    fn dash_heredoc_matches_tab_indented_delimiter() {
        assert_eq!(
            split_segments("cat <<-\"END\"\n\tgemini -p x\n\tEND\nls"),
            vec!["cat <<-\"END\"", "ls"]
        );
    }

    #[test]
    fn multiple_heredocs_on_one_line_are_skipped_in_order() {
        assert_eq!(
            split_segments("paste <<A <<B\ncodex\nA\ngemini\nB\nwc"),
            vec!["paste <<A <<B", "wc"]
        );
    }

    #[test]
    fn unterminated_heredoc_swallows_the_rest() {
        assert_eq!(split_segments("cat <<EOF\ncodex exec q"), vec!["cat <<EOF"]);
    }

    #[test]
    fn here_string_and_quoted_markers_are_not_heredocs() {
        assert_eq!(
            split_segments("cat <<< word\ncodex exec q"),
            vec!["cat <<< word", "codex exec q"]
        );
        assert_eq!(
            split_segments("echo '<<EOF'\ncodex exec q"),
            vec!["echo '<<EOF'", "codex exec q"]
        );
    }

    #[test]
    fn words_strip_quotes_and_process_escapes() {
        assert_eq!(
            texts(r#"codex exec --full-auto "say \"hi\"" 'lit $x' $'a\nb' plain\ word"#),
            vec!["codex", "exec", "--full-auto", "say \"hi\"", "lit $x", "a\nb", "plain word"]
        );
    }

    #[test]
    fn adjacent_quoted_parts_join_into_one_word() {
        let words = split_words(r#"pre"mid"'end' "lead"tail"#);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "premidend");
        assert!(!words[0].quoted);
        assert_eq!(words[1].text, "leadtail");
        assert!(words[1].quoted);
    }

    #[test]
    fn empty_quotes_still_produce_a_word() {
        let words = split_words(r#"gemini -p """#);
        assert_eq!(words.len(), 3);
        assert_eq!(words[2].text, "");
    }

    #[test]
    fn env_assignment_and_redirection_shapes() {
        let words = split_words(r#"FOO=1 _X="a b" "A=b" 2>/dev/null > 2>> out 2>&1 ">""#);
        let flags: Vec<(bool, bool)> = words
            .iter()
            .map(|w| (w.is_env_assignment(), w.is_redirection()))
            .collect();
        assert_eq!(
            flags,
            vec![
                (true, false),
                (true, false),
                (false, false),
                (false, true),
                (false, true),
                (false, true),
                (false, false),
                (false, true),
                (false, false),
            ]
        );
        assert!(!words[3].redirection_needs_target());
        assert!(words[4].redirection_needs_target());
        assert!(words[5].redirection_needs_target());
        assert!(!words[7].redirection_needs_target());
    }
}
