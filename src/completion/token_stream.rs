//! Command line splitting with cursor awareness
//!
//! The line is cut at the cursor and split into words the way a shell would:
//! whitespace separates words, a double-quoted span stays in one word and
//! backslash escapes are kept literally. Quotes and backslashes remain part
//! of the words so that candidates can be matched against what was typed.

/// Words that turn the rest of the line into a help query
pub const HELP_FLAGS: [&str; 5] = ["-h", "-help", "-ha", "-hx", "-hh"];

/// A command line cut at the cursor and split into words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Words up to the cursor; the last one is being typed
    pub words: Vec<String>,
    /// A closing quote was appended to balance the line
    pub quote_synthesized: bool,
}

impl CommandLine {
    /// Split `line` as seen with the cursor at `cursor` (a character index).
    ///
    /// A cursor past the end of the line selects the whole line.
    pub fn parse(line: &str, cursor: usize) -> Self {
        let mut text: String = line.chars().take(cursor).collect();

        let quote_synthesized = count_unescaped_quotes(&text) % 2 == 1;
        if quote_synthesized {
            text.push('"');
        }

        let (mut words, trailing_separator) = split_words(&text);
        if trailing_separator {
            words.push(String::new());
        }

        Self {
            words,
            quote_synthesized,
        }
    }

    /// The word under the cursor, empty when a new word is starting
    pub fn current_word(&self) -> &str {
        self.words.last().map(String::as_str).unwrap_or("")
    }

    /// The word before the current one
    pub fn previous_word(&self) -> &str {
        match self.words.len() {
            0 | 1 => "",
            n => &self.words[n - 2],
        }
    }

    /// Words before the current one
    pub fn words_before_cursor(&self) -> &[String] {
        let end = self.words.len().saturating_sub(1);
        &self.words[..end]
    }

    /// A help flag appears before the current word
    pub fn help_requested(&self) -> bool {
        self.words_before_cursor()
            .iter()
            .any(|w| HELP_FLAGS.contains(&w.as_str()))
    }
}

pub(super) fn count_unescaped_quotes(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => count += 1,
            _ => {}
        }
    }
    count
}

/// Split into words; the flag tells whether the text ends on a bare separator
fn split_words(text: &str) -> (Vec<String>, bool) {
    let mut words = Vec::new();
    let mut word: Option<String> = None;
    let mut trailing_separator = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            if let Some(done) = word.take() {
                words.push(done);
            }
            trailing_separator = true;
            continue;
        }

        trailing_separator = false;
        let current = word.get_or_insert_with(String::new);
        current.push(c);

        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '"' => {
                while let Some(inner) = chars.next() {
                    current.push(inner);
                    match inner {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                current.push(escaped);
                            }
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(done) = word {
        words.push(done);
    }
    (words, trailing_separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        CommandLine::parse(line, line.chars().count()).words
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(words("gpac -i in.mp4 inspect"), ["gpac", "-i", "in.mp4", "inspect"]);
    }

    #[test]
    fn test_trailing_space_starts_new_word() {
        let line = CommandLine::parse("gpac -h ", 8);
        assert_eq!(line.words, ["gpac", "-h", ""]);
        assert_eq!(line.current_word(), "");
        assert_eq!(line.previous_word(), "-h");
    }

    #[test]
    fn test_escaped_space_stays_in_word() {
        assert_eq!(words(r"gpac -i my\ file"), ["gpac", "-i", r"my\ file"]);
        assert_eq!(words(r"gpac -i my\ "), ["gpac", "-i", r"my\ "]);
    }

    #[test]
    fn test_quoted_span_is_one_word() {
        let line = CommandLine::parse(r#"gpac inspect:fmt="a b":deep"#, 27);
        assert_eq!(line.words, ["gpac", r#"inspect:fmt="a b":deep"#]);
        assert!(!line.quote_synthesized);
    }

    #[test]
    fn test_escaped_quote_inside_quotes() {
        assert_eq!(words(r#"x "a \" b" y"#), ["x", r#""a \" b""#, "y"]);
    }

    #[test]
    fn test_unbalanced_quote_is_closed() {
        let line = CommandLine::parse(r#"gpac inspect:fmt="format ins"#, 28);
        assert!(line.quote_synthesized);
        assert_eq!(line.current_word(), r#"inspect:fmt="format ins""#);
    }

    #[test]
    fn test_escaped_quote_does_not_unbalance() {
        let line = CommandLine::parse(r#"gpac a\"b"#, 9);
        assert!(!line.quote_synthesized);
        assert_eq!(line.current_word(), r#"a\"b"#);
    }

    #[test]
    fn test_cursor_truncates_line() {
        let line = CommandLine::parse("gpac inspect:deepXYZ", 17);
        assert_eq!(line.current_word(), "inspect:deep");

        let line = CommandLine::parse("gpac", 100);
        assert_eq!(line.current_word(), "gpac");
    }

    #[test]
    fn test_empty_line() {
        let line = CommandLine::parse("", 0);
        assert!(line.words.is_empty());
        assert_eq!(line.current_word(), "");
        assert_eq!(line.previous_word(), "");
        assert!(!line.help_requested());
    }

    #[test]
    fn test_help_requested_only_before_current_word() {
        assert!(CommandLine::parse("gpac -h jsf", 11).help_requested());
        assert!(CommandLine::parse("gpac -hx ", 9).help_requested());
        assert!(!CommandLine::parse("gpac -h", 7).help_requested());
    }

    #[test]
    fn test_cursor_counts_characters() {
        let line = CommandLine::parse("gpac -i é.mp4 ", 13);
        assert_eq!(line.current_word(), "é.mp4");
    }
}
