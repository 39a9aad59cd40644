use std::fmt::Write;

use thiserror::Error;

/// Which phase of the pipeline rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct CompileError {
    pub stage: Stage,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub suggestion: Option<String>,
}

impl CompileError {
    pub fn lex(message: impl Into<String>, line: usize, column: usize) -> Self {
        CompileError {
            stage: Stage::Lex,
            message: message.into(),
            line,
            column,
            suggestion: None,
        }
    }

    pub fn parse(message: impl Into<String>, line: usize, column: usize) -> Self {
        CompileError {
            stage: Stage::Parse,
            message: message.into(),
            line,
            column,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Render a terminal diagnostic with the offending source line and a caret.
    pub fn render(&self, source: &SourceFile) -> String {
        const RED: &str = "\x1b[1;31m";
        const BLUE: &str = "\x1b[1;34m";
        const YELLOW: &str = "\x1b[1;33m";
        const GREEN: &str = "\x1b[1;32m";
        const RESET: &str = "\x1b[0m";
        const BOLD: &str = "\x1b[1m";

        let mut out = String::new();
        let _ = writeln!(out, "{}error{}: {}{}{}", RED, RESET, BOLD, self.message, RESET);
        let _ = writeln!(
            out,
            "  {}-->{} {}:{}:{}",
            BLUE, RESET, source.filename, self.line, self.column
        );

        if let Some(content) = source.get_line(self.line) {
            let gutter = self.line.to_string().len();
            let _ = writeln!(out, "  {:width$} {}|{}", "", BLUE, RESET, width = gutter);
            let _ = writeln!(
                out,
                "  {}{}{} {}|{} {}",
                BLUE,
                self.line,
                RESET,
                BLUE,
                RESET,
                content.trim_end()
            );
            let pointer = " ".repeat(self.column.saturating_sub(1));
            let _ = writeln!(
                out,
                "  {:width$} {}|{} {}{}^--- here{}",
                "",
                BLUE,
                RESET,
                pointer,
                RED,
                RESET,
                width = gutter
            );
        }

        if let Some(ref suggestion) = self.suggestion {
            let _ = writeln!(
                out,
                "  {}help{}: did you mean `{}{}{}`?",
                GREEN, RESET, YELLOW, suggestion, RESET
            );
        }

        out
    }
}

pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.to_lowercase().chars().collect();
    let b_chars: Vec<char> = b.to_lowercase().chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut dp = vec![vec![0usize; n + 1]; m + 1];

    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        dp[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[m][n]
}

pub fn find_similar_keyword(word: &str, keywords: &[&str]) -> Option<String> {
    let word_lower = word.to_lowercase();
    let mut best_match: Option<(String, usize)> = None;

    // One- and two-letter identifiers are almost always intentional (x, y, i, n)
    if word.len() <= 2 {
        return None;
    }

    for &keyword in keywords {
        // Avoid nonsense like "counter" -> "in"
        let len_diff = (word.len() as isize - keyword.len() as isize).unsigned_abs();
        if len_diff > 2 {
            continue;
        }

        let distance = levenshtein_distance(&word_lower, keyword);

        // The word already is a keyword, nothing to suggest
        if distance == 0 {
            return None;
        }

        let max_distance = if word.len() >= 4 { 2 } else { 1 };

        if distance <= max_distance {
            match &best_match {
                Some((_, best_dist)) if distance >= *best_dist => {}
                _ => best_match = Some((keyword.to_string(), distance)),
            }
        }
    }

    best_match.map(|(s, _)| s)
}

pub const LONGHAND_KEYWORDS: &[&str] = &[
    "declare", "variable", "named", "called", "create", "set", "it", "to", "now",
    "and", "or", "not", "for", "each", "in", "do", "while", "is", "true", "false",
    "repeat", "times", "if", "then", "else",
    "add", "subtract", "multiply", "divide",
    "greater", "than", "less", "equal", "equals",
    "plus", "minus", "divided", "become", "becomes",
    "the", "a", "an", "of", "as", "type",
    "integer", "string", "number", "boolean", "list",
];

pub struct SourceFile {
    pub filename: String,
    lines: Vec<String>,
}

impl SourceFile {
    pub fn new(filename: &str, content: &str) -> Self {
        SourceFile {
            filename: filename.to_string(),
            lines: content.lines().map(|s| s.to_string()).collect(),
        }
    }

    pub fn get_line(&self, line_num: usize) -> Option<&str> {
        if line_num > 0 && line_num <= self.lines.len() {
            Some(&self.lines[line_num - 1])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("declare", "declare"), 0);
        assert_eq!(levenshtein_distance("declare", "declere"), 1);
        assert_eq!(levenshtein_distance("declare", "declre"), 1);
        assert_eq!(levenshtein_distance("while", "whiel"), 2);
    }

    #[test]
    fn test_find_similar() {
        assert_eq!(
            find_similar_keyword("declere", LONGHAND_KEYWORDS),
            Some("declare".to_string())
        );
        assert_eq!(
            find_similar_keyword("repaet", LONGHAND_KEYWORDS),
            Some("repeat".to_string())
        );
        assert_eq!(
            find_similar_keyword("varaible", LONGHAND_KEYWORDS),
            Some("variable".to_string())
        );
        // Short names never get corrections
        assert_eq!(find_similar_keyword("x", LONGHAND_KEYWORDS), None);
    }

    #[test]
    fn test_display_includes_position() {
        let err = CompileError::parse("Expected 'to'", 3, 14);
        assert_eq!(err.to_string(), "Expected 'to' at line 3, column 14");
        assert_eq!(err.stage, Stage::Parse);
        assert_eq!(CompileError::lex("bad", 1, 1).stage, Stage::Lex);
    }

    #[test]
    fn test_render_points_at_column() {
        let source = SourceFile::new("demo.lh", "set x to 5\nset y two 6\n");
        let err = CompileError::parse("Expected 'to'", 2, 7).with_suggestion("to");
        let rendered = err.render(&source);
        assert!(rendered.contains("demo.lh:2:7"));
        assert!(rendered.contains("set y two 6"));
        assert!(rendered.contains("^--- here"));
        assert!(rendered.contains("did you mean"));
    }
}
