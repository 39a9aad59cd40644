use crate::errors::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    Str,
    Operator,
    Punctuation,
    ParagraphBreak,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Lower-cased token text. Comparisons in the parser are case-insensitive;
    /// the original spelling is preserved in `text`.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    /// Case-insensitive text match.
    pub fn is(&self, word: &str) -> bool {
        self.text.eq_ignore_ascii_case(word)
    }
}

/// The closed keyword vocabulary. Everything else word-shaped is an identifier,
/// which the parser may still treat as narrative filler.
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "declare" | "variable" | "named" | "called" | "create" | "set" | "it" | "to" | "now"
            | "and" | "or" | "not"
            | "for" | "each" | "in" | "do" | "while" | "is"
            | "true" | "false"
            | "repeat" | "times"
            | "if" | "then" | "else"
            | "add" | "subtract" | "multiply" | "divide"
            | "greater" | "than" | "less" | "equal" | "equals"
            | "plus" | "minus" | "divided" | "become" | "becomes"
            | "the" | "a" | "an" | "of" | "as" | "type"
            | "integer" | "string" | "number" | "boolean" | "list"
    )
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
        Some(ch)
    }

    /// Consume a whitespace run. A run containing two or more line breaks is a
    /// paragraph break, positioned at the first of them.
    fn consume_whitespace(&mut self) -> Option<Token> {
        let mut newlines = 0;
        let mut break_line = self.line;
        let mut break_column = self.column;
        while let Some(ch) = self.current() {
            if !ch.is_whitespace() {
                break;
            }
            if ch == '\n' {
                newlines += 1;
                if newlines == 1 {
                    break_line = self.line;
                    break_column = self.column;
                }
            }
            self.advance();
        }
        if newlines >= 2 {
            Some(Token::new(TokenKind::ParagraphBreak, "\n\n", break_line, break_column))
        } else {
            None
        }
    }

    /// Skip a `#` comment up to (not including) the line break, so a blank
    /// line after a comment still reads as a paragraph break.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.current() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_number(&mut self) -> String {
        let mut num = String::new();
        let mut has_dot = false;
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                num.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                num.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        num
    }

    fn read_string(&mut self, quote: char) -> Result<String, CompileError> {
        let open_line = self.line;
        let open_column = self.column;
        self.advance(); // opening quote

        let mut result = String::new();
        loop {
            match self.advance() {
                Some(ch) if ch == quote => return Ok(result),
                // A backslash escapes the next character verbatim
                Some('\\') => match self.advance() {
                    Some(escaped) => result.push(escaped),
                    None => break,
                },
                Some(ch) => result.push(ch),
                None => break,
            }
        }
        Err(CompileError::lex(
            "Unterminated string literal",
            open_line,
            open_column,
        ))
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.current() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else if ch == '\'' && self.peek(1).is_some_and(|c| c.is_alphabetic()) {
                // Contractions and possessives ("let's", "user's") stay one word
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        word
    }

    fn read_operator(&mut self) -> Option<String> {
        let ch = self.current()?;
        if let Some(next) = self.peek(1) {
            let two: String = [ch, next].iter().collect();
            if matches!(two.as_str(), "==" | "!=" | "<=" | ">=") {
                self.advance();
                self.advance();
                return Some(two);
            }
        }
        if matches!(ch, '+' | '-' | '*' | '/' | '<' | '>' | '=') {
            self.advance();
            return Some(ch.to_string());
        }
        None
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current() {
            if ch.is_whitespace() {
                if let Some(token) = self.consume_whitespace() {
                    tokens.push(token);
                }
                continue;
            }
            if ch == '#' {
                self.skip_comment();
                continue;
            }

            let line = self.line;
            let column = self.column;

            if ch.is_ascii_digit() {
                let text = self.read_number();
                tokens.push(Token::new(TokenKind::Number, text, line, column));
                continue;
            }
            if ch == '"' || ch == '\'' {
                let text = self.read_string(ch)?;
                tokens.push(Token::new(TokenKind::Str, text, line, column));
                continue;
            }
            if ch.is_alphabetic() || ch == '_' {
                let text = self.read_word();
                let kind = if is_keyword(&text.to_lowercase()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                tokens.push(Token::new(kind, text, line, column));
                continue;
            }
            if let Some(op) = self.read_operator() {
                tokens.push(Token::new(TokenKind::Operator, op, line, column));
                continue;
            }
            if matches!(ch, ',' | '.' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}') {
                self.advance();
                tokens.push(Token::new(TokenKind::Punctuation, ch, line, column));
                continue;
            }
            return Err(CompileError::lex(
                format!("Unexpected character: '{}'", ch),
                line,
                column,
            ));
        }

        tokens.push(Token::new(TokenKind::EndOfInput, "", self.line, self.column));
        Ok(tokens)
    }
}
