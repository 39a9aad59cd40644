pub mod ast;
pub mod filler;

use crate::errors::{find_similar_keyword, CompileError, LONGHAND_KEYWORDS};
use crate::lexer::{Token, TokenKind};
use ast::{BinOp, Expr, Program, Statement, TypeTag, UnOp, Value};
use filler::{skip_narrative, EXPR_STATEMENT_KEYWORDS, NARRATIVE_CONTINUATIONS};

/// Keywords that never stand alone as a value, so the bare-identifier escape
/// hatch in `parse_primary` must not claim them.
const NONVALUE_KEYWORDS: &[&str] = &[
    "true", "false", "and", "or", "not", "in", "is", "do", "to", "than", "equals", "plus",
    "minus", "times", "divided", "becomes", "called", "create", "now",
];

/// Verb dispatch accepts inflected forms: "repeating" for "repeat", and
/// "declaring"/"creating" for "declare"/"create", where the final 'e' drops
/// before the suffix.
fn verb_matches(word: &str, base: &str) -> bool {
    if word == base {
        return true;
    }
    if word.len() > base.len() && word.starts_with(base) {
        return true;
    }
    base.strip_suffix('e')
        .is_some_and(|stem| word.len() > base.len() && word.starts_with(stem))
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // The cursor relies on a trailing end-of-input token
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfInput) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::EndOfInput, "", line, column));
        }
        Parser { tokens, pos: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &Token {
        let pos = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[pos]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.current().kind == TokenKind::EndOfInput
    }

    fn err(&self, message: impl Into<String>) -> CompileError {
        let token = self.current();
        CompileError::parse(message, token.line, token.column)
    }

    fn err_expected(&self, expected: &str) -> CompileError {
        let token = self.current();
        let got = match token.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            _ => format!("'{}'", token.text),
        };
        let mut error = self.err(format!("Expected {}, got {}", expected, got));
        if token.kind == TokenKind::Identifier {
            if let Some(suggestion) = find_similar_keyword(&token.text, LONGHAND_KEYWORDS) {
                error = error.with_suggestion(suggestion);
            }
        }
        error
    }

    fn expect_keyword(&mut self, word: &str) -> Result<Token, CompileError> {
        let token = self.current().clone();
        if token.kind == TokenKind::Keyword && token.is(word) {
            self.advance();
            Ok(token)
        } else {
            Err(self.err_expected(&format!("'{}'", word)))
        }
    }

    /// Like `expect_keyword` but accepting inflected verb forms
    /// ("repeating" for "repeat").
    fn expect_verb(&mut self, base: &str) -> Result<(), CompileError> {
        let token = self.current();
        let word = token.lower();
        let word_like = matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier);
        if word_like && verb_matches(&word, base) {
            self.advance();
            Ok(())
        } else {
            Err(self.err_expected(&format!("'{}'", base)))
        }
    }

    fn skip_keyword_if(&mut self, word: &str) -> bool {
        if self.current().kind == TokenKind::Keyword && self.current().is(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// "by" and "from" lex as identifiers, so operator phrases accept both kinds.
    fn skip_word_if(&mut self, word: &str) -> bool {
        let token = self.current();
        if matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier) && token.is(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_operator_if(&mut self, symbol: &str) -> bool {
        if self.current().kind == TokenKind::Operator && self.current().text == symbol {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_punctuation_if(&mut self, symbol: &str) -> bool {
        if self.current().kind == TokenKind::Punctuation && self.current().text == symbol {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punctuation(&mut self, symbol: &str) -> Result<(), CompileError> {
        if self.skip_punctuation_if(symbol) {
            Ok(())
        } else {
            Err(self.err_expected(&format!("'{}'", symbol)))
        }
    }

    fn skip_paragraph_breaks(&mut self) {
        while self.current().kind == TokenKind::ParagraphBreak {
            self.advance();
        }
    }

    fn skip_filler(&mut self) -> bool {
        skip_narrative(&self.tokens, &mut self.pos)
    }

    /// Speculatively match a keyword sequence; the cursor is always restored.
    /// The first word may match by prefix so inflections dispatch correctly.
    fn match_keyword_sequence(&mut self, words: &[&str]) -> bool {
        let saved_pos = self.pos;
        for (i, expected) in words.iter().enumerate() {
            let token = self.current();
            if !matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier) {
                self.pos = saved_pos;
                return false;
            }
            let word = token.lower();
            if word == *expected || (i == 0 && verb_matches(&word, expected)) {
                self.advance();
                continue;
            }
            self.pos = saved_pos;
            return false;
        }
        self.pos = saved_pos;
        true
    }

    pub fn parse(&mut self) -> Result<Program, CompileError> {
        let mut statements = Vec::new();

        while !self.at_end() {
            self.skip_paragraph_breaks();
            if self.at_end() {
                break;
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok(Program::new(statements))
    }

    fn parse_statement(&mut self) -> Result<Option<Statement>, CompileError> {
        self.skip_filler();

        // "set up a counter" is scene-setting prose, not an assignment
        if self.current().is("set") && self.peek(1).is("up") {
            self.advance();
            self.advance();
            if self.current().is("a") {
                self.advance();
            }
            if self.current().kind == TokenKind::Identifier {
                self.advance();
            }
            self.skip_filler();
            return self.parse_statement();
        }

        let token = self.current().clone();
        if matches!(token.kind, TokenKind::EndOfInput | TokenKind::ParagraphBreak) {
            return Ok(None);
        }

        let word = token.lower();
        let saved_pos = self.pos;

        if verb_matches(&word, "declare") {
            if word != "declare" {
                self.advance();
            }
            let tail_matches = self.match_keyword_sequence(&["a", "variable"]);
            self.pos = saved_pos;
            if tail_matches && self.match_keyword_sequence(&["declare", "a", "variable"]) {
                return self.parse_variable_declaration().map(Some);
            }
        }

        if verb_matches(&word, "create") {
            return self.parse_variable_declaration().map(Some);
        }

        if self.match_keyword_sequence(&["declare", "a", "variable"]) {
            return self.parse_variable_declaration().map(Some);
        }

        if word == "set" {
            return self.parse_assignment().map(Some);
        }

        if self.match_keyword_sequence(&["for", "each"]) {
            return self.parse_for_loop().map(Some);
        }

        if self.match_keyword_sequence(&["while"]) {
            return self.parse_while_loop().map(Some);
        }

        if self.match_keyword_sequence(&["repeat"]) {
            return self.parse_repeat_loop().map(Some);
        }

        if token.kind == TokenKind::Identifier {
            let next = self.peek(1).lower();
            if matches!(next.as_str(), "equals" | "=" | "becomes" | "become") {
                return self.parse_assignment().map(Some);
            }
            if next == "is" && self.peek(2).is("now") {
                return self.parse_assignment().map(Some);
            }
        }

        // Unclassifiable token at statement position: swallow it and move on
        self.advance();
        Ok(None)
    }

    /// `declare a variable named X [as TYPE] and set it to Y` (or the
    /// `create ... called` spelling; the naming words are interchangeable).
    /// Also entered past verb forms like "creating".
    fn parse_variable_declaration(&mut self) -> Result<Statement, CompileError> {
        let word = self.current().lower();

        if verb_matches(&word, "declare") || verb_matches(&word, "create") {
            self.advance();
            self.skip_filler();
            self.skip_keyword_if("a");
            self.expect_keyword("variable")?;
            if !self.skip_keyword_if("named") && !self.skip_keyword_if("called") {
                return Err(self.err_expected("'named' or 'called' after 'variable'"));
            }
        } else {
            return Err(self.err("Expected 'declare' or 'create' for variable declaration"));
        }

        let name_token = self.current().clone();
        if !matches!(name_token.kind, TokenKind::Identifier | TokenKind::Keyword) {
            return Err(self.err_expected("identifier for variable name"));
        }
        self.advance();

        let mut var_type = None;
        if self.skip_keyword_if("as") {
            self.skip_keyword_if("a");
            self.skip_keyword_if("an");
            let type_token = self.current().clone();
            if type_token.kind != TokenKind::Keyword {
                return Err(self.err_expected("a type keyword after 'as'"));
            }
            self.advance();
            var_type = Some(TypeTag::from_keyword(&type_token.lower()));
        }

        if self.skip_keyword_if("and") {
            self.skip_filler();
            self.expect_keyword("set")?;
            self.skip_keyword_if("it");
            self.expect_keyword("to")?;
        } else {
            self.expect_keyword("to")?;
        }

        let value = self.parse_expression()?;

        Ok(Statement::VariableDeclaration {
            name: name_token.text,
            var_type,
            value,
        })
    }

    /// `set X to Y`, `X equals Y`, `X becomes Y`, `X is now Y`
    fn parse_assignment(&mut self) -> Result<Statement, CompileError> {
        if self.current().is("set") {
            self.expect_keyword("set")?;
            let name_token = self.current().clone();
            let is_target = name_token.kind == TokenKind::Identifier
                || (name_token.kind == TokenKind::Keyword && name_token.is("it"));
            if !is_target {
                return Err(self.err_expected("identifier for variable name"));
            }
            self.advance();
            self.expect_keyword("to")?;
            let value = self.parse_expression()?;
            return Ok(Statement::Assignment {
                name: name_token.text,
                value,
            });
        }

        let name_token = self.current().clone();
        if name_token.kind != TokenKind::Identifier {
            return Err(self.err_expected("identifier for assignment target"));
        }
        self.advance();

        if self.skip_keyword_if("equals")
            || self.skip_operator_if("=")
            || self.skip_keyword_if("becomes")
            || self.skip_keyword_if("become")
        {
            let value = self.parse_expression()?;
            return Ok(Statement::Assignment {
                name: name_token.text,
                value,
            });
        }

        if self.skip_keyword_if("is") {
            if self.skip_keyword_if("now") {
                let value = self.parse_expression()?;
                return Ok(Statement::Assignment {
                    name: name_token.text,
                    value,
                });
            }
            return Err(self.err("Expected 'now' after 'is' in assignment"));
        }

        Err(self.err("Expected 'equals', '=', 'become', 'becomes', or 'is now' after identifier"))
    }

    /// `for each X in Y, do ...`
    fn parse_for_loop(&mut self) -> Result<Statement, CompileError> {
        self.expect_verb("for")?;
        self.expect_keyword("each")?;

        let item_token = self.current().clone();
        if !matches!(item_token.kind, TokenKind::Identifier | TokenKind::Keyword) {
            return Err(self.err_expected("identifier for loop variable"));
        }
        self.advance();

        self.expect_keyword("in")?;
        let iterable = self.parse_expression()?;

        self.skip_punctuation_if(",");
        self.skip_filler();
        self.skip_keyword_if("do");

        let body = self.parse_block()?;

        Ok(Statement::ForLoop {
            item: item_token.text,
            iterable,
            body,
        })
    }

    /// `while X [is true], do ...`
    fn parse_while_loop(&mut self) -> Result<Statement, CompileError> {
        self.expect_verb("while")?;

        let condition = self.parse_expression()?;

        // A trailing "is [true]" the comparison parser left unconsumed
        if self.current().kind == TokenKind::Keyword && self.current().is("is") {
            self.advance();
            self.skip_keyword_if("true");
        }

        self.skip_punctuation_if(",");
        self.skip_filler();
        self.skip_keyword_if("do");

        let body = self.parse_block()?;

        Ok(Statement::WhileLoop { condition, body })
    }

    /// `repeat N times, do ...`
    fn parse_repeat_loop(&mut self) -> Result<Statement, CompileError> {
        self.expect_verb("repeat")?;

        let count = self.parse_primary()?;

        self.expect_keyword("times")?;

        self.skip_punctuation_if(",");
        self.skip_filler();
        self.skip_keyword_if("do");

        let body = self.parse_block()?;

        Ok(Statement::RepeatLoop { count, body })
    }

    /// Statements until end of input or a paragraph break. Bodies have no
    /// closing delimiter: a blank line ends the body, anything else in the
    /// paragraph belongs to it.
    fn parse_block(&mut self) -> Result<Vec<Statement>, CompileError> {
        let mut body = Vec::new();

        loop {
            if matches!(
                self.current().kind,
                TokenKind::EndOfInput | TokenKind::ParagraphBreak
            ) {
                break;
            }

            let saved_pos = self.pos;
            match self.parse_statement()? {
                Some(statement) => body.push(statement),
                None => {
                    if self.pos == saved_pos {
                        break;
                    }
                }
            }
        }

        Ok(body)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, CompileError> {
        let token = self.current();
        if matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier)
            && EXPR_STATEMENT_KEYWORDS.contains(token.lower().as_str())
        {
            return Err(self.err(format!(
                "Unexpected statement keyword '{}' - expression expected",
                token.text
            )));
        }
        self.parse_logical_or()
    }

    /// The word after and/or tells a logical operator apart from a sentence
    /// that has moved on to its next clause.
    fn halts_logical_chain(&self) -> bool {
        let peek = self.peek(1);
        let word = peek.lower();
        NARRATIVE_CONTINUATIONS.contains(word.as_str())
            || (matches!(peek.kind, TokenKind::Keyword | TokenKind::Identifier)
                && EXPR_STATEMENT_KEYWORDS.contains(word.as_str()))
    }

    fn parse_logical_or(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_logical_and()?;

        while self.current().is("or") {
            if self.halts_logical_chain() {
                break;
            }
            self.expect_keyword("or")?;
            let right = self.parse_logical_and()?;
            left = Expr::binary(left, BinOp::Or, right);
        }

        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_comparison()?;

        while self.current().is("and") {
            if self.halts_logical_chain() {
                break;
            }
            self.expect_keyword("and")?;
            let right = self.parse_comparison()?;
            left = Expr::binary(left, BinOp::And, right);
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_additive()?;

        loop {
            let token = self.current().clone();

            if token.kind == TokenKind::Keyword {
                match token.lower().as_str() {
                    "is" => {
                        let saved_pos = self.pos;
                        self.advance();
                        let next = self.current().lower();
                        if self.current().kind == TokenKind::Keyword {
                            match next.as_str() {
                                "greater" => {
                                    self.advance();
                                    if !self.skip_keyword_if("than") {
                                        return Err(
                                            self.err("Expected 'than' after 'is greater'")
                                        );
                                    }
                                    let right = self.parse_additive()?;
                                    left = Expr::binary(left, BinOp::Greater, right);
                                    continue;
                                }
                                "less" => {
                                    self.advance();
                                    if !self.skip_keyword_if("than") {
                                        return Err(self.err("Expected 'than' after 'is less'"));
                                    }
                                    let right = self.parse_additive()?;
                                    left = Expr::binary(left, BinOp::Less, right);
                                    continue;
                                }
                                "equal" => {
                                    self.advance();
                                    self.skip_keyword_if("to");
                                    let right = self.parse_additive()?;
                                    left = Expr::binary(left, BinOp::Eq, right);
                                    continue;
                                }
                                _ => {}
                            }
                        }
                        // Plain "is" belongs to the caller ("while x is true")
                        self.pos = saved_pos;
                        break;
                    }
                    "greater" => {
                        self.advance();
                        if !self.skip_keyword_if("than") {
                            return Err(self.err("Expected 'than' after 'greater'"));
                        }
                        let right = self.parse_additive()?;
                        left = Expr::binary(left, BinOp::Greater, right);
                        continue;
                    }
                    "less" => {
                        self.advance();
                        if !self.skip_keyword_if("than") {
                            return Err(self.err("Expected 'than' after 'less'"));
                        }
                        let right = self.parse_additive()?;
                        left = Expr::binary(left, BinOp::Less, right);
                        continue;
                    }
                    "equal" => {
                        self.advance();
                        self.skip_keyword_if("to");
                        let right = self.parse_additive()?;
                        left = Expr::binary(left, BinOp::Eq, right);
                        continue;
                    }
                    _ => {}
                }
            }

            if token.kind == TokenKind::Operator {
                if let Some(op) = BinOp::from_symbol(&token.text) {
                    if matches!(
                        op,
                        BinOp::Eq
                            | BinOp::NotEq
                            | BinOp::Less
                            | BinOp::Greater
                            | BinOp::LessEq
                            | BinOp::GreaterEq
                    ) {
                        self.advance();
                        let right = self.parse_additive()?;
                        left = Expr::binary(left, op, right);
                        continue;
                    }
                }
            }

            break;
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, CompileError> {
        // The arithmetic verbs also open an expression ("add 1 to x");
        // operands bind in token order
        let current_is = |p: &Self, w: &str| {
            p.current().kind == TokenKind::Keyword && p.current().is(w)
        };
        let mut left = if current_is(self, "add") {
            self.advance();
            let first = self.parse_multiplicative()?;
            self.skip_keyword_if("to");
            let second = self.parse_multiplicative()?;
            Expr::binary(first, BinOp::Add, second)
        } else if current_is(self, "subtract") {
            self.advance();
            let first = self.parse_multiplicative()?;
            self.skip_word_if("from");
            let second = self.parse_multiplicative()?;
            Expr::binary(first, BinOp::Sub, second)
        } else {
            self.parse_multiplicative()?
        };

        loop {
            let token = self.current().clone();

            if token.kind == TokenKind::Keyword {
                match token.lower().as_str() {
                    "add" => {
                        self.advance();
                        self.skip_keyword_if("to");
                        let right = self.parse_multiplicative()?;
                        left = Expr::binary(left, BinOp::Add, right);
                        continue;
                    }
                    "plus" => {
                        self.advance();
                        let right = self.parse_multiplicative()?;
                        left = Expr::binary(left, BinOp::Add, right);
                        continue;
                    }
                    "subtract" => {
                        self.advance();
                        self.skip_word_if("from");
                        let right = self.parse_multiplicative()?;
                        left = Expr::binary(left, BinOp::Sub, right);
                        continue;
                    }
                    "minus" => {
                        self.advance();
                        let right = self.parse_multiplicative()?;
                        left = Expr::binary(left, BinOp::Sub, right);
                        continue;
                    }
                    _ => {}
                }
            }

            if token.kind == TokenKind::Operator && matches!(token.text.as_str(), "+" | "-") {
                self.advance();
                let op = if token.text == "+" { BinOp::Add } else { BinOp::Sub };
                let right = self.parse_multiplicative()?;
                left = Expr::binary(left, op, right);
                continue;
            }

            break;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_unary()?;

        loop {
            let token = self.current().clone();

            if token.kind == TokenKind::Keyword {
                match token.lower().as_str() {
                    "multiply" => {
                        self.advance();
                        self.skip_word_if("by");
                        let right = self.parse_unary()?;
                        left = Expr::binary(left, BinOp::Mul, right);
                        continue;
                    }
                    "times" => {
                        self.advance();
                        let right = self.parse_unary()?;
                        left = Expr::binary(left, BinOp::Mul, right);
                        continue;
                    }
                    "divide" | "divided" => {
                        self.advance();
                        self.skip_word_if("by");
                        let right = self.parse_unary()?;
                        left = Expr::binary(left, BinOp::Div, right);
                        continue;
                    }
                    _ => {}
                }
            }

            if token.kind == TokenKind::Operator && matches!(token.text.as_str(), "*" | "/") {
                self.advance();
                let op = if token.text == "*" { BinOp::Mul } else { BinOp::Div };
                let right = self.parse_unary()?;
                left = Expr::binary(left, op, right);
                continue;
            }

            break;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        if self.current().kind == TokenKind::Keyword && self.current().is("not") {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnOp::Not,
                operand: Box::new(operand),
            });
        }

        if self.current().kind == TokenKind::Operator && self.current().text == "-" {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnOp::Negate,
                operand: Box::new(operand),
            });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let token = self.current().clone();

        if token.kind == TokenKind::EndOfInput {
            return Err(self.err("Unexpected end of input"));
        }

        let word = token.lower();

        if token.kind == TokenKind::Keyword && EXPR_STATEMENT_KEYWORDS.contains(word.as_str()) {
            return Err(self.err(format!(
                "Unexpected statement keyword '{}' in expression",
                token.text
            )));
        }

        if token.kind == TokenKind::Number {
            self.advance();
            let value = if token.text.contains('.') {
                Value::Float(token.text.parse().unwrap_or(0.0))
            } else {
                Value::Integer(token.text.parse().unwrap_or(0))
            };
            return Ok(Expr::Literal(value));
        }

        if token.kind == TokenKind::Str {
            self.advance();
            return Ok(Expr::Literal(Value::Str(token.text)));
        }

        if token.kind == TokenKind::Keyword && matches!(word.as_str(), "true" | "false") {
            self.advance();
            return Ok(Expr::Literal(Value::Bool(word == "true")));
        }

        if token.kind == TokenKind::Identifier {
            self.advance();
            return Ok(Expr::Identifier(token.text));
        }

        // Unreserved keywords may still name variables ("count", "list")
        if token.kind == TokenKind::Keyword && !NONVALUE_KEYWORDS.contains(&word.as_str()) {
            self.advance();
            return Ok(Expr::Identifier(token.text));
        }

        if token.kind == TokenKind::Punctuation && token.text == "[" {
            return self.parse_list_literal();
        }

        if token.kind == TokenKind::Punctuation && token.text == "(" {
            self.advance();
            let expr = self.parse_expression()?;
            self.expect_punctuation(")")?;
            return Ok(expr);
        }

        Err(self.err(format!("Unexpected token in expression: '{}'", token.text)))
    }

    fn parse_list_literal(&mut self) -> Result<Expr, CompileError> {
        self.expect_punctuation("[")?;

        let mut elements = Vec::new();

        if self.skip_punctuation_if("]") {
            return Ok(Expr::List { elements });
        }

        elements.push(self.parse_expression()?);
        while self.skip_punctuation_if(",") {
            elements.push(self.parse_expression()?);
        }

        self.expect_punctuation("]")?;

        Ok(Expr::List { elements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use rstest::rstest;

    fn parse(input: &str) -> Program {
        let tokens = Lexer::new(input).tokenize().expect("input should tokenize");
        Parser::new(tokens).parse().expect("input should parse")
    }

    fn parse_err(input: &str) -> CompileError {
        let tokens = Lexer::new(input).tokenize().expect("input should tokenize");
        Parser::new(tokens).parse().expect_err("input should not parse")
    }

    fn parse_expr(input: &str) -> Expr {
        let tokens = Lexer::new(input).tokenize().expect("input should tokenize");
        Parser::new(tokens)
            .parse_expression()
            .expect("expression should parse")
    }

    fn int(n: i64) -> Expr {
        Expr::Literal(Value::Integer(n))
    }

    fn ident(name: &str) -> Expr {
        Expr::Identifier(name.to_string())
    }

    #[test]
    fn test_plain_declaration() {
        let program = parse("declare a variable named x and set it to 5");
        assert_eq!(
            program.statements,
            vec![Statement::VariableDeclaration {
                name: "x".to_string(),
                var_type: None,
                value: int(5),
            }]
        );
    }

    #[test]
    fn test_declaration_with_narrative_padding() {
        let padded = parse("let's now declare a variable called x and finally set it to 5");
        let plain = parse("declare a variable named x and set it to 5");
        assert_eq!(padded, plain);
    }

    #[test]
    fn test_create_with_type_annotation() {
        let program = parse("create a variable called name as a string and set it to \"Hi\"");
        assert_eq!(
            program.statements,
            vec![Statement::VariableDeclaration {
                name: "name".to_string(),
                var_type: Some(TypeTag::Text),
                value: Expr::Literal(Value::Str("Hi".to_string())),
            }]
        );
    }

    #[test]
    fn test_declaration_without_and() {
        let program = parse("declare a variable named limit to 100");
        assert_eq!(
            program.statements,
            vec![Statement::VariableDeclaration {
                name: "limit".to_string(),
                var_type: None,
                value: int(100),
            }]
        );
    }

    #[rstest]
    #[case("declaring a variable named y to 2")]
    #[case("creating a variable named y to 2")]
    #[case("declares a variable named y to 2")]
    fn test_inflected_verb_dispatches(#[case] input: &str) {
        let program = parse(input);
        assert_eq!(
            program.statements,
            vec![Statement::VariableDeclaration {
                name: "y".to_string(),
                var_type: None,
                value: int(2),
            }]
        );
    }

    #[test]
    fn test_verb_matching_drops_final_e() {
        assert!(verb_matches("declaring", "declare"));
        assert!(verb_matches("creating", "create"));
        assert!(verb_matches("declared", "declare"));
        assert!(verb_matches("repeating", "repeat"));
        assert!(verb_matches("declare", "declare"));
        assert!(!verb_matches("decline", "declare"));
        assert!(!verb_matches("declar", "declare"));
    }

    #[test]
    fn test_set_assignment() {
        let program = parse("set total to 0");
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                name: "total".to_string(),
                value: int(0),
            }]
        );
    }

    #[rstest]
    #[case("total equals 10")]
    #[case("total = 10")]
    #[case("total becomes 10")]
    #[case("total is now 10")]
    fn test_fluent_assignment_forms(#[case] input: &str) {
        let program = parse(input);
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                name: "total".to_string(),
                value: int(10),
            }]
        );
    }

    #[test]
    fn test_set_it_resolves_pronoun() {
        let program = parse("set it to 5");
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                name: "it".to_string(),
                value: int(5),
            }]
        );
    }

    #[test]
    fn test_set_up_prelude_is_prose() {
        let program = parse("set up a counter and set it to 0");
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                name: "it".to_string(),
                value: int(0),
            }]
        );
    }

    #[test]
    fn test_for_each_loop() {
        let program = parse("for each item in numbers, do set total to total plus item");
        assert_eq!(
            program.statements,
            vec![Statement::ForLoop {
                item: "item".to_string(),
                iterable: ident("numbers"),
                body: vec![Statement::Assignment {
                    name: "total".to_string(),
                    value: Expr::binary(ident("total"), BinOp::Add, ident("item")),
                }],
            }]
        );
    }

    #[test]
    fn test_while_loop_with_is_true() {
        let program = parse("while running is true, do set count to count plus 1");
        assert_eq!(
            program.statements,
            vec![Statement::WhileLoop {
                condition: ident("running"),
                body: vec![Statement::Assignment {
                    name: "count".to_string(),
                    value: Expr::binary(ident("count"), BinOp::Add, int(1)),
                }],
            }]
        );
    }

    #[test]
    fn test_while_loop_with_comparison() {
        let program = parse("while count is less than 10 do set count to count plus 1");
        match &program.statements[0] {
            Statement::WhileLoop { condition, body } => {
                assert_eq!(
                    *condition,
                    Expr::binary(ident("count"), BinOp::Less, int(10))
                );
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_loop() {
        let program = parse("repeat 3 times, do set x to x times 2");
        assert_eq!(
            program.statements,
            vec![Statement::RepeatLoop {
                count: int(3),
                body: vec![Statement::Assignment {
                    name: "x".to_string(),
                    value: Expr::binary(ident("x"), BinOp::Mul, int(2)),
                }],
            }]
        );
    }

    #[test]
    fn test_inflected_repeat() {
        let program = parse("repeating 3 times do set x to 1");
        assert!(matches!(
            program.statements[0],
            Statement::RepeatLoop { .. }
        ));
    }

    #[test]
    fn test_while_as_noun_does_not_open_loop() {
        let program = parse("use a while loop to set counter to 0");
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                name: "counter".to_string(),
                value: int(0),
            }]
        );
    }

    #[test]
    fn nested_loops_same_paragraph() {
        // Without a paragraph break the second loop lands in the first
        // loop's body
        let program = parse("repeat 2 times do set x to 1 while going do set y to 2");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::RepeatLoop { body, .. } => {
                assert_eq!(body.len(), 2);
                assert!(matches!(body[1], Statement::WhileLoop { .. }));
            }
            other => panic!("expected repeat loop, got {:?}", other),
        }
    }

    #[test]
    fn paragraph_break_ends_loop_body() {
        let program = parse("repeat 2 times do set x to 1\n\nset y to 2");
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Statement::RepeatLoop { body, .. } => assert_eq!(body.len(), 1),
            other => panic!("expected repeat loop, got {:?}", other),
        }
        assert!(matches!(program.statements[1], Statement::Assignment { .. }));
    }

    #[test]
    fn test_all_filler_input_is_empty_program() {
        let program = parse("let me start by saying this is all just talk, you know");
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_stray_tokens_are_swallowed() {
        let program = parse("zebra zebra set x to 1");
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                name: "x".to_string(),
                value: int(1),
            }]
        );
    }

    #[rstest]
    #[case("x plus 1")]
    #[case("x + 1")]
    #[case("add 1 to x")]
    fn test_addition_forms(#[case] input: &str) {
        match parse_expr(input) {
            Expr::Binary { op, .. } => assert_eq!(op, BinOp::Add),
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    #[rstest]
    #[case("x minus 1", BinOp::Sub)]
    #[case("x - 1", BinOp::Sub)]
    #[case("x times 2", BinOp::Mul)]
    #[case("x multiply by 2", BinOp::Mul)]
    #[case("x * 2", BinOp::Mul)]
    #[case("x divided by 2", BinOp::Div)]
    #[case("x / 2", BinOp::Div)]
    #[case("x is greater than 2", BinOp::Greater)]
    #[case("x greater than 2", BinOp::Greater)]
    #[case("x > 2", BinOp::Greater)]
    #[case("x is less than 2", BinOp::Less)]
    #[case("x < 2", BinOp::Less)]
    #[case("x is equal to 2", BinOp::Eq)]
    #[case("x equal 2", BinOp::Eq)]
    #[case("x == 2", BinOp::Eq)]
    #[case("x != 2", BinOp::NotEq)]
    #[case("x <= 2", BinOp::LessEq)]
    #[case("x >= 2", BinOp::GreaterEq)]
    fn test_operator_forms(#[case] input: &str, #[case] expected: BinOp) {
        match parse_expr(input) {
            Expr::Binary { op, .. } => assert_eq!(op, expected),
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_leading_add_binds_in_token_order() {
        assert_eq!(
            parse_expr("add 1 to x"),
            Expr::binary(int(1), BinOp::Add, ident("x"))
        );
        assert_eq!(
            parse_expr("subtract 1 from x"),
            Expr::binary(int(1), BinOp::Sub, ident("x"))
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse_expr("2 plus 3 times 4"),
            Expr::binary(int(2), BinOp::Add, Expr::binary(int(3), BinOp::Mul, int(4)))
        );
        assert_eq!(
            parse_expr("x plus 1 is greater than 10"),
            Expr::binary(
                Expr::binary(ident("x"), BinOp::Add, int(1)),
                BinOp::Greater,
                int(10)
            )
        );
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(
            parse_expr("a and b or c"),
            Expr::binary(
                Expr::binary(ident("a"), BinOp::And, ident("b")),
                BinOp::Or,
                ident("c")
            )
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            parse_expr("not done"),
            Expr::Unary {
                op: UnOp::Not,
                operand: Box::new(ident("done")),
            }
        );
        assert_eq!(
            parse_expr("-5"),
            Expr::Unary {
                op: UnOp::Negate,
                operand: Box::new(int(5)),
            }
        );
    }

    #[test]
    fn test_list_literal() {
        assert_eq!(
            parse_expr("[1, 2, 3]"),
            Expr::List {
                elements: vec![int(1), int(2), int(3)],
            }
        );
        assert_eq!(parse_expr("[]"), Expr::List { elements: vec![] });
    }

    #[test]
    fn test_parenthesized_expression() {
        assert_eq!(
            parse_expr("(2 plus 3) times 4"),
            Expr::binary(Expr::binary(int(2), BinOp::Add, int(3)), BinOp::Mul, int(4))
        );
    }

    #[test]
    fn test_float_and_bool_literals() {
        assert_eq!(parse_expr("3.14"), Expr::Literal(Value::Float(3.14)));
        assert_eq!(parse_expr("true"), Expr::Literal(Value::Bool(true)));
        assert_eq!(parse_expr("false"), Expr::Literal(Value::Bool(false)));
    }

    #[test]
    fn test_missing_named_or_called_is_an_error() {
        let err = parse_err("declare a variable x to 5");
        assert!(err.message.contains("'named' or 'called'"));
    }

    #[test]
    fn test_typo_gets_a_suggestion() {
        let err = parse_err("declare a variable naned x to 5");
        assert_eq!(err.suggestion.as_deref(), Some("named"));
    }

    #[test]
    fn test_missing_than_is_an_error() {
        let err = parse_err("set x to 1 greater 2");
        assert!(err.message.contains("Expected 'than'"));
    }

    #[test]
    fn test_statement_keyword_in_expression_is_an_error() {
        let err = parse_err("set x to while");
        assert!(err.message.contains("statement keyword"));
    }

    #[test]
    fn test_missing_times_is_an_error() {
        let err = parse_err("repeat 3 do set x to 1");
        assert!(err.message.contains("'times'"));
    }

    #[test]
    fn test_error_carries_position() {
        let err = parse_err("set x to \nset y to 2");
        // The nested "set" is rejected inside the expression on line 2
        assert_eq!(err.line, 2);
    }
}
