//! The whole pipeline behind three calls: tokens, tree, or Python text.

use crate::codegen::PythonGenerator;
use crate::errors::CompileError;
use crate::lexer::{Lexer, Token};
use crate::parser::ast::Program;
use crate::parser::Parser;

pub fn tokenize_source(source: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(source).tokenize()
}

pub fn parse_source(source: &str) -> Result<Program, CompileError> {
    let tokens = tokenize_source(source)?;
    Parser::new(tokens).parse()
}

pub fn compile(source: &str) -> Result<String, CompileError> {
    let program = parse_source(source)?;
    Ok(PythonGenerator::new().generate(&program))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_declaration_end_to_end() {
        let python = compile(
            "Let's declare a variable called total and set it to 0",
        )
        .unwrap();
        assert_eq!(python, "total = 0\n");
    }

    #[test]
    fn test_typed_declaration_end_to_end() {
        let python = compile(
            "Now create a variable named greeting as a string and set it to \"Hello\"",
        )
        .unwrap();
        assert_eq!(python, "greeting: str = 'Hello'\n");
    }

    #[test]
    fn test_for_each_accumulation_end_to_end() {
        let python = compile(
            "declare a variable named total and set it to 0\n\n\
             for each item in numbers, do set total to total plus item",
        )
        .unwrap();
        assert_eq!(
            python,
            "total = 0\nfor item in numbers:\n    total = total + item\n"
        );
    }

    #[test]
    fn test_for_each_over_list_literal() {
        let python =
            compile("for each number in [1, 2, 3] do set total to total plus number").unwrap();
        assert_eq!(
            python,
            "for number in [1, 2, 3]:\n    total = total + number\n"
        );
    }

    #[test]
    fn test_while_countdown_end_to_end() {
        let python = compile(
            "set count to 10\n\nwhile count is greater than 0, do set count to count minus 1",
        )
        .unwrap();
        assert_eq!(
            python,
            "count = 10\nwhile count > 0:\n    count = count - 1\n"
        );
    }

    #[test]
    fn test_repeat_end_to_end() {
        let python = compile("repeat 3 times, do set x to x times 2").unwrap();
        assert_eq!(python, "for _ in range(3):\n    x = x * 2\n");
    }

    #[test]
    fn test_narrative_padding_changes_nothing() {
        let plain = compile("declare a variable named x and set it to 5").unwrap();
        let padded = compile(
            "Okay so first, let's now declare a variable called x and finally set it to 5",
        )
        .unwrap();
        assert_eq!(plain, padded);
    }

    #[test]
    fn test_string_escapes_are_verbatim() {
        let python = compile("set x to \"a\\nb\"").unwrap();
        assert_eq!(python, "x = 'anb'\n");
    }

    #[test]
    fn test_errors_surface_from_compile() {
        let err = compile("declare a variable naned x to 5").unwrap_err();
        assert_eq!(err.suggestion.as_deref(), Some("named"));
    }

    proptest! {
        #[test]
        fn tokenizing_is_deterministic(s in r"[a-z ,.\n]{0,80}") {
            let first = tokenize_source(&s);
            let second = tokenize_source(&s);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn filler_soup_parses_to_an_empty_program(
            words in prop::collection::vec(
                prop::sample::select(vec![
                    "the", "we", "want", "so", "then", "here", "there", "thing",
                ]),
                0..30,
            )
        ) {
            let source = words.join(" ");
            let program = parse_source(&source).unwrap();
            prop_assert!(program.statements.is_empty());
        }
    }
}
