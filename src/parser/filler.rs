//! Classification of narrative filler.
//!
//! Longhand programs are full sentences, so most words carry no meaning for
//! the program tree ("let's now declare a variable called x and set it to 5").
//! This module owns every vocabulary table and every context rule that decides
//! whether a word is prose to skip or structure to parse. The same word can be
//! either: "while" is a loop header in "while count is less than 10" but prose
//! in "use a while loop", and "it" is an assignment target only when a recent
//! "set" makes the pronoun resolvable.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::lexer::{Token, TokenKind};

/// Words that can begin a statement. The skipper always halts on these.
pub(crate) static STATEMENT_STARTERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["declare", "create", "set", "for", "while", "repeat", "if", "else"]
        .into_iter()
        .collect()
});

/// Keywords that are structural inside a statement and must never be skipped.
pub(crate) static STATEMENT_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "variable", "named", "called", "as", "it", "or", "not", "in", "do", "true", "false",
        "times", "equals", "becomes", "become", "plus", "minus", "divided", "greater", "than",
        "less", "equal",
    ]
    .into_iter()
    .collect()
});

/// Keywords that begin statements and may not appear bare inside expressions.
pub(crate) static EXPR_STATEMENT_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["create", "declare", "set", "for", "while", "repeat", "if", "then", "else", "each"]
        .into_iter()
        .collect()
});

/// Words after "and"/"or" that signal the sentence has moved on to a new
/// thought, so the operator is a conjunction rather than a logical operator.
pub(crate) static NARRATIVE_CONTINUATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "finally", "then", "next", "also", "so", "let", "us", "we", "create", "declare", "set",
        "for", "while", "repeat", "each",
    ]
    .into_iter()
    .collect()
});

/// Prepositions that force the article reading of a following "a"
/// ("iterate over a list" vs "declare a variable").
static NARRATIVE_PRECEDERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "from", "to", "with", "in", "on", "at", "for", "of", "by", "about", "into", "onto",
        "upon",
    ]
    .into_iter()
    .collect()
});

/// Words that keep "a" structural: "a variable", "a list", "a string", ...
static TYPE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["variable", "list", "string", "integer", "number", "boolean"]
        .into_iter()
        .collect()
});

/// The base filler vocabulary: connectives, hedges, pronouns, and the verbs
/// and nouns of typical narration. Longer words match by prefix so that
/// inflections ("wanting", "needed") are covered without listing them.
static FILLER_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "let", "me", "start", "by", "now", "first", "then", "next", "also", "we", "want",
        "need", "will", "can", "should", "shall", "must", "after", "before", "during",
        "finally", "later", "on", "once", "this", "that", "these", "those", "so", "which",
        "who", "what", "when", "where", "why", "how", "whether", "some", "any", "every",
        "all", "both", "either", "neither", "another", "other", "such", "same", "different",
        "new", "old", "last", "be", "our", "their", "my", "your", "his", "her", "its", "us",
        "them", "they", "he", "she", "it", "i", "make", "makes", "made", "point", "way",
        "thing", "things", "one", "ones", "here", "there", "up", "down", "out", "in", "off",
        "over", "under", "through", "the", "track", "something", "active", "greet", "user",
        "properly", "update", "and", "list", "contains", "numbers", "work", "with", "do",
        "of", "each", "calculate", "square", "adding", "result", "processing", "set",
        "counter", "increment", "time", "loop", "specific", "times", "iteration", "change",
        "demonstrates", "assignment", "number", "variable", "called", "perform",
        "calculations", "multiply", "together", "subtraction", "division", "compare",
        "values", "larger", "similarly", "check", "equality", "combine", "operations",
        "logical", "met", "build", "program", "calculates", "statistics", "from", "hold",
        "running", "sum", "iterate", "accumulate", "added", "add", "average", "mean",
        "value", "task", "count", "conditions", "reached", "threshold", "transformation",
        "use",
    ]
    .into_iter()
    .collect()
});

pub(crate) fn is_statement_starter(word: &str) -> bool {
    STATEMENT_STARTERS.contains(word)
}

/// Filler membership with the prefix rule: a word is filler when it extends a
/// known filler word ("wanted" extends "want", "tracking" extends "track").
/// Statement starters are exempt from the prefix rule so "if" cannot ride on
/// the pronoun "i". Listed words are filler outright, starters included;
/// the skipper's starter halt runs before the filler check, so "set" still
/// opens a statement.
pub(crate) fn is_filler_word(word: &str) -> bool {
    if FILLER_WORDS.contains(word) {
        return true;
    }
    if STATEMENT_STARTERS.contains(word) {
        return false;
    }
    FILLER_WORDS
        .iter()
        .any(|base| word.len() > base.len() && word.starts_with(base))
}

fn peek_word_is(tokens: &[Token], pos: usize, word: &str) -> bool {
    tokens.get(pos).is_some_and(|t| t.is(word))
}

fn peek_is_identifier(tokens: &[Token], pos: usize, word: &str) -> bool {
    tokens
        .get(pos)
        .is_some_and(|t| t.kind == TokenKind::Identifier && t.is(word))
}

/// `x equals ...`, `x = ...`, `x becomes ...`
fn next_is_assignment_marker(tokens: &[Token], pos: usize) -> bool {
    tokens
        .get(pos)
        .is_some_and(|t| matches!(t.lower().as_str(), "equals" | "=" | "becomes" | "become"))
}

/// "a" is an article unless it introduces "a variable"-style phrases; a
/// preceding preposition or filler word forces the article reading either way.
fn article_is_filler(tokens: &[Token], pos: usize) -> bool {
    let Some(next) = tokens.get(pos + 1) else {
        return false;
    };
    if !matches!(next.kind, TokenKind::Keyword | TokenKind::Identifier) {
        return false;
    }
    let preceded_by_narrative = pos > 0 && {
        let prev = &tokens[pos - 1];
        let prev_word = prev.lower();
        NARRATIVE_PRECEDERS.contains(prev_word.as_str())
            || (matches!(prev.kind, TokenKind::Keyword | TokenKind::Identifier)
                && FILLER_WORDS.contains(prev_word.as_str()))
    };
    !TYPE_WORDS.contains(next.lower().as_str()) || preceded_by_narrative
}

/// "set it to ..." resolves the pronoun only when a "set" appears shortly
/// before it with no other statement starting in between.
fn it_is_assignment_target(tokens: &[Token], pos: usize) -> bool {
    let start = pos.saturating_sub(5);
    for i in (start..pos).rev() {
        let word = tokens[i].lower();
        if word == "set" {
            return true;
        }
        if STATEMENT_STARTERS.contains(word.as_str()) {
            return false;
        }
    }
    false
}

/// "now" marks an assignment only right after "is" ("total is now 0").
fn now_follows_is(tokens: &[Token], pos: usize) -> bool {
    if pos > 0 && tokens[pos - 1].is("is") {
        return true;
    }
    let start = pos.saturating_sub(3);
    for i in start..pos {
        if tokens[i].is("is") {
            let blocked = tokens[i + 1..pos]
                .iter()
                .any(|t| STATEMENT_STARTERS.contains(t.lower().as_str()));
            if !blocked {
                return true;
            }
        }
    }
    false
}

/// "do" opens a loop body when a loop header keyword appears just before it.
fn do_opens_loop_body(tokens: &[Token], pos: usize) -> bool {
    let start = pos.saturating_sub(5);
    tokens[start..pos]
        .iter()
        .any(|t| matches!(t.lower().as_str(), "for" | "while" | "repeat" | "each"))
}

/// Skip narrative words starting at `*pos`, advancing the cursor past
/// everything that does not begin program structure. Returns whether anything
/// was skipped. The cursor always lands on a token the caller must handle
/// (a statement start, an unclassifiable word, a paragraph break, or end of
/// input).
pub(crate) fn skip_narrative(tokens: &[Token], pos: &mut usize) -> bool {
    let mut skipped_any = false;

    while let Some(token) = tokens.get(*pos) {
        let word = token.lower();
        let word_like = matches!(token.kind, TokenKind::Keyword | TokenKind::Identifier);

        if token.kind == TokenKind::Keyword && word == "a" && article_is_filler(tokens, *pos) {
            *pos += 1;
            skipped_any = true;
            continue;
        }

        if is_statement_starter(&word) && word_like {
            // "a while loop" uses "while" as a noun
            if word == "while" && peek_is_identifier(tokens, *pos + 1, "loop") {
                *pos += 1;
                skipped_any = true;
                continue;
            }
            break;
        }

        if token.kind == TokenKind::Keyword && STATEMENT_KEYWORDS.contains(word.as_str()) {
            if word == "it" && peek_word_is(tokens, *pos + 1, "to") {
                if it_is_assignment_target(tokens, *pos) {
                    break;
                }
                // "add it to the total" - unresolvable pronoun, prose
                *pos += 1;
                skipped_any = true;
                continue;
            }
            if word != "it" {
                break;
            }
        }

        if token.kind == TokenKind::Keyword && word == "each" {
            if *pos > 0 && tokens[*pos - 1].is("for") {
                break;
            }
            *pos += 1;
            skipped_any = true;
            continue;
        }

        // An identifier right before an assignment marker starts a statement
        if token.kind == TokenKind::Identifier {
            if next_is_assignment_marker(tokens, *pos + 1) {
                break;
            }
            if peek_word_is(tokens, *pos + 1, "is") && peek_word_is(tokens, *pos + 2, "now") {
                break;
            }
        }

        let now_marks_assignment = word == "now" && now_follows_is(tokens, *pos);
        let and_binds_set = word == "and" && peek_word_is(tokens, *pos + 1, "set");
        let do_opens_body = word == "do" && do_opens_loop_body(tokens, *pos);

        let skippable_filler = word_like
            && is_filler_word(&word)
            && !now_marks_assignment
            && !and_binds_set
            && !do_opens_body;
        let trailing_to = token.kind == TokenKind::Keyword && word == "to" && skipped_any;
        let sentence_punctuation = token.kind == TokenKind::Punctuation
            && matches!(word.as_str(), "," | "." | ";" | ":");

        if skippable_filler || trailing_to || sentence_punctuation {
            *pos += 1;
            skipped_any = true;
            continue;
        }

        // Mid-sentence, unknown identifiers are prose too ("the visitor count")
        // unless an assignment marker follows
        if skipped_any && token.kind == TokenKind::Identifier {
            let next_word = tokens.get(*pos + 1).map(|t| t.lower()).unwrap_or_default();
            if matches!(next_word.as_str(), "equals" | "=" | "becomes" | "become" | "is") {
                break;
            }
            *pos += 1;
            continue;
        }

        break;
    }

    skipped_any
}
