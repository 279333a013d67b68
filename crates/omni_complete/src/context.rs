//
// context.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use once_cell::sync::Lazy;
use regex::Regex;
use regex::RegexSet;

use crate::config::OmniConfig;
use crate::pipe::PipeMatcher;

// R symbols, including `$` accessors so that `df$co` is one word
static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w\$_\.]+$").unwrap());

// The innermost open call, as long as no other paren follows it
static RE_FUNCTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\w\.:\$@]+)\([^()]*$").unwrap());

/// What the text around the cursor tells us about the completion request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    /// The word being typed, possibly with `$` accessors
    pub word: String,

    /// The call whose arguments the cursor is in
    pub function: Option<String>,

    /// The object flowing through the pipe chain the cursor is in
    pub pipe: Option<String>,

    pub in_quotes: bool,

    /// Column from which the host replaces text with the chosen candidate
    pub start_column: usize,
}

/// How a request is answered, derived from its `Context`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextKind<'a> {
    /// Inside a string, nothing to offer
    Quoted,

    /// Inside the arguments of a call
    Call(&'a str),

    /// Completing a word, possibly a `$` field or a piped object's field
    Word,

    /// Nothing typed and nothing around to complete against
    Empty,
}

impl Context {
    pub fn kind(&self) -> ContextKind<'_> {
        if self.in_quotes {
            return ContextKind::Quoted;
        }

        if let Some(function) = &self.function {
            return ContextKind::Call(function.as_str());
        }

        if self.word.is_empty() && self.pipe.is_none() {
            return ContextKind::Empty;
        }

        ContextKind::Word
    }

    /// Whether the word reaches into an object with `$`
    pub fn is_field_access(&self) -> bool {
        self.word.contains('$')
    }
}

pub struct ContextDetector {
    pipe: PipeMatcher,
    insert_word: Regex,
    refresh_triggers: RegexSet,
}

impl ContextDetector {
    pub fn new(config: &OmniConfig) -> anyhow::Result<Self> {
        let pipe = PipeMatcher::new(&config.pipe_operators)?;
        let insert_word = Regex::new(&format!("(?:{})$", config.source.word_pattern))?;
        let refresh_triggers = RegexSet::new(
            config
                .source
                .refresh_patterns
                .iter()
                .map(|pattern| format!("(?:{pattern})$")),
        )?;

        Ok(Self {
            pipe,
            insert_word,
            refresh_triggers,
        })
    }

    /// Detects the context of a completion request.
    ///
    /// `line` is the 0-based index of the cursor line in `lines`, `column` the
    /// number of characters before the cursor on that line.
    pub fn detect<S: AsRef<str>>(&self, lines: &[S], line: usize, column: usize) -> Context {
        let text = lines.get(line).map(|text| text.as_ref()).unwrap_or_default();
        let typed = typed_prefix(text, column);

        let word = typed_word(typed);
        let start_column = column_of_insertion(typed, column, &self.insert_word);

        let before_word = &typed[..typed.len() - word.len()];
        if before_word.ends_with(['"', '\'']) {
            return Context {
                word: word.to_string(),
                function: None,
                pipe: None,
                in_quotes: true,
                start_column,
            };
        }

        let function = enclosing_function(typed).map(String::from);
        let pipe = self.pipe.scan(lines, line, column).into_source();

        Context {
            word: word.to_string(),
            function,
            pipe,
            in_quotes: false,
            start_column,
        }
    }

    /// Whether the host should ask for fresh candidates after `typed`
    pub fn triggers_refresh(&self, typed: &str) -> bool {
        self.refresh_triggers.is_match(typed)
    }
}

/// The part of `text` before the character `column`
pub(crate) fn typed_prefix(text: &str, column: usize) -> &str {
    match text.char_indices().nth(column) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

pub(crate) fn typed_word(typed: &str) -> &str {
    RE_WORD.find(typed).map(|m| m.as_str()).unwrap_or_default()
}

pub(crate) fn enclosing_function(typed: &str) -> Option<&str> {
    let captures = RE_FUNCTION.captures(typed)?;
    captures.get(1).map(|m| m.as_str())
}

fn column_of_insertion(typed: &str, column: usize, word: &Regex) -> usize {
    let length = word
        .find(typed)
        .map(|m| m.as_str().chars().count())
        .unwrap_or(0);

    column.min(typed.chars().count()) - length
}
