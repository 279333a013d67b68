//
// pipe.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::typed_prefix;

/// Lines without a pipe operator we go through before giving up
pub const MAX_NON_PIPE_LINES: usize = 2;

// Something that looks like the start of a new statement, e.g. `x <- `
static RE_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^(]+\s?(?:<-|=)\s?").unwrap());

/// State of the backward search for the value flowing through a pipe chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipeScan {
    Scanning { non_pipe_lines: usize },

    /// The object at the root of the chain, e.g. `df` in `df %>%`
    Found(String),

    /// Reached a line that starts a new statement
    HitAssignment,

    /// Too many lines without a pipe, or no lines left
    Exhausted,
}

impl PipeScan {
    pub fn start() -> Self {
        PipeScan::Scanning { non_pipe_lines: 0 }
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self, PipeScan::Scanning { .. })
    }

    pub fn into_source(self) -> Option<String> {
        match self {
            PipeScan::Found(source) => Some(source),
            _ => None,
        }
    }
}

pub struct PipeMatcher {
    operators: Vec<String>,
    source: Regex,
}

impl PipeMatcher {
    pub fn new<S: AsRef<str>>(operators: &[S]) -> anyhow::Result<Self> {
        let alternatives = operators
            .iter()
            .map(|operator| regex::escape(operator.as_ref()))
            .collect::<Vec<String>>()
            .join("|");

        if alternatives.is_empty() {
            return Err(anyhow::anyhow!("At least one pipe operator is required"));
        }

        let source = Regex::new(&format!(r"([\w_\.\$]+)\s?(?:{alternatives})"))?;
        let operators = operators
            .iter()
            .map(|operator| operator.as_ref().to_string())
            .collect();

        Ok(Self { operators, source })
    }

    fn has_operator(&self, text: &str) -> bool {
        self.operators
            .iter()
            .any(|operator| text.contains(operator.as_str()))
    }

    /// Walks up from the cursor looking for the root of a pipe chain.
    ///
    /// Only the text before the cursor counts on the cursor line. Lines that
    /// continue the chain without naming its root (`select(x) %>%`) are
    /// skipped for free, other lines count towards `MAX_NON_PIPE_LINES`.
    pub fn scan<S: AsRef<str>>(&self, lines: &[S], line: usize, column: usize) -> PipeScan {
        let mut state = PipeScan::start();

        for row in (0..=line).rev() {
            let Some(text) = lines.get(row) else {
                continue;
            };

            let text = text.as_ref();
            let text = if row == line {
                typed_prefix(text, column)
            } else {
                text
            };

            state = self.step(state, text);
            log::trace!("Pipe scan on line {row}: {state:?}");

            if !state.is_scanning() {
                return state;
            }
        }

        PipeScan::Exhausted
    }

    pub fn step(&self, state: PipeScan, text: &str) -> PipeScan {
        let PipeScan::Scanning { non_pipe_lines } = state else {
            return state;
        };

        if self.has_operator(text) {
            return match self.source.captures(text) {
                Some(captures) => PipeScan::Found(captures[1].to_string()),
                None => PipeScan::Scanning { non_pipe_lines },
            };
        }

        let non_pipe_lines = non_pipe_lines + 1;

        if RE_ASSIGNMENT.is_match(text) {
            return PipeScan::HitAssignment;
        }

        if non_pipe_lines >= MAX_NON_PIPE_LINES {
            return PipeScan::Exhausted;
        }

        PipeScan::Scanning { non_pipe_lines }
    }
}
