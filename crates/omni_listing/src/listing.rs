//
// listing.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

// Omni listings are written by nvimcom, one symbol per line:
//
//   word ^F kind ^F <unused> ^F package ^F info
//
// For functions, `info` starts with the argument list (up to the first ^H),
// arguments are separated by tabs and ^G separates a name from its default.

use crate::candidate::menu_column;
use crate::candidate::Candidate;
use crate::candidate::Category;
use crate::snippet::synthesize;
use crate::snippet::DOTS;
use crate::snippet::NO_ARGS;

pub const FIELD_SEPARATOR: char = '\x06';
pub const INFO_SEPARATOR: char = '\x08';
pub const ARGUMENT_SEPARATOR: char = '\t';
pub const DEFAULT_SEPARATOR: char = '\x07';

/// Turns one listing line into a candidate.
///
/// Returns `None` for lines without a word and a kind, e.g. blank lines.
/// Missing trailing fields are treated as empty.
pub fn parse_record(line: &str) -> Option<Candidate> {
    let mut fields = line.trim().split(FIELD_SEPARATOR);

    let word = fields.next().unwrap_or_default();
    let kind = fields.next().unwrap_or_default();
    let _unused = fields.next();
    let package = fields.next().unwrap_or_default();
    let info = fields.next().unwrap_or_default();

    create_candidate(word, kind, package, info)
}

/// Turns a whole listing into candidates, skipping lines that don't describe
/// a symbol
pub fn parse_records<S: AsRef<str>>(lines: &[S]) -> Vec<Candidate> {
    lines
        .iter()
        .filter_map(|line| parse_record(line.as_ref()))
        .collect()
}

/// Candidate for one listing entry, or `None` when the entry has neither a
/// word nor a kind
pub fn create_candidate(word: &str, kind: &str, package: &str, info: &str) -> Option<Candidate> {
    if word.is_empty() && kind.is_empty() {
        return None;
    }

    let category = Category::from(kind);

    if category == Category::Argument {
        return Some(Candidate::argument(word));
    }

    let mut candidate = Candidate::new(word, category);

    if !package.is_empty() {
        candidate.package = Some(package.to_string());
    }

    match &candidate.category {
        Category::Function => {
            let args = function_arguments(info);

            if args.is_empty() {
                candidate.snippet = Some(format!("{word}($1)"));
            } else {
                let signature = if args[0] == NO_ARGS {
                    String::new()
                } else {
                    args.join(", ")
                };

                let package_column = menu_column(&format!("{{{package}}}"));
                candidate.menu = format!("{package_column} {word}({signature})");
                candidate.snippet = Some(synthesize(word, &args));
                candidate.arguments = Some(
                    args.iter()
                        .filter(|arg| *arg != NO_ARGS && *arg != DOTS)
                        .map(|arg| Candidate::argument(arg))
                        .collect(),
                );
            }
        },
        Category::Package => {
            candidate.snippet = Some(format!("{word}::$1"));
        },
        category if category.is_data_frame() => {
            candidate.snippet = Some(format!("{word}$$1"));
        },
        _ => {},
    }

    Some(candidate)
}

/// Extracts the argument tokens of a function from its info field, rendering
/// defaults as `name = default`
pub fn function_arguments(info: &str) -> Vec<String> {
    let args = info.split(INFO_SEPARATOR).next().unwrap_or_default();

    args.split(ARGUMENT_SEPARATOR)
        .filter(|arg| !arg.is_empty())
        .map(|arg| arg.replace(DEFAULT_SEPARATOR, " = "))
        .collect()
}

/// Name of the package described by a listing file, e.g. `dplyr` for
/// `omnils_dplyr_1.1.4`. This is the text between the first two underscores.
pub fn package_from_listing_name(file_name: &str) -> Option<&str> {
    let (_, rest) = file_name.split_once('_')?;
    let (package, _) = rest.split_once('_')?;

    if package.is_empty() {
        return None;
    }

    Some(package)
}
