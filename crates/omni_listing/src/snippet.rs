//
// snippet.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use itertools::Itertools;

/// Marker used by the listings for functions that take no arguments
pub const NO_ARGS: &str = "NO_ARGS";

/// The variadic argument
pub const DOTS: &str = "...";

/// Builds the call snippet inserted when a function is completed.
///
/// Only mandatory arguments (the ones without a default) get a placeholder,
/// numbered from 1 in the order of the signature. `...` only gets one when
/// it is the first mandatory argument. A function with a single argument
/// gets a trailing `$1` where the cursor lands after the field, or in place
/// of the field when the argument is optional.
pub fn synthesize<S: AsRef<str>>(function: &str, args: &[S]) -> String {
    if args.first().map(|arg| arg.as_ref()) == Some(NO_ARGS) {
        return format!("{function}()");
    }

    let fields = args
        .iter()
        .map(|arg| arg.as_ref())
        .filter(|arg| !arg.contains('='))
        .enumerate()
        .filter(|(position, arg)| *position == 0 || *arg != DOTS)
        .map(|(_, arg)| arg)
        .collect::<Vec<&str>>();

    let mut fields = fields
        .iter()
        .enumerate()
        .map(|(index, arg)| format!("${{{}:{}}}", index + 1, arg))
        .collect::<Vec<String>>();

    if args.len() == 1 {
        fields.push(String::from("$1"));
    }

    format!("{function}({})", fields.iter().join(", "))
}
