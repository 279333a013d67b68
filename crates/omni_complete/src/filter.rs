//
// filter.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use omni_listing::Candidate;
use omni_listing::Category;

/// Candidates whose label starts with `prefix`, in their original order.
///
/// An empty prefix matches nothing. Labels containing `hide` are dropped.
/// With `strip`, the returned copies have `prefix` removed from their label,
/// e.g. `df$col` becomes `col` for the prefix `df$`.
pub fn filter_by_prefix(
    candidates: &[Candidate],
    prefix: &str,
    hide: Option<&str>,
    strip: bool,
) -> Vec<Candidate> {
    if prefix.is_empty() {
        return Vec::new();
    }

    candidates
        .iter()
        .filter(|candidate| candidate.label.starts_with(prefix))
        .filter(|candidate| match hide {
            Some(hide) => !candidate.label.contains(hide),
            None => true,
        })
        .map(|candidate| {
            let mut candidate = candidate.clone();
            if strip {
                candidate.label = candidate.label[prefix.len()..].to_string();
            }
            candidate
        })
        .collect()
}

pub fn filter_by_category(candidates: &[Candidate], category: Option<&Category>) -> Vec<Candidate> {
    let Some(category) = category else {
        return candidates.to_vec();
    };

    candidates
        .iter()
        .filter(|candidate| &candidate.category == category)
        .cloned()
        .collect()
}

/// Candidates from any of `packages`. The package names are matched as
/// substrings of the candidate's package. No packages, or an empty list,
/// means no filtering.
pub fn filter_by_packages<S: AsRef<str>>(
    candidates: &[Candidate],
    packages: Option<&[S]>,
) -> Vec<Candidate> {
    let packages = match packages {
        Some(packages) if !packages.is_empty() => packages,
        _ => return candidates.to_vec(),
    };

    candidates
        .iter()
        .filter(|candidate| {
            let Some(package) = &candidate.package else {
                return false;
            };
            packages
                .iter()
                .any(|name| package.contains(name.as_ref()))
        })
        .cloned()
        .collect()
}

/// Arguments of a function, as far as a candidate list knows them
#[derive(Clone, Debug, PartialEq)]
pub enum Arguments {
    /// No candidate describes the function's arguments
    Unknown,
    Known(Vec<Candidate>),
}

impl Arguments {
    /// Number of entries, the `Unknown` placeholder counting as one
    pub fn len(&self) -> usize {
        match self {
            Arguments::Unknown => 1,
            Arguments::Known(args) => args.len(),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Arguments::Known(_))
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            Arguments::Unknown => Vec::new(),
            Arguments::Known(args) => args,
        }
    }
}

/// Arguments of the first candidate named `function` that describes them
pub fn arguments_of(candidates: &[Candidate], function: &str) -> Arguments {
    candidates
        .iter()
        .filter(|candidate| candidate.label == function)
        .find_map(|candidate| candidate.arguments.clone())
        .map_or(Arguments::Unknown, Arguments::Known)
}
