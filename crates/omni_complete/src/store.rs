//
// store.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use std::path::Path;

use anyhow::Context;
use omni_listing::listing::create_candidate;
use omni_listing::listing::package_from_listing_name;
use omni_listing::parse_records;
use omni_listing::Candidate;
use omni_listing::Category;
use rustc_hash::FxHashSet;
use walkdir::WalkDir;

use crate::filter::filter_by_category;
use crate::filter::filter_by_packages;
use crate::session::read_records;

/// Marker in the file names of package listings
pub const LISTING_MARKER: &str = "omnils";

/// The candidates completions are drawn from
#[derive(Debug, Default)]
pub struct CandidateStore {
    /// One candidate per installed package
    pub installed_packages: Vec<Candidate>,

    /// Every symbol of every installed package
    pub package_symbols: Vec<Candidate>,

    /// Functions of the packages currently loaded in the session
    pub loaded_functions: Vec<Candidate>,

    /// Objects of the session's global environment
    pub session_objects: Vec<Candidate>,

    loaded_packages: Vec<String>,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every package listing in `dir`.
    ///
    /// Listings that can't be read are skipped with a warning.
    pub fn load_package_listings(&mut self, dir: &Path) -> anyhow::Result<()> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry
                .with_context(|| format!("Can't list completion directory '{}'", dir.display()))?;

            if !entry.file_type().is_file() {
                continue;
            }
            paths.push(entry.into_path());
        }

        // Directory order is platform dependent
        paths.sort();

        for path in paths {
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !file_name.contains(LISTING_MARKER) {
                continue;
            }

            match read_records(&path) {
                Ok(lines) => self.add_package_listing(file_name, &lines),
                Err(err) => log::warn!("Skipping package listing: {err:?}"),
            }
        }

        log::info!(
            "Loaded {} installed packages and {} package symbols",
            self.installed_packages.len(),
            self.package_symbols.len()
        );

        Ok(())
    }

    /// Adds the symbols of the listing `file_name`, and the package it
    /// describes if its name tells
    pub fn add_package_listing<S: AsRef<str>>(&mut self, file_name: &str, lines: &[S]) {
        if let Some(package) = package_from_listing_name(file_name) {
            self.installed_packages.extend(create_candidate(package, "package", "", ""));
        }

        self.package_symbols.extend(parse_records(lines));
    }

    pub fn loaded_packages(&self) -> &[String] {
        &self.loaded_packages
    }

    /// Records the packages loaded in the session. The loaded functions are
    /// only recomputed when the set of packages changed, which is what the
    /// return value tells.
    pub fn set_loaded_packages(&mut self, packages: Vec<String>) -> bool {
        let old: FxHashSet<&str> = self.loaded_packages.iter().map(String::as_str).collect();
        let new: FxHashSet<&str> = packages.iter().map(String::as_str).collect();
        let changed = old != new;

        self.loaded_packages = packages;

        if changed {
            let packages = Some(self.loaded_packages.as_slice());
            let functions = filter_by_packages(&self.package_symbols, packages);
            self.loaded_functions = filter_by_category(&functions, Some(&Category::Function));
        }

        changed
    }

    pub fn set_session_objects<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.session_objects = parse_records(lines);
    }
}
