//
// config.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;

/// Configuration of the completion source
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct OmniConfig {
    pub source: SourceConfig,

    /// Calls whose arguments are package names, e.g. `library(`
    pub package_loaders: Vec<String>,

    /// Operators that chain a value through calls
    pub pipe_operators: Vec<String>,

    pub paths: PathsConfig,
}

/// How the source registers with the completion host
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SourceConfig {
    pub name: String,
    pub priority: u32,
    pub abbreviation: String,

    /// Grammar scopes the source is active in
    pub scopes: Vec<String>,

    /// Pattern of the word replaced on insertion. Doesn't include `$` so that
    /// `df$col` only replaces `col`.
    pub word_pattern: String,

    pub early_cache: u32,

    /// The host asks for a refresh when the typed text ends with one of these
    pub refresh_patterns: Vec<String>,
}

/// Where the R session writes its listings
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of the `omnils_*` package listings
    pub completion_dir: PathBuf,

    /// Directory of the per-session temporary files
    pub tmp_dir: PathBuf,

    /// Identifier of the R session, suffixed to temporary file names
    pub session_id: String,
}

impl Default for OmniConfig {
    fn default() -> Self {
        Self {
            source: Default::default(),
            package_loaders: vec![String::from("library"), String::from("require")],
            pipe_operators: vec![String::from("%>%"), String::from("|>")],
            paths: Default::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: String::from("R"),
            priority: 9,
            abbreviation: String::from("R"),
            scopes: vec![String::from("r")],
            word_pattern: String::from(r"[\w_\.]+"),
            early_cache: 1,
            refresh_patterns: vec![
                String::from(r"\$"),
                String::from(r"\("),
                String::from("\""),
                String::from("'"),
                String::from(r",\s"),
            ],
        }
    }
}

impl OmniConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config = serde_json::from_str(text)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Can't read config file '{}'", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Can't parse config file '{}'", path.display()))
    }

    /// Fills in paths that were left unset from the variables nvim-R exports
    /// to the R session (`NVIMR_COMPLDIR`, `NVIMR_TMPDIR`, `NVIMR_ID`)
    pub fn with_env_fallbacks(mut self) -> Self {
        let paths = &mut self.paths;

        if paths.completion_dir.as_os_str().is_empty() {
            if let Ok(dir) = env::var("NVIMR_COMPLDIR") {
                paths.completion_dir = PathBuf::from(dir);
            }
        }

        if paths.tmp_dir.as_os_str().is_empty() {
            if let Ok(dir) = env::var("NVIMR_TMPDIR") {
                paths.tmp_dir = PathBuf::from(dir);
            }
        }

        if paths.session_id.is_empty() {
            if let Ok(id) = env::var("NVIMR_ID") {
                paths.session_id = id;
            }
        }

        self
    }

    pub fn is_package_loader(&self, function: &str) -> bool {
        self.package_loaders.iter().any(|loader| loader == function)
    }
}

impl PathsConfig {
    /// File the R session writes `.packages()` to
    pub fn loaded_packages_file(&self) -> PathBuf {
        self.tmp_dir.join(format!("loaded_pkgs_{}", self.session_id))
    }

    /// File the R session writes the global environment listing to
    pub fn object_listing_file(&self) -> PathBuf {
        self.tmp_dir.join(format!("GlobalEnvList_{}", self.session_id))
    }
}
