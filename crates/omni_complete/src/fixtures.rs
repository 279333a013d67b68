//
// fixtures.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use std::path::Path;
use std::path::PathBuf;

use omni_listing::listing::ARGUMENT_SEPARATOR;
use omni_listing::listing::DEFAULT_SEPARATOR;
use omni_listing::listing::FIELD_SEPARATOR;
use omni_listing::listing::INFO_SEPARATOR;
use rustc_hash::FxHashMap;

use crate::session::Session;

/// Splits `text` into lines and finds the cursor, marked with `@`, e.g.
/// `"df %>%\n  filter(@"`. Returns the lines without the marker, the cursor
/// line and the cursor column in characters.
pub fn cursor_from_marker(text: &str) -> (Vec<String>, usize, usize) {
    let mut cursor = None;

    let lines: Vec<String> = text
        .split('\n')
        .enumerate()
        .map(|(row, line)| match line.find('@') {
            Some(index) if cursor.is_none() => {
                cursor = Some((row, line[..index].chars().count()));
                line.replacen('@', "", 1)
            },
            _ => line.to_string(),
        })
        .collect();

    let (line, column) = cursor.unwrap_or_else(|| panic!("No `@` cursor in {text:?}"));
    (lines, line, column)
}

/// Listing line of an object
pub fn record(word: &str, kind: &str, package: &str) -> String {
    [word, kind, "", package, ""].join(&FIELD_SEPARATOR.to_string())
}

/// Listing line of a function, `args` being written as `name` or
/// `name = default`
pub fn function_record(name: &str, package: &str, args: &[&str]) -> String {
    let args = args
        .iter()
        .map(|arg| arg.replace(" = ", &DEFAULT_SEPARATOR.to_string()))
        .collect::<Vec<String>>()
        .join(&ARGUMENT_SEPARATOR.to_string());

    let info = format!("{args}{}Description of {name}", INFO_SEPARATOR);
    [name, "function", "", package, info.as_str()].join(&FIELD_SEPARATOR.to_string())
}

/// In-memory session. Requests are recorded and listings are served from
/// files set up by the test.
#[derive(Debug, Default)]
pub struct FakeSession {
    pub running: bool,
    pub fail_start: bool,
    pub starts: usize,
    pub requests: Vec<String>,
    pub deletions: Vec<PathBuf>,
    files: FxHashMap<PathBuf, Vec<String>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    pub fn set_file<S: AsRef<str>>(&mut self, path: impl AsRef<Path>, lines: &[S]) {
        let lines = lines.iter().map(|line| line.as_ref().to_string()).collect();
        self.files.insert(path.as_ref().to_path_buf(), lines);
    }

    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }
}

impl Session for FakeSession {
    fn is_running(&self) -> bool {
        self.running
    }

    fn start(&mut self) -> anyhow::Result<()> {
        self.starts += 1;
        if self.fail_start {
            return Err(anyhow::anyhow!("R is not installed"));
        }
        self.running = true;
        Ok(())
    }

    fn request_serialize(&mut self, expression: &str, destination: &Path) -> anyhow::Result<()> {
        self.requests.push(format!("{expression} -> {}", destination.display()));
        Ok(())
    }

    fn request_object_listing(&mut self, destination: &Path) -> anyhow::Result<()> {
        self.requests.push(format!("objects -> {}", destination.display()));
        Ok(())
    }

    fn register_for_deletion(&mut self, path: &Path) {
        self.deletions.push(path.to_path_buf());
    }

    fn read_records(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        match self.files.get(path) {
            Some(lines) => Ok(lines.clone()),
            None => Err(anyhow::anyhow!("No such file '{}'", path.display())),
        }
    }
}
