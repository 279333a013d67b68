//
// engine.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use omni_listing::Candidate;
use serde::Serialize;

use crate::config::OmniConfig;
use crate::context::Context;
use crate::context::ContextDetector;
use crate::context::ContextKind;
use crate::filter::arguments_of;
use crate::filter::filter_by_prefix;
use crate::session::Session;
use crate::store::CandidateStore;

/// Answer to a completion request
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CompletionResponse {
    /// Column from which the chosen candidate replaces the typed text
    pub start_column: usize,
    pub candidates: Vec<Candidate>,
}

/// Completion source for one R session
pub struct Engine<S: Session> {
    config: OmniConfig,
    detector: ContextDetector,
    store: CandidateStore,
    session: S,
}

impl<S: Session> Engine<S> {
    /// Creates the engine and starts the session if needed. A session that
    /// fails to start is logged, completions are then drawn from whatever
    /// listings are already on disk.
    pub fn new(config: OmniConfig, session: S) -> anyhow::Result<Self> {
        let detector = ContextDetector::new(&config)?;

        let mut engine = Self {
            config,
            detector,
            store: CandidateStore::new(),
            session,
        };
        engine.start_session();

        Ok(engine)
    }

    fn start_session(&mut self) {
        if self.session.is_running() {
            return;
        }

        if let Err(err) = self.session.start() {
            log::error!("Could not start the R session: {err:?}");
        }
    }

    pub fn config(&self) -> &OmniConfig {
        &self.config
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CandidateStore {
        &mut self.store
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Reads the listings of the installed packages
    pub fn load_package_listings(&mut self) -> anyhow::Result<()> {
        let dir = self.config.paths.completion_dir.clone();
        self.store.load_package_listings(&dir)
    }

    /// Whether the host should ask for completions after `typed`
    pub fn triggers_refresh(&self, typed: &str) -> bool {
        self.detector.triggers_refresh(typed)
    }

    pub fn detect<L: AsRef<str>>(&self, lines: &[L], line: usize, column: usize) -> Context {
        self.detector.detect(lines, line, column)
    }

    /// Completion candidates at the cursor.
    ///
    /// `line` is the 0-based index of the cursor line in `lines`, `column` the
    /// number of characters before the cursor.
    pub fn complete<L: AsRef<str>>(
        &mut self,
        lines: &[L],
        line: usize,
        column: usize,
    ) -> CompletionResponse {
        let context = self.detect(lines, line, column);

        log::info!(
            "word: \"{}\", function: \"{}\", pipe: {:?}",
            context.word,
            context.function.as_deref().unwrap_or_default(),
            context.pipe
        );

        let candidates = match context.kind() {
            ContextKind::Quoted | ContextKind::Empty => Vec::new(),
            ContextKind::Call(function) if self.config.is_package_loader(function) => {
                self.store.installed_packages.clone()
            },
            ContextKind::Call(function) => {
                self.refresh();
                self.call_matches(function, &context.word, context.pipe.as_deref())
            },
            ContextKind::Word => {
                self.refresh();
                self.word_matches(&context.word, context.pipe.as_deref())
            },
        };

        log::debug!("matches: {:?}", labels(&candidates));

        CompletionResponse {
            start_column: context.start_column,
            candidates,
        }
    }

    fn refresh(&mut self) {
        self.refresh_session_objects();
        self.refresh_loaded_packages();
    }

    /// Asks the session for its loaded packages and recomputes the loaded
    /// functions if they changed. Returns whether they did.
    ///
    /// When the packages can't be read, the previous ones are kept.
    pub fn refresh_loaded_packages(&mut self) -> bool {
        let path = self.config.paths.loaded_packages_file();
        self.session.register_for_deletion(&path);

        if let Err(err) = self.session.request_serialize(".packages()", &path) {
            log::warn!("Can't request loaded R packages: {err:?}");
        }

        let packages = match self.session.read_records(&path) {
            Ok(lines) => lines
                .into_iter()
                .filter(|line| !line.is_empty())
                .collect(),
            Err(err) => {
                log::warn!("Cannot find loaded R packages. Please start the R session: {err:?}");
                self.store.loaded_packages().to_vec()
            },
        };

        let changed = self.store.set_loaded_packages(packages);
        if changed {
            log::info!("Update loaded R packages: {:?}", self.store.loaded_packages());
        }

        changed
    }

    /// Rereads the objects of the session's global environment, keeping the
    /// previous ones when the listing can't be read
    pub fn refresh_session_objects(&mut self) {
        let path = self.config.paths.object_listing_file();

        if let Err(err) = self.session.request_object_listing(&path) {
            log::warn!("Can't request the R object listing: {err:?}");
        }

        match self.session.read_records(&path) {
            Ok(lines) => self.store.set_session_objects(&lines),
            Err(err) => log::warn!("Can't read the R object listing: {err:?}"),
        }
    }

    /// Objects and functions matching `word`, objects first.
    ///
    /// In a pipe chain the objects are the fields of the piped object. When
    /// `word` reaches into an object with `$`, they are that object's fields.
    /// Otherwise fields are kept out of the way.
    fn word_matches(&self, word: &str, pipe: Option<&str>) -> Vec<Candidate> {
        let objects = &self.store.session_objects;

        let mut matches = match pipe {
            Some(pipe) => filter_by_prefix(objects, &format!("{pipe}$"), None, true),
            None if word.contains('$') => filter_by_prefix(objects, word, None, true),
            None => filter_by_prefix(objects, word, Some("$"), false),
        };

        let functions = [
            self.store.loaded_functions.as_slice(),
            self.store.installed_packages.as_slice(),
        ]
        .concat();
        matches.extend(filter_by_prefix(&functions, word, None, false));

        matches
    }

    /// Arguments of `function` together with the matches for `word`.
    ///
    /// Arguments come first, unless we're in a pipe chain where the fields of
    /// the piped object are more likely to be wanted.
    fn call_matches(&self, function: &str, word: &str, pipe: Option<&str>) -> Vec<Candidate> {
        let mut args = arguments_of(&self.store.loaded_functions, function);

        // User defined functions live in the global environment
        if args.len() <= 1 {
            let fallback = arguments_of(&self.store.session_objects, function);
            if fallback.is_known() {
                args = fallback;
            }
        }

        let args = args.into_candidates();
        let objects = self.word_matches(word, pipe);

        match pipe {
            Some(_) => [objects, args].concat(),
            None => [args, objects].concat(),
        }
    }
}

fn labels(candidates: &[Candidate]) -> Vec<&str> {
    candidates
        .iter()
        .map(|candidate| candidate.label.as_str())
        .collect()
}
