//
// completions.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

// End-to-end completion requests against an in-memory R session.

use std::path::PathBuf;

use omni_complete::fixtures::cursor_from_marker;
use omni_complete::fixtures::function_record;
use omni_complete::fixtures::record;
use omni_complete::fixtures::FakeSession;
use omni_complete::CompletionResponse;
use omni_complete::Engine;
use omni_complete::OmniConfig;
use omni_listing::parse_record;
use omni_listing::Category;

fn config() -> OmniConfig {
    let mut config = OmniConfig::default();
    config.paths.tmp_dir = PathBuf::from("/tmp/nvimr");
    config.paths.session_id = String::from("1");
    config
}

fn session() -> FakeSession {
    let config = config();
    let mut session = FakeSession::new();

    session.set_file(config.paths.loaded_packages_file(), &["base", "dplyr"]);
    session.set_file(config.paths.object_listing_file(), &[
        record("df", "data.frame", ".GlobalEnv"),
        record("df$col", "numeric", ".GlobalEnv"),
        record("df$other", "character", ".GlobalEnv"),
        record("dfx", "numeric", ".GlobalEnv"),
        record("x_var", "numeric", ".GlobalEnv"),
        function_record("my_fun", ".GlobalEnv", &["a", "b = 2"]),
    ]);

    session
}

fn engine() -> Engine<FakeSession> {
    let mut engine = Engine::new(config(), session()).unwrap();

    let store = engine.store_mut();
    store.add_package_listing("omnils_base_4.4.0", &[
        function_record("mean", "base", &["x", "...", "trim = 0", "na.rm = FALSE"]),
        function_record("diff", "base", &["x", "..."]),
        record("letters", "character", "base"),
    ]);
    store.add_package_listing("omnils_dplyr_1.1.4", &[
        function_record("filter", "dplyr", &[".data", "...", ".preserve = FALSE"]),
        function_record("distinct", "dplyr", &[".data", "...", ".keep_all = FALSE"]),
    ]);
    store.add_package_listing("omnils_data.table_1.15.0", &[function_record(
        "data.table",
        "data.table",
        &["...", "keep.rownames = FALSE"],
    )]);

    engine
}

fn complete(engine: &mut Engine<FakeSession>, text: &str) -> CompletionResponse {
    let (lines, line, column) = cursor_from_marker(text);
    engine.complete(&lines, line, column)
}

fn labels(response: &CompletionResponse) -> Vec<&str> {
    response
        .candidates
        .iter()
        .map(|candidate| candidate.label.as_str())
        .collect()
}

#[test]
fn test_field_access_strips_object_prefix() {
    let mut engine = engine();

    let context = engine.detect(&["df$"], 0, 3);
    assert!(context.is_field_access());

    let response = complete(&mut engine, "df$@");
    assert_eq!(labels(&response), vec!["col", "other"]);
    assert_eq!(response.start_column, 3);

    // The stored objects keep their full names
    assert!(engine
        .store()
        .session_objects
        .iter()
        .any(|candidate| candidate.label == "df$col"));
}

#[test]
fn test_field_access_with_partial_field() {
    let mut engine = engine();
    let response = complete(&mut engine, "df$co@");
    assert_eq!(labels(&response), vec!["l"]);
}

#[test]
fn test_bare_word_objects_before_functions() {
    let mut engine = engine();
    let response = complete(&mut engine, "d@");

    // Fields are hidden, loaded functions come before installed packages
    assert_eq!(labels(&response), vec![
        "df",
        "dfx",
        "diff",
        "distinct",
        "dplyr",
        "data.table"
    ]);

    let package = &response.candidates[4];
    assert_eq!(package.category, Category::Package);
    assert_eq!(package.snippet.as_deref(), Some("dplyr::$1"));

    let function = &response.candidates[2];
    assert_eq!(function.snippet.as_deref(), Some("diff(${1:x})"));
}

#[test]
fn test_functions_of_unloaded_packages_are_not_offered() {
    let mut engine = engine();
    let response = complete(&mut engine, "x <- data.t@");

    // Only the package itself, its functions aren't loaded
    assert_eq!(labels(&response), vec!["data.table"]);
    assert_eq!(response.candidates[0].category, Category::Package);
}

#[test]
fn test_call_arguments_come_first() {
    let mut engine = engine();
    let response = complete(&mut engine, "mean(x@");

    assert_eq!(labels(&response), vec!["x", "trim", "na.rm", "x_var"]);
    assert_eq!(response.candidates[0].category, Category::Argument);
    assert_eq!(
        response.candidates[1].snippet.as_deref(),
        Some("trim = ${1:0}")
    );
}

#[test]
fn test_call_with_nothing_typed_offers_arguments() {
    let mut engine = engine();
    let response = complete(&mut engine, "y <- mean(@");
    assert_eq!(labels(&response), vec!["x", "trim", "na.rm"]);
}

#[test]
fn test_pipe_objects_come_before_arguments() {
    let mut engine = engine();
    let response = complete(&mut engine, "df %>%\n  filter(@");
    assert_eq!(labels(&response), vec!["col", "other", ".data", ".preserve"]);

    let response = complete(&mut engine, "df |> distinct(@");
    assert_eq!(labels(&response), vec!["col", "other", ".data", ".keep_all"]);
}

#[test]
fn test_pipe_fields_without_call() {
    let mut engine = engine();
    let response = complete(&mut engine, "df %>%\n  @");
    assert_eq!(labels(&response), vec!["col", "other"]);
}

#[test]
fn test_pipe_out_of_reach() {
    let mut engine = engine();
    let response = complete(&mut engine, "df %>%\n  head()\n  filter(x@");
    assert_eq!(labels(&response), vec![".data", ".preserve", "x_var"]);
}

#[test]
fn test_user_function_arguments_fall_back_to_session() {
    let mut engine = engine();
    let response = complete(&mut engine, "my_fun(@");
    assert_eq!(labels(&response), vec!["a", "b"]);
}

#[test]
fn test_single_argument_kept_when_session_has_no_function() {
    let mut engine = engine();
    let response = complete(&mut engine, "diff(@");
    assert_eq!(labels(&response), vec!["x"]);
    assert_eq!(response.candidates[0].category, Category::Argument);
}

#[test]
fn test_single_argument_replaced_by_session_function() {
    let config = config();
    let mut session = session();
    session.set_file(config.paths.object_listing_file(), &[function_record(
        "nrow",
        ".GlobalEnv",
        &["x", "strict = TRUE"],
    )]);

    let mut engine = Engine::new(config, session).unwrap();
    engine
        .store_mut()
        .package_symbols
        .extend(parse_record(&function_record("nrow", "base", &["x"])));

    let response = complete(&mut engine, "nrow(@");
    assert_eq!(labels(&response), vec!["x", "strict"]);
    assert_eq!(
        response.candidates[1].snippet.as_deref(),
        Some("strict = ${1:TRUE}")
    );
}

#[test]
fn test_unknown_function_has_no_arguments() {
    let mut engine = engine();
    let response = complete(&mut engine, "unknown(dfx@");
    assert_eq!(labels(&response), vec!["dfx"]);
}

#[test]
fn test_package_loaders_offer_installed_packages() {
    let mut engine = engine();
    let response = complete(&mut engine, "library(@");
    assert_eq!(labels(&response), vec!["base", "dplyr", "data.table"]);

    // Loading packages doesn't need anything from the session
    assert!(engine.session().requests.is_empty());
}

#[test]
fn test_quotes_yield_nothing() {
    let mut engine = engine();

    let response = complete(&mut engine, "read.csv(\"d@");
    assert!(response.candidates.is_empty());

    let response = complete(&mut engine, "x[['@");
    assert!(response.candidates.is_empty());

    assert!(engine.session().requests.is_empty());
}

#[test]
fn test_nothing_typed_yields_nothing() {
    let mut engine = engine();
    let response = complete(&mut engine, "x <- @");
    assert!(response.candidates.is_empty());
    assert!(engine.session().requests.is_empty());
}

#[test]
fn test_requests_to_the_session() {
    let mut engine = engine();
    complete(&mut engine, "d@");

    assert_eq!(engine.session().requests, vec![
        "objects -> /tmp/nvimr/GlobalEnvList_1",
        ".packages() -> /tmp/nvimr/loaded_pkgs_1",
    ]);
    assert_eq!(engine.session().deletions, vec![PathBuf::from(
        "/tmp/nvimr/loaded_pkgs_1"
    )]);
}

#[test]
fn test_loaded_packages_recompute_only_on_change() {
    let mut engine = engine();

    assert!(engine.refresh_loaded_packages());
    assert!(!engine.refresh_loaded_packages());

    let path = engine.config().paths.loaded_packages_file();
    engine
        .session_mut()
        .set_file(&path, &["dplyr", "base", "data.table"]);
    assert!(engine.refresh_loaded_packages());

    let response = complete(&mut engine, "data.t@");
    assert_eq!(labels(&response), vec!["data.table", "data.table"]);
    assert_eq!(response.candidates[0].category, Category::Function);
}

#[test]
fn test_missing_loaded_packages_keep_previous_ones() {
    let mut engine = engine();
    assert!(engine.refresh_loaded_packages());

    let path = engine.config().paths.loaded_packages_file();
    engine.session_mut().remove_file(&path);

    assert!(!engine.refresh_loaded_packages());
    assert_eq!(engine.store().loaded_packages(), ["base", "dplyr"]);
    assert_eq!(engine.store().loaded_functions.len(), 4);
}

#[test]
fn test_missing_object_listing_keeps_previous_objects() {
    let mut engine = engine();
    complete(&mut engine, "df$@");

    let path = engine.config().paths.object_listing_file();
    engine.session_mut().remove_file(&path);

    let response = complete(&mut engine, "df$@");
    assert_eq!(labels(&response), vec!["col", "other"]);
}

#[test]
fn test_session_start_failure_is_not_fatal() {
    let mut session = session();
    session.running = false;
    session.fail_start = true;

    let mut engine = Engine::new(config(), session).unwrap();
    assert_eq!(engine.session().starts, 1);

    let response = complete(&mut engine, "df$@");
    assert_eq!(labels(&response), vec!["col", "other"]);
}

#[test]
fn test_running_session_is_not_restarted() {
    let engine = Engine::new(config(), session()).unwrap();
    assert_eq!(engine.session().starts, 0);
}

#[test]
fn test_invalid_config_is_an_error() {
    let mut config = config();
    config.pipe_operators = Vec::new();
    assert!(Engine::new(config, session()).is_err());
}
