use ratcalc::EvalState;

fn texts(results: &[ratcalc::LineResult]) -> Vec<String> {
    results.iter().map(|r| r.text.clone()).collect()
}

#[test]
fn basic_caching() {
    let mut state = EvalState::new();

    let lines = ["x = 10", "x + 5"];
    let results = state.eval_all(&lines, false);
    assert_eq!(texts(&results), vec!["10", "15"]);

    // Re-evaluating the identical buffer serves from cache.
    let results = state.eval_all(&lines, false);
    assert_eq!(texts(&results), vec!["10", "15"]);
}

#[test]
fn dirty_propagation_on_rebind() {
    let mut state = EvalState::new();
    state.eval_all(&["x = 10", "x + 5"], false);

    let results = state.eval_all(&["x = 20", "x + 5"], false);
    assert_eq!(texts(&results), vec!["20", "25"]);
}

#[test]
fn rebind_propagates_through_chains() {
    let mut state = EvalState::new();
    let results = state.eval_all(&["a = 2", "b = a * 10", "b + 1"], false);
    assert_eq!(texts(&results), vec!["2", "20", "21"]);

    let results = state.eval_all(&["a = 3", "b = a * 10", "b + 1"], false);
    assert_eq!(texts(&results), vec!["3", "30", "31"]);
}

#[test]
fn unchanged_rebind_does_not_dirty_dependents() {
    let mut state = EvalState::new();
    state.eval_all(&["x = 10", "x + 5"], false);

    // Textually different but the same value: dependents stay clean and
    // still render correctly from cache.
    let results = state.eval_all(&["x = 5 + 5", "x + 5"], false);
    assert_eq!(texts(&results), vec!["10", "15"]);
}

#[test]
fn now_tick_invalidation() {
    let mut state = EvalState::new();

    let results = state.eval_all(&["now()"], false);
    assert!(!results[0].is_error, "now() error: {}", results[0].text);

    let results = state.eval_all(&["now()"], true);
    assert!(!results[0].is_error);
    assert!(!results[0].text.is_empty());
}

#[test]
fn now_tick_reaches_through_conversions() {
    let mut state = EvalState::new();

    let results = state.eval_all(&["now() to EST"], false);
    assert!(!results[0].is_error, "now() to EST error: {}", results[0].text);
    let first = results[0].text.clone();

    // Without a tick the cached text is reused verbatim.
    let results = state.eval_all(&["now() to EST"], false);
    assert_eq!(results[0].text, first);

    // With a tick the line re-evaluates (the dependency is detected
    // through the conversion wrapper).
    let results = state.eval_all(&["now() to EST"], true);
    assert!(!results[0].is_error);
    assert!(results[0].text.contains("-0500"));
}

#[test]
fn empty_and_comment_lines() {
    let mut state = EvalState::new();
    let results = state.eval_all(&["", "; comment", "// comment", "5 + 3"], false);
    assert_eq!(texts(&results), vec!["", "", "", "8"]);
    assert!(results.iter().all(|r| !r.is_error));
}

#[test]
fn line_count_change_resets_cache() {
    let mut state = EvalState::new();

    let results = state.eval_all(&["1 + 1"], false);
    assert_eq!(texts(&results), vec!["2"]);

    let results = state.eval_all(&["1 + 1", "3 + 4"], false);
    assert_eq!(texts(&results), vec!["2", "7"]);
}

#[test]
fn line_references() {
    let mut state = EvalState::new();
    let results = state.eval_all(&["10", "#1 + 5", "#2 * 2"], false);
    assert_eq!(texts(&results), vec!["10", "15", "30"]);

    let results = state.eval_all(&["20", "#1 + 5", "#2 * 2"], false);
    assert_eq!(texts(&results), vec!["20", "25", "50"]);
}

#[test]
fn errors_render_without_poisoning_later_lines() {
    let mut state = EvalState::new();
    let results = state.eval_all(&["x = 5 / 0", "x + 1", "2 + 2"], false);

    assert!(results[0].is_error);
    assert_eq!(results[0].text, "division by zero");

    // The failed assignment binds nothing, so the dependent fails on the
    // undefined name rather than reading a stale value.
    assert!(results[1].is_error);
    assert!(results[1].text.contains("undefined variable"));

    assert_eq!(results[2].text, "4");
    assert!(!results[2].is_error);
}

#[test]
fn recovery_after_error_rebinds_dependents() {
    let mut state = EvalState::new();
    state.eval_all(&["x = 5 / 0", "x + 1"], false);

    let results = state.eval_all(&["x = 5 / 1", "x + 1"], false);
    assert_eq!(texts(&results), vec!["5", "6"]);
    assert!(results.iter().all(|r| !r.is_error));
}

#[test]
fn parse_errors_surface_their_message() {
    let mut state = EvalState::new();
    let results = state.eval_all(&["(1 + 2"], false);
    assert!(results[0].is_error);
    assert!(results[0].text.contains("expected ')'"));
}

#[test]
fn breaking_an_assignment_dirties_dependents() {
    let mut state = EvalState::new();
    let results = state.eval_all(&["x = 10", "x + 5"], false);
    assert_eq!(texts(&results), vec!["10", "15"]);

    // Line 0 stops binding x; the dependent must not keep its stale 15.
    let results = state.eval_all(&["(", "x + 5"], false);
    assert!(results[0].is_error);
    assert!(results[1].is_error);
    assert!(results[1].text.contains("undefined variable"));
}

#[test]
fn blanking_an_assignment_dirties_dependents() {
    let mut state = EvalState::new();
    let results = state.eval_all(&["x = 10", "x + 5"], false);
    assert_eq!(texts(&results), vec!["10", "15"]);

    // Same line count, but the binding line is now blank.
    let results = state.eval_all(&["", "x + 5"], false);
    assert_eq!(results[0].text, "");
    assert!(results[1].is_error);
    assert!(results[1].text.contains("undefined variable"));
}

#[test]
fn cold_and_warm_passes_agree() {
    let lines = ["a = 1/3",
                 "b = a + 1/6",
                 "b to hms",
                 "5 meters + 100 cm",
                 "; note",
                 "bad +"];

    let mut cold = EvalState::new();
    let first = cold.eval_all(&lines, false);
    let second = cold.eval_all(&lines, false);
    assert_eq!(first, second);
}

#[test]
fn display_width_is_tunable() {
    let mut state = EvalState::new();
    state.set_max_display_width(6);
    let results = state.eval_all(&["1230000000"], false);
    assert_eq!(results[0].text, "1.23e+9");

    state.set_max_display_width(24);
    let results = state.eval_all(&["1230000001"], false);
    assert_eq!(results[0].text, "1230000001");
}
