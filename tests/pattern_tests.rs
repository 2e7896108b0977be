use presto::error::RouteError;
use presto::router::compile;

#[test]
fn captures_named_params() {
    let matcher = compile("/home/:id/:slug").unwrap();
    let params = matcher.match_path("/home/42/intro").unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params.get("id").map(String::as_str), Some("42"));
    assert_eq!(params.get("slug").map(String::as_str), Some("intro"));
}

#[test]
fn anchoring_rejects_shorter_and_longer_paths() {
    let matcher = compile("/home/:id/:slug").unwrap();
    assert!(matcher.match_path("/home/42").is_none());
    assert!(matcher.match_path("/home/42/intro/extra").is_none());
}

#[test]
fn prefix_pattern_does_not_match_deeper_path() {
    let matcher = compile("/home").unwrap();
    assert!(matcher.match_path("/home").is_some());
    assert!(matcher.match_path("/home/extra").is_none());
}

#[test]
fn literal_metacharacters_match_themselves_only() {
    let matcher = compile("/v1.0/users").unwrap();
    assert!(matcher.match_path("/v1.0/users").is_some());
    assert!(matcher.match_path("/v1x0/users").is_none());
}

#[test]
fn params_are_word_characters_only() {
    let matcher = compile("/home/:id/:slug").unwrap();
    assert!(matcher.match_path("/home/42/intro_2").is_some());
    // '-' is outside the parameter character class.
    assert!(matcher.match_path("/home/42/intro-x").is_none());
    // A parameter cannot span a '/' either.
    assert!(matcher.match_path("/home/4/2/intro").is_none());
}

#[test]
fn pattern_without_params_matches_exactly() {
    let matcher = compile("/about").unwrap();
    assert!(matcher.match_path("/about").unwrap().is_empty());
}

#[test]
fn empty_pattern_is_rejected() {
    assert_eq!(compile(""), Err(RouteError::EmptyPattern));
}

#[test]
fn pattern_must_start_with_slash() {
    assert_eq!(
        compile("home"),
        Err(RouteError::MissingLeadingSlash("home".to_string()))
    );
}

#[test]
fn empty_param_name_is_rejected() {
    assert_eq!(
        compile("/a/:/b"),
        Err(RouteError::EmptyParamName("/a/:/b".to_string()))
    );
}

#[test]
fn duplicate_param_names_are_rejected() {
    assert!(matches!(
        compile("/org/:id/user/:id"),
        Err(RouteError::DuplicateParam { .. })
    ));
}
