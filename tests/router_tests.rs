use http::Method;
use may::sync::mpsc;
use presto::dispatcher::{HandlerRequest, HandlerSender};
use presto::router::RouteTable;

fn sender() -> HandlerSender {
    let (tx, _rx) = mpsc::channel::<HandlerRequest>();
    tx
}

#[test]
fn first_registered_pattern_wins() {
    let mut table = RouteTable::new();
    table.register("/:page", Method::GET, None, sender()).unwrap();
    table.register("/home", Method::GET, None, sender()).unwrap();

    // `/home` satisfies both patterns; the earlier registration wins even
    // though the later one is more specific.
    let found = table.find(&Method::GET, "/home").unwrap();
    assert_eq!(found.entry.pattern, "/:page");
    assert_eq!(found.params.get("page").map(String::as_str), Some("home"));
}

#[test]
fn path_match_without_method_falls_through() {
    let mut table = RouteTable::new();
    table.register("/x", Method::GET, None, sender()).unwrap();
    table.register("/:any", Method::POST, None, sender()).unwrap();

    // `/x` matches the first pattern but that record has no POST slot; the
    // scan must continue to the later pattern rather than giving up.
    let found = table.find(&Method::POST, "/x").unwrap();
    assert_eq!(found.entry.pattern, "/:any");
}

#[test]
fn missing_method_everywhere_is_no_match() {
    let mut table = RouteTable::new();
    table.register("/home", Method::GET, None, sender()).unwrap();
    assert!(table.find(&Method::POST, "/home").is_none());
}

#[test]
fn methods_share_one_entry_per_pattern() {
    let mut table = RouteTable::new();
    table.register("/home", Method::GET, None, sender()).unwrap();
    table.register("/home", Method::POST, None, sender()).unwrap();

    assert_eq!(table.len(), 1);
    assert!(table.find(&Method::GET, "/home").is_some());
    assert!(table.find(&Method::POST, "/home").is_some());
}

#[test]
fn reregistration_replaces_only_that_method() {
    let mut table = RouteTable::new();
    let (first_tx, first_rx) = mpsc::channel::<HandlerRequest>();
    table.register("/home", Method::GET, None, first_tx).unwrap();
    table.register("/home", Method::POST, None, sender()).unwrap();

    // Overwrite the GET slot; the old sender is dropped and its channel
    // closes, while POST keeps working.
    table.register("/home", Method::GET, None, sender()).unwrap();
    drop(first_rx);

    assert_eq!(table.len(), 1);
    assert!(table.find(&Method::GET, "/home").is_some());
    assert!(table.find(&Method::POST, "/home").is_some());
}

#[test]
fn bad_pattern_surfaces_registration_error() {
    let mut table = RouteTable::new();
    assert!(table.register("nope", Method::GET, None, sender()).is_err());
    assert!(table.is_empty());
}

#[test]
fn iteration_preserves_registration_order() {
    let mut table = RouteTable::new();
    table.register("/b", Method::GET, None, sender()).unwrap();
    table.register("/a", Method::GET, None, sender()).unwrap();
    table.register("/c", Method::GET, None, sender()).unwrap();

    let patterns: Vec<&str> = table.iter().map(|e| e.pattern.as_str()).collect();
    assert_eq!(patterns, ["/b", "/a", "/c"]);
}
