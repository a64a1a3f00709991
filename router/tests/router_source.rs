use scoped_router::{
    location::{HistoryOptions, Location, LocationChange, ServerHistory},
    make_router_driver,
    stream::{Stream, Subject},
    RouteMatch, RouterSource, Routes,
};
use std::sync::{Arc, Mutex};

fn router_over(paths: &[&str]) -> RouterSource {
    let history = ServerHistory::new("/").unwrap();
    let driver =
        make_router_driver(Some(history), HistoryOptions::default()).unwrap();
    driver.run(Stream::from_iter(
        paths.iter().map(|p| LocationChange::from(*p)).collect::<Vec<_>>(),
    ))
}

fn pathnames(router: &RouterSource) -> Vec<String> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    router.history().for_each({
        let seen = Arc::clone(&seen);
        move |location: &Location| {
            seen.lock().unwrap().push(location.pathname.clone())
        }
    });
    let seen = seen.lock().unwrap().clone();
    seen
}

fn matches<V: Clone + Send + Sync + 'static>(
    router: &RouterSource,
    routes: Routes<V>,
) -> Vec<RouteMatch<V>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    router.define(routes).for_each({
        let seen = Arc::clone(&seen);
        move |m: &RouteMatch<V>| seen.lock().unwrap().push(m.clone())
    });
    let seen = seen.lock().unwrap().clone();
    seen
}

fn nested_table() -> Routes<i32> {
    Routes::new()
        .nest("/correct", Routes::new().route("/route", 123))
        .route("*", 999)
}

#[test]
fn root_source_has_empty_namespace() {
    let router = router_over(&["/"]);
    assert!(router.namespace().is_empty());
    assert_eq!(router.create_href("/about"), "/about");
}

#[test]
fn path_filters_the_history() {
    let router = router_over(&["/somewhere/else", "/path/that/is/correct"]);
    assert_eq!(pathnames(&router.path("/path")), ["/path/that/is/correct"]);
    assert!(pathnames(&router.path("/somewhere/nested")).is_empty());
}

#[test]
fn path_does_not_affect_the_original_source() {
    let router = router_over(&["/a/b"]);
    let scoped = router.path("/x");
    assert_eq!(scoped.namespace(), ["x"]);
    assert!(router.namespace().is_empty());
    assert_eq!(pathnames(&router), ["/a/b"]);
    assert!(pathnames(&scoped).is_empty());
}

#[test]
fn path_normalizes_segments() {
    let router = router_over(&["/"]);
    assert_eq!(router.path("some").namespace(), ["some"]);
    assert_eq!(router.path("/a/b/").namespace(), ["a", "b"]);
    assert!(router.path("/").namespace().is_empty());
}

#[test]
fn multiple_paths_filter_the_history() {
    let (subject, router) = live_router();
    let scoped = router
        .path("/some")
        .path("/really")
        .path("/really")
        .path("/deeply")
        .path("/nested")
        .path("/route")
        .path("/that");

    let seen = Arc::new(Mutex::new(Vec::new()));
    scoped.history().for_each({
        let seen = Arc::clone(&seen);
        move |location: &Location| {
            seen.lock().unwrap().push(location.pathname.clone())
        }
    });
    for path in [
        "/the/wrong/path",
        "/some/really/really/deeply/nested/route/that/is/correct",
        "/some/really/really/deeply/nested/incorrect/route",
    ] {
        subject.next(path.into());
    }

    assert_eq!(
        *seen.lock().unwrap(),
        ["/some/really/really/deeply/nested/route/that/is/correct"]
    );
    assert_eq!(
        scoped.create_href("/is/correct"),
        "/some/really/really/deeply/nested/route/that/is/correct"
    );
}

#[test]
fn narrowing_never_widens() {
    let (subject, router) = live_router();
    let outer = router.path("a");
    let inner = outer.path("b");
    let (outer_seen, inner_seen) = (collect(&outer), collect(&inner));
    for path in ["/a", "/a/b", "/a/c", "/b/a", "/a/b/c"] {
        subject.next(path.into());
    }
    let outer_seen = outer_seen.lock().unwrap().clone();
    let inner_seen = inner_seen.lock().unwrap().clone();
    assert_eq!(outer_seen, ["/a", "/a/b", "/a/c", "/a/b/c"]);
    assert_eq!(inner_seen, ["/a/b", "/a/b/c"]);
    assert!(inner_seen.iter().all(|p| outer_seen.contains(p)));
}

#[test]
fn define_matches_routes_against_a_definition() {
    let router = router_over(&["/some/route"]);
    let found = matches(
        &router,
        Routes::new().nest("/some", Routes::new().route("/route", 123)),
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "/some/route");
    assert_eq!(found[0].value, Some(123));
    assert_eq!(found[0].location.pathname, "/some/route");
}

#[test]
fn define_respects_prior_filtering_by_path() {
    let router = router_over(&["/wrong/path", "/some/nested/correct/route"]);
    let found = matches(&router.path("/some").path("/nested"), nested_table());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "/correct/route");
    assert_eq!(found[0].value, Some(123));
    assert_eq!(found[0].location.pathname, "/some/nested/correct/route");
}

#[test]
fn define_emits_for_every_location_in_scope() {
    let (subject, router) = live_router();
    let seen = Arc::new(Mutex::new(Vec::new()));
    router.path("/some").path("/nested").define(nested_table()).for_each({
        let seen = Arc::clone(&seen);
        move |m: &RouteMatch<i32>| {
            seen.lock().unwrap().push((m.path.clone(), m.value))
        }
    });
    for path in ["/wrong/path", "/some/nested/correct/route", "/some/nested/x"] {
        subject.next(path.into());
    }
    assert_eq!(
        *seen.lock().unwrap(),
        [
            ("/correct/route".to_string(), Some(123)),
            ("/x".to_string(), Some(999)),
        ]
    );
}

#[test]
fn define_matches_the_wildcard_if_nothing_else_matches() {
    let router = router_over(&[
        "/wrong/path",
        "/wrong/route",
        "/some/nested/incorrect/route",
    ]);
    let found = matches(&router.path("/some").path("/nested"), nested_table());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "/incorrect/route");
    assert_eq!(found[0].value, Some(999));
    assert_eq!(found[0].location.pathname, "/some/nested/incorrect/route");
}

#[test]
fn define_without_a_match_yields_no_value() {
    let router = router_over(&["/elsewhere"]);
    let found = matches(&router, Routes::new().route("/home", 1));
    assert_eq!(found[0].path, "/elsewhere");
    assert_eq!(found[0].value, None);
}

#[test]
fn define_creates_proper_hrefs() {
    let router = router_over(&["/wrong/path", "/some/nested/correct/route"]);
    let found = matches(&router.path("/some").path("/nested"), nested_table());
    let pathname = &found[0].location.pathname;
    assert_eq!(pathname, "/some/nested/correct/route");
    assert_eq!(&found[0].create_href("/correct/route"), pathname);
}

#[test]
fn define_exposes_create_href_before_any_match() {
    let (_subject, router) = live_router();
    let match_stream = router.path("app").define(Routes::<()>::new());
    assert_eq!(match_stream.create_href("/settings"), "/app/settings");
    assert_eq!(match_stream.create_href("settings"), "/app/settings");
}

#[test]
fn define_matches_partials() {
    let router =
        router_over(&["/wrong/path", "/some/nested/correct/route/partial"]);
    let found = matches(&router.path("/some").path("/nested"), nested_table());
    assert_eq!(found[0].path, "/correct/route");
    assert_eq!(found[0].value, Some(123));
    assert_eq!(found[0].location.pathname, "/some/nested/correct/route/partial");
}

#[test]
fn define_strips_namespace_segments_by_membership() {
    // `some` also appears after the namespace and is stripped there as well
    let router = router_over(&["/some/more/some/route"]);
    let found = matches(
        &router.path("some"),
        Routes::new().route("/more/route", "stripped"),
    );
    assert_eq!(found[0].path, "/more/route");
    assert_eq!(found[0].value, Some("stripped"));
}

#[test]
fn define_captures_params() {
    let router = router_over(&["/users/42/posts"]);
    let found = matches(
        &router.path("users"),
        Routes::new().nest("/:id", Routes::new().route("/posts", "posts")),
    );
    assert_eq!(found[0].value, Some("posts"));
    assert_eq!(found[0].params.get_str("id"), Some("42"));
}

#[test]
fn path_scopes_segments_with_spaces_and_unicode() {
    let router = router_over(&["/my docs/intro"]);
    assert_eq!(pathnames(&router.path("my docs")), ["/my docs/intro"]);

    let found = matches(
        &router.path("my docs"),
        Routes::new().route("/intro", "intro"),
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value, Some("intro"));
    assert_eq!(found[0].create_href("/intro"), "/my docs/intro");

    let router = router_over(&["/caf%C3%A9/menu"]);
    assert_eq!(pathnames(&router.path("café")), ["/café/menu"]);
}

fn live_router() -> (Subject<LocationChange>, RouterSource) {
    let history = ServerHistory::new("/").unwrap();
    let driver =
        make_router_driver(Some(history), HistoryOptions::default()).unwrap();
    let subject = Subject::new();
    let router = driver.run(subject.stream());
    (subject, router)
}

fn collect(router: &RouterSource) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    router.history().for_each({
        let seen = Arc::clone(&seen);
        move |location: &Location| {
            seen.lock().unwrap().push(location.pathname.clone())
        }
    });
    seen
}
