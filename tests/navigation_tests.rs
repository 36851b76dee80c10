use worldwise::{
    config::Credentials,
    navigation::{
        Access, Admission, LOGIN_PATH, Outlet, PathPattern, Resolution, RouteEntry, RouteMatch,
        RouteTable, admit,
    },
    session::{Session, SessionAction},
    views::ViewId,
};

fn matched(path: &str) -> RouteMatch {
    match RouteTable::default().resolve(path) {
        Resolution::Matched(found) => found,
        Resolution::NotFound(_) => panic!("{path} should resolve"),
    }
}

// --- Patterns ---

#[test]
fn test_pattern_captures_params() {
    let pattern = PathPattern::parse("cities/:id");

    assert_eq!(pattern.len(), 2);
    let params = pattern.match_exact(&["cities", "73930385"]).unwrap();
    assert_eq!(params.get("id").map(String::as_str), Some("73930385"));

    assert!(pattern.match_exact(&["cities"]).is_none());
    assert!(pattern.match_exact(&["countries", "1"]).is_none());
    assert!(pattern.match_exact(&["cities", "1", "edit"]).is_none());
}

#[test]
fn test_root_pattern_is_empty() {
    let pattern = PathPattern::parse("/");
    assert!(pattern.is_empty());
    assert!(pattern.match_exact(&[]).is_some());
    assert!(pattern.match_exact(&["pricing"]).is_none());
}

// --- Top-level Routes ---

#[test]
fn test_public_pages_resolve() {
    let cases = [
        ("/", ViewId::Homepage),
        ("/pricing", ViewId::Pricing),
        ("/product", ViewId::Product),
        ("/login", ViewId::Login),
    ];

    for (path, view) in cases {
        let found = matched(path);
        assert_eq!(found.view, view, "{path}");
        assert_eq!(found.access, Access::Public);
        assert_eq!(found.outlet, None);
    }
}

#[test]
fn test_trailing_and_repeated_slashes_are_ignored() {
    assert_eq!(matched("/pricing/").view, ViewId::Pricing);
    assert_eq!(matched("//app//countries/").outlet.map(|o| o.view), Some(ViewId::CountryList));
}

// --- Nested Routes ---

#[test]
fn test_app_children_fill_the_outlet() {
    let cases = [
        ("/app/cities", ViewId::CityList),
        ("/app/cities/73930385", ViewId::City),
        ("/app/countries", ViewId::CountryList),
        ("/app/form", ViewId::Form),
    ];

    for (path, child) in cases {
        let found = matched(path);
        assert_eq!(found.view, ViewId::AppLayout, "{path}");
        assert_eq!(found.access, Access::Protected);
        assert_eq!(
            found.outlet,
            Some(Outlet {
                view: child,
                index: false
            })
        );
    }

    assert_eq!(
        matched("/app/cities/73930385").params.get("id").map(String::as_str),
        Some("73930385")
    );
}

#[test]
fn test_app_without_segment_uses_default_child() {
    let bare = matched("/app");
    let explicit = matched("/app/cities");

    assert_eq!(bare.view, explicit.view);
    assert_eq!(bare.outlet.map(|o| o.view), explicit.outlet.map(|o| o.view));
    assert_eq!(bare.outlet.map(|o| o.index), Some(true));
}

// --- Fallback ---

#[test]
fn test_undefined_paths_resolve_to_not_found() {
    let table = RouteTable::default();
    let paths = [
        "/nope",
        "/pricing/extra",
        "/login/again",
        "/app/unknown",
        "/app/cities/1/edit",
        "/application",
        "/APP",
    ];

    for path in paths {
        assert_eq!(
            table.resolve(path),
            Resolution::NotFound(ViewId::PageNotFound),
            "{path}"
        );
    }
}

#[test]
fn test_first_matching_entry_wins() {
    let table = RouteTable::new(
        vec![
            RouteEntry::page("/about", ViewId::Product),
            RouteEntry::page("/about", ViewId::Pricing),
        ],
        ViewId::PageNotFound,
    );
    assert_eq!(table.resolve("/about").view(), ViewId::Product);
}

#[test]
fn test_layout_without_index_leaves_outlet_empty() {
    let table = RouteTable::new(
        vec![RouteEntry::layout("/app", ViewId::AppLayout).child("form", ViewId::Form)],
        ViewId::PageNotFound,
    );

    match table.resolve("/app") {
        Resolution::Matched(found) => assert_eq!(found.outlet, None),
        Resolution::NotFound(_) => panic!("/app should resolve"),
    }
}

// --- Guard ---

#[test]
fn test_guard_redirects_anonymous_sessions_only() {
    let anonymous = Session::anonymous();
    let authenticated =
        Session::anonymous().reduce(SessionAction::Login(Credentials::default().identity()));

    assert_eq!(admit(Access::Public, &anonymous), Admission::Render);
    assert_eq!(admit(Access::Public, &authenticated), Admission::Render);
    assert_eq!(
        admit(Access::Protected, &anonymous),
        Admission::Redirect(LOGIN_PATH)
    );
    assert_eq!(admit(Access::Protected, &authenticated), Admission::Render);
}
