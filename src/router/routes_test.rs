use super::*;

// =============================================================================
// resolve
// =============================================================================

#[test]
fn static_routes_match_by_path() {
    assert_eq!(resolve("/dashboard").name(), DASHBOARD);
    assert_eq!(resolve("/login").name(), LOGIN);
    assert_eq!(resolve("/").name(), HOME);
}

#[test]
fn trailing_slash_is_ignored() {
    let m = resolve("/fees/");
    assert_eq!(m.name(), "fees");
    assert_eq!(m.path, "/fees");
}

#[test]
fn create_wins_over_detail_param() {
    assert_eq!(resolve("/cases/create").name(), "case-create");

    let detail = resolve("/cases/42");
    assert_eq!(detail.name(), "case-detail");
    assert_eq!(detail.param("id"), Some("42"));
}

#[test]
fn unknown_path_hits_catch_all() {
    let m = resolve("/nope/deeper");
    assert_eq!(m.name(), NOT_FOUND);
    assert_eq!(m.param("path"), Some("nope/deeper"));
    assert!(!m.route.meta.requires_auth);
}

#[test]
fn query_is_parsed_and_kept_in_full_path() {
    let m = resolve("/login?redirect=%2Fcases%2F7&expired=true#top");
    assert_eq!(m.path, "/login");
    assert_eq!(m.full_path, "/login?redirect=%2Fcases%2F7&expired=true");
    assert_eq!(m.query_value("redirect"), Some("/cases/7"));
    assert_eq!(m.query_value("expired"), Some("true"));
}

#[test]
fn relative_path_gets_leading_slash() {
    assert_eq!(resolve("donations").path, "/donations");
}

// =============================================================================
// table
// =============================================================================

#[test]
fn only_case_create_requires_board() {
    let board: Vec<_> = ROUTES
        .iter()
        .filter(|r| r.meta.requires_board)
        .map(|r| r.name)
        .collect();
    assert_eq!(board, vec!["case-create"]);
}

#[test]
fn home_redirects_to_login() {
    assert_eq!(find(HOME).and_then(|r| r.redirect), Some("/login"));
}

#[test]
fn every_redirect_lands_on_a_route_without_redirect() {
    for route in ROUTES.iter().filter_map(|r| r.redirect) {
        assert!(resolve(route).route.redirect.is_none(), "{route}");
    }
}
