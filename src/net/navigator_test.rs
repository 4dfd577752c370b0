use super::*;

#[test]
fn terminal_navigator_tracks_settled_path() {
    let nav = TerminalNavigator::default();
    assert_eq!(nav.current_path(), "/");

    nav.set_current_path("/cases/3");
    assert_eq!(nav.current_path(), "/cases/3");

    nav.hard_redirect(EXPIRED_LOGIN_URL);
    assert_eq!(nav.current_path(), LOGIN_PATH);
}

#[test]
fn memory_navigator_redirect_strips_query() {
    let nav = MemoryNavigator::at("/fees");

    nav.hard_redirect(EXPIRED_LOGIN_URL);

    assert_eq!(nav.current_path(), "/login");
    assert_eq!(nav.redirects(), vec!["/login?expired=true".to_owned()]);
}
