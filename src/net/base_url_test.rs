use super::*;

// =============================================================================
// remap_port
// =============================================================================

#[test]
fn remap_port_dev_servers() {
    assert_eq!(remap_port(3000), 8000);
    assert_eq!(remap_port(3001), 8001);
    assert_eq!(remap_port(5173), 8000);
}

#[test]
fn remap_port_other_ports_unchanged() {
    assert_eq!(remap_port(8080), 8080);
    assert_eq!(remap_port(443), 443);
}

// =============================================================================
// resolve_base_url
// =============================================================================

#[test]
fn resolve_prefers_override() {
    let origin = PageOrigin::new("http", "localhost", Some(5173));
    assert_eq!(resolve_base_url(Some("https://api.orbe.org/api/"), Some(&origin)), "https://api.orbe.org/api");
}

#[test]
fn resolve_empty_override_is_ignored() {
    let origin = PageOrigin::new("http", "localhost", Some(3000));
    assert_eq!(resolve_base_url(Some(""), Some(&origin)), "http://localhost:8000/api");
}

#[test]
fn resolve_infers_from_vite_origin() {
    let origin = PageOrigin::new("https", "orbe.local", Some(5173));
    assert_eq!(resolve_base_url(None, Some(&origin)), "https://orbe.local:8000/api");
}

#[test]
fn resolve_origin_without_port() {
    let origin = PageOrigin::new("https", "orbe.org", None);
    assert_eq!(resolve_base_url(None, Some(&origin)), "https://orbe.org/api");
}

#[test]
fn resolve_defaults_to_same_origin_path() {
    assert_eq!(resolve_base_url(None, None), DEFAULT_API_PATH);
}

// =============================================================================
// PageOrigin::parse
// =============================================================================

#[test]
fn parse_origin_with_port() {
    let origin = PageOrigin::parse("http://192.168.0.10:5173/dashboard").unwrap();
    assert_eq!(origin, PageOrigin::new("http", "192.168.0.10", Some(5173)));
}

#[test]
fn parse_origin_default_port_is_none() {
    let origin = PageOrigin::parse("https://orbe.org:443").unwrap();
    assert_eq!(origin.port, None);
}

#[test]
fn parse_origin_rejects_relative() {
    assert!(PageOrigin::parse("/login").is_err());
}

// =============================================================================
// join
// =============================================================================

#[test]
fn join_absolute_endpoint_unchanged() {
    assert_eq!(join("/api", "https://cdn.orbe.org/file.pdf"), "https://cdn.orbe.org/file.pdf");
    assert_eq!(join("/api", "HTTP://example.org/x"), "HTTP://example.org/x");
}

#[test]
fn join_relative_endpoint() {
    assert_eq!(join("http://localhost:8000/api", "/users/me/"), "http://localhost:8000/api/users/me/");
    assert_eq!(join("http://localhost:8000/api/", "users/me/"), "http://localhost:8000/api/users/me/");
}
