//! Static route table and path matching.

use std::collections::BTreeMap;

/// Per-route flags read by the navigation guard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_board: bool,
    pub title: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub name: &'static str,
    /// Pattern: static segments, `:param` segments, or a trailing `:rest*`
    /// that swallows the remainder of the path.
    pub path: &'static str,
    pub meta: RouteMeta,
    /// Routes with a redirect are resolved before any guard runs.
    pub redirect: Option<&'static str>,
}

pub const HOME: &str = "home";
pub const LOGIN: &str = "login";
pub const DASHBOARD: &str = "dashboard";
pub const NOT_FOUND: &str = "not-found";

const fn public(title: &'static str) -> RouteMeta {
    RouteMeta { requires_auth: false, requires_board: false, title: Some(title) }
}

const fn member(title: &'static str) -> RouteMeta {
    RouteMeta { requires_auth: true, requires_board: false, title: Some(title) }
}

const fn board(title: &'static str) -> RouteMeta {
    RouteMeta { requires_auth: true, requires_board: true, title: Some(title) }
}

const fn page(name: &'static str, path: &'static str, meta: RouteMeta) -> RouteDef {
    RouteDef { name, path, meta, redirect: None }
}

/// Matched in order; the first hit wins, and the catch-all is last.
pub static ROUTES: &[RouteDef] = &[
    RouteDef { name: HOME, path: "/", meta: RouteMeta { requires_auth: false, requires_board: false, title: None }, redirect: Some("/login") },
    page("onboarding", "/onboarding", public("Bem-vindo à ORBE")),
    page(LOGIN, "/login", public("Login")),
    page("set-password", "/set-password", public("Configurar Senha")),
    page(DASHBOARD, "/dashboard", member("Dashboard")),
    page("fees", "/fees", member("Mensalidades")),
    page("donations", "/donations", member("Doações")),
    page("donation-requests", "/donation-requests", member("Solicitações de Doação")),
    page("cases", "/cases", member("Casos de Assistência")),
    page("case-create", "/cases/create", board("Novo Caso")),
    page("case-detail", "/cases/:id", member("Detalhes do Caso")),
    page(NOT_FOUND, "/:path*", RouteMeta { requires_auth: false, requires_board: false, title: Some("Página não encontrada") }),
];

/// A location resolved against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static RouteDef,
    /// Normalized path without query or fragment.
    pub path: String,
    /// Path plus query, as it would appear in the address bar.
    pub full_path: String,
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
}

impl RouteMatch {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.route.name
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[must_use]
pub fn find(name: &str) -> Option<&'static RouteDef> {
    ROUTES.iter().find(|route| route.name == name)
}

/// Resolve `location` (path, optional query and fragment) to a route.
/// Unknown paths land on the catch-all.
#[must_use]
pub fn resolve(location: &str) -> RouteMatch {
    let without_fragment = location.split('#').next().unwrap_or_default();
    let (raw_path, raw_query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_fragment, None),
    };
    let path = normalize(raw_path);
    let query: Vec<(String, String)> = raw_query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let full_path = match raw_query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{path}?{q}"),
        None => path.clone(),
    };

    let (route, params) = ROUTES
        .iter()
        .find_map(|route| match_pattern(route.path, &path).map(|params| (route, params)))
        .unwrap_or_else(|| (&ROUTES[ROUTES.len() - 1], BTreeMap::new()));

    RouteMatch { route, path, full_path, params, query }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Captured params when `path` fits `pattern`.
fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern = segments(pattern);
    let path = segments(path);
    let mut params = BTreeMap::new();

    for (i, part) in pattern.iter().enumerate() {
        if let Some(rest) = part.strip_prefix(':').and_then(|p| p.strip_suffix('*')) {
            params.insert(rest.to_owned(), path.get(i..).unwrap_or_default().join("/"));
            return Some(params);
        }
        let segment = path.get(i)?;
        match part.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_owned(), (*segment).to_owned());
            }
            None if part == segment => {}
            None => return None,
        }
    }

    (pattern.len() == path.len()).then_some(params)
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
