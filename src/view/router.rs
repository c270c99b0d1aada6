use crate::application_port::SessionService;

/// The dashboard's addressable views. Anything unrecognized falls through
/// to the public dashboard (catch-all redirect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Admin,
    Login,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        match path.trim_end_matches('/') {
            "/admin" => Route::Admin,
            "/login" => Route::Login,
            _ => Route::Root,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Admin => "/admin",
            Route::Login => "/login",
        }
    }
}

/// Outcome of a view action that may move the user somewhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Stay,
    Redirect(Route),
}

/// Gate a requested route: the admin view requires a valid session,
/// everything else is public.
pub fn resolve_route(route: Route, session: &dyn SessionService) -> Route {
    match route {
        Route::Admin if !session.is_authenticated() => Route::Login,
        route => route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::FakeSessionService;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse("/admin"), Route::Admin);
        assert_eq!(Route::parse("/admin/"), Route::Admin);
        assert_eq!(Route::parse("/login"), Route::Login);
    }

    #[test]
    fn test_unknown_paths_fall_through_to_root() {
        assert_eq!(Route::parse("/nope"), Route::Root);
        assert_eq!(Route::parse("/admin/extra"), Route::Root);
        assert_eq!(Route::parse(""), Route::Root);
    }

    #[test]
    fn test_admin_requires_session() {
        let logged_out = FakeSessionService::new();
        assert_eq!(resolve_route(Route::Admin, &logged_out), Route::Login);
        assert_eq!(resolve_route(Route::Root, &logged_out), Route::Root);

        let logged_in = FakeSessionService::logged_in();
        assert_eq!(resolve_route(Route::Admin, &logged_in), Route::Admin);
    }
}
