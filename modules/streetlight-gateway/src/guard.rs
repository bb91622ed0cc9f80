/// Navigable surfaces of the app. Detail is reachable only from the queue
/// but participates in the guard like any other protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Triage,
    ClientDetail,
    Hotspots,
}

impl Route {
    pub fn is_public(self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// Entry-point guard: given the auth state and where the user is, return
/// where they must go instead, or `None` to stay. Kept as a pure function
/// so the decision is testable without any navigation framework.
pub fn required_route(is_authenticated: bool, current: Route) -> Option<Route> {
    match (is_authenticated, current.is_public()) {
        // Signed in but sitting on an auth screen: go to work.
        (true, true) => Some(Route::Triage),
        // Signed out on a protected screen: back to login.
        (false, false) => Some(Route::Login),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_users_are_sent_to_login() {
        assert_eq!(required_route(false, Route::Triage), Some(Route::Login));
        assert_eq!(required_route(false, Route::ClientDetail), Some(Route::Login));
        assert_eq!(required_route(false, Route::Hotspots), Some(Route::Login));
    }

    #[test]
    fn unauthenticated_users_may_stay_on_auth_screens() {
        assert_eq!(required_route(false, Route::Login), None);
        assert_eq!(required_route(false, Route::Register), None);
    }

    #[test]
    fn authenticated_users_leave_auth_screens() {
        assert_eq!(required_route(true, Route::Login), Some(Route::Triage));
        assert_eq!(required_route(true, Route::Register), Some(Route::Triage));
    }

    #[test]
    fn authenticated_users_stay_put_elsewhere() {
        assert_eq!(required_route(true, Route::Triage), None);
        assert_eq!(required_route(true, Route::Hotspots), None);
    }
}
