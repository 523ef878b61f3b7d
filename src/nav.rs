//! Navigation commands issued by the auth core.
//!
//! The core never touches a rendering layer; it asks a [`Navigator`] to move
//! the UI. Shells plug in whatever routing they have (webview location,
//! screen stack); [`MemoryNavigator`] serves headless shells and tests.

use std::sync::Mutex;

use tracing::debug;

/// Route of the login view
pub const LOGIN_ROUTE: &str = "/login";

/// Route of the registration view (also public, never redirected away from)
pub const REGISTER_ROUTE: &str = "/register";

/// Default landing route after a login with no pending destination
pub const DEFAULT_LANDING: &str = "/";

pub trait Navigator: Send + Sync {
    /// Route the UI is currently showing.
    fn location(&self) -> String;

    /// Go to `to`, replacing the current history entry when `replace` is set.
    fn navigate(&self, to: &str, replace: bool);
}

/// Send the UI to the login view unless it is already on a public auth view.
/// Skipping the call on `/login` and `/register` avoids redirect loops while
/// the user is typing credentials.
pub fn redirect_to_login(navigator: &dyn Navigator) {
    let here = navigator.location();
    if here.starts_with(LOGIN_ROUTE) || here.starts_with(REGISTER_ROUTE) {
        return;
    }
    debug!(from = %here, "redirecting to login");
    navigator.navigate(LOGIN_ROUTE, true);
}

/// In-process navigator tracking the current route and every command issued.
#[derive(Default)]
pub struct MemoryNavigator {
    state: Mutex<NavState>,
}

#[derive(Default)]
struct NavState {
    current: String,
    visited: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(initial: &str) -> Self {
        Self {
            state: Mutex::new(NavState {
                current: initial.to_string(),
                visited: Vec::new(),
            }),
        }
    }

    /// Every route navigated to, in order.
    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).visited.clone()
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> String {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).current.clone()
    }

    fn navigate(&self, to: &str, _replace: bool) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.current = to.to_string();
        state.visited.push(to.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_skips_public_auth_views() {
        let nav = MemoryNavigator::new(LOGIN_ROUTE);
        redirect_to_login(&nav);
        assert!(nav.visited().is_empty());

        let nav = MemoryNavigator::new(REGISTER_ROUTE);
        redirect_to_login(&nav);
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn redirect_fires_once_from_protected_view() {
        let nav = MemoryNavigator::new("/calculator");
        redirect_to_login(&nav);
        // Second trigger sees the login view as current and no-ops
        redirect_to_login(&nav);
        assert_eq!(nav.visited(), vec![LOGIN_ROUTE.to_string()]);
    }
}
