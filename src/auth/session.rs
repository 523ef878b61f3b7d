//! Session controller: login, logout, validity, and the background sweep.
//!
//! The controller owns the user-facing half of the session lifecycle. The
//! transport guard in [`crate::api::ApiClient`] already enforces validity per
//! request; the sweep here is defense-in-depth that moves an idle, unattended
//! session to the login view before the user's next action would have been
//! rejected anyway.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};
use crate::auth::claims::{decode_token, token_expired};
use crate::auth::TokenStore;
use crate::nav::{redirect_to_login, Navigator, DEFAULT_LANDING, LOGIN_ROUTE};

/// Move the session to absent and send the UI to login.
///
/// Every path out of an authenticated session funnels through here - guard
/// abort, 401 reaction, sweep, stale hydration. Both steps are no-ops when
/// already done, so racing triggers cannot double-fire.
pub(crate) fn expire_session(store: &TokenStore, navigator: &dyn Navigator) {
    store.clear();
    redirect_to_login(navigator);
}

pub struct SessionManager {
    api: ApiClient,
    store: Arc<TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionManager {
    /// Build the controller and hydrate the persisted session.
    ///
    /// A token that expired while the process was down is dropped right
    /// here - the session never starts out present with a stale value.
    pub fn new(api: ApiClient, store: Arc<TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        let manager = Self { api, store, navigator };
        manager.hydrate();
        manager
    }

    fn hydrate(&self) {
        if let Some(token) = self.store.get() {
            if token_expired(&token, Utc::now()) {
                info!("persisted session expired while offline, clearing");
                expire_session(&self.store, self.navigator.as_ref());
            } else {
                debug!("persisted session restored");
            }
        }
    }

    fn validity_at(&self, now: DateTime<Utc>) -> Option<String> {
        let token = self.store.get()?;
        let claims = decode_token(&token).ok()?;
        if claims.is_expired(now) {
            None
        } else {
            Some(claims.sub)
        }
    }

    /// Subject of the current session, with expiry re-checked on every call.
    /// Never reports a session whose token has lapsed since it was stored,
    /// even before anything has cleared the slot.
    pub fn current_subject(&self) -> Option<String> {
        self.validity_at(Utc::now())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_subject().is_some()
    }

    /// Route guard for authenticated views.
    ///
    /// Returns false and redirects to login when no valid session is
    /// present; the caller keeps `attempted` and passes it back to
    /// [`SessionManager::login`] as the pending destination.
    pub fn require_authenticated(&self, attempted: &str) -> bool {
        if self.is_authenticated() {
            return true;
        }
        debug!(route = attempted, "unauthenticated access, redirecting to login");
        self.navigator.navigate(LOGIN_ROUTE, true);
        false
    }

    /// Exchange credentials, commit the token, and navigate onward.
    ///
    /// A pending destination captured from an earlier redirected access
    /// attempt is consumed by this one call; otherwise the default landing
    /// route is used. On any failure the store is left untouched - except
    /// that an issuer handing out an already-expired token (issuer-side
    /// clock skew) surfaces as [`ApiError::SessionExpired`] with the slot
    /// cleared, rather than leaving the UI optimistically logged in.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        pending: Option<&str>,
    ) -> Result<String, ApiError> {
        let token = self.api.exchange_credentials(username, password).await?;
        self.store.set(&token)?;

        let destination = pending.unwrap_or(DEFAULT_LANDING);
        self.navigator.navigate(destination, true);
        info!(username, "login successful");
        Ok(token)
    }

    /// Clear the session and go to the login view. Never fails; storage
    /// trouble is logged inside the store and the navigation still happens.
    pub fn logout(&self) {
        self.store.clear();
        self.navigator.navigate(LOGIN_ROUTE, true);
        info!("logged out");
    }

    /// Start the repeating background validity sweep.
    ///
    /// Each tick re-evaluates the stored token; a session that expired while
    /// idle gets the same clear+redirect as a logout, exactly once. The
    /// returned handle stops the sweep when dropped - the owner of the
    /// authenticated view ties the sweep to its own lifetime.
    pub fn spawn_expiry_sweep(&self, every: Duration) -> SweepHandle {
        let store = Arc::clone(&self.store);
        let navigator = Arc::clone(&self.navigator);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                sweep_tick(&store, navigator.as_ref());
            }
        });

        SweepHandle { handle }
    }
}

/// One sweep evaluation. Absent sessions no-op, so the Present-to-expired
/// transition fires exactly once however many ticks observe it afterwards.
fn sweep_tick(store: &TokenStore, navigator: &dyn Navigator) -> bool {
    match store.get() {
        Some(token) if token_expired(&token, Utc::now()) => {
            info!("idle session expired, redirecting to login");
            expire_session(store, navigator);
            true
        }
        _ => false,
    }
}

/// Owns the background sweep task. Dropping the handle aborts the task so a
/// torn-down view never leaves a timer pointing at a dead navigation target.
pub struct SweepHandle {
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the sweep explicitly (dropping the handle does the same).
    pub fn stop(self) {}
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testutil::one_shot_server;
    use crate::auth::claims::tests::token_expiring_in;
    use crate::nav::MemoryNavigator;

    fn manager_at(
        route: &str,
        base_url: &str,
    ) -> (tempfile::TempDir, Arc<TokenStore>, Arc<MemoryNavigator>, SessionManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(TokenStore::new(dir.path().to_path_buf()));
        let nav = Arc::new(MemoryNavigator::new(route));
        let api = ApiClient::new(
            base_url,
            Arc::clone(&store),
            Arc::clone(&nav) as Arc<dyn Navigator>,
        )
        .unwrap();
        let manager = SessionManager::new(
            api,
            Arc::clone(&store),
            Arc::clone(&nav) as Arc<dyn Navigator>,
        );
        (dir, store, nav, manager)
    }

    fn manager(route: &str) -> (tempfile::TempDir, Arc<TokenStore>, Arc<MemoryNavigator>, SessionManager) {
        manager_at(route, "http://127.0.0.1:9/api")
    }

    #[test]
    fn validity_tracks_simulated_time() {
        let (_dir, store, _nav, manager) = manager("/");
        let now = Utc::now();
        store.set(&token_expiring_in("alice", now, 3600)).unwrap();

        assert_eq!(manager.validity_at(now).as_deref(), Some("alice"));
        assert_eq!(manager.validity_at(now + chrono::Duration::seconds(3601)), None);
    }

    #[test]
    fn logout_clears_and_navigates_once() {
        let (_dir, store, nav, manager) = manager("/calculator");
        store.set(&token_expiring_in("alice", Utc::now(), 3600)).unwrap();

        manager.logout();

        assert_eq!(store.get(), None);
        assert_eq!(nav.visited(), vec![LOGIN_ROUTE.to_string()]);
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn hydration_drops_stale_persisted_token() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("token"),
            token_expiring_in("alice", Utc::now(), -3600),
        )
        .unwrap();

        let store = Arc::new(TokenStore::new(dir.path().to_path_buf()));
        let nav = Arc::new(MemoryNavigator::new("/summary"));
        let api = ApiClient::new(
            "http://127.0.0.1:9/api",
            Arc::clone(&store),
            Arc::clone(&nav) as Arc<dyn Navigator>,
        )
        .unwrap();
        let manager = SessionManager::new(
            api,
            Arc::clone(&store),
            Arc::clone(&nav) as Arc<dyn Navigator>,
        );

        assert_eq!(store.get(), None);
        assert_eq!(nav.visited(), vec![LOGIN_ROUTE.to_string()]);
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn login_stores_token_and_lands_on_default_route() {
        let now = Utc::now();
        let token = token_expiring_in("alice", now, 3600);
        let base = one_shot_server("200 OK", format!(r#"{{"access_token":"{}"}}"#, token)).await;
        let (_dir, store, nav, manager) = manager_at(LOGIN_ROUTE, &base);

        let returned = manager.login("alice", "pw", None).await.unwrap();

        assert_eq!(returned, token);
        assert_eq!(store.get().as_deref(), Some(token.as_str()));
        assert_eq!(nav.visited(), vec![DEFAULT_LANDING.to_string()]);
        assert_eq!(manager.current_subject().as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn login_consumes_pending_destination() {
        let now = Utc::now();
        let token = token_expiring_in("alice", now, 3600);
        let base = one_shot_server("200 OK", format!(r#"{{"access_token":"{}"}}"#, token)).await;
        let (_dir, _store, nav, manager) = manager_at("/reports", &base);

        // Unauthenticated access to /reports bounced the user to login
        assert!(!manager.require_authenticated("/reports"));
        assert_eq!(nav.location(), LOGIN_ROUTE);

        manager.login("alice", "pw", Some("/reports")).await.unwrap();

        assert_eq!(nav.location(), "/reports");
        assert_eq!(
            nav.visited(),
            vec![LOGIN_ROUTE.to_string(), "/reports".to_string()]
        );
    }

    #[tokio::test]
    async fn login_rejects_token_expired_at_issue() {
        // Issuer-side clock skew: the exchange succeeds but the token is
        // already past its deadline
        let token = token_expiring_in("alice", Utc::now(), -60);
        let base = one_shot_server("200 OK", format!(r#"{{"access_token":"{}"}}"#, token)).await;
        let (_dir, store, _nav, manager) = manager_at(LOGIN_ROUTE, &base);

        let result = manager.login("alice", "pw", None).await;

        assert!(matches!(result, Err(ApiError::SessionExpired)));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn sweep_tick_fires_once_per_transition() {
        let (dir, store, nav, _manager) = manager("/calculator");
        std::fs::write(
            dir.path().join("token"),
            token_expiring_in("alice", Utc::now(), -60),
        )
        .unwrap();

        assert!(sweep_tick(&store, nav.as_ref()));
        // Session is now absent: further ticks observe nothing to do
        assert!(!sweep_tick(&store, nav.as_ref()));
        assert!(!sweep_tick(&store, nav.as_ref()));

        assert_eq!(store.get(), None);
        assert_eq!(nav.visited(), vec![LOGIN_ROUTE.to_string()]);
    }

    #[test]
    fn sweep_tick_leaves_valid_session_alone() {
        let (_dir, store, nav, _manager) = manager("/calculator");
        store.set(&token_expiring_in("alice", Utc::now(), 3600)).unwrap();

        assert!(!sweep_tick(&store, nav.as_ref()));
        assert!(store.get().is_some());
        assert!(nav.visited().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn background_sweep_clears_idle_expired_session() {
        let (dir, store, nav, manager) = manager("/calculator");
        std::fs::write(
            dir.path().join("token"),
            token_expiring_in("alice", Utc::now(), -60),
        )
        .unwrap();

        let sweep = manager.spawn_expiry_sweep(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(store.get(), None);
        assert_eq!(nav.visited(), vec![LOGIN_ROUTE.to_string()]);
        sweep.stop();
    }
}
