//! Throttled session revalidation.
//!
//! The host calls [`RevalidationScheduler::handle_visibility_change`] each
//! time the page becomes visible or regains focus, and
//! [`RevalidationScheduler::start`] once at startup. Each call asks the
//! server for the current identity unless one of these guards applies:
//!
//! 1. the browser is offline
//! 2. the page is hidden
//! 3. a revalidation is already in flight
//! 4. the last attempt was less than one window ago
//!
//! The last-attempt time is seeded at construction, so the startup call is
//! normally throttled. There is no retry; the next attempt waits for the
//! next signal.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::api::AuthApi;
use crate::models::User;
use crate::traits::SessionObserver;

#[derive(Debug)]
struct ThrottleState {
    last_attempt: DateTime<Utc>,
    in_flight: bool,
}

/// What a revalidation signal did.
#[derive(Debug)]
pub enum Revalidation {
    Offline,
    Hidden,
    InFlight,
    Throttled { remaining: Duration },
    /// A request was issued; the handle resolves to the identity, if any.
    Started(JoinHandle<Option<User>>),
}

impl Revalidation {
    pub fn is_started(&self) -> bool {
        matches!(self, Revalidation::Started(_))
    }
}

#[derive(Clone)]
pub struct RevalidationScheduler {
    auth: AuthApi,
    observer: Option<Arc<dyn SessionObserver>>,
    window: Duration,
    state: Arc<Mutex<ThrottleState>>,
}

impl RevalidationScheduler {
    pub fn new(auth: AuthApi) -> Self {
        let window = auth.fetcher().config().revalidation_window;
        let now = auth.fetcher().clock().now();
        Self {
            auth,
            observer: None,
            window,
            state: Arc::new(Mutex::new(ThrottleState {
                last_attempt: now,
                in_flight: false,
            })),
        }
    }

    /// Report each revalidation outcome to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Eager check for when the widget starts. The client never calls this
    /// itself; hosts call it once after building. Since the throttle is
    /// seeded at construction, it is normally [`Revalidation::Throttled`].
    pub fn start(&self) -> Revalidation {
        self.handle_visibility_change()
    }

    /// React to a visibility or focus signal.
    pub fn handle_visibility_change(&self) -> Revalidation {
        let browser = self.auth.fetcher().browser();
        if !browser.is_online() {
            debug!("Revalidation skipped: offline");
            return Revalidation::Offline;
        }
        if !browser.is_visible() {
            debug!("Revalidation skipped: hidden");
            return Revalidation::Hidden;
        }

        let now = self.auth.fetcher().clock().now();
        {
            let mut state = self.lock();
            if state.in_flight {
                debug!("Revalidation skipped: request in progress");
                return Revalidation::InFlight;
            }

            let elapsed = (now - state.last_attempt)
                .to_std()
                .unwrap_or(Duration::ZERO);
            if elapsed < self.window {
                let remaining = self.window - elapsed;
                debug!("Revalidation throttled for another {:?}", remaining);
                return Revalidation::Throttled { remaining };
            }

            state.last_attempt = now;
            state.in_flight = true;
        }

        info!("Revalidating session");
        let auth = self.auth.clone();
        let observer = self.observer.clone();
        let state = Arc::clone(&self.state);

        Revalidation::Started(tokio::spawn(async move {
            let user = auth.current_user().await;
            state
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .in_flight = false;

            if let Some(observer) = observer {
                match &user {
                    Some(user) => observer.session_established(user),
                    None => observer.session_cleared(),
                }
            }
            user
        }))
    }

    /// Make the next signal eligible immediately, by moving the last attempt
    /// one full window into the past. Used after opening an OAuth window so
    /// the returning visitor is picked up on the next focus.
    pub fn rewind(&self) {
        let now = self.auth.fetcher().clock().now();
        let window = chrono::Duration::milliseconds(self.window.as_millis() as i64);
        self.lock().last_attempt = now - window;
        debug!("Revalidation throttle rewound");
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    pub fn last_attempt(&self) -> DateTime<Utc> {
        self.lock().last_attempt
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ThrottleState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}
