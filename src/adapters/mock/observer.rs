//! Session observer that records notifications.

use std::sync::{Arc, Mutex};

use crate::models::User;
use crate::traits::SessionObserver;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Established(User),
    Cleared,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn push(&self, event: SessionEvent) {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }
}

impl SessionObserver for RecordingObserver {
    fn session_established(&self, user: &User) {
        self.push(SessionEvent::Established(user.clone()));
    }

    fn session_cleared(&self) {
        self.push(SessionEvent::Cleared);
    }
}
