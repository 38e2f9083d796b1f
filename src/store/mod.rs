use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::StoreError;
use crate::types::TrackingEvent;

/// In-memory session store, keyed by the client-supplied session id.
///
/// Sessions live for the lifetime of the process. There is no eviction or
/// capacity bound; callers that need one should wrap `record`.
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    /// Arrival order. Never reordered or edited in place.
    pub events: Vec<TrackingEvent>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Append `event` to its session, creating the session on first sight.
    pub fn record(&mut self, event: TrackingEvent) -> &Session {
        let now = Utc::now();
        let session = self
            .sessions
            .entry(event.session_id.clone())
            .or_insert_with(|| Session {
                session_id: event.session_id.clone(),
                events: Vec::new(),
                created_at: now,
                last_activity: now,
            });
        session.events.push(event);
        session.last_activity = now;
        session
    }

    pub fn get(&self, session_id: &str) -> Result<&Session, StoreError> {
        self.sessions
            .get(session_id)
            .ok_or_else(|| StoreError::NotFound {
                session_id: session_id.to_string(),
            })
    }

    pub fn event_count(&self, session_id: &str) -> usize {
        self.sessions
            .get(session_id)
            .map(|s| s.events.len())
            .unwrap_or(0)
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
