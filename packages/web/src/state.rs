use std::sync::Arc;

use api::auth::Authenticator;
use api::clock::Clock;
use api::db::{Database, SqlStore};
use api::notes::Notes;
use api::settings;
use chrono::{DateTime, TimeDelta, Utc};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Authenticator<SqlStore>,
    pub notes: Notes<SqlStore>,
    /// Send the token cookie with the `Secure` attribute.
    pub secure_cookie: bool,
}

impl AppState {
    pub fn new(db: &Database, auth: &settings::Auth) -> Self {
        Self {
            auth: Authenticator::new(db.store())
                .with_token_ttl(TimeDelta::hours(auth.token_ttl_hours)),
            notes: Notes::new(db.store()),
            secure_cookie: auth.secure_cookie,
        }
    }

    /// Builder method to drive both services from one time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.auth = self.auth.with_clock(clock.clone());
        self.notes = self.notes.with_clock(clock);
        self
    }

    /// Current time according to the services' clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.auth.clock().now()
    }
}
