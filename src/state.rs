use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{clock::Clock, mailer::Mailer, session::SessionKeys};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub sessions: Arc<SessionKeys>,
    pub mailer: Arc<dyn Mailer>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        orm: DatabaseConnection,
        sessions: SessionKeys,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orm,
            sessions: Arc::new(sessions),
            mailer,
            clock,
        }
    }

    /// Same state, different clock.
    pub fn with_clock(&self, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ..self.clone()
        }
    }
}
