use std::sync::Arc;

use axum::extract::FromRef;
use mailer::Mailer;
use storage::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub mailer: Arc<Mailer>,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<Mailer> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.mailer)
    }
}
