pub mod database;
pub mod services;

use crate::shared::{config::Config, state::AppState};
use std::sync::Arc;

pub async fn create_app_state(config: &Config) -> AppState {
    let db = database::connect_postgres(config).await;

    AppState {
        config: Arc::new(config.clone()),
        db,
        hasher: services::init_password_hasher(),
        google: services::init_identity_verifier(config),
        notifier: services::init_notifier(config),
    }
}
