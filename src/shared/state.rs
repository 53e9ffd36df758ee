use crate::modules::auth::providers::IdentityVerifier;
use crate::modules::users::password::PasswordHasher;
use crate::notify::OrderNotifier;
use crate::shared::config::Config;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
    pub hasher: Arc<dyn PasswordHasher>,
    pub google: Arc<dyn IdentityVerifier>,
    pub notifier: Arc<dyn OrderNotifier>,
}
