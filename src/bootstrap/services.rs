use std::sync::Arc;

use crate::modules::auth::providers::{IdentityVerifier, google::GoogleVerifier};
use crate::modules::users::password::{Argon2Hasher, PasswordHasher};
use crate::notify::{NoopNotifier, OrderNotifier, telegram::TelegramNotifier};
use crate::shared::config::Config;

pub fn init_password_hasher() -> Arc<dyn PasswordHasher> {
    Arc::new(Argon2Hasher)
}

pub fn init_identity_verifier(config: &Config) -> Arc<dyn IdentityVerifier> {
    Arc::new(GoogleVerifier::new(config.google_client_id.clone()))
}

pub fn init_notifier(config: &Config) -> Arc<dyn OrderNotifier> {
    if config.telegram_bot_token.is_empty() || config.telegram_chat_id.is_empty() {
        tracing::info!("Telegram notifications disabled");
        return Arc::new(NoopNotifier);
    }

    Arc::new(TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_id.clone(),
    ))
}
