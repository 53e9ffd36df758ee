use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::providers::VerifiedIdentity;
use crate::modules::users::entities::user;
use crate::modules::users::password::{PasswordHasher, generate_placeholder_password};
use crate::modules::users::service::UserService;
use crate::shared::error::AppResult;

pub struct AuthService;

impl AuthService {
    /// Exchanges a verified external identity for a local user row:
    /// match on google_id, else adopt the account with the same email,
    /// else create a fresh user.
    pub async fn google_login(
        db: &DatabaseConnection,
        hasher: &dyn PasswordHasher,
        identity: VerifiedIdentity,
    ) -> AppResult<user::Model> {
        let by_google_id = user::Entity::find()
            .filter(user::Column::GoogleId.eq(identity.provider_id.clone()))
            .one(db)
            .await?;

        if let Some(existing) = by_google_id {
            return UserService::record_login(db, existing).await;
        }

        if let Some(email) = &identity.email {
            let by_email = user::Entity::find()
                .filter(user::Column::Email.eq(email.clone()))
                .one(db)
                .await?;

            if let Some(existing) = by_email {
                let mut active: user::ActiveModel = existing.into();
                active.google_id = Set(Some(identity.provider_id.clone()));
                active.updated_at = Set(Utc::now().naive_utc());
                let linked = active.update(db).await?;
                return UserService::record_login(db, linked).await;
            }
        }

        let created = Self::register_google_user(db, hasher, identity).await?;
        UserService::record_login(db, created).await
    }

    async fn register_google_user(
        db: &DatabaseConnection,
        hasher: &dyn PasswordHasher,
        identity: VerifiedIdentity,
    ) -> AppResult<user::Model> {
        let now = Utc::now().naive_utc();

        let base = identity
            .name
            .clone()
            .or_else(|| {
                identity
                    .email
                    .as_ref()
                    .and_then(|e| e.split('@').next().map(str::to_string))
            })
            .unwrap_or_else(|| "user".to_string());
        let username = Self::unique_username(db, &base, &identity.provider_id).await?;

        let new_user = user::ActiveModel {
            username: Set(username),
            email: Set(identity.email.unwrap_or_default()),
            password_hash: Set(hasher.hash(&generate_placeholder_password())?),
            phone: Set(None),
            avatar: Set(identity.avatar),
            google_id: Set(Some(identity.provider_id)),
            is_admin: Set(false),
            login_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
            ..Default::default()
        };

        Ok(new_user.insert(db).await?)
    }

    async fn unique_username(
        db: &DatabaseConnection,
        base: &str,
        provider_id: &str,
    ) -> AppResult<String> {
        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(base))
            .one(db)
            .await?
            .is_some();
        if !taken {
            return Ok(base.to_string());
        }

        // Disambiguate with the tail of the provider id.
        let suffix: String = provider_id
            .chars()
            .rev()
            .take(6)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        Ok(format!("{}_{}", base, suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::password::Argon2Hasher;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn google_user(login_count: i32) -> user::Model {
        user::Model {
            id: 7,
            username: "bob".to_owned(),
            email: "bob@example.com".to_owned(),
            password_hash: "$argon2id$stored".to_owned(),
            phone: None,
            avatar: None,
            google_id: Some("108234".to_owned()),
            is_admin: false,
            login_count,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            last_login_at: None,
        }
    }

    fn identity() -> VerifiedIdentity {
        VerifiedIdentity {
            provider_id: "108234".to_string(),
            email: Some("bob@example.com".to_string()),
            name: Some("bob".to_string()),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn known_google_id_logs_straight_in() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![google_user(3)]]) // google_id lookup
            .append_query_results([vec![google_user(4)]]) // login bookkeeping update
            .into_connection();

        let user = AuthService::google_login(&db, &Argon2Hasher, identity())
            .await
            .unwrap();
        assert_eq!(user.login_count, 4);
    }

    #[tokio::test]
    async fn matching_email_gets_google_id_attached() {
        let mut unlinked = google_user(0);
        unlinked.google_id = None;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()]) // google_id lookup misses
            .append_query_results([vec![unlinked]]) // email lookup hits
            .append_query_results([vec![google_user(0)]]) // link update
            .append_query_results([vec![google_user(1)]]) // login bookkeeping update
            .into_connection();

        let user = AuthService::google_login(&db, &Argon2Hasher, identity())
            .await
            .unwrap();
        assert_eq!(user.google_id.as_deref(), Some("108234"));
        assert_eq!(user.login_count, 1);
    }
}
