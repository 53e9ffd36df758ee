use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::user;
use crate::modules::users::password::PasswordHasher;
use crate::shared::error::{AppError, AppResult};

pub struct UserService;

impl UserService {
    pub async fn ensure_exists(db: &DatabaseConnection, user_id: i32) -> AppResult<user::Model> {
        user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn register(
        db: &DatabaseConnection,
        hasher: &dyn PasswordHasher,
        username: String,
        email: String,
        password: String,
        phone: Option<String>,
    ) -> AppResult<user::Model> {
        Self::check_username_free(db, &username).await?;
        Self::check_email_free(db, &email).await?;

        let now = Utc::now().naive_utc();
        let new_user = user::ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(hasher.hash(&password)?),
            phone: Set(phone),
            avatar: Set(None),
            google_id: Set(None),
            is_admin: Set(false),
            login_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
            ..Default::default()
        };

        Ok(new_user.insert(db).await?)
    }

    /// Looks up by username first, then by email, so the login form accepts
    /// either identifier.
    pub async fn login(
        db: &DatabaseConnection,
        hasher: &dyn PasswordHasher,
        identifier: &str,
        password: &str,
    ) -> AppResult<user::Model> {
        let found = match user::Entity::find()
            .filter(user::Column::Username.eq(identifier))
            .one(db)
            .await?
        {
            Some(u) => Some(u),
            None => {
                user::Entity::find()
                    .filter(user::Column::Email.eq(identifier))
                    .one(db)
                    .await?
            }
        };

        let user = found.ok_or_else(|| {
            AppError::Unauthorized("Invalid username or password".to_string())
        })?;

        if !hasher.verify(&user.password_hash, password)? {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        Self::record_login(db, user).await
    }

    pub async fn record_login(
        db: &DatabaseConnection,
        user: user::Model,
    ) -> AppResult<user::Model> {
        let now = Utc::now().naive_utc();
        let login_count = user.login_count + 1;

        let mut active: user::ActiveModel = user.into();
        active.login_count = Set(login_count);
        active.last_login_at = Set(Some(now));
        active.updated_at = Set(now);

        Ok(active.update(db).await?)
    }

    pub async fn check_username_free(db: &DatabaseConnection, username: &str) -> AppResult<()> {
        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?
            .is_some();
        if taken {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        Ok(())
    }

    pub async fn check_email_free(db: &DatabaseConnection, email: &str) -> AppResult<()> {
        let taken = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await?
            .is_some();
        if taken {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::password::Argon2Hasher;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn sample_user(password_hash: &str) -> user::Model {
        user::Model {
            id: 1,
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            password_hash: password_hash.to_owned(),
            phone: None,
            avatar: None,
            google_id: None,
            is_admin: false,
            login_count: 0,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user("x")]])
            .into_connection();

        let result = UserService::register(
            &db,
            &Argon2Hasher,
            "alice".to_string(),
            "other@example.com".to_string(),
            "pw123456".to_string(),
            None,
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_inserts_when_identifiers_are_free() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                Vec::<user::Model>::new(), // username lookup
                Vec::<user::Model>::new(), // email lookup
            ])
            .append_query_results([vec![sample_user("$argon2id$stored")]])
            .into_connection();

        let user = UserService::register(
            &db,
            &Argon2Hasher,
            "alice".to_string(),
            "alice@example.com".to_string(),
            "pw123456".to_string(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn login_succeeds_and_bumps_login_count() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("secret").unwrap();

        let mut updated = sample_user(&hash);
        updated.login_count = 1;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user(&hash)]])
            .append_query_results([vec![updated]])
            .into_connection();

        let user = UserService::login(&db, &hasher, "alice", "secret")
            .await
            .unwrap();
        assert_eq!(user.login_count, 1);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("secret").unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user(&hash)]])
            .into_connection();

        let result = UserService::login(&db, &hasher, "alice", "not-secret").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn serialized_user_has_no_password_material() {
        let value = serde_json::to_value(sample_user("$argon2id$stored")).unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "alice");
    }
}
