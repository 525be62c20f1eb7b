use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::SqlitePool;
use tracing::info;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A user row without the password hash — safe to hand to response builders.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: i64,
}

/// Minimal data needed to verify a login attempt.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAuth {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Insert a new user and return the store-assigned id.
pub async fn insert_user(pool: &SqlitePool, new_user: NewUser) -> sqlx::Result<i64> {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(created_at)
    .execute(pool)
    .await?;

    info!("New user registered: {}", new_user.email);

    Ok(result.last_insert_rowid())
}

/// Check if an email is already registered. Case-sensitive, as stored.
pub async fn email_exists(pool: &SqlitePool, email: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// Get the auth record for a login attempt (includes the password hash).
pub async fn get_auth_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<UserAuth>> {
    sqlx::query_as::<_, UserAuth>(
        "SELECT id, name, email, password_hash FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Get a user by ID.
pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT id, name, email, created_at FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Total registered users — feeds the dashboard stats card.
pub async fn count_users(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn ann() -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: "ann@x.com".into(),
            password_hash: "$argon2id$fake".into(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let pool = test_pool().await;
        let id1 = insert_user(&pool, ann()).await.unwrap();
        let id2 = insert_user(
            &pool,
            NewUser {
                email: "bob@x.com".into(),
                ..ann()
            },
        )
        .await
        .unwrap();
        assert!(id2 > id1);
    }

    #[tokio::test]
    async fn email_exists_after_insert() {
        let pool = test_pool().await;
        assert!(!email_exists(&pool, "ann@x.com").await.unwrap());
        insert_user(&pool, ann()).await.unwrap();
        assert!(email_exists(&pool, "ann@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn email_check_is_case_sensitive_as_stored() {
        let pool = test_pool().await;
        insert_user(&pool, ann()).await.unwrap();
        assert!(!email_exists(&pool, "ANN@X.COM").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_rejected_by_unique_index() {
        let pool = test_pool().await;
        insert_user(&pool, ann()).await.unwrap();
        let second = insert_user(
            &pool,
            NewUser {
                name: "Other".into(),
                ..ann()
            },
        )
        .await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn get_auth_returns_hash_for_known_email() {
        let pool = test_pool().await;
        let id = insert_user(&pool, ann()).await.unwrap();
        let auth = get_auth_by_email(&pool, "ann@x.com").await.unwrap().unwrap();
        assert_eq!(auth.id, id);
        assert_eq!(auth.password_hash, "$argon2id$fake");
    }

    #[tokio::test]
    async fn get_auth_returns_none_for_unknown_email() {
        let pool = test_pool().await;
        assert!(
            get_auth_by_email(&pool, "ghost@x.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn get_user_by_id_roundtrip() {
        let pool = test_pool().await;
        let id = insert_user(&pool, ann()).await.unwrap();
        let user = get_user_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "ann@x.com");
        assert!(user.created_at > 0);
    }

    #[tokio::test]
    async fn get_user_by_unknown_id_is_none() {
        let pool = test_pool().await;
        assert!(get_user_by_id(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn count_users_tracks_inserts() {
        let pool = test_pool().await;
        assert_eq!(count_users(&pool).await.unwrap(), 0);
        insert_user(&pool, ann()).await.unwrap();
        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }
}
