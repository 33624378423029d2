use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::model::{
    role::Role,
    user::{RegisterReq, User},
};
use crate::utils::username_index::UsernameIndex;
use sqlx::SqlitePool;
use tracing::{debug, info};
use validator::Validate;

pub async fn register(pool: &SqlitePool, index: &UsernameIndex, input: RegisterReq) -> AppResult<User> {
    input.validate()?;
    let username = input.username.trim();

    if !index.is_available(pool, username).await? {
        return Err(AppError::Conflict("Username already taken".into()));
    }

    let hashed = hash_password(&input.password)?;
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, role)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(&input.email)
    .bind(hashed)
    .bind(input.role.unwrap_or_default())
    .fetch_one(pool)
    .await?;

    index.mark_taken(&user.username).await;
    info!(user_id = user.id, role = %user.role, "User registered");
    Ok(user)
}

/// Checks credentials and stamps `last_login_at`.
///
/// Unknown user, wrong password and inactive account all look the same to the caller.
pub async fn authenticate(pool: &SqlitePool, username: &str, password: &str) -> AppResult<User> {
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let Some(user) = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username.trim())
        .fetch_optional(pool)
        .await?
    else {
        info!("Invalid credentials: user not found");
        return Err(invalid());
    };

    if !verify_password(password, &user.password) {
        info!(user_id = user.id, "Invalid credentials: password mismatch");
        return Err(invalid());
    }

    if !user.is_active {
        info!(user_id = user.id, "Login refused: account inactive");
        return Err(invalid());
    }

    debug!(user_id = user.id, "Updating last_login_at");
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET last_login_at = CURRENT_TIMESTAMP WHERE id = ? RETURNING *",
    )
    .bind(user.id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}

/// Creates the account unless the username is already present. Used by seeding.
pub async fn ensure(
    pool: &SqlitePool,
    index: &UsernameIndex,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> AppResult<Option<User>> {
    let input = RegisterReq {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: Some(role),
    };

    match register(pool, index, input).await {
        Ok(user) => Ok(Some(user)),
        Err(AppError::Conflict(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn jdoe() -> RegisterReq {
        RegisterReq {
            username: "jdoe".into(),
            email: "jdoe@company.com".into(),
            password: "secret".into(),
            role: None,
        }
    }

    #[actix_web::test]
    async fn register_then_authenticate() {
        let pool = test_pool().await;
        let index = UsernameIndex::new();

        let user = register(&pool, &index, jdoe()).await.unwrap();
        assert_eq!(user.role, Role::Employee);
        assert!(user.is_active);
        assert!(user.last_login_at.is_none());
        assert_ne!(user.password, "secret");

        let logged_in = authenticate(&pool, "jdoe", "secret").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(logged_in.last_login_at.is_some());
    }

    #[actix_web::test]
    async fn duplicate_username_conflicts() {
        let pool = test_pool().await;
        let index = UsernameIndex::new();
        register(&pool, &index, jdoe()).await.unwrap();

        let mut again = jdoe();
        again.email = "other@company.com".into();
        assert!(matches!(register(&pool, &index, again).await, Err(AppError::Conflict(_))));

        // a warmed index that never saw the registration falls back to the table
        let fresh = UsernameIndex::new();
        fresh.warmup(&pool, 30, 10).await.unwrap();
        let mut again = jdoe();
        again.username = "JDOE".into();
        again.email = "third@company.com".into();
        assert!(matches!(
            register(&pool, &fresh, again).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[actix_web::test]
    async fn bad_credentials_are_unauthorized() {
        let pool = test_pool().await;
        let index = UsernameIndex::new();
        let user = register(&pool, &index, jdoe()).await.unwrap();

        assert!(matches!(
            authenticate(&pool, "jdoe", "wrong").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            authenticate(&pool, "nobody", "secret").await,
            Err(AppError::Unauthorized(_))
        ));

        sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
            .bind(user.id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(matches!(
            authenticate(&pool, "jdoe", "secret").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn ensure_skips_existing_accounts() {
        let pool = test_pool().await;
        let index = UsernameIndex::new();

        let first = ensure(&pool, &index, "admin", "admin@company.com", "admin123", Role::Admin)
            .await
            .unwrap();
        assert_eq!(first.map(|u| u.role), Some(Role::Admin));

        let second = ensure(&pool, &index, "admin", "admin@company.com", "admin123", Role::Admin)
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(find_by_id(&pool, 1).await.unwrap().username, "admin");
    }
}
