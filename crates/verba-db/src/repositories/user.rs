use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::User;

pub async fn create_user<'e, E>(
    executor: E,
    login: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users (login, password_hash)
            VALUES ($1, $2)
            RETURNING id, login, password_hash, created_at
        "#,
    )
    .bind(login)
    .bind(password_hash)
    .fetch_one(executor)
    .await
}

pub async fn find_user_by_id<'e, E>(executor: E, user_id: Uuid) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_user_by_login<'e, E>(
    executor: E,
    login: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE login = $1
        "#,
    )
    .bind(login)
    .fetch_optional(executor)
    .await
}

pub async fn login_exists<'e, E>(executor: E, login: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE login = $1)
        "#,
    )
    .bind(login)
    .fetch_one(executor)
    .await
}

pub async fn update_user_login<'e, E>(
    executor: E,
    user_id: Uuid,
    login: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE users
            SET login = $2
            WHERE id = $1
            RETURNING id, login, password_hash, created_at
        "#,
    )
    .bind(user_id)
    .bind(login)
    .fetch_optional(executor)
    .await
}

pub async fn update_user_password<'e, E>(
    executor: E,
    user_id: Uuid,
    password_hash: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE users
            SET password_hash = $2
            WHERE id = $1
            RETURNING id, login, password_hash, created_at
        "#,
    )
    .bind(user_id)
    .bind(password_hash)
    .fetch_optional(executor)
    .await
}

pub async fn delete_user<'e, E>(executor: E, user_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
