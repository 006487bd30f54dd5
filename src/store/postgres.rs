//! PostgreSQL store over a sqlx pool.

use super::{Apply, ProdutoFilter, ProdutoStore};
use crate::error::{AppError, ConfigError};
use crate::model::{Produto, ProdutoFields};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

#[derive(Clone)]
pub struct PgProdutoStore {
    pool: PgPool,
}

impl PgProdutoStore {
    pub fn new(pool: PgPool) -> Self {
        PgProdutoStore { pool }
    }
}

fn produto_query(q: &QueryBuf) -> QueryAs<'_, Postgres, Produto, PgArguments> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, Produto>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

#[async_trait]
impl ProdutoStore for PgProdutoStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Produto>, AppError> {
        let q = sql::select_all();
        Ok(produto_query(&q).fetch_all(&self.pool).await?)
    }

    async fn insert(&self, fields: ProdutoFields) -> Result<Produto, AppError> {
        let q = sql::insert(&fields);
        Ok(produto_query(&q).fetch_one(&self.pool).await?)
    }

    async fn update_with(&self, id: i64, apply: &Apply<'_>) -> Result<Option<Produto>, AppError> {
        // Dropping `tx` without commit rolls back.
        let mut tx = self.pool.begin().await?;
        let lookup = sql::select_by_id_for_update(id);
        let Some(existing) = produto_query(&lookup).fetch_optional(&mut *tx).await? else {
            return Ok(None);
        };
        let next = apply(existing)?;
        let write = sql::update(&next);
        let row = produto_query(&write).fetch_one(&mut *tx).await?;
        tx.commit().await?;
        Ok(Some(row))
    }

    async fn delete(&self, id: i64) -> Result<Option<Produto>, AppError> {
        let q = sql::delete_by_id(id);
        Ok(produto_query(&q).fetch_optional(&self.pool).await?)
    }

    async fn search(&self, filter: &ProdutoFilter) -> Result<Vec<Produto>, AppError> {
        let q = sql::select_filtered(filter);
        Ok(produto_query(&q).fetch_all(&self.pool).await?)
    }

    async fn delete_by_max_quantity(&self, quant: i32) -> Result<u64, AppError> {
        let q = sql::delete_by_max_quantity(quant);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|e| {
        ConfigError::Invalid {
            key: "DATABASE_URL",
            value: database_url.to_string(),
            reason: e.to_string(),
        }
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key: "DATABASE_URL",
        value: url.to_string(),
        reason: reason.to_string(),
    };
    let scheme_end = url.find("://").ok_or_else(|| invalid("missing scheme"))? + 3;
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| invalid("no database path"))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres{}", base, query);
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_points_at_postgres_database() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/produtos").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(db, "produtos");
    }

    #[test]
    fn query_string_is_kept_on_admin_url() {
        let (admin, db) =
            parse_db_name_from_url("postgres://localhost/produtos?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(db, "produtos");
    }

    #[test]
    fn url_without_path_is_rejected() {
        assert!(parse_db_name_from_url("postgres://localhost").is_err());
        assert!(parse_db_name_from_url("localhost/produtos").is_err());
    }
}
