//! Apply the produto table DDL. Idempotent, safe to run on every startup.

use crate::error::AppError;
use crate::sql::{quoted, PRODUTO_TABLE};
use sqlx::PgPool;

/// Column checks mirror the validation rules, so no row can violate them.
fn produto_table_ddl() -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            nome TEXT NOT NULL CHECK (char_length(nome) >= 2),
            descricao TEXT,
            preco DOUBLE PRECISION NOT NULL CHECK (preco >= 0),
            quantidadeestoque INTEGER NOT NULL CHECK (quantidadeestoque >= 0)
        )
        "#,
        quoted(PRODUTO_TABLE)
    )
}

pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(&produto_table_ddl()).execute(pool).await?;
    let index = format!(
        "CREATE INDEX IF NOT EXISTS produto_quantidadeestoque_idx ON {} (quantidadeestoque)",
        quoted(PRODUTO_TABLE)
    );
    sqlx::query(&index).execute(pool).await?;
    tracing::info!(table = PRODUTO_TABLE, "migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_uses_lowercase_quantity_column() {
        let ddl = produto_table_ddl();
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS \"produto\""));
        assert!(ddl.contains("quantidadeestoque INTEGER NOT NULL"));
        assert!(!ddl.contains("quantidadeEstoque"));
    }
}
