//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the produto table.

use crate::model::{Produto, ProdutoFields};
use crate::sql::PgBindValue;

pub const PRODUTO_TABLE: &str = "produto";

/// Column order matches `Produto`'s `FromRow` names.
const COLUMNS: &str = "id, nome, descricao, preco, quantidadeestoque";

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Row filter for searches. The name pattern is always applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ProdutoFilter {
    /// SQL `LIKE` pattern, matched case-insensitively.
    pub name_pattern: String,
    pub max_quantity: Option<i32>,
    pub min_price: Option<f64>,
}

pub fn select_all() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {} ORDER BY id", COLUMNS, quoted(PRODUTO_TABLE));
    q
}

/// Locks the row until the surrounding transaction ends.
pub fn select_by_id_for_update(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE id = ${} FOR UPDATE",
        COLUMNS,
        quoted(PRODUTO_TABLE),
        n
    );
    q
}

pub fn insert(fields: &ProdutoFields) -> QueryBuf {
    let mut q = QueryBuf::new();
    let placeholders = field_params(&mut q, fields);
    q.sql = format!(
        "INSERT INTO {} (nome, descricao, preco, quantidadeestoque) VALUES ({}) RETURNING {}",
        quoted(PRODUTO_TABLE),
        placeholders.join(", "),
        COLUMNS
    );
    q
}

pub fn update(produto: &Produto) -> QueryBuf {
    let mut q = QueryBuf::new();
    let fields = ProdutoFields {
        name: produto.name.clone(),
        description: produto.description.clone(),
        price: produto.price,
        stock_quantity: produto.stock_quantity,
    };
    let p = field_params(&mut q, &fields);
    let id = q.push_param(PgBindValue::I64(produto.id));
    q.sql = format!(
        "UPDATE {} SET nome = {}, descricao = {}, preco = {}, quantidadeestoque = {} WHERE id = ${} RETURNING {}",
        quoted(PRODUTO_TABLE),
        p[0],
        p[1],
        p[2],
        p[3],
        id,
        COLUMNS
    );
    q
}

pub fn delete_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "DELETE FROM {} WHERE id = ${} RETURNING {}",
        quoted(PRODUTO_TABLE),
        n,
        COLUMNS
    );
    q
}

pub fn select_filtered(filter: &ProdutoFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::from(filter.name_pattern.as_str()));
    // No escape character: `\` is literal, as in the in-memory matcher.
    let mut where_parts = vec![format!("nome ILIKE ${} ESCAPE ''", n)];
    if let Some(quant) = filter.max_quantity {
        let n = q.push_param(PgBindValue::I32(quant));
        where_parts.push(format!("quantidadeestoque <= ${}", n));
    }
    if let Some(price) = filter.min_price {
        let n = q.push_param(PgBindValue::F64(price));
        where_parts.push(format!("preco >= ${}", n));
    }
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY id",
        COLUMNS,
        quoted(PRODUTO_TABLE),
        where_parts.join(" AND ")
    );
    q
}

/// Single statement, so the match and the delete are one atomic unit.
pub fn delete_by_max_quantity(quant: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I32(quant));
    q.sql = format!(
        "DELETE FROM {} WHERE quantidadeestoque <= ${}",
        quoted(PRODUTO_TABLE),
        n
    );
    q
}

fn field_params(q: &mut QueryBuf, fields: &ProdutoFields) -> Vec<String> {
    [
        PgBindValue::Text(Some(fields.name.clone())),
        PgBindValue::Text(fields.description.clone()),
        PgBindValue::F64(fields.price),
        PgBindValue::I32(fields.stock_quantity),
    ]
    .into_iter()
    .map(|v| format!("${}", q.push_param(v)))
    .collect()
}
