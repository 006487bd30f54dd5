//! In-process store. Each operation holds the lock for its whole duration,
//! so composite operations are atomic.

use super::{Apply, ProdutoFilter, ProdutoStore};
use crate::error::AppError;
use crate::model::{Produto, ProdutoFields};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryProdutoStore {
    inner: RwLock<Rows>,
}

#[derive(Default)]
struct Rows {
    last_id: i64,
    by_id: BTreeMap<i64, Produto>,
}

impl MemoryProdutoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, id: i64) -> Option<Produto> {
        self.inner.read().await.by_id.get(&id).cloned()
    }
}

/// Translate a SQL `LIKE` pattern (`%`, `_`) into an anchored, case-insensitive regex.
/// There is no escape character; `\` matches itself.
fn like_regex(pattern: &str) -> Result<Regex, AppError> {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    for c in pattern.chars() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    RegexBuilder::new(&re)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| AppError::BadRequest(format!("invalid name pattern: {}", e)))
}

#[async_trait]
impl ProdutoStore for MemoryProdutoStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Produto>, AppError> {
        Ok(self.inner.read().await.by_id.values().cloned().collect())
    }

    async fn insert(&self, fields: ProdutoFields) -> Result<Produto, AppError> {
        let mut rows = self.inner.write().await;
        rows.last_id += 1;
        let produto = Produto::from_fields(rows.last_id, fields);
        rows.by_id.insert(produto.id, produto.clone());
        Ok(produto)
    }

    async fn update_with(&self, id: i64, apply: &Apply<'_>) -> Result<Option<Produto>, AppError> {
        let mut rows = self.inner.write().await;
        let Some(existing) = rows.by_id.get(&id).cloned() else {
            return Ok(None);
        };
        let next = apply(existing)?;
        rows.by_id.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn delete(&self, id: i64) -> Result<Option<Produto>, AppError> {
        Ok(self.inner.write().await.by_id.remove(&id))
    }

    async fn search(&self, filter: &ProdutoFilter) -> Result<Vec<Produto>, AppError> {
        let re = like_regex(&filter.name_pattern)?;
        let rows = self.inner.read().await;
        Ok(rows
            .by_id
            .values()
            .filter(|p| re.is_match(&p.name))
            .filter(|p| filter.max_quantity.map_or(true, |q| p.stock_quantity <= q))
            .filter(|p| filter.min_price.map_or(true, |min| p.price >= min))
            .cloned()
            .collect())
    }

    async fn delete_by_max_quantity(&self, quant: i32) -> Result<u64, AppError> {
        let mut rows = self.inner.write().await;
        let before = rows.by_id.len();
        rows.by_id.retain(|_, p| p.stock_quantity > quant);
        Ok((before - rows.by_id.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, price: f64, quant: i32) -> ProdutoFields {
        ProdutoFields {
            name: name.into(),
            description: None,
            price,
            stock_quantity: quant,
        }
    }

    #[test]
    fn like_pattern_matches_case_insensitively() {
        let re = like_regex("%cAN%").unwrap();
        assert!(re.is_match("Caneta"));
        assert!(re.is_match("Lata de canela"));
        assert!(!re.is_match("Lápis"));
    }

    #[test]
    fn like_pattern_escapes_regex_metacharacters() {
        let re = like_regex("a.b_").unwrap();
        assert!(re.is_match("A.BC"));
        assert!(!re.is_match("axbc"));
        assert!(!re.is_match("a.bcd"));
    }

    #[test]
    fn like_pattern_treats_backslash_literally() {
        let re = like_regex("%a\\%").unwrap();
        assert!(re.is_match("caixa\\ 10"));
        assert!(re.is_match("a\\"));
        assert!(!re.is_match("a%"));
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = MemoryProdutoStore::new();
        let a = store.insert(fields("Caneta", 1.0, 1)).await.unwrap();
        let b = store.insert(fields("Lápis", 1.0, 1)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        store.delete(b.id).await.unwrap();
        let c = store.insert(fields("Borracha", 1.0, 1)).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn failed_apply_leaves_row_untouched() {
        let store = MemoryProdutoStore::new();
        let p = store.insert(fields("Caneta", 1.0, 1)).await.unwrap();
        let res = store
            .update_with(p.id, &|_| Err(AppError::BadRequest("no".into())))
            .await;
        assert!(res.is_err());
        assert_eq!(store.get(p.id).await, Some(p));
    }

    #[tokio::test]
    async fn update_of_missing_row_does_not_call_apply() {
        let store = MemoryProdutoStore::new();
        let res = store
            .update_with(42, &|_| panic!("apply must not run"))
            .await
            .unwrap();
        assert_eq!(res, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn threshold_delete_is_inclusive() {
        let store = MemoryProdutoStore::new();
        store.insert(fields("A1", 1.0, 0)).await.unwrap();
        store.insert(fields("A2", 1.0, 5)).await.unwrap();
        store.insert(fields("A3", 1.0, 6)).await.unwrap();
        assert_eq!(store.delete_by_max_quantity(5).await.unwrap(), 2);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.delete_by_max_quantity(5).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_combines_bounds() {
        let store = MemoryProdutoStore::new();
        store.insert(fields("Caneta azul", 2.0, 10)).await.unwrap();
        store.insert(fields("Caneta preta", 5.0, 3)).await.unwrap();
        let filter = ProdutoFilter {
            name_pattern: "%caneta%".into(),
            max_quantity: Some(5),
            min_price: Some(4.0),
        };
        let found = store.search(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Caneta preta");
    }
}
