//! Produto use cases on top of any [`ProdutoStore`].

use crate::error::AppError;
use crate::model::{Produto, ProdutoInput, ProdutoPatch};
use crate::service::validate;
use crate::store::{ProdutoFilter, ProdutoStore};
use serde::Deserialize;
use serde_json::Value;

pub const PRODUTO_NAO_ENCONTRADO: &str = "Produto não encontrado!";

fn not_found() -> AppError {
    AppError::NotFound(PRODUTO_NAO_ENCONTRADO.into())
}

/// A term without `%` matches as a substring; with `%` it is used as given.
pub fn name_pattern(term: &str) -> String {
    if term.contains('%') {
        term.to_string()
    } else {
        format!("%{}%", term)
    }
}

fn merge_patch(existing: Produto, patch: &ProdutoPatch) -> Result<Produto, AppError> {
    let merged = patch.apply(ProdutoInput::from(&existing));
    let fields = validate(&merged).map_err(AppError::Validation)?;
    Ok(existing.with_fields(fields))
}

pub struct ProdutoService;

impl ProdutoService {
    pub async fn list(store: &dyn ProdutoStore) -> Result<Vec<Produto>, AppError> {
        store.list().await
    }

    pub async fn insert(store: &dyn ProdutoStore, input: &ProdutoInput) -> Result<Produto, AppError> {
        let fields = validate(input).map_err(AppError::Validation)?;
        let produto = store.insert(fields).await?;
        tracing::info!(id = produto.id, "produto inserted");
        Ok(produto)
    }

    /// Full update. The payload is validated before the row is looked up.
    pub async fn replace(
        store: &dyn ProdutoStore,
        id: i64,
        input: &ProdutoInput,
    ) -> Result<Produto, AppError> {
        let fields = validate(input).map_err(AppError::Validation)?;
        let produto = store
            .update_with(id, &|existing| Ok(existing.with_fields(fields.clone())))
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id, "produto updated");
        Ok(produto)
    }

    /// Partial update: merge the patch onto the stored row, then validate the result.
    pub async fn patch(
        store: &dyn ProdutoStore,
        id: i64,
        patch: &ProdutoPatch,
    ) -> Result<Produto, AppError> {
        let produto = store
            .update_with(id, &|existing| merge_patch(existing, patch))
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id, "produto patched");
        Ok(produto)
    }

    /// Partial update from a raw JSON body. The row is looked up first, so a
    /// missing id is 404 even when the body does not coerce.
    pub async fn patch_body(
        store: &dyn ProdutoStore,
        id: i64,
        body: &Value,
    ) -> Result<Produto, AppError> {
        let produto = store
            .update_with(id, &|existing| {
                let patch = ProdutoPatch::deserialize(body).map_err(|e| {
                    AppError::BadRequest(format!(
                        "Failed to deserialize the JSON body into the target type: {}",
                        e
                    ))
                })?;
                merge_patch(existing, &patch)
            })
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(id, "produto patched");
        Ok(produto)
    }

    pub async fn delete(store: &dyn ProdutoStore, id: i64) -> Result<Produto, AppError> {
        let produto = store.delete(id).await?.ok_or_else(not_found)?;
        tracing::info!(id, "produto deleted");
        Ok(produto)
    }

    pub async fn search_by_name(store: &dyn ProdutoStore, nome: &str) -> Result<Vec<Produto>, AppError> {
        store
            .search(&ProdutoFilter {
                name_pattern: name_pattern(nome),
                max_quantity: None,
                min_price: None,
            })
            .await
    }

    pub async fn search_by_name_max_quantity(
        store: &dyn ProdutoStore,
        nome: &str,
        quant: i32,
    ) -> Result<Vec<Produto>, AppError> {
        store
            .search(&ProdutoFilter {
                name_pattern: name_pattern(nome),
                max_quantity: Some(quant),
                min_price: None,
            })
            .await
    }

    pub async fn search_by_name_min_price(
        store: &dyn ProdutoStore,
        nome: &str,
        preco: f64,
    ) -> Result<Vec<Produto>, AppError> {
        store
            .search(&ProdutoFilter {
                name_pattern: name_pattern(nome),
                max_quantity: None,
                min_price: Some(preco),
            })
            .await
    }

    /// Deletes every row with stock quantity `<= quant`; returns the count.
    pub async fn delete_by_max_quantity(store: &dyn ProdutoStore, quant: i32) -> Result<u64, AppError> {
        let deleted = store.delete_by_max_quantity(quant).await?;
        if deleted > 0 {
            tracing::info!(quant, deleted, "produtos deleted by quantity");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProdutoStore;

    fn caneta() -> ProdutoInput {
        ProdutoInput {
            name: Some("Caneta".into()),
            description: Some("Azul".into()),
            price: Some(2.5),
            stock_quantity: Some(100),
        }
    }

    #[test]
    fn name_pattern_wraps_plain_terms() {
        assert_eq!(name_pattern("can"), "%can%");
        assert_eq!(name_pattern("Can%"), "Can%");
    }

    #[tokio::test]
    async fn replace_validates_before_lookup() {
        let store = MemoryProdutoStore::new();
        let err = ProdutoService::replace(&store, 9999, &ProdutoInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn replace_keeps_id_and_copies_fields() {
        let store = MemoryProdutoStore::new();
        let created = ProdutoService::insert(&store, &caneta()).await.unwrap();
        let mut input = caneta();
        input.name = Some("Caneta vermelha".into());
        input.description = None;
        let updated = ProdutoService::replace(&store, created.id, &input).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Caneta vermelha");
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn patch_on_missing_row_is_not_found_even_if_invalid() {
        let store = MemoryProdutoStore::new();
        let patch = ProdutoPatch {
            price: Some(Some(-5.0)),
            ..Default::default()
        };
        let err = ProdutoService::patch(&store, 1, &patch).await.unwrap_err();
        assert_eq!(err.to_string(), PRODUTO_NAO_ENCONTRADO);
    }

    #[tokio::test]
    async fn patch_body_looks_up_row_before_coercing() {
        let store = MemoryProdutoStore::new();
        let body = serde_json::json!({"preco": "abc"});
        let err = ProdutoService::patch_body(&store, 1, &body).await.unwrap_err();
        assert_eq!(err.to_string(), PRODUTO_NAO_ENCONTRADO);

        let created = ProdutoService::insert(&store, &caneta()).await.unwrap();
        let err = ProdutoService::patch_body(&store, created.id, &body)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(store.get(created.id).await, Some(created));
    }

    #[tokio::test]
    async fn invalid_patch_does_not_persist() {
        let store = MemoryProdutoStore::new();
        let created = ProdutoService::insert(&store, &caneta()).await.unwrap();
        let patch = ProdutoPatch {
            name: Some(Some("X".into())),
            stock_quantity: Some(None),
            ..Default::default()
        };
        let err = ProdutoService::patch(&store, created.id, &patch).await.unwrap_err();
        let AppError::Validation(v) = err else {
            panic!("expected validation error");
        };
        assert_eq!(v.iter().count(), 2);
        assert_eq!(store.get(created.id).await, Some(created));
    }

    #[tokio::test]
    async fn empty_patch_round_trips() {
        let store = MemoryProdutoStore::new();
        let created = ProdutoService::insert(&store, &caneta()).await.unwrap();
        let same = ProdutoService::patch(&store, created.id, &ProdutoPatch::default())
            .await
            .unwrap();
        assert_eq!(same, created);
    }
}
