//! Produto routes, mounted under `/api/produtos`.

use crate::handlers::produto::{
    count_by_quantity, delete, delete_by_quantity, insert, list, patch, search_by_name,
    search_by_name_and_price, search_by_name_and_quantity, update,
};
use crate::state::AppState;
use axum::{
    routing::{delete as delete_route, get, patch as patch_route, post, put},
    Router,
};

pub fn produto_routes(state: AppState) -> Router {
    Router::new()
        .route("/selecionar", get(list))
        .route("/inserir", post(insert))
        .route("/excluir/:id", delete_route(delete))
        .route("/atualizar/:id", put(update))
        .route("/atualizarParcial/:id", patch_route(patch))
        .route("/buscarPorNome", post(search_by_name))
        .route("/contarPelaQuantidade", post(count_by_quantity))
        .route("/buscarPeloNomeQuantidade/:nome/:quant", get(search_by_name_and_quantity))
        .route("/buscarPeloNomePreco", post(search_by_name_and_price))
        .route("/excluirQuantidade/:quant", delete_route(delete_by_quantity))
        .with_state(state)
}
