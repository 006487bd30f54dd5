//! Produto handlers: one verb+path per function, thin over [`ProdutoService`].

use crate::error::AppError;
use crate::extractors::ApiJson;
use crate::model::{Produto, ProdutoInput, ProdutoPatch};
use crate::response::{success_many, success_message, Deleted};
use crate::service::ProdutoService;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NomeQuery {
    /// Substring, or a `LIKE` pattern when it contains `%`.
    pub nome: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuantQuery {
    pub quant: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NomePrecoQuery {
    pub nome: String,
    pub preco: f64,
}

fn nonempty(rows: Vec<Produto>, message: &str) -> Result<Vec<Produto>, AppError> {
    if rows.is_empty() {
        Err(AppError::NotFound(message.to_string()))
    } else {
        Ok(rows)
    }
}

#[utoipa::path(
    get,
    path = "/api/produtos/selecionar",
    tag = "produtos",
    responses(
        (status = 200, description = "Lista de produtos em `data`", body = [Produto]),
        (status = 500, description = "Erro interno do servidor")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = ProdutoService::list(state.store.as_ref()).await?;
    Ok(success_many(rows))
}

#[utoipa::path(
    post,
    path = "/api/produtos/inserir",
    tag = "produtos",
    request_body = ProdutoInput,
    responses(
        (status = 200, description = "Produto inserido com sucesso", body = Produto),
        (status = 400, description = "Violações por campo em `error.details`")
    )
)]
pub async fn insert(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProdutoInput>,
) -> Result<impl IntoResponse, AppError> {
    let produto = ProdutoService::insert(state.store.as_ref(), &input).await?;
    Ok(success_message(produto, "Produto inserido com sucesso"))
}

#[utoipa::path(
    delete,
    path = "/api/produtos/excluir/{id}",
    tag = "produtos",
    params(("id" = i64, Path, description = "Id do produto que será deletado")),
    responses(
        (status = 200, description = "Produto excluído com sucesso", body = Produto),
        (status = 404, description = "Produto não encontrado!")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let produto = ProdutoService::delete(state.store.as_ref(), id).await?;
    Ok(success_message(produto, "Produto excluído com sucesso"))
}

#[utoipa::path(
    put,
    path = "/api/produtos/atualizar/{id}",
    tag = "produtos",
    params(("id" = i64, Path)),
    request_body = ProdutoInput,
    responses(
        (status = 200, description = "Produto atualizado com sucesso", body = Produto),
        (status = 400, description = "Violações por campo em `error.details`"),
        (status = 404, description = "Produto não encontrado!")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<ProdutoInput>,
) -> Result<impl IntoResponse, AppError> {
    let produto = ProdutoService::replace(state.store.as_ref(), id, &input).await?;
    Ok(success_message(produto, "Produto atualizado com sucesso"))
}

#[utoipa::path(
    patch,
    path = "/api/produtos/atualizarParcial/{id}",
    tag = "produtos",
    params(("id" = i64, Path)),
    request_body = ProdutoPatch,
    responses(
        (status = 200, description = "Produto alterado com sucesso", body = Produto),
        (status = 400, description = "Violações concatenadas em `error.message`, ou corpo que não converte"),
        (status = 404, description = "Produto não encontrado!")
    )
)]
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let produto = ProdutoService::patch_body(state.store.as_ref(), id, &body).await?;
    Ok(success_message(produto, "Produto alterado com sucesso"))
}

#[utoipa::path(
    post,
    path = "/api/produtos/buscarPorNome",
    tag = "produtos",
    params(NomeQuery),
    responses(
        (status = 200, description = "Produtos encontrados em `data`", body = [Produto]),
        (status = 404, description = "Nenhum produto encontrado com esse nome!")
    )
)]
pub async fn search_by_name(
    State(state): State<AppState>,
    Query(q): Query<NomeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = ProdutoService::search_by_name(state.store.as_ref(), &q.nome).await?;
    Ok(success_many(nonempty(rows, "Nenhum produto encontrado com esse nome!")?))
}

#[utoipa::path(
    post,
    path = "/api/produtos/contarPelaQuantidade",
    tag = "produtos",
    params(QuantQuery),
    responses(
        (status = 200, description = "Produtos com quantidade <= quant excluídos; total em `data.deleted`"),
        (status = 404, description = "Nenhum produto encontrado com essa quantidade!")
    )
)]
pub async fn count_by_quantity(
    State(state): State<AppState>,
    Query(q): Query<QuantQuery>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = ProdutoService::delete_by_max_quantity(state.store.as_ref(), q.quant).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(
            "Nenhum produto encontrado com essa quantidade!".into(),
        ));
    }
    Ok(success_message(
        Deleted { deleted },
        format!("Quantidade de produtos excluídos: {}", deleted),
    ))
}

#[utoipa::path(
    get,
    path = "/api/produtos/buscarPeloNomeQuantidade/{nome}/{quant}",
    tag = "produtos",
    params(
        ("nome" = String, Path),
        ("quant" = i32, Path, description = "Quantidade máxima em estoque")
    ),
    responses(
        (status = 200, description = "Produtos encontrados em `data`", body = [Produto]),
        (status = 404, description = "Nenhum produto encontrado")
    )
)]
pub async fn search_by_name_and_quantity(
    State(state): State<AppState>,
    Path((nome, quant)): Path<(String, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let rows = ProdutoService::search_by_name_max_quantity(state.store.as_ref(), &nome, quant).await?;
    Ok(success_many(nonempty(rows, "Nenhum produto encontrado")?))
}

#[utoipa::path(
    post,
    path = "/api/produtos/buscarPeloNomePreco",
    tag = "produtos",
    params(NomePrecoQuery),
    responses(
        (status = 200, description = "Produtos com preço >= preco em `data`", body = [Produto]),
        (status = 404, description = "Nenhum produto encontrado")
    )
)]
pub async fn search_by_name_and_price(
    State(state): State<AppState>,
    Query(q): Query<NomePrecoQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = ProdutoService::search_by_name_min_price(state.store.as_ref(), &q.nome, q.preco).await?;
    Ok(success_many(nonempty(rows, "Nenhum produto encontrado")?))
}

#[utoipa::path(
    delete,
    path = "/api/produtos/excluirQuantidade/{quant}",
    tag = "produtos",
    params(("quant" = i32, Path, description = "Quantidade máxima em estoque")),
    responses(
        (status = 200, description = "Produto excluído com sucesso"),
        (status = 404, description = "Nenhum produto encontrado com a quantidade menor ou igual!")
    )
)]
pub async fn delete_by_quantity(
    State(state): State<AppState>,
    Path(quant): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = ProdutoService::delete_by_max_quantity(state.store.as_ref(), quant).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(
            "Nenhum produto encontrado com a quantidade menor ou igual!".into(),
        ));
    }
    Ok(success_message(Deleted { deleted }, "Produto excluído com sucesso"))
}
