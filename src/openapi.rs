//! OpenAPI document for the produto routes.

use crate::handlers::produto;
use crate::model::{Produto, ProdutoInput, ProdutoPatch};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Produtos API", description = "CRUD de produtos"),
    paths(
        produto::list,
        produto::insert,
        produto::delete,
        produto::update,
        produto::patch,
        produto::search_by_name,
        produto::count_by_quantity,
        produto::search_by_name_and_quantity,
        produto::search_by_name_and_price,
        produto::delete_by_quantity,
    ),
    components(schemas(Produto, ProdutoInput, ProdutoPatch)),
    tags((name = "produtos", description = "Operações sobre produtos"))
)]
pub struct ApiDoc;
