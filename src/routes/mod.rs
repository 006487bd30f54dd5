//! Router assembly: common probes and produto CRUD.

mod common;
mod produto;
pub use common::common_routes;
pub use produto::produto_routes;
