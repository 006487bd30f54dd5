//! Produto use cases and the shared validation.

mod produto;
mod validation;
pub use produto::{name_pattern, ProdutoService, PRODUTO_NAO_ENCONTRADO};
pub use validation::{validate, Constraint, Violation, Violations};
