//! Shared application state for all routes.

use crate::store::ProdutoStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProdutoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProdutoStore>) -> Self {
        AppState { store }
    }
}
