//! HTTP handlers for the produto resource.

pub mod produto;
pub use produto::*;
