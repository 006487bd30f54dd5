//! Request extractors with rejections mapped onto [`crate::error::AppError`].

mod json;
pub use json::ApiJson;
